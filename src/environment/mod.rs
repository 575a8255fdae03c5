//! Environment variables for a session.

pub mod expansion;

pub use expansion::expand_variables;

use std::collections::BTreeMap;

use crate::users::User;

pub const DEFAULT_PATH: &str = "/usr/local/bin:/usr/bin:/bin:/usr/local/sbin:/usr/sbin:/sbin";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Seed the standard variables for `user` starting in `cwd`.
    pub fn new(user: &User, cwd: &str, hostname: &str) -> Self {
        let mut env = Self::default();
        env.set("HOME", &user.home);
        env.set("USER", &user.username);
        env.set("LOGNAME", &user.username);
        env.set("PWD", cwd);
        env.set("OLDPWD", cwd);
        env.set("PATH", DEFAULT_PATH);
        env.set("SHELL", &user.shell);
        env.set("TERM", "xterm-256color");
        env.set("LANG", "en_US.UTF-8");
        env.set("HOSTNAME", hostname);
        env
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|s| s.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    /// All variables sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn update_pwd(&mut self, new_pwd: &str) {
        let old = self.get("PWD").unwrap_or("/").to_string();
        self.set("OLDPWD", &old);
        self.set("PWD", new_pwd);
    }

    pub fn update_user(&mut self, user: &User) {
        self.set("USER", &user.username);
        self.set("LOGNAME", &user.username);
        self.set("HOME", &user.home);
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split `NAME=value`, stripping one layer of matching quotes from the value.
pub fn parse_assignment(text: &str) -> Option<(String, String)> {
    let (name, value) = text.split_once('=')?;
    if !is_valid_name(name) {
        return None;
    }
    let value = if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    };
    Some((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::new(&User::new("user", 1000, 1000, "/home/user", &["user"]), "/home/user", "localhost")
    }

    #[test]
    fn test_seeded_variables() {
        let env = env();
        assert_eq!(env.get("HOME"), Some("/home/user"));
        assert_eq!(env.get("USER"), Some("user"));
        assert_eq!(env.get("PATH"), Some(DEFAULT_PATH));
        assert_eq!(env.get("SHELL"), Some("/bin/bash"));
        assert_eq!(env.get("HOSTNAME"), Some("localhost"));
        assert_eq!(env.get("NOPE"), None);
    }

    #[test]
    fn test_update_pwd_tracks_oldpwd() {
        let mut env = env();
        env.update_pwd("/tmp");
        assert_eq!(env.get("PWD"), Some("/tmp"));
        assert_eq!(env.get("OLDPWD"), Some("/home/user"));
    }

    #[test]
    fn test_update_user() {
        let mut env = env();
        env.update_user(&User::new("root", 0, 0, "/root", &["root"]));
        assert_eq!(env.get("USER"), Some("root"));
        assert_eq!(env.get("LOGNAME"), Some("root"));
        assert_eq!(env.get("HOME"), Some("/root"));
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("PATH"));
        assert!(is_valid_name("_x1"));
        assert!(!is_valid_name("1abc"));
        assert!(!is_valid_name("A-B"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("A=1"), Some(("A".into(), "1".into())));
        assert_eq!(parse_assignment("A=\"x y\""), Some(("A".into(), "x y".into())));
        assert_eq!(parse_assignment("A="), Some(("A".into(), String::new())));
        assert_eq!(parse_assignment("1A=x"), None);
        assert_eq!(parse_assignment("novalue"), None);
    }
}

//! Mock user and group accounts.
//!
//! The registry owns every account and a pointer (by name) to the account the
//! shell is currently running as. `su` and `sudo` move that pointer; nothing
//! here enforces real isolation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub uid: u32,
    pub gid: u32,
    pub home: String,
    pub shell: String,
    /// Supplementary and primary group names, primary first.
    pub groups: Vec<String>,
}

impl User {
    pub fn new(username: &str, uid: u32, gid: u32, home: &str, groups: &[&str]) -> Self {
        Self {
            username: username.to_string(),
            uid,
            gid,
            home: home.to_string(),
            shell: "/bin/bash".to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.uid == 0
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    pub fn can_sudo(&self) -> bool {
        self.is_root() || self.in_group("sudo")
    }

    pub fn home_segments(&self) -> Vec<String> {
        self.home
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub gid: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("user '{0}' already exists")]
    UserExists(String),
    #[error("user '{0}' does not exist")]
    NoSuchUser(String),
    #[error("group '{0}' already exists")]
    GroupExists(String),
    #[error("group '{0}' does not exist")]
    NoSuchGroup(String),
    #[error("UID {0} is not unique")]
    UidTaken(u32),
    #[error("GID '{0}' already exists")]
    GidTaken(u32),
    #[error("user {0} is currently used by process 100")]
    InUse(String),
}

#[derive(Debug, Clone)]
pub struct UserRegistry {
    users: IndexMap<String, User>,
    groups: IndexMap<String, Group>,
    // Always a key of `users`: `remove_user` refuses to drop it.
    current: String,
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRegistry {
    pub fn new() -> Self {
        let mut users = IndexMap::new();
        for user in [
            User::new("root", 0, 0, "/root", &["root"]),
            User::new("user", 1000, 1000, "/home/user", &["user", "sudo", "www-data"]),
            User::new("guest", 1001, 1001, "/home/guest", &["guest"]),
            User::new("john", 1002, 1002, "/home/john", &["john"]),
        ] {
            users.insert(user.username.clone(), user);
        }

        let mut groups = IndexMap::new();
        for (name, gid) in [
            ("root", 0),
            ("sudo", 27),
            ("www-data", 33),
            ("user", 1000),
            ("guest", 1001),
            ("john", 1002),
        ] {
            groups.insert(name.to_string(), Group { name: name.to_string(), gid });
        }

        Self { users, groups, current: "user".to_string() }
    }

    pub fn current(&self) -> &User {
        &self.users[&self.current]
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn set_current(&mut self, username: &str) -> Result<(), UserError> {
        if !self.users.contains_key(username) {
            return Err(UserError::NoSuchUser(username.to_string()));
        }
        self.current = username.to_string();
        Ok(())
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.get_mut(username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn by_uid(&self, uid: u32) -> Option<&User> {
        self.users.values().find(|u| u.uid == uid)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn add_user(&mut self, user: User) -> Result<(), UserError> {
        if self.users.contains_key(&user.username) {
            return Err(UserError::UserExists(user.username));
        }
        if self.by_uid(user.uid).is_some() {
            return Err(UserError::UidTaken(user.uid));
        }
        log::debug!("adding user {} (uid {})", user.username, user.uid);
        self.users.insert(user.username.clone(), user);
        Ok(())
    }

    pub fn remove_user(&mut self, username: &str) -> Result<User, UserError> {
        if username == self.current || username == "root" {
            return Err(UserError::InUse(username.to_string()));
        }
        self.users
            .shift_remove(username)
            .ok_or_else(|| UserError::NoSuchUser(username.to_string()))
    }

    pub fn next_uid(&self) -> u32 {
        self.users.values().map(|u| u.uid).filter(|uid| *uid >= 1000).max().map_or(1000, |m| m + 1)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn group_by_gid(&self, gid: u32) -> Option<&Group> {
        self.groups.values().find(|g| g.gid == gid)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn next_gid(&self) -> u32 {
        self.groups.values().map(|g| g.gid).filter(|gid| *gid >= 1000).max().map_or(1000, |m| m + 1)
    }

    pub fn add_group(&mut self, name: &str, gid: Option<u32>) -> Result<Group, UserError> {
        if self.groups.contains_key(name) {
            return Err(UserError::GroupExists(name.to_string()));
        }
        let gid = match gid {
            Some(gid) if self.group_by_gid(gid).is_some() => return Err(UserError::GidTaken(gid)),
            Some(gid) => gid,
            None => self.next_gid(),
        };
        let group = Group { name: name.to_string(), gid };
        self.groups.insert(name.to_string(), group.clone());
        Ok(group)
    }

    /// Drop a group nobody uses as their primary group.
    pub fn remove_group(&mut self, name: &str) -> Result<Group, UserError> {
        let group = self.groups.get(name).ok_or_else(|| UserError::NoSuchGroup(name.to_string()))?;
        if let Some(user) = self.users.values().find(|u| u.gid == group.gid) {
            return Err(UserError::InUse(user.username.clone()));
        }
        for user in self.users.values_mut() {
            user.groups.retain(|g| g != name);
        }
        self.groups
            .shift_remove(name)
            .ok_or_else(|| UserError::NoSuchGroup(name.to_string()))
    }

    /// Name of the user's primary group, falling back to the username.
    pub fn primary_group(&self, user: &User) -> String {
        self.group_by_gid(user.gid)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| user.username.clone())
    }

    /// Users listing `group` as a supplementary (non-primary) group.
    pub fn members_of(&self, group: &Group) -> Vec<&str> {
        self.users
            .values()
            .filter(|u| u.gid != group.gid && u.in_group(&group.name))
            .map(|u| u.username.as_str())
            .collect()
    }

    /// Contents of `/etc/passwd` for the current registry.
    pub fn render_passwd(&self) -> String {
        self.users
            .values()
            .map(|u| format!("{}:x:{}:{}::{}:{}\n", u.username, u.uid, u.gid, u.home, u.shell))
            .collect()
    }

    /// Contents of `/etc/group` for the current registry.
    pub fn render_group(&self) -> String {
        self.groups
            .values()
            .map(|g| format!("{}:x:{}:{}\n", g.name, g.gid, self.members_of(g).join(",")))
            .collect()
    }
}

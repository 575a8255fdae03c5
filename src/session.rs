//! Per-session shell state.
//!
//! One `ShellSession` holds everything a command can read or change. Sessions
//! are independent values, so any number can exist side by side.

use crate::config::{ShellConfig, TildeMode};
use crate::environment::Environment;
use crate::fs::persistence::{self, BlobStore};
use crate::fs::{default_tree, display_path, segments_of, FsNode, Vfs, WalkError};
use crate::history::CommandHistory;
use crate::interpreter::errors::ShellError;
use crate::jobs::{Clock, JobTable};
use crate::permissions::Umask;
use crate::users::{User, UserRegistry};

/// Home used for `~` in [`TildeMode::Fixed`].
pub const FIXED_HOME: &str = "/home/user";

#[derive(Debug, Clone)]
pub struct ShellSession {
    pub vfs: Vfs,
    pub cwd: Vec<String>,
    pub users: UserRegistry,
    pub env: Environment,
    pub umask: Umask,
    pub jobs: JobTable,
    pub history: CommandHistory,
    pub clock: Clock,
    pub config: ShellConfig,
    /// Size of the most recent successful save, if any.
    pub last_saved_bytes: Option<usize>,
}

impl ShellSession {
    pub fn new(config: ShellConfig) -> Self {
        Self::with_clock(config, Clock::system())
    }

    pub fn with_clock(config: ShellConfig, clock: Clock) -> Self {
        let users = UserRegistry::new();
        let vfs = Vfs::new(default_tree(&users));
        let cwd = users.current().home_segments();
        let env = Environment::new(users.current(), &display_path(&cwd), &config.hostname);
        Self {
            vfs,
            cwd,
            users,
            env,
            umask: Umask::default(),
            jobs: JobTable::new(),
            history: CommandHistory::new(config.history_limit),
            clock,
            config,
            last_saved_bytes: None,
        }
    }

    /// Start from saved state, falling back to defaults for anything missing
    /// or rejected.
    pub fn restore(config: ShellConfig, clock: Clock, store: &dyn BlobStore) -> Self {
        let mut session = Self::with_clock(config, clock);
        if let Some(root) = persistence::load_filesystem(store) {
            session.vfs = Vfs::new(root);
            if let Some(cwd) = persistence::load_current_path(store) {
                if session.vfs.get_node(&cwd).map_or(false, |n| n.is_dir()) {
                    session.env.set("PWD", &display_path(&cwd));
                    session.cwd = cwd;
                }
            }
        }
        session.history = CommandHistory::with_entries(
            session.config.history_limit,
            persistence::load_history(store),
        );
        session
    }

    pub fn user(&self) -> &User {
        self.users.current()
    }

    /// Segments `~` expands to.
    pub fn home_segments(&self) -> Vec<String> {
        match self.config.tilde {
            TildeMode::Fixed => segments_of(FIXED_HOME),
            TildeMode::CurrentUser => self.user().home_segments(),
        }
    }

    pub fn resolve(&self, path: &str) -> Vec<String> {
        Vfs::resolve_path(path, &self.cwd, &self.home_segments())
    }

    pub fn cwd_display(&self) -> String {
        display_path(&self.cwd)
    }

    pub fn prompt(&self) -> String {
        let user = self.user();
        let home = user.home_segments();
        let location = if self.cwd.starts_with(&home) && !home.is_empty() {
            let rest = &self.cwd[home.len()..];
            if rest.is_empty() {
                "~".to_string()
            } else {
                format!("~/{}", rest.join("/"))
            }
        } else {
            self.cwd_display()
        };
        let sigil = if user.is_root() { '#' } else { '$' };
        format!("{}@{}:{}{} ", user.username, self.config.hostname, location, sigil)
    }

    pub fn node(&self, segments: &[String]) -> Option<&FsNode> {
        self.vfs.get_node(segments)
    }

    /// Resolve `path` to an existing node, checking search permission on
    /// each directory on the way. `context` prefixes any error.
    pub fn lookup(&self, path: &str, context: &str) -> Result<Vec<String>, ShellError> {
        let segments = self.resolve(path);
        self.check_walk(&segments, context)?;
        Ok(segments)
    }

    pub fn check_walk(&self, segments: &[String], context: &str) -> Result<&FsNode, ShellError> {
        self.vfs.walk(segments, self.user()).map_err(|e| match e {
            WalkError::NotFound => ShellError::no_such_file(context),
            WalkError::NotADirectory => ShellError::not_a_directory(context),
            WalkError::PermissionDenied => ShellError::permission_denied(context),
        })
    }

    /// Split `path` into an existing, searchable parent directory and the
    /// final name, for commands that create entries.
    pub fn lookup_parent(&self, path: &str, context: &str) -> Result<(Vec<String>, String), ShellError> {
        let mut segments = self.resolve(path);
        let name = segments.pop().ok_or_else(|| ShellError::file_exists(context))?;
        let parent = self.check_walk(&segments, context)?;
        if !parent.is_dir() {
            return Err(ShellError::not_a_directory(context));
        }
        Ok((segments, name))
    }

    fn primary_group(&self) -> String {
        self.users.primary_group(self.user())
    }

    /// A new file owned by the current user with the umask applied.
    pub fn new_file(&self, content: &str) -> FsNode {
        FsNode::file(&self.user().username, &self.primary_group(), self.umask.file_mode(), content)
    }

    pub fn new_dir(&self) -> FsNode {
        FsNode::directory(&self.user().username, &self.primary_group(), self.umask.dir_mode())
    }

    pub fn set_cwd(&mut self, segments: Vec<String>) {
        self.cwd = segments;
        let pwd = self.cwd_display();
        self.env.update_pwd(&pwd);
    }

    /// Make `username` the current user and move to their home directory
    /// (or `/` if it does not exist).
    pub fn switch_user(&mut self, username: &str) -> Result<(), ShellError> {
        self.users
            .set_current(username)
            .map_err(|_| ShellError::invalid(format!("su: user {} does not exist", username)))?;
        let user = self.user().clone();
        self.env.update_user(&user);
        let home = user.home_segments();
        let target = if self.vfs.get_node(&home).map_or(false, |n| n.is_dir()) {
            home
        } else {
            Vec::new()
        };
        self.set_cwd(target);
        log::debug!("switched to user {}", username);
        Ok(())
    }

    /// Rewrite `/etc/passwd` and `/etc/group` from the registry.
    pub fn sync_account_files(&mut self) {
        let passwd = self.users.render_passwd();
        let group = self.users.render_group();
        for (name, content) in [("passwd", passwd), ("group", group)] {
            if let Some(node) = self.vfs.get_node_mut(&segments_of(&format!("/etc/{}", name))) {
                node.set_content(content);
            }
        }
    }

    /// Put the tree, cwd, history and umask back to their initial state.
    pub fn reset(&mut self) {
        self.vfs.replace_root(default_tree(&self.users));
        let home = self.user().home_segments();
        let cwd = if self.vfs.get_node(&home).map_or(false, |n| n.is_dir()) { home } else { Vec::new() };
        self.set_cwd(cwd);
        self.history.clear();
        self.umask = Umask::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::persistence::{save_state, MemoryStore};

    fn session() -> ShellSession {
        ShellSession::with_clock(ShellConfig::default(), Clock::manual())
    }

    #[test]
    fn test_initial_state() {
        let s = session();
        assert_eq!(s.cwd_display(), "/home/user");
        assert_eq!(s.user().username, "user");
        assert_eq!(s.env.get("PWD"), Some("/home/user"));
        assert_eq!(s.prompt(), "user@localhost:~$ ");
    }

    #[test]
    fn test_tilde_modes() {
        let mut s = session();
        s.switch_user("guest").unwrap();
        assert_eq!(s.resolve("~"), segments_of("/home/user"));
        s.config.tilde = TildeMode::CurrentUser;
        assert_eq!(s.resolve("~/x"), segments_of("/home/guest/x"));
    }

    #[test]
    fn test_lookup_errors() {
        let s = session();
        assert!(s.lookup("documents/report.txt", "cat: x").is_ok());
        assert_eq!(
            s.lookup("nope", "cat: nope"),
            Err(ShellError::no_such_file("cat: nope"))
        );
        assert_eq!(
            s.lookup("README.txt/x", "cat: README.txt/x"),
            Err(ShellError::not_a_directory("cat: README.txt/x"))
        );
        assert_eq!(
            s.lookup("/root/secret", "cat: /root/secret"),
            Err(ShellError::permission_denied("cat: /root/secret"))
        );
    }

    #[test]
    fn test_lookup_parent() {
        let s = session();
        let (parent, name) = s.lookup_parent("documents/new.txt", "touch").unwrap();
        assert_eq!(parent, segments_of("/home/user/documents"));
        assert_eq!(name, "new.txt");
        assert!(s.lookup_parent("missing/new.txt", "touch").is_err());
        assert!(s.lookup_parent("/", "mkdir").is_err());
    }

    #[test]
    fn test_new_nodes_follow_umask() {
        let mut s = session();
        assert_eq!(s.new_file("").permissions, 0o644);
        assert_eq!(s.new_dir().permissions, 0o755);
        s.umask = Umask::parse("077").unwrap();
        assert_eq!(s.new_file("").permissions, 0o600);
        assert_eq!(s.new_dir().permissions, 0o700);
        assert_eq!(s.new_dir().owner, "user");
        assert_eq!(s.new_dir().group, "user");
    }

    #[test]
    fn test_switch_user_resets_cwd_and_env() {
        let mut s = session();
        s.switch_user("root").unwrap();
        assert_eq!(s.cwd_display(), "/root");
        assert_eq!(s.env.get("USER"), Some("root"));
        assert_eq!(s.prompt(), "root@localhost:~# ");
        // john has no home directory in the default tree.
        s.switch_user("john").unwrap();
        assert_eq!(s.cwd_display(), "/");
        assert!(s.switch_user("nobody").is_err());
    }

    #[test]
    fn test_restore_from_store() {
        let mut s = session();
        s.set_cwd(segments_of("/home/user/documents"));
        s.history.add("ls");
        let mut store = MemoryStore::new();
        save_state(&mut store, s.vfs.root(), &s.cwd, s.history.entries()).unwrap();

        let restored = ShellSession::restore(ShellConfig::default(), Clock::manual(), &store);
        assert_eq!(restored.cwd_display(), "/home/user/documents");
        assert_eq!(restored.history.entries(), &["ls"]);
    }

    #[test]
    fn test_restore_ignores_missing_cwd() {
        let s = session();
        let mut store = MemoryStore::new();
        save_state(&mut store, s.vfs.root(), &segments_of("/gone"), &[]).unwrap();
        let restored = ShellSession::restore(ShellConfig::default(), Clock::manual(), &store);
        assert_eq!(restored.cwd_display(), "/home/user");
    }
}

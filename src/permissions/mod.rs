//! Permission Model
//!
//! Mode bits follow the low 12 bits of `st_mode`:
//!
//! ```text
//! 11 10  9 | 8 7 6 | 5 4 3 | 2 1 0
//! SUID SGID sticky | owner | group | other
//! ```
//!
//! Access checks consult exactly one class per request: owner if the user owns
//! the node, else group if the user belongs to the node's group, else other.
//! Root bypasses every check.

pub mod mode;
pub mod umask;

pub use mode::{format_mode, mode_to_string, parse_mode, parse_octal, apply_symbolic, ModeError};
pub use umask::Umask;

use crate::fs::FsNode;
use crate::users::User;

pub const SUID: u32 = 0o4000;
pub const SGID: u32 = 0o2000;
pub const STICKY: u32 = 0o1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    Execute,
}

impl Access {
    fn bit(self) -> u32 {
        match self {
            Access::Read => 4,
            Access::Write => 2,
            Access::Execute => 1,
        }
    }
}

pub fn can_access(node: &FsNode, user: &User, access: Access) -> bool {
    if user.is_root() {
        return true;
    }
    let shift = if node.owner == user.username {
        6
    } else if user.in_group(&node.group) {
        3
    } else {
        0
    };
    (node.permissions >> shift) & access.bit() != 0
}

pub fn is_owner_or_root(node: &FsNode, user: &User) -> bool {
    user.is_root() || node.owner == user.username
}

/// New entries need write and search permission on the directory.
pub fn can_create(dir: &FsNode, user: &User) -> bool {
    can_access(dir, user, Access::Write) && can_access(dir, user, Access::Execute)
}

/// Whether `user` may remove or rename `child` out of directory `parent`.
///
/// Needs write and execute on the parent. In a sticky directory only the
/// child's owner, the directory's owner, or root may unlink.
pub fn can_unlink(parent: &FsNode, child: &FsNode, user: &User) -> bool {
    if !can_create(parent, user) {
        return false;
    }
    if parent.permissions & STICKY != 0 && !user.is_root() {
        return child.owner == user.username || parent.owner == user.username;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, groups: &[&str]) -> User {
        User::new(name, 1000, 1000, "/home/x", groups)
    }

    #[test]
    fn test_root_bypasses_checks() {
        let node = FsNode::file("user", "user", 0o000, "");
        let root = User::new("root", 0, 0, "/root", &["root"]);
        assert!(can_access(&node, &root, Access::Read));
        assert!(can_access(&node, &root, Access::Write));
    }

    #[test]
    fn test_owner_class_only() {
        // Owner has no read even though other does.
        let node = FsNode::file("alice", "staff", 0o044, "");
        let alice = user("alice", &["staff"]);
        assert!(!can_access(&node, &alice, Access::Read));
    }

    #[test]
    fn test_group_then_other() {
        let node = FsNode::file("alice", "staff", 0o640, "");
        let bob = user("bob", &["staff"]);
        let eve = user("eve", &["eve"]);
        assert!(can_access(&node, &bob, Access::Read));
        assert!(!can_access(&node, &bob, Access::Write));
        assert!(!can_access(&node, &eve, Access::Read));
    }

    #[test]
    fn test_execute_bit() {
        let dir = FsNode::directory("alice", "alice", 0o754);
        assert!(can_access(&dir, &user("alice", &[]), Access::Execute));
        assert!(!can_access(&dir, &user("eve", &[]), Access::Execute));
    }

    #[test]
    fn test_sticky_directory_unlink() {
        let tmp = FsNode::directory("root", "root", 0o1777);
        let theirs = FsNode::file("guest", "guest", 0o644, "");
        let mine = FsNode::file("user", "user", 0o644, "");
        let me = user("user", &["user"]);
        assert!(can_unlink(&tmp, &mine, &me));
        assert!(!can_unlink(&tmp, &theirs, &me));

        let open = FsNode::directory("root", "root", 0o777);
        assert!(can_unlink(&open, &theirs, &me));
        let closed = FsNode::directory("root", "root", 0o755);
        assert!(!can_unlink(&closed, &mine, &me));
    }
}

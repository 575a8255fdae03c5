//! Keyword catalog behind `search` and `man -k`.

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

const fn entry(
    name: &'static str,
    category: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
) -> Entry {
    Entry { name, category, description, keywords }
}

pub const ENTRIES: &[Entry] = &[
    entry("ls", "File Operations", "List directory contents", &["list", "files", "directory", "show"]),
    entry("cd", "Navigation", "Change the working directory", &["change", "navigate", "move", "go"]),
    entry("pwd", "Navigation", "Print the working directory", &["current", "location", "path", "where"]),
    entry("mkdir", "File Operations", "Make directories", &["create", "new", "folder", "directory"]),
    entry("rmdir", "File Operations", "Remove empty directories", &["delete", "remove", "directory"]),
    entry("touch", "File Operations", "Create a file or update its timestamp", &["create", "new", "file", "make"]),
    entry("rm", "File Operations", "Remove files or directories", &["delete", "remove", "erase"]),
    entry("cp", "File Operations", "Copy files and directories", &["copy", "duplicate", "clone"]),
    entry("mv", "File Operations", "Move or rename files", &["move", "rename", "relocate"]),
    entry("cat", "Text Operations", "Print file contents", &["read", "view", "show", "display", "print"]),
    entry("echo", "Text Operations", "Print text to the terminal", &["print", "output", "display", "write"]),
    entry("grep", "Text Operations", "Search for patterns in files", &["search", "find", "pattern", "match", "filter"]),
    entry("head", "Text Operations", "Show the first lines of a file", &["beginning", "start", "top", "first"]),
    entry("tail", "Text Operations", "Show the last lines of a file", &["end", "bottom", "last", "final"]),
    entry("sort", "Text Operations", "Sort lines of text", &["order", "arrange", "organize"]),
    entry("uniq", "Text Operations", "Drop repeated adjacent lines", &["unique", "duplicates", "distinct"]),
    entry("wc", "Text Operations", "Count lines, words and bytes", &["count", "lines", "words", "characters"]),
    entry("sed", "Text Operations", "Stream editor for text", &["edit", "replace", "substitute", "transform"]),
    entry("nano", "Editors", "Simple text editor", &["edit", "editor", "modify", "write"]),
    entry("less", "Viewers", "View a file with line numbers on request", &["view", "read", "pager", "scroll"]),
    entry("more", "Viewers", "Simple file viewer", &["view", "read", "pager", "display"]),
    entry("chmod", "Permissions", "Change file permissions", &["permissions", "access", "rights", "mode"]),
    entry("chown", "Permissions", "Change file owner and group", &["owner", "ownership", "user", "group"]),
    entry("umask", "Permissions", "Set the default permission mask", &["default", "permissions", "mask"]),
    entry("stat", "Permissions", "Display file metadata", &["info", "details", "metadata", "attributes"]),
    entry("find", "Search", "Search for files in a hierarchy", &["search", "locate", "files", "directories"]),
    entry("locate", "Search", "Find files by name quickly", &["search", "find", "quick", "database"]),
    entry("which", "Search", "Locate a command in PATH", &["find", "command", "location", "path"]),
    entry("whereis", "Search", "Locate the binary and manual of a command", &["find", "locate", "binary", "manual"]),
    entry("ps", "Processes", "Report process status", &["processes", "running", "tasks", "list"]),
    entry("kill", "Processes", "Send a signal to a process or job", &["stop", "end", "terminate", "signal"]),
    entry("jobs", "Processes", "List background jobs", &["background", "tasks", "jobs"]),
    entry("fg", "Processes", "Bring a job to the foreground", &["foreground", "resume", "job"]),
    entry("bg", "Processes", "Resume a job in the background", &["background", "resume", "job"]),
    entry("sleep", "Processes", "Delay for a given time", &["wait", "pause", "delay", "timer"]),
    entry("export", "Environment", "Set environment variables", &["variable", "environment", "set", "define"]),
    entry("env", "Environment", "Print or change the environment", &["variables", "environment", "list", "show"]),
    entry("unset", "Environment", "Remove environment variables", &["variable", "remove", "delete"]),
    entry("su", "Users", "Switch user", &["switch", "user", "root", "login"]),
    entry("sudo", "Users", "Run a command as root", &["root", "admin", "superuser", "privilege"]),
    entry("whoami", "Users", "Print the current user name", &["user", "current", "who", "username"]),
    entry("id", "Users", "Print user and group ids", &["uid", "gid", "identity", "groups"]),
    entry("groups", "Users", "Print group memberships", &["group", "membership", "user"]),
    entry("useradd", "Users", "Create a user account", &["create", "account", "user", "new"]),
    entry("usermod", "Users", "Modify a user account", &["modify", "account", "group", "change"]),
    entry("userdel", "Users", "Delete a user account", &["delete", "account", "remove", "user"]),
    entry("groupadd", "Users", "Create a group", &["create", "group", "new"]),
    entry("man", "Help", "Display manual pages", &["help", "manual", "documentation", "reference"]),
    entry("help", "Help", "Display help for commands", &["help", "commands", "usage", "guide"]),
    entry("search", "Help", "Search the command catalog", &["search", "find", "keyword", "catalog"]),
    entry("history", "Help", "Show command history", &["history", "commands", "past", "previous"]),
    entry("reset", "System", "Reset the filesystem to its default", &["reset", "restore", "restart", "default"]),
    entry("clear", "System", "Clear the terminal screen", &["clear", "clean", "screen"]),
    entry("date", "System", "Print the date and time", &["date", "time", "clock", "calendar"]),
    entry("hostname", "System", "Show or set the host name", &["host", "name", "machine", "network"]),
];

const MAX_RESULTS: usize = 10;
const EXACT_SCORE: u32 = 10;
const PARTIAL_SCORE: u32 = 3;

lazy_static! {
    /// Lowercase term -> indexes into `ENTRIES`. Terms are command names,
    /// keywords, and description words longer than two letters.
    static ref INDEX: HashMap<String, Vec<usize>> = {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, e) in ENTRIES.iter().enumerate() {
            let words = e
                .description
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| w.len() > 2);
            let terms = std::iter::once(e.name).chain(e.keywords.iter().copied()).chain(words);
            for term in terms {
                let ids = index.entry(term.to_lowercase()).or_default();
                if !ids.contains(&i) {
                    ids.push(i);
                }
            }
        }
        index
    };
}

pub fn get(name: &str) -> Option<&'static Entry> {
    ENTRIES.iter().find(|e| e.name == name)
}

/// Entries matching `query`, best first, at most ten.
///
/// Each query word scores 10 for an exact term hit and 3 for every term it
/// contains or is contained in. Ties keep catalog order.
pub fn search(query: &str) -> Vec<&'static Entry> {
    let mut scores: HashMap<usize, u32> = HashMap::new();
    for word in query.split_whitespace().map(str::to_lowercase) {
        if let Some(ids) = INDEX.get(&word) {
            for &i in ids {
                *scores.entry(i).or_default() += EXACT_SCORE;
            }
        }
        for (term, ids) in INDEX.iter() {
            if term.contains(&word) || word.contains(term.as_str()) {
                for &i in ids {
                    *scores.entry(i).or_default() += PARTIAL_SCORE;
                }
            }
        }
    }
    let mut ranked: Vec<(usize, u32)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(MAX_RESULTS).map(|(i, _)| &ENTRIES[i]).collect()
}

/// Entries grouped by category, categories sorted.
pub fn by_category() -> BTreeMap<&'static str, Vec<&'static Entry>> {
    let mut groups: BTreeMap<&'static str, Vec<&'static Entry>> = BTreeMap::new();
    for e in ENTRIES {
        groups.entry(e.category).or_default().push(e);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[&Entry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.name).collect()
    }

    #[test]
    fn test_exact_name_ranks_first() {
        assert_eq!(search("cp").first().map(|e| e.name), Some("cp"));
        assert_eq!(search("chmod").first().map(|e| e.name), Some("chmod"));
    }

    #[test]
    fn test_keyword_search() {
        let found = names(&search("copy"));
        assert_eq!(found.first(), Some(&"cp"));
        let found = names(&search("delete"));
        assert!(found.contains(&"rm"));
        assert!(found.contains(&"rmdir"));
        assert!(found.len() <= 10);
    }

    #[test]
    fn test_case_and_no_match() {
        assert_eq!(search("GREP").first().map(|e| e.name), Some("grep"));
        assert!(search("zzzzqqq").is_empty());
        assert!(search("   ").is_empty());
    }

    #[test]
    fn test_categories() {
        let groups = by_category();
        let keys: Vec<_> = groups.keys().copied().collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(names(&groups["Viewers"]), vec!["less", "more"]);
        assert_eq!(get("nano").map(|e| e.category), Some("Editors"));
    }
}

//! Hand-written manual pages. Commands without one get a page generated
//! from their usage line and summary.

pub struct ManPage {
    pub name: &'static str,
    pub synopsis: &'static str,
    pub description: &'static str,
    pub options: &'static [(&'static str, &'static str)],
    pub examples: &'static [&'static str],
}

pub const PAGES: &[ManPage] = &[
    ManPage {
        name: "ls",
        synopsis: "ls [OPTION]... [FILE]...",
        description: "List information about files and directories.",
        options: &[
            ("-a", "Do not ignore entries starting with ."),
            ("-A", "Like -a, but without . and .."),
            ("-l", "Use a long listing format"),
            ("-h", "With -l, print sizes in human readable format"),
            ("-R", "List subdirectories recursively"),
            ("-t", "Sort by modification time, newest first"),
            ("-r", "Reverse order while sorting"),
            ("-d", "List directories themselves, not their contents"),
            ("-1", "List one file per line"),
        ],
        examples: &[
            "ls              # List files in current directory",
            "ls -la          # List all files with details",
            "ls -lh          # List with human-readable sizes",
            "ls -R           # Recursive listing",
        ],
    },
    ManPage {
        name: "cd",
        synopsis: "cd [DIRECTORY]",
        description: "Change the current working directory.",
        options: &[
            ("~", "Change to home directory"),
            ("-", "Change to previous directory"),
            ("..", "Change to parent directory"),
        ],
        examples: &[
            "cd /home        # Change to /home",
            "cd ~            # Change to home directory",
            "cd ..           # Go up one directory",
            "cd -            # Go to previous directory",
        ],
    },
    ManPage {
        name: "pwd",
        synopsis: "pwd [-L|-P]",
        description: "Print the full pathname of the current working directory.",
        options: &[("-L", "Print the logical directory (default)"), ("-P", "Print the physical directory")],
        examples: &["pwd             # Show current directory"],
    },
    ManPage {
        name: "cat",
        synopsis: "cat [OPTION]... [FILE]...",
        description: "Concatenate files and print them. With no FILE, read piped input.",
        options: &[
            ("-n", "Number all output lines"),
            ("-b", "Number non-blank output lines"),
            ("-E", "Display $ at end of each line"),
            ("-T", "Display TAB characters as ^I"),
            ("-A", "Equivalent to -ET"),
        ],
        examples: &[
            "cat file.txt    # Display file contents",
            "cat -n file.txt # Display with line numbers",
            "cat file1 file2 # Concatenate files",
        ],
    },
    ManPage {
        name: "mkdir",
        synopsis: "mkdir [OPTION]... DIRECTORY...",
        description: "Create directories.",
        options: &[
            ("-p", "Make parent directories as needed, no error if existing"),
            ("-m MODE", "Set file mode (permissions)"),
            ("-v", "Print a message for each created directory"),
        ],
        examples: &[
            "mkdir newdir    # Create directory",
            "mkdir -p a/b/c  # Create nested directories",
            "mkdir -m 755 dir # Create with specific permissions",
        ],
    },
    ManPage {
        name: "rm",
        synopsis: "rm [OPTION]... FILE...",
        description: "Remove files or directories.",
        options: &[
            ("-f", "Ignore nonexistent files"),
            ("-r, -R", "Remove directories and their contents"),
            ("-d", "Remove empty directories"),
            ("-v", "Explain what is being done"),
        ],
        examples: &["rm file.txt     # Remove file", "rm -r directory # Remove directory recursively"],
    },
    ManPage {
        name: "cp",
        synopsis: "cp [OPTION]... SOURCE... DEST",
        description: "Copy files and directories.",
        options: &[
            ("-r, -R", "Copy directories recursively"),
            ("-f", "Remove a destination that cannot be opened and try again"),
            ("-p", "Preserve mode, ownership and timestamps"),
            ("-a", "Same as -rp"),
            ("-v", "Explain what is being done"),
        ],
        examples: &[
            "cp file1 file2  # Copy file1 to file2",
            "cp -r dir1 dir2 # Copy directory",
            "cp -p file1 file2 # Preserve attributes",
        ],
    },
    ManPage {
        name: "mv",
        synopsis: "mv [OPTION]... SOURCE... DEST",
        description: "Move (rename) files.",
        options: &[
            ("-f", "Do not prompt before overwriting"),
            ("-n", "Do not overwrite an existing file"),
            ("-v", "Explain what is being done"),
        ],
        examples: &["mv file1 file2  # Rename file1 to file2", "mv file dir/    # Move file to directory"],
    },
    ManPage {
        name: "chmod",
        synopsis: "chmod [OPTION]... MODE FILE...",
        description: "Change file mode bits (permissions).",
        options: &[
            ("-R", "Change files and directories recursively"),
            ("-v", "Output a diagnostic for every file processed"),
            ("-c", "Like verbose but report only when a change is made"),
            ("-f", "Suppress most error messages"),
        ],
        examples: &[
            "chmod 755 file  # rwxr-xr-x",
            "chmod 644 file  # rw-r--r--",
            "chmod +x file   # Add execute permission",
            "chmod u=rw,go=r file # Symbolic modes",
        ],
    },
    ManPage {
        name: "chown",
        synopsis: "chown [OPTION]... OWNER[:GROUP] FILE...",
        description: "Change file owner and group.",
        options: &[
            ("-R", "Operate on files and directories recursively"),
            ("-v", "Output a diagnostic for every file processed"),
            ("-c", "Like verbose but report only when a change is made"),
        ],
        examples: &[
            "chown user file   # Change owner",
            "chown user:group file # Change owner and group",
            "chown -R user dir # Recursive change",
        ],
    },
    ManPage {
        name: "grep",
        synopsis: "grep [OPTION]... PATTERN [FILE]...",
        description: "Search for PATTERN in each FILE, or in piped input.",
        options: &[
            ("-i", "Ignore case distinctions"),
            ("-v", "Select non-matching lines"),
            ("-n", "Print line numbers"),
            ("-r", "Search directories recursively"),
            ("-c", "Print count of matching lines"),
            ("-l", "Print only names of files with matches"),
            ("-w", "Match whole words only"),
        ],
        examples: &[
            "grep \"text\" file # Search for text in file",
            "grep -i \"text\" file # Case-insensitive search",
            "grep -rn todo .  # Recursive search with line numbers",
        ],
    },
    ManPage {
        name: "find",
        synopsis: "find [PATH]... [EXPRESSION]",
        description: "Search for files in a directory hierarchy.",
        options: &[
            ("-name PATTERN", "Search by name"),
            ("-iname PATTERN", "Like -name, ignoring case"),
            ("-type f|d", "Search by type (file/directory)"),
            ("-size [+|-]N[ckMG]", "Search by size"),
            ("-perm [-/]MODE", "Search by permissions"),
            ("-user NAME, -group NAME", "Search by owner or group"),
            ("-maxdepth N, -mindepth N", "Limit the search depth"),
        ],
        examples: &[
            "find . -name \"*.txt\"  # Find all .txt files",
            "find . -type d        # Find directories only",
            "find . -size +1M      # Files larger than 1MB",
        ],
    },
    ManPage {
        name: "ps",
        synopsis: "ps [aux | -ef]",
        description: "Report a snapshot of current processes.",
        options: &[
            ("a", "Show processes for all users"),
            ("u", "Display user-oriented format"),
            ("x", "Show processes without controlling terminal"),
            ("-e", "Select all processes"),
            ("-f", "Full-format listing"),
        ],
        examples: &["ps              # Show your processes", "ps aux          # Show all processes"],
    },
    ManPage {
        name: "kill",
        synopsis: "kill [-SIGNAL] PID|%JOB...",
        description: "Send a signal to a process or job.",
        options: &[
            ("-9, -KILL", "Force kill"),
            ("-15, -TERM", "Terminate gracefully (default)"),
            ("-STOP, -CONT", "Stop or continue a job"),
            ("-l", "List all signal names"),
        ],
        examples: &[
            "kill 1234       # Terminate process 1234",
            "kill -9 %1      # Force kill job 1",
            "kill -l         # List signals",
        ],
    },
    ManPage {
        name: "man",
        synopsis: "man [-k KEYWORD] COMMAND",
        description: "Display manual pages for commands.",
        options: &[("COMMAND", "The command to show the manual for"), ("-k KEYWORD", "Search page descriptions")],
        examples: &[
            "man ls          # Show manual for ls",
            "man -k copy     # Find commands about copying",
            "man man         # Show this manual",
        ],
    },
    ManPage {
        name: "help",
        synopsis: "help [COMMAND]",
        description: "Display help information about commands.",
        options: &[("COMMAND", "Optional command to get specific help")],
        examples: &["help            # Show all available commands", "help ls         # Show help for ls"],
    },
];

pub fn find(name: &str) -> Option<&'static ManPage> {
    PAGES.iter().find(|p| p.name == name)
}

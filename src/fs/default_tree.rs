//! Seed filesystem used for new sessions and whenever saved state is rejected.

use crate::fs::types::FsNode;
use crate::users::UserRegistry;

const REPORT: &str = "This is a sample report file.\nIt contains some important information.\n";
const NOTES: &str = "# My Notes\n\n- Idea 1\n- Idea 2\n- Idea 3\n";
const INDEX_HTML: &str = "<!DOCTYPE html>\n<html>\n<head>\n  <title>My Blog</title>\n  <link rel=\"stylesheet\" href=\"style.css\">\n</head>\n<body>\n  <h1>Welcome to my blog</h1>\n  <script src=\"script.js\"></script>\n</body>\n</html>\n";
const STYLE_CSS: &str = "body { color: blue; }\n";
const SCRIPT_JS: &str = "// JavaScript code\n";
const MAIN_PY: &str = "print(\"Hello Game!\")\n";
const README: &str = "Welcome to your simulated home directory!\n\nTry `ls -l` for more details.\n";

fn user_file(content: &str) -> FsNode {
    FsNode::file("user", "user", 0o644, content)
}

fn user_dir() -> FsNode {
    FsNode::directory("user", "user", 0o755)
}

fn root_dir(mode: u32) -> FsNode {
    FsNode::directory("root", "root", mode)
}

pub fn default_tree(users: &UserRegistry) -> FsNode {
    let home_user = user_dir()
        .with_child(
            "documents",
            user_dir()
                .with_child("report.txt", user_file(REPORT))
                .with_child("notes.md", user_file(NOTES)),
        )
        .with_child(
            "projects",
            user_dir()
                .with_child(
                    "my_blog",
                    user_dir()
                        .with_child("index.html", user_file(INDEX_HTML))
                        .with_child("style.css", user_file(STYLE_CSS))
                        .with_child("script.js", user_file(SCRIPT_JS)),
                )
                .with_child(
                    "game_dev",
                    user_dir()
                        .with_child("main.py", user_file(MAIN_PY))
                        .with_child("assets", user_dir()),
                ),
        )
        .with_child("downloads", user_dir())
        .with_child("README.txt", user_file(README));

    let home = root_dir(0o755)
        .with_child("user", home_user)
        .with_child("guest", FsNode::directory("guest", "guest", 0o755));

    let etc = root_dir(0o755)
        .with_child("passwd", FsNode::file("root", "root", 0o644, &users.render_passwd()))
        .with_child("group", FsNode::file("root", "root", 0o644, &users.render_group()))
        .with_child("hostname", FsNode::file("root", "root", 0o644, "localhost\n"));

    let dev = root_dir(0o755).with_child("null", FsNode::file("root", "root", 0o666, ""));

    root_dir(0o755)
        .with_child("home", home)
        .with_child("root", root_dir(0o700))
        .with_child("etc", etc)
        .with_child("tmp", root_dir(0o1777))
        .with_child("usr", root_dir(0o755).with_child("bin", root_dir(0o755)))
        .with_child("dev", dev)
}

// src/commands/mod.rs
pub mod accounts;
pub mod args;
pub mod cat;
pub mod cd_cmd;
pub mod chmod;
pub mod chown_cmd;
pub mod clear_cmd;
pub mod cp;
pub mod date;
pub mod echo;
pub mod env;
pub mod find;
pub mod grep;
pub mod head;
pub mod help_cmd;
pub mod history_cmd;
pub mod hostname_cmd;
pub mod id_cmd;
pub mod jobs_cmd;
pub mod kill_cmd;
pub mod locate_cmd;
pub mod ls;
pub mod man_cmd;
pub mod mkdir;
pub mod mv;
pub mod nano_cmd;
pub mod pager;
pub mod ps_cmd;
pub mod pwd;
pub mod registry;
pub mod reset_cmd;
pub mod rm;
pub mod rmdir_cmd;
pub mod search;
pub mod sed;
pub mod sleep_cmd;
pub mod sort;
pub mod stat_cmd;
pub mod su_cmd;
pub mod suggest;
pub mod tail;
pub mod touch;
pub mod types;
pub mod umask_cmd;
pub mod uniq;
pub mod utils;
pub mod wc;
pub mod which_cmd;
pub mod whoami_cmd;

pub use args::{ArgSpec, ParsedArgs};
pub use registry::{create_default_registry, dispatch, CommandRegistry};
pub use types::{Command, CommandContext, CommandResult, Invocation};

//! Line-oriented shell driving one [`auth_session::SessionStore`] from stdin.

pub mod commands;
pub mod shell;

pub use commands::{parse_command, ShellCommand};
pub use shell::{describe_state, run_shell, Registrar};

pub mod commands;
pub mod core;
pub mod forms;
pub mod help;
pub mod io;
pub mod output;
pub mod prompts;
pub mod registry;
pub mod script;
mod shell;
pub mod shell_context;
pub mod system_clock;
pub mod views;

pub use shell::run_cli;

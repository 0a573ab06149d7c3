mod commands;
mod root;

pub use commands::*;
pub use root::Cli;

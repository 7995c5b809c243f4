pub mod cli;

pub use cli::{ClearingArgs, Cli, Commands, GraphCommands, NetworkSource, OutputFormat};

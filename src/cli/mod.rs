pub mod commands;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, GenerateArgs, OutputFormatArg};
pub use output::{OutputFormat, OutputFormatter};

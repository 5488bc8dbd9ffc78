use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Liberty feature generation from compiled application classes
#[derive(Parser, Debug)]
#[command(
    name = "featurescan",
    about = "Generate Liberty features from compiled application classes",
    version,
    author,
    long_about = "featurescan runs the binary scanner over an application's class files \
                  and reports the Liberty features the application needs. When the scanner \
                  finds a conflict it rescans every class directory and suggests a working \
                  feature set."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Verbose output, including the scanner's own diagnostics"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate the features an application needs",
        long_about = "Scans class files or class directories with the binary scanner and \
                      prints the resulting Liberty features.\n\n\
                      Examples:\n  \
                      featurescan generate --scanner binary-app-scanner.jar --class-dir target/classes\n  \
                      featurescan generate --class-dir target/classes --feature servlet-4.0 --target-ee 8.0\n  \
                      featurescan generate --class-dir target/classes --optimize --format json"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Show the effective configuration",
        long_about = "Prints the configuration assembled from FEATURESCAN_* environment \
                      variables.\n\n\
                      Examples:\n  \
                      featurescan config\n  \
                      featurescan config --format yaml"
    )]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        short = 's',
        long,
        value_name = "PATH",
        help = "Binary scanner artifact (defaults to FEATURESCAN_SCANNER)"
    )]
    pub scanner: Option<PathBuf>,

    #[arg(
        long = "class-dir",
        value_name = "DIR",
        help = "Directory holding compiled application classes (repeatable)"
    )]
    pub class_dirs: Vec<String>,

    #[arg(
        long = "class-file",
        value_name = "FILE",
        help = "Class file to scan when not optimizing (repeatable)"
    )]
    pub class_files: Vec<String>,

    #[arg(
        long = "feature",
        value_name = "NAME",
        help = "Feature already configured for the server (repeatable)"
    )]
    pub features: Vec<String>,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Java EE / Jakarta EE level, e.g. 8.0 or ee8"
    )]
    pub target_ee: Option<String>,

    #[arg(
        long,
        value_name = "VERSION",
        help = "MicroProfile level, e.g. 4.1 or mp4.1"
    )]
    pub target_mp: Option<String>,

    #[arg(long, help = "Scan every class directory instead of the listed class files")]
    pub optimize: bool,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory for the scanner's own log (used with debug logging)"
    )]
    pub log_location: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

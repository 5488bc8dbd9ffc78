use featurescan::cli::commands::{CliArgs, Commands, ConfigArgs, GenerateArgs};
use featurescan::cli::output::{OutputFormat, OutputFormatter};
use featurescan::scanner::versions::{
    java_ee_target, microprofile_target, supported_microprofile_versions,
};
use featurescan::util::logging::{init_from_env, init_logging, parse_level, LoggingConfig};
use featurescan::{FeaturescanConfig, PlatformSpec, ResolveRequest, NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::{debug, error, info, warn, Level};

const EXIT_RESOLVED: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFLICT: i32 = 2;

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args, args.verbose),
        Commands::Config(config_args) => handle_config(config_args),
    };

    process::exit(exit_code);
}

/// Command-line flags override `FEATURESCAN_LOG_LEVEL`; everything else
/// comes from the environment.
fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        init_from_env();
        return;
    };

    init_logging(LoggingConfig {
        level,
        ..LoggingConfig::from_env()
    });
}

fn handle_generate(args: &GenerateArgs, verbose: bool) -> i32 {
    info!("Generating Liberty features");

    let default_config = FeaturescanConfig::default();
    let config = FeaturescanConfig {
        scanner_path: args.scanner.clone().or(default_config.scanner_path),
        log_location: args.log_location.clone().or(default_config.log_location),
        ..default_config
    };

    if let Err(e) = config.validate() {
        error!("{}", e);
        return EXIT_FAILURE;
    }
    debug!("{}", config);

    let platform = match platform_from_args(args) {
        Ok(platform) => platform,
        Err(message) => {
            error!("{}", message);
            return EXIT_FAILURE;
        }
    };

    let mut request = ResolveRequest::new()
        .with_current_features(args.features.iter().cloned())
        .with_platform(platform)
        .optimized(args.optimize);
    if !args.class_dirs.is_empty() {
        request = request.with_class_directories(args.class_dirs.iter().cloned());
    }
    if !args.class_files.is_empty() {
        request = request.with_class_files(args.class_files.iter().cloned());
    }
    if let Some(location) = &config.log_location {
        request = request.with_log_location(location.clone());
    }

    let mut resolver = config.create_resolver();
    if verbose {
        resolver = resolver.with_diagnostics(true);
    }

    let outcome = match resolver.resolve_features(&request) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{}", e);
            return EXIT_FAILURE;
        }
    };

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    match formatter.format(&outcome) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            return EXIT_FAILURE;
        }
    }

    if outcome.is_resolved() {
        info!("Feature generation complete");
        EXIT_RESOLVED
    } else {
        if let Some(message) = outcome.user_message() {
            warn!("{}", message);
        }
        EXIT_CONFLICT
    }
}

fn handle_config(args: &ConfigArgs) -> i32 {
    let config = FeaturescanConfig::default();
    if let Err(e) = config.validate() {
        warn!("{}", e);
    }

    match OutputFormatter::new(OutputFormat::from(args.format)).format_config(&config) {
        Ok(output) => {
            println!("{}", output.trim_end());
            EXIT_RESOLVED
        }
        Err(e) => {
            error!("Failed to format configuration: {:#}", e);
            EXIT_FAILURE
        }
    }
}

fn platform_from_args(args: &GenerateArgs) -> Result<PlatformSpec, String> {
    let target_java_ee = match &args.target_ee {
        Some(version) => Some(
            java_ee_target(version)
                .ok_or_else(|| {
                    format!(
                        "Unsupported Java EE / Jakarta EE version: {}. Valid options: 6, 7, 8, 9",
                        version
                    )
                })?
                .to_string(),
        ),
        None => None,
    };

    let target_microprofile = match &args.target_mp {
        Some(version) => Some(
            microprofile_target(version)
                .ok_or_else(|| {
                    format!(
                        "Unsupported MicroProfile version: {}. Valid options: {}",
                        version,
                        supported_microprofile_versions().collect::<Vec<_>>().join(", ")
                    )
                })?
                .to_string(),
        ),
        None => None,
    };

    Ok(PlatformSpec::new(target_java_ee, target_microprofile))
}

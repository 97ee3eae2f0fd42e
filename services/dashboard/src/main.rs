//! Dashboard CLI
//!
//! Resolves settings and drives dark-field calibration from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dashboard::{
    load_config, run_calibration, ApiVariant, Config, DarkFieldApi, DarkFieldRequest,
    RuntimeEnvironment, ServiceSelector,
};
use tracing::Level;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Settings and dark-field calibration for Rusty Photon")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Runtime environment (overrides config file and DASHBOARD_ENV)
    #[arg(long)]
    env: Option<RuntimeEnvironment>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = parse_log_level)]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the setting at PATH (e.g. camera/cooling/target)
    Setting {
        path: String,
    },

    /// List every setting path
    Settings,

    /// Run a dark-field calibration sequence
    Calibrate {
        /// Shortest exposure in seconds
        #[arg(long, default_value_t = 1.0)]
        min_exposure: f64,

        /// Longest exposure in seconds
        #[arg(long, default_value_t = 60.0)]
        max_exposure: f64,

        /// Number of exposures between min and max
        #[arg(long, default_value_t = 5)]
        steps: u32,

        /// Frames captured per exposure
        #[arg(long, default_value_t = 10)]
        frames: u32,

        /// Binning factor
        #[arg(long, default_value_t = 1)]
        binning: u8,

        /// Sensor target temperature in °C
        #[arg(long, allow_hyphen_values = true)]
        temperature: Option<f64>,
    },

    /// Stop the running calibration sequence.
    ///
    /// In development each invocation gets a fresh simulation, so this always
    /// reports that no sequence is running.
    Stop,

    /// Show calibration status and the dark library.
    ///
    /// In development each invocation gets a fresh simulation, so this always
    /// reports an idle sequence and an empty library.
    Status,
}

fn parse_log_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid log level: {}. Use: trace, debug, info, warn, error",
            s
        )
    })
}

/// The simulation lives only as long as this process
fn warn_if_simulated(api: &dyn DarkFieldApi) {
    if api.variant() == ApiVariant::Mock {
        tracing::warn!("Simulated calibration does not persist between invocations");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, env={:?}, log_level={:?}",
        args.config,
        args.env,
        args.log_level
    );

    let config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    let environment = args.env.unwrap_or_else(|| config.environment());
    tracing::info!("Runtime environment: {}", environment);

    match args.command {
        Commands::Setting { path } => match config.settings.resolve_str(&path) {
            Some(setting) => println!("{}", serde_json::to_string_pretty(setting)?),
            None => {
                return Err(format!("No setting at '{}'", path).into());
            }
        },
        Commands::Settings => {
            for path in config.settings.paths() {
                println!("{}", path);
            }
        }
        Commands::Calibrate {
            min_exposure,
            max_exposure,
            steps,
            frames,
            binning,
            temperature,
        } => {
            let request = DarkFieldRequest {
                min_exposure_secs: min_exposure,
                max_exposure_secs: max_exposure,
                exposure_steps: steps,
                frames_per_exposure: frames,
                binning,
                target_temperature: temperature,
            };
            let poll_interval = config.calibration.poll_interval;
            let api = ServiceSelector::new(config, environment).create_dark_field_api();
            let progress = run_calibration(api.as_ref(), &request, poll_interval).await?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        Commands::Stop => {
            let api = ServiceSelector::new(config, environment).create_dark_field_api();
            warn_if_simulated(api.as_ref());
            let progress = api.stop().await?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        Commands::Status => {
            let api = ServiceSelector::new(config, environment).create_dark_field_api();
            warn_if_simulated(api.as_ref());
            let status = api.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}

use crate::Args;
use crate::config::resolve_config;
use crate::errors::AppError;
use rockbim_scene::convert;
use tracing::info;

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
}

/// `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level)),
        )
        .with_target(false)
        .init();
}

pub fn run(args: Args) -> Result<(), AppError> {
    init_logging(&LoggingConfig {
        level: args.log_level.clone(),
    });

    let config = resolve_config(&args)?;
    info!(
        "Converting {} trajectories (gap {} m, colour {})",
        config.trajectories.len(),
        config.gap_length,
        config.color_mode
    );

    let summary = convert(&config)?;
    info!(
        "Scenario '{}': {} trajectories, {} rocks, {} styles -> {} ({})",
        summary.scenario,
        summary.trajectories,
        summary.instances,
        summary.styles,
        summary.output.display(),
        summary.format
    );
    Ok(())
}

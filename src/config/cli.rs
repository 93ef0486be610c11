use clap::Parser;

use crate::config::toml_config::TomlConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "hotel-dashboard")]
#[command(about = "Hotel KPI dashboard fed from an Odoo server")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    pub config: String,

    /// Read records from a JSON snapshot instead of the server
    #[arg(long)]
    pub snapshot: Option<String>,

    /// Override the output format (json or text)
    #[arg(long)]
    pub format: Option<String>,

    /// Override the output directory
    #[arg(long)]
    pub output_path: Option<String>,

    /// Override the time zone used for "today"
    #[arg(long)]
    pub timezone: Option<String>,

    /// Keep running and refresh every N seconds
    #[arg(long)]
    pub watch: Option<u64>,

    /// Print the web link of a dashboard action (e.g. view-rooms) and exit
    #[arg(long)]
    pub action: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Applies command-line overrides on top of the file configuration.
    pub fn apply(&self, config: &mut TomlConfig) {
        if let Some(format) = &self.format {
            config.output.format = format.clone();
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if let Some(zone) = &self.timezone {
            config.dashboard.timezone = Some(zone.clone());
        }
        if let Some(interval) = self.watch {
            config.dashboard.refresh_interval_seconds = Some(interval);
        }
    }

    pub fn verbose(&self, config: &TomlConfig) -> bool {
        self.verbose || config.verbose()
    }
}

//! Command-line flags.
//!
//! Flags override the settings file, which overrides built-in defaults.

use clap::Parser;
use std::path::PathBuf;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::ServiceConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "status-checker")]
#[command(about = "Probes HTTP endpoints and streams their status to a live dashboard", long_about = None)]
pub struct Cli {
    /// Path to the JSON endpoint list
    #[arg(short = 'c', long = "config")]
    pub endpoints: Option<PathBuf>,

    /// Directory of static dashboard files
    #[arg(short = 's', long = "static")]
    pub static_dir: Option<PathBuf>,

    /// Directory where the status snapshot is persisted
    #[arg(short = 'd', long = "data")]
    pub data_dir: Option<PathBuf>,

    /// Probe timeout in seconds
    #[arg(short = 't', long = "timeout")]
    pub timeout_secs: Option<u64>,

    /// Seconds to wait between probe rounds
    #[arg(short = 'i', long = "interval")]
    pub interval_secs: Option<u64>,

    /// Address to serve the dashboard on (host:port, or :port for all interfaces)
    #[arg(short = 'b', long = "bind")]
    pub bind_address: Option<String>,

    /// Optional TOML settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective settings: file (if any), then flag overrides.
    ///
    /// Validation runs once on the merged result, so a flag can repair a bad file value.
    pub fn resolve(self) -> Result<ServiceConfig, ConfigError> {
        let base = match &self.settings {
            Some(path) => read_config(path)?,
            None => ServiceConfig::default(),
        };
        let config = self.apply(base);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(path) = self.endpoints {
            config.dashboard.endpoints_path = path;
        }
        if let Some(dir) = self.static_dir {
            config.dashboard.static_dir = dir;
        }
        if let Some(dir) = self.data_dir {
            config.storage.data_dir = dir;
        }
        if let Some(secs) = self.timeout_secs {
            config.probe.timeout_secs = secs;
        }
        if let Some(secs) = self.interval_secs {
            config.probe.interval_secs = secs;
        }
        if let Some(addr) = self.bind_address {
            config.listener.bind_address = addr;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "status-checker", "-c", "/etc/endpoints.json", "-t", "3", "--interval", "15", "-d", "/tmp/status",
        ])
        .unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.dashboard.endpoints_path, PathBuf::from("/etc/endpoints.json"));
        assert_eq!(config.probe.timeout_secs, 3);
        assert_eq!(config.probe.interval_secs, 15);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/status"));
        assert_eq!(config.dashboard.static_dir, PathBuf::from("./static"));
    }

    #[test]
    fn test_positional_arguments_rejected() {
        assert!(Cli::try_parse_from(["status-checker", "extra"]).is_err());
    }

    #[test]
    fn test_zero_timeout_flag_fails_validation() {
        let cli = Cli::try_parse_from(["status-checker", "-t", "0"]).unwrap();
        assert!(matches!(cli.resolve(), Err(ConfigError::Validation(_))));
    }

    fn settings_file(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("status-checker-settings-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_flag_overrides_invalid_file_value() {
        let path = settings_file("[probe]\ntimeout_secs = 0\ninterval_secs = 7\n");
        let cli = Cli::try_parse_from([
            "status-checker", "--settings", path.to_str().unwrap(), "-t", "5",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.probe.timeout_secs, 5);
        assert_eq!(config.probe.interval_secs, 7);

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_invalid_file_value_without_override_fails() {
        let path = settings_file("[probe]\ntimeout_secs = 0\n");
        let cli = Cli::try_parse_from(["status-checker", "--settings", path.to_str().unwrap()]).unwrap();

        assert!(matches!(cli.resolve(), Err(ConfigError::Validation(_))));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_go_style_bind_flag() {
        let cli = Cli::try_parse_from(["status-checker", "-b", ":9000"]).unwrap();
        let config = cli.resolve().unwrap();
        assert_eq!(config.listener.bind_target(), "0.0.0.0:9000");
    }
}

//! Command-line arguments of the `ppa-sim` binary.

use std::path::PathBuf;

use clap::Parser;

/// Preset used when neither `--scenario` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "demo";

/// Wind PPA cost simulator for industrial load profiles.
#[derive(Parser, Debug)]
#[command(name = "ppa-sim", version, about, long_about = None)]
pub struct Cli {
    /// Load scenario from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (demo, capture)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Export result rows to CSV
    #[arg(long, value_name = "PATH")]
    pub results_out: Option<PathBuf>,

    /// Simulate only the profile with this id
    #[arg(long, value_name = "ID")]
    pub profile: Option<u32>,

    /// Log level (overrides RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<tracing::Level>,

    /// Serve results over HTTP after the run
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

impl Cli {
    /// Preset to load when no scenario file is given.
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or(DEFAULT_PRESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supports_scenario_cli() {
        let cli = Cli::try_parse_from(["ppa-sim", "--scenario", "scenario.toml"])
            .expect("parse should succeed");
        assert_eq!(
            cli.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenario.toml")
        );
        assert!(cli.preset.is_none());
    }

    #[test]
    fn defaults_to_demo_preset() {
        let cli = Cli::try_parse_from(["ppa-sim"]).expect("parse should succeed");
        assert_eq!(cli.preset_name(), "demo");
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn scenario_and_preset_conflict() {
        let res = Cli::try_parse_from(["ppa-sim", "--scenario", "a.toml", "--preset", "demo"]);
        assert!(res.is_err());
    }

    #[test]
    fn parses_profile_and_level() {
        let cli = Cli::try_parse_from(["ppa-sim", "--profile", "3", "--log-level", "debug"])
            .expect("parse should succeed");
        assert_eq!(cli.profile, Some(3));
        assert_eq!(cli.log_level, Some(tracing::Level::DEBUG));
    }
}

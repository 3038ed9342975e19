//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::pipeline::setlist::{Intensity, ParamsError, SetlistParams};
use crate::source::{DEFAULT_API_BASE, DEFAULT_MODEL, GeminiConfig};

/// Command-line arguments for vibera
#[derive(Parser, Debug, Clone)]
#[command(name = "vibera")]
#[command(about = "Terminal AI DJ: generates a setlist and mixes it across two virtual decks")]
#[command(version)]
pub struct Args {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for the setlist and the caption
    #[arg(long, default_value = DEFAULT_MODEL, env = "VIBERA_MODEL")]
    pub model: String,

    /// Base URL of the generative language API
    #[arg(long, default_value = DEFAULT_API_BASE, env = "VIBERA_API_BASE")]
    pub api_base: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "60", env = "VIBERA_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Where logs go (the terminal belongs to the UI)
    #[arg(long, env = "VIBERA_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Preset for the scene field
    #[arg(long, default_value = "House Party")]
    pub scene: String,

    /// Preset for the music profile field
    #[arg(long, default_value = "Global Top 40")]
    pub profile: String,

    /// Preset set length in minutes
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(15..=240))]
    pub duration: u32,

    /// Preset energy: chill, mid, high or peak
    #[arg(long, default_value = "mid")]
    pub intensity: Intensity,
}

impl Args {
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig::new(self.api_key.clone())
            .with_api_base(self.api_base.clone())
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn setup_params(&self) -> Result<SetlistParams, ParamsError> {
        SetlistParams::new(&self.scene, &self.profile, self.duration, self.intensity)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("vibera.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_the_form() {
        let args = Args::try_parse_from(["vibera"]).unwrap();
        let params = args.setup_params().unwrap();
        assert_eq!(params, SetlistParams::default());
        assert_eq!(args.gemini_config().model, DEFAULT_MODEL);
    }

    #[test]
    fn presets_override_the_form() {
        let args = Args::try_parse_from([
            "vibera",
            "--scene",
            "Wedding",
            "--profile",
            "Afrobeat",
            "--duration",
            "120",
            "--intensity",
            "peak",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        let params = args.setup_params().unwrap();
        assert_eq!(params.scene, "Wedding");
        assert_eq!(params.intensity, Intensity::Peak);
        assert_eq!(params.duration_minutes, 120);
        assert_eq!(args.gemini_config().timeout, Duration::from_secs(5));
    }

    #[test]
    fn out_of_range_duration_is_rejected() {
        assert!(Args::try_parse_from(["vibera", "--duration", "500"]).is_err());
        assert!(Args::try_parse_from(["vibera", "--intensity", "loud"]).is_err());
    }
}

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::audio::CaptureConstraints;
use crate::session::{SessionConfig, MAX_RECORDING_SECS};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureSettings,
    pub analysis: AnalysisSettings,
    pub progress: ProgressSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub max_duration_secs: u32,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub sample_rate: u32,
    /// Emission period of the simulated microphone
    pub fragment_interval_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        let constraints = CaptureConstraints::default();
        Self {
            max_duration_secs: MAX_RECORDING_SECS,
            echo_cancellation: constraints.echo_cancellation,
            noise_suppression: constraints.noise_suppression,
            sample_rate: constraints.sample_rate,
            fragment_interval_ms: 250,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Simulated classification delay
    pub latency_ms: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self { latency_ms: 2000 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    pub store_path: String,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            store_path: "data/progress.json".to_string(),
        }
    }
}

impl Config {
    /// Load from an optional file, overridden by `EMOTION_PRACTICE__*`
    /// environment variables (e.g. `EMOTION_PRACTICE__ANALYSIS__LATENCY_MS`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("EMOTION_PRACTICE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(
            self.capture.max_duration_secs,
            CaptureConstraints {
                echo_cancellation: self.capture.echo_cancellation,
                noise_suppression: self.capture.noise_suppression,
                sample_rate: self.capture.sample_rate,
            },
        )
    }

    pub fn analysis_latency(&self) -> Duration {
        Duration::from_millis(self.analysis.latency_ms)
    }

    pub fn fragment_interval(&self) -> Duration {
        Duration::from_millis(self.capture.fragment_interval_ms.max(1))
    }
}

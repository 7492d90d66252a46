use std::path::Path;

use anyhow::Context as _;
use cgmath::Point3;
use serde::{Deserialize, Serialize};

/// Runtime settings. Every field has a default, so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Length of one fixed update in seconds.
    pub fixed_step: f32,
    /// Frame deltas above this are clamped before they reach the updates.
    pub max_frame: f32,
    pub explode_seed: u64,
    /// Angular speed of the Jester run cycle in radians per second.
    pub run_speed: f32,
    /// Seconds the light needs to cross the sky once.
    pub day_length: f32,
    pub orbit_radius: f32,
    pub fox_run_coefficient: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixed_step: 1.0 / 60.0,
            max_frame: 1.0,
            explode_seed: 0,
            run_speed: 10.0,
            day_length: 20.0,
            orbit_radius: 80.0,
            fox_run_coefficient: 3.0,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid config")?;
        if config.fixed_step <= 0.0 {
            anyhow::bail!("fixed_step must be positive, got {}", config.fixed_step);
        }
        if config.max_frame <= 0.0 {
            anyhow::bail!("max_frame must be positive, got {}", config.max_frame);
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Per-frame state handed to every flow.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    /// Simulated seconds since start, advanced in fixed steps.
    pub elapsed: f32,
    pub frame: u64,
    /// Eye position renders are sorted against. Flows that steer a camera move it each frame.
    pub camera: Point3<f32>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            elapsed: 0.0,
            frame: 0,
            camera: Point3::new(-2.0, 5.0, 20.0),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Installs `env_logger`. Failing to do so (e.g. a logger is already set) is not fatal.
pub fn init_logging() {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }
}

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};

/// Aggregation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Radius of the entry circle before any growth
    pub initial_radius: f64,
    /// Random walk steps a particle gets before it is discarded
    pub max_walk_steps: usize,
    /// Stop after this many particles even if the boundary has not reached
    /// the field edge (None = run until done)
    pub max_particle_attempts: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            initial_radius: 10.0,
            max_walk_steps: 200,
            max_particle_attempts: None,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.initial_radius.is_finite() || self.initial_radius < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "initial_radius must be finite and non-negative, got {}",
                self.initial_radius
            )));
        }
        if self.max_walk_steps == 0 {
            return Err(Error::InvalidSettings(
                "max_walk_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Metropolis-Hastings parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    /// Half-width of the uniform jump proposal
    pub alpha: f64,
    /// Accepted samples thrown away before output starts
    pub burn: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            burn: 1000,
        }
    }
}

/// Image output parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Gray level of occupied cells
    #[serde(deserialize_with = "clamped_intensity")]
    pub foreground: u8,
    /// Gray level of empty cells
    #[serde(deserialize_with = "clamped_intensity")]
    pub background: u8,
    /// Attachments per GIF frame
    pub frame_stride: usize,
    /// GIF frame delay in hundredths of a second
    pub frame_delay: u16,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            foreground: 255,
            background: 0,
            frame_stride: 25,
            frame_delay: 4,
        }
    }
}

/// Accept any non-negative intensity and clamp it into the 8-bit range
fn clamped_intensity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u64::deserialize(deserializer)?;
    Ok(value.min(u8::MAX as u64) as u8)
}

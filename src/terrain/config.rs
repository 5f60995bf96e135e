//! Planet terrain configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

use super::kernel::VOXELS_PER_AXIS;

/// Noise parameters handed through to the density kernel.
///
/// The core never interprets these; they exist so a host can configure the
/// kernel alongside the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Domain offset applied before sampling
    pub offset: [f32; 3],
    pub amplitude: f32,
    pub frequency: f32,
    pub octaves: u32,
    pub lacunarity: f32,
    pub gain: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            offset: [69.0, 420.0, 1337.0],
            amplitude: 1.5,
            frequency: 0.06,
            octaves: 6,
            lacunarity: 1.7,
            gain: 0.8,
        }
    }
}

/// Configuration for one planet's terrain manager
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    /// Planet radius in world units
    pub planet_radius: f32,
    /// Radius below which the density field reads as water
    pub sea_level: f32,
    /// Rendered margin beyond the planet surface; render radius =
    /// planet_radius + margin
    pub render_radius_margin: f32,
    /// Edge length of octree root cubes
    pub root_node_size: f32,
    /// Cell size at which subdivision stops
    pub min_node_size: f32,
    /// Density samples per chunk axis
    pub voxels_per_axis: u32,
    /// Cap on chunk builds per tick
    pub promotions_per_tick: usize,
    /// Kernel noise parameters
    pub noise: NoiseParams,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            planet_radius: 1000.0,
            sea_level: 1000.0,
            render_radius_margin: 100.0,
            root_node_size: 1024.0,
            min_node_size: 16.0,
            voxels_per_axis: VOXELS_PER_AXIS,
            promotions_per_tick: 1,
            noise: NoiseParams::default(),
        }
    }
}

impl PlanetConfig {
    /// Radius of the sphere the octree forest must cover
    pub fn render_radius(&self) -> f32 {
        self.planet_radius + self.render_radius_margin
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save config to a JSON file (pretty-printed)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

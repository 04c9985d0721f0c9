//! TOML experiment description.
//!
//! ```toml
//! [network]
//! kind = "grid"
//! rows = 10
//! cols = 10
//!
//! [population]
//! n_agents = 500
//! [[population.start_areas]]
//! p1 = { lat = 52.0, lon = 21.0 }
//! p2 = { lat = 52.002, lon = 21.02 }
//!
//! [sim]
//! temperature = 30.0
//!
//! [output]
//! dir = "output/grid"
//! ```
//!
//! Omitted tables and keys take their defaults.  Relative paths are resolved
//! against the directory of the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use st_agent::PopulationConfig;
use st_core::{GeoPoint, SimConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub network:    NetworkConfig,
    pub population: PopulationConfig,
    pub sim:        SimConfig,
    pub output:     OutputConfig,
}

/// Where the road network comes from.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NetworkConfig {
    /// Synthetic grid of two-way roads, see `st_spatial::grid_network`.
    Grid {
        rows:          usize,
        cols:          usize,
        #[serde(default = "default_spacing")]
        spacing_m:     f64,
        #[serde(default = "default_max_speed")]
        max_speed_mps: f64,
        #[serde(default = "default_origin")]
        origin:        GeoPoint,
    },
    /// `nodes.csv` / `edges.csv` tables.
    Csv { nodes: PathBuf, edges: PathBuf },
}

fn default_spacing() -> f64 {
    100.0
}

fn default_max_speed() -> f64 {
    13.9
}

fn default_origin() -> GeoPoint {
    GeoPoint::new(52.0, 21.0)
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig::Grid {
            rows:          10,
            cols:          10,
            spacing_m:     default_spacing(),
            max_speed_mps: default_max_speed(),
            origin:        default_origin(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir:    PathBuf,
    /// Also write every activation, junction, reroute and arrival to
    /// `events.csv`.  Forces the two runs to be sequential.
    pub events: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("output"), events: false }
    }
}

impl ExperimentConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: ExperimentConfig =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.output.dir = base.join(&config.output.dir);
        if let NetworkConfig::Csv { nodes, edges } = &mut config.network {
            *nodes = base.join(&*nodes);
            *edges = base.join(&*edges);
        }
        Ok(config)
    }
}

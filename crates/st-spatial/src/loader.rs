//! Network loaders: CSV node/edge tables and a synthetic grid.
//!
//! # CSV format
//!
//! Two files.  Node ids are arbitrary integers (e.g. OSM ids); they are
//! mapped to dense `NodeId`s in order of appearance.
//!
//! ```csv
//! node_id,lat,lon
//! 1001,52.2297,21.0122
//! 1002,52.2310,21.0122
//! ```
//!
//! ```csv
//! from,to,length_m,max_speed_mps
//! 1001,1002,145.0,13.9
//! ```
//!
//! Edges are directed; two-way roads appear twice.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use st_core::{GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: i64,
    lat:     f64,
    lon:     f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:          i64,
    to:            i64,
    length_m:      f64,
    max_speed_mps: f64,
}

/// A loaded network plus the external id of every node (indexed by `NodeId`).
pub struct LoadedNetwork {
    pub network:      RoadNetwork,
    pub external_ids: Vec<i64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from `nodes.csv`-style and `edges.csv`-style files.
pub fn load_network_csv(nodes: &Path, edges: &Path) -> SpatialResult<LoadedNetwork> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    load_network_reader(nodes, edges)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_reader<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<LoadedNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut by_external: FxHashMap<i64, NodeId> = FxHashMap::default();
    let mut external_ids = Vec::new();

    for row in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = row?;
        if by_external.contains_key(&row.node_id) {
            return Err(SpatialError::Parse(format!("duplicate node id {}", row.node_id)));
        }
        let id = builder.add_node(GeoPoint::new(row.lat, row.lon));
        by_external.insert(row.node_id, id);
        external_ids.push(row.node_id);
    }

    let resolve = |ext: i64| {
        by_external
            .get(&ext)
            .copied()
            .ok_or_else(|| SpatialError::Parse(format!("edge references unknown node {ext}")))
    };

    for row in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row = row?;
        let from = resolve(row.from)?;
        let to = resolve(row.to)?;
        if !(row.length_m.is_finite() && row.length_m >= 0.0) {
            return Err(SpatialError::Parse(format!(
                "edge {}→{} has invalid length {}",
                row.from, row.to, row.length_m
            )));
        }
        if !(row.max_speed_mps.is_finite() && row.max_speed_mps > 0.0) {
            return Err(SpatialError::Parse(format!(
                "edge {}→{} has invalid speed limit {}",
                row.from, row.to, row.max_speed_mps
            )));
        }
        builder.add_directed_edge(from, to, row.length_m, row.max_speed_mps);
    }

    Ok(LoadedNetwork { network: builder.build(), external_ids })
}

/// A `rows × cols` grid of two-way roads.
///
/// Node `(r, c)` gets `NodeId(r * cols + c)` and sits `spacing_m` metres
/// north/east of its neighbours, starting at `origin`.  Edge lengths are the
/// great-circle distances between neighbours, so straight-line bounds are
/// tight.
pub fn grid_network(
    rows:      usize,
    cols:      usize,
    spacing_m: f64,
    max_speed: f64,
    origin:    GeoPoint,
) -> RoadNetwork {
    // Degrees per metre along a meridian / along the origin's parallel.
    let dlat = spacing_m / 111_195.0;
    let dlon = dlat / origin.lat.to_radians().cos().max(1e-6);

    let mut b = RoadNetworkBuilder::with_capacity(rows * cols, 4 * rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            b.add_node(GeoPoint::new(
                origin.lat + r as f64 * dlat,
                origin.lon + c as f64 * dlon,
            ));
        }
    }
    let id = |r: usize, c: usize| NodeId((r * cols + c) as u32);
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                let len = b.node_pos(id(r, c)).distance_m(b.node_pos(id(r, c + 1)));
                b.add_road(id(r, c), id(r, c + 1), len, max_speed);
            }
            if r + 1 < rows {
                let len = b.node_pos(id(r, c)).distance_m(b.node_pos(id(r + 1, c)));
                b.add_road(id(r, c), id(r + 1, c), len, max_speed);
            }
        }
    }
    b.build()
}

//! Density → speed mapping.

use st_core::EdgeId;

/// Speed on an edge holding `density` vehicles.
///
/// Linear from `v_max` at zero density down to `v_min` at capacity, and
/// `v_min` beyond it.  The floor never exceeds `v_max`, so a slow road is
/// never sped up by congestion.  A zero-capacity edge (zero length) is at the
/// floor as soon as anyone is on it.
#[inline]
pub fn speed_for_density(density: f64, max_density: f64, v_max: f64, v_min: f64) -> f64 {
    let floor = v_min.min(v_max);
    let ratio = if max_density > 0.0 {
        (density / max_density).clamp(0.0, 1.0)
    } else if density > 0.0 {
        1.0
    } else {
        0.0
    };
    (v_max * (1.0 - ratio)).max(floor)
}

/// Recompute `speeds` for exactly the edges listed in `new_densities`.
///
/// `max_densities` and `v_max` are indexed by `EdgeId`; edges not listed keep
/// their speed.
pub fn update_weights(
    speeds:        &mut [f64],
    new_densities: &[(EdgeId, f64)],
    max_densities: &[f64],
    v_max:         &[f64],
    v_min:         f64,
) {
    for &(edge, density) in new_densities {
        let i = edge.index();
        speeds[i] = speed_for_density(density, max_densities[i], v_max[i], v_min);
    }
}

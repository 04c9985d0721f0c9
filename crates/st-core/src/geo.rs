//! Geographic coordinate and rectangle-area types.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  The A* heuristic is derived from
//! straight-line distances, and single precision rounding would be enough to
//! make it overestimate on short edges.

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle area on the map, given by two opposite corners
/// in any order.
///
/// Used only to filter candidate origin/destination nodes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub p1: GeoPoint,
    pub p2: GeoPoint,
}

impl Rect {
    pub fn new(p1: GeoPoint, p2: GeoPoint) -> Self {
        Self { p1, p2 }
    }

    /// `true` if the corners coincide on either axis (zero-area rectangle).
    pub fn is_degenerate(&self) -> bool {
        self.p1.lat == self.p2.lat || self.p1.lon == self.p2.lon
    }

    /// South-west corner.
    #[inline]
    pub fn min_corner(&self) -> GeoPoint {
        GeoPoint::new(self.p1.lat.min(self.p2.lat), self.p1.lon.min(self.p2.lon))
    }

    /// North-east corner.
    #[inline]
    pub fn max_corner(&self) -> GeoPoint {
        GeoPoint::new(self.p1.lat.max(self.p2.lat), self.p1.lon.max(self.p2.lon))
    }

    /// Inclusive membership test.
    pub fn contains(&self, p: GeoPoint) -> bool {
        let lo = self.min_corner();
        let hi = self.max_corner();
        (lo.lat..=hi.lat).contains(&p.lat) && (lo.lon..=hi.lon).contains(&p.lon)
    }
}

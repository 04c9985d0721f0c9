//! Unit tests for st-traffic.

use st_core::{EdgeId, GeoPoint, SimTime};
use st_spatial::{RoadNetwork, RoadNetworkBuilder};

use crate::{
    max_densities, speed_for_density, traffic_constants, update_weights, SpeedTracker,
    TrafficError, TrafficState,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Node 0 → node 1 (1000 m, 10 m/s) and node 1 → node 2 (50 m, 20 m/s).
fn two_edge_network() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
    let n1 = b.add_node(GeoPoint::new(0.0, 0.01));
    let n2 = b.add_node(GeoPoint::new(0.0, 0.02));
    b.add_directed_edge(n0, n1, 1000.0, 10.0);
    b.add_directed_edge(n1, n2, 50.0, 20.0);
    b.build()
}

fn state(track: bool) -> TrafficState {
    let net = two_edge_network();
    let constants = traffic_constants(&net, 5.0).unwrap();
    TrafficState::new(constants, 1.0, track).unwrap()
}

const LONG: EdgeId = EdgeId(0);
const SHORT: EdgeId = EdgeId(1);

// ── Constants ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod constants {
    use super::*;

    #[test]
    fn capacity_is_length_over_factor() {
        let net = two_edge_network();
        let c = traffic_constants(&net, 5.0).unwrap();
        assert_eq!(c.max_density, vec![200.0, 10.0]);
        assert_eq!(c.max_speed, vec![10.0, 20.0]);
        assert_eq!(max_densities(&net, 10.0).unwrap(), vec![100.0, 5.0]);
    }

    #[test]
    fn non_positive_factor_rejected() {
        let net = two_edge_network();
        assert!(matches!(
            traffic_constants(&net, 0.0),
            Err(TrafficError::InvalidDensityFactor(_))
        ));
        assert!(max_densities(&net, f64::NAN).is_err());
    }
}

// ── Speed model ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use super::*;

    #[test]
    fn linear_between_free_flow_and_floor() {
        assert_eq!(speed_for_density(0.0, 100.0, 20.0, 1.0), 20.0);
        assert_eq!(speed_for_density(50.0, 100.0, 20.0, 1.0), 10.0);
        assert_eq!(speed_for_density(99.0, 100.0, 20.0, 1.0), 1.0);
    }

    #[test]
    fn over_capacity_clamps_to_floor() {
        assert_eq!(speed_for_density(500.0, 100.0, 20.0, 1.0), 1.0);
    }

    #[test]
    fn floor_never_exceeds_limit() {
        assert_eq!(speed_for_density(0.0, 10.0, 0.5, 1.0), 0.5);
        assert_eq!(speed_for_density(10.0, 10.0, 0.5, 1.0), 0.5);
    }

    #[test]
    fn zero_capacity_edge() {
        assert_eq!(speed_for_density(0.0, 0.0, 10.0, 1.0), 10.0);
        assert_eq!(speed_for_density(1.0, 0.0, 10.0, 1.0), 1.0);
    }

    #[test]
    fn monotone_and_bounded() {
        let mut prev = f64::INFINITY;
        for i in 0..=300 {
            let s = speed_for_density(i as f64, 200.0, 13.9, 1.0);
            assert!(s <= prev);
            assert!((1.0..=13.9).contains(&s));
            prev = s;
        }
    }

    #[test]
    fn update_touches_only_listed_edges() {
        let mut speeds = vec![10.0, 20.0];
        update_weights(&mut speeds, &[(SHORT, 5.0)], &[200.0, 10.0], &[10.0, 20.0], 1.0);
        assert_eq!(speeds, vec![10.0, 10.0]);
    }
}

// ── TrafficState ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod traffic_state {
    use super::*;

    #[test]
    fn starts_free_flow() {
        let s = state(false);
        assert_eq!(s.speeds(), &[10.0, 20.0]);
        assert_eq!(s.densities(), &[0.0, 0.0]);
        assert_eq!(s.occupancy(LONG), 0);
    }

    #[test]
    fn enter_and_leave_move_speed() {
        let mut s = state(false);
        s.enter(LONG);
        assert_eq!(s.speed(LONG), 10.0);
        s.refresh_edges(&[LONG], SimTime(0.0));
        assert!((s.speed(LONG) - 9.95).abs() < 1e-12);
        assert_eq!(s.density(LONG), 1.0);
        s.leave(LONG);
        s.refresh_edges(&[LONG], SimTime(10.0));
        assert_eq!(s.speed(LONG), 10.0);
        assert_eq!(s.occupancy(LONG), 0);
    }

    #[test]
    fn density_clamped_at_capacity() {
        let mut s = state(false);
        for _ in 0..15 {
            s.enter(SHORT);
        }
        s.refresh_edges(&[SHORT], SimTime(0.0));
        assert_eq!(s.occupancy(SHORT), 15);
        assert_eq!(s.density(SHORT), 10.0);
        assert_eq!(s.speed(SHORT), 1.0);
    }

    #[test]
    fn leave_empty_edge_saturates() {
        let mut s = state(false);
        s.leave(SHORT);
        s.refresh_edges(&[SHORT], SimTime(0.0));
        assert_eq!(s.occupancy(SHORT), 0);
        assert_eq!(s.speed(SHORT), 20.0);
    }

    #[test]
    fn invalid_floor_rejected() {
        let net = two_edge_network();
        let c = traffic_constants(&net, 5.0).unwrap();
        assert!(matches!(
            TrafficState::new(c, 0.0, false),
            Err(TrafficError::InvalidMinSpeed(_))
        ));
    }

    #[test]
    fn apply_densities_clamps_input() {
        let mut s = state(false);
        s.apply_densities(&[(LONG, -3.0), (SHORT, 40.0)], SimTime(0.0));
        assert_eq!(s.densities(), &[0.0, 10.0]);
        assert_eq!(s.speeds(), &[10.0, 1.0]);
    }
}

// ── Average speeds ────────────────────────────────────────────────────────────

#[cfg(test)]
mod average_speeds {
    use super::*;

    #[test]
    fn disabled_by_default() {
        assert!(state(false).average_speeds(SimTime(100.0)).is_none());
    }

    #[test]
    fn time_weighted_mean() {
        let mut s = state(true);
        // SHORT: 20 m/s for 50 s, then 18 m/s for 50 s → 19 m/s.
        s.enter(SHORT);
        s.refresh_edges(&[SHORT], SimTime(50.0));
        let avg = s.average_speeds(SimTime(100.0)).unwrap();
        assert_eq!(avg[LONG.index()], 10.0);
        assert!((avg[SHORT.index()] - 19.0).abs() < 1e-9);
    }

    #[test]
    fn zero_span_reports_current() {
        let t = SpeedTracker::new(2);
        assert_eq!(t.averages(&[3.0, 4.0], SimTime::ZERO), vec![3.0, 4.0]);
    }
}

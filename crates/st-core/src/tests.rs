//! Unit tests for st-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels() {
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId(0).is_valid());
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{GeoPoint, Rect};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(52.23, 21.01);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn rect_contains_any_corner_order() {
        let r = Rect::new(GeoPoint::new(1.0, 1.0), GeoPoint::new(0.0, 0.0));
        assert!(r.contains(GeoPoint::new(0.5, 0.5)));
        assert!(r.contains(GeoPoint::new(0.0, 1.0))); // boundary is inclusive
        assert!(!r.contains(GeoPoint::new(1.5, 0.5)));
        assert_eq!(r.min_corner(), GeoPoint::new(0.0, 0.0));
    }

    #[test]
    fn degenerate_rect() {
        let flat = Rect::new(GeoPoint::new(1.0, 0.0), GeoPoint::new(1.0, 2.0));
        assert!(flat.is_degenerate());
        let ok = Rect::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 2.0));
        assert!(!ok.is_degenerate());
    }
}

#[cfg(test)]
mod time {
    use crate::SimTime;

    #[test]
    fn total_order() {
        assert!(SimTime(1.0) < SimTime(2.0));
        assert_eq!(SimTime(3.0), SimTime(3.0));
        let mut v = vec![SimTime(5.0), SimTime(0.5), SimTime(2.0)];
        v.sort();
        assert_eq!(v, [SimTime(0.5), SimTime(2.0), SimTime(5.0)]);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(SimTime(10.0) + 5.0, SimTime(15.0));
        assert_eq!(SimTime(15.0) - SimTime(10.0), 5.0);
        assert_eq!(SimTime(1.0).since(SimTime(4.0)), 0.0);
    }

    #[test]
    fn display() {
        assert_eq!(SimTime(3_725.5).to_string(), "01:02:05.50");
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_draws() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.gen_range(0..1_000_000u32), r2.gen_range(0..1_000_000u32));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut r1 = SimRng::new(1);
        let mut r2 = SimRng::new(2);
        let a: Vec<u64> = (0..8).map(|_| r1.gen_range(0..u64::MAX)).collect();
        let b: Vec<u64> = (0..8).map(|_| r2.gen_range(0..u64::MAX)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_bool(7.0)); // clamped
    }

    #[test]
    fn choose_empty_and_single() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert_eq!(rng.choose(&empty), None);
        assert_eq!(rng.choose(&[9]), Some(&9));
    }
}

#[cfg(test)]
mod config {
    use crate::{SimConfig, StError};

    #[test]
    fn default_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_k_rejected() {
        let cfg = SimConfig { k: 0, ..SimConfig::default() };
        assert!(matches!(cfg.validate(), Err(StError::Config(_))));
    }

    #[test]
    fn non_positive_v_min_rejected() {
        let cfg = SimConfig { v_min: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn infinite_temperature_allowed() {
        let cfg = SimConfig { temperature: f64::INFINITY, ..SimConfig::default() };
        cfg.validate().unwrap();
        let bad = SimConfig { temperature: f64::NAN, ..SimConfig::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn unbounded_horizon_rejected() {
        for max_sim_time in [f64::INFINITY, f64::NAN, 0.0] {
            let cfg = SimConfig { max_sim_time, ..SimConfig::default() };
            assert!(cfg.validate().is_err(), "{max_sim_time} accepted");
        }
    }

    #[test]
    fn negative_density_factor_rejected() {
        let cfg = SimConfig { density_factor: -1.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

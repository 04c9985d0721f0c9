//! Unit tests for st-spatial.
//!
//! All tests use hand-crafted or synthetic networks so they run without any
//! map file.

#[cfg(test)]
mod helpers {
    use st_core::{GeoPoint, NodeId};
    use crate::{grid_network, RoadNetwork, RoadNetworkBuilder};

    /// Small network for routing tests.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Two-way roads: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Path via 0→1→2→4: 10+10+10 = 30 s
    /// Path via 0→3→4:   50+10    = 60 s
    pub fn five_node_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        // (from, to, length_m, max_speed m/s)
        b.add_road(n0, n1, 100.0, 10.0); // 10 s
        b.add_road(n1, n2, 100.0, 10.0); // 10 s
        b.add_road(n2, n4, 100.0, 10.0); // 10 s
        b.add_road(n0, n3, 500.0, 10.0); // 50 s  (long road)
        b.add_road(n3, n4, 100.0, 10.0); // 10 s

        (b.build(), [n0, n1, n2, n3, n4])
    }

    /// 4 × 4 grid, 100 m blocks, 10 m/s everywhere.
    pub fn grid() -> RoadNetwork {
        grid_network(4, 4, 100.0, 10.0, GeoPoint::new(52.0, 21.0))
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use st_core::GeoPoint;
    use crate::RoadNetworkBuilder;

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::five_node_network();
        assert_eq!(net.out_degree(n0), 2); // n0→n1, n0→n3
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn parallel_edges_keep_fastest() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_directed_edge(a, c, 1_000.0, 10.0); // 100 s
        b.add_directed_edge(a, c, 1_200.0, 20.0); // 60 s
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        let e = net.edge_between(a, c).unwrap();
        assert_eq!(net.edge_length_m[e.index()], 1_200.0);
        assert_eq!(net.free_flow_secs(e), 60.0);
    }

    #[test]
    fn self_loops_dropped() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        b.add_directed_edge(a, a, 10.0, 1.0);
        assert_eq!(b.build().edge_count(), 0);
    }

    #[test]
    fn edge_between_resolves_hops() {
        let (net, [n0, n1, n2, n3, _]) = super::helpers::five_node_network();
        let edges = [net.edge_between(n0, n1).unwrap(), net.edge_between(n1, n2).unwrap()];
        assert_eq!(net.path_length_m(&edges), 200.0);
        assert_eq!(net.edge_from[edges[1].index()], n1);
        // n1 and n3 are not adjacent.
        assert!(net.edge_between(n1, n3).is_none());
    }

    #[test]
    fn weights_follow_speeds() {
        let (net, _) = super::helpers::five_node_network();
        let free = net.free_flow_weights();
        let half_speed = vec![5.0; net.edge_count()];
        let slow = net.travel_time_weights(&half_speed);
        for (f, s) in free.iter().zip(&slow) {
            assert!((s - 2.0 * f).abs() < 1e-9);
        }
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use st_core::{GeoPoint, Rect};
    use crate::RoadNetworkBuilder;

    #[test]
    fn nodes_in_rect_inclusive_and_sorted() {
        let (net, [n0, n1, _, n3, _]) = super::helpers::five_node_network();
        let rect = Rect::new(GeoPoint::new(1.0, 1.0), GeoPoint::new(-0.5, -0.5));
        assert_eq!(net.nodes_in_rect(&rect), vec![n0, n1, n3]);
    }

    #[test]
    fn nodes_in_empty_rect() {
        let (net, _) = super::helpers::five_node_network();
        let rect = Rect::new(GeoPoint::new(5.0, 5.0), GeoPoint::new(6.0, 6.0));
        assert!(net.nodes_in_rect(&rect).is_empty());
    }

    #[test]
    fn empty_network_has_no_nodes_in_rect() {
        let net = RoadNetworkBuilder::new().build();
        let rect = Rect::new(GeoPoint::new(-1.0, -1.0), GeoPoint::new(1.0, 1.0));
        assert!(net.nodes_in_rect(&rect).is_empty());
    }
}

// ── Single-pair routing ───────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use st_core::{GeoPoint, NodeId};
    use crate::{AStarRouter, DijkstraRouter, RoadNetworkBuilder, Router, SearchMask, SpatialError};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::five_node_network();
        let w = net.free_flow_weights();
        let r = DijkstraRouter.route(&net, n0, n0, &w).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.cost, 0.0);
        assert_eq!(r.nodes, vec![n0]);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::five_node_network();
        let w = net.free_flow_weights();
        let route = DijkstraRouter.route(&net, n0, n4, &w).unwrap();
        assert_eq!(route.cost, 30.0);
        assert_eq!(route.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(route.edges.len(), 3);
        assert_eq!(net.edge_to[route.edges[2].index()], n4);
    }

    #[test]
    fn congestion_changes_route() {
        let (net, [n0, _, _, n3, n4]) = super::helpers::five_node_network();
        let mut speeds = net.edge_max_speed.clone();
        // Jam the 1→2 road heavily.
        let jam = net.edge_between(NodeId(1), NodeId(2)).unwrap();
        speeds[jam.index()] = 0.5;
        let w = net.travel_time_weights(&speeds);
        let route = AStarRouter.route(&net, n0, n4, &w).unwrap();
        assert_eq!(route.nodes, vec![n0, n3, n4]);
    }

    #[test]
    fn astar_matches_dijkstra_on_grid() {
        let net = super::helpers::grid();
        let w = net.free_flow_weights();
        for s in 0..net.node_count() as u32 {
            for t in 0..net.node_count() as u32 {
                let d = DijkstraRouter.route(&net, NodeId(s), NodeId(t), &w).unwrap();
                let a = AStarRouter.route(&net, NodeId(s), NodeId(t), &w).unwrap();
                assert!((d.cost - a.cost).abs() < 1e-9, "{s}→{t}: {} vs {}", d.cost, a.cost);
                assert_eq!(a.nodes.len(), a.edges.len() + 1);
            }
        }
    }

    #[test]
    fn mask_blocks_edge() {
        let (net, [n0, n1, _, n3, n4]) = super::helpers::five_node_network();
        let w = net.free_flow_weights();
        let mut mask = SearchMask::default();
        mask.blocked_edges.insert(net.edge_between(n0, n1).unwrap());
        let r = AStarRouter.route_masked(&net, n0, n4, &w, &mask).unwrap();
        assert_eq!(r.nodes, vec![n0, n3, n4]);
        assert_eq!(r.cost, 60.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let net = b.build();
        let w = net.free_flow_weights();
        let result = AStarRouter.route(&net, a, c, &w);
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn unknown_node_reported() {
        let (net, [n0, ..]) = super::helpers::five_node_network();
        let w = net.free_flow_weights();
        let result = DijkstraRouter.route(&net, n0, NodeId(99), &w);
        assert!(matches!(result, Err(SpatialError::NodeNotFound(NodeId(99)))));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_directed_edge(a, c, 100.0, 10.0);
        let net = b.build();
        let w = net.free_flow_weights();
        assert!(AStarRouter.route(&net, a, c, &w).is_ok());
        assert!(AStarRouter.route(&net, c, a, &w).is_err());
    }
}

// ── k shortest paths ──────────────────────────────────────────────────────────

#[cfg(test)]
mod ksp {
    use st_core::NodeId;
    use crate::{yen, yen_a_star, DijkstraRouter, Router};

    #[test]
    fn five_node_has_two_loopless_paths() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::five_node_network();
        let w = net.free_flow_weights();
        let paths = yen_a_star(&net, n0, n4, &w, 5);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].nodes, vec![n0, n1, n2, n4]);
        assert_eq!(paths[1].nodes, vec![n0, n3, n4]);
        assert_eq!(paths[0].cost, 30.0);
        assert_eq!(paths[1].cost, 60.0);
    }

    #[test]
    fn grid_paths_loopless_ordered_distinct() {
        let net = super::helpers::grid();
        let w = net.free_flow_weights();
        let (s, t) = (NodeId(0), NodeId(15));
        let paths = yen_a_star(&net, s, t, &w, 8);
        assert_eq!(paths.len(), 8);

        let reference = DijkstraRouter.route(&net, s, t, &w).unwrap();
        assert!((paths[0].cost - reference.cost).abs() < 1e-9);

        for p in &paths {
            assert!(p.is_loopless());
            assert_eq!(p.source(), s);
            assert_eq!(p.target(), t);
            assert!((p.cost_under(&w) - p.cost).abs() < 1e-9);
        }
        for pair in paths.windows(2) {
            let ordered = pair[0].cost < pair[1].cost
                || (pair[0].cost == pair[1].cost && pair[0].nodes < pair[1].nodes);
            assert!(ordered, "paths out of order");
        }
    }

    #[test]
    fn k_one_is_shortest_path() {
        let net = super::helpers::grid();
        let w = net.free_flow_weights();
        let paths = yen_a_star(&net, NodeId(3), NodeId(12), &w, 1);
        let reference = DijkstraRouter.route(&net, NodeId(3), NodeId(12), &w).unwrap();
        assert_eq!(paths.len(), 1);
        assert!((paths[0].cost - reference.cost).abs() < 1e-9);
    }

    #[test]
    fn spur_router_is_pluggable() {
        let net = super::helpers::grid();
        let mut w = net.free_flow_weights();
        // Uneven weights so the k best costs are not all tied.
        for (i, x) in w.iter_mut().enumerate() {
            *x += (i % 5) as f64;
        }
        let astar = yen_a_star(&net, NodeId(1), NodeId(14), &w, 6);
        let dijkstra = yen(&DijkstraRouter, &net, NodeId(1), NodeId(14), &w, 6);
        assert_eq!(astar.len(), 6);
        assert_eq!(dijkstra.len(), 6);
        for (a, d) in astar.iter().zip(&dijkstra) {
            assert!((a.cost - d.cost).abs() < 1e-9);
        }
    }

    #[test]
    fn degenerate_requests() {
        let (net, [n0, ..]) = super::helpers::five_node_network();
        let w = net.free_flow_weights();
        assert!(yen_a_star(&net, n0, NodeId(1), &w, 0).is_empty());
        let same = yen_a_star(&net, n0, n0, &w, 3);
        assert_eq!(same.len(), 1);
        assert!(same[0].is_trivial());
        assert!(yen_a_star(&net, n0, NodeId(42), &w, 3).is_empty());
    }
}

// ── Route cache ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use crate::RouteCache;

    #[test]
    fn computes_once_then_hits() {
        let (net, [n0, _, _, _, n4]) = super::helpers::five_node_network();
        let w = net.free_flow_weights();
        let mut cache = RouteCache::new();
        assert_eq!(cache.get_or_compute(&net, n0, n4, &w, 3).len(), 2);
        assert_eq!(cache.get_or_compute(&net, n0, n4, &w, 3).len(), 2);
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn larger_k_widens_entry() {
        let (net, [n0, _, _, _, n4]) = super::helpers::five_node_network();
        let w = net.free_flow_weights();
        let mut cache = RouteCache::new();
        assert_eq!(cache.get_or_compute(&net, n0, n4, &w, 1).len(), 1);
        assert_eq!(cache.get_or_compute(&net, n0, n4, &w, 3).len(), 2);
        assert_eq!(cache.stats(), (0, 2));

        // Only two loopless paths exist, so the k = 3 entry is exhaustive.
        assert_eq!(cache.get_or_compute(&net, n0, n4, &w, 5).len(), 2);
        // A smaller k reuses the wider entry.
        assert_eq!(cache.get_or_compute(&net, n0, n4, &w, 1).len(), 2);
        assert_eq!(cache.stats(), (2, 2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unreachable_pair_cached_empty() {
        use st_core::GeoPoint;
        let mut b = crate::RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        let net = b.build();
        let mut cache = RouteCache::new();
        assert!(cache.get_or_compute(&net, a, c, &[], 3).is_empty());
        assert!(cache.get_or_compute(&net, a, c, &[], 3).is_empty());
        assert_eq!(cache.stats(), (1, 1));
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use st_core::GeoPoint;
    use crate::{grid_network, load_network_reader, SpatialError};

    const NODES: &str = "node_id,lat,lon\n1001,52.0,21.0\n1002,52.001,21.0\n1003,52.001,21.001\n";
    const EDGES: &str = "from,to,length_m,max_speed_mps\n1001,1002,111.2,13.9\n1002,1001,111.2,13.9\n1002,1003,68.5,8.3\n";

    #[test]
    fn loads_nodes_and_edges() {
        let loaded = load_network_reader(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        assert_eq!(loaded.network.node_count(), 3);
        assert_eq!(loaded.network.edge_count(), 3);
        assert_eq!(loaded.external_ids, vec![1001, 1002, 1003]);
    }

    #[test]
    fn unknown_node_rejected() {
        let edges = "from,to,length_m,max_speed_mps\n1001,9999,10.0,10.0\n";
        let result = load_network_reader(Cursor::new(NODES), Cursor::new(edges));
        assert!(matches!(result, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn zero_speed_rejected() {
        let edges = "from,to,length_m,max_speed_mps\n1001,1002,10.0,0.0\n";
        let result = load_network_reader(Cursor::new(NODES), Cursor::new(edges));
        assert!(matches!(result, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn grid_shape() {
        let net = grid_network(3, 4, 100.0, 10.0, GeoPoint::new(52.0, 21.0));
        assert_eq!(net.node_count(), 12);
        // Horizontal: 3 rows × 3 links, vertical: 2 × 4 links, both ways.
        assert_eq!(net.edge_count(), 2 * (3 * 3 + 2 * 4));
        for len in &net.edge_length_m {
            assert!((len - 100.0).abs() < 1.0, "block length {len}");
        }
    }
}

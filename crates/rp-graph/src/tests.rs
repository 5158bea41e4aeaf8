//! Unit tests for rp-graph.
//!
//! All tests use hand-crafted steps so they run without a directions service.

#[cfg(test)]
mod helpers {
    use rp_core::GeoPoint;
    use crate::RouteStep;

    pub fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    /// Three steps heading north-east out of Sarajevo.
    ///
    ///   step 0: (43.85,18.41) → (43.86,18.42)   42.5 s
    ///   step 1: (43.86,18.42) → (43.87,18.44)   30 s
    ///   step 2: (43.87,18.44) → (43.90,18.47)   75 s
    pub fn three_steps() -> Vec<RouteStep> {
        vec![
            RouteStep::new(42.5, vec![p(43.85, 18.41), p(43.86, 18.42)]),
            RouteStep::new(30.0, vec![p(43.86, 18.42), p(43.87, 18.44)]),
            RouteStep::new(75.0, vec![p(43.87, 18.44), p(43.885, 18.455), p(43.90, 18.47)]),
        ]
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use rp_core::{EdgeId, NodeId};
    use crate::{GraphError, RouteGraph, RouteGraphBuilder};

    #[test]
    fn empty_build() {
        let g = RouteGraph::empty();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert!(!g.contains(NodeId(0)));
    }

    #[test]
    fn sequential_ids_and_labels() {
        let mut b = RouteGraphBuilder::new();
        let a = b.add_node("a").unwrap();
        let c = b.add_node("c").unwrap();
        assert_eq!((a, c), (NodeId(0), NodeId(1)));
        let g = b.build();
        assert_eq!(g.label(c), Some("c"));
        assert_eq!(g.node_by_label("a"), Some(a));
        assert_eq!(g.node_by_label("zzz"), None);
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn duplicate_label_rejected() {
        let mut b = RouteGraphBuilder::new();
        b.add_node("a").unwrap();
        assert!(matches!(b.add_node("a"), Err(GraphError::InvalidGraph(_))));
    }

    #[test]
    fn edge_to_unknown_node_rejected() {
        let mut b = RouteGraphBuilder::new();
        let a = b.add_node("a").unwrap();
        assert!(matches!(b.add_edge(a, NodeId(5), 1.0), Err(GraphError::InvalidGraph(_))));
        assert!(matches!(b.add_edge(NodeId(9), a, 1.0), Err(GraphError::InvalidGraph(_))));
    }

    #[test]
    fn invalid_weights_rejected() {
        let mut b = RouteGraphBuilder::new();
        let a = b.add_node("a").unwrap();
        let c = b.add_node("c").unwrap();
        for w in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(b.add_edge(a, c, w).is_err(), "weight {w} accepted");
        }
        // Zero is a legal travel time.
        assert!(b.add_edge(a, c, 0.0).is_ok());
    }

    #[test]
    fn csr_keeps_insertion_order_per_node() {
        let mut b = RouteGraphBuilder::new();
        let n: Vec<_> = (0..4).map(|i| b.add_node(format!("n{i}")).unwrap()).collect();
        // Interleave sources so the CSR sort has work to do.
        b.add_edge(n[2], n[3], 5.0).unwrap();
        b.add_edge(n[0], n[1], 1.0).unwrap();
        b.add_edge(n[2], n[0], 6.0).unwrap();
        b.add_edge(n[0], n[2], 2.0).unwrap();
        b.add_edge(n[0], n[1], 3.0).unwrap(); // parallel edge
        let g = b.build();

        let from0: Vec<f64> = g.out_edges(n[0]).map(|e| e.weight).collect();
        assert_eq!(from0, vec![1.0, 2.0, 3.0]);
        let from2: Vec<f64> = g.out_edges(n[2]).map(|e| e.weight).collect();
        assert_eq!(from2, vec![5.0, 6.0]);
        assert_eq!(g.out_degree(n[1]), 0);
        assert_eq!(g.out_degree(n[3]), 0);

        // Global edge order is insertion order.
        assert_eq!(g.edges()[0].from, n[2]);
        assert_eq!(g.edge(EdgeId(1)).map(|e| e.weight), Some(1.0));
        assert!(g.edge(EdgeId(99)).is_none());
    }

    #[test]
    fn out_edges_share_source() {
        let mut b = RouteGraphBuilder::new();
        let a = b.add_node("a").unwrap();
        let c = b.add_node("c").unwrap();
        let d = b.add_node("d").unwrap();
        b.add_edge(a, c, 1.0).unwrap();
        b.add_edge(a, d, 1.0).unwrap();
        b.add_edge(c, d, 1.0).unwrap();
        let g = b.build();
        assert!(g.out_edges(a).all(|e| e.from == a));
        assert!(g.out_edges(a).any(|e| e.to == d));
    }
}

// ── Step graphs ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_graph {
    use rp_core::NodeId;
    use crate::{GraphError, RouteNetwork, RouteStep, build_graph, step_label};

    use super::helpers::{p, three_steps};

    #[test]
    fn k_steps_give_k_plus_one_nodes_and_k_edges() {
        for k in 1..=6 {
            let steps: Vec<_> = (0..k)
                .map(|i| RouteStep::new(10.0 * (i + 1) as f64, vec![p(0.0, i as f64)]))
                .collect();
            let g = build_graph(&steps).unwrap();
            assert_eq!(g.node_count(), k + 1);
            assert_eq!(g.edge_count(), k);
            for (i, e) in g.edges().iter().enumerate() {
                assert_eq!(e.from, NodeId(i as u32));
                assert_eq!(e.to, NodeId(i as u32 + 1));
                assert_eq!(e.weight, steps[i].duration_secs);
            }
        }
    }

    #[test]
    fn labels_follow_step_boundaries() {
        let g = build_graph(&three_steps()).unwrap();
        assert_eq!(g.label(NodeId(0)), Some("step_0"));
        assert_eq!(g.label(NodeId(3)), Some("step_3"));
        assert_eq!(g.node_by_label(&step_label(2)), Some(NodeId(2)));
    }

    #[test]
    fn empty_steps_is_empty_input() {
        assert!(matches!(build_graph(&[]), Err(GraphError::EmptyInput)));
        assert!(matches!(RouteNetwork::from_steps(&[]), Err(GraphError::EmptyInput)));
    }

    #[test]
    fn negative_duration_is_invalid_graph() {
        let steps = vec![RouteStep::new(-3.0, vec![p(0.0, 0.0)])];
        assert!(matches!(build_graph(&steps), Err(GraphError::InvalidGraph(_))));
    }

    #[test]
    fn zero_duration_is_accepted() {
        let steps = vec![RouteStep::new(0.0, vec![p(0.0, 0.0)])];
        let g = build_graph(&steps).unwrap();
        assert_eq!(g.edges()[0].weight, 0.0);
    }

    #[test]
    fn network_start_and_end() {
        let net = RouteNetwork::from_steps(&three_steps()).unwrap();
        assert_eq!(net.start(), NodeId(0));
        assert_eq!(net.end(), NodeId(3));
        assert_eq!(net.positions.len(), net.graph.node_count());
    }
}

// ── Coordinates & snapping ────────────────────────────────────────────────────

#[cfg(test)]
mod coords {
    use std::collections::HashMap;

    use rp_core::NodeId;
    use crate::{CoordinateLookup, GraphError, NodePositions, RouteStep};

    use super::helpers::{p, three_steps};

    #[test]
    fn boundaries_use_step_starts_and_final_end() {
        let pos = NodePositions::from_steps(&three_steps()).unwrap();
        assert_eq!(pos.len(), 4);
        assert_eq!(pos.coords(NodeId(0)), Some(p(43.85, 18.41)));
        assert_eq!(pos.coords(NodeId(1)), Some(p(43.86, 18.42)));
        assert_eq!(pos.coords(NodeId(2)), Some(p(43.87, 18.44)));
        assert_eq!(pos.coords(NodeId(3)), Some(p(43.90, 18.47)));
        assert_eq!(pos.coords(NodeId(4)), None);
    }

    #[test]
    fn empty_geometry_reuses_previous_point() {
        let steps = vec![
            RouteStep::new(10.0, vec![p(1.0, 1.0), p(2.0, 2.0)]),
            RouteStep::new(0.0, vec![]), // arrival manoeuvre with no geometry
            RouteStep::new(5.0, vec![]),
        ];
        let pos = NodePositions::from_steps(&steps).unwrap();
        assert_eq!(pos.as_slice(), &[p(1.0, 1.0), p(2.0, 2.0), p(2.0, 2.0), p(2.0, 2.0)]);
    }

    #[test]
    fn first_step_without_geometry_fails() {
        let steps = vec![RouteStep::new(10.0, vec![]), RouteStep::new(5.0, vec![p(0.0, 0.0)])];
        assert!(matches!(
            NodePositions::from_steps(&steps),
            Err(GraphError::MissingGeometry { step: 0 })
        ));
    }

    #[test]
    fn slice_and_map_lookups() {
        let v = vec![p(0.0, 0.0), p(1.0, 1.0)];
        assert_eq!(v.coords(NodeId(1)), Some(p(1.0, 1.0)));
        assert_eq!(v.as_slice().coords(NodeId(2)), None);

        let mut m = HashMap::new();
        m.insert(NodeId(7), p(3.0, 4.0));
        assert_eq!(m.coords(NodeId(7)), Some(p(3.0, 4.0)));
        assert_eq!(m.coords(NodeId(0)), None);
    }

    #[test]
    fn snap_nearest() {
        let pos = NodePositions::from_steps(&three_steps()).unwrap();
        assert_eq!(pos.snap_to_node(p(43.85, 18.41)), Some(NodeId(0)));
        assert_eq!(pos.snap_to_node(p(43.899, 18.469)), Some(NodeId(3)));
        assert_eq!(pos.snap_to_node(p(43.861, 18.421)), Some(NodeId(1)));
    }

    #[test]
    fn k_nearest_order() {
        let pos = NodePositions::from_points(vec![p(0.0, 0.0), p(0.0, 5.0), p(0.0, 1.0)]);
        assert_eq!(pos.k_nearest_nodes(p(0.0, 0.1), 3), vec![NodeId(0), NodeId(2), NodeId(1)]);
    }

    #[test]
    fn empty_table_snaps_to_none() {
        let pos = NodePositions::from_points(vec![]);
        assert!(pos.is_empty());
        assert!(pos.snap_to_node(p(0.0, 0.0)).is_none());
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use rp_core::RouteId;
    use crate::{GraphError, load_directions_reader, load_steps_reader};

    use super::helpers::p;

    const DIRECTIONS: &str = r#"{
        "code": "Ok",
        "routes": [
            { "duration": 72.5, "legs": [
                { "steps": [
                    { "duration": 42.5, "distance": 310.0, "name": "Titova",
                      "maneuver": { "instruction": "Head east on Titova" },
                      "geometry": { "type": "LineString", "coordinates": [[18.41, 43.85], [18.42, 43.86]] } }
                ] },
                { "steps": [
                    { "duration": 30, "name": "Alipašina",
                      "geometry": { "type": "LineString", "coordinates": [[18.42, 43.86], [18.44, 43.87]] } }
                ] }
            ] },
            { "legs": [ { "steps": [
                { "duration": 95,
                  "geometry": { "type": "LineString", "coordinates": [[18.41, 43.85], [18.44, 43.87]] } }
            ] } ] }
        ]
    }"#;

    #[test]
    fn directions_routes_and_legs() {
        let routes = load_directions_reader(Cursor::new(DIRECTIONS)).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].id, RouteId(0));
        assert_eq!(routes[1].id, RouteId(1));

        // Two legs flatten into two steps.
        let r0 = &routes[0];
        assert_eq!(r0.steps.len(), 2);
        assert_eq!(r0.total_duration_secs(), 72.5);
        assert_eq!(r0.steps[0].distance_m, Some(310.0));
        assert_eq!(r0.steps[0].instruction.as_deref(), Some("Head east on Titova"));
        assert_eq!(r0.steps[1].instruction.as_deref(), Some("Alipašina"));
    }

    #[test]
    fn directions_swap_geojson_order() {
        let routes = load_directions_reader(Cursor::new(DIRECTIONS)).unwrap();
        assert_eq!(routes[0].steps[0].start(), Some(p(43.85, 18.41)));
        assert_eq!(routes[1].steps[0].end(), Some(p(43.87, 18.44)));
    }

    #[test]
    fn directions_code_is_case_insensitive() {
        let body = r#"{ "code": "OK", "routes": [ { "legs": [ { "steps": [
            { "duration": 5, "geometry": { "coordinates": [[18.41, 43.85]] } } ] } ] } ] }"#;
        assert_eq!(load_directions_reader(Cursor::new(body)).unwrap().len(), 1);
        let no_code = r#"{ "routes": [] }"#;
        assert!(load_directions_reader(Cursor::new(no_code)).unwrap().is_empty());
    }

    #[test]
    fn directions_error_code() {
        let body = r#"{ "code": "NoRoute", "message": "No route found", "routes": [] }"#;
        let err = load_directions_reader(Cursor::new(body)).unwrap_err();
        assert!(matches!(err, GraphError::Parse(ref m) if m.contains("NoRoute")), "{err}");
    }

    #[test]
    fn directions_bad_coordinate() {
        // Latitude 95 after the [lng, lat] swap.
        let body = r#"{ "routes": [ { "legs": [ { "steps": [
            { "duration": 1, "geometry": { "coordinates": [[10.0, 95.0]] } } ] } ] } ] }"#;
        assert!(matches!(
            load_directions_reader(Cursor::new(body)),
            Err(GraphError::Core(_))
        ));
    }

    #[test]
    fn directions_malformed_json() {
        assert!(matches!(
            load_directions_reader(Cursor::new("{ not json")),
            Err(GraphError::Parse(_))
        ));
    }

    #[test]
    fn csv_groups_by_route_in_first_seen_order() {
        let csv = "\
route,duration_secs,geometry\n\
3,42.5,\"43.85,18.41;43.86,18.42\"\n\
1,95,\"43.85,18.41;43.87,18.44\"\n\
3,30,\"43.86,18.42; 43.87,18.44\"\n\
";
        let routes = load_steps_reader(Cursor::new(csv)).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].id, RouteId(3));
        assert_eq!(routes[1].id, RouteId(1));
        assert_eq!(routes[0].steps.len(), 2);
        assert_eq!(routes[0].steps[1].duration_secs, 30.0);
        assert_eq!(routes[0].steps[1].end(), Some(p(43.87, 18.44)));
    }

    #[test]
    fn csv_bad_point_is_error() {
        let csv = "route,duration_secs,geometry\n0,1,\"43.85;18.41\"\n";
        assert!(load_steps_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn csv_bad_duration_is_parse_error() {
        let csv = "route,duration_secs,geometry\n0,soon,\"1,1\"\n";
        assert!(matches!(load_steps_reader(Cursor::new(csv)), Err(GraphError::Parse(_))));
    }
}

use tapir::embedding::{Axis, EmbeddingSpec, PlanarEmbedding};
use tapir::network::{
    ArcKind, FlowNetwork, NodeKind, UNBOUNDED, VERTEX_ARC_CAPACITY, face_production,
    vertex_production,
};

fn fixture(json: &str) -> PlanarEmbedding {
    let spec: EmbeddingSpec = serde_json::from_str(json).unwrap();
    PlanarEmbedding::from_spec(&spec).unwrap()
}

/// A square split by the diagonal a-c into two triangles.
fn triangulated_square() -> PlanarEmbedding {
    let mut g = PlanarEmbedding::new();
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    let c = g.add_vertex("c");
    let d = g.add_vertex("d");
    g.add_edge(a, b, Axis::Horizontal).unwrap();
    g.add_edge(b, c, Axis::Vertical).unwrap();
    g.add_edge(c, d, Axis::Horizontal).unwrap();
    g.add_edge(d, a, Axis::Vertical).unwrap();
    g.add_edge(a, c, Axis::Horizontal).unwrap();
    g.add_face(&[a, b, c], false).unwrap();
    g.add_face(&[a, c, d], false).unwrap();
    g.add_face(&[a, d, c, b], true).unwrap();
    g
}

fn star(leaves: usize) -> PlanarEmbedding {
    let mut g = PlanarEmbedding::new();
    let c = g.add_vertex("c");
    let mut walk = Vec::new();
    for i in 0..leaves {
        let l = g.add_vertex(format!("l{i}"));
        g.add_edge(c, l, Axis::Horizontal).unwrap();
        walk.push(c);
        walk.push(l);
    }
    g.add_face(&walk, true).unwrap();
    g
}

#[test]
fn productions_follow_degrees() {
    assert_eq!(vertex_production(1), 3);
    assert_eq!(vertex_production(2), 2);
    assert_eq!(vertex_production(4), 0);
    assert_eq!(vertex_production(5), -1);

    assert_eq!(face_production(4, true), -8);
    assert_eq!(face_production(3, false), 1);
    assert_eq!(face_production(4, false), 0);
    assert_eq!(face_production(6, false), -2);
    assert_eq!(face_production(2, false), 0);
    assert_eq!(face_production(2, true), -6);
}

#[test]
fn production_sums_to_zero() {
    let cases = [
        ("triangulated", triangulated_square()),
        ("grid", fixture(include_str!("fixtures/grid3x3.json"))),
        ("star", star(4)),
        ("square", fixture(include_str!("fixtures/square.json"))),
        ("house", fixture(include_str!("fixtures/house.json"))),
    ];
    for (name, g) in cases {
        let net = FlowNetwork::build(&g);
        assert_eq!(net.production_sum(), 0, "{name}");
        assert!(net.is_balanced(), "{name}");
        assert_eq!(net.total_supply(), net.total_demand(), "{name}");
    }
}

#[test]
fn square_network_layout() {
    let g = fixture(include_str!("fixtures/square.json"));
    let net = FlowNetwork::build(&g);

    // 4 vertices + 2 faces + source + sink.
    assert_eq!(net.node_count(), 8);
    // 8 vertex arcs, 8 face arcs, 4 supply arcs, 1 demand arc.
    assert_eq!(net.arc_count(), 21);
    assert_eq!(net.total_supply(), 8);

    let mut counts = [0usize; 4];
    for (_, arc) in net.arcs() {
        let slot = match arc.kind {
            ArcKind::Vertex => {
                assert_eq!(arc.capacity, VERTEX_ARC_CAPACITY);
                assert_eq!(arc.cost, 0);
                assert!(matches!(net.node(arc.source).kind, NodeKind::Vertex(_)));
                assert!(matches!(net.node(arc.destination).kind, NodeKind::Face(_)));
                0
            }
            ArcKind::Face => {
                assert_eq!(arc.capacity, UNBOUNDED);
                assert_eq!(arc.cost, 1);
                assert!(matches!(net.node(arc.source).kind, NodeKind::Face(_)));
                assert!(matches!(net.node(arc.destination).kind, NodeKind::Face(_)));
                1
            }
            ArcKind::Supply => {
                assert_eq!(arc.source, net.source());
                assert_eq!(arc.capacity, net.node(arc.destination).production);
                2
            }
            ArcKind::Demand => {
                assert_eq!(arc.destination, net.sink());
                assert_eq!(arc.capacity, -net.node(arc.source).production);
                3
            }
        };
        assert_eq!(arc.flow, 0);
        counts[slot] += 1;
    }
    assert_eq!(counts, [8, 8, 4, 1]);
}

#[test]
fn every_dart_has_its_arcs() {
    let g = fixture(include_str!("fixtures/house.json"));
    let net = FlowNetwork::build(&g);
    for (d, dart) in g.darts() {
        let arc = net.arc(net.vertex_arc(d).unwrap());
        assert_eq!(arc.source, net.vertex_node(dart.from));
        assert_eq!(arc.destination, net.face_node(dart.face));
        assert_eq!(arc.dart, Some(d));

        let across = net.arc(net.face_arc(d).unwrap());
        let twin = g.twin(d).unwrap();
        assert_eq!(across.source, net.face_node(dart.face));
        assert_eq!(across.destination, net.face_node(g.dart(twin).face));
    }
}

#[test]
fn bridges_get_no_face_arcs() {
    let g = star(3);
    let net = FlowNetwork::build(&g);
    for (d, _) in g.darts() {
        assert!(net.vertex_arc(d).is_some());
        assert!(net.face_arc(d).is_none());
    }
    assert!(net.arcs().all(|(_, a)| a.kind != ArcKind::Face));
    assert_eq!(net.total_supply(), 10);
}

#[test]
fn digon_faces_unbalance_production() {
    let mut g = PlanarEmbedding::new();
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    g.add_edge(a, b, Axis::Horizontal).unwrap();
    g.add_edge(a, b, Axis::Horizontal).unwrap();
    g.add_face(&[a, b], false).unwrap();
    g.add_face(&[a, b], true).unwrap();
    g.validate().unwrap();

    let net = FlowNetwork::build(&g);
    assert!(!net.is_balanced());
    assert_eq!(net.total_supply(), 4);
    assert_eq!(net.total_demand(), 6);
    assert_eq!(net.production_sum(), -2);
}

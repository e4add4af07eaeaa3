use tapir::embedding::{Axis, EmbeddingSpec, PlanarEmbedding};
use tapir::network::{ArcKind, FlowNetwork, NodeKind};
use tapir::solver::{self, ResidualNetwork};
use tapir::{Error, ErrorClass};

fn fixture(json: &str) -> PlanarEmbedding {
    let spec: EmbeddingSpec = serde_json::from_str(json).unwrap();
    PlanarEmbedding::from_spec(&spec).unwrap()
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

fn assert_conserved(net: &FlowNetwork) {
    for (id, node) in net.nodes() {
        let net_out = net.net_outflow(id);
        match node.kind {
            NodeKind::Source => assert_eq!(net_out, net.total_supply()),
            NodeKind::Sink => assert_eq!(net_out, -net.total_supply()),
            _ => assert_eq!(net_out, 0, "node {id}"),
        }
    }
    for (id, arc) in net.arcs() {
        assert!(arc.flow >= 0 && arc.flow <= arc.capacity, "arc {id}");
    }
}

#[test]
fn square_needs_no_bends() {
    let g = fixture(include_str!("fixtures/square.json"));
    let mut net = FlowNetwork::build(&g);
    let stats = solver::solve(&mut net).unwrap();

    assert_eq!(stats.delivered, 8);
    assert_eq!(stats.cost, 0);
    assert_eq!(stats.rounds, 4);
    assert_conserved(&net);
}

#[test]
fn house_needs_one_bend() {
    let g = fixture(include_str!("fixtures/house.json"));
    let mut net = FlowNetwork::build(&g);
    let stats = solver::solve(&mut net).unwrap();

    assert_eq!(stats.delivered, 9);
    assert_eq!(stats.cost, 1);
    assert_eq!(stats.rounds, 6);
    assert_eq!(net.cost(), 1);
    assert_conserved(&net);

    let bent: Vec<_> = net
        .arcs()
        .filter(|(_, a)| a.kind == ArcKind::Face && a.flow > 0)
        .collect();
    assert_eq!(bent.len(), 1);
    let dart = bent[0].1.dart.unwrap();
    let c = g.vertex_id("c").unwrap();
    let e = g.vertex_id("e").unwrap();
    assert_eq!((g.dart(dart).from, g.dart(dart).to), (c, e));
}

#[test]
fn triangles_need_a_bend_each() {
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

    let mut net = FlowNetwork::build(&g);
    let stats = solver::solve(&mut net).unwrap();
    assert_eq!(stats.cost, 2);
    assert_conserved(&net);
}

#[test]
fn star_leaves_turn_all_the_way_around() {
    let g = star(3);
    let mut net = FlowNetwork::build(&g);
    let stats = solver::solve(&mut net).unwrap();
    assert_eq!(stats.cost, 0);
    assert_eq!(stats.delivered, 10);

    for (d, dart) in g.darts() {
        if g.degree(dart.from) == 1 {
            let arc = net.arc(net.vertex_arc(d).unwrap());
            assert_eq!(arc.flow, 3);
        }
    }
}

#[test]
fn degree_five_blocks_the_flow() {
    let g = star(5);
    let mut net = FlowNetwork::build(&g);
    assert!(net.is_balanced());

    let err = solver::solve(&mut net).unwrap_err();
    assert_eq!(
        err,
        Error::BlockedFlow {
            delivered: 14,
            required: 15,
            balanced: true,
        }
    );
    assert_eq!(err.class(), ErrorClass::BlockedFlow);
}

#[test]
fn residual_arcs_come_in_pairs() {
    let g = fixture(include_str!("fixtures/square.json"));
    let net = FlowNetwork::build(&g);
    let residual = ResidualNetwork::new(&net);

    assert_eq!(residual.arcs().len(), 2 * net.arc_count());
    for (ix, arc) in residual.arcs().iter().enumerate() {
        let pair = &residual.arcs()[ResidualNetwork::pair(ix)];
        assert_eq!(arc.origin, pair.origin);
        assert_eq!(arc.reverse, ix % 2 == 1);
        assert_eq!((arc.from, arc.to), (pair.to, pair.from));
        assert_eq!(arc.cost, net.arc(arc.origin).cost);
        assert!(arc.cost >= 0);
    }
}

#[test]
fn shortest_path_prefers_free_arcs() {
    let g = fixture(include_str!("fixtures/square.json"));
    let net = FlowNetwork::build(&g);
    let residual = ResidualNetwork::new(&net);

    let path = residual.shortest_path(net.source(), net.sink()).unwrap();
    let cost: i64 = path.iter().map(|&r| residual.arcs()[r].cost).sum();
    assert_eq!(cost, 0);
    assert_eq!(path.len(), 3);
    assert_eq!(residual.arcs()[path[0]].from, net.source());
    assert_eq!(residual.arcs()[path[2]].to, net.sink());
}

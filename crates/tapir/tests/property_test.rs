//! Randomised checks over small triangulated grids.

use tapir::embedding::{Axis, PlanarEmbedding, VertexId};
use tapir::{
    AxisSource, BarLayering, LayoutOptions, OrthogonalRepresentation, OrthogonalizeOptions,
    layout, orthogonalize,
};

struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// A `cols x rows` grid with a random subset of cells split by a diagonal. Diagonals only join
/// vertices of degree below 4, and the cell at the origin never gets its main diagonal, so the
/// origin always has degree 2.
fn triangulated_grid(rng: &mut XorShift64Star) -> PlanarEmbedding {
    let rows = 2 + rng.below(2) as usize;
    let cols = 2 + rng.below(3) as usize;
    let mut g = PlanarEmbedding::new();
    let ids: Vec<Vec<VertexId>> = (0..cols)
        .map(|c| (0..rows).map(|r| VertexId(c * rows + r)).collect())
        .collect();
    for c in 0..cols {
        for r in 0..rows {
            g.add_vertex(format!("v{c}_{r}"));
        }
    }
    for r in 0..rows {
        for c in 0..cols - 1 {
            g.add_edge(ids[c][r], ids[c + 1][r], Axis::Horizontal)
                .unwrap();
        }
    }
    for c in 0..cols {
        for r in 0..rows - 1 {
            g.add_edge(ids[c][r], ids[c][r + 1], Axis::Vertical).unwrap();
        }
    }

    let mut faces: Vec<Vec<VertexId>> = Vec::new();
    for c in 0..cols - 1 {
        for r in 0..rows - 1 {
            let (sw, se, ne, nw) = (ids[c][r], ids[c + 1][r], ids[c + 1][r + 1], ids[c][r + 1]);
            let free = |g: &PlanarEmbedding, a: VertexId, b: VertexId| {
                g.degree(a) < 4 && g.degree(b) < 4
            };
            match rng.below(3) {
                0 if (c, r) != (0, 0) && free(&g, sw, ne) => {
                    g.add_edge(sw, ne, Axis::Horizontal).unwrap();
                    faces.push(vec![sw, se, ne]);
                    faces.push(vec![sw, ne, nw]);
                }
                1 if free(&g, se, nw) => {
                    g.add_edge(se, nw, Axis::Horizontal).unwrap();
                    faces.push(vec![sw, se, nw]);
                    faces.push(vec![se, ne, nw]);
                }
                _ => faces.push(vec![sw, se, ne, nw]),
            }
        }
    }
    for face in &faces {
        g.add_face(face, false).unwrap();
    }

    let mut outer: Vec<VertexId> = Vec::new();
    outer.extend((0..rows).map(|r| ids[0][r]));
    outer.extend((1..cols).map(|c| ids[c][rows - 1]));
    outer.extend((0..rows - 1).rev().map(|r| ids[cols - 1][r]));
    outer.extend((1..cols - 1).rev().map(|c| ids[c][0]));
    g.add_face(&outer, true).unwrap();
    g.validate().unwrap();
    g
}

fn check_representation(g: &PlanarEmbedding, rep: &OrthogonalRepresentation) {
    for (d, _) in g.darts() {
        let angle = rep.angle(d).unwrap();
        assert!((1..=4).contains(&angle), "dart {d} angle {angle}");
        let twin = g.twin(d).unwrap();
        assert_eq!(
            rep.bends(twin).unwrap(),
            &rep.bends(d).unwrap().mirrored(),
            "dart {d}"
        );
    }
    for (v, _) in g.vertices() {
        assert_eq!(rep.vertex_angle_sum(g, v), 4, "vertex {v}");
    }
    for (f, face) in g.faces() {
        let degree = face.degree() as i64;
        let rotation: i64 = rep
            .shape(f)
            .iter()
            .map(|(_, t)| i64::from(t.bends.rotation()))
            .sum();
        let base = if face.outer {
            2 * degree + 4
        } else {
            2 * degree - 4
        };
        assert_eq!(i64::from(rep.face_angle_sum(f)), base + rotation, "face {f}");
    }
}

fn assert_acyclic(bars: &BarLayering) {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Open,
        Done,
    }
    let mut marks = vec![Mark::New; bars.len()];
    for start in 0..bars.len() {
        if marks[start] != Mark::New {
            continue;
        }
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::Open;
        while let Some(top) = stack.last_mut() {
            let b = top.0;
            let neighbors = &bars.bars()[b].neighbors;
            if top.1 < neighbors.len() {
                let n = neighbors[top.1].0;
                top.1 += 1;
                match marks[n] {
                    Mark::Open => panic!("bar cycle through b{n}"),
                    Mark::New => {
                        marks[n] = Mark::Open;
                        stack.push((n, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[b] = Mark::Done;
                stack.pop();
            }
        }
    }
}

fn check_bars(g: &PlanarEmbedding, bars: &BarLayering) {
    assert_acyclic(bars);
    for (_, bar) in bars.iter() {
        for n in &bar.neighbors {
            assert!(bars.get(*n).number > bar.number);
        }
    }
    for (v, _) in g.vertices() {
        assert!(bars.bar(v).is_some(), "vertex {v} has no bar");
    }

    // Sources sit at the offset, the root's bar among them; every other bar is one past its
    // highest predecessor.
    let mut highest_pred: Vec<Option<i64>> = vec![None; bars.len()];
    for (_, bar) in bars.iter() {
        for n in &bar.neighbors {
            let slot = &mut highest_pred[n.0];
            *slot = Some(slot.map_or(bar.number, |p| p.max(bar.number)));
        }
    }
    let root_bar = bars.bar(bars.root()).unwrap();
    assert_eq!(highest_pred[root_bar.0], None, "root bar {root_bar} has a predecessor");
    assert_eq!(bars.number(bars.root()), Some(0));
    for (id, bar) in bars.iter() {
        let expected = highest_pred[id.0].map_or(0, |p| p + 1);
        assert_eq!(bar.number, expected, "bar {id}");
    }
}

#[test]
fn random_triangulated_grids_lay_out() {
    let mut rng = XorShift64Star::new(0x7a91_5eed);
    let options = LayoutOptions {
        axis_source: AxisSource::Headings,
        ..Default::default()
    };
    for _ in 0..64 {
        let g = triangulated_grid(&mut rng);
        assert!((4..=12).contains(&g.vertex_count()));

        let out = orthogonalize(&g, &OrthogonalizeOptions::default()).unwrap();
        assert_eq!(out.stats.delivered, out.network.total_supply());
        check_representation(&g, &out.representation);

        let laid_out = layout(&g, &options).unwrap();
        assert_eq!(laid_out.representation.bend_count(), 0);
        check_representation(&laid_out.embedding, &laid_out.representation);
        check_bars(&laid_out.embedding, &laid_out.horizontal);
        check_bars(&laid_out.embedding, &laid_out.vertical);
    }
}

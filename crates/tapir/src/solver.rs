//! Successive-shortest-path min-cost flow over a [`FlowNetwork`].
//!
//! Every original arc owns two residual arcs stored side by side (`2i` forward, `2i + 1`
//! reverse), so the partner of residual arc `r` is `r ^ 1`. Reverse residual arcs carry the
//! original, non-negated cost: all residual costs stay in `{0, 1}` and plain Dijkstra applies.
//!
//! Tie-break (for reproducible bend placement): the queue is ordered by `(distance, node index)`,
//! adjacency is scanned in arc insertion order, and a node keeps the first predecessor that
//! reached its final distance.

use crate::error::{Error, Result};
use crate::network::{ArcId, FlowNetwork, NodeId};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidualArc {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: i64,
    pub cost: i64,
    pub origin: ArcId,
    pub reverse: bool,
}

#[derive(Debug, Clone)]
pub struct ResidualNetwork {
    arcs: Vec<ResidualArc>,
    adjacency: Vec<Vec<usize>>,
}

impl ResidualNetwork {
    pub fn new(network: &FlowNetwork) -> Self {
        let mut arcs = Vec::with_capacity(2 * network.arc_count());
        let mut adjacency = vec![Vec::new(); network.node_count()];
        for (id, arc) in network.arcs() {
            let forward = arcs.len();
            arcs.push(ResidualArc {
                from: arc.source,
                to: arc.destination,
                capacity: arc.capacity - arc.flow,
                cost: arc.cost,
                origin: id,
                reverse: false,
            });
            arcs.push(ResidualArc {
                from: arc.destination,
                to: arc.source,
                capacity: arc.flow,
                cost: arc.cost,
                origin: id,
                reverse: true,
            });
            adjacency[arc.source.0].push(forward);
            adjacency[arc.destination.0].push(forward + 1);
        }
        Self { arcs, adjacency }
    }

    pub fn arcs(&self) -> &[ResidualArc] {
        &self.arcs
    }

    pub fn pair(ix: usize) -> usize {
        ix ^ 1
    }

    /// Dijkstra from `source`; returns the residual arcs of a cheapest path to `sink`.
    pub fn shortest_path(&self, source: NodeId, sink: NodeId) -> Option<Vec<usize>> {
        let n = self.adjacency.len();
        let mut dist: Vec<i64> = vec![i64::MAX; n];
        let mut pred: Vec<Option<usize>> = vec![None; n];
        let mut heap: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::new();

        dist[source.0] = 0;
        heap.push(Reverse((0, source.0)));
        while let Some(Reverse((d, u))) = heap.pop() {
            if d > dist[u] {
                continue;
            }
            if u == sink.0 {
                break;
            }
            for &r in &self.adjacency[u] {
                let arc = &self.arcs[r];
                if arc.capacity <= 0 {
                    continue;
                }
                let nd = d + arc.cost;
                let v = arc.to.0;
                if nd < dist[v] {
                    dist[v] = nd;
                    pred[v] = Some(r);
                    heap.push(Reverse((nd, v)));
                }
            }
        }

        if dist[sink.0] == i64::MAX {
            return None;
        }
        let mut path = Vec::new();
        let mut at = sink.0;
        while at != source.0 {
            let r = pred[at]?;
            path.push(r);
            at = self.arcs[r].from.0;
        }
        path.reverse();
        Some(path)
    }

    /// Pushes the bottleneck amount along `path`, mirroring it onto `network`'s arc flows.
    pub fn augment(&mut self, network: &mut FlowNetwork, path: &[usize]) -> i64 {
        let Some(bottleneck) = path.iter().map(|&r| self.arcs[r].capacity).min() else {
            return 0;
        };
        for &r in path {
            self.arcs[r].capacity -= bottleneck;
            // `UNBOUNDED` forward capacities never need to grow back.
            let partner = &mut self.arcs[Self::pair(r)];
            partner.capacity = partner.capacity.saturating_add(bottleneck);

            let arc = network.arc_mut(self.arcs[r].origin);
            if self.arcs[r].reverse {
                arc.flow -= bottleneck;
            } else {
                arc.flow += bottleneck;
            }
        }
        bottleneck
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub rounds: usize,
    pub delivered: i64,
    pub cost: i64,
}

/// Routes the full source production to the sink at minimum cost.
///
/// Fails with [`Error::BlockedFlow`] as soon as the sink becomes unreachable before the source
/// is saturated; the network is left holding the partial flow for inspection.
pub fn solve(network: &mut FlowNetwork) -> Result<SolveStats> {
    let required = network.total_supply();
    let mut residual = ResidualNetwork::new(network);
    let mut stats = SolveStats::default();

    while stats.delivered < required {
        let Some(path) = residual.shortest_path(network.source(), network.sink()) else {
            tracing::debug!(
                delivered = stats.delivered,
                required,
                "sink unreachable before source saturation"
            );
            return Err(Error::BlockedFlow {
                delivered: stats.delivered,
                required,
                balanced: network.is_balanced(),
            });
        };
        let pushed = residual.augment(network, &path);
        if pushed <= 0 {
            debug_assert!(false, "augmenting path without residual capacity");
            return Err(Error::BlockedFlow {
                delivered: stats.delivered,
                required,
                balanced: network.is_balanced(),
            });
        }
        stats.rounds += 1;
        stats.delivered += pushed;
        tracing::trace!(
            round = stats.rounds,
            bottleneck = pushed,
            path_len = path.len(),
            delivered = stats.delivered,
            "augmented"
        );
    }

    stats.cost = network.cost();
    tracing::debug!(
        rounds = stats.rounds,
        delivered = stats.delivered,
        cost = stats.cost,
        "min-cost flow solved"
    );
    Ok(stats)
}

//! Dijkstra Explorer (C3).
//!
//! From a single start node, traverses the routing-resource graph and
//! records, at every input pin reached, a `(dx, dy, delay, congestion)`
//! tuple relative to the start node's canonical location.

use crate::accumulator::CostEntry;
use crate::error::LookaheadError;
use crate::ids::NodeId;
use crate::pq_entry::CombinedEntry;
use crate::rrg::{CongestionSource, ConnectionBoxDb, NodeType, RrgView, SwitchCatalogue};
use std::collections::BinaryHeap;

/// One `((dx, dy), CostEntry)` record emitted by a single Dijkstra run.
pub type RoutingCostMap = Vec<((i32, i32), CostEntry)>;

/// Reusable scratch state for repeated Dijkstra runs over the same node
/// count, avoiding a full zero-fill of `expanded`/`visited_cost` before
/// every start node within one segment's profiling pass.
///
/// `expanded` is tracked via a generation counter rather than cleared: a
/// node is considered expanded in the current run only if its stored
/// generation matches `self.generation`.
pub struct DijkstraScratch {
    visited_cost: Vec<f64>,
    expanded_gen: Vec<u64>,
    generation: u64,
}

impl DijkstraScratch {
    /// Allocates scratch arrays sized for `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            visited_cost: vec![-1.0; node_count],
            expanded_gen: vec![0; node_count],
            generation: 0,
        }
    }

    /// Begins a fresh run, logically resetting all per-node state without
    /// reallocating or zero-filling the backing arrays.
    fn begin_run(&mut self) {
        self.generation += 1;
        for v in &mut self.visited_cost {
            *v = -1.0;
        }
    }

    fn is_expanded(&self, node: NodeId) -> bool {
        self.expanded_gen[node.as_raw() as usize] == self.generation
    }

    fn mark_expanded(&mut self, node: NodeId) {
        self.expanded_gen[node.as_raw() as usize] = self.generation;
    }

    fn visited_cost(&self, node: NodeId) -> f64 {
        self.visited_cost[node.as_raw() as usize]
    }

    fn set_visited_cost(&mut self, node: NodeId, cost: f64) {
        self.visited_cost[node.as_raw() as usize] = cost;
    }
}

/// Runs Dijkstra's algorithm from `start`, appending one record to
/// `out` for every IPIN reached.
///
/// Costs are monotone non-decreasing along any path (every contribution is
/// `>= 0`), so the first pop of a node is optimal — this is a standard
/// best-first Dijkstra, not A*: there is no heuristic term here, since this
/// *is* the routine building the heuristic table.
pub fn run_dijkstra<R, S, C, B>(
    rrg: &R,
    switches: &S,
    congestion_src: &C,
    boxes: &B,
    start: NodeId,
    scratch: &mut DijkstraScratch,
    out: &mut RoutingCostMap,
) -> Result<(), LookaheadError>
where
    R: RrgView,
    S: SwitchCatalogue,
    C: CongestionSource,
    B: ConnectionBoxDb,
{
    let start_loc = boxes
        .canonical_loc(start)
        .ok_or(LookaheadError::MissingCanonicalLocation(start))?;

    scratch.begin_run();

    let mut pq: BinaryHeap<CombinedEntry> = BinaryHeap::new();
    pq.push(CombinedEntry::starting(start));
    scratch.set_visited_cost(start, 0.0);

    while let Some(current) = pq.pop() {
        let node = current.node;

        if scratch.is_expanded(node) {
            continue;
        }

        if rrg.node_type(node) == NodeType::Ipin {
            let (_, box_loc, _) = boxes
                .connection_box(node)
                .ok_or(LookaheadError::MissingConnectionBox(node))?;
            let dx = start_loc.0 - box_loc.0;
            let dy = start_loc.1 - box_loc.1;
            out.push((
                (dx, dy),
                CostEntry::new(current.delay, current.congestion_upstream),
            ));
        }

        for edge in rrg.edges(node) {
            let candidate = current.expand(rrg, switches, congestion_src, edge.target, edge.switch, 0.0);
            let prior = scratch.visited_cost(edge.target);
            if prior < 0.0 || candidate.cost() < prior {
                scratch.set_visited_cost(edge.target, candidate.cost());
                pq.push(candidate);
            }
        }

        scratch.mark_expanded(node);
    }

    Ok(())
}

//! Priority-Queue Entry Builders (C2).
//!
//! Given a candidate transition (upstream state + switch + target node),
//! derive its additive cost using a linearised Elmore RC delay model. Three
//! flavours exist, tracking different subsets of state; all three order
//! the same way the teacher's `AStarState` does in
//! `aion_pnr::routing::astar`: `Ord` is reversed so a `BinaryHeap` behaves
//! as a min-heap, with ties broken by node index for determinism.

use crate::ids::NodeId;
use crate::rrg::{CongestionSource, RrgView, SwitchCatalogue, SwitchInfo};
use std::cmp::Ordering;

/// The Elmore-linear delay and congestion contribution of one transition.
///
/// Returns `(t_linear, congestion_contribution)`. Both are `>= 0` for any
/// non-starting transition (asserted in debug builds).
pub fn elmore_contribution(
    switch: SwitchInfo,
    target_r: f64,
    target_c: f64,
    base_cost: f64,
    tsw_adjust: f64,
) -> (f64, f64) {
    let tsw = switch.t_del + tsw_adjust;
    debug_assert!(tsw >= 0.0, "switch intrinsic delay must be non-negative");

    let t_linear = if switch.buffered {
        tsw + switch.r * target_c + 0.5 * target_r * target_c
    } else {
        tsw + 0.5 * switch.r * target_c
    };

    let congestion = if switch.configurable { base_cost } else { 0.0 };

    debug_assert!(t_linear >= 0.0, "linear delay must be non-negative");
    debug_assert!(congestion >= 0.0, "congestion contribution must be non-negative");

    (t_linear, congestion)
}

/// Builds the transition data shared by all three entry variants below.
///
/// `starting` nodes contribute neither delay nor congestion, matching the
/// spec's "A starting node contributes neither" rule.
struct Transition {
    t_linear: f64,
    congestion: f64,
}

fn transition<R: RrgView, S: SwitchCatalogue, C: CongestionSource>(
    rrg: &R,
    switches: &S,
    congestion_src: &C,
    target: NodeId,
    switch: crate::ids::SwitchId,
    starting: bool,
    tsw_adjust: f64,
) -> Transition {
    if starting {
        return Transition {
            t_linear: 0.0,
            congestion: 0.0,
        };
    }
    let info = switches.switch_info(switch);
    let base_cost = congestion_src.base_cost(target);
    let (t_linear, congestion) = elmore_contribution(
        info,
        rrg.resistance(target),
        rrg.capacitance(target),
        base_cost,
        tsw_adjust,
    );
    Transition {
        t_linear,
        congestion,
    }
}

/// Common ordering helper: reversed partial_cmp by a scalar key, with a
/// node-index tiebreak, matching the teacher's min-heap-over-max-heap idiom.
fn ordered_by(key_self: f64, node_self: NodeId, key_other: f64, node_other: NodeId) -> Ordering {
    key_other
        .partial_cmp(&key_self)
        .unwrap_or(Ordering::Equal)
        .then_with(|| node_other.cmp(&node_self))
}

/// Tracks delay, upstream resistance, and upstream congestion; ordered by
/// delay. Used by the Dijkstra explorer (C3).
#[derive(Debug, Clone, Copy)]
pub struct CombinedEntry {
    /// The node this entry represents.
    pub node: NodeId,
    /// Accumulated delay from the start node.
    pub delay: f64,
    /// Upstream node resistance (carried for Elmore continuation, unused
    /// in the cost itself).
    pub r_upstream: f64,
    /// Accumulated congestion base-cost from the start node.
    pub congestion_upstream: f64,
}

impl CombinedEntry {
    /// Builds the initial entry for a Dijkstra start node.
    pub fn starting(node: NodeId) -> Self {
        Self {
            node,
            delay: 0.0,
            r_upstream: 0.0,
            congestion_upstream: 0.0,
        }
    }

    /// Builds the entry for expanding from `self` across one edge.
    pub fn expand<R: RrgView, S: SwitchCatalogue, C: CongestionSource>(
        &self,
        rrg: &R,
        switches: &S,
        congestion_src: &C,
        target: NodeId,
        switch: crate::ids::SwitchId,
        tsw_adjust: f64,
    ) -> Self {
        let t = transition(rrg, switches, congestion_src, target, switch, false, tsw_adjust);
        Self {
            node: target,
            delay: self.delay + t.t_linear,
            r_upstream: rrg.resistance(target),
            congestion_upstream: self.congestion_upstream + t.congestion,
        }
    }

    /// The scalar priority-queue ordering key (delay).
    pub fn cost(&self) -> f64 {
        self.delay
    }
}

impl PartialEq for CombinedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost() == other.cost() && self.node == other.node
    }
}
impl Eq for CombinedEntry {}
impl PartialOrd for CombinedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for CombinedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        ordered_by(self.cost(), self.node, other.cost(), other.node)
    }
}

/// Tracks only accumulated delay; ordered by delay.
#[derive(Debug, Clone, Copy)]
pub struct DelayEntry {
    /// The node this entry represents.
    pub node: NodeId,
    /// Accumulated delay cost.
    pub delay_cost: f64,
}

impl DelayEntry {
    /// Builds the initial entry for a start node.
    pub fn starting(node: NodeId) -> Self {
        Self {
            node,
            delay_cost: 0.0,
        }
    }

    /// Builds the entry for expanding from `self` across one edge. Delay
    /// entries ignore congestion entirely.
    pub fn expand<R: RrgView, S: SwitchCatalogue>(
        &self,
        rrg: &R,
        switches: &S,
        target: NodeId,
        switch: crate::ids::SwitchId,
    ) -> Self {
        let info = switches.switch_info(switch);
        let (t_linear, _congestion) =
            elmore_contribution(info, rrg.resistance(target), rrg.capacitance(target), 0.0, 0.0);
        Self {
            node: target,
            delay_cost: self.delay_cost + t_linear,
        }
    }
}

impl PartialEq for DelayEntry {
    fn eq(&self, other: &Self) -> bool {
        self.delay_cost == other.delay_cost && self.node == other.node
    }
}
impl Eq for DelayEntry {}
impl PartialOrd for DelayEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DelayEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        ordered_by(self.delay_cost, self.node, other.delay_cost, other.node)
    }
}

/// Tracks only accumulated congestion base-cost; ordered by base cost.
#[derive(Debug, Clone, Copy)]
pub struct BaseCostEntry {
    /// The node this entry represents.
    pub node: NodeId,
    /// Accumulated congestion base cost.
    pub base_cost: f64,
}

impl BaseCostEntry {
    /// Builds the initial entry for a start node.
    pub fn starting(node: NodeId) -> Self {
        Self {
            node,
            base_cost: 0.0,
        }
    }

    /// Builds the entry for expanding from `self` across one edge. Base-cost
    /// entries ignore delay entirely.
    pub fn expand<S: SwitchCatalogue, C: CongestionSource>(
        &self,
        switches: &S,
        congestion_src: &C,
        target: NodeId,
        switch: crate::ids::SwitchId,
    ) -> Self {
        let info = switches.switch_info(switch);
        let added = if info.configurable {
            congestion_src.base_cost(target)
        } else {
            0.0
        };
        Self {
            node: target,
            base_cost: self.base_cost + added,
        }
    }
}

impl PartialEq for BaseCostEntry {
    fn eq(&self, other: &Self) -> bool {
        self.base_cost == other.base_cost && self.node == other.node
    }
}
impl Eq for BaseCostEntry {}
impl PartialOrd for BaseCostEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for BaseCostEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        ordered_by(self.base_cost, self.node, other.base_cost, other.node)
    }
}

//! Contracts for the four external collaborators this crate consumes.
//!
//! Construction of a real routing-resource graph, switch catalogue,
//! connection-box database, and congestion accounting are all out of scope
//! for this crate (see the crate-level docs). These traits let the rest of
//! the crate be written and tested without depending on any concrete RRG.

use crate::ids::{BoxId, NodeId, SegmentId, SwitchId};

/// The functional type of a routing-resource graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A logical source (feeds one or more OPINs).
    Source,
    /// A logical sink (fed by one or more IPINs).
    Sink,
    /// An input pin on a logic block.
    Ipin,
    /// An output pin on a logic block.
    Opin,
    /// A horizontal routing channel wire.
    HorizontalChan,
    /// A vertical routing channel wire.
    VerticalChan,
}

impl NodeType {
    /// Whether this type is a channel wire (horizontal or vertical).
    pub fn is_channel(self) -> bool {
        matches!(self, NodeType::HorizontalChan | NodeType::VerticalChan)
    }
}

/// Which channel orientation to enumerate nodes for during profiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanOrientation {
    /// Horizontal routing channel.
    Horizontal,
    /// Vertical routing channel.
    Vertical,
}

impl ChanOrientation {
    /// The node type that corresponds to this orientation.
    pub fn node_type(self) -> NodeType {
        match self {
            ChanOrientation::Horizontal => NodeType::HorizontalChan,
            ChanOrientation::Vertical => NodeType::VerticalChan,
        }
    }
}

/// A single directed edge `(target, switch)` leaving some node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// The node this edge leads to.
    pub target: NodeId,
    /// The switch that implements this edge.
    pub switch: SwitchId,
}

/// Read-only access to the routing-resource graph.
///
/// Implemented by whatever owns the real device model; this crate never
/// constructs one itself.
pub trait RrgView {
    /// Returns the functional type of a node.
    fn node_type(&self, node: NodeId) -> NodeType;

    /// Returns the node's capacitance (farads, or the device model's unit).
    fn capacitance(&self, node: NodeId) -> f64;

    /// Returns the node's resistance (ohms, or the device model's unit).
    fn resistance(&self, node: NodeId) -> f64;

    /// Returns the outgoing edges from a node.
    fn edges(&self, node: NodeId) -> &[Edge];

    /// Returns the wire-segment type of a node, if it has one (non-wire
    /// nodes such as SOURCE/SINK/IPIN/OPIN have none).
    fn segment_of(&self, node: NodeId) -> Option<SegmentId>;

    /// The number of distinct wire-segment types in the device.
    fn segment_count(&self) -> usize;

    /// Enumerates every node index of the given orientation located at grid
    /// cell `(x, y)`.
    fn nodes_at(&self, orientation: ChanOrientation, x: i32, y: i32) -> &[NodeId];

    /// The total number of nodes in the graph (used to size scratch arrays).
    fn node_count(&self) -> usize;
}

/// Per-switch timing and behavior, keyed by [`SwitchId`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchInfo {
    /// Intrinsic switch delay.
    pub t_del: f64,
    /// Switch resistance.
    pub r: f64,
    /// Whether this switch is buffered (vs. a pass transistor).
    pub buffered: bool,
    /// Whether this switch is configurable (contributes congestion cost).
    pub configurable: bool,
}

/// Read-only access to the switch catalogue.
pub trait SwitchCatalogue {
    /// Returns the timing/behavior record for a switch.
    fn switch_info(&self, switch: SwitchId) -> SwitchInfo;
}

/// Read-only access to the connection-box database.
pub trait ConnectionBoxDb {
    /// Returns the canonical `(x, y)` location of a wire or input pin node,
    /// if one has been assigned.
    fn canonical_loc(&self, node: NodeId) -> Option<(i32, i32)>;

    /// Resolves an IPIN's owning connection box: `(box_id, (x, y),
    /// site_pin_delay)`.
    fn connection_box(&self, ipin: NodeId) -> Option<(BoxId, (i32, i32), f64)>;

    /// Returns the input pins feeding a SINK node.
    fn sink_to_ipins(&self, sink: NodeId) -> &[NodeId];
}

/// Read-only access to the router's per-node congestion base cost.
pub trait CongestionSource {
    /// Returns the base congestion cost of routing through `node` (`>= 0`).
    fn base_cost(&self, node: NodeId) -> f64;
}

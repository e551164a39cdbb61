//! Routing engine for the PnR pipeline.
//!
//! Routes all nets in the netlist, connecting each driver pin to its sink
//! pins through the device's routing fabric. Uses the PathFinder negotiated
//! congestion algorithm with A* search for individual net routing.

mod astar;
mod congestion;
mod pathfinder;

use crate::data::PnrNetlist;
use aion_arch::Architecture;
use aion_diagnostics::DiagnosticSink;

/// Routes all nets in the netlist.
///
/// In Phase 2, the device routing graph is not yet populated, so this
/// produces stub route trees (direct connections). When Phase 3 populates
/// the routing graph, this will use PathFinder + A* for full routing.
pub fn route(netlist: &mut PnrNetlist, arch: &dyn Architecture, sink: &DiagnosticSink) {
    if arch.routing_graph().wires.is_empty() {
        // Phase 2 stub: create direct route trees
        pathfinder::stub_routing(netlist, sink);
    } else {
        // Phase 3: full PathFinder routing
        pathfinder::pathfinder_route(netlist, arch, sink);
    }
}

//! Routing-cost lookahead oracle for the Aion FPGA place-and-route engine.
//!
//! Builds an A*-style heuristic cost table for the router: for each wire-
//! segment type, a small set of representative source nodes is profiled
//! with Dijkstra's algorithm to find the expected delay and congestion
//! cost of reaching every input pin at every relative `(dx, dy)` offset.
//! The resulting table answers, in O(1), "roughly what will it cost to
//! route from here to there?" without re-running Dijkstra per query.
//!
//! # Pipeline
//!
//! 1. **Profile** ([`profile`]) — pick representative source nodes per
//!    segment type via a diagonal neighbourhood scan.
//! 2. **Explore** ([`dijkstra`]) — from each source, accumulate delay and
//!    congestion to every reachable input pin ([`pq_entry`] supplies the
//!    Elmore-delay priority-queue entries).
//! 3. **Reduce** ([`accumulator`]) — collapse the many samples landing in
//!    one `(segment, dx, dy)` bucket to a single representative entry.
//! 4. **Store** ([`cost_map`]) — assemble the per-segment grids, filling
//!    gaps by nearest-valid extrapolation; persist via [`persist`].
//! 5. **Query** ([`oracle`]) — answer `(from, to, criticality)` lookups
//!    against the built table.
//!
//! Routing-resource graph construction, the switch/segment catalogue, the
//! connection-box database, and congestion base-cost accounting are all
//! owned elsewhere in the toolchain; this crate consumes them only through
//! the [`rrg`] traits.
//!
//! # Usage
//!
//! ```ignore
//! use aion_lookahead::{accumulator::ReductionRule, cost_map::CostMap, dijkstra::DijkstraScratch,
//!     oracle::expected_cost, profile::{profile_segment, ProfilingConfig}};
//!
//! let mut scratch = DijkstraScratch::new(rrg.node_count());
//! let mut map = CostMap::new(rrg.segment_count(), rrg.node_count());
//! for segment in segments {
//!     let result = profile_segment(&rrg, &switches, &congestion, &boxes, segment,
//!         ProfilingConfig::default(), &mut scratch)?;
//!     map.set_cost_map(segment, &result.samples, ReductionRule::SmallestDelay);
//! }
//! let cost = expected_cost(&rrg, &boxes, &map, from, to, criticality, sink_base_cost)?;
//! ```

#![warn(missing_docs)]

pub mod accumulator;
pub mod cost_map;
pub mod dijkstra;
pub mod error;
pub mod ids;
pub mod oracle;
pub mod persist;
pub mod pq_entry;
pub mod profile;
pub mod rrg;

pub use accumulator::{CostEntry, ExpansionCostEntry, ReductionRule};
pub use cost_map::CostMap;
pub use dijkstra::{run_dijkstra, DijkstraScratch, RoutingCostMap};
pub use error::LookaheadError;
pub use ids::{BoxId, NodeId, SegmentId, SwitchId};
pub use oracle::expected_cost;
pub use profile::{profile_segment, warn_no_sources, ProfilingConfig, ProfileResult};
pub use rrg::{ChanOrientation, CongestionSource, ConnectionBoxDb, Edge, NodeType, RrgView, SwitchCatalogue, SwitchInfo};

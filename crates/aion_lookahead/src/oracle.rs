//! Query Oracle (C6).
//!
//! Maps a `(from, to)` node pair and a criticality weight to an expected
//! routing cost, consulting the built [`CostMap`] and falling back to a
//! caller-supplied sink base cost for the IPIN indirection the connection-
//! box lookahead always needs at the final hop.

use crate::accumulator::CostEntry;
use crate::cost_map::CostMap;
use crate::error::LookaheadError;
use crate::ids::NodeId;
use crate::rrg::{ConnectionBoxDb, NodeType, RrgView};

/// Bound on how many IPINs feeding one sink are consulted before giving up
/// and returning the sink's own base cost; guards against a misbehaving
/// `ConnectionBoxDb::sink_to_ipins` implementation returning a pathological
/// fan-in list.
const MAX_SINK_IPIN_FANOUT: usize = 64;

/// Answers "what will it cost to route from `from` to `to`?" using the
/// lookahead cost map, blended with a timing-criticality weight.
///
/// `criticality` is expected in `[0, 1]`; `0` weights purely on congestion,
/// `1` weights purely on delay. Out-of-range values are not rejected —
/// the blend is still well-defined, just outside its intended domain.
///
/// A missing canonical location or connection box is a hard error here
/// (unlike during profiling, where it can only ever happen for nodes the
/// caller chose not to resolve): a query names its `from`/`to` directly, so
/// there is no adaptive retry to fall back on.
#[allow(clippy::too_many_arguments)]
pub fn expected_cost<R, B>(
    rrg: &R,
    boxes: &B,
    cost_map: &CostMap,
    from: NodeId,
    to: NodeId,
    criticality: f64,
    sink_base_cost: f64,
) -> Result<f64, LookaheadError>
where
    R: RrgView,
    B: ConnectionBoxDb,
{
    if from == to {
        return Ok(0.0);
    }

    if rrg.node_type(from) == NodeType::Ipin {
        return Ok(sink_base_cost);
    }

    if rrg.node_type(to) == NodeType::Sink {
        // A SINK target is resolved through whichever of its feeding IPINs
        // is cheapest to reach from `from`, bounded to avoid unbounded
        // recursion on malformed fan-in data. Recursion depth from here is
        // at most 2 (sink -> ipin), since the recursive call's target is
        // never itself a sink.
        let candidates = boxes.sink_to_ipins(to);
        let bounded = &candidates[..candidates.len().min(MAX_SINK_IPIN_FANOUT)];
        if bounded.is_empty() {
            return Ok(f64::INFINITY);
        }
        if bounded.len() == 1 {
            return expected_cost(rrg, boxes, cost_map, from, bounded[0], criticality, sink_base_cost);
        }
        let mut best = f64::INFINITY;
        for &ipin in bounded {
            let cost = expected_cost(rrg, boxes, cost_map, from, ipin, criticality, sink_base_cost)?;
            best = best.min(cost);
        }
        return Ok(best);
    }

    let Some(segment) = rrg.segment_of(from) else {
        // `from` is some other non-wire node (SOURCE/OPIN): reserved hook
        // for future route-through handling.
        return Ok(0.0);
    };
    let (from_x, from_y) = boxes
        .canonical_loc(from)
        .ok_or(LookaheadError::MissingCanonicalLocation(from))?;

    // The query target's location is taken from its connection box when it
    // is an IPIN, or its canonical location for a wire target — the same
    // asymmetric rule the profiling driver uses when recording samples,
    // preserved here so queries and the table built from them agree on
    // what `(dx, dy)` means. Resolution failure is a hard error in both
    // cases, per the query row of the "missing canonical location" /
    // "missing connection box" policies.
    let (to_x, to_y) = if rrg.node_type(to) == NodeType::Ipin {
        boxes
            .connection_box(to)
            .map(|(_, loc, _)| loc)
            .ok_or(LookaheadError::MissingConnectionBox(to))?
    } else {
        boxes
            .canonical_loc(to)
            .ok_or(LookaheadError::MissingCanonicalLocation(to))?
    };

    let dx = from_x - to_x;
    let dy = from_y - to_y;

    let entry = cost_map.find_cost(segment, dx, dy)?;

    if !entry.valid() {
        return Ok(0.0);
    }

    Ok(criticality * entry.delay + (1.0 - criticality) * entry.congestion)
}

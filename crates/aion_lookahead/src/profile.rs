//! Profiling Driver (C4).
//!
//! For each wire-segment type, selects a small, representative set of
//! source nodes by scanning a diagonal neighbourhood of the device grid
//! around a reference coordinate, running the Dijkstra explorer (C3) from
//! each, under an adaptive stopping rule.

use crate::dijkstra::{run_dijkstra, DijkstraScratch, RoutingCostMap};
use crate::error::LookaheadError;
use crate::ids::SegmentId;
use crate::rrg::{ChanOrientation, CongestionSource, ConnectionBoxDb, RrgView, SwitchCatalogue};
use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use aion_source::Span;

/// Profiling parameters. Defaults match the spec's fixed constants; the
/// reference coordinate and search bounds are exposed as fields so unit
/// tests can exercise the adaptive stopping rule on small fixture grids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilingConfig {
    /// Reference grid column to begin the diagonal scan from.
    pub ref_x: i32,
    /// Reference grid row to begin the diagonal scan from.
    pub ref_y: i32,
    /// Minimum profiling depth: guarantees `dy <= kMinProfile` is explored
    /// regardless of whether any source was found.
    pub min_profile: i32,
    /// Hard cap on profiling depth when no source has been found yet.
    pub max_profile: i32,
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            ref_x: 25,
            ref_y: 23,
            min_profile: 1,
            max_profile: 7,
        }
    }
}

/// The result of profiling one segment type: the accumulated samples and
/// whether any source node was ever found.
pub struct ProfileResult {
    /// Accumulated `(dx, dy, delay, congestion)` samples for this segment.
    pub samples: RoutingCostMap,
    /// Whether at least one source node was found during the scan.
    pub found_source: bool,
}

/// Profiles a single segment type `segment`, returning its accumulated
/// routing-cost samples.
///
/// Implements the diagonal-neighbourhood walk: state `(dx, dy)` starts at
/// `(0, 0)`; each step increments `dy` if `dy < dx`, else increments `dx`.
/// At each offset, both channel orientations are scanned at grid cell
/// `(ref_x + dx, ref_y + dy)` for nodes of this segment type with a
/// resolvable canonical location. The loop continues while
/// `(count == 0 && dx < max_profile) || dy <= min_profile`.
#[allow(clippy::too_many_arguments)]
pub fn profile_segment<R, S, C, B>(
    rrg: &R,
    switches: &S,
    congestion_src: &C,
    boxes: &B,
    segment: SegmentId,
    config: ProfilingConfig,
    scratch: &mut DijkstraScratch,
) -> Result<ProfileResult, LookaheadError>
where
    R: RrgView,
    S: SwitchCatalogue,
    C: CongestionSource,
    B: ConnectionBoxDb,
{
    let mut samples = RoutingCostMap::new();
    let mut count = 0u32;
    let mut dx = 0i32;
    let mut dy = 0i32;

    while (count == 0 && dx < config.max_profile) || dy <= config.min_profile {
        for orientation in [ChanOrientation::Horizontal, ChanOrientation::Vertical] {
            let cell_x = config.ref_x + dx;
            let cell_y = config.ref_y + dy;
            for &node in rrg.nodes_at(orientation, cell_x, cell_y) {
                if rrg.segment_of(node) != Some(segment) {
                    continue;
                }
                if boxes.canonical_loc(node).is_none() {
                    continue;
                }
                count += 1;
                run_dijkstra(rrg, switches, congestion_src, boxes, node, scratch, &mut samples)?;
            }
        }

        if dy < dx {
            dy += 1;
        } else {
            dx += 1;
        }
    }

    Ok(ProfileResult {
        samples,
        found_source: count > 0,
    })
}

/// Emits the "no sources found" warning for a segment, matching
/// `aion_pnr::routing::pathfinder`'s non-convergence warning in style.
pub fn warn_no_sources(sink: &DiagnosticSink, segment: SegmentId) {
    sink.emit(Diagnostic::warning(
        DiagnosticCode::new(Category::Timing, 30),
        format!(
            "lookahead profiling found no source nodes for segment {}; \
             its cost map will be entirely extrapolated",
            segment
        ),
        Span::DUMMY,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{BoxId, NodeId, SwitchId};
    use crate::rrg::{Edge, NodeType, SwitchInfo};
    use std::collections::HashMap;

    /// A fixture with exactly one matching node at `(ref_x+2, ref_y)`, so
    /// the scan must walk past `min_profile` to find it.
    struct FixtureRrg {
        node_types: HashMap<u32, NodeType>,
        edges: HashMap<u32, Vec<Edge>>,
        at: HashMap<(i32, i32, bool), Vec<NodeId>>,
        segments: HashMap<u32, SegmentId>,
    }

    impl RrgView for FixtureRrg {
        fn node_type(&self, node: NodeId) -> NodeType {
            self.node_types[&node.as_raw()]
        }
        fn capacitance(&self, _node: NodeId) -> f64 {
            1.0
        }
        fn resistance(&self, _node: NodeId) -> f64 {
            0.0
        }
        fn edges(&self, node: NodeId) -> &[Edge] {
            self.edges.get(&node.as_raw()).map(|v| v.as_slice()).unwrap_or(&[])
        }
        fn segment_of(&self, node: NodeId) -> Option<SegmentId> {
            self.segments.get(&node.as_raw()).copied()
        }
        fn segment_count(&self) -> usize {
            1
        }
        fn nodes_at(&self, orientation: ChanOrientation, x: i32, y: i32) -> &[NodeId] {
            let horiz = matches!(orientation, ChanOrientation::Horizontal);
            self.at.get(&(x, y, horiz)).map(|v| v.as_slice()).unwrap_or(&[])
        }
        fn node_count(&self) -> usize {
            self.node_types.len() + 1
        }
    }

    struct FixtureSwitches;
    impl SwitchCatalogue for FixtureSwitches {
        fn switch_info(&self, _switch: SwitchId) -> SwitchInfo {
            SwitchInfo {
                t_del: 0.0,
                r: 0.0,
                buffered: true,
                configurable: false,
            }
        }
    }

    struct ZeroCongestion;
    impl CongestionSource for ZeroCongestion {
        fn base_cost(&self, _node: NodeId) -> f64 {
            0.0
        }
    }

    struct FixtureBoxes {
        canonical: HashMap<u32, (i32, i32)>,
        boxes: HashMap<u32, (BoxId, (i32, i32), f64)>,
    }
    impl ConnectionBoxDb for FixtureBoxes {
        fn canonical_loc(&self, node: NodeId) -> Option<(i32, i32)> {
            self.canonical.get(&node.as_raw()).copied()
        }
        fn connection_box(&self, ipin: NodeId) -> Option<(BoxId, (i32, i32), f64)> {
            self.boxes.get(&ipin.as_raw()).copied()
        }
        fn sink_to_ipins(&self, _sink: NodeId) -> &[NodeId] {
            &[]
        }
    }

    #[test]
    fn finds_source_beyond_min_profile() {
        let seg = SegmentId::from_raw(0);
        let src = NodeId::from_raw(0);
        let ipin = NodeId::from_raw(1);

        let config = ProfilingConfig::default();

        let mut node_types = HashMap::new();
        node_types.insert(src.as_raw(), NodeType::HorizontalChan);
        node_types.insert(ipin.as_raw(), NodeType::Ipin);

        let mut edges = HashMap::new();
        edges.insert(
            src.as_raw(),
            vec![Edge {
                target: ipin,
                switch: SwitchId::from_raw(0),
            }],
        );

        let mut at = HashMap::new();
        // Source node sits at offset (2, 0) from the reference coordinate.
        at.insert((config.ref_x + 2, config.ref_y, true), vec![src]);

        let mut segments = HashMap::new();
        segments.insert(src.as_raw(), seg);

        let rrg = FixtureRrg {
            node_types,
            edges,
            at,
            segments,
        };
        let switches = FixtureSwitches;
        let congestion = ZeroCongestion;
        let mut canonical = HashMap::new();
        canonical.insert(src.as_raw(), (config.ref_x + 2, config.ref_y));
        let mut boxes_map = HashMap::new();
        boxes_map.insert(
            ipin.as_raw(),
            (BoxId::from_raw(0), (config.ref_x + 3, config.ref_y), 0.0),
        );
        let boxes = FixtureBoxes {
            canonical,
            boxes: boxes_map,
        };

        let mut scratch = DijkstraScratch::new(rrg.node_count());
        let result =
            profile_segment(&rrg, &switches, &congestion, &boxes, seg, config, &mut scratch).unwrap();

        assert!(result.found_source);
        assert_eq!(result.samples.len(), 1);
    }

    #[test]
    fn no_source_found_reports_empty() {
        let seg = SegmentId::from_raw(0);
        let rrg = FixtureRrg {
            node_types: HashMap::new(),
            edges: HashMap::new(),
            at: HashMap::new(),
            segments: HashMap::new(),
        };
        let switches = FixtureSwitches;
        let congestion = ZeroCongestion;
        let boxes = FixtureBoxes {
            canonical: HashMap::new(),
            boxes: HashMap::new(),
        };
        let config = ProfilingConfig::default();
        let mut scratch = DijkstraScratch::new(1);
        let result =
            profile_segment(&rrg, &switches, &congestion, &boxes, seg, config, &mut scratch).unwrap();
        assert!(!result.found_source);
        assert!(result.samples.is_empty());
    }

    #[test]
    fn stops_at_min_profile_when_exceeded_and_nothing_found() {
        // With an empty fixture, the walk must still terminate (hard cap).
        let seg = SegmentId::from_raw(0);
        let rrg = FixtureRrg {
            node_types: HashMap::new(),
            edges: HashMap::new(),
            at: HashMap::new(),
            segments: HashMap::new(),
        };
        let switches = FixtureSwitches;
        let congestion = ZeroCongestion;
        let boxes = FixtureBoxes {
            canonical: HashMap::new(),
            boxes: HashMap::new(),
        };
        let config = ProfilingConfig {
            max_profile: 2,
            ..ProfilingConfig::default()
        };
        let mut scratch = DijkstraScratch::new(1);
        let result =
            profile_segment(&rrg, &switches, &congestion, &boxes, seg, config, &mut scratch).unwrap();
        assert!(!result.found_source);
    }
}

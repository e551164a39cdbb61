//! Cost Map (C5).
//!
//! Per wire-segment type, holds a 2-D grid of representative cost entries
//! addressed by `(dx, dy)` with a per-segment origin offset. Fills empty
//! cells by nearest-valid extrapolation and round-trips bit-exactly to a
//! binary container (see [`crate::persist`]).

use crate::accumulator::{CostEntry, ExpansionCostEntry, ReductionRule};
use crate::dijkstra::RoutingCostMap;
use crate::error::LookaheadError;
use crate::ids::SegmentId;
use serde::{Deserialize, Serialize};

/// A 2-D grid of [`CostEntry`] values addressed `[x][y]`, row-major in `y`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid2D {
    width: usize,
    height: usize,
    cells: Vec<CostEntry>,
}

impl Grid2D {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CostEntry::INVALID; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn get(&self, x: usize, y: usize) -> CostEntry {
        self.cells[self.index(x, y)]
    }

    fn set(&mut self, x: usize, y: usize, entry: CostEntry) {
        let idx = self.index(x, y);
        self.cells[idx] = entry;
    }

    /// Grid width (number of distinct `dx` offsets).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (number of distinct `dy` offsets).
    pub fn height(&self) -> usize {
        self.height
    }
}

fn signum(x: i32) -> i32 {
    x.cmp(&0) as i32
}

/// Rounds half away from zero, as the spec requires for extrapolation
/// stepping (any consistent rounding works; this one matches the
/// original's `vtr::nint`).
fn round_half_away_from_zero(x: f64) -> i32 {
    if x >= 0.0 {
        (x + 0.5).floor() as i32
    } else {
        (x - 0.5).ceil() as i32
    }
}

/// The per-segment cost grid, plus its canonical origin offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SegmentGrid {
    origin_x: i32,
    origin_y: i32,
    grid: Grid2D,
}

/// Owns, per wire-segment type, a cost grid and the dense node-to-segment
/// mapping. Built once via [`CostMap::set_cost_map`] per segment, then
/// read-only for the lifetime of the router.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CostMap {
    segments: Vec<SegmentGrid>,
    node_to_segment: Vec<i32>,
}

impl CostMap {
    /// Creates an empty cost map sized for `segment_count` segments and
    /// `node_count` RRG nodes, with every node mapped to "no segment"
    /// (`-1`) until [`set_node_segment`](Self::set_node_segment) is called.
    pub fn new(segment_count: usize, node_count: usize) -> Self {
        Self {
            segments: (0..segment_count)
                .map(|_| SegmentGrid {
                    origin_x: 0,
                    origin_y: 0,
                    grid: Grid2D::new(1, 1),
                })
                .collect(),
            node_to_segment: vec![-1; node_count],
        }
    }

    /// Records the wire-segment type of one RRG node (`-1` for non-wire
    /// nodes).
    pub fn set_node_segment(&mut self, node_index: usize, segment: i32) {
        self.node_to_segment[node_index] = segment;
    }

    /// Returns the segment index of a node, or `None` if it has none.
    pub fn node_to_segment(&self, node_index: usize) -> Option<SegmentId> {
        let seg = self.node_to_segment[node_index];
        if seg < 0 {
            None
        } else {
            Some(SegmentId::from_raw(seg as u32))
        }
    }

    /// Builds the cost grid for one segment from its accumulated samples.
    ///
    /// Computes the origin (most-negative `dx`/`dy` observed, clamped so
    /// `0` is always included — both components are always `<= 0`),
    /// deposits every sample into an expansion grid bucketed by
    /// `(dx - min_dx, dy - min_dy)`, reduces each bucket to a representative
    /// entry under `rule`, then fills any still-invalid cell by nearest-
    /// valid extrapolation.
    pub fn set_cost_map(&mut self, segment: SegmentId, samples: &RoutingCostMap, rule: ReductionRule) {
        let idx = segment.as_raw() as usize;

        let mut min_dx = 0;
        let mut min_dy = 0;
        let mut max_dx = 0;
        let mut max_dy = 0;
        for &((dx, dy), _) in samples {
            min_dx = min_dx.min(dx);
            min_dy = min_dy.min(dy);
            max_dx = max_dx.max(dx);
            max_dy = max_dy.max(dy);
        }

        let width = (max_dx - min_dx + 1) as usize;
        let height = (max_dy - min_dy + 1) as usize;

        let mut expansion = vec![ExpansionCostEntry::new(); width * height];
        for &((dx, dy), entry) in samples {
            let x = (dx - min_dx) as usize;
            let y = (dy - min_dy) as usize;
            expansion[y * width + x].add(entry.delay, entry.congestion);
        }

        let mut grid = Grid2D::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, expansion[y * width + x].representative(rule));
            }
        }

        self.segments[idx] = SegmentGrid {
            origin_x: min_dx,
            origin_y: min_dy,
            grid,
        };

        for y in 0..height {
            for x in 0..width {
                if !self.segments[idx].grid.get(x, y).valid() {
                    // Extrapolation steps toward the true reference point
                    // `(dx, dy) = (0, 0)`, which generally sits *inside* the
                    // grid rather than at its corner whenever this segment
                    // has a negative origin — so the grid index must be
                    // translated to `(dx, dy)` space before stepping.
                    let dx = x as i32 + min_dx;
                    let dy = y as i32 + min_dy;
                    let filled = nearby_cost_entry(&self.segments[idx].grid, min_dx, min_dy, dx, dy);
                    self.segments[idx].grid.set(x, y, filled);
                }
            }
        }
    }

    /// Looks up the cost from segment `segment` at relative offset
    /// `(dx, dy)`. Out-of-range offsets clamp to the nearest in-range edge
    /// cell — this is deliberate: queries may legitimately fall outside the
    /// range observed during profiling.
    pub fn find_cost(&self, segment: SegmentId, dx: i32, dy: i32) -> Result<CostEntry, LookaheadError> {
        let idx = segment.as_raw() as usize;
        let seg = self
            .segments
            .get(idx)
            .ok_or(LookaheadError::UnknownSegment(segment.as_raw()))?;

        let x = (dx - seg.origin_x).clamp(0, seg.grid.width() as i32 - 1);
        let y = (dy - seg.origin_y).clamp(0, seg.grid.height() as i32 - 1);
        Ok(seg.grid.get(x as usize, y as usize))
    }

    /// The per-segment origin, `(dx, dy) <= (0, 0)`.
    pub fn origin(&self, segment: SegmentId) -> (i32, i32) {
        let seg = &self.segments[segment.as_raw() as usize];
        (seg.origin_x, seg.origin_y)
    }

    /// The number of segment grids held.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Renders a per-segment delay-grid text dump, in the spirit of the
    /// original tool's debug print (kept as a pure formatter here — file
    /// output is the caller's concern).
    pub fn fmt_debug(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for (iseg, seg) in self.segments.iter().enumerate() {
            let _ = writeln!(out, "Seg {iseg} ({}, {})", seg.origin_x, seg.origin_y);
            for y in 0..seg.grid.height() {
                for x in 0..seg.grid.width() {
                    let _ = write!(out, "{:.4},\t", seg.grid.get(x, y).delay);
                }
                let _ = writeln!(out);
            }
            let _ = writeln!(out);
        }
        out
    }
}

/// Finds the nearest valid entry by stepping toward the true reference
/// point `(dx, dy) = (0, 0)` along the slope from `(dx, dy)`, iteratively
/// (not recursively) so termination is guaranteed by strict progress of
/// `|dx| + |dy|` toward zero rather than by stack depth.
///
/// `(dx, dy)` are signed offsets relative to the reference node, *not*
/// grid-array indices — the grid's own corner sits at `(origin_x,
/// origin_y)`, which is generally not `(0, 0)` whenever this segment has a
/// negative origin. `origin_x`/`origin_y` are needed only to translate the
/// stepped `(dx, dy)` back into a grid lookup via [`grid_get_clamped`].
///
/// A cell that is itself the reference point and invalid has nowhere closer
/// to step to, so it is returned unchanged (matches the spec's "singleton
/// valid cell at the origin" caveat, applied in reverse: an empty origin
/// bucket cannot be filled from elsewhere, since every other cell steps
/// *toward* it, never away from it).
fn nearby_cost_entry(grid: &Grid2D, origin_x: i32, origin_y: i32, dx: i32, dy: i32) -> CostEntry {
    if dx == 0 && dy == 0 {
        return grid_get_clamped(grid, origin_x, origin_y, dx, dy);
    }
    let mut cx = dx;
    let mut cy = dy;
    loop {
        let (next_x, next_y) = step_toward_origin(cx, cy);
        debug_assert!(
            (next_x.abs() + next_y.abs()) < (cx.abs() + cy.abs()),
            "extrapolation step must strictly approach the origin"
        );
        cx = next_x;
        cy = next_y;

        let entry = grid_get_clamped(grid, origin_x, origin_y, cx, cy);
        if entry.valid() || (cx == 0 && cy == 0) {
            return entry;
        }
    }
}

fn grid_get_clamped(grid: &Grid2D, origin_x: i32, origin_y: i32, dx: i32, dy: i32) -> CostEntry {
    let x = (dx - origin_x).clamp(0, grid.width() as i32 - 1);
    let y = (dy - origin_y).clamp(0, grid.height() as i32 - 1);
    grid.get(x as usize, y as usize)
}

/// One step of the slope-following extrapolation walk toward `(0, 0)`.
fn step_toward_origin(x: i32, y: i32) -> (i32, i32) {
    if x == 0 || y == 0 {
        return (x - signum(x), y - signum(y));
    }
    let slope = y as f64 / x as f64;
    if slope.abs() >= 1.0 {
        let new_y = y - signum(y);
        let new_x = round_half_away_from_zero(new_y as f64 / slope);
        (new_x, new_y)
    } else {
        let new_x = x - signum(x);
        let new_y = round_half_away_from_zero(new_x as f64 * slope);
        (new_x, new_y)
    }
}

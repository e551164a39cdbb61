//! Technology mapping: maps generic cells to device-specific primitives.
//!
//! Uses the [`TechMapper`] from [`aion_arch`] to convert generic gate cells
//! (AND, OR, MUX, etc.) into LUTs, and to infer BRAMs and DSPs from
//! memory and multiplier patterns.

use crate::netlist::Netlist;
use aion_arch::{ArithmeticPattern, ArithmeticPatternKind, MapResult, MemoryCell, TechMapper};
use aion_common::LogicVec;
use aion_diagnostics::DiagnosticSink;
use aion_ir::{CellId, CellKind, PortDirection, SignalKind, SignalRef, Type};

/// Runs technology mapping on the netlist using the given mapper.
///
/// Iterates all cells and replaces generic primitives with device-specific
/// cells (LUTs, BRAMs, DSPs) based on the architecture's tech mapper.
pub(crate) fn tech_map(netlist: &mut Netlist, mapper: &dyn TechMapper, sink: &DiagnosticSink) {
    let cell_ids: Vec<CellId> = netlist
        .cells
        .iter()
        .filter(|(id, _)| !netlist.is_dead(*id))
        .map(|(id, _)| id)
        .collect();

    for cell_id in cell_ids {
        if netlist.is_dead(cell_id) {
            continue;
        }

        let cell = netlist.cells.get(cell_id);
        let kind = cell.kind.clone();

        match &kind {
            // Memory inference
            CellKind::Memory {
                depth,
                width,
                read_ports,
                write_ports,
            } => {
                let mem = MemoryCell {
                    depth: *depth,
                    width: *width,
                    read_ports: *read_ports,
                    write_ports: *write_ports,
                    has_registered_output: false,
                    clock_signal: None,
                };
                if mapper.infer_bram(&mem) {
                    let cell_mut = netlist.cells.get_mut(cell_id);
                    cell_mut.kind = CellKind::Bram(aion_ir::BramConfig {
                        depth: *depth,
                        width: *width,
                    });
                }
                // If BRAM inference fails, keep as generic Memory
                // (will be decomposed to LUT-RAM in a future pass)
            }

            // Multiplier → DSP inference
            CellKind::Mul { width } => {
                let pattern = ArithmeticPattern {
                    kind: ArithmeticPatternKind::Multiply,
                    width_a: *width,
                    width_b: *width,
                    has_pipeline_regs: false,
                    has_accumulator: false,
                };
                if mapper.infer_dsp(&pattern) {
                    let cell_mut = netlist.cells.get_mut(cell_id);
                    cell_mut.kind = CellKind::Dsp(aion_ir::DspConfig {
                        width_a: *width,
                        width_b: *width,
                    });
                } else {
                    // Falls through to generic mapping below
                    map_to_luts_if_needed(netlist, cell_id, &kind, mapper);
                }
            }

            // DFF / Latch — pass through (already technology-independent primitives)
            CellKind::Dff { .. } | CellKind::Latch { .. } => {
                // DFFs and latches are kept as-is (MapResult::Ff)
            }

            // Already tech-mapped primitives — skip
            CellKind::Lut { .. }
            | CellKind::Carry { .. }
            | CellKind::Bram(_)
            | CellKind::Dsp(_)
            | CellKind::Pll(_)
            | CellKind::Iobuf(_) => {}

            // Instance / BlackBox — skip
            CellKind::Instance { .. } | CellKind::BlackBox { .. } => {}

            // Const cells — skip (no hardware needed)
            CellKind::Const { .. } => {}

            // All other generic cells: map via TechMapper
            _ => {
                map_to_luts_if_needed(netlist, cell_id, &kind, mapper);
            }
        }
    }

    let _ = sink; // Available for future diagnostics
}

/// Attempts to map a generic cell to LUTs using the tech mapper.
fn map_to_luts_if_needed(
    netlist: &mut Netlist,
    cell_id: CellId,
    kind: &CellKind,
    mapper: &dyn TechMapper,
) {
    let result = mapper.map_cell(kind);
    match result {
        MapResult::Luts(mappings) => {
            if mappings.is_empty() {
                return;
            }

            // Get the original cell's connections
            let cell = netlist.cells.get(cell_id);
            let input_signals: Vec<SignalRef> = cell
                .connections
                .iter()
                .filter(|c| c.direction == PortDirection::Input)
                .map(|c| c.signal.clone())
                .collect();
            let _output_signal: Option<SignalRef> = cell
                .connections
                .iter()
                .find(|c| c.direction == PortDirection::Output)
                .map(|c| c.signal.clone());

            if mappings.len() == 1 {
                // Single LUT replacement — keep the same connections
                let m = &mappings[0];
                let init_lv = lut_init_to_logic_vec(&m.init_bits, m.input_count);
                let cell_mut = netlist.cells.get_mut(cell_id);
                cell_mut.kind = CellKind::Lut {
                    width: m.input_count,
                    init: init_lv,
                };
            } else {
                // Multiple LUTs — need per-bit decomposition
                // For multi-bit operations, create one LUT per bit
                // Mark original cell as dead
                netlist.remove_cell(cell_id);

                for (i, m) in mappings.iter().enumerate() {
                    let init_lv = lut_init_to_logic_vec(&m.init_bits, m.input_count);
                    let bit_ty = netlist.types.intern(Type::Bit);
                    let lut_out = netlist.add_signal(&format!("lut{i}"), bit_ty, SignalKind::Wire);

                    let mut conns = Vec::new();
                    // Connect LUT inputs (from input signals, one bit each)
                    for (j, input_ref) in input_signals.iter().enumerate() {
                        conns.push(netlist.input_conn(&format!("I{j}"), input_ref.clone()));
                    }
                    conns.push(netlist.output_conn("Y", SignalRef::Signal(lut_out)));

                    netlist.add_cell(
                        &format!("lut{i}"),
                        CellKind::Lut {
                            width: m.input_count,
                            init: init_lv,
                        },
                        conns,
                    );
                }
            }
        }
        MapResult::Ff | MapResult::PassThrough => {
            // Keep as-is
        }
        MapResult::Bram => {
            // Already handled above for Memory cells
        }
        MapResult::Dsp => {
            // Already handled above for Mul cells
        }
        MapResult::Unmappable => {
            // Leave cell as generic — P&R will handle it or error
        }
    }
}

/// Converts LUT init bits (Vec<u8>) to a LogicVec.
fn lut_init_to_logic_vec(init_bits: &[u8], input_count: u32) -> LogicVec {
    let num_bits = 1u32 << input_count;
    let mut lv = LogicVec::new(num_bits);
    for (i, &bit) in init_bits.iter().enumerate() {
        if i < num_bits as usize && bit != 0 {
            lv.set(i as u32, aion_common::Logic::One);
        }
    }
    lv
}

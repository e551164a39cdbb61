//! Common subexpression elimination (CSE) optimization pass.
//!
//! Identifies cells with identical kinds and identical input signals,
//! then merges their outputs so that only one copy is retained.

use crate::netlist::Netlist;
use crate::optimize::OptPass;
use aion_diagnostics::DiagnosticSink;
use aion_ir::{CellId, CellKind, PortDirection, SignalId, SignalRef};
use std::collections::HashMap;

/// Common subexpression elimination pass.
pub(crate) struct CsePass;

impl OptPass for CsePass {
    fn run(&self, netlist: &mut Netlist, _sink: &DiagnosticSink) -> bool {
        let mut changed = false;

        // Build a map of (cell_kind_key, sorted_input_signals) → first cell_id
        let mut seen: HashMap<CseKey, CellId> = HashMap::new();

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

            // Skip cells that can't be deduplicated
            if !is_pure_cell(&cell.kind) {
                continue;
            }

            let key = make_cse_key(&cell.kind, &cell.connections);

            if let Some(&existing_id) = seen.get(&key) {
                // Found a duplicate — redirect the duplicate's output to the existing cell's output
                // Get the existing cell's output signal
                let existing_output = get_output_signal(netlist, existing_id);
                let dup_output = get_output_signal(netlist, cell_id);

                if let (Some(existing_sig), Some(dup_sig)) = (existing_output, dup_output) {
                    if existing_sig != dup_sig {
                        // Redirect: replace all uses of dup_sig with existing_sig
                        redirect_signal(netlist, dup_sig, existing_sig);
                        netlist.remove_cell(cell_id);
                        changed = true;
                    }
                }
            } else {
                seen.insert(key, cell_id);
            }
        }

        changed
    }
}

/// A key for identifying identical cells.
#[derive(Hash, PartialEq, Eq, Clone, Debug)]
struct CseKey {
    kind_tag: String,
    inputs: Vec<SignalId>,
}

/// Creates a CSE key from a cell's kind and connections.
fn make_cse_key(kind: &CellKind, connections: &[aion_ir::Connection]) -> CseKey {
    let kind_tag = format!("{kind:?}");
    let mut inputs: Vec<SignalId> = connections
        .iter()
        .filter(|c| c.direction == PortDirection::Input)
        .filter_map(|c| match &c.signal {
            SignalRef::Signal(id) => Some(*id),
            _ => None,
        })
        .collect();
    // Sort for commutative operations (AND, OR, XOR, ADD, MUL, EQ)
    if is_commutative(kind) {
        inputs.sort_by_key(|id| id.as_raw());
    }
    CseKey { kind_tag, inputs }
}

/// Returns true if the cell kind is a pure function (no side effects, deterministic).
fn is_pure_cell(kind: &CellKind) -> bool {
    matches!(
        kind,
        CellKind::And { .. }
            | CellKind::Or { .. }
            | CellKind::Xor { .. }
            | CellKind::Not { .. }
            | CellKind::Add { .. }
            | CellKind::Sub { .. }
            | CellKind::Mul { .. }
            | CellKind::Shl { .. }
            | CellKind::Shr { .. }
            | CellKind::Eq { .. }
            | CellKind::Lt { .. }
            | CellKind::Mux { .. }
            | CellKind::Const { .. }
            | CellKind::Concat
            | CellKind::Slice { .. }
    )
}

/// Returns true if the operation is commutative (input order doesn't matter).
fn is_commutative(kind: &CellKind) -> bool {
    matches!(
        kind,
        CellKind::And { .. }
            | CellKind::Or { .. }
            | CellKind::Xor { .. }
            | CellKind::Add { .. }
            | CellKind::Mul { .. }
            | CellKind::Eq { .. }
    )
}

/// Gets the output signal of a cell.
fn get_output_signal(netlist: &Netlist, cell_id: CellId) -> Option<SignalId> {
    let cell = netlist.cells.get(cell_id);
    for conn in &cell.connections {
        if conn.direction == PortDirection::Output {
            if let SignalRef::Signal(id) = conn.signal {
                return Some(id);
            }
        }
    }
    None
}

/// Redirects all uses of `old_sig` to `new_sig` in all cell input connections.
fn redirect_signal(netlist: &mut Netlist, old_sig: SignalId, new_sig: SignalId) {
    let cell_ids: Vec<CellId> = netlist
        .cells
        .iter()
        .filter(|(id, _)| !netlist.is_dead(*id))
        .map(|(id, _)| id)
        .collect();

    for cell_id in cell_ids {
        let cell = netlist.cells.get_mut(cell_id);
        for conn in &mut cell.connections {
            if conn.direction == PortDirection::Input || conn.direction == PortDirection::InOut {
                replace_signal_in_ref(&mut conn.signal, old_sig, new_sig);
            }
        }
    }
}

/// Replaces occurrences of `old` with `new` in a signal reference.
fn replace_signal_in_ref(sr: &mut SignalRef, old: SignalId, new: SignalId) {
    match sr {
        SignalRef::Signal(id) => {
            if *id == old {
                *id = new;
            }
        }
        SignalRef::Slice { signal, .. } => {
            if *signal == old {
                *signal = new;
            }
        }
        SignalRef::Concat(refs) => {
            for r in refs {
                replace_signal_in_ref(r, old, new);
            }
        }
        SignalRef::Const(_) => {}
    }
}

//! IR traversal helpers used by multiple lint rules.
//!
//! These functions walk the statement and expression trees in the AionIR to
//! collect signal usage information needed for checks like unused signals,
//! undriven signals, and incomplete sensitivity lists.

use std::collections::HashSet;

use aion_ir::{CellKind, Connection, Expr, Module, PortDirection, SignalId, SignalRef, Statement};

/// Collects all `SignalId`s referenced (read) in a signal reference.
///
/// For `Signal(id)`, returns that ID. For `Slice`, returns the base signal.
/// For `Concat`, recursively collects from all elements.
/// `Const` references yield no signal IDs.
pub fn collect_signal_ref_signals(sref: &SignalRef) -> HashSet<SignalId> {
    let mut result = HashSet::new();
    collect_signal_ref_signals_into(sref, &mut result);
    result
}

/// Collects all `SignalId`s from an expression tree.
///
/// Walks the entire expression recursively, extracting signal references
/// from `Expr::Signal` variants and any nested sub-expressions.
pub fn collect_expr_signals(expr: &Expr) -> HashSet<SignalId> {
    let mut result = HashSet::new();
    collect_expr_signals_into(expr, &mut result);
    result
}

/// Collects all `SignalId`s that are read (referenced in RHS or conditions) in a statement tree.
///
/// This includes:
/// - RHS of assignments
/// - Conditions in `If` and `Case`
/// - All sub-statements recursively
pub fn collect_read_signals(stmt: &Statement) -> HashSet<SignalId> {
    let mut result = HashSet::new();
    collect_read_signals_into(stmt, &mut result);
    result
}

/// Collects all `SignalId`s that are written (assigned to) in a statement tree.
///
/// This walks the statement tree and collects the target signal IDs
/// from all `Assign` statements.
pub fn collect_written_signals(stmt: &Statement) -> HashSet<SignalId> {
    let mut result = HashSet::new();
    collect_written_signals_into(stmt, &mut result);
    result
}

/// Returns true if the given signal is read anywhere in the module.
///
/// Checks continuous assignments (RHS), process bodies, and cell connections
/// where the signal appears as an input.
pub fn is_signal_read_in_module(module: &Module, signal_id: SignalId) -> bool {
    // Check continuous assignment RHS
    for assign in &module.assignments {
        if collect_expr_signals(&assign.value).contains(&signal_id) {
            return true;
        }
    }

    // Check process bodies
    for (_pid, process) in module.processes.iter() {
        if collect_read_signals(&process.body).contains(&signal_id) {
            return true;
        }
    }

    // Check cell connections (signal used as input to a cell)
    for (_cid, cell) in module.cells.iter() {
        for conn in &cell.connections {
            if (conn.direction == PortDirection::Input || conn.direction == PortDirection::InOut)
                && collect_signal_ref_signals(&conn.signal).contains(&signal_id)
            {
                return true;
            }
        }
    }

    false
}

/// Returns true if the given signal is driven (assigned to) anywhere in the module.
///
/// Checks continuous assignment targets, process bodies, and cell connections
/// where the signal appears as an output.
pub fn is_signal_driven_in_module(module: &Module, signal_id: SignalId) -> bool {
    // Check continuous assignment targets
    for assign in &module.assignments {
        if collect_signal_ref_signals(&assign.target).contains(&signal_id) {
            return true;
        }
    }

    // Check process bodies
    for (_pid, process) in module.processes.iter() {
        if collect_written_signals(&process.body).contains(&signal_id) {
            return true;
        }
    }

    // Check cell connections (signal driven by cell output)
    for (_cid, cell) in module.cells.iter() {
        for conn in &cell.connections {
            if (conn.direction == PortDirection::Output || conn.direction == PortDirection::InOut)
                && collect_signal_ref_signals(&conn.signal).contains(&signal_id)
            {
                return true;
            }
        }
    }

    false
}

/// Checks whether a statement has full else coverage (all paths assign).
///
/// Returns true if every `If` has an `else` branch and every `Case` has
/// a `default` arm. Used by the latch inference rule (W106) to detect
/// combinational processes that may infer latches.
pub fn stmt_has_full_else_coverage(stmt: &Statement) -> bool {
    match stmt {
        Statement::If {
            then_body,
            else_body,
            ..
        } => {
            if let Some(else_b) = else_body {
                stmt_has_full_else_coverage(then_body) && stmt_has_full_else_coverage(else_b)
            } else {
                false
            }
        }
        Statement::Case { arms, default, .. } => {
            if default.is_none() {
                return false;
            }
            // Check that all arms and default have coverage
            for arm in arms {
                if !stmt_has_full_else_coverage(&arm.body) {
                    return false;
                }
            }
            stmt_has_full_else_coverage(default.as_ref().unwrap())
        }
        Statement::Block { stmts, .. } => {
            // A block has coverage if all its statements do
            // (only the last statement really matters for coverage, but
            // we check all for nested if/case)
            for s in stmts {
                if !stmt_has_full_else_coverage(s) {
                    return false;
                }
            }
            true
        }
        Statement::Assign { .. } | Statement::Nop => true,
        Statement::Wait { .. }
        | Statement::Assertion { .. }
        | Statement::Display { .. }
        | Statement::Finish { .. } => true,
    }
}

/// Counts how many concurrent drivers a signal has in a module.
///
/// A driver is one of: continuous assignment target, process that writes
/// the signal, or cell output connection. Returns the total count.
pub fn count_drivers(module: &Module, signal_id: SignalId) -> usize {
    let mut count = 0;

    // Continuous assignments
    for assign in &module.assignments {
        if collect_signal_ref_signals(&assign.target).contains(&signal_id) {
            count += 1;
        }
    }

    // Processes
    for (_pid, process) in module.processes.iter() {
        if collect_written_signals(&process.body).contains(&signal_id) {
            count += 1;
        }
    }

    // Cell outputs
    for (_cid, cell) in module.cells.iter() {
        for conn in &cell.connections {
            if (conn.direction == PortDirection::Output || conn.direction == PortDirection::InOut)
                && collect_signal_ref_signals(&conn.signal).contains(&signal_id)
            {
                count += 1;
            }
        }
    }

    count
}

/// Checks if a statement tree contains any blocking assigns (`=`).
///
/// In AionIR all `Statement::Assign` are the same, but the process kind
/// determines if blocking vs nonblocking is expected. We detect both
/// present by checking assignment targets vs process kind.
pub fn has_assign(stmt: &Statement) -> bool {
    match stmt {
        Statement::Assign { .. } => true,
        Statement::If {
            then_body,
            else_body,
            ..
        } => has_assign(then_body) || else_body.as_ref().is_some_and(|e| has_assign(e)),
        Statement::Case { arms, default, .. } => {
            arms.iter().any(|a| has_assign(&a.body))
                || default.as_ref().is_some_and(|d| has_assign(d))
        }
        Statement::Block { stmts, .. } => stmts.iter().any(has_assign),
        _ => false,
    }
}

/// Checks if a cell's connections match a target module's ports.
///
/// Returns a list of issues: missing connections, extra connections,
/// or direction mismatches.
pub fn check_cell_port_match(cell: &aion_ir::Cell, target_module: &Module) -> Vec<PortMatchIssue> {
    let mut issues = Vec::new();

    // Skip non-instance cells
    if !matches!(cell.kind, CellKind::Instance { .. }) {
        return issues;
    }

    let cell_port_names: HashSet<_> = cell.connections.iter().map(|c| c.port_name).collect();
    let module_port_names: HashSet<_> = target_module.ports.iter().map(|p| p.name).collect();

    // Check for extra connections (not in module ports)
    for conn in &cell.connections {
        if !module_port_names.contains(&conn.port_name) {
            issues.push(PortMatchIssue::ExtraConnection(conn.clone()));
        }
    }

    // Check for missing connections (module port not connected)
    for port in &target_module.ports {
        if !cell_port_names.contains(&port.name) {
            issues.push(PortMatchIssue::MissingConnection(port.name));
        }
    }

    issues
}

/// An issue found when checking cell port connections against a module's ports.
#[derive(Debug)]
pub enum PortMatchIssue {
    /// A cell connection references a port that doesn't exist on the target module.
    ExtraConnection(Connection),
    /// A module port has no corresponding connection in the cell instance.
    MissingConnection(aion_common::Ident),
}

// ---- Internal helpers ----

fn collect_signal_ref_signals_into(sref: &SignalRef, result: &mut HashSet<SignalId>) {
    match sref {
        SignalRef::Signal(id) => {
            result.insert(*id);
        }
        SignalRef::Slice { signal, .. } => {
            result.insert(*signal);
        }
        SignalRef::Concat(refs) => {
            for r in refs {
                collect_signal_ref_signals_into(r, result);
            }
        }
        SignalRef::Const(_) => {}
    }
}

fn collect_expr_signals_into(expr: &Expr, result: &mut HashSet<SignalId>) {
    match expr {
        Expr::Signal(sref) => {
            collect_signal_ref_signals_into(sref, result);
        }
        Expr::Literal(_) => {}
        Expr::Unary { operand, .. } => {
            collect_expr_signals_into(operand, result);
        }
        Expr::Binary { lhs, rhs, .. } => {
            collect_expr_signals_into(lhs, result);
            collect_expr_signals_into(rhs, result);
        }
        Expr::Ternary {
            condition,
            true_val,
            false_val,
            ..
        } => {
            collect_expr_signals_into(condition, result);
            collect_expr_signals_into(true_val, result);
            collect_expr_signals_into(false_val, result);
        }
        Expr::FuncCall { args, .. } => {
            for arg in args {
                collect_expr_signals_into(arg, result);
            }
        }
        Expr::Concat(exprs) => {
            for e in exprs {
                collect_expr_signals_into(e, result);
            }
        }
        Expr::Repeat { expr, .. } => {
            collect_expr_signals_into(expr, result);
        }
        Expr::Index { expr, index, .. } => {
            collect_expr_signals_into(expr, result);
            collect_expr_signals_into(index, result);
        }
        Expr::Slice {
            expr, high, low, ..
        } => {
            collect_expr_signals_into(expr, result);
            collect_expr_signals_into(high, result);
            collect_expr_signals_into(low, result);
        }
    }
}

fn collect_read_signals_into(stmt: &Statement, result: &mut HashSet<SignalId>) {
    match stmt {
        Statement::Assign { value, .. } => {
            collect_expr_signals_into(value, result);
        }
        Statement::If {
            condition,
            then_body,
            else_body,
            ..
        } => {
            collect_expr_signals_into(condition, result);
            collect_read_signals_into(then_body, result);
            if let Some(else_b) = else_body {
                collect_read_signals_into(else_b, result);
            }
        }
        Statement::Case {
            subject,
            arms,
            default,
            ..
        } => {
            collect_expr_signals_into(subject, result);
            for arm in arms {
                for pat in &arm.patterns {
                    collect_expr_signals_into(pat, result);
                }
                collect_read_signals_into(&arm.body, result);
            }
            if let Some(def) = default {
                collect_read_signals_into(def, result);
            }
        }
        Statement::Block { stmts, .. } => {
            for s in stmts {
                collect_read_signals_into(s, result);
            }
        }
        Statement::Wait { duration, .. } => {
            if let Some(d) = duration {
                collect_expr_signals_into(d, result);
            }
        }
        Statement::Assertion { condition, .. } => {
            collect_expr_signals_into(condition, result);
        }
        Statement::Display { args, .. } => {
            for arg in args {
                collect_expr_signals_into(arg, result);
            }
        }
        Statement::Finish { .. } | Statement::Nop => {}
    }
}

fn collect_written_signals_into(stmt: &Statement, result: &mut HashSet<SignalId>) {
    match stmt {
        Statement::Assign { target, .. } => {
            collect_signal_ref_signals_into(target, result);
        }
        Statement::If {
            then_body,
            else_body,
            ..
        } => {
            collect_written_signals_into(then_body, result);
            if let Some(else_b) = else_body {
                collect_written_signals_into(else_b, result);
            }
        }
        Statement::Case { arms, default, .. } => {
            for arm in arms {
                collect_written_signals_into(&arm.body, result);
            }
            if let Some(def) = default {
                collect_written_signals_into(def, result);
            }
        }
        Statement::Block { stmts, .. } => {
            for s in stmts {
                collect_written_signals_into(s, result);
            }
        }
        Statement::Wait { .. }
        | Statement::Assertion { .. }
        | Statement::Display { .. }
        | Statement::Finish { .. }
        | Statement::Nop => {}
    }
}

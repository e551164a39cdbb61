//! C203: Magic number — literal values used directly in expressions.

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use aion_ir::{Design, Expr, Module, Statement};

use crate::LintRule;

/// Detects "magic numbers" — literal values wider than 1 bit and not
/// 0 or 1 used directly in expressions.
///
/// Magic numbers make code harder to read and maintain. They should be
/// replaced with named constants or parameters.
pub struct MagicNumber;

impl LintRule for MagicNumber {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Convention, 203)
    }

    fn name(&self) -> &str {
        "magic-number"
    }

    fn description(&self) -> &str {
        "literal value used directly in expression instead of named constant"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, _design: &Design, sink: &DiagnosticSink) {
        // Check process bodies for magic numbers in expressions
        for (_pid, process) in module.processes.iter() {
            check_stmt_magic_numbers(&process.body, self.code(), sink);
        }

        // Check continuous assignment RHS
        for assign in &module.assignments {
            check_expr_magic_numbers(&assign.value, self.code(), assign.span, sink);
        }
    }
}

fn check_stmt_magic_numbers(stmt: &Statement, code: DiagnosticCode, sink: &DiagnosticSink) {
    match stmt {
        Statement::Assign { value, span, .. } => {
            check_expr_magic_numbers(value, code, *span, sink);
        }
        Statement::If {
            condition,
            then_body,
            else_body,
            span,
        } => {
            check_expr_magic_numbers(condition, code, *span, sink);
            check_stmt_magic_numbers(then_body, code, sink);
            if let Some(else_b) = else_body {
                check_stmt_magic_numbers(else_b, code, sink);
            }
        }
        Statement::Case {
            subject,
            arms,
            default,
            span,
        } => {
            check_expr_magic_numbers(subject, code, *span, sink);
            for arm in arms {
                // Case arm patterns are often literal — skip them
                check_stmt_magic_numbers(&arm.body, code, sink);
            }
            if let Some(def) = default {
                check_stmt_magic_numbers(def, code, sink);
            }
        }
        Statement::Block { stmts, .. } => {
            for s in stmts {
                check_stmt_magic_numbers(s, code, sink);
            }
        }
        _ => {}
    }
}

/// Formats a `LogicVec` literal value as a human-readable string (e.g. `0x2A`).
fn format_literal_value(lv: &aion_common::LogicVec) -> String {
    if let Some(val) = lv.to_u64() {
        format!("0x{val:X}")
    } else {
        // Fallback to binary representation for values that don't fit u64
        format!("{lv}")
    }
}

fn check_expr_magic_numbers(
    expr: &Expr,
    code: DiagnosticCode,
    context_span: aion_source::Span,
    sink: &DiagnosticSink,
) {
    match expr {
        Expr::Literal(lv) => {
            // Skip 1-bit literals and values 0/1
            if lv.width() <= 1 {
                return;
            }
            if lv.is_all_zero() || lv.is_all_one() {
                return;
            }
            let value_str = format_literal_value(lv);
            let width = lv.width();
            sink.emit(
                Diagnostic::warning(
                    code,
                    format!("magic number `{value_str}` ({width}-bit) in expression"),
                    context_span,
                )
                .with_label(Label::primary(
                    context_span,
                    format!("literal `{value_str}` used directly"),
                ))
                .with_help("replace with a named constant or parameter for clarity"),
            );
        }
        Expr::Unary { operand, span, .. } => {
            check_expr_magic_numbers(operand, code, *span, sink);
        }
        Expr::Binary { lhs, rhs, span, .. } => {
            check_expr_magic_numbers(lhs, code, *span, sink);
            check_expr_magic_numbers(rhs, code, *span, sink);
        }
        Expr::Ternary {
            condition,
            true_val,
            false_val,
            span,
            ..
        } => {
            check_expr_magic_numbers(condition, code, *span, sink);
            check_expr_magic_numbers(true_val, code, *span, sink);
            check_expr_magic_numbers(false_val, code, *span, sink);
        }
        Expr::FuncCall { args, span, .. } => {
            for arg in args {
                check_expr_magic_numbers(arg, code, *span, sink);
            }
        }
        Expr::Concat(exprs) => {
            for e in exprs {
                check_expr_magic_numbers(e, code, context_span, sink);
            }
        }
        Expr::Repeat { expr, span, .. } => {
            check_expr_magic_numbers(expr, code, *span, sink);
        }
        Expr::Index { expr, span, .. } => {
            // Only check the base expression — index positions are structural
            // (e.g. `count[2]` is a bit-select, not a magic number)
            check_expr_magic_numbers(expr, code, *span, sink);
        }
        Expr::Slice { expr, span, .. } => {
            // Only check the base expression — high/low bounds are structural
            // (e.g. `data[7:0]` is a range-select, not a magic number)
            check_expr_magic_numbers(expr, code, *span, sink);
        }
        Expr::Signal(_) => {}
    }
}

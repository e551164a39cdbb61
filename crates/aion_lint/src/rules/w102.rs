//! W102: Undriven signal — signal is never assigned or driven.

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use aion_ir::{Design, Module, PortDirection, SignalKind};

use crate::helpers::is_signal_driven_in_module;
use crate::LintRule;

/// Detects signals that are declared but never driven by any assignment,
/// process, or cell output connection.
///
/// Input ports and constants are excluded since they are driven externally
/// or by definition.
pub struct UndrivenSignal;

impl LintRule for UndrivenSignal {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 102)
    }

    fn name(&self) -> &str {
        "undriven-signal"
    }

    fn description(&self) -> &str {
        "signal is never assigned or driven"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, _design: &Design, sink: &DiagnosticSink) {
        for (sig_id, signal) in module.signals.iter() {
            // Skip constants (driven by definition)
            if signal.kind == SignalKind::Const {
                continue;
            }

            // Skip input ports (driven externally)
            if signal.kind == SignalKind::Port {
                let is_input = module
                    .ports
                    .iter()
                    .any(|p| p.signal == sig_id && p.direction == PortDirection::Input);
                if is_input {
                    continue;
                }
            }

            if !is_signal_driven_in_module(module, sig_id) {
                sink.emit(
                    Diagnostic::warning(self.code(), "undriven signal", signal.span)
                        .with_label(Label::primary(signal.span, "this signal is never assigned"))
                        .with_help("assign a value or connect to a driver"),
                );
            }
        }
    }
}

//! W105: Incomplete sensitivity list — combinational process missing signals.

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use aion_ir::{Design, Module, ProcessKind, Sensitivity};

use crate::helpers::collect_read_signals;
use crate::LintRule;

/// Detects combinational processes with explicit `SignalList` sensitivity
/// that are missing signals read in the process body.
///
/// Missing signals in the sensitivity list cause simulation-synthesis
/// mismatches. Processes with `Sensitivity::All` are not checked.
pub struct IncompleteSensitivity;

impl LintRule for IncompleteSensitivity {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 105)
    }

    fn name(&self) -> &str {
        "incomplete-sensitivity"
    }

    fn description(&self) -> &str {
        "combinational process with SignalList missing signals read in body"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &Module, _design: &Design, sink: &DiagnosticSink) {
        for (_pid, process) in module.processes.iter() {
            if process.kind != ProcessKind::Combinational {
                continue;
            }

            let sens_signals = match &process.sensitivity {
                Sensitivity::SignalList(sigs) => sigs,
                Sensitivity::All | Sensitivity::EdgeList(_) => continue,
            };

            let read_signals = collect_read_signals(&process.body);
            let sens_set: std::collections::HashSet<_> = sens_signals.iter().copied().collect();

            for sig_id in &read_signals {
                if !sens_set.contains(sig_id) {
                    sink.emit(
                        Diagnostic::warning(
                            self.code(),
                            "incomplete sensitivity list",
                            process.span,
                        )
                        .with_label(Label::primary(
                            process.span,
                            "signal read in body but missing from sensitivity list",
                        ))
                        .with_help(
                            "use `always @(*)` or `always_comb` to infer the full sensitivity list",
                        ),
                    );
                    // Report once per process, not once per missing signal
                    break;
                }
            }
        }
    }
}

//! SDC/XDC timing constraint file parser.
//!
//! Parses Synopsys Design Constraints (SDC) and Xilinx Design Constraints (XDC)
//! files into [`TimingConstraints`]. Supports the most commonly used commands:
//!
//! - `create_clock` — define a clock
//! - `set_input_delay` — constrain input port timing
//! - `set_output_delay` — constrain output port timing
//! - `set_false_path` — exclude paths from timing analysis
//! - `set_multicycle_path` — allow multi-cycle paths
//! - `set_max_delay` — constrain maximum path delay
//!
//! The parser is line-based (one command per line, backslash continuation
//! supported) and does not attempt full Tcl interpretation.

use crate::constraints::{
    ClockConstraint, FalsePath, IoDelay, MaxDelayPath, MulticyclePath, TimingConstraints,
};
use aion_common::Interner;
use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use aion_source::Span;

/// Parses an SDC/XDC constraint file into a [`TimingConstraints`] structure.
///
/// Lines starting with `#` are treated as comments. Backslash-newline
/// continuation is supported. Unrecognized commands are reported as warnings
/// and skipped. Parse errors within recognized commands are also reported
/// as warnings.
pub fn parse_sdc(source: &str, interner: &Interner, sink: &DiagnosticSink) -> TimingConstraints {
    let mut constraints = TimingConstraints::new();

    // Join continuation lines (backslash at end of line)
    let joined = join_continuation_lines(source);

    for line in joined.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = tokenize_sdc_line(trimmed);
        if tokens.is_empty() {
            continue;
        }

        match tokens[0] {
            "create_clock" => {
                parse_create_clock(&tokens[1..], interner, sink, &mut constraints);
            }
            "set_input_delay" => {
                parse_set_io_delay(&tokens[1..], interner, sink, &mut constraints, true);
            }
            "set_output_delay" => {
                parse_set_io_delay(&tokens[1..], interner, sink, &mut constraints, false);
            }
            "set_false_path" => {
                parse_set_false_path(&tokens[1..], interner, sink, &mut constraints);
            }
            "set_multicycle_path" => {
                parse_set_multicycle_path(&tokens[1..], interner, sink, &mut constraints);
            }
            "set_max_delay" => {
                parse_set_max_delay(&tokens[1..], interner, sink, &mut constraints);
            }
            cmd => {
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::new(Category::Timing, 1),
                    format!("unrecognized SDC command: `{cmd}`"),
                    Span::DUMMY,
                ));
            }
        }
    }

    constraints
}

/// Joins backslash-continuation lines into single logical lines.
fn join_continuation_lines(source: &str) -> String {
    let mut result = String::with_capacity(source.len());
    let mut continuation = false;

    for line in source.lines() {
        if continuation {
            result.push(' ');
        }
        let trimmed = line.trim_end();
        if let Some(stripped) = trimmed.strip_suffix('\\') {
            result.push_str(stripped);
            continuation = true;
        } else {
            result.push_str(trimmed);
            result.push('\n');
            continuation = false;
        }
    }

    result
}

/// Tokenizes an SDC line, handling basic quoting with braces and double quotes.
fn tokenize_sdc_line(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        match ch {
            ' ' | '\t' => {
                chars.next();
            }
            '{' => {
                chars.next(); // skip '{'
                let inner_start = chars.peek().map_or(line.len(), |&(i, _)| i);
                let mut end = inner_start;
                for (i, c) in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    end = i + c.len_utf8();
                }
                tokens.push(&line[inner_start..end]);
            }
            '"' => {
                chars.next(); // skip '"'
                let inner_start = chars.peek().map_or(line.len(), |&(i, _)| i);
                let mut end = inner_start;
                for (i, c) in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    end = i + c.len_utf8();
                }
                tokens.push(&line[inner_start..end]);
            }
            '[' => {
                // Skip Tcl command substitution [get_ports ...] — capture whole bracket expr
                let bracket_start = start;
                chars.next(); // skip '['
                let mut depth = 1;
                let mut end = start + 1;
                for (i, c) in chars.by_ref() {
                    end = i + c.len_utf8();
                    if c == '[' {
                        depth += 1;
                    } else if c == ']' {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                }
                // Extract inner content, skipping [get_ports ...]
                let inner = &line[bracket_start + 1..end - 1];
                // Try to extract the port name from "get_ports name" pattern
                if let Some(rest) = inner.strip_prefix("get_ports") {
                    let port_name = rest.trim().trim_matches(|c| c == '{' || c == '}');
                    if !port_name.is_empty() {
                        tokens.push(port_name);
                    }
                } else {
                    tokens.push(inner.trim());
                }
            }
            _ => {
                let mut end = start;
                for (i, c) in chars.by_ref() {
                    if c == ' ' || c == '\t' {
                        break;
                    }
                    end = i + c.len_utf8();
                }
                if end == start {
                    // Single char token
                    end = start + ch.len_utf8();
                    chars.next();
                }
                tokens.push(&line[start..end]);
            }
        }
    }

    tokens
}

/// Parses `create_clock -period <val> -name <name> [-waveform {rise fall}] [port]`.
fn parse_create_clock(
    args: &[&str],
    interner: &Interner,
    sink: &DiagnosticSink,
    constraints: &mut TimingConstraints,
) {
    let mut period: Option<f64> = None;
    let mut name: Option<&str> = None;
    let mut waveform: Option<(f64, f64)> = None;
    let mut port: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "-period" => {
                i += 1;
                if i < args.len() {
                    period = args[i].parse().ok();
                }
            }
            "-name" => {
                i += 1;
                if i < args.len() {
                    name = Some(args[i]);
                }
            }
            "-waveform" => {
                i += 1;
                if i < args.len() {
                    let parts: Vec<&str> = args[i].split_whitespace().collect();
                    if parts.len() >= 2 {
                        if let (Ok(r), Ok(f)) = (parts[0].parse::<f64>(), parts[1].parse::<f64>()) {
                            waveform = Some((r, f));
                        }
                    }
                }
            }
            s if !s.starts_with('-') => {
                port = Some(s);
            }
            _ => {}
        }
        i += 1;
    }

    let Some(period_val) = period else {
        sink.emit(Diagnostic::warning(
            DiagnosticCode::new(Category::Timing, 2),
            "create_clock: missing -period".to_string(),
            Span::DUMMY,
        ));
        return;
    };

    let clock_name = name.or(port).unwrap_or("default_clock");
    let port_name = port.or(name).unwrap_or("clk");

    constraints.clocks.push(ClockConstraint {
        name: interner.get_or_intern(clock_name),
        period_ns: period_val,
        port: interner.get_or_intern(port_name),
        waveform,
    });
}

/// Parses `set_input_delay`/`set_output_delay -clock <clk> <delay> [port]`.
fn parse_set_io_delay(
    args: &[&str],
    interner: &Interner,
    sink: &DiagnosticSink,
    constraints: &mut TimingConstraints,
    is_input: bool,
) {
    let mut clock: Option<&str> = None;
    let mut delay: Option<f64> = None;
    let mut port: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "-clock" => {
                i += 1;
                if i < args.len() {
                    clock = Some(args[i]);
                }
            }
            s if !s.starts_with('-') => {
                if delay.is_none() {
                    if let Ok(v) = s.parse::<f64>() {
                        delay = Some(v);
                    } else {
                        port = Some(s);
                    }
                } else {
                    port = Some(s);
                }
            }
            _ => {}
        }
        i += 1;
    }

    let (Some(clock_name), Some(delay_val)) = (clock, delay) else {
        let cmd = if is_input {
            "set_input_delay"
        } else {
            "set_output_delay"
        };
        sink.emit(Diagnostic::warning(
            DiagnosticCode::new(Category::Timing, 3),
            format!("{cmd}: missing -clock or delay value"),
            Span::DUMMY,
        ));
        return;
    };

    let port_name = port.unwrap_or("*");
    let io_delay = IoDelay {
        port: interner.get_or_intern(port_name),
        clock: interner.get_or_intern(clock_name),
        delay_ns: delay_val,
    };

    if is_input {
        constraints.input_delays.push(io_delay);
    } else {
        constraints.output_delays.push(io_delay);
    }
}

/// Parses `set_false_path -from <from> -to <to>`.
fn parse_set_false_path(
    args: &[&str],
    interner: &Interner,
    _sink: &DiagnosticSink,
    constraints: &mut TimingConstraints,
) {
    let mut from = Vec::new();
    let mut to = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "-from" => {
                i += 1;
                if i < args.len() {
                    from.push(interner.get_or_intern(args[i]));
                }
            }
            "-to" => {
                i += 1;
                if i < args.len() {
                    to.push(interner.get_or_intern(args[i]));
                }
            }
            _ => {}
        }
        i += 1;
    }

    constraints.false_paths.push(FalsePath { from, to });
}

/// Parses `set_multicycle_path -setup <N> -from <from> -to <to>`.
fn parse_set_multicycle_path(
    args: &[&str],
    interner: &Interner,
    _sink: &DiagnosticSink,
    constraints: &mut TimingConstraints,
) {
    let mut cycles: u32 = 2; // default
    let mut from = Vec::new();
    let mut to = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "-setup" => {
                i += 1;
                if i < args.len() {
                    cycles = args[i].parse().unwrap_or(2);
                }
            }
            "-from" => {
                i += 1;
                if i < args.len() {
                    from.push(interner.get_or_intern(args[i]));
                }
            }
            "-to" => {
                i += 1;
                if i < args.len() {
                    to.push(interner.get_or_intern(args[i]));
                }
            }
            _ => {}
        }
        i += 1;
    }

    constraints
        .multicycle_paths
        .push(MulticyclePath { from, to, cycles });
}

/// Parses `set_max_delay <delay> -from <from> -to <to>`.
fn parse_set_max_delay(
    args: &[&str],
    interner: &Interner,
    _sink: &DiagnosticSink,
    constraints: &mut TimingConstraints,
) {
    let mut delay: Option<f64> = None;
    let mut from = Vec::new();
    let mut to = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "-from" => {
                i += 1;
                if i < args.len() {
                    from.push(interner.get_or_intern(args[i]));
                }
            }
            "-to" => {
                i += 1;
                if i < args.len() {
                    to.push(interner.get_or_intern(args[i]));
                }
            }
            s if !s.starts_with('-') => {
                if delay.is_none() {
                    delay = s.parse().ok();
                }
            }
            _ => {}
        }
        i += 1;
    }

    let delay_ns = delay.unwrap_or(0.0);
    constraints
        .max_delay_paths
        .push(MaxDelayPath { from, to, delay_ns });
}

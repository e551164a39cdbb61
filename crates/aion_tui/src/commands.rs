//! Extended command parsing for the TUI.
//!
//! Reuses [`aion_sim::interactive::parse_command`] for standard simulation
//! commands and adds TUI-specific commands for zoom, goto, signal management,
//! and display format control.

use aion_sim::interactive::{parse_command as sim_parse_command, parse_sim_duration, SimCommand};

/// A TUI command, either a simulation command or a TUI-specific command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TuiCommand {
    /// A standard simulation command (run, step, inspect, etc.).
    Sim(SimCommand),
    /// Zoom in the waveform viewport.
    ZoomIn,
    /// Zoom out the waveform viewport.
    ZoomOut,
    /// Fit the viewport to the full simulation time range.
    ZoomFit,
    /// Jump the cursor to a specific time.
    Goto {
        /// Target time in femtoseconds.
        time_fs: u64,
    },
    /// Add a signal to the waveform display by name.
    AddSignal {
        /// Signal name pattern.
        name: String,
    },
    /// Remove a signal from the waveform display by name.
    RemoveSignal {
        /// Signal name pattern.
        name: String,
    },
    /// Cycle the value display format (hex → bin → dec).
    CycleFormat,
    /// Toggle the help popup.
    ToggleHelp,
}

/// Parses a command string into a `TuiCommand`.
///
/// First tries TUI-specific commands, then falls back to the standard
/// simulation command parser.
pub fn parse_tui_command(input: &str) -> Result<TuiCommand, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty command".to_string());
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let cmd = parts[0].to_lowercase();

    match cmd.as_str() {
        "zoomin" | "zi" => Ok(TuiCommand::ZoomIn),
        "zoomout" | "zo" => Ok(TuiCommand::ZoomOut),
        "zoomfit" | "zf" | "fit" => Ok(TuiCommand::ZoomFit),
        "goto" | "g" => {
            if parts.len() < 2 {
                return Err("goto requires a time (e.g., 'goto 100ns')".to_string());
            }
            let time_fs = parse_sim_duration(parts[1]).map_err(|e| format!("invalid time: {e}"))?;
            Ok(TuiCommand::Goto { time_fs })
        }
        "add" => {
            if parts.len() < 2 {
                return Err("add requires a signal name".to_string());
            }
            Ok(TuiCommand::AddSignal {
                name: parts[1].to_string(),
            })
        }
        "remove" | "rm" => {
            if parts.len() < 2 {
                return Err("remove requires a signal name".to_string());
            }
            Ok(TuiCommand::RemoveSignal {
                name: parts[1].to_string(),
            })
        }
        "format" | "fmt" => Ok(TuiCommand::CycleFormat),
        _ => {
            // Try parsing as a simulation command
            let sim_cmd = sim_parse_command(trimmed)?;
            Ok(TuiCommand::Sim(sim_cmd))
        }
    }
}

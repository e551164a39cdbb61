//! TUI widget modules.
//!
//! Each module contains a stateless rendering function that draws a specific
//! panel of the TUI interface into a ratatui `Frame`.

pub mod command_input;
pub mod signal_list;
pub mod status_bar;
pub mod waveform;

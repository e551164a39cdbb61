//! Parser for Project X-Ray `segbits_*.db` files.
//!
//! Segbits files map tile features (like LUT initialization bits, PIP enables,
//! and FF configuration) to physical bit positions within configuration frames.
//! Each line maps a feature path to one or more frame-relative bit positions.
//!
//! # Format
//!
//! ```text
//! CLBLL_L.SLICEL_X0.ALUT.INIT[00] 00_14 00_15
//! CLBLL_L.SLICEL_X0.AFF.ZRST !01_42
//! INT_L.NL1BEG1.SS2END0 28_13
//! ```
//!
//! Each bit entry has the format `[!]frame_bit` where `frame` is the frame
//! offset relative to the tile's base address, and `bit` is the bit position
//! within the tile's word range. The `!` prefix indicates an inverted bit
//! (the bit must be 0 for the feature to be enabled).

use std::collections::HashMap;

/// A single bit position within a segbits entry.
///
/// Identifies a specific bit relative to the tile's base frame address,
/// with an optional inversion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegBitEntry {
    /// Frame offset relative to the tile's base address.
    pub frame_offset: u32,
    /// Bit position within the tile's word range in that frame.
    pub bit_position: u32,
    /// If true, the bit must be 0 for the feature to be active (inverted logic).
    pub inverted: bool,
}

/// A mapping from feature names to their configuration bit positions.
///
/// Feature names follow the pattern `TILE_TYPE.SITE.FEATURE[INDEX]` or
/// `TILE_TYPE.DST_WIRE.SRC_WIRE` for PIPs.
pub type SegBitsMap = HashMap<String, Vec<SegBitEntry>>;

/// Parses a single bit specifier like "00_14" or "!01_42".
///
/// Returns a [`SegBitEntry`] with the frame offset, bit position, and
/// inversion flag.
///
/// # Errors
///
/// Returns an error string if the format is invalid.
pub fn parse_bit_spec(spec: &str) -> Result<SegBitEntry, String> {
    let (inverted, rest) = if let Some(s) = spec.strip_prefix('!') {
        (true, s)
    } else {
        (false, spec)
    };

    let parts: Vec<&str> = rest.split('_').collect();
    if parts.len() != 2 {
        return Err(format!(
            "invalid bit spec '{spec}': expected format 'frame_bit' or '!frame_bit'"
        ));
    }

    let frame_offset = parts[0]
        .parse::<u32>()
        .map_err(|e| format!("invalid frame offset in '{spec}': {e}"))?;
    let bit_position = parts[1]
        .parse::<u32>()
        .map_err(|e| format!("invalid bit position in '{spec}': {e}"))?;

    Ok(SegBitEntry {
        frame_offset,
        bit_position,
        inverted,
    })
}

/// Parses a segbits database string into a [`SegBitsMap`].
///
/// Each line in the input maps a feature name to one or more bit specifiers.
/// Empty lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns an error string if any line has an invalid format.
pub fn parse_segbits(content: &str) -> Result<SegBitsMap, String> {
    let mut map = HashMap::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let feature = parts
            .next()
            .ok_or_else(|| format!("line {}: empty feature name", line_no + 1))?;

        let mut bits = Vec::new();
        for bit_spec in parts {
            let entry =
                parse_bit_spec(bit_spec).map_err(|e| format!("line {}: {e}", line_no + 1))?;
            bits.push(entry);
        }

        if bits.is_empty() {
            return Err(format!(
                "line {}: feature '{feature}' has no bit specifiers",
                line_no + 1
            ));
        }

        map.insert(feature.to_string(), bits);
    }

    Ok(map)
}

/// Returns the feature prefix for a given tile type.
///
/// For example, segbits for `CLBLL_L` tiles have features prefixed with
/// `CLBLL_L.`, and INT tiles use `INT_L.` or `INT_R.`.
pub fn segbits_filename(tile_type: &str) -> String {
    format!("segbits_{}.db", tile_type.to_ascii_lowercase())
}

//! Binary persistence for a built [`CostMap`].
//!
//! Mirrors `aion_cache::artifact`'s length-prefixed header convention: magic
//! bytes, a version tag, then the bincode-encoded payload. Reading supports
//! a zero-copy path via `memmap2` for large device cost maps.

use crate::cost_map::CostMap;
use crate::error::LookaheadError;
use std::fs::File;
use std::path::Path;

/// Magic bytes identifying a lookahead cost-map file.
const LOOKAHEAD_MAGIC: [u8; 4] = *b"ALKH";

/// Current on-disk format version. Increment on breaking layout changes.
const LOOKAHEAD_FORMAT_VERSION: u32 = 1;

fn encode_config() -> bincode::config::Configuration {
    bincode::config::standard()
}

/// Serializes `cost_map` to `path` as `magic (4B) + version (4B, LE) +
/// payload_len (4B, LE) + bincode(cost_map)`.
///
/// The three logical sections described in the design notes — node-to-
/// segment table, per-segment origins, per-segment grids — are carried as
/// one bincode payload rather than three independent length-prefixed
/// blocks: `CostMap` already derives `Serialize`/`Deserialize` over exactly
/// those fields, so splitting them by hand would only duplicate what serde
/// already does faithfully and bit-exactly.
pub fn write_cost_map(path: &Path, cost_map: &CostMap) -> Result<(), LookaheadError> {
    let payload = bincode::serde::encode_to_vec(cost_map, encode_config())
        .map_err(|e| LookaheadError::Encode(e.to_string()))?;

    let mut buf = Vec::with_capacity(4 + 4 + 4 + payload.len());
    buf.extend_from_slice(&LOOKAHEAD_MAGIC);
    buf.extend_from_slice(&LOOKAHEAD_FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(&payload);

    std::fs::write(path, &buf)?;
    Ok(())
}

/// Reads a cost map previously written by [`write_cost_map`], validating
/// the header and decoding the payload from an ordinary heap buffer.
pub fn read_cost_map(path: &Path) -> Result<CostMap, LookaheadError> {
    let raw = std::fs::read(path)?;
    decode(&raw)
}

/// Reads a cost map via a read-only memory map, avoiding a full heap copy
/// of the file before decoding. Appropriate for large device cost maps
/// loaded once per router process.
pub fn read_cost_map_mapped(path: &Path) -> Result<CostMap, LookaheadError> {
    let file = File::open(path)?;
    // SAFETY: the file is opened read-only for the duration of this call and
    // not concurrently truncated by this process; `decode` only reads the
    // mapped bytes before the mapping is dropped.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    decode(&mmap)
}

fn decode(raw: &[u8]) -> Result<CostMap, LookaheadError> {
    if raw.len() < 12 {
        return Err(LookaheadError::MalformedFile(
            "file shorter than fixed header".to_string(),
        ));
    }

    let magic: [u8; 4] = raw[0..4].try_into().unwrap();
    if magic != LOOKAHEAD_MAGIC {
        return Err(LookaheadError::MalformedFile(
            "bad magic bytes".to_string(),
        ));
    }

    let version = u32::from_le_bytes(raw[4..8].try_into().unwrap());
    if version != LOOKAHEAD_FORMAT_VERSION {
        return Err(LookaheadError::VersionMismatch {
            found: version,
            expected: LOOKAHEAD_FORMAT_VERSION,
        });
    }

    let payload_len = u32::from_le_bytes(raw[8..12].try_into().unwrap()) as usize;
    let payload = raw.get(12..12 + payload_len).ok_or_else(|| {
        LookaheadError::MalformedFile("payload shorter than declared length".to_string())
    })?;

    let (cost_map, _) = bincode::serde::decode_from_slice(payload, encode_config())
        .map_err(|e| LookaheadError::Decode(e.to_string()))?;
    Ok(cost_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{CostEntry, ReductionRule};
    use crate::dijkstra::RoutingCostMap;
    use crate::ids::SegmentId;

    fn sample_map() -> CostMap {
        let mut map = CostMap::new(1, 2);
        map.set_node_segment(0, -1);
        map.set_node_segment(1, 0);
        let samples: RoutingCostMap = vec![
            ((0, 0), CostEntry::new(1.0, 0.5)),
            ((2, 1), CostEntry::new(3.0, 1.5)),
        ];
        map.set_cost_map(SegmentId::from_raw(0), &samples, ReductionRule::SmallestDelay);
        map
    }

    #[test]
    fn roundtrip_plain_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lookahead.bin");
        let map = sample_map();
        write_cost_map(&path, &map).unwrap();
        let restored = read_cost_map(&path).unwrap();

        for dx in 0..=2 {
            for dy in 0..=1 {
                let a = map.find_cost(SegmentId::from_raw(0), dx, dy).unwrap();
                let b = restored.find_cost(SegmentId::from_raw(0), dx, dy).unwrap();
                assert_eq!(a.delay, b.delay);
                assert_eq!(a.congestion, b.congestion);
                assert_eq!(a.valid(), b.valid());
            }
        }
    }

    #[test]
    fn roundtrip_mapped_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lookahead.bin");
        let map = sample_map();
        write_cost_map(&path, &map).unwrap();
        let restored = read_cost_map_mapped(&path).unwrap();
        let a = map.find_cost(SegmentId::from_raw(0), 0, 0).unwrap();
        let b = restored.find_cost(SegmentId::from_raw(0), 0, 0).unwrap();
        assert_eq!(a.delay, b.delay);
    }

    #[test]
    fn bad_magic_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, b"XXXX\x01\x00\x00\x00\x00\x00\x00\x00").unwrap();
        let err = read_cost_map(&path).unwrap_err();
        assert!(matches!(err, LookaheadError::MalformedFile(_)));
    }

    #[test]
    fn version_mismatch_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oldver.bin");
        let mut buf = Vec::new();
        buf.extend_from_slice(&LOOKAHEAD_MAGIC);
        buf.extend_from_slice(&99u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        std::fs::write(&path, &buf).unwrap();
        let err = read_cost_map(&path).unwrap_err();
        assert!(matches!(
            err,
            LookaheadError::VersionMismatch {
                found: 99,
                expected: LOOKAHEAD_FORMAT_VERSION
            }
        ));
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        let mut buf = Vec::new();
        buf.extend_from_slice(&LOOKAHEAD_MAGIC);
        buf.extend_from_slice(&LOOKAHEAD_FORMAT_VERSION.to_le_bytes());
        buf.extend_from_slice(&1000u32.to_le_bytes());
        buf.extend_from_slice(b"short");
        std::fs::write(&path, &buf).unwrap();
        let err = read_cost_map(&path).unwrap_err();
        assert!(matches!(err, LookaheadError::MalformedFile(_)));
    }

    #[test]
    fn too_short_for_fixed_header_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.bin");
        std::fs::write(&path, b"AB").unwrap();
        let err = read_cost_map(&path).unwrap_err();
        assert!(matches!(err, LookaheadError::MalformedFile(_)));
    }
}

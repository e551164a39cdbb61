//! Parser for Project X-Ray `tile_type_*.json` files.
//!
//! Tile type files describe the internal structure of each tile type, including
//! the programmable interconnect points (PIPs), wires, and site pin-to-wire
//! mappings. This data is used to build routing graphs and map placed cells
//! to the routing fabric.

use serde::Deserialize;
use std::collections::HashMap;

/// A programmable interconnect point (PIP) within a tile.
///
/// PIPs are switches that connect two wires within a tile. Enabling a PIP
/// routes a signal from the source wire to the destination wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePip {
    /// The source wire name within the tile.
    pub src_wire: String,
    /// The destination wire name within the tile.
    pub dst_wire: String,
    /// Whether this PIP is bidirectional.
    pub is_bidi: bool,
    /// Whether this PIP is a route-through (passes through a site).
    pub is_routethrough: bool,
}

/// A site pin connecting a site to the tile's routing wires.
///
/// Site pins are the interface between placement sites (where cells live)
/// and the routing fabric (where signals travel between cells).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePin {
    /// The pin name within the site (e.g., "A1", "COUT", "D").
    pub pin_name: String,
    /// The wire name in the tile that this pin connects to.
    pub wire_name: String,
    /// The direction of the pin from the site's perspective.
    pub direction: SitePinDirection,
}

/// Direction of a site pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitePinDirection {
    /// Signal flows into the site.
    Input,
    /// Signal flows out of the site.
    Output,
    /// Signal can flow in either direction.
    Bidirectional,
}

/// Parsed tile type data containing PIPs and site pin mappings.
#[derive(Debug, Clone)]
pub struct TileTypeData {
    /// The tile type name (e.g., "CLBLL_L", "INT_L").
    pub name: String,
    /// All PIPs within this tile type.
    pub pips: Vec<TilePip>,
    /// All wires defined within this tile type.
    pub wires: Vec<String>,
    /// Site pin-to-wire mappings, indexed by site name.
    pub site_pins: HashMap<String, Vec<SitePin>>,
}

/// Raw JSON structure for PIP deserialization.
#[derive(Deserialize)]
struct RawPip {
    src_wire: String,
    dst_wire: String,
    #[serde(default)]
    is_directional: bool,
    #[serde(default)]
    is_pseudo: bool,
}

/// Raw JSON structure for site pin deserialization.
#[derive(Deserialize)]
struct RawSitePin {
    pin_name: String,
    wire_name: String,
    direction: String,
}

/// Raw JSON structure for tile type deserialization.
#[derive(Deserialize)]
struct RawTileType {
    #[serde(default)]
    pips: Vec<RawPip>,
    #[serde(default)]
    wires: Vec<String>,
    #[serde(default)]
    site_pins: HashMap<String, Vec<RawSitePin>>,
}

/// Parses a tile type JSON string into [`TileTypeData`].
///
/// The input should be the contents of a `tile_type_*.json` file from the
/// Project X-Ray database.
///
/// # Errors
///
/// Returns an error string if the JSON is malformed or contains invalid
/// direction values.
pub fn parse_tile_type(name: &str, json: &str) -> Result<TileTypeData, String> {
    let raw: RawTileType =
        serde_json::from_str(json).map_err(|e| format!("tile_type JSON parse error: {e}"))?;

    let pips: Vec<TilePip> = raw
        .pips
        .into_iter()
        .map(|p| TilePip {
            src_wire: p.src_wire,
            dst_wire: p.dst_wire,
            is_bidi: !p.is_directional,
            is_routethrough: p.is_pseudo,
        })
        .collect();

    let mut site_pins = HashMap::new();
    for (site_name, raw_pins) in raw.site_pins {
        let mut pins = Vec::with_capacity(raw_pins.len());
        for rp in raw_pins {
            let direction = match rp.direction.as_str() {
                "IN" | "input" => SitePinDirection::Input,
                "OUT" | "output" => SitePinDirection::Output,
                "INOUT" | "bidir" | "bidirectional" => SitePinDirection::Bidirectional,
                other => {
                    return Err(format!(
                        "unknown site pin direction '{other}' for pin '{}'",
                        rp.pin_name
                    ))
                }
            };
            pins.push(SitePin {
                pin_name: rp.pin_name,
                wire_name: rp.wire_name,
                direction,
            });
        }
        site_pins.insert(site_name, pins);
    }

    Ok(TileTypeData {
        name: name.to_string(),
        pips,
        wires: raw.wires,
        site_pins,
    })
}

/// Returns the expected filename for a tile type JSON file.
pub fn tile_type_filename(tile_type: &str) -> String {
    format!("tile_type_{}.json", tile_type.to_ascii_uppercase())
}

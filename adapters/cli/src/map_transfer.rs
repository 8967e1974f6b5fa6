//! Single-line map strings used to carry maps between runs as generator seeds.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use sapper_core::{Terrain, Unit};
use sapper_world::GridMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "sapper";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded map payload.
pub(crate) const SNAPSHOT_HEADER: &str = "sapper:v1";
const FIELD_DELIMITER: char = ':';

/// Terrain and unit layers of a map together with its dimensions.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MapSnapshot {
    width: u32,
    height: u32,
    layers: MapLayers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct MapLayers {
    terrain: Vec<Terrain>,
    units: Vec<Unit>,
}

impl MapSnapshot {
    /// Captures both layers of `map`; visited markers are not kept.
    #[must_use]
    pub(crate) fn capture(map: &GridMap) -> Self {
        Self {
            width: map.width(),
            height: map.height(),
            layers: MapLayers {
                terrain: map.terrain_cells().to_vec(),
                units: map.units().to_vec(),
            },
        }
    }

    /// Rebuilds the captured map.
    #[must_use]
    pub(crate) fn into_map(self) -> GridMap {
        GridMap::from_layers(
            self.width,
            self.height,
            self.layers.terrain,
            self.layers.units,
        )
    }

    /// Encodes the snapshot as `sapper:v1:<W>x<H>:<payload>`.
    pub(crate) fn encode(&self) -> Result<String, MapTransferError> {
        let json = serde_json::to_vec(&self.layers).map_err(MapTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.width, self.height
        ))
    }

    /// Decodes a snapshot, validating every segment and both layer lengths.
    pub(crate) fn decode(value: &str) -> Result<Self, MapTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(MapTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(MapTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(MapTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(MapTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(MapTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(MapTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(MapTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let layers: MapLayers =
            serde_json::from_slice(&bytes).map_err(MapTransferError::InvalidPayload)?;

        let expected = width as usize * height as usize;
        for (layer, found) in [("terrain", layers.terrain.len()), ("unit", layers.units.len())] {
            if found != expected {
                return Err(MapTransferError::LayerLength {
                    layer,
                    expected,
                    found,
                });
            }
        }

        Ok(Self {
            width,
            height,
            layers,
        })
    }
}

/// Errors that can occur while decoding map transfer strings.
#[derive(Debug, Error)]
pub(crate) enum MapTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("map string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("map string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("map string is missing the version")]
    MissingVersion,
    /// The dimensions segment was missing.
    #[error("map string is missing the grid dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("map string is missing the payload")]
    MissingPayload,
    /// The prefix named another format.
    #[error("map prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version is not understood by this build.
    #[error("map version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions segment could not be parsed.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode map payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload JSON could not be processed.
    #[error("could not parse map payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// A layer does not hold one value per cell.
    #[error("{layer} layer holds {found} cells, expected {expected}")]
    LayerLength {
        /// Name of the offending layer.
        layer: &'static str,
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count found in the payload.
        found: usize,
    },
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), MapTransferError> {
    let invalid = || MapTransferError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::CellCoord;

    fn sample_map() -> GridMap {
        let mut map = GridMap::new(4, 3);
        map.set_unit(CellCoord::new(0, 0), Unit::Agent);
        map.set_unit(CellCoord::new(2, 1), Unit::HardHazard);
        map.set_terrain(CellCoord::new(3, 2), Terrain::Scanned);
        map.set_terrain(CellCoord::new(1, 2), Terrain::Unknown);
        map
    }

    #[test]
    fn exported_map_imports_unchanged() {
        let map = sample_map();

        let encoded = MapSnapshot::capture(&map).encode().expect("map encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:4x3:")));

        let decoded = MapSnapshot::decode(&encoded).expect("map decodes").into_map();
        assert_eq!(decoded, map);
    }

    #[test]
    fn foreign_prefix_is_rejected() {
        let error = MapSnapshot::decode("maze:v1:4x3:AAAA").expect_err("prefix must match");

        assert!(matches!(error, MapTransferError::InvalidPrefix(prefix) if prefix == "maze"));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let error = MapSnapshot::decode("sapper:v9:4x3:AAAA").expect_err("version must match");

        assert!(matches!(error, MapTransferError::UnsupportedVersion(_)));
    }

    #[test]
    fn zero_or_garbled_dimensions_are_rejected() {
        for dimensions in ["0x3", "4by3", "4x"] {
            let value = format!("sapper:v1:{dimensions}:AAAA");
            assert!(
                matches!(
                    MapSnapshot::decode(&value),
                    Err(MapTransferError::InvalidDimensions(_))
                ),
                "{dimensions} should be rejected"
            );
        }
    }

    #[test]
    fn blank_and_truncated_strings_are_rejected() {
        assert!(matches!(
            MapSnapshot::decode("   "),
            Err(MapTransferError::EmptyPayload)
        ));
        assert!(matches!(
            MapSnapshot::decode("sapper:v1:4x3"),
            Err(MapTransferError::MissingPayload)
        ));
    }

    #[test]
    fn mismatched_layer_length_is_rejected() {
        let encoded = MapSnapshot::capture(&sample_map())
            .encode()
            .expect("map encodes");
        let payload = encoded.rsplit(':').next().expect("payload segment");
        let claimed = format!("sapper:v1:5x3:{payload}");

        let error = MapSnapshot::decode(&claimed).expect_err("length must match");

        assert!(matches!(
            error,
            MapTransferError::LayerLength {
                layer: "terrain",
                expected: 15,
                found: 12
            }
        ));
    }
}

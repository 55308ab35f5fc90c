use territory_map_shared::{UnitFeature, UnitKey};

pub const MAP_WIDTH: f64 = 960.0;
pub const MAP_HEIGHT: f64 = 600.0;

const TILE_COLUMNS: usize = 8;
const TILE_SIZE: f64 = 110.0;
const TILE_GAP: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// Pre-projected SVG path data from the provider.
    Path(String),
    /// Fallback square for units that ship without geometry.
    Tile { x: f64, y: f64, size: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitShape {
    pub key: UnitKey,
    pub name: String,
    pub geometry: ShapeGeometry,
}

impl UnitShape {
    /// Label anchor for tiles. Path shapes carry no label.
    pub fn label_anchor(&self) -> Option<(f64, f64)> {
        match self.geometry {
            ShapeGeometry::Path(_) => None,
            ShapeGeometry::Tile { x, y, size } => Some((x + size / 2.0, y + size / 2.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    pub shapes: Vec<UnitShape>,
    pub width: f64,
    pub height: f64,
}

impl MapLayout {
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

/// Place every unit, keeping provider order. Duplicate keys after the first
/// are skipped so each unit is drawn exactly once.
pub fn layout_units(features: &[UnitFeature]) -> MapLayout {
    let has_paths = features
        .iter()
        .any(|f| f.path.as_deref().is_some_and(|p| !p.trim().is_empty()));
    let tiles_top = if has_paths { MAP_HEIGHT + TILE_GAP } else { 0.0 };

    let mut seen = std::collections::HashSet::new();
    let mut shapes = Vec::with_capacity(features.len());
    let mut tile_count = 0usize;

    for feature in features {
        let key = feature.key();
        if !seen.insert(key.clone()) {
            continue;
        }
        let geometry = match feature.path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => ShapeGeometry::Path(path.to_owned()),
            _ => {
                let col = tile_count % TILE_COLUMNS;
                let row = tile_count / TILE_COLUMNS;
                tile_count += 1;
                ShapeGeometry::Tile {
                    x: TILE_GAP + col as f64 * (TILE_SIZE + TILE_GAP),
                    y: tiles_top + TILE_GAP + row as f64 * (TILE_SIZE + TILE_GAP),
                    size: TILE_SIZE,
                }
            }
        };
        shapes.push(UnitShape {
            key,
            name: feature.name.clone(),
            geometry,
        });
    }

    let tile_rows = tile_count.div_ceil(TILE_COLUMNS);
    let tiles_height = if tile_rows == 0 {
        0.0
    } else {
        TILE_GAP + tile_rows as f64 * (TILE_SIZE + TILE_GAP)
    };
    let height = if has_paths {
        MAP_HEIGHT + tiles_height
    } else {
        tiles_height.max(TILE_SIZE)
    };

    MapLayout {
        shapes,
        width: MAP_WIDTH,
        height,
    }
}

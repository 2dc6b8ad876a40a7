//! Levels: the tile grid plus spawn records, parsed from a JSON
//! descriptor.
//!
//! The descriptor keeps tile layout as ASCII rows (top row first) so
//! levels stay diffable:
//!
//! - `#` solid block, `=` solid platform top, `o` decorative (non-solid)
//! - `.` or space: empty
//!
//! Unknown characters are logged and treated as empty.

pub mod grid;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::MusicKind;
use crate::entities::interactable::InteractableKind;
use grid::{TileCell, TileGrid};

/// Enemy spawn record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub pos: [f32; 2],
    #[serde(default)]
    pub facing_left: bool,
}

/// Interactable spawn record. `id` links interactables together: an
/// interactable completing may trigger the one whose `id` equals its
/// `target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractableSpawn {
    pub pos: [f32; 2],
    pub kind: InteractableKind,
    pub id: u32,
    #[serde(default)]
    pub target: Option<u32>,
}

/// Boss spawn record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossSpawn {
    pub pos: [f32; 2],
}

/// A scrolling background layer, drawn behind the tiles and repeated
/// horizontally to cover the viewport. `scroll_factor` sets how much of
/// the camera's travel the layer keeps up with: 0.0 rides along with the
/// view, 1.0 sits still in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxLayer {
    /// Atlas cell (column, row) of the layer image.
    pub sprite: [f32; 2],
    /// Image size in world units.
    pub size: [f32; 2],
    pub scroll_factor: [f32; 2],
    /// World offset of the image center when the camera is at the origin.
    #[serde(default)]
    pub offset: [f32; 2],
}

/// Serialized level layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub name: String,
    pub tile_size: f32,
    /// Tile rows, top row first.
    pub rows: Vec<String>,
    pub player_spawn: [f32; 2],
    #[serde(default)]
    pub enemy_spawns: Vec<EnemySpawn>,
    #[serde(default)]
    pub interactable_spawns: Vec<InteractableSpawn>,
    #[serde(default)]
    pub boss_spawn: Option<BossSpawn>,
    #[serde(default)]
    pub parallax_layers: Vec<ParallaxLayer>,
    #[serde(default)]
    pub music: Option<MusicKind>,
}

/// A loaded level: immutable tile grid + spawn records.
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    pub player_spawn: Vec2,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub interactable_spawns: Vec<InteractableSpawn>,
    pub boss_spawn: Option<BossSpawn>,
    pub parallax_layers: Vec<ParallaxLayer>,
    pub music: Option<MusicKind>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let desc: LevelDescriptor = serde_json::from_str(json)?;
        Ok(Self::from_descriptor(desc))
    }

    pub fn from_descriptor(desc: LevelDescriptor) -> Self {
        let height = desc.rows.len() as u32;
        let width = desc.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = TileGrid::new(width, height, desc.tile_size);

        for (row_idx, row) in desc.rows.iter().enumerate() {
            // Descriptor rows are top-first; the grid is bottom-up.
            let ty = height - 1 - row_idx as u32;
            for (tx, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '#' => Some(TileCell::solid(0.0, 0.0)),
                    '=' => Some(TileCell::solid(1.0, 0.0)),
                    'o' => Some(TileCell::decor(2.0, 0.0)),
                    '.' | ' ' => None,
                    other => {
                        log::warn!(
                            "level '{}': unknown tile char {:?} at ({}, {})",
                            desc.name,
                            other,
                            tx,
                            ty
                        );
                        None
                    }
                };
                grid.set(tx as u32, ty, cell);
            }
        }

        log::info!(
            "level '{}' loaded: {}x{} tiles ({} solid), {} enemies, {} interactables",
            desc.name,
            width,
            height,
            grid.solid_count(),
            desc.enemy_spawns.len(),
            desc.interactable_spawns.len(),
        );

        Self {
            name: desc.name,
            grid,
            player_spawn: Vec2::from(desc.player_spawn),
            enemy_spawns: desc.enemy_spawns,
            interactable_spawns: desc.interactable_spawns,
            boss_spawn: desc.boss_spawn,
            parallax_layers: desc.parallax_layers,
            music: desc.music,
        }
    }
}

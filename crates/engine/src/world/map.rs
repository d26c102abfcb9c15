use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::world::collision::{CollisionMap, ObjectId, TriggerKind};
use crate::world::grid::{is_in_bounds, GridPos};

/// Closed set of placed-object kinds. Each kind carries exactly the fields
/// that matter to it: walls always block, triggers always carry a label,
/// furniture and interactives choose via `blocking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapObjectKind {
    Wall,
    Furniture,
    Interactive,
    Trigger,
}

/// Axis-aligned rectangle of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl GridRect {
    pub fn tiles(&self) -> impl Iterator<Item = GridPos> + '_ {
        let (x, y, w, h) = (self.x, self.y, self.w, self.h);
        (y..y + h).flat_map(move |ty| (x..x + w).map(move |tx| GridPos::new(tx, ty)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub id: u64,
    pub kind: MapObjectKind,
    pub rect: GridRect,
    #[serde(default = "default_blocking")]
    pub blocking: bool,
    #[serde(default)]
    pub trigger: Option<String>,
}

fn default_blocking() -> bool {
    true
}

/// Static scene-load description: map bounds, placed objects, spawns.
/// Positions and paths are ephemeral; this is the only persistent map
/// format the engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescription {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub objects: Vec<MapObject>,
    #[serde(default)]
    pub player_spawn: GridPos,
    #[serde(default)]
    pub npc_spawns: Vec<GridPos>,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map dimensions must be positive, got {width}x{height}")]
    EmptyMap { width: i32, height: i32 },
    #[error("object {id} has a degenerate rect {w}x{h}")]
    DegenerateRect { id: u64, w: i32, h: i32 },
    #[error("object {id} extends outside the {width}x{height} map")]
    ObjectOutOfBounds { id: u64, width: i32, height: i32 },
    #[error("trigger object {id} is missing its trigger label")]
    MissingTriggerLabel { id: u64 },
    #[error("spawn at {x},{y} is outside the map")]
    SpawnOutOfBounds { x: i32, y: i32 },
    #[error("failed to parse map description: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MapDescription {
    pub fn from_json(raw: &str) -> Result<Self, MapError> {
        let description: MapDescription = serde_json::from_str(raw)?;
        description.validate()?;
        Ok(description)
    }

    /// Fail fast at the parse boundary: a malformed description must never
    /// reach the collision map builder.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(MapError::EmptyMap {
                width: self.width,
                height: self.height,
            });
        }
        for object in &self.objects {
            let rect = object.rect;
            if rect.w <= 0 || rect.h <= 0 {
                return Err(MapError::DegenerateRect {
                    id: object.id,
                    w: rect.w,
                    h: rect.h,
                });
            }
            let inside = rect.x >= 0
                && rect.y >= 0
                && rect.x + rect.w <= self.width
                && rect.y + rect.h <= self.height;
            if !inside {
                return Err(MapError::ObjectOutOfBounds {
                    id: object.id,
                    width: self.width,
                    height: self.height,
                });
            }
            if object.kind == MapObjectKind::Trigger && object.trigger.is_none() {
                return Err(MapError::MissingTriggerLabel { id: object.id });
            }
        }
        for spawn in std::iter::once(self.player_spawn).chain(self.npc_spawns.iter().copied()) {
            if !is_in_bounds(spawn, self.width, self.height) {
                return Err(MapError::SpawnOutOfBounds {
                    x: spawn.x,
                    y: spawn.y,
                });
            }
        }
        Ok(())
    }
}

/// Bulk-builds the collision map from a validated description and seals
/// the boundary ring regardless of input: nothing walks off the map.
pub fn build_collision_map(description: &MapDescription) -> Result<CollisionMap, MapError> {
    description.validate()?;
    let mut map = CollisionMap::new(description.width, description.height);
    for object in &description.objects {
        for tile in object.rect.tiles() {
            match object.kind {
                MapObjectKind::Wall => map.add_blocked(tile),
                MapObjectKind::Furniture => {
                    if object.blocking {
                        map.add_blocked(tile);
                    }
                }
                MapObjectKind::Interactive => {
                    map.add_interactive(ObjectId(object.id), tile, object.blocking);
                }
                MapObjectKind::Trigger => {
                    // validate() guarantees the label is present.
                    if let Some(label) = &object.trigger {
                        map.add_trigger(tile, TriggerKind::new(label.clone()));
                    }
                }
            }
        }
    }
    map.seal_boundary();
    debug!(
        width = description.width,
        height = description.height,
        objects = description.objects.len(),
        blocked_tiles = map.blocked_count(),
        "collision_map_built"
    );
    Ok(map)
}

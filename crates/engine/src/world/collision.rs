use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::world::grid::{is_in_bounds, GridPos};

/// Identity of a placed interactive object (well, chest, NPC workbench).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Label bound to a trigger zone; scripted area effects key off it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerKind(String);

impl TriggerKind {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spatial index of blocked, interactive, and trigger tiles. Shared
/// read/write state: the placement system patches it between frames and
/// movement/pathfinding re-read it fresh on every query.
///
/// The raw sets are deliberately not exposed; all mutation goes through
/// methods so the boundary-wall invariant cannot be bypassed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionMap {
    width: i32,
    height: i32,
    blocked: HashSet<GridPos>,
    interactive: HashMap<GridPos, ObjectId>,
    triggers: HashMap<GridPos, TriggerKind>,
}

impl CollisionMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Idempotent insert.
    pub fn add_blocked(&mut self, pos: GridPos) {
        self.blocked.insert(pos);
    }

    pub fn add_blocked_tiles(&mut self, positions: &[GridPos]) {
        for pos in positions {
            self.blocked.insert(*pos);
        }
    }

    pub fn remove_blocked(&mut self, pos: GridPos) -> bool {
        self.blocked.remove(&pos)
    }

    /// Out-of-bounds tiles count as blocked regardless of map contents.
    pub fn is_blocked(&self, pos: GridPos) -> bool {
        !is_in_bounds(pos, self.width, self.height) || self.blocked.contains(&pos)
    }

    /// An interactive object occupies space by default.
    pub fn add_interactive(&mut self, id: ObjectId, pos: GridPos, blocking: bool) {
        self.interactive.insert(pos, id);
        if blocking {
            self.blocked.insert(pos);
        }
    }

    pub fn interactive_at(&self, pos: GridPos) -> Option<ObjectId> {
        self.interactive.get(&pos).copied()
    }

    /// Removes the object binding and any blocked entry for the tile.
    pub fn remove_interactive(&mut self, pos: GridPos) -> Option<ObjectId> {
        let removed = self.interactive.remove(&pos);
        if removed.is_some() {
            self.blocked.remove(&pos);
        }
        removed
    }

    /// Triggers never block; they mark scripted zones.
    pub fn add_trigger(&mut self, pos: GridPos, kind: TriggerKind) {
        self.triggers.insert(pos, kind);
    }

    pub fn trigger_at(&self, pos: GridPos) -> Option<&TriggerKind> {
        self.triggers.get(&pos)
    }

    /// Blocks the one-tile ring just outside `[0,width)x[0,height)`, so
    /// nothing can walk off the map even if bounds checks are skipped.
    pub fn seal_boundary(&mut self) {
        for x in -1..=self.width {
            self.blocked.insert(GridPos::new(x, -1));
            self.blocked.insert(GridPos::new(x, self.height));
        }
        for y in -1..=self.height {
            self.blocked.insert(GridPos::new(-1, y));
            self.blocked.insert(GridPos::new(self.width, y));
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }
}

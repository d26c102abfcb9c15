use std::collections::VecDeque;

use tracing::debug;

use crate::world::collision::CollisionMap;
use crate::world::grid::{
    direction_between, ease_out_cubic, grid_to_pixel, lerp, Direction, GridPos, Vec2, TILE_SIZE,
};

/// One tile traversal takes this long at the default speed.
pub const TILE_TRAVERSAL_SECONDS: f32 = 0.18;

/// Pixels per second; crossing one tile takes `TILE_TRAVERSAL_SECONDS`.
pub const DEFAULT_MOVE_SPEED: f32 = TILE_SIZE / TILE_TRAVERSAL_SECONDS;

/// Outcome of one fixed-tick movement update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveUpdate {
    Idle,
    Moving,
    /// Target cell reached this tick; position is fully settled.
    Completed,
}

/// Per-entity grid-to-grid interpolated motion. Two states only: idle and
/// moving. While idle, `pixel_pos == grid_pos * TILE_SIZE` and
/// `target == grid_pos`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementState {
    grid: GridPos,
    target: GridPos,
    start_pixel: Vec2,
    pixel: Vec2,
    facing: Direction,
    moving: bool,
    progress: f32,
    speed_px_per_second: f32,
}

impl MovementState {
    pub fn new(grid: GridPos) -> Self {
        let pixel = grid_to_pixel(grid);
        Self {
            grid,
            target: grid,
            start_pixel: pixel,
            pixel,
            facing: Direction::Down,
            moving: false,
            progress: 0.0,
            speed_px_per_second: DEFAULT_MOVE_SPEED,
        }
    }

    pub fn with_speed(mut self, speed_px_per_second: f32) -> Self {
        self.speed_px_per_second = speed_px_per_second.max(f32::EPSILON);
        self
    }

    pub fn grid_pos(&self) -> GridPos {
        self.grid
    }

    pub fn target(&self) -> GridPos {
        self.target
    }

    pub fn pixel_pos(&self) -> Vec2 {
        self.pixel
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Grid cell one step ahead of the current facing; what the entity
    /// would interact with.
    pub fn facing_tile(&self) -> GridPos {
        self.facing.step_from(self.grid)
    }

    /// Attempts a one-tile step. Fails without side effects while a move
    /// is in flight. A blocked target still turns the entity to face the
    /// attempted direction.
    pub fn try_move(&mut self, direction: Direction, map: &CollisionMap) -> bool {
        if self.moving {
            return false;
        }
        let candidate = direction.step_from(self.grid);
        self.facing = direction;
        if map.is_blocked(candidate) {
            return false;
        }
        self.target = candidate;
        self.moving = true;
        self.progress = 0.0;
        self.start_pixel = self.pixel;
        true
    }

    /// Advances the interpolation by one fixed tick. On completion the
    /// pixel position snaps exactly to `target * TILE_SIZE`, eliminating
    /// accumulated floating-point drift.
    pub fn update(&mut self, dt_seconds: f32) -> MoveUpdate {
        if !self.moving {
            return MoveUpdate::Idle;
        }

        self.progress += self.speed_px_per_second * dt_seconds / TILE_SIZE;
        if self.progress >= 1.0 {
            self.grid = self.target;
            self.pixel = grid_to_pixel(self.target);
            self.start_pixel = self.pixel;
            self.moving = false;
            self.progress = 0.0;
            return MoveUpdate::Completed;
        }

        let eased = ease_out_cubic(self.progress);
        let target_pixel = grid_to_pixel(self.target);
        self.pixel = Vec2::new(
            lerp(self.start_pixel.x, target_pixel.x, eased),
            lerp(self.start_pixel.y, target_pixel.y, eased),
        );
        MoveUpdate::Moving
    }

    /// Instant relocation; no animation, forces idle.
    pub fn teleport_to(&mut self, pos: GridPos) {
        self.grid = pos;
        self.target = pos;
        self.pixel = grid_to_pixel(pos);
        self.start_pixel = self.pixel;
        self.moving = false;
        self.progress = 0.0;
    }

    /// Aborts an in-flight move, snapping back to the pre-target cell.
    pub fn cancel(&mut self) {
        self.target = self.grid;
        self.pixel = grid_to_pixel(self.grid);
        self.start_pixel = self.pixel;
        self.moving = false;
        self.progress = 0.0;
    }
}

/// Result of feeding the next waypoint to the movement machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// No waypoints queued.
    Idle,
    /// A move toward the next waypoint was started; waypoint consumed.
    Dispatched,
    /// A move is still in flight; nothing dispatched.
    Waiting,
    /// The next waypoint became blocked (or desynced); remaining path
    /// discarded rather than forcing a blocked move.
    Discarded,
}

/// Consumes a multi-node path one waypoint per completed move. Cleared at
/// any time between ticks; a cleared path takes effect before the next
/// node is dispatched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathFollower {
    waypoints: VecDeque<GridPos>,
}

impl PathFollower {
    /// Queues a path. A leading node equal to `current` (inclusive-path
    /// convention) is skipped.
    pub fn set_path(&mut self, path: Vec<GridPos>, current: GridPos) {
        self.waypoints = path.into_iter().skip_while(|pos| *pos == current).collect();
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    /// Dispatches the next waypoint once the previous move has completed.
    /// The collision map is re-read on every dispatch, so an obstacle
    /// placed mid-traversal discards the remainder of the path.
    pub fn drive(&mut self, state: &mut MovementState, map: &CollisionMap) -> PathStep {
        if state.is_moving() {
            return PathStep::Waiting;
        }
        let Some(next) = self.waypoints.front().copied() else {
            return PathStep::Idle;
        };
        let Some(direction) = direction_between(state.grid_pos(), next) else {
            // Path no longer lines up with the entity (teleport, stale
            // path); drop it instead of guessing.
            debug!(
                from_x = state.grid_pos().x,
                from_y = state.grid_pos().y,
                next_x = next.x,
                next_y = next.y,
                "path_desynced"
            );
            self.waypoints.clear();
            return PathStep::Discarded;
        };
        if state.try_move(direction, map) {
            self.waypoints.pop_front();
            PathStep::Dispatched
        } else {
            debug!(next_x = next.x, next_y = next.y, "path_blocked_midway");
            self.waypoints.clear();
            PathStep::Discarded
        }
    }
}

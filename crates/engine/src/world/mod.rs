mod camera;
mod collision;
pub(crate) mod grid;
mod map;
mod movement;
mod particles;
mod pathfinding;

pub use camera::{CameraState, DEFAULT_CAMERA_SMOOTHING};
pub use collision::{CollisionMap, ObjectId, TriggerKind};
pub use grid::{
    direction_between, ease_out_cubic, ease_out_quad, grid_to_pixel, is_adjacent, is_in_bounds,
    lerp, manhattan_distance, manhattan_distance_px, parse_tile_key, pixel_to_grid, snap_to_grid,
    tile_center, tile_key, Direction, GridPos, TileKeyError, Vec2, TILE_SIZE,
};
pub use map::{
    build_collision_map, GridRect, MapDescription, MapError, MapObject, MapObjectKind,
};
pub use movement::{
    MoveUpdate, MovementState, PathFollower, PathStep, DEFAULT_MOVE_SPEED,
    TILE_TRAVERSAL_SECONDS,
};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use pathfinding::{find_path_astar, find_path_inclusive, wander_target, SearchLimits};

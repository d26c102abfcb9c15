pub mod app;
pub mod world;

pub use app::{
    run_simulation, ElementState, FixedTimestep, InputAction, InputCollector, InputSnapshot,
    KeyCode, LoopConfig, LoopControl, LoopMetricsSnapshot, MetricsHandle, PhysicalKey, StepPlan,
};
pub use world::{
    build_collision_map, direction_between, find_path_astar, find_path_inclusive, grid_to_pixel,
    is_adjacent, is_in_bounds, manhattan_distance, pixel_to_grid, snap_to_grid, tile_center,
    wander_target, CameraState, CollisionMap, Direction, GridPos, GridRect, MapDescription,
    MapError, MapObject, MapObjectKind, MoveUpdate, MovementState, ObjectId, Particle,
    ParticleKind, ParticleSystem, PathFollower, PathStep, SearchLimits, TriggerKind, Vec2,
    DEFAULT_CAMERA_SMOOTHING, DEFAULT_MOVE_SPEED, TILE_SIZE, TILE_TRAVERSAL_SECONDS,
};

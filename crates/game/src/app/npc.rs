use gridcore::{
    find_path_astar, wander_target, CollisionMap, GridPos, MovementState, PathFollower, PathStep,
    SearchLimits,
};
use rand::Rng;
use tracing::debug;

const WANDER_RANGE_TILES: i32 = 4;
const WANDER_SEARCH_BUDGET: usize = 64;
const IDLE_COOLDOWN_MIN_SECONDS: f32 = 1.0;
const IDLE_COOLDOWN_MAX_SECONDS: f32 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum NpcBehavior {
    Idle { cooldown: f32 },
    Travelling,
}

/// Ambient wanderer: waits out a randomized cooldown, picks a nearby
/// walkable tile, and follows a budget-capped route there. Any failure
/// (no target, no route, path discarded mid-walk) falls back to idling.
pub(crate) struct NpcController {
    movement: MovementState,
    follower: PathFollower,
    behavior: NpcBehavior,
}

impl NpcController {
    pub(crate) fn new(spawn: GridPos) -> Self {
        Self {
            movement: MovementState::new(spawn),
            follower: PathFollower::default(),
            behavior: NpcBehavior::Idle { cooldown: 0.5 },
        }
    }

    pub(crate) fn movement(&self) -> &MovementState {
        &self.movement
    }

    pub(crate) fn is_travelling(&self) -> bool {
        self.behavior == NpcBehavior::Travelling
    }

    pub(crate) fn tick<R: Rng>(&mut self, map: &CollisionMap, rng: &mut R, dt_seconds: f32) {
        match self.behavior {
            NpcBehavior::Idle { cooldown } => {
                let cooldown = cooldown - dt_seconds;
                if cooldown > 0.0 {
                    self.behavior = NpcBehavior::Idle { cooldown };
                } else {
                    self.start_wander(map, rng);
                }
            }
            NpcBehavior::Travelling => {
                let step = self.follower.drive(&mut self.movement, map);
                if step == PathStep::Discarded
                    || (self.follower.is_idle() && !self.movement.is_moving())
                {
                    self.behavior = NpcBehavior::Idle {
                        cooldown: rng.gen_range(IDLE_COOLDOWN_MIN_SECONDS..IDLE_COOLDOWN_MAX_SECONDS),
                    };
                }
            }
        }
        self.movement.update(dt_seconds);
    }

    fn start_wander<R: Rng>(&mut self, map: &CollisionMap, rng: &mut R) {
        let from = self.movement.grid_pos();
        let goal = wander_target(from, |pos| map.is_blocked(pos), WANDER_RANGE_TILES, rng);
        let path = goal
            .map(|goal| {
                find_path_astar(
                    from,
                    goal,
                    |pos| map.is_blocked(pos),
                    SearchLimits::bounded(WANDER_SEARCH_BUDGET),
                )
            })
            .unwrap_or_default();

        if path.is_empty() {
            debug!(x = from.x, y = from.y, "wander_no_route");
            self.behavior = NpcBehavior::Idle {
                cooldown: rng.gen_range(IDLE_COOLDOWN_MIN_SECONDS..IDLE_COOLDOWN_MAX_SECONDS),
            };
        } else {
            self.follower.set_path(path, from);
            self.behavior = NpcBehavior::Travelling;
        }
    }
}

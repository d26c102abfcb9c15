use gridcore::{
    find_path_inclusive, tile_center, CollisionMap, GridPos, InputSnapshot, MoveUpdate,
    MovementState, ParticleKind, ParticleSystem, PathFollower, SearchLimits,
};
use rand::Rng;
use tracing::{debug, info};

/// Player-facing movement policy: held direction keys always win over a
/// queued path, interact pulses act on the faced tile.
pub(crate) struct PlayerController {
    movement: MovementState,
    follower: PathFollower,
}

impl PlayerController {
    pub(crate) fn new(spawn: GridPos) -> Self {
        Self {
            movement: MovementState::new(spawn),
            follower: PathFollower::default(),
        }
    }

    pub(crate) fn movement(&self) -> &MovementState {
        &self.movement
    }

    /// Click-to-move style order. Returns false when no route exists.
    pub(crate) fn order_move_to(&mut self, goal: GridPos, map: &CollisionMap) -> bool {
        let path = find_path_inclusive(
            self.movement.grid_pos(),
            goal,
            |pos| map.is_blocked(pos),
            SearchLimits::default(),
        );
        if path.is_empty() {
            debug!(x = goal.x, y = goal.y, "move_order_unreachable");
            return false;
        }
        self.follower.set_path(path, self.movement.grid_pos());
        true
    }

    pub(crate) fn tick<R: Rng>(
        &mut self,
        snapshot: &InputSnapshot,
        map: &CollisionMap,
        particles: &mut ParticleSystem,
        rng: &mut R,
        dt_seconds: f32,
    ) -> MoveUpdate {
        if snapshot.cancel_pressed() {
            self.follower.clear();
            self.movement.cancel();
        }

        if let Some(direction) = snapshot.direction_intent() {
            // Manual input takes over: any queued path is stale intent.
            if !self.follower.is_idle() {
                self.follower.clear();
            }
            self.movement.try_move(direction, map);
        } else {
            self.follower.drive(&mut self.movement, map);
        }

        if snapshot.interact_pressed() {
            let faced = self.movement.facing_tile();
            if let Some(id) = map.interactive_at(faced) {
                info!(object = %id, x = faced.x, y = faced.y, "object_interacted");
                particles.spawn_burst(ParticleKind::Sparkle, tile_center(faced), rng);
            }
        }

        self.movement.update(dt_seconds)
    }
}

#[cfg(test)]
mod tests {
    use gridcore::{Direction, InputAction, ObjectId, TILE_TRAVERSAL_SECONDS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn open_map() -> CollisionMap {
        let mut map = CollisionMap::new(10, 10);
        map.seal_boundary();
        map
    }

    fn walk_one_tile<R: Rng>(
        player: &mut PlayerController,
        snapshot: &InputSnapshot,
        map: &CollisionMap,
        particles: &mut ParticleSystem,
        rng: &mut R,
    ) {
        for _ in 0..64 {
            if player.tick(snapshot, map, particles, rng, TILE_TRAVERSAL_SECONDS / 4.0)
                == MoveUpdate::Completed
            {
                return;
            }
        }
        panic!("move never completed");
    }

    #[test]
    fn held_direction_moves_the_player() {
        let map = open_map();
        let mut player = PlayerController::new(GridPos::new(2, 2));
        let mut particles = ParticleSystem::default();
        let mut rng = StdRng::seed_from_u64(0);
        let snapshot = InputSnapshot::empty().with_action_down(InputAction::MoveRight, true);

        walk_one_tile(&mut player, &snapshot, &map, &mut particles, &mut rng);
        assert_eq!(player.movement().grid_pos(), GridPos::new(3, 2));
    }

    #[test]
    fn direction_intent_discards_a_queued_path() {
        let map = open_map();
        let mut player = PlayerController::new(GridPos::new(2, 2));
        let mut particles = ParticleSystem::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(player.order_move_to(GridPos::new(7, 2), &map));
        let snapshot = InputSnapshot::empty().with_action_down(InputAction::MoveUp, true);
        walk_one_tile(&mut player, &snapshot, &map, &mut particles, &mut rng);

        assert_eq!(player.movement().grid_pos(), GridPos::new(2, 1));
        // With the key released the discarded path must not resume.
        let idle = InputSnapshot::empty();
        for _ in 0..32 {
            player.tick(&idle, &map, &mut particles, &mut rng, 0.05);
        }
        assert_eq!(player.movement().grid_pos(), GridPos::new(2, 1));
    }

    #[test]
    fn order_to_blocked_goal_is_rejected() {
        let mut map = open_map();
        map.add_blocked(GridPos::new(5, 5));
        let mut player = PlayerController::new(GridPos::new(2, 2));
        assert!(!player.order_move_to(GridPos::new(5, 5), &map));
    }

    #[test]
    fn cancel_stops_path_and_inflight_move() {
        let map = open_map();
        let mut player = PlayerController::new(GridPos::new(2, 2));
        let mut particles = ParticleSystem::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(player.order_move_to(GridPos::new(8, 2), &map));
        let idle = InputSnapshot::empty();
        // Start the first hop but do not finish it.
        player.tick(&idle, &map, &mut particles, &mut rng, 0.01);
        assert!(player.movement().is_moving());

        let cancel = InputSnapshot::empty().with_cancel_pressed(true);
        player.tick(&cancel, &map, &mut particles, &mut rng, 0.01);
        for _ in 0..32 {
            player.tick(&idle, &map, &mut particles, &mut rng, 0.05);
        }
        assert_eq!(player.movement().grid_pos(), GridPos::new(2, 2));
    }

    #[test]
    fn interact_on_faced_object_spawns_a_burst() {
        let mut map = open_map();
        map.add_interactive(ObjectId(7), GridPos::new(2, 3), true);
        let mut player = PlayerController::new(GridPos::new(2, 2));
        let mut particles = ParticleSystem::default();
        let mut rng = StdRng::seed_from_u64(0);

        // Facing defaults to down, straight at the object.
        let interact = InputSnapshot::empty().with_interact_pressed(true);
        player.tick(&interact, &map, &mut particles, &mut rng, 0.01);
        assert!(!particles.is_empty());
    }

    #[test]
    fn interact_into_empty_space_does_nothing() {
        let map = open_map();
        let mut player = PlayerController::new(GridPos::new(2, 2));
        let mut particles = ParticleSystem::default();
        let mut rng = StdRng::seed_from_u64(0);

        let interact = InputSnapshot::empty().with_interact_pressed(true);
        player.tick(&interact, &map, &mut particles, &mut rng, 0.01);
        assert!(particles.is_empty());
    }

    #[test]
    fn path_order_walks_to_the_goal() {
        let mut map = open_map();
        map.add_blocked(GridPos::new(4, 2));
        let mut player = PlayerController::new(GridPos::new(2, 2));
        let mut particles = ParticleSystem::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(player.order_move_to(GridPos::new(6, 2), &map));
        let idle = InputSnapshot::empty();
        for _ in 0..400 {
            player.tick(&idle, &map, &mut particles, &mut rng, 0.05);
            if player.movement().grid_pos() == GridPos::new(6, 2)
                && !player.movement().is_moving()
            {
                return;
            }
        }
        panic!("player never reached the ordered goal");
    }

    #[test]
    fn blocked_direction_turns_without_moving() {
        let mut map = open_map();
        map.add_blocked(GridPos::new(3, 2));
        let mut player = PlayerController::new(GridPos::new(2, 2));
        let mut particles = ParticleSystem::default();
        let mut rng = StdRng::seed_from_u64(0);

        let snapshot = InputSnapshot::empty().with_action_down(InputAction::MoveRight, true);
        player.tick(&snapshot, &map, &mut particles, &mut rng, 0.05);
        assert_eq!(player.movement().grid_pos(), GridPos::new(2, 2));
        assert!(!player.movement().is_moving());
        assert_eq!(player.movement().facing(), Direction::Right);
    }
}

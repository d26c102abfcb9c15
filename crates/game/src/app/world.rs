use gridcore::{
    build_collision_map, CameraState, CollisionMap, GridPos, InputSnapshot, LoopControl,
    MapDescription, MapError, MoveUpdate, MovementState, ParticleSystem, Vec2,
    DEFAULT_CAMERA_SMOOTHING, TILE_SIZE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::npc::NpcController;
use super::player::PlayerController;

const VIEWPORT_WIDTH_PX: f32 = 640.0;
const VIEWPORT_HEIGHT_PX: f32 = 360.0;

/// One loaded scene: collision, actors, camera, and effects, advanced one
/// fixed tick at a time from input snapshots.
pub(crate) struct GameWorld {
    collision: CollisionMap,
    player: PlayerController,
    npcs: Vec<NpcController>,
    camera: CameraState,
    particles: ParticleSystem,
    rng: StdRng,
    paused: bool,
    tick_count: u64,
}

impl GameWorld {
    pub(crate) fn new(description: &MapDescription, seed: u64) -> Result<Self, MapError> {
        let collision = build_collision_map(description)?;
        let player = PlayerController::new(description.player_spawn);
        let npcs = description
            .npc_spawns
            .iter()
            .map(|spawn| NpcController::new(*spawn))
            .collect::<Vec<_>>();
        let camera = CameraState::new(
            VIEWPORT_WIDTH_PX,
            VIEWPORT_HEIGHT_PX,
            description.width as f32 * TILE_SIZE,
            description.height as f32 * TILE_SIZE,
        );
        info!(
            width = description.width,
            height = description.height,
            npcs = npcs.len(),
            "world_loaded"
        );
        Ok(Self {
            collision,
            player,
            npcs,
            camera,
            particles: ParticleSystem::default(),
            rng: StdRng::seed_from_u64(seed),
            paused: false,
            tick_count: 0,
        })
    }

    pub(crate) fn player_movement(&self) -> &MovementState {
        self.player.movement()
    }

    pub(crate) fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub(crate) fn order_player_to(&mut self, goal: GridPos) -> bool {
        self.player.order_move_to(goal, &self.collision)
    }

    pub(crate) fn tick(&mut self, snapshot: &InputSnapshot, dt_seconds: f32) -> LoopControl {
        if snapshot.quit_requested() {
            info!(tick = self.tick_count, "quit_requested");
            return LoopControl::Stop;
        }

        if snapshot.pause_pressed() {
            self.paused = !self.paused;
            info!(paused = self.paused, "pause_toggled");
        }
        if self.paused {
            return LoopControl::Continue;
        }

        let player_update = self.player.tick(
            snapshot,
            &self.collision,
            &mut self.particles,
            &mut self.rng,
            dt_seconds,
        );
        if player_update == MoveUpdate::Completed {
            let arrived = self.player.movement().grid_pos();
            if let Some(trigger) = self.collision.trigger_at(arrived) {
                info!(trigger = %trigger, x = arrived.x, y = arrived.y, "trigger_entered");
            }
        }

        for npc in &mut self.npcs {
            npc.tick(&self.collision, &mut self.rng, dt_seconds);
        }

        let center = self.player.movement().pixel_pos();
        self.camera.follow(Vec2::new(
            center.x + TILE_SIZE * 0.5,
            center.y + TILE_SIZE * 0.5,
        ));
        self.camera.update(DEFAULT_CAMERA_SMOOTHING);
        self.particles.update(dt_seconds);

        self.tick_count += 1;
        LoopControl::Continue
    }
}

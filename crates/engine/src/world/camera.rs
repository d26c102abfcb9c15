use crate::world::grid::{lerp, Vec2};

/// Per-tick exponential smoothing factor used by the follow camera.
pub const DEFAULT_CAMERA_SMOOTHING: f32 = 0.1;

/// Smoothed viewport-follow camera. The offset is the world-space pixel
/// coordinate of the viewport's top-left corner. Invariant after every
/// update: per axis, the offset stays within `[0, map - viewport]` when
/// the map exceeds the viewport, and otherwise centers the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    offset: Vec2,
    target: Vec2,
    viewport_w: f32,
    viewport_h: f32,
    map_w: f32,
    map_h: f32,
}

impl CameraState {
    pub fn new(viewport_w: f32, viewport_h: f32, map_w: f32, map_h: f32) -> Self {
        Self::with_offset(viewport_w, viewport_h, map_w, map_h, Vec2::default())
    }

    pub fn with_offset(
        viewport_w: f32,
        viewport_h: f32,
        map_w: f32,
        map_h: f32,
        initial: Vec2,
    ) -> Self {
        let mut camera = Self {
            offset: initial,
            target: initial,
            viewport_w,
            viewport_h,
            map_w,
            map_h,
        };
        camera.offset = camera.clamped(camera.offset);
        camera.target = camera.offset;
        camera
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport_w, self.viewport_h)
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Centers the viewport on a subject; called every tick with the
    /// followed entity's pixel position.
    pub fn follow(&mut self, subject_center: Vec2) {
        self.set_target(Vec2::new(
            subject_center.x - self.viewport_w * 0.5,
            subject_center.y - self.viewport_h * 0.5,
        ));
    }

    /// One fixed tick of exponential smoothing toward the target, then the
    /// map-bound clamp. Smoothing is per tick; the fixed timestep keeps it
    /// frame-rate independent.
    pub fn update(&mut self, smoothing: f32) {
        self.offset = Vec2::new(
            lerp(self.offset.x, self.target.x, smoothing),
            lerp(self.offset.y, self.target.y, smoothing),
        );
        self.offset = self.clamped(self.offset);
    }

    fn clamped(&self, offset: Vec2) -> Vec2 {
        Vec2::new(
            clamp_axis(offset.x, self.map_w, self.viewport_w),
            clamp_axis(offset.y, self.map_h, self.viewport_h),
        )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x - self.offset.x, world.y - self.offset.y)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x + self.offset.x, screen.y + self.offset.y)
    }

    /// Culling check: is the world point within `margin` pixels of the
    /// visible viewport rectangle.
    pub fn is_on_screen(&self, world: Vec2, margin: f32) -> bool {
        let screen = self.world_to_screen(world);
        screen.x >= -margin
            && screen.x <= self.viewport_w + margin
            && screen.y >= -margin
            && screen.y <= self.viewport_h + margin
    }
}

/// When the map is smaller than the viewport on an axis, center it instead
/// of pinning it to an edge.
fn clamp_axis(value: f32, map_size: f32, viewport_size: f32) -> f32 {
    if map_size > viewport_size {
        value.clamp(0.0, map_size - viewport_size)
    } else {
        -(viewport_size - map_size) * 0.5
    }
}

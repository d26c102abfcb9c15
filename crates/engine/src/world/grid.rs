use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Edge length of one tile in render pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Integer tile coordinate. Negative coordinates are legal (the sealed
/// boundary ring lives at -1 and width/height).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Continuous render-space coordinate in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen-style axes: y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn step_from(self, from: GridPos) -> GridPos {
        let (dx, dy) = self.offset();
        GridPos::new(from.x + dx, from.y + dy)
    }
}

pub fn grid_to_pixel(pos: GridPos) -> Vec2 {
    Vec2::new(pos.x as f32 * TILE_SIZE, pos.y as f32 * TILE_SIZE)
}

pub fn pixel_to_grid(px: Vec2) -> GridPos {
    GridPos::new(
        (px.x / TILE_SIZE).floor() as i32,
        (px.y / TILE_SIZE).floor() as i32,
    )
}

pub fn snap_to_grid(px: Vec2) -> Vec2 {
    grid_to_pixel(pixel_to_grid(px))
}

/// Center of a tile in pixel space; where particles and pickups anchor.
pub fn tile_center(pos: GridPos) -> Vec2 {
    let corner = grid_to_pixel(pos);
    Vec2::new(corner.x + TILE_SIZE * 0.5, corner.y + TILE_SIZE * 0.5)
}

pub fn is_in_bounds(pos: GridPos, width: i32, height: i32) -> bool {
    pos.x >= 0 && pos.x < width && pos.y >= 0 && pos.y < height
}

/// Canonical `"x,y"` identity for a tile. `parse_tile_key` is the exact
/// inverse for every pair of integers, negatives included.
pub fn tile_key(pos: GridPos) -> String {
    format!("{},{}", pos.x, pos.y)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileKeyError {
    #[error("tile key must be two comma-separated integers, got {0:?}")]
    MalformedKey(String),
    #[error("tile key component {component:?} is not an integer")]
    NotAnInteger { component: String },
}

pub fn parse_tile_key(key: &str) -> Result<GridPos, TileKeyError> {
    let (raw_x, raw_y) = key
        .split_once(',')
        .ok_or_else(|| TileKeyError::MalformedKey(key.to_string()))?;
    if raw_y.contains(',') {
        return Err(TileKeyError::MalformedKey(key.to_string()));
    }
    let parse = |component: &str| {
        component
            .parse::<i32>()
            .map_err(|_| TileKeyError::NotAnInteger {
                component: component.to_string(),
            })
    };
    Ok(GridPos::new(parse(raw_x)?, parse(raw_y)?))
}

/// Unclamped; callers clamp `t` when they need to.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Movement easing; steeper settle than the quadratic curve.
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

pub fn manhattan_distance(a: GridPos, b: GridPos) -> u32 {
    a.x.abs_diff(b.x).saturating_add(a.y.abs_diff(b.y))
}

pub fn manhattan_distance_px(a: Vec2, b: Vec2) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// 4-directional adjacency; diagonals do not count.
pub fn is_adjacent(a: GridPos, b: GridPos) -> bool {
    manhattan_distance(a, b) == 1
}

/// Direction from `from` to an orthogonal neighbor `to`. None for
/// non-neighbors, including `from == to`.
pub fn direction_between(from: GridPos, to: GridPos) -> Option<Direction> {
    match (to.x - from.x, to.y - from.y) {
        (0, -1) => Some(Direction::Up),
        (0, 1) => Some(Direction::Down),
        (-1, 0) => Some(Direction::Left),
        (1, 0) => Some(Direction::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_key_round_trips_including_negatives() {
        for (x, y) in [(0, 0), (3, 7), (-4, 12), (-1, -1), (i32::MAX, i32::MIN)] {
            let pos = GridPos::new(x, y);
            assert_eq!(parse_tile_key(&tile_key(pos)), Ok(pos));
        }
    }

    #[test]
    fn parse_tile_key_rejects_malformed_input() {
        assert_eq!(
            parse_tile_key("12"),
            Err(TileKeyError::MalformedKey("12".to_string()))
        );
        assert_eq!(
            parse_tile_key("1,2,3"),
            Err(TileKeyError::MalformedKey("1,2,3".to_string()))
        );
        assert_eq!(
            parse_tile_key("a,2"),
            Err(TileKeyError::NotAnInteger {
                component: "a".to_string()
            })
        );
        assert_eq!(
            parse_tile_key("1,"),
            Err(TileKeyError::NotAnInteger {
                component: String::new()
            })
        );
    }

    #[test]
    fn pixel_grid_round_trip() {
        for (x, y) in [(0, 0), (5, 9), (-3, 2)] {
            let pos = GridPos::new(x, y);
            assert_eq!(pixel_to_grid(grid_to_pixel(pos)), pos);
        }
    }

    #[test]
    fn pixel_to_grid_floors_toward_negative_infinity() {
        assert_eq!(pixel_to_grid(Vec2::new(-0.5, -0.5)), GridPos::new(-1, -1));
        assert_eq!(
            pixel_to_grid(Vec2::new(TILE_SIZE - 0.01, 0.0)),
            GridPos::new(0, 0)
        );
    }

    #[test]
    fn snap_to_grid_lands_on_tile_corner() {
        let snapped = snap_to_grid(Vec2::new(37.0, 70.5));
        assert_eq!(snapped, Vec2::new(TILE_SIZE, 2.0 * TILE_SIZE));
    }

    #[test]
    fn lerp_endpoints_midpoint_and_extrapolation() {
        assert_eq!(lerp(0.0, 100.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 100.0, 1.0), 100.0);
        assert_eq!(lerp(0.0, 100.0, 0.5), 50.0);
        assert_eq!(lerp(0.0, 100.0, 2.0), 200.0);
    }

    #[test]
    fn ease_out_quad_is_monotonic_with_fixed_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        let mut previous = 0.0;
        for step in 1..=100 {
            let value = ease_out_quad(step as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn ease_out_cubic_has_fixed_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < 1e-6);
        assert!(ease_out_cubic(0.5) > ease_out_quad(0.5));
    }

    #[test]
    fn adjacency_is_four_directional() {
        let center = GridPos::new(5, 5);
        assert!(is_adjacent(center, GridPos::new(6, 5)));
        assert!(is_adjacent(center, GridPos::new(5, 4)));
        assert!(!is_adjacent(center, GridPos::new(6, 6)));
        assert!(!is_adjacent(center, center));
    }

    #[test]
    fn direction_between_orthogonal_neighbors() {
        let center = GridPos::new(5, 5);
        assert_eq!(
            direction_between(center, GridPos::new(6, 5)),
            Some(Direction::Right)
        );
        assert_eq!(
            direction_between(center, GridPos::new(5, 4)),
            Some(Direction::Up)
        );
        assert_eq!(direction_between(center, GridPos::new(7, 5)), None);
        assert_eq!(direction_between(center, center), None);
    }

    #[test]
    fn direction_offsets_invert_each_other() {
        let origin = GridPos::new(0, 0);
        for direction in Direction::ALL {
            let stepped = direction.step_from(origin);
            assert_eq!(direction_between(origin, stepped), Some(direction));
        }
    }

    #[test]
    fn manhattan_distance_matches_formula() {
        assert_eq!(
            manhattan_distance(GridPos::new(-2, 3), GridPos::new(4, -1)),
            10
        );
        assert_eq!(
            manhattan_distance_px(Vec2::new(0.0, 0.0), Vec2::new(3.5, -1.5)),
            5.0
        );
    }
}

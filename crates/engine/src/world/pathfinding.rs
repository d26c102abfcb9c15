use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::world::grid::{manhattan_distance, Direction, GridPos};

/// Bounds on a single search. `max_expanded` caps expanded nodes so NPC
/// pursuit stays cheap per frame; a hit cap returns an empty path, never a
/// partial one. `goal_is_exempt` skips the blocked check on the terminal
/// node so an agent can path onto an occupied interactable tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_expanded: Option<usize>,
    pub goal_is_exempt: bool,
}

impl SearchLimits {
    pub fn bounded(max_expanded: usize) -> Self {
        Self {
            max_expanded: Some(max_expanded),
            goal_is_exempt: false,
        }
    }
}

/// Click-to-move primitive: endpoints inclusive, `[start]` when the start
/// already is the goal, empty when unreachable.
pub fn find_path_inclusive<F>(
    start: GridPos,
    goal: GridPos,
    is_blocked: F,
    limits: SearchLimits,
) -> Vec<GridPos>
where
    F: Fn(GridPos) -> bool,
{
    if start == goal {
        return vec![start];
    }
    search(start, goal, &is_blocked, limits).unwrap_or_default()
}

/// Lower-level grid search used by NPC AI: same contract as
/// `find_path_inclusive` except `start == goal` yields an empty path.
pub fn find_path_astar<F>(
    start: GridPos,
    goal: GridPos,
    is_blocked: F,
    limits: SearchLimits,
) -> Vec<GridPos>
where
    F: Fn(GridPos) -> bool,
{
    if start == goal {
        return Vec::new();
    }
    search(start, goal, &is_blocked, limits).unwrap_or_default()
}

/// Uniformly random non-blocked tile within the square of half-width
/// `range` around `from`, excluding `from` itself.
pub fn wander_target<F, R>(from: GridPos, is_blocked: F, range: i32, rng: &mut R) -> Option<GridPos>
where
    F: Fn(GridPos) -> bool,
    R: Rng,
{
    let mut candidates = Vec::new();
    for dy in -range..=range {
        for dx in -range..=range {
            if dx == 0 && dy == 0 {
                continue;
            }
            let pos = GridPos::new(from.x + dx, from.y + dy);
            if !is_blocked(pos) {
                candidates.push(pos);
            }
        }
    }
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    pos: GridPos,
    h_cost: u32,
    f_cost: u32,
    insertion_order: u64,
}

// Tie-break on (f, h, y, x, insertion) so equal-length paths resolve the
// same way on every run.
fn open_node_order_key(node: OpenNode) -> (u32, u32, i32, i32, u64) {
    (
        node.f_cost,
        node.h_cost,
        node.pos.y,
        node.pos.x,
        node.insertion_order,
    )
}

fn pick_best_open_node_index(open: &[OpenNode]) -> usize {
    let mut best_index = 0usize;
    for index in 1..open.len() {
        if open_node_order_key(open[index]) < open_node_order_key(open[best_index]) {
            best_index = index;
        }
    }
    best_index
}

fn search<F>(
    start: GridPos,
    goal: GridPos,
    is_blocked: &F,
    limits: SearchLimits,
) -> Option<Vec<GridPos>>
where
    F: Fn(GridPos) -> bool,
{
    if is_blocked(goal) && !limits.goal_is_exempt {
        return None;
    }

    let mut closed: HashSet<GridPos> = HashSet::new();
    let mut best_g: HashMap<GridPos, u32> = HashMap::new();
    let mut parent: HashMap<GridPos, GridPos> = HashMap::new();
    let mut open: Vec<OpenNode> = Vec::new();
    let mut next_insertion = 0u64;
    let mut expanded = 0usize;

    let start_h = manhattan_distance(start, goal);
    open.push(OpenNode {
        pos: start,
        h_cost: start_h,
        f_cost: start_h,
        insertion_order: next_insertion,
    });
    next_insertion = next_insertion.saturating_add(1);
    best_g.insert(start, 0);

    while !open.is_empty() {
        let best_index = pick_best_open_node_index(&open);
        let current = open.swap_remove(best_index);
        if closed.contains(&current.pos) {
            continue;
        }
        closed.insert(current.pos);

        if current.pos == goal {
            return Some(reconstruct_path(&parent, start, goal));
        }

        expanded = expanded.saturating_add(1);
        if let Some(cap) = limits.max_expanded {
            if expanded >= cap {
                return None;
            }
        }

        let current_g = best_g.get(&current.pos).copied().unwrap_or(u32::MAX);
        for direction in Direction::ALL {
            let neighbor = direction.step_from(current.pos);
            if closed.contains(&neighbor) {
                continue;
            }
            let neighbor_is_goal = neighbor == goal;
            if is_blocked(neighbor) && !(limits.goal_is_exempt && neighbor_is_goal) {
                continue;
            }

            let tentative_g = current_g.saturating_add(1);
            if tentative_g >= best_g.get(&neighbor).copied().unwrap_or(u32::MAX) {
                continue;
            }

            best_g.insert(neighbor, tentative_g);
            parent.insert(neighbor, current.pos);
            let h_cost = manhattan_distance(neighbor, goal);
            open.push(OpenNode {
                pos: neighbor,
                h_cost,
                f_cost: tentative_g.saturating_add(h_cost),
                insertion_order: next_insertion,
            });
            next_insertion = next_insertion.saturating_add(1);
        }
    }

    None
}

fn reconstruct_path(parent: &HashMap<GridPos, GridPos>, start: GridPos, goal: GridPos) -> Vec<GridPos> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match parent.get(&cursor) {
            Some(previous) => {
                cursor = *previous;
                path.push(cursor);
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

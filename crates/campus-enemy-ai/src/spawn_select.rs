//! Weighted spawn-point selection.
//!
//! Enemies should appear far from the player: the points nearest to the car
//! are never used, and the farthest few are strongly preferred.

use rand::Rng;

use campus_core::config::SpawnPoint;
use campus_core::constants::*;
use campus_core::types::Vec2;

/// A free spawn point with its distance to the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedPoint {
    pub index: usize,
    pub distance: f64,
}

/// Free points ranked farthest-first, with the nearest
/// `min(3, n / 2)` dropped. Ties keep configuration order.
pub fn candidate_points(points: &[SpawnPoint], occupied: &[usize], anchor: Vec2) -> Vec<RankedPoint> {
    let mut ranked: Vec<RankedPoint> = points
        .iter()
        .enumerate()
        .filter(|(index, _)| !occupied.contains(index))
        .map(|(index, point)| RankedPoint {
            index,
            distance: point.position().distance(anchor),
        })
        .collect();

    ranked.sort_by(|a, b| b.distance.total_cmp(&a.distance));

    let exclude = SPAWN_NEAREST_EXCLUDED.min(ranked.len() / 2);
    ranked.truncate(ranked.len() - exclude);
    ranked
}

/// Pick a spawn point index, or `None` when every point is occupied or
/// filtered out.
///
/// With probability 0.8 the pick is uniform among the farthest three
/// candidates; otherwise uniform among all candidates.
pub fn select_spawn_point<R: Rng + ?Sized>(
    points: &[SpawnPoint],
    occupied: &[usize],
    anchor: Vec2,
    rng: &mut R,
) -> Option<usize> {
    let candidates = candidate_points(points, occupied, anchor);
    if candidates.is_empty() {
        return None;
    }

    let pool = if rng.gen_bool(SPAWN_FARTHEST_BIAS) {
        &candidates[..SPAWN_FARTHEST_POOL.min(candidates.len())]
    } else {
        &candidates[..]
    };
    Some(pool[rng.gen_range(0..pool.len())].index)
}

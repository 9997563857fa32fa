// Block selection — which single block mutates this tick.
//
// Placement follows a lowest-first, connectivity-required order so
// structures assemble from the ground up and never float:
//   1. Find the minimum Y among currently unplaced blocks.
//   2. Keep unplaced blocks at that level whose cell has at least one
//      non-air face neighbor in the world (physically supported or adjacent
//      to existing matter).
//   3. Pick one: first in plan order by default, or uniformly at random
//      under `SelectionPolicy::Random`.
// No qualifying candidate is a stall, not an error — the building retries
// on its next mutation tick once a supporting neighbor exists.
//
// Destruction (the decay path) is uniform over the FULL block set with no
// regard for position or connectivity. That is intentionally cruder than
// placement — decay is a placeholder behavior kept as-is, not something to
// make realistic here.
//
// **Critical constraint: determinism.** All randomness comes from the
// injected `GameRng`; plan-order selection uses the fixed block list order.

use crate::block::BuildingBlock;
use crate::types::SelectionPolicy;
use crate::world::World;
use smallvec::SmallVec;
use stronghold_prng::GameRng;

/// Choose the index of the next block to place, or `None` if no unplaced
/// block is both at the lowest unplaced level and connected to existing
/// matter.
pub fn next_block_to_place(
    blocks: &[BuildingBlock],
    world: &dyn World,
    policy: SelectionPolicy,
    rng: &mut GameRng,
) -> Option<usize> {
    let min_y = blocks
        .iter()
        .filter(|b| !b.is_placed)
        .map(|b| b.position.y)
        .min()?;

    let candidates: SmallVec<[usize; 16]> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| {
            !b.is_placed
                && b.position.y <= min_y
                && world.has_occupied_face_neighbor(b.position)
        })
        .map(|(i, _)| i)
        .collect();

    match policy {
        SelectionPolicy::PlanOrder => candidates.first().copied(),
        SelectionPolicy::Random => {
            (!candidates.is_empty()).then(|| candidates[rng.range_usize(0, candidates.len())])
        }
    }
}

/// Choose the index of a block to destroy during decay: uniform over every
/// plan entry, placed or not. Hitting an already-missing block wastes the
/// tick, which is acceptable for the placeholder decay behavior.
pub fn block_to_destroy(blocks: &[BuildingBlock], rng: &mut GameRng) -> Option<usize> {
    if blocks.is_empty() {
        return None;
    }
    Some(rng.range_usize(0, blocks.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockState, VoxelCoord};
    use crate::world::VoxelWorld;

    fn grounded_world() -> VoxelWorld {
        let mut world = VoxelWorld::new(16, 16, 16);
        world.fill_layer(0, BlockState::Ground);
        world
    }

    fn column(base: VoxelCoord, height: i32) -> Vec<BuildingBlock> {
        (0..height)
            .map(|dy| {
                BuildingBlock::new(
                    VoxelCoord::new(base.x, base.y + dy, base.z),
                    BlockState::Stone,
                )
            })
            .collect()
    }

    #[test]
    fn picks_lowest_unplaced_level_first() {
        let world = grounded_world();
        let mut rng = GameRng::new(1);
        // Two-level plan: (y=1) and (y=2), nothing placed yet.
        let blocks = vec![
            BuildingBlock::new(VoxelCoord::new(5, 2, 5), BlockState::Plank),
            BuildingBlock::new(VoxelCoord::new(5, 1, 5), BlockState::Plank),
            BuildingBlock::new(VoxelCoord::new(6, 1, 5), BlockState::Plank),
        ];
        let chosen =
            next_block_to_place(&blocks, &world, SelectionPolicy::PlanOrder, &mut rng).unwrap();
        // Index 1 is the first plan entry at the minimum unplaced Y.
        assert_eq!(chosen, 1);
        assert_eq!(blocks[chosen].position.y, 1);
    }

    #[test]
    fn never_selects_above_minimum_unplaced_y() {
        let mut world = grounded_world();
        let mut rng = GameRng::new(2);
        let mut blocks = column(VoxelCoord::new(4, 1, 4), 5);
        // Simulate partial progress: bottom two placed, in the world too.
        for b in &mut blocks[..2] {
            b.is_placed = true;
            world.set_block(b.position, b.target_state);
        }
        let min_unplaced_y = 3;
        for policy in [SelectionPolicy::PlanOrder, SelectionPolicy::Random] {
            let chosen = next_block_to_place(&blocks, &world, policy, &mut rng).unwrap();
            assert!(blocks[chosen].position.y <= min_unplaced_y);
        }
    }

    #[test]
    fn requires_an_occupied_neighbor() {
        // Empty world, no terrain: a floating plan has no connected candidate.
        let world = VoxelWorld::new(16, 16, 16);
        let mut rng = GameRng::new(3);
        let blocks = column(VoxelCoord::new(4, 5, 4), 3);
        assert_eq!(
            next_block_to_place(&blocks, &world, SelectionPolicy::PlanOrder, &mut rng),
            None
        );
    }

    #[test]
    fn stall_clears_once_support_appears() {
        let mut world = VoxelWorld::new(16, 16, 16);
        let mut rng = GameRng::new(4);
        let blocks = column(VoxelCoord::new(4, 5, 4), 3);
        assert!(
            next_block_to_place(&blocks, &world, SelectionPolicy::PlanOrder, &mut rng).is_none()
        );
        // External matter appears beside the bottom block.
        world.set_block(VoxelCoord::new(5, 5, 4), BlockState::Stone);
        let chosen =
            next_block_to_place(&blocks, &world, SelectionPolicy::PlanOrder, &mut rng).unwrap();
        assert_eq!(blocks[chosen].position, VoxelCoord::new(4, 5, 4));
    }

    #[test]
    fn random_policy_stays_within_candidates() {
        let world = grounded_world();
        let mut rng = GameRng::new(5);
        // Four supported blocks on the ground level.
        let blocks: Vec<BuildingBlock> = (0..4)
            .map(|i| BuildingBlock::new(VoxelCoord::new(2 + i, 1, 2), BlockState::Plank))
            .collect();
        for _ in 0..100 {
            let chosen =
                next_block_to_place(&blocks, &world, SelectionPolicy::Random, &mut rng).unwrap();
            assert!(chosen < blocks.len());
            assert_eq!(blocks[chosen].position.y, 1);
        }
    }

    #[test]
    fn random_policy_is_replayable() {
        let world = grounded_world();
        let blocks: Vec<BuildingBlock> = (0..6)
            .map(|i| BuildingBlock::new(VoxelCoord::new(2 + i, 1, 2), BlockState::Plank))
            .collect();
        let mut rng_a = GameRng::new(99);
        let mut rng_b = GameRng::new(99);
        for _ in 0..50 {
            assert_eq!(
                next_block_to_place(&blocks, &world, SelectionPolicy::Random, &mut rng_a),
                next_block_to_place(&blocks, &world, SelectionPolicy::Random, &mut rng_b),
            );
        }
    }

    #[test]
    fn fully_placed_plan_yields_no_candidate() {
        let world = grounded_world();
        let mut rng = GameRng::new(6);
        let mut blocks = column(VoxelCoord::new(4, 1, 4), 3);
        for b in &mut blocks {
            b.is_placed = true;
        }
        assert_eq!(
            next_block_to_place(&blocks, &world, SelectionPolicy::PlanOrder, &mut rng),
            None
        );
    }

    #[test]
    fn destroy_pick_is_uniform_over_all_entries() {
        let mut rng = GameRng::new(7);
        let blocks = column(VoxelCoord::new(4, 1, 4), 10);
        let mut seen = [false; 10];
        for _ in 0..5_000 {
            seen[block_to_destroy(&blocks, &mut rng).unwrap()] = true;
        }
        // Every index, including high unconnected ones, must be reachable.
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn destroy_pick_on_empty_set_is_none() {
        let mut rng = GameRng::new(8);
        assert_eq!(block_to_destroy(&[], &mut rng), None);
    }
}

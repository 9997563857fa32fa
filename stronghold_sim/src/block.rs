// Block plan data model and the placement transform.
//
// A structure's shape is a list of `PlanBlock`s in plan-local coordinates.
// At placement time `to_absolute()` rotates each entry about the plan
// origin, translates by the anchor position, and lifts everything one voxel
// up — structures sit on top of their anchor cell, so the terrain at the
// anchor's level supports the bottom layer from the first tick.
//
// `BuildingBlock` is the absolute, tick-tracked form. Its `position` is
// fixed for the block's lifetime. `is_placed` is never authoritative: it is
// re-derived each tick by comparing the world's actual block against
// `target_state`. `place()` and `destroy()` only express intent into the
// world; the flag catches up on the next reconciliation.
//
// See also: `template.rs` for the built-in plans, `building.rs` for the
// aggregate that owns the absolute blocks, `selector.rs` for placement
// order.

use crate::types::{BlockState, BuildingError, Rotation, VoxelCoord};
use crate::world::World;
use serde::{Deserialize, Serialize};

/// One entry of a relative block plan: a plan-local offset and the material
/// that should end up there. Air entries are legal — they carve space out
/// of whatever terrain the structure overlaps — but are excluded from all
/// completion totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBlock {
    pub offset: VoxelCoord,
    pub state: BlockState,
}

impl PlanBlock {
    pub const fn new(offset: VoxelCoord, state: BlockState) -> Self {
        Self { offset, state }
    }
}

/// A single planned voxel of a placed structure, in absolute world space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingBlock {
    pub position: VoxelCoord,
    pub target_state: BlockState,
    /// Derived each tick from the world; see `Building::reconcile`.
    pub is_placed: bool,
}

impl BuildingBlock {
    pub const fn new(position: VoxelCoord, target_state: BlockState) -> Self {
        Self {
            position,
            target_state,
            is_placed: false,
        }
    }

    /// Return a copy with `position` remapped by a rotation about the local
    /// origin. Pure; materials carry no orientation, so only the position
    /// changes.
    pub fn rotated(self, rotation: Rotation) -> Self {
        Self {
            position: rotation.apply(self.position),
            ..self
        }
    }

    /// Write this block's target material into the world. Does not touch
    /// `is_placed` — that only ever comes from re-reading the world.
    pub fn place(&self, world: &mut dyn World) {
        world.set(self.position, self.target_state);
    }

    /// Clear this block's cell in the world back to air.
    pub fn destroy(&self, world: &mut dyn World) {
        world.set(self.position, BlockState::Air);
    }
}

/// Map a relative plan onto an absolute anchor: rotate about the plan
/// origin, then translate by `origin` with a fixed +1 vertical offset.
/// Deterministic and order-preserving.
pub fn to_absolute(plan: &[PlanBlock], origin: VoxelCoord, rotation: Rotation) -> Vec<BuildingBlock> {
    plan.iter()
        .map(|pb| {
            let rotated = rotation.apply(pb.offset);
            let position = VoxelCoord::new(
                rotated.x + origin.x,
                rotated.y + origin.y + 1,
                rotated.z + origin.z,
            );
            BuildingBlock::new(position, pb.state)
        })
        .collect()
}

/// Componentwise minimum coordinate over a block set.
pub fn min_corner(blocks: &[BuildingBlock]) -> Result<VoxelCoord, BuildingError> {
    corner(blocks, i32::min)
}

/// Componentwise maximum coordinate over a block set.
pub fn max_corner(blocks: &[BuildingBlock]) -> Result<VoxelCoord, BuildingError> {
    corner(blocks, i32::max)
}

fn corner(blocks: &[BuildingBlock], pick: fn(i32, i32) -> i32) -> Result<VoxelCoord, BuildingError> {
    let first = blocks.first().ok_or(BuildingError::EmptyBlockSet)?;
    let mut acc = first.position;
    for b in &blocks[1..] {
        acc.x = pick(acc.x, b.position.x);
        acc.y = pick(acc.y, b.position.y);
        acc.z = pick(acc.z, b.position.z);
    }
    Ok(acc)
}

/// Extent of the bounding box, `max_corner - min_corner` per axis.
pub fn plan_size(blocks: &[BuildingBlock]) -> Result<VoxelCoord, BuildingError> {
    let min = min_corner(blocks)?;
    let max = max_corner(blocks)?;
    Ok(VoxelCoord::new(max.x - min.x, max.y - min.y, max.z - min.z))
}

/// Inclusive axis-aligned bounding-box test. This is deliberately a box
/// test, not exact membership: positions inside the box that belong to no
/// planned block still count as "inside" (hollow interiors are part of the
/// structure for break-event attribution).
pub fn bounds_contain(blocks: &[BuildingBlock], pos: VoxelCoord) -> bool {
    let (Ok(min), Ok(max)) = (min_corner(blocks), max_corner(blocks)) else {
        return false;
    };
    pos.x >= min.x
        && pos.x <= max.x
        && pos.y >= min.y
        && pos.y <= max.y
        && pos.z >= min.z
        && pos.z <= max.z
}

// The building aggregate and its tick-driven state machine.
//
// A `Building` owns a fixed set of absolute `BuildingBlock`s and mutates the
// world one block at a time on a countdown cadence. The per-tick protocol
// (`on_world_tick`):
//
//   1. Age the building.
//   2. Reconcile every block's `is_placed` against the world by equality.
//      This makes the building self-healing against external grid edits —
//      it cannot tell "externally restored" from "never removed", and does
//      not need to.
//   3. Observer-side replicas stop here (reconcile only, never mutate).
//   4. Zero placed blocks (after having had any) emits `TornDown` — the
//      hook for whatever registry owns this building to remove it.
//   5. While building and incomplete: countdown, then place one block via
//      the selector (see `selector.rs`).
//   6. While abandoned and incomplete: countdown, then destroy one block
//      chosen uniformly at random — the decay path.
//   7. Reaching full placement flips `is_building` off and latches
//      `has_completed_once` on the same tick the last block lands.
//
// Completion (`has_completed_once`) is sticky and the collapse threshold is
// an independent predicate — both can hold at once, so `status()` is a
// derived reporting view, never the source of truth.
//
// Mutation outcomes are pushed into a caller-supplied `Vec<BuildingEvent>`;
// the core never dispatches or subscribes to anything itself.
//
// See also: `selector.rs` for placement order, `block.rs` for the block
// data model, `factory.rs` for validated construction, `template.rs` for
// the per-kind tuning the constructor consumes.
//
// **Critical constraint: determinism.** The only randomness is the injected
// `GameRng`; ticking two identically seeded buildings against identical
// worlds produces identical mutation sequences.

use crate::block::{self, BuildingBlock};
use crate::selector;
use crate::template::KindProfile;
use crate::types::{BlockState, BuildingError, BuildingKind, Rotation, SelectionPolicy, VoxelCoord};
use crate::world::World;
use serde::{Deserialize, Serialize};
use stronghold_prng::GameRng;

/// Derived reporting view of a building's condition. Exactly one holds at a
/// time; `Collapsed` wins over everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingStatus {
    Collapsed,
    Building,
    Complete,
    Decaying,
}

/// Outcome of a tick, for the layer that owns the building registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingEvent {
    /// A block was written into the world this tick.
    BlockPlaced { position: VoxelCoord },
    /// A previously placed block was cleared during decay.
    BlockDestroyed { position: VoxelCoord },
    /// Placed fraction reached 100% for the first time.
    Completed,
    /// Every placed block is gone; the owner should remove this building.
    TornDown,
}

/// A multi-block structure assembling and decaying inside the world grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub owner: String,
    /// Placement anchor. Blocks sit one voxel above it (see `block.rs`).
    pub origin: VoxelCoord,
    pub rotation: Rotation,
    blocks: Vec<BuildingBlock>,
    /// Actively gaining blocks. Flipped off at completion; an owner layer
    /// flips it back on when a repair crew is assigned.
    pub is_building: bool,
    /// Latched the first time placed fraction reaches 100%. Never cleared.
    pub has_completed_once: bool,
    pub ticks_per_mutation: u32,
    pub ticks_until_next_mutation: u32,
    pub age_in_ticks: u64,
    /// Chance an external break destroys extra blocks. Stored for the
    /// break-handling layer; the core never rolls it.
    pub explode_chance: f64,
    pub selection: SelectionPolicy,
    /// Representative block for portrait rendering.
    pub portrait_block: BlockState,
    /// Whether any block has ever been placed; gates the teardown hook so a
    /// freshly placed building is not torn down before its first block.
    has_ever_placed: bool,
}

impl Building {
    /// Below this placed fraction the structure counts as collapsed.
    pub const MIN_VIABLE_FRACTION: f32 = 0.2;
    /// A once-completed structure is functional while at or above this.
    pub const FUNCTIONAL_FRACTION: f32 = 0.5;

    /// Construct a building from an absolute block set and kind profile.
    ///
    /// Rejects plans with zero non-air blocks — such a building could never
    /// make progress and `placed_fraction` would divide by zero.
    pub fn new(
        kind: BuildingKind,
        owner: impl Into<String>,
        origin: VoxelCoord,
        rotation: Rotation,
        blocks: Vec<BuildingBlock>,
        profile: &KindProfile,
    ) -> Result<Self, BuildingError> {
        if !blocks.iter().any(|b| !b.target_state.is_air()) {
            return Err(BuildingError::EmptyPlan(kind));
        }
        Ok(Self {
            kind,
            owner: owner.into(),
            origin,
            rotation,
            blocks,
            is_building: true,
            has_completed_once: false,
            ticks_per_mutation: profile.ticks_per_mutation,
            ticks_until_next_mutation: profile.ticks_per_mutation,
            age_in_ticks: 0,
            explode_chance: profile.explode_chance,
            selection: profile.selection,
            portrait_block: profile.portrait_block,
            has_ever_placed: false,
        })
    }

    /// The fixed block plan. Placed status changes; the set never does.
    pub fn blocks(&self) -> &[BuildingBlock] {
        &self.blocks
    }

    /// Planned non-air blocks.
    pub fn total_blocks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| !b.target_state.is_air())
            .count()
    }

    /// Currently placed non-air blocks.
    pub fn placed_blocks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.is_placed && !b.target_state.is_air())
            .count()
    }

    /// Placed / total over non-air blocks. Total is never zero (validated
    /// at construction).
    pub fn placed_fraction(&self) -> f32 {
        self.placed_blocks() as f32 / self.total_blocks() as f32
    }

    /// Functional requires both historical completion and current placed
    /// fraction at or above `FUNCTIONAL_FRACTION`.
    pub fn is_functional(&self) -> bool {
        self.has_completed_once && self.placed_fraction() >= Self::FUNCTIONAL_FRACTION
    }

    /// Placed fraction has fallen below `MIN_VIABLE_FRACTION`.
    pub fn is_collapsed(&self) -> bool {
        self.placed_fraction() < Self::MIN_VIABLE_FRACTION
    }

    /// Derived status view. `Collapsed` takes priority for reporting even
    /// when the sticky completion flag is also set.
    pub fn status(&self) -> BuildingStatus {
        if self.is_collapsed() {
            BuildingStatus::Collapsed
        } else if self.is_building {
            BuildingStatus::Building
        } else if self.placed_blocks() >= self.total_blocks() {
            BuildingStatus::Complete
        } else {
            BuildingStatus::Decaying
        }
    }

    /// Inclusive bounding-box test for break-event attribution. Positions
    /// inside the box that belong to no planned block still count.
    pub fn contains_position(&self, pos: VoxelCoord) -> bool {
        block::bounds_contain(&self.blocks, pos)
    }

    /// Re-derive every block's `is_placed` from the world's actual state.
    fn reconcile(&mut self, world: &dyn World) {
        for b in &mut self.blocks {
            b.is_placed = world.get(b.position) == b.target_state;
        }
        if self.placed_blocks() > 0 {
            self.has_ever_placed = true;
        }
    }

    /// Advance the building by one world tick. See the module header for
    /// the full protocol. Never fails: ticks that cannot make progress do
    /// nothing and are retried on later ticks.
    pub fn on_world_tick(
        &mut self,
        world: &mut dyn World,
        rng: &mut GameRng,
        events: &mut Vec<BuildingEvent>,
    ) {
        self.age_in_ticks += 1;
        self.reconcile(world);

        // Observer replicas mirror state but never mutate the grid.
        if world.is_client_side() {
            return;
        }

        let placed = self.placed_blocks();
        let total = self.total_blocks();

        if placed == 0 && self.has_ever_placed {
            events.push(BuildingEvent::TornDown);
        }

        if self.is_building && placed < total {
            self.ticks_until_next_mutation = self.ticks_until_next_mutation.saturating_sub(1);
            if self.ticks_until_next_mutation == 0 {
                self.ticks_until_next_mutation = self.ticks_per_mutation;
                self.place_next_block(world, rng, events);
            }
        } else if placed < total {
            // Abandoned and incomplete: decay. A complete, untouched
            // structure never enters this branch and stays stable.
            self.ticks_until_next_mutation = self.ticks_until_next_mutation.saturating_sub(1);
            if self.ticks_until_next_mutation == 0 {
                self.ticks_until_next_mutation = self.ticks_per_mutation;
                self.destroy_random_block(world, rng, events);
            }
        }

        // Counts are re-derived after the mutation so completion lands on
        // the same tick as the final block.
        if self.placed_blocks() >= self.total_blocks() {
            self.is_building = false;
            if !self.has_completed_once {
                self.has_completed_once = true;
                events.push(BuildingEvent::Completed);
            }
        }
    }

    fn place_next_block(
        &mut self,
        world: &mut dyn World,
        rng: &mut GameRng,
        events: &mut Vec<BuildingEvent>,
    ) {
        let Some(i) = selector::next_block_to_place(&self.blocks, world, self.selection, rng)
        else {
            // Stall: nothing supported at the lowest unplaced level yet.
            return;
        };
        self.blocks[i].place(world);
        // The world is the source of truth, so re-read rather than assume
        // the write landed.
        self.blocks[i].is_placed = world.get(self.blocks[i].position) == self.blocks[i].target_state;
        if self.blocks[i].is_placed {
            self.has_ever_placed = true;
        }
        events.push(BuildingEvent::BlockPlaced {
            position: self.blocks[i].position,
        });
    }

    fn destroy_random_block(
        &mut self,
        world: &mut dyn World,
        rng: &mut GameRng,
        events: &mut Vec<BuildingEvent>,
    ) {
        let Some(i) = selector::block_to_destroy(&self.blocks, rng) else {
            return;
        };
        let was_placed = self.blocks[i].is_placed && !self.blocks[i].target_state.is_air();
        self.blocks[i].destroy(world);
        self.blocks[i].is_placed = world.get(self.blocks[i].position) == self.blocks[i].target_state;
        if was_placed {
            events.push(BuildingEvent::BlockDestroyed {
                position: self.blocks[i].position,
            });
        }
    }
}

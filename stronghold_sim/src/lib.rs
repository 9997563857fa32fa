// stronghold_sim — pure Rust construction/decay simulation library.
//
// Models multi-block structures that assemble and decay block-by-block
// inside a live voxel grid, driven by a discrete tick clock. The strategy
// layer hosting this crate owns the tick loop and the building registry;
// this crate owns what happens to one building per tick.
//
// Module overview:
// - `types.rs`:    VoxelCoord, BlockState, Rotation, BuildingKind, errors.
// - `world.rs`:    The `World` grid trait + the dense `VoxelWorld` impl.
// - `block.rs`:    PlanBlock / BuildingBlock, placement transform, corners.
// - `selector.rs`: Lowest-first connectivity-required block selection.
// - `building.rs`: The building aggregate and its tick state machine.
// - `template.rs`: Per-kind plans + tuning profiles, the template registry.
// - `factory.rs`:  Kind identifier -> validated `Building`.
// - `prng`:        Re-exported from `stronghold_prng` — xoshiro256++ with
//                  SplitMix64 seeding.
//
// The crate has no rendering, networking, or persistence-format concerns.
// It runs authoritatively on one side; observer replicas tick the same
// buildings against a client-side `World` and only reconcile.
//
// **Critical constraint: determinism.** All randomness comes from a seeded
// `GameRng` passed into the tick. No `HashMap`, no system time, no OS
// entropy. Use `BTreeMap` for ordered collections.

pub mod block;
pub mod building;
pub mod factory;
pub mod selector;
pub mod template;
pub mod types;
pub mod world;
pub use stronghold_prng as prng;

pub use block::{BuildingBlock, PlanBlock};
pub use building::{Building, BuildingEvent, BuildingStatus};
pub use factory::BuildingFactory;
pub use template::{KindProfile, Template, TemplateRegistry};
pub use types::{BlockState, BuildingError, BuildingKind, Rotation, SelectionPolicy, VoxelCoord};
pub use world::{VoxelWorld, World};

// Core types shared across the construction sim.
//
// Defines spatial coordinates (`VoxelCoord`), the block material enum
// (`BlockState`), yaw rotation for plan placement (`Rotation`), the closed
// set of structure kinds (`BuildingKind`), the placement tie-break policy
// (`SelectionPolicy`), and the construction-time error taxonomy
// (`BuildingError`). All data types derive `Serialize` and `Deserialize`
// for save/load and state transfer.
//
// **Critical constraint: determinism.** Types here feed directly into the
// tick logic. `BuildingKind` derives `Ord` so registries can use `BTreeMap`
// for deterministic iteration.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D voxel grid. Each component is in voxel units.
///
/// The coordinate system uses right-handed conventions:
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: south (positive) / north (negative)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn above(self) -> Self {
        Self::new(self.x, self.y + 1, self.z)
    }

    pub const fn below(self) -> Self {
        Self::new(self.x, self.y - 1, self.z)
    }

    pub const fn north(self) -> Self {
        Self::new(self.x, self.y, self.z - 1)
    }

    pub const fn south(self) -> Self {
        Self::new(self.x, self.y, self.z + 1)
    }

    pub const fn east(self) -> Self {
        Self::new(self.x + 1, self.y, self.z)
    }

    pub const fn west(self) -> Self {
        Self::new(self.x - 1, self.y, self.z)
    }

    /// The six face-adjacent neighbors, in a fixed order.
    pub const fn face_neighbors(self) -> [Self; 6] {
        [
            self.below(),
            self.east(),
            self.west(),
            self.south(),
            self.north(),
            self.above(),
        ]
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        ((self.x - other.x).unsigned_abs())
            + ((self.y - other.y).unsigned_abs())
            + ((self.z - other.z).unsigned_abs())
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Block materials
// ---------------------------------------------------------------------------

/// The material of a single voxel. Opaque to the core beyond `is_air()` and
/// equality — reconciliation compares the world's actual state against a
/// block's target state with `==`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    Air,
    Ground,
    Plank,
    Log,
    Stone,
    Glass,
    Thatch,
}

impl BlockState {
    pub fn is_air(self) -> bool {
        self == Self::Air
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::Air
    }
}

// ---------------------------------------------------------------------------
// Plan rotation
// ---------------------------------------------------------------------------

/// Yaw rotation applied to a relative block plan when a structure is placed.
/// Rotations are about the plan's local origin, clockwise when viewed from
/// above (+Y looking down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Rotate a coordinate about the vertical axis through the origin. Pure.
    pub fn apply(self, coord: VoxelCoord) -> VoxelCoord {
        let VoxelCoord { x, y, z } = coord;
        match self {
            Rotation::None => coord,
            Rotation::Cw90 => VoxelCoord::new(-z, y, x),
            Rotation::Cw180 => VoxelCoord::new(-x, y, -z),
            Rotation::Cw270 => VoxelCoord::new(z, y, -x),
        }
    }
}

// ---------------------------------------------------------------------------
// Structure kinds and selection policy
// ---------------------------------------------------------------------------

/// The closed set of structure kinds the sim can construct. Kind-specific
/// tuning (build cadence, explode chance, portrait block) lives in
/// `template::KindProfile`, not in per-kind subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingKind {
    House,
    Watchtower,
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildingKind::House => write!(f, "house"),
            BuildingKind::Watchtower => write!(f, "watchtower"),
        }
    }
}

/// Tie-break among equally valid lowest-Y placement candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// First candidate in plan iteration order. Stable and replayable.
    PlanOrder,
    /// Uniformly random among candidates, drawn from the injected PRNG.
    Random,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::PlanOrder
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Construction-time validation failures. Nothing in a running tick ever
/// returns an error — stalled placement and zero-candidate ticks are silent
/// steady states retried on later ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BuildingError {
    /// Corner/size computation was handed an empty block set.
    #[error("corner computation on an empty block set")]
    EmptyBlockSet,
    /// No template is registered for the requested kind.
    #[error("no template registered for kind `{0}`")]
    UnknownKind(BuildingKind),
    /// A block plan with zero non-air blocks can never make progress and
    /// would divide by zero in `placed_fraction`.
    #[error("block plan for `{0}` contains no non-air blocks")]
    EmptyPlan(BuildingKind),
}

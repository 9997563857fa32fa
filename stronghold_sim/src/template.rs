// Structure templates — relative block plans plus per-kind tuning.
//
// Every `BuildingKind` maps to a `Template`: the relative block plan that
// defines its final shape and a `KindProfile` holding the tuning constants
// that used to live in per-kind subtypes (build cadence, explode chance,
// portrait block, placement tie-break). Named preset constructors produce
// the profiles; plan generator functions produce the shapes with plain
// nested loops.
//
// The registry is a `BTreeMap` keyed by kind. `lookup()` returns
// `Err(UnknownKind)` for unregistered kinds — callers get one consistent
// failure instead of an absent value.
//
// See also: `block.rs` for `PlanBlock` and the placement transform,
// `factory.rs` which consumes the registry when instantiating buildings.
//
// **Critical constraint: determinism.** Plan generators emit blocks in a
// fixed loop order; plan-order placement depends on it.

use crate::block::PlanBlock;
use crate::types::{BlockState, BuildingError, BuildingKind, SelectionPolicy, VoxelCoord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Per-kind tuning
// ---------------------------------------------------------------------------

/// Kind-specific constants supplied to a `Building` at construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KindProfile {
    /// Ticks between single-block mutations (placement while building,
    /// decay once abandoned).
    pub ticks_per_mutation: u32,
    /// Chance that an externally triggered break causes extra block loss.
    /// Stored here, consumed by the break-handling layer, not by the core.
    pub explode_chance: f64,
    /// Representative block for portrait/identity rendering.
    pub portrait_block: BlockState,
    /// Tie-break among equally valid placement candidates.
    pub selection: SelectionPolicy,
}

impl KindProfile {
    /// House: small, sturdy, quick to raise.
    pub fn house() -> Self {
        Self {
            ticks_per_mutation: 6,
            explode_chance: 0.05,
            portrait_block: BlockState::Plank,
            selection: SelectionPolicy::PlanOrder,
        }
    }

    /// Watchtower: taller and more fragile, so breaks chain more readily
    /// and single blocks take longer to set.
    pub fn watchtower() -> Self {
        Self {
            ticks_per_mutation: 8,
            explode_chance: 0.15,
            portrait_block: BlockState::Stone,
            selection: SelectionPolicy::PlanOrder,
        }
    }
}

// ---------------------------------------------------------------------------
// Templates and the registry
// ---------------------------------------------------------------------------

/// A structure kind's complete recipe: relative plan + tuning profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    pub plan: Vec<PlanBlock>,
    pub profile: KindProfile,
}

/// Registry mapping structure kinds to their templates.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TemplateRegistry {
    templates: BTreeMap<BuildingKind, Template>,
}

impl TemplateRegistry {
    /// An empty registry. Hosts that supply their own catalog start here.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in structure kinds.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            BuildingKind::House,
            Template {
                plan: house_plan(),
                profile: KindProfile::house(),
            },
        );
        registry.register(
            BuildingKind::Watchtower,
            Template {
                plan: watchtower_plan(),
                profile: KindProfile::watchtower(),
            },
        );
        registry
    }

    /// Register (or replace) the template for a kind.
    pub fn register(&mut self, kind: BuildingKind, template: Template) {
        self.templates.insert(kind, template);
    }

    /// Look up a kind's template.
    pub fn lookup(&self, kind: BuildingKind) -> Result<&Template, BuildingError> {
        self.templates
            .get(&kind)
            .ok_or(BuildingError::UnknownKind(kind))
    }
}

// ---------------------------------------------------------------------------
// Built-in plans
// ---------------------------------------------------------------------------

/// 5x5 footprint house: plank floor, log-cornered plank walls with a glass
/// window centered on each side, a doorway carved through the south wall
/// with explicit air entries, and a thatch roof.
pub fn house_plan() -> Vec<PlanBlock> {
    const W: i32 = 5; // x extent
    const D: i32 = 5; // z extent
    const WALL_TOP: i32 = 2; // walls occupy y = 1..=2
    let mut plan = Vec::new();

    // Floor layer.
    for z in 0..D {
        for x in 0..W {
            plan.push(PlanBlock::new(VoxelCoord::new(x, 0, z), BlockState::Plank));
        }
    }

    // Wall layers: perimeter only, hollow interior.
    for y in 1..=WALL_TOP {
        for z in 0..D {
            for x in 0..W {
                let on_x_edge = x == 0 || x == W - 1;
                let on_z_edge = z == 0 || z == D - 1;
                if !on_x_edge && !on_z_edge {
                    continue;
                }
                let state = if on_x_edge && on_z_edge {
                    BlockState::Log
                } else if x == W / 2 && z == D - 1 {
                    // Doorway carved through the center of the south wall.
                    BlockState::Air
                } else if y == WALL_TOP && (x == W / 2 || z == D / 2) {
                    BlockState::Glass
                } else {
                    BlockState::Plank
                };
                plan.push(PlanBlock::new(VoxelCoord::new(x, y, z), state));
            }
        }
    }

    // Roof layer.
    for z in 0..D {
        for x in 0..W {
            plan.push(PlanBlock::new(
                VoxelCoord::new(x, WALL_TOP + 1, z),
                BlockState::Thatch,
            ));
        }
    }

    plan
}

/// 3x3 footprint watchtower: a hollow stone shaft topped with a plank
/// platform.
pub fn watchtower_plan() -> Vec<PlanBlock> {
    const W: i32 = 3;
    const D: i32 = 3;
    const SHAFT_TOP: i32 = 4; // shaft occupies y = 0..=4
    let mut plan = Vec::new();

    for y in 0..=SHAFT_TOP {
        for z in 0..D {
            for x in 0..W {
                if x == 0 || x == W - 1 || z == 0 || z == D - 1 {
                    plan.push(PlanBlock::new(VoxelCoord::new(x, y, z), BlockState::Stone));
                }
            }
        }
    }

    // Lookout platform.
    for z in 0..D {
        for x in 0..W {
            plan.push(PlanBlock::new(
                VoxelCoord::new(x, SHAFT_TOP + 1, z),
                BlockState::Plank,
            ));
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_all_kinds() {
        let registry = TemplateRegistry::with_defaults();
        assert!(registry.lookup(BuildingKind::House).is_ok());
        assert!(registry.lookup(BuildingKind::Watchtower).is_ok());
    }

    #[test]
    fn empty_registry_reports_unknown_kind() {
        let registry = TemplateRegistry::new();
        assert_eq!(
            registry.lookup(BuildingKind::House).unwrap_err(),
            BuildingError::UnknownKind(BuildingKind::House)
        );
    }

    #[test]
    fn register_replaces_existing_template() {
        let mut registry = TemplateRegistry::with_defaults();
        let tiny = Template {
            plan: vec![PlanBlock::new(VoxelCoord::new(0, 0, 0), BlockState::Stone)],
            profile: KindProfile::house(),
        };
        registry.register(BuildingKind::House, tiny);
        assert_eq!(registry.lookup(BuildingKind::House).unwrap().plan.len(), 1);
    }

    #[test]
    fn house_plan_shape() {
        let plan = house_plan();
        // Doorway is carved with air entries: two, at y=1 and y=2.
        let air = plan.iter().filter(|b| b.state.is_air()).count();
        assert_eq!(air, 2);
        // Non-air: 25 floor + 25 roof + 2 wall layers of (16 perimeter - 1 door).
        let non_air = plan.iter().filter(|b| !b.state.is_air()).count();
        assert_eq!(non_air, 25 + 25 + 2 * 15);
        // Corners are logs on every wall layer.
        assert!(plan.iter().any(|b| b.offset == VoxelCoord::new(0, 1, 0)
            && b.state == BlockState::Log));
        assert!(plan.iter().any(|b| b.offset == VoxelCoord::new(4, 2, 4)
            && b.state == BlockState::Log));
    }

    #[test]
    fn house_plan_doorway_is_at_ground_level() {
        let plan = house_plan();
        let doors: Vec<_> = plan.iter().filter(|b| b.state.is_air()).collect();
        assert!(doors.iter().any(|b| b.offset == VoxelCoord::new(2, 1, 4)));
        assert!(doors.iter().any(|b| b.offset == VoxelCoord::new(2, 2, 4)));
    }

    #[test]
    fn watchtower_plan_shape() {
        let plan = watchtower_plan();
        // 5 shaft layers of 8 perimeter stones + 9 platform planks.
        assert_eq!(plan.len(), 5 * 8 + 9);
        assert!(plan.iter().all(|b| !b.state.is_air()));
        // Shaft center stays hollow.
        assert!(!plan.iter().any(|b| b.offset == VoxelCoord::new(1, 2, 1)));
    }

    #[test]
    fn profiles_differ_per_kind() {
        let house = KindProfile::house();
        let tower = KindProfile::watchtower();
        assert!(tower.explode_chance > house.explode_chance);
        assert!(tower.ticks_per_mutation > house.ticks_per_mutation);
    }

    #[test]
    fn registry_serialization_roundtrip() {
        let registry = TemplateRegistry::with_defaults();
        let json = serde_json::to_string(&registry).unwrap();
        let restored: TemplateRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(
            restored.lookup(BuildingKind::House).unwrap().plan.len(),
            registry.lookup(BuildingKind::House).unwrap().plan.len()
        );
    }
}

// Building factory — kind identifier in, validated building out.
//
// Wraps a `TemplateRegistry`: looks up the kind's relative plan, runs the
// placement transform against the requested anchor and rotation, and hands
// the absolute blocks plus the kind's tuning profile to the `Building`
// constructor. All validation failures surface here, before a building
// exists — an unknown kind and an all-air plan are the only ways creation
// can fail.

use crate::block;
use crate::building::Building;
use crate::template::TemplateRegistry;
use crate::types::{BuildingError, BuildingKind, Rotation, VoxelCoord};

/// Constructs `Building` instances from registered templates.
#[derive(Clone, Debug, Default)]
pub struct BuildingFactory {
    registry: TemplateRegistry,
}

impl BuildingFactory {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    /// A factory carrying the built-in structure catalog.
    pub fn with_default_templates() -> Self {
        Self::new(TemplateRegistry::with_defaults())
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.registry
    }

    /// Instantiate a building of `kind` anchored at `origin`.
    ///
    /// The plan is rotated about the anchor and planted one voxel above it.
    /// Fails with `UnknownKind` for unregistered kinds and `EmptyPlan` for
    /// templates with zero non-air blocks; no building is created in either
    /// case.
    pub fn create(
        &self,
        kind: BuildingKind,
        origin: VoxelCoord,
        rotation: Rotation,
        owner: impl Into<String>,
    ) -> Result<Building, BuildingError> {
        let template = self.registry.lookup(kind)?;
        let blocks = block::to_absolute(&template.plan, origin, rotation);
        Building::new(kind, owner, origin, rotation, blocks, &template.profile)
    }
}

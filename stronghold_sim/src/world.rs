// The world grid collaborator.
//
// Buildings do not own the grid they occupy — they reconcile against it
// every tick and write single-block mutations into it. `World` is the
// interface the core consumes: a read primitive, a write primitive, a
// six-neighbor occupancy query, and a client-side flag distinguishing
// observer replicas (which reconcile but never mutate).
//
// `VoxelWorld` is the crate's dense grid implementation, stored as a flat
// `Vec<BlockState>` indexed by `x + z * size_x + y * size_x * size_z` for
// O(1) access. Out-of-bounds reads return `Air`; out-of-bounds writes are
// no-ops. Hosts embedding the core in an existing voxel engine implement
// `World` over their own grid instead.
//
// **Critical constraint: determinism.** All grid mutation happens through
// serialized tick logic. No concurrent writers during a building's tick.

use crate::types::{BlockState, VoxelCoord};

/// External voxel grid contract consumed by the construction core.
pub trait World {
    /// Read the block at a position.
    fn get(&self, coord: VoxelCoord) -> BlockState;

    /// Write the block at a position.
    fn set(&mut self, coord: VoxelCoord, state: BlockState);

    /// `true` on observer-side replicas, which must skip all mutation and
    /// only reconcile placed-status against the mirrored grid.
    fn is_client_side(&self) -> bool {
        false
    }

    /// Returns `true` if any of the 6 face-adjacent cells (±x, ±y, ±z) is
    /// non-air — the connectivity test for block placement.
    fn has_occupied_face_neighbor(&self, coord: VoxelCoord) -> bool {
        coord.face_neighbors().iter().any(|&n| !self.get(n).is_air())
    }
}

/// Dense 3D voxel grid.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    blocks: Vec<BlockState>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
    client_side: bool,
}

impl VoxelWorld {
    /// Create a new world filled with `Air`.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            blocks: vec![BlockState::Air; total],
            size_x,
            size_y,
            size_z,
            client_side: false,
        }
    }

    /// Create an observer-side replica of the same dimensions. Buildings
    /// ticked against it reconcile only — no blocks are placed or removed.
    pub fn new_client_side(size_x: u32, size_y: u32, size_z: u32) -> Self {
        Self {
            client_side: true,
            ..Self::new(size_x, size_y, size_z)
        }
    }

    /// Fill the full horizontal extent at `y` with the given material.
    /// Handy for laying the terrain a structure anchors onto.
    pub fn fill_layer(&mut self, y: i32, state: BlockState) {
        for z in 0..self.size_z as i32 {
            for x in 0..self.size_x as i32 {
                self.set_block(VoxelCoord::new(x, y, z), state);
            }
        }
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            let x = coord.x as usize;
            let y = coord.y as usize;
            let z = coord.z as usize;
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x + z * sx + y * sx * sz)
        } else {
            None
        }
    }

    /// Read a block. Returns `Air` for out-of-bounds coordinates.
    pub fn get_block(&self, coord: VoxelCoord) -> BlockState {
        self.index(coord)
            .map(|i| self.blocks[i])
            .unwrap_or(BlockState::Air)
    }

    /// Write a block. No-op for out-of-bounds coordinates.
    pub fn set_block(&mut self, coord: VoxelCoord, state: BlockState) {
        if let Some(i) = self.index(coord) {
            self.blocks[i] = state;
        }
    }
}

impl World for VoxelWorld {
    fn get(&self, coord: VoxelCoord) -> BlockState {
        self.get_block(coord)
    }

    fn set(&mut self, coord: VoxelCoord, state: BlockState) {
        self.set_block(coord, state);
    }

    fn is_client_side(&self) -> bool {
        self.client_side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_world_is_all_air() {
        let world = VoxelWorld::new(4, 4, 4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert_eq!(world.get(VoxelCoord::new(x, y, z)), BlockState::Air);
                }
            }
        }
    }

    #[test]
    fn set_and_get() {
        let mut world = VoxelWorld::new(8, 8, 8);
        let coord = VoxelCoord::new(3, 5, 2);
        world.set(coord, BlockState::Plank);
        assert_eq!(world.get(coord), BlockState::Plank);
        // Neighbors are still air.
        assert_eq!(world.get(VoxelCoord::new(3, 5, 3)), BlockState::Air);
    }

    #[test]
    fn out_of_bounds_read_returns_air() {
        let world = VoxelWorld::new(4, 4, 4);
        assert_eq!(world.get(VoxelCoord::new(-1, 0, 0)), BlockState::Air);
        assert_eq!(world.get(VoxelCoord::new(0, -1, 0)), BlockState::Air);
        assert_eq!(world.get(VoxelCoord::new(4, 0, 0)), BlockState::Air);
        assert_eq!(world.get(VoxelCoord::new(100, 100, 100)), BlockState::Air);
    }

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut world = VoxelWorld::new(4, 4, 4);
        // Should not panic.
        world.set(VoxelCoord::new(-1, 0, 0), BlockState::Stone);
        world.set(VoxelCoord::new(100, 0, 0), BlockState::Stone);
    }

    #[test]
    fn indexing_is_correct() {
        // Verify the specific indexing scheme: x + z * size_x + y * size_x * size_z
        let mut world = VoxelWorld::new(10, 8, 6);
        let coord = VoxelCoord::new(5, 3, 4);
        world.set(coord, BlockState::Log);
        assert_eq!(world.get(coord), BlockState::Log);
        // Adjacent coords should still be air.
        assert_eq!(world.get(VoxelCoord::new(4, 3, 4)), BlockState::Air);
        assert_eq!(world.get(VoxelCoord::new(5, 2, 4)), BlockState::Air);
        assert_eq!(world.get(VoxelCoord::new(5, 3, 3)), BlockState::Air);
    }

    #[test]
    fn occupied_face_neighbor_true_when_adjacent() {
        let mut world = VoxelWorld::new(8, 8, 8);
        world.set(VoxelCoord::new(4, 3, 4), BlockState::Stone);
        // Air cell directly above the stone.
        assert!(world.has_occupied_face_neighbor(VoxelCoord::new(4, 4, 4)));
        // Air cell to the +x side.
        assert!(world.has_occupied_face_neighbor(VoxelCoord::new(5, 3, 4)));
        // Air cell to the -z side.
        assert!(world.has_occupied_face_neighbor(VoxelCoord::new(4, 3, 3)));
    }

    #[test]
    fn occupied_face_neighbor_false_when_isolated() {
        let world = VoxelWorld::new(8, 8, 8);
        // All-air world — no neighbor is occupied.
        assert!(!world.has_occupied_face_neighbor(VoxelCoord::new(4, 4, 4)));
    }

    #[test]
    fn occupied_face_neighbor_at_boundary() {
        let mut world = VoxelWorld::new(8, 8, 8);
        world.set(VoxelCoord::new(0, 0, 0), BlockState::Ground);
        // Out-of-bounds neighbors read as Air, so boundary coords need no
        // special casing.
        assert!(world.has_occupied_face_neighbor(VoxelCoord::new(1, 0, 0)));
        assert!(world.has_occupied_face_neighbor(VoxelCoord::new(0, 1, 0)));
        assert!(world.has_occupied_face_neighbor(VoxelCoord::new(-1, 0, 0)));
    }

    #[test]
    fn fill_layer_covers_extent() {
        let mut world = VoxelWorld::new(4, 4, 4);
        world.fill_layer(0, BlockState::Ground);
        assert_eq!(world.get(VoxelCoord::new(0, 0, 0)), BlockState::Ground);
        assert_eq!(world.get(VoxelCoord::new(3, 0, 3)), BlockState::Ground);
        assert_eq!(world.get(VoxelCoord::new(0, 1, 0)), BlockState::Air);
    }

    #[test]
    fn client_side_flag() {
        assert!(!VoxelWorld::new(2, 2, 2).is_client_side());
        assert!(VoxelWorld::new_client_side(2, 2, 2).is_client_side());
    }
}

//! Voxel field buffer and chunk generation.
#![forbid(unsafe_code)]

use loam_blocks::{BlockData, BlockType};
use loam_world::{ChunkCoord, GenCtx, WorldGenParams};

/// Extra cells on each horizontal side, sampled but never meshed.
pub const HORIZONTAL_MARGIN: usize = 1;

/// Generated blocks for one chunk plus a one-cell horizontal apron.
///
/// Local cell `(x, y, z)` is world block `origin + (x, y, z)`; the meshed
/// interior is `x, z in 1..=chunk_size`.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelField {
    pub coord: ChunkCoord,
    pub chunk_size: usize,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub cells: Vec<BlockData>,
}

impl VoxelField {
    pub fn new_empty(coord: ChunkCoord, chunk_size: usize, chunk_height: usize) -> Self {
        let sx = chunk_size + 2 * HORIZONTAL_MARGIN;
        let sz = sx;
        Self {
            coord,
            chunk_size,
            sx,
            sy: chunk_height,
            sz,
            cells: vec![BlockData::NONE; sx * chunk_height * sz],
        }
    }

    /// Wraps existing cells, padding or truncating to the field's volume.
    pub fn from_cells_local(
        coord: ChunkCoord,
        chunk_size: usize,
        chunk_height: usize,
        cells: Vec<BlockData>,
    ) -> Self {
        let mut field = Self::new_empty(coord, chunk_size, chunk_height);
        let mut c = cells;
        c.resize(field.cells.len(), BlockData::NONE);
        field.cells = c;
        field
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockData {
        self.cells[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, block: BlockData) {
        let i = self.idx(x, y, z);
        self.cells[i] = block;
    }

    #[inline]
    pub fn contains_local(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.sx
            && (y as usize) < self.sy
            && (z as usize) < self.sz
    }

    /// Bounds-checked lookup; `None` outside the field.
    #[inline]
    pub fn get_checked(&self, x: i32, y: i32, z: i32) -> Option<BlockData> {
        if !self.contains_local(x, y, z) {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }

    /// Range of interior indices on the x and z axes.
    #[inline]
    pub fn interior(&self) -> std::ops::RangeInclusive<usize> {
        HORIZONTAL_MARGIN..=self.chunk_size
    }

    /// World block the local origin cell maps to.
    #[inline]
    pub fn world_origin(&self) -> (i32, i32, i32) {
        self.coord.origin(self.chunk_size, self.sy)
    }

    pub fn occupancy(&self) -> ChunkOccupancy {
        for y in 0..self.sy {
            for z in self.interior() {
                for x in self.interior() {
                    if self.get_local(x, y, z).is_solid() {
                        return ChunkOccupancy::Populated;
                    }
                }
            }
        }
        ChunkOccupancy::Empty
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub field: VoxelField,
    pub occupancy: ChunkOccupancy,
}

/// Generates the field for `coord`. Pure: equal inputs give equal fields.
///
/// Solidity is decided for every cell first; surface kinds and modifiers are
/// assigned in a second sweep because they read the settled kind of the cell
/// above.
pub fn generate_chunk_field(params: &WorldGenParams, coord: ChunkCoord) -> ChunkGenerateResult {
    let mut field = VoxelField::new_empty(coord, params.chunk_size, params.chunk_height);
    let (bx, by, bz) = field.world_origin();
    let ctx = GenCtx::new(params);
    let water = params.water_height;

    for x in 0..field.sx {
        let wx = (bx + x as i32) as f32;
        for z in 0..field.sz {
            let wz = (bz + z as i32) as f32;
            let height = ctx.column_height(wx, wz);
            for y in 0..field.sy {
                let wy = by + y as i32;
                let wyf = wy as f32;
                let solid = (wyf < height || ctx.structure_at(wx, wyf, wz))
                    && ctx.kept_at(wx, wyf, wz);
                let kind = if solid {
                    BlockType::Dirt
                } else if wy < water {
                    BlockType::Water
                } else {
                    BlockType::None
                };
                field.set_local(x, y, z, BlockData::new(kind));
            }
        }
    }

    for x in 0..field.sx {
        let wx = (bx + x as i32) as f32;
        for y in 0..field.sy {
            let wy = by + y as i32;
            for z in 0..field.sz {
                let mut block = field.get_local(x, y, z);
                if matches!(block.kind, BlockType::None | BlockType::Water) {
                    continue;
                }
                if wy < water {
                    block.kind = BlockType::Sand;
                }
                let exposed =
                    y + 1 == field.sy || field.get_local(x, y + 1, z).kind == BlockType::None;
                if exposed {
                    let wz = (bz + z as i32) as f32;
                    if wy as f32 > ctx.snow_line(wx, wz) {
                        block.modifier = Some(BlockType::Snow);
                    } else if block.kind == BlockType::Dirt {
                        block.modifier = Some(BlockType::Grass);
                    }
                }
                field.set_local(x, y, z, block);
            }
        }
    }

    let occupancy = field.occupancy();
    ChunkGenerateResult { field, occupancy }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_dims_include_margin() {
        let f = VoxelField::new_empty(ChunkCoord::new(0, 0, 0), 16, 64);
        assert_eq!((f.sx, f.sy, f.sz), (18, 64, 18));
        assert_eq!(f.cells.len(), 18 * 64 * 18);
        assert_eq!(f.interior(), 1..=16);
    }

    #[test]
    fn checked_lookup_rejects_outside() {
        let mut f = VoxelField::new_empty(ChunkCoord::new(0, 0, 0), 2, 3);
        f.set_local(3, 2, 3, BlockData::new(BlockType::Sand));
        assert_eq!(f.get_checked(3, 2, 3).map(|b| b.kind), Some(BlockType::Sand));
        assert!(f.get_checked(-1, 0, 0).is_none());
        assert!(f.get_checked(4, 0, 0).is_none());
        assert!(f.get_checked(0, 3, 0).is_none());
    }

    #[test]
    fn occupancy_ignores_margin() {
        let mut f = VoxelField::new_empty(ChunkCoord::new(0, 0, 0), 4, 4);
        f.set_local(0, 1, 0, BlockData::new(BlockType::Dirt));
        assert!(f.occupancy().is_empty());
        f.set_local(1, 1, 4, BlockData::new(BlockType::Dirt));
        assert!(f.occupancy().has_blocks());
    }
}

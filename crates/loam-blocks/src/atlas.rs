//! Texture atlas layout: one horizontal band per slice, stacked vertically.

use crate::types::{BlockData, BlockType, FaceRole};

/// Number of bands in the atlas texture. Fixed by the asset, not by the
/// number of slices in use.
pub const ATLAS_ROWS: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TextureSlice {
    Dirt = 0,
    GrassTop = 1,
    GrassSide = 2,
    Sand = 3,
    Water = 4,
    SnowTop = 5,
    SnowSide = 6,
}

impl TextureSlice {
    #[inline]
    pub fn row(self) -> u32 {
        self as u32
    }

    /// Slice shown on `role` faces of `block`. A modifier owns the top face
    /// and dresses the sides; the bottom always shows the base kind.
    pub fn for_face(block: BlockData, role: FaceRole) -> TextureSlice {
        match (block.modifier, role) {
            (Some(BlockType::Grass), FaceRole::Top) => TextureSlice::GrassTop,
            (Some(BlockType::Grass), FaceRole::Side) => TextureSlice::GrassSide,
            (Some(BlockType::Snow), FaceRole::Top) => TextureSlice::SnowTop,
            (Some(BlockType::Snow), FaceRole::Side) => TextureSlice::SnowSide,
            _ => TextureSlice::for_kind(block.kind),
        }
    }

    #[inline]
    pub fn for_kind(kind: BlockType) -> TextureSlice {
        match kind {
            BlockType::Sand => TextureSlice::Sand,
            BlockType::Water => TextureSlice::Water,
            BlockType::Grass => TextureSlice::GrassTop,
            BlockType::Snow => TextureSlice::SnowTop,
            BlockType::None | BlockType::Dirt => TextureSlice::Dirt,
        }
    }

    /// `(v0, v1)` bounds of this slice's band in normalized atlas space.
    #[inline]
    pub fn v_band(self) -> (f32, f32) {
        let rows = ATLAS_ROWS as f32;
        let r = self.row() as f32;
        (r / rows, (r + 1.0) / rows)
    }
}

/// Kind of a voxel. The same enum names surface modifiers (`Grass`, `Snow`),
/// which only ever appear in [`BlockData::modifier`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    None = 0,
    Dirt = 1,
    Sand = 2,
    Water = 3,
    Grass = 4,
    Snow = 5,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::None,
        BlockType::Dirt,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Grass,
        BlockType::Snow,
    ];

    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::None
    }

    /// True for kinds that are layered on top of a base kind rather than
    /// occupying a cell on their own.
    #[inline]
    pub fn is_modifier(self) -> bool {
        matches!(self, BlockType::Grass | BlockType::Snow)
    }

    /// Flat per-kind tint, carried per vertex for shaders that color by type.
    #[inline]
    pub fn color(self) -> [u8; 4] {
        match self {
            BlockType::None => [0, 0, 0, 0],
            BlockType::Dirt => [134, 96, 67, 255],
            BlockType::Sand => [219, 207, 163, 255],
            BlockType::Water => [64, 112, 196, 200],
            BlockType::Grass => [96, 160, 64, 255],
            BlockType::Snow => [240, 244, 250, 255],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockType::None => "none",
            BlockType::Dirt => "dirt",
            BlockType::Sand => "sand",
            BlockType::Water => "water",
            BlockType::Grass => "grass",
            BlockType::Snow => "snow",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockData {
    pub kind: BlockType,
    pub modifier: Option<BlockType>,
}

impl BlockData {
    pub const NONE: BlockData = BlockData {
        kind: BlockType::None,
        modifier: None,
    };

    #[inline]
    pub const fn new(kind: BlockType) -> Self {
        Self {
            kind,
            modifier: None,
        }
    }

    #[inline]
    pub const fn with_modifier(self, modifier: BlockType) -> Self {
        Self {
            kind: self.kind,
            modifier: Some(modifier),
        }
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.kind.is_solid()
    }
}

impl From<BlockType> for BlockData {
    fn from(kind: BlockType) -> Self {
        BlockData::new(kind)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_none_is_open() {
        for kind in BlockType::ALL {
            assert_eq!(kind.is_solid(), kind != BlockType::None, "{}", kind.name());
        }
        assert!(!BlockData::NONE.is_solid());
        assert!(BlockData::new(BlockType::Water).is_solid());
    }

    #[test]
    fn modifier_keeps_base_kind() {
        let b = BlockData::new(BlockType::Dirt).with_modifier(BlockType::Grass);
        assert_eq!(b.kind, BlockType::Dirt);
        assert_eq!(b.modifier, Some(BlockType::Grass));
        assert!(BlockType::Grass.is_modifier());
        assert!(!BlockType::Sand.is_modifier());
    }
}

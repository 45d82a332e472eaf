//! Block kinds, surface modifiers, atlas slices and per-kind tint colors.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod types;

pub use atlas::{ATLAS_ROWS, TextureSlice};
pub use types::{BlockData, BlockType, FaceRole};

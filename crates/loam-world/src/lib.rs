//! Chunk addressing, worldgen parameters, and the noise fields terrain is cut from.
#![forbid(unsafe_code)]

mod chunk_coord;
mod gen_ctx;
pub mod worldgen;

pub use chunk_coord::ChunkCoord;
pub use gen_ctx::GenCtx;
pub use worldgen::{WorldGenConfig, WorldGenParams, load_params_from_path};

//! Player-centred voxel chunk streaming.
#![forbid(unsafe_code)]

pub mod chunk_pool;
pub mod config;
pub mod streaming;

pub use chunk_pool::{Chunk, ChunkPool, SlotId};
pub use config::{AppConfig, ConfigError, StreamConfig};
pub use streaming::{ChunkManager, ChunkSink, ManagerStats, TickReport};

pub use loam_geom::{Aabb, Vec3};
pub use loam_mesh_cpu::MeshData;
pub use loam_runtime::{BuildFn, WorkerError};
pub use loam_world::{ChunkCoord, WorldGenConfig, WorldGenParams};

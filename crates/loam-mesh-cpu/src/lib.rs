//! CPU meshing: one quad per exposed voxel face.
#![forbid(unsafe_code)]

mod build;
mod face;
mod mesh_data;

pub use build::{build_chunk_mesh, build_chunk_mesh_into};
pub use face::Face;
pub use mesh_data::MeshData;

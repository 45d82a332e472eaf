use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use loam_blocks::{BlockData, BlockType};
use loam_chunk::{VoxelField, generate_chunk_field};
use loam_mesh_cpu::{MeshData, build_chunk_mesh, build_chunk_mesh_into};
use loam_world::{ChunkCoord, WorldGenParams};

fn bench_generate_and_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_and_mesh");
    let params = WorldGenParams::default();
    group.bench_function("default_16x64x16", |b| {
        b.iter(|| {
            let r = generate_chunk_field(&params, ChunkCoord::new(3, 0, -5));
            black_box(build_chunk_mesh(&r.field));
        })
    });
    group.finish();
}

fn bench_mesh_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_only");
    group.measurement_time(Duration::from_secs(8));
    let params = WorldGenParams::default();
    let terrain = generate_chunk_field(&params, ChunkCoord::new(0, 0, 0)).field;
    let mut out = MeshData::default();
    group.bench_function("terrain_reuse_buffers", |b| {
        b.iter(|| {
            build_chunk_mesh_into(&terrain, &mut out);
            black_box(out.quad_count());
        })
    });

    let mut checker = VoxelField::new_empty(ChunkCoord::new(0, 0, 0), 16, 64);
    for y in 0..checker.sy {
        for z in checker.interior() {
            for x in checker.interior() {
                if (x + y + z) % 2 == 0 {
                    checker.set_local(x, y, z, BlockData::new(BlockType::Dirt));
                }
            }
        }
    }
    group.bench_function("checkerboard_worst_case", |b| {
        b.iter(|| {
            build_chunk_mesh_into(&checker, &mut out);
            black_box(out.vertex_count());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_generate_and_mesh, bench_mesh_only);
criterion_main!(benches);

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use loam_chunk::generate_chunk_field;
use loam_mesh_cpu::{MeshData, build_chunk_mesh};
use loam_world::{ChunkCoord, WorldGenParams};

use crate::queue::{ResultQueue, WorkQueue};

/// Message on the order queue. `Stop` ends exactly one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Build(ChunkCoord),
    Stop,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("chunk build panicked: {message}")]
    Panicked { message: String },
}

#[derive(Debug)]
pub struct ChunkResult {
    pub coord: ChunkCoord,
    pub outcome: Result<MeshData, WorkerError>,
}

/// Work a worker runs per order.
pub type BuildFn = Arc<dyn Fn(ChunkCoord) -> MeshData + Send + Sync>;

/// Generate the field for a coordinate and mesh it. Empty fields skip meshing.
pub fn build_job(params: WorldGenParams) -> BuildFn {
    Arc::new(move |coord| {
        let r = generate_chunk_field(&params, coord);
        if r.occupancy.is_empty() {
            log::trace!(target: "worldgen", "{coord}: empty field, mesh skipped");
            return MeshData::default();
        }
        build_chunk_mesh(&r.field)
    })
}

#[derive(Default)]
struct Counters {
    in_flight: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub workers: usize,
    pub queued: usize,
    pub in_flight: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Fixed set of OS threads pulling [`Order`]s and pushing [`ChunkResult`]s.
pub struct WorkerPool {
    orders: WorkQueue<Order>,
    handles: Vec<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl WorkerPool {
    /// Starts `threads` workers that generate and mesh chunks with `params`.
    pub fn spawn(
        threads: usize,
        params: &WorldGenParams,
        orders: WorkQueue<Order>,
        results: ResultQueue<ChunkResult>,
    ) -> io::Result<Self> {
        Self::spawn_with(threads, orders, results, build_job(params.clone()))
    }

    pub fn spawn_with(
        threads: usize,
        orders: WorkQueue<Order>,
        results: ResultQueue<ChunkResult>,
        job: BuildFn,
    ) -> io::Result<Self> {
        let counters = Arc::new(Counters::default());
        let mut pool = WorkerPool {
            orders: orders.clone(),
            handles: Vec::with_capacity(threads),
            counters: Arc::clone(&counters),
        };
        for i in 0..threads {
            let orders = orders.clone();
            let results = results.clone();
            let job = Arc::clone(&job);
            let counters = Arc::clone(&counters);
            let spawned = thread::Builder::new()
                .name(format!("loam-gen-{i}"))
                .spawn(move || worker_loop(i, orders, results, job, counters));
            match spawned {
                Ok(h) => pool.handles.push(h),
                Err(e) => {
                    log::warn!(target: "runtime", "failed to spawn worker {i}: {e}");
                    pool.shutdown();
                    return Err(e);
                }
            }
        }
        log::info!(target: "runtime", "worker pool started with {threads} threads");
        Ok(pool)
    }

    /// Queues a build order for `coord`.
    pub fn submit(&self, coord: ChunkCoord) {
        self.orders.enqueue(Order::Build(coord));
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.handles.len(),
            queued: self.orders.len(),
            in_flight: self.counters.in_flight.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Sends one `Stop` per worker and joins them all. Orders queued ahead of
    /// the stops are still built. Returns the number of workers joined; a
    /// second call joins none.
    pub fn shutdown(&mut self) -> usize {
        if self.handles.is_empty() {
            return 0;
        }
        for _ in 0..self.handles.len() {
            self.orders.enqueue(Order::Stop);
        }
        let mut joined = 0;
        for h in self.handles.drain(..) {
            let name = h.thread().name().unwrap_or("worker").to_string();
            match h.join() {
                Ok(()) => joined += 1,
                Err(_) => log::warn!(target: "runtime", "{name} exited abnormally"),
            }
        }
        log::info!(target: "runtime", "worker pool stopped ({joined} joined)");
        joined
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    id: usize,
    orders: WorkQueue<Order>,
    results: ResultQueue<ChunkResult>,
    job: BuildFn,
    counters: Arc<Counters>,
) {
    log::debug!(target: "runtime", "worker {id} up");
    loop {
        let coord = match orders.dequeue() {
            Order::Stop => break,
            Order::Build(coord) => coord,
        };
        counters.in_flight.fetch_add(1, Ordering::Relaxed);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(coord))).map_err(|payload| {
            WorkerError::Panicked {
                message: panic_message(payload.as_ref()),
            }
        });
        counters.in_flight.fetch_sub(1, Ordering::Relaxed);
        match &outcome {
            Ok(mesh) => {
                counters.completed.fetch_add(1, Ordering::Relaxed);
                log::trace!(
                    target: "runtime",
                    "worker {id} built {coord}: {} quads",
                    mesh.quad_count()
                );
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                log::warn!(target: "runtime", "worker {id} failed on {coord}: {e}");
            }
        }
        results.enqueue(ChunkResult { coord, outcome });
    }
    log::debug!(target: "runtime", "worker {id} stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

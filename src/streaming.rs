//! Player-centred chunk grid: orders missing chunks, places finished ones
//! under a per-tick budget and recycles chunks that fall off the grid.

use std::io;

use hashbrown::HashSet;
use loam_geom::Vec3;
use loam_runtime::{
    BuildFn, ChunkResult, Order, PoolStats, ResultQueue, WorkQueue, WorkerPool, build_job,
};
use loam_world::{ChunkCoord, WorldGenParams};

use crate::chunk_pool::{Chunk, ChunkPool, SlotId};
use crate::config::StreamConfig;

/// Renderer/physics adapter notified as chunks come and go.
pub trait ChunkSink {
    fn chunk_placed(&mut self, _slot: SlotId, _chunk: &Chunk) {}
    fn chunk_recycled(&mut self, _slot: SlotId, _chunk: &Chunk) {}
}

impl ChunkSink for () {}

/// What one [`ChunkManager::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub evicted: usize,
    pub ordered: usize,
    pub placed: usize,
    pub failed: usize,
    /// Orders still unresolved after the tick.
    pub pending: usize,
    /// Finished results left for later ticks.
    pub backlog: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManagerStats {
    pub active: usize,
    pub inactive: usize,
    pub pending: usize,
    pub queued_orders: usize,
    pub backlog: usize,
    pub pool: PoolStats,
}

pub struct ChunkManager {
    config: StreamConfig,
    params: WorldGenParams,
    custom_job: Option<BuildFn>,
    orders: WorkQueue<Order>,
    results: ResultQueue<ChunkResult>,
    workers: Option<WorkerPool>,
    chunks: ChunkPool,
    grid: Vec<Option<SlotId>>,
    pending: HashSet<ChunkCoord>,
    center: ChunkCoord,
}

impl ChunkManager {
    /// Manager with no workers yet; see [`ChunkManager::start`].
    pub fn new(config: StreamConfig, params: WorldGenParams) -> Self {
        let side = config.grid_side();
        Self {
            chunks: ChunkPool::with_capacity(side * side),
            grid: vec![None; side * side],
            config,
            params,
            custom_job: None,
            orders: WorkQueue::new(),
            results: ResultQueue::new(),
            workers: None,
            pending: HashSet::new(),
            center: ChunkCoord::default(),
        }
    }

    /// Like [`ChunkManager::new`], but workers run `job` instead of terrain
    /// generation.
    pub fn with_build_fn(config: StreamConfig, params: WorldGenParams, job: BuildFn) -> Self {
        let mut m = Self::new(config, params);
        m.custom_job = Some(job);
        m
    }

    /// Spawns the workers and orders the initial grid around `player`.
    /// Chunks evicted by the recentre are reported to `sink`.
    pub fn start<S: ChunkSink + ?Sized>(&mut self, player: Vec3, sink: &mut S) -> io::Result<()> {
        if self.config.worker_threads == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "stream.worker_threads must be at least 1",
            ));
        }
        if self.workers.is_none() {
            let job = self
                .custom_job
                .clone()
                .unwrap_or_else(|| build_job(self.params.clone()));
            let pool = WorkerPool::spawn_with(
                self.config.worker_threads,
                self.orders.clone(),
                self.results.clone(),
                job,
            )?;
            self.workers = Some(pool);
        }
        let ordered = self.init(player, sink);
        log::info!(
            target: "stream",
            "streaming started: {}x{} grid around {}, {} workers, {} ordered",
            self.grid_side(),
            self.grid_side(),
            self.center,
            self.config.worker_threads,
            ordered
        );
        Ok(())
    }

    /// Centres the grid on `player` and orders every empty cell. Returns the
    /// number of new orders.
    pub fn init<S: ChunkSink + ?Sized>(&mut self, player: Vec3, sink: &mut S) -> usize {
        let side = self.grid_side();
        self.chunks.reserve(side * side);
        self.recenter(player, sink);
        self.order_missing()
    }

    /// Runs one streaming step: rebuild the grid, evict what left it, order
    /// what is missing, then place at most `max_launches_per_tick` results.
    pub fn tick<S: ChunkSink + ?Sized>(&mut self, player: Vec3, sink: &mut S) -> TickReport {
        let mut report = TickReport {
            evicted: self.recenter(player, sink),
            ordered: self.order_missing(),
            ..TickReport::default()
        };
        let (placed, failed) = self.drain_results(sink);
        report.placed = placed;
        report.failed = failed;
        report.pending = self.pending.len();
        report.backlog = self.results.count();
        if report.evicted > 0 || report.ordered > 0 {
            log::debug!(
                target: "stream",
                "center {}: evicted {}, ordered {}",
                self.center,
                report.evicted,
                report.ordered
            );
        }
        log::trace!(target: "stream", "tick {:?}", report);
        report
    }

    /// Waits for every outstanding order, discards the results and recycles
    /// every active chunk.
    pub fn clear<S: ChunkSink + ?Sized>(&mut self, sink: &mut S) {
        if self.workers.as_ref().is_none_or(|p| p.worker_count() == 0) {
            // Nobody will serve queued orders; take them back.
            while let Some(order) = self.orders.try_dequeue() {
                if let Order::Build(coord) = order {
                    self.pending.remove(&coord);
                }
            }
        }
        let waited = self.pending.len();
        while !self.pending.is_empty() {
            let r = self.results.wait_dequeue();
            self.pending.remove(&r.coord);
        }
        while self.results.dequeue().is_some() {}

        let slots: Vec<SlotId> = self.chunks.active().to_vec();
        for slot in &slots {
            self.recycle(*slot, sink);
        }
        self.grid.fill(None);
        log::info!(
            target: "stream",
            "cleared: drained {} pending, recycled {} chunks",
            waited,
            slots.len()
        );
    }

    /// Applies new settings: clears, restarts the workers with the new
    /// thread count and worldgen parameters, and re-orders around `player`.
    pub fn reconfigure<S: ChunkSink + ?Sized>(
        &mut self,
        config: StreamConfig,
        params: WorldGenParams,
        player: Vec3,
        sink: &mut S,
    ) -> io::Result<()> {
        self.clear(sink);
        self.shutdown();
        log::info!(target: "stream", "reconfiguring: {:?}", config);
        let side = config.grid_side();
        self.config = config;
        self.params = params;
        self.grid = vec![None; side * side];
        self.start(player, sink)
    }

    /// Stops and joins the workers. Returns how many were joined; later
    /// calls return 0.
    pub fn shutdown(&mut self) -> usize {
        match self.workers.take() {
            Some(mut pool) => pool.shutdown(),
            None => 0,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.workers.is_some()
    }

    #[inline]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    /// Chunk the player currently stands in.
    #[inline]
    pub fn center(&self) -> ChunkCoord {
        self.center
    }

    #[inline]
    pub fn grid_side(&self) -> usize {
        self.config.grid_side()
    }

    pub fn grid_cell(&self, ix: usize, iz: usize) -> Option<SlotId> {
        let side = self.grid_side();
        if ix >= side || iz >= side {
            return None;
        }
        self.grid[ix * side + iz]
    }

    /// Chunk coordinate targeted by grid cell `(ix, iz)`.
    pub fn cell_target(&self, ix: usize, iz: usize) -> ChunkCoord {
        let r = self.config.grid_radius as i32;
        ChunkCoord::new(
            self.center.cx - r + ix as i32,
            0,
            self.center.cz - r + iz as i32,
        )
    }

    #[inline]
    pub fn chunk(&self, slot: SlotId) -> Option<&Chunk> {
        self.chunks.get(slot)
    }

    pub fn chunks(&self) -> impl Iterator<Item = (SlotId, &Chunk)> + '_ {
        self.chunks.iter_active()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.chunks.active_count()
    }

    #[inline]
    pub fn inactive_count(&self) -> usize {
        self.chunks.inactive_count()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn pending_contains(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            active: self.chunks.active_count(),
            inactive: self.chunks.inactive_count(),
            pending: self.pending.len(),
            queued_orders: self.orders.len(),
            backlog: self.results.count(),
            pool: self
                .workers
                .as_ref()
                .map(WorkerPool::stats)
                .unwrap_or_default(),
        }
    }

    /// Grid index for `coord` relative to the current centre, if inside.
    fn cell_of(&self, coord: ChunkCoord) -> Option<usize> {
        let r = self.config.grid_radius as i32;
        let side = self.grid_side() as i32;
        let ix = coord.cx - self.center.cx + r;
        let iz = coord.cz - self.center.cz + r;
        if coord.cy != 0 || ix < 0 || iz < 0 || ix >= side || iz >= side {
            return None;
        }
        Some((ix * side + iz) as usize)
    }

    /// Steps 1 and 2: clear the grid, then re-seat or evict every placed chunk.
    fn recenter<S: ChunkSink + ?Sized>(&mut self, player: Vec3, sink: &mut S) -> usize {
        self.center = ChunkCoord::containing(player.x, player.z, self.params.chunk_size);
        self.grid.fill(None);
        let slots: Vec<SlotId> = self.chunks.active().to_vec();
        let mut evicted = 0;
        for slot in slots {
            let Some(coord) = self.chunks.get(slot).map(|c| c.coord) else {
                continue;
            };
            match self.cell_of(coord) {
                Some(i) if self.grid[i].is_none() => self.grid[i] = Some(slot),
                _ => {
                    self.recycle(slot, sink);
                    evicted += 1;
                }
            }
        }
        evicted
    }

    /// Step 3: order every empty cell whose target is not already pending.
    fn order_missing(&mut self) -> usize {
        let side = self.grid_side();
        let mut ordered = 0;
        for ix in 0..side {
            for iz in 0..side {
                if self.grid[ix * side + iz].is_some() {
                    continue;
                }
                let coord = self.cell_target(ix, iz);
                if self.pending.insert(coord) {
                    self.orders.enqueue(Order::Build(coord));
                    ordered += 1;
                }
            }
        }
        ordered
    }

    /// Step 4: place up to the budget of finished results.
    fn drain_results<S: ChunkSink + ?Sized>(&mut self, sink: &mut S) -> (usize, usize) {
        let mut placed = 0;
        let mut failed = 0;
        for ChunkResult { coord, outcome } in
            self.results.drain_up_to(self.config.max_launches_per_tick)
        {
            if !self.pending.remove(&coord) {
                log::debug!(target: "stream", "dropping unrequested result for {coord}");
                continue;
            }
            let mesh = match outcome {
                Ok(mesh) => mesh,
                Err(e) => {
                    log::warn!(target: "stream", "chunk {coord} failed, will retry: {e}");
                    failed += 1;
                    continue;
                }
            };
            let (ox, oy, oz) = coord.origin(self.params.chunk_size, self.params.chunk_height);
            let origin = Vec3::new(ox as f32, oy as f32, oz as f32);
            let slot = self.chunks.place(coord, origin, mesh);
            if let Some(i) = self.cell_of(coord) {
                if let Some(old) = self.grid[i].replace(slot) {
                    self.recycle(old, sink);
                }
            }
            if let Some(chunk) = self.chunks.get(slot) {
                sink.chunk_placed(slot, chunk);
            }
            placed += 1;
        }
        (placed, failed)
    }

    fn recycle<S: ChunkSink + ?Sized>(&mut self, slot: SlotId, sink: &mut S) {
        if self.chunks.release(slot) {
            if let Some(chunk) = self.chunks.get(slot) {
                sink.chunk_recycled(slot, chunk);
            }
        }
    }
}

impl Drop for ChunkManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

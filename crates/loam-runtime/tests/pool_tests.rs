use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use hashbrown::HashSet;
use loam_mesh_cpu::MeshData;
use loam_runtime::{BuildFn, ChunkResult, Order, ResultQueue, WorkQueue, WorkerError, WorkerPool};
use loam_world::{ChunkCoord, WorldGenParams};

const WAIT: Duration = Duration::from_secs(20);

fn noop_job() -> BuildFn {
    Arc::new(|_| MeshData::default())
}

fn collect(results: &ResultQueue<ChunkResult>, n: usize) -> Vec<ChunkResult> {
    (0..n)
        .map(|_| results.wait_dequeue_timeout(WAIT).expect("result in time"))
        .collect()
}

#[test]
fn dequeue_blocks_until_enqueue() {
    let q: WorkQueue<u32> = WorkQueue::new();
    let consumer = {
        let q = q.clone();
        thread::spawn(move || q.dequeue())
    };
    thread::sleep(Duration::from_millis(50));
    assert!(!consumer.is_finished());
    q.enqueue(41);
    assert_eq!(consumer.join().unwrap(), 41);
}

#[test]
fn shutdown_joins_every_worker() {
    let orders = WorkQueue::new();
    let results = ResultQueue::new();
    let mut pool = WorkerPool::spawn_with(4, orders.clone(), results, noop_job()).unwrap();
    assert_eq!(pool.worker_count(), 4);
    assert_eq!(pool.shutdown(), 4);
    assert_eq!(pool.worker_count(), 0);
    assert_eq!(pool.shutdown(), 0);
    assert!(orders.is_empty());
}

#[test]
fn orders_queued_before_shutdown_all_complete() {
    let orders = WorkQueue::new();
    let results = ResultQueue::new();
    let mut pool = WorkerPool::spawn_with(3, orders, results.clone(), noop_job()).unwrap();
    for i in 0..40 {
        pool.submit(ChunkCoord::new(i, 0, -i));
    }
    assert_eq!(pool.shutdown(), 3);
    assert_eq!(results.count(), 40);
    let coords: HashSet<ChunkCoord> = results
        .drain_up_to(usize::MAX)
        .into_iter()
        .map(|r| r.coord)
        .collect();
    assert_eq!(coords.len(), 40);
}

#[test]
fn panicking_order_does_not_take_down_the_pool() {
    let orders = WorkQueue::new();
    let results = ResultQueue::new();
    let job: BuildFn = Arc::new(|coord: ChunkCoord| {
        if coord.cx == 1 {
            panic!("bad chunk {coord}");
        }
        MeshData::default()
    });
    let mut pool = WorkerPool::spawn_with(2, orders, results.clone(), job).unwrap();
    for cx in 0..4 {
        pool.submit(ChunkCoord::new(cx, 0, 0));
    }
    let got = collect(&results, 4);
    let failed: Vec<&ChunkResult> = got.iter().filter(|r| r.outcome.is_err()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].coord, ChunkCoord::new(1, 0, 0));
    assert_eq!(
        failed[0].outcome.as_ref().unwrap_err(),
        &WorkerError::Panicked {
            message: "bad chunk (1, 0, 0)".to_string()
        }
    );
    let stats = pool.stats();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.completed, 3);
    assert_eq!(pool.shutdown(), 2);
}

#[test]
fn workers_are_named() {
    let names = Arc::new(Mutex::new(HashSet::new()));
    let job: BuildFn = {
        let names = Arc::clone(&names);
        Arc::new(move |_| {
            let name = thread::current().name().unwrap_or_default().to_string();
            names.lock().unwrap().insert(name);
            thread::sleep(Duration::from_millis(5));
            MeshData::default()
        })
    };
    let results = ResultQueue::new();
    let mut pool = WorkerPool::spawn_with(2, WorkQueue::new(), results.clone(), job).unwrap();
    for i in 0..20 {
        pool.submit(ChunkCoord::new(i, 0, 0));
    }
    collect(&results, 20);
    pool.shutdown();
    let names = names.lock().unwrap();
    assert!(!names.is_empty());
    assert!(names.iter().all(|n| n == "loam-gen-0" || n == "loam-gen-1"));
}

#[test]
fn extra_stop_is_harmless() {
    let orders = WorkQueue::new();
    let results = ResultQueue::new();
    let mut pool = WorkerPool::spawn_with(2, orders.clone(), results.clone(), noop_job()).unwrap();
    orders.enqueue(Order::Stop);
    pool.submit(ChunkCoord::new(5, 0, 5));
    // One worker exits early; the other still serves the order.
    let r = results.wait_dequeue_timeout(WAIT).expect("result in time");
    assert_eq!(r.coord, ChunkCoord::new(5, 0, 5));
    assert_eq!(pool.shutdown(), 2);
}

#[test]
fn real_pool_builds_terrain_meshes() {
    let params = WorldGenParams {
        chunk_size: 8,
        chunk_height: 32,
        ..WorldGenParams::default()
    };
    let results = ResultQueue::new();
    let mut pool = WorkerPool::spawn(2, &params, WorkQueue::new(), results.clone()).unwrap();
    let coords = [ChunkCoord::new(0, 0, 0), ChunkCoord::new(-1, 0, 2)];
    for c in coords {
        pool.submit(c);
    }
    let got = collect(&results, 2);
    pool.shutdown();
    for r in got {
        assert!(coords.contains(&r.coord));
        let mesh = r.outcome.unwrap();
        assert_eq!(mesh.uv.len(), mesh.vertex_count() * 2);
    }
}

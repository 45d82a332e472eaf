//! Background chunk building: order/result queues and the worker pool.
#![forbid(unsafe_code)]

mod pool;
mod queue;

pub use pool::{BuildFn, ChunkResult, Order, PoolStats, WorkerError, WorkerPool, build_job};
pub use queue::{ResultQueue, WorkQueue};

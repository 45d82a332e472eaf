use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Blocking FIFO handed to workers. Clones share the same queue.
#[derive(Debug)]
pub struct WorkQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Appends `item` and wakes one blocked consumer.
    pub fn enqueue(&self, item: T) {
        // Cannot fail: this handle keeps a receiver alive.
        let _ = self.tx.send(item);
    }

    /// Blocks until an item is available and returns the oldest one.
    pub fn dequeue(&self) -> T {
        match self.rx.recv() {
            Ok(item) => item,
            Err(_) => unreachable!("work queue holds its own sender"),
        }
    }

    pub fn try_dequeue(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// FIFO polled by the driver. `dequeue` never blocks; `wait_dequeue` exists
/// for teardown paths that must collect outstanding work.
#[derive(Debug)]
pub struct ResultQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Clone for ResultQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T> Default for ResultQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn enqueue(&self, item: T) {
        let _ = self.tx.send(item);
    }

    /// Oldest item, or `None` when nothing is ready.
    pub fn dequeue(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.rx.len()
    }

    pub fn wait_dequeue(&self) -> T {
        match self.rx.recv() {
            Ok(item) => item,
            Err(_) => unreachable!("result queue holds its own sender"),
        }
    }

    pub fn wait_dequeue_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Removes and returns up to `max` ready items without blocking.
    pub fn drain_up_to(&self, max: usize) -> Vec<T> {
        self.rx.try_iter().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_queue_is_fifo() {
        let q = WorkQueue::new();
        for i in 0..5 {
            q.enqueue(i);
        }
        assert_eq!(q.len(), 5);
        let got: Vec<i32> = (0..5).map(|_| q.dequeue()).collect();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
        assert!(q.is_empty());
    }

    #[test]
    fn result_queue_signals_empty() {
        let q: ResultQueue<u8> = ResultQueue::new();
        assert_eq!(q.dequeue(), None);
        q.enqueue(7);
        q.enqueue(8);
        assert_eq!(q.count(), 2);
        assert_eq!(q.dequeue(), Some(7));
        assert_eq!(q.dequeue(), Some(8));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn drain_respects_limit() {
        let q = ResultQueue::new();
        for i in 0..10 {
            q.enqueue(i);
        }
        assert_eq!(q.drain_up_to(3), vec![0, 1, 2]);
        assert_eq!(q.count(), 7);
        assert_eq!(q.drain_up_to(100).len(), 7);
    }
}

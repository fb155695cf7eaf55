//! Deferred-task command queue
//!
//! Ad platforms expose their API through a task queue: work submitted
//! before the underlying SDK is ready is buffered, and drained in FIFO
//! order once the platform signals readiness. After activation, submitted
//! tasks run immediately on the calling thread.
//!
//! [`CommandQueue`] is the value type platform implementations embed to
//! get that behavior. The ad units never poll for readiness; they submit
//! work and rely on the queue's ordering guarantee.

use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// A deferred unit of platform work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// FIFO task queue gating platform work on SDK readiness
///
/// ## Guarantees
///
/// - Tasks buffered before [`activate`](CommandQueue::activate) run in
///   submission order, each exactly once.
/// - Tasks submitted after activation run immediately on the calling
///   thread.
/// - The queue's lock is never held while a task runs, so tasks may
///   submit further tasks.
#[derive(Default)]
pub struct CommandQueue {
    inner: Mutex<QueueInner>,
}

#[derive(Default)]
struct QueueInner {
    activated: bool,
    pending: VecDeque<Task>,
}

impl CommandQueue {
    /// Create a queue that buffers tasks until activated
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue that is already activated
    pub fn activated() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                activated: true,
                pending: VecDeque::new(),
            }),
        }
    }

    /// Submit a task
    ///
    /// Never blocks and never fails. Before activation the task is
    /// buffered; afterwards it runs immediately.
    pub fn enqueue(&self, task: Task) {
        {
            let mut inner = self.inner.lock().unwrap();
            if !inner.activated {
                inner.pending.push_back(task);
                debug!(pending = inner.pending.len(), "task buffered until activation");
                return;
            }
        }
        task();
    }

    /// Mark the platform ready and drain all buffered tasks
    ///
    /// Tasks run in submission order, each exactly once, including tasks
    /// submitted by the tasks being drained. Idempotent.
    pub fn activate(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.activated {
                return;
            }
            inner.activated = true;
            debug!(pending = inner.pending.len(), "command queue activated");
        }

        loop {
            let task = self.inner.lock().unwrap().pending.pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    /// Whether the queue has been activated
    pub fn is_activated(&self) -> bool {
        self.inner.lock().unwrap().activated
    }

    /// Number of buffered tasks
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().pending.len()
    }
}

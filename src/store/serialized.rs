//! Visit store owned by a single worker thread.
//!
//! [`SerializedStore`] never shares its state. Every `record` and `count`
//! becomes a request on a bounded queue; one worker thread drains the queue
//! in order, applies each request and sends the result back on a per-call
//! reply channel. The caller blocks until its own reply arrives.
//!
//! This gives atomicity by construction, at the cost of a queue round trip per
//! call and a total order across all pages. Prefer
//! [`LockedStore`](crate::store::LockedStore) unless that ordering is wanted.
//!
//! Dropping the store closes the queue; the worker finishes the requests
//! already queued and exits, and the drop waits for it.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::error::{Result, VisitError};
use crate::store::{PageVisitors, VisitStore, DEFAULT_QUEUE_CAPACITY};
use crate::visit::{Count, PageUrl, Visit};

const WORKER_NAME: &str = "visitatori-store";

enum Request {
    Record { visit: Visit, reply: Sender<()> },
    Count { page: PageUrl, reply: Sender<Count> },
}

/// A visit store that funnels every operation through one worker thread.
///
/// # Examples
///
/// ```rust
/// use visitatori::store::{SerializedStore, VisitStore};
/// use visitatori::visit::Visit;
///
/// let store = SerializedStore::new()?;
/// store.record(&Visit::new("id", "url"))?;
/// assert_eq!(store.count("url")?, 1);
/// # Ok::<(), visitatori::error::VisitError>(())
/// ```
#[derive(Debug)]
pub struct SerializedStore {
    queue: Option<SyncSender<Request>>,
    worker: Option<JoinHandle<()>>,
}

impl SerializedStore {
    /// Creates an empty store with the default queue bound.
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates an empty store whose request queue holds at most `capacity`
    /// pending requests.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let (queue, requests) = mpsc::sync_channel(capacity);
        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || run(requests))
            .map_err(VisitError::store)?;

        Ok(Self {
            queue: Some(queue),
            worker: Some(worker),
        })
    }

    fn submit(&self, request: Request) -> Result<()> {
        self.queue
            .as_ref()
            .ok_or_else(|| VisitError::store("visit store is shut down"))?
            .send(request)
            .map_err(|_| VisitError::store("visit store worker stopped"))
    }
}

impl VisitStore for SerializedStore {
    fn record(&self, visit: &Visit) -> Result<()> {
        let (reply, done) = mpsc::channel();
        self.submit(Request::Record {
            visit: visit.clone(),
            reply,
        })?;
        done.recv()
            .map_err(|_| VisitError::store("visit store worker dropped the request"))
    }

    fn count(&self, page: &str) -> Result<Count> {
        let (reply, answer) = mpsc::channel();
        self.submit(Request::Count {
            page: page.to_string(),
            reply,
        })?;
        answer
            .recv()
            .map_err(|_| VisitError::store("visit store worker dropped the request"))
    }
}

impl Drop for SerializedStore {
    fn drop(&mut self) {
        drop(self.queue.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Worker loop: applies requests one at a time until every sender is gone.
fn run(requests: Receiver<Request>) {
    debug!("serialized visit store worker started");
    let mut state = PageVisitors::default();

    for request in requests {
        match request {
            Request::Record { visit, reply } => {
                state.insert(&visit);
                let _ = reply.send(());
            }
            Request::Count { page, reply } => {
                let _ = reply.send(state.count(&page));
            }
        }
    }

    debug!(pages = state.pages(), "serialized visit store worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let store = SerializedStore::new().unwrap();
        store.record(&Visit::new("id", "url")).unwrap();
        store.record(&Visit::new("id", "url")).unwrap();
        store.record(&Visit::new("id2", "url")).unwrap();
        assert_eq!(store.count("url").unwrap(), 2);
        assert_eq!(store.count("url2").unwrap(), 0);
    }

    #[test]
    fn test_worker_is_named() {
        let store = SerializedStore::new().unwrap();
        let name = store
            .worker
            .as_ref()
            .and_then(|w| w.thread().name().map(str::to_string));
        assert_eq!(name.as_deref(), Some(WORKER_NAME));
    }

    #[test]
    fn test_closed_queue_is_store_error() {
        let mut store = SerializedStore::new().unwrap();
        drop(store.queue.take());
        if let Some(worker) = store.worker.take() {
            worker.join().unwrap();
        }

        let err = store.record(&Visit::new("id", "url")).unwrap_err();
        assert!(matches!(err, VisitError::Store(_)));
        let err = store.count("url").unwrap_err();
        assert!(matches!(err, VisitError::Store(_)));
    }

    #[test]
    fn test_drop_joins_worker() {
        let store = SerializedStore::with_capacity(4).unwrap();
        for i in 0..16 {
            store.record(&Visit::new(format!("id-{i}"), "url")).unwrap();
        }
        drop(store);
    }
}

//! Keyed cache of in-flight and completed fetches.
//!
//! A [`QueryCache`] runs a fetch at most once per key while its result is
//! pending or successful; later callers subscribe to the same state. A
//! failed fetch is retried by the next [`QueryCache::query`] call for that
//! key. Dropping the last [`Query`] for a key whose fetch is still pending
//! aborts the request and forgets the key.

use std::{
    collections::HashMap,
    fmt::Display,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::{sync::watch, task::AbortHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    Pending,
    Error(String),
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

struct Entry<T> {
    tx: Arc<watch::Sender<QueryState<T>>>,
    task: AbortHandle,
}

type Entries<T> = Arc<Mutex<HashMap<String, Entry<T>>>>;

fn lock<T>(entries: &Entries<T>) -> MutexGuard<'_, HashMap<String, Entry<T>>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct QueryCache<T> {
    entries: Entries<T>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `key`, starting `fetch` if nothing usable is cached.
    ///
    /// Must be called from within a tokio runtime.
    pub fn query<F, Fut, E>(&self, key: &str, fetch: F) -> Query<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let mut entries = lock(&self.entries);

        if let Some(entry) = entries.get_mut(key) {
            let failed = matches!(*entry.tx.borrow(), QueryState::Error(_));
            if failed {
                tracing::debug!(key, "refetching failed query");
                entry.tx.send_replace(QueryState::Pending);
                entry.task = spawn_fetch(Arc::clone(&entry.tx), fetch());
            }
            return Query {
                key: key.to_string(),
                rx: entry.tx.subscribe(),
                tx: Arc::clone(&entry.tx),
                entries: Arc::clone(&self.entries),
            };
        }

        tracing::debug!(key, "starting query");
        let (tx, rx) = watch::channel(QueryState::Pending);
        let tx = Arc::new(tx);
        let task = spawn_fetch(Arc::clone(&tx), fetch());
        entries.insert(
            key.to_string(),
            Entry {
                tx: Arc::clone(&tx),
                task,
            },
        );

        Query {
            key: key.to_string(),
            rx,
            tx,
            entries: Arc::clone(&self.entries),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.entries).contains_key(key)
    }
}

fn spawn_fetch<T, Fut, E>(tx: Arc<watch::Sender<QueryState<T>>>, fut: Fut) -> AbortHandle
where
    T: Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        let state = match fut.await {
            Ok(data) => QueryState::Success(data),
            Err(err) => QueryState::Error(err.to_string()),
        };
        tx.send_replace(state);
    })
    .abort_handle()
}

/// A subscription to one cached fetch.
pub struct Query<T> {
    key: String,
    rx: watch::Receiver<QueryState<T>>,
    tx: Arc<watch::Sender<QueryState<T>>>,
    entries: Entries<T>,
}

impl<T: Clone> Query<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current state, marking it as seen.
    pub fn state(&mut self) -> QueryState<T> {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next state transition. Returns `false` once no more
    /// transitions can happen.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until the fetch has either failed or succeeded.
    pub async fn settled(&mut self) -> QueryState<T> {
        let settled = match self.rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.rx.borrow().clone())
    }
}

impl<T> Drop for Query<T> {
    fn drop(&mut self) {
        let mut entries = lock(&self.entries);
        let Some(entry) = entries.get(&self.key) else {
            return;
        };
        if !Arc::ptr_eq(&entry.tx, &self.tx) {
            return;
        }
        // `self.rx` is still alive here, so 1 means this is the last one.
        let last = entry.tx.receiver_count() <= 1;
        let pending = entry.tx.borrow().is_pending();
        if last && pending {
            entry.task.abort();
            entries.remove(&self.key);
            tracing::debug!(key = %self.key, "aborted pending query");
        }
    }
}

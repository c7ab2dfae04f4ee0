use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::feeds::FeedError;

/// What a page gets back from a refresh.
#[derive(Debug)]
pub struct FeedSnapshot<T> {
    /// Latest known-good value, if any refresh ever succeeded.
    pub data: Option<Arc<T>>,
    /// Set when this refresh failed; `data` is then the previous value.
    pub error: Option<FeedError>,
    /// Another refresh was already running; `data` was served from cache.
    pub refreshing: bool,
}

/// Last known-good value of a feed plus an in-flight flag.
///
/// A refresh that starts while another is running does not fetch; it returns
/// the cached value flagged as `refreshing`. Completed refreshes overwrite
/// each other in completion order. Failed refreshes never clear the cache.
pub struct FeedCache<T> {
    in_flight: AtomicBool,
    last_good: Mutex<Option<Arc<T>>>,
}

impl<T> Default for FeedCache<T> {
    fn default() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            last_good: Mutex::new(None),
        }
    }
}

/// Clears the in-flight flag when the refresh ends, even by panic.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<T> FeedCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<T>> {
        self.last_good.lock().map(|g| g.clone()).unwrap_or(None)
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn refresh<F>(&self, fetch: F) -> FeedSnapshot<T>
    where
        F: FnOnce() -> Result<T, FeedError>,
    {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return FeedSnapshot {
                data: self.current(),
                error: None,
                refreshing: true,
            };
        }

        let _guard = InFlight(&self.in_flight);
        match fetch() {
            Ok(value) => {
                let value = Arc::new(value);
                if let Ok(mut slot) = self.last_good.lock() {
                    *slot = Some(value.clone());
                }
                FeedSnapshot {
                    data: Some(value),
                    error: None,
                    refreshing: false,
                }
            }
            Err(e) => FeedSnapshot {
                data: self.current(),
                error: Some(e),
                refreshing: false,
            },
        }
    }

    /// Cached value, fetching only when nothing has been cached yet.
    pub fn get_or_refresh<F>(&self, fetch: F) -> FeedSnapshot<T>
    where
        F: FnOnce() -> Result<T, FeedError>,
    {
        match self.current() {
            Some(data) => FeedSnapshot {
                data: Some(data),
                error: None,
                refreshing: false,
            },
            None => self.refresh(fetch),
        }
    }
}

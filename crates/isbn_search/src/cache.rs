//! A bounded in-memory cache of responses keyed by request URL.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
};

use log::trace;

use crate::{api::Client, Error};

/// Keeps at most `capacity` responses, evicting the oldest inserted first.
#[derive(Debug, Default)]
pub struct ResponseCache {
    capacity: usize,
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

impl ResponseCache {
    /// Creates an empty cache. A `capacity` of zero never stores anything.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Gets the response stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores `value` under `key`, replacing a previous value for the same key.
    pub fn insert(&mut self, key: String, value: String) {
        if self.capacity == 0 {
            return;
        }

        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    trace!("Evicting cached response for '{oldest}'");
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Number of stored responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Answers repeated requests for the same URL from a [`ResponseCache`].
///
/// Only successful responses are stored. The cache belongs to one lookup session and is not
/// meant to be shared between threads.
#[derive(Debug)]
pub struct Cached<C> {
    inner: C,
    cache: RefCell<ResponseCache>,
}

impl<C: Client> Cached<C> {
    /// Wraps `inner` with a cache of `capacity` responses.
    pub fn new(inner: C, capacity: usize) -> Self {
        Self {
            inner,
            cache: RefCell::new(ResponseCache::with_capacity(capacity)),
        }
    }
}

impl<C: Client> Client for Cached<C> {
    fn get_text(&self, url: &str) -> Result<String, Error> {
        if let Some(hit) = self.cache.borrow().get(url) {
            trace!("Using cached response for '{url}'");
            return Ok(hit.to_owned());
        }

        let text = self.inner.get_text(url)?;
        self.cache
            .borrow_mut()
            .insert(url.to_owned(), text.clone());
        Ok(text)
    }
}

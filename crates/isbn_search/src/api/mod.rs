//! HTTP access to the catalog services and the client wrappers used for it.

use std::{thread, time::Duration};

use log::{trace, warn};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

pub(crate) mod google_books;
pub(crate) mod loc;
pub mod marc;

use crate::{Error, ErrorKind};

/// A blocking HTTP GET client.
///
/// Implemented for [`reqwest::blocking::Client`] and by the wrappers [`Retry`], [`Throttle`]
/// and [`crate::cache::Cached`] which add behaviour around another client.
pub trait Client {
    /// Fetch the body of `url` as text.
    ///
    /// # Errors
    ///
    /// Transport failures are [`ErrorKind::IO`], non-success statuses [`ErrorKind::Status`]
    /// and empty bodies [`ErrorKind::NoValue`].
    fn get_text(&self, url: &str) -> Result<String, Error>;

    /// Fetch the body of `url` and deserialize it from JSON.
    ///
    /// # Errors
    ///
    /// Same as [`Client::get_text`], plus [`ErrorKind::Deserialize`] when the body is not the
    /// expected JSON.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let text = self.get_text(url)?;
        serde_json::from_str(&text).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }
}

impl Client for reqwest::blocking::Client {
    fn get_text(&self, url: &str) -> Result<String, Error> {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::new(
                ErrorKind::Status,
                format!("'{url}' responded with {status}"),
            ));
        }

        let text = resp
            .text()
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

        if text.is_empty() {
            Err(Error::new(ErrorKind::NoValue, "Response text is empty"))
        } else {
            Ok(text)
        }
    }
}

/// Deserializes an explicit `null` the same as a missing value, as `T::default()`.
///
/// Use together with `#[serde(default)]` so an absent key is covered as well.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Retries requests of the wrapped client that fail with [`ErrorKind::IO`].
///
/// The wait before retry `n` is `backoff * 2^(n - 1)`, except the first retry which is
/// immediate.
#[derive(Debug)]
pub struct Retry<C> {
    inner: C,
    retries: u32,
    backoff: Duration,
}

impl<C: Client> Retry<C> {
    /// Wraps `inner` allowing up to `retries` extra attempts per request.
    pub const fn new(inner: C, retries: u32, backoff: Duration) -> Self {
        Self {
            inner,
            retries,
            backoff,
        }
    }
}

fn backoff_delay(backoff: Duration, attempt: u32) -> Duration {
    if attempt <= 1 {
        Duration::ZERO
    } else {
        backoff.saturating_mul(1 << (attempt - 1).min(16))
    }
}

impl<C: Client> Client for Retry<C> {
    fn get_text(&self, url: &str) -> Result<String, Error> {
        let mut attempt = 0;
        loop {
            match self.inner.get_text(url) {
                Err(err) if err.kind() == ErrorKind::IO && attempt < self.retries => {
                    attempt += 1;
                    let wait = backoff_delay(self.backoff, attempt);
                    warn!(
                        "Request failed ({err}) - retry {attempt} of {} in {wait:?}",
                        self.retries
                    );
                    thread::sleep(wait);
                }
                res => return res,
            }
        }
    }
}

/// Sleeps for a fixed delay after every request of the wrapped client, successful or not.
///
/// The public catalog asks clients to keep their request rate low.
#[derive(Debug)]
pub struct Throttle<C> {
    inner: C,
    delay: Duration,
}

impl<C: Client> Throttle<C> {
    /// Wraps `inner` sleeping `delay` after each request.
    pub const fn new(inner: C, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl<C: Client> Client for Throttle<C> {
    fn get_text(&self, url: &str) -> Result<String, Error> {
        let res = self.inner.get_text(url);
        if !self.delay.is_zero() {
            trace!("Waiting {:?} before the next request", self.delay);
            thread::sleep(self.delay);
        }
        res
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, MockClient, NetworkErrorProducer, NotFoundProducer, Producer,
    URL_SINK,
};

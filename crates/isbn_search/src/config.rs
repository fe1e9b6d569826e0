use std::time::Duration;

/// Settings of the HTTP client used for lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Extra attempts after a request fails to connect or times out.
    pub retries: u32,
    /// Base wait between retries, doubled for every further retry.
    pub backoff: Duration,
    /// Timeout of a single request.
    pub timeout: Duration,
    /// Wait after every request that reached the network.
    pub delay: Duration,
    /// Number of responses kept in memory, zero disables caching.
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
            delay: Duration::from_secs(1),
            cache_capacity: 64,
        }
    }
}

//! Client configuration loaded from environment variables.
//!
//! Every setting has a default matching the stock widget behaviour, so the
//! client runs with zero configuration.

use std::str::FromStr;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use agora_shared::constants::{
    FEED_FETCH_DELAY_MS, FEED_MAX_PAGES, FEED_PAGE_SIZE, MARKER_LIFETIME_MS,
    REMOTE_REPLY_DELAY_MS, TYPING_CLEAR_DELAY_MS,
};

/// Timing and paging settings for the async controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Idle time after the last keystroke before the local typing flag clears.
    /// Env: `AGORA_TYPING_CLEAR_MS`
    /// Default: `2000`
    pub typing_clear_delay: Duration,

    /// Delay before a typing remote user posts their scripted reply.
    /// Env: `AGORA_REMOTE_REPLY_MS`
    /// Default: `3000`
    pub remote_reply_delay: Duration,

    /// Simulated latency of one feed page fetch.
    /// Env: `AGORA_FEED_FETCH_MS`
    /// Default: `1000`
    pub feed_fetch_delay: Duration,

    /// Posts per feed page.
    /// Env: `AGORA_FEED_PAGE_SIZE`
    /// Default: `5`
    pub feed_page_size: usize,

    /// Last page the feed loads.
    /// Env: `AGORA_FEED_MAX_PAGES`
    /// Default: `5`
    pub feed_max_pages: u32,

    /// Lifetime of a floating like marker.
    /// Env: `AGORA_MARKER_LIFETIME_MS`
    /// Default: `2000`
    pub marker_lifetime: Duration,

    /// Seed for mock data and marker placement.
    /// Env: `AGORA_RNG_SEED`
    /// Default: unset (seeded from entropy).
    pub rng_seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            typing_clear_delay: Duration::from_millis(TYPING_CLEAR_DELAY_MS),
            remote_reply_delay: Duration::from_millis(REMOTE_REPLY_DELAY_MS),
            feed_fetch_delay: Duration::from_millis(FEED_FETCH_DELAY_MS),
            feed_page_size: FEED_PAGE_SIZE,
            feed_max_pages: FEED_MAX_PAGES,
            marker_lifetime: Duration::from_millis(MARKER_LIFETIME_MS),
            rng_seed: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64, _>(&lookup, "AGORA_TYPING_CLEAR_MS") {
            config.typing_clear_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "AGORA_REMOTE_REPLY_MS") {
            config.remote_reply_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "AGORA_FEED_FETCH_MS") {
            config.feed_fetch_delay = Duration::from_millis(ms);
        }
        if let Some(size) = parse_var::<usize, _>(&lookup, "AGORA_FEED_PAGE_SIZE") {
            config.feed_page_size = size;
        }
        if let Some(pages) = parse_var::<u32, _>(&lookup, "AGORA_FEED_MAX_PAGES") {
            config.feed_max_pages = pages;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "AGORA_MARKER_LIFETIME_MS") {
            config.marker_lifetime = Duration::from_millis(ms);
        }
        if let Some(seed) = parse_var::<u64, _>(&lookup, "AGORA_RNG_SEED") {
            config.rng_seed = Some(seed);
        }

        // RUST_LOG is read by the EnvFilter in `init_tracing`.

        config
    }

    /// Random source for one consumer. Consumers pass distinct `stream`
    /// numbers so that a fixed seed still gives them independent sequences.
    pub fn rng(&self, stream: u64) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            None
        }
    }
}

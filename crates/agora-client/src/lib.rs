//! # agora-client
//!
//! The timer-driven half of the widgets: typing debounce, scripted chat
//! replies, paged feed loading and like markers, plus the submit paths and
//! the registry that mounts every widget.

pub mod chat;
pub mod composer;
pub mod config;
pub mod error;
pub mod feed;
pub mod posts;
pub mod sinks;
pub mod state;
pub mod timers;

use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use state::AppState;

/// Install the global tracing subscriber. `RUST_LOG` wins when set. Returns
/// `false` if a subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("agora_client=debug,agora_store=info,agora_demo=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .is_ok()
}

//! # agora-store
//!
//! In-memory state for every Agora widget.
//!
//! Each widget is a [`Widget`] implementation: a seed collection, a reducer
//! for its typed actions, and a pure projection into a serialisable view
//! model. A [`Store`] mounts one widget and hands out snapshots, dispatches
//! actions and notifies subscribers. Nothing here touches a clock-driven
//! timer or the network; the async side lives in `agora-client`.

pub mod chat;
pub mod comments;
pub mod feed;
pub mod forum;
pub mod micro_post;
pub mod poll;
pub mod posts;
pub mod profile;
pub mod qa;
pub mod reactions;
pub mod rsvp;
pub mod votes;

mod store;

pub use reactions::{ReactionCounts, Reactions};
pub use store::{find_mut, Store, Subscription, Widget};
pub use votes::VoteTally;

//! Per-note statistics for a social client.
//!
//! This crate folds raw protocol events into per-note aggregates and
//! drives their incremental refresh:
//!
//! - **Folding**: reposts (kind 6) become a set of reposting identities,
//!   reactions (kind 7) a latest-per-identity map, zap receipts (kind
//!   9735) a deduplicated, amount-sorted list. All folds are idempotent
//!   under re-delivery.
//! - **Zap receipts**: parsed into payer, amount (from the bolt11
//!   invoice), and comment (from the embedded zap request).
//! - **Refresh**: filter construction and incremental fetching against an
//!   [`EventSource`] — the opaque relay-client collaborator. Each refresh
//!   stamps the note so the next one only requests newer events.
//!
//! The store is plain single-owner state; sharing it across tasks is the
//! caller's concern.

mod error;
mod refresh;
mod stats;
mod tags;
mod zap;

pub use error::{Error, Result};
pub use refresh::{
    EventSource, REACTION_FETCH_LIMIT, REPOST_FETCH_LIMIT, RefreshOptions, SEED_FETCH_LIMIT,
    ZAP_FETCH_LIMIT, refresh_note_stats, seed_viewer_activity,
};
pub use stats::{NoteStats, NoteStatsStore, Reaction};
pub use zap::{ParsedReceipt, Zap, parse_zap_receipt};

//! Incremental refresh of note statistics.
//!
//! The relay client is an opaque collaborator: anything that can answer a
//! set of subscription filters with events can back a refresh. This module
//! builds the filters, hands them to the source, folds the result into the
//! store, and stamps the note so the next refresh only asks for newer
//! events.

use std::future::Future;

use nostr::{Alphabet, Event, Filter, Kind, PublicKey, SingleLetterTag, Timestamp};

use crate::error::Result;
use crate::stats::{NoteStats, NoteStatsStore};

/// Most reactions requested per refresh.
pub const REACTION_FETCH_LIMIT: usize = 500;

/// Most reposts requested per refresh.
pub const REPOST_FETCH_LIMIT: usize = 100;

/// Most zap receipts requested per refresh.
pub const ZAP_FETCH_LIMIT: usize = 500;

/// Most events per filter when seeding the viewer's own activity.
pub const SEED_FETCH_LIMIT: usize = 100;

/// An opaque source of protocol events, usually a relay pool client.
pub trait EventSource {
    /// Fetch all events matching any of `filters`.
    fn fetch_events(
        &self,
        filters: Vec<Filter>,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send;
}

/// Per-refresh knobs mirroring what the caller knows about the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshOptions {
    /// The logged-in user, if any. Their own reactions, reposts, and zaps
    /// on the note are fetched explicitly so the UI can highlight them even
    /// when the note is past the general fetch limits.
    pub viewer: Option<PublicKey>,
    /// Whether the note's author can receive zaps (has a lightning
    /// address). Zap receipts are only worth fetching when they can exist.
    pub author_zappable: bool,
}

/// Refresh a note's statistics from `source` and fold them into `store`.
///
/// When the store already holds stats for the note, all filters carry
/// `since = updated_at` so only events newer than the previous refresh are
/// requested. Returns the note's stats after folding.
pub async fn refresh_note_stats<'a, S>(
    source: &S,
    store: &'a mut NoteStatsStore,
    note: &Event,
    options: RefreshOptions,
) -> Result<&'a NoteStats>
where
    S: EventSource,
{
    let since = store.get(&note.id).and_then(|stats| stats.updated_at);

    let mut filters = vec![
        Filter::new()
            .kind(Kind::Reaction)
            .event(note.id)
            .limit(REACTION_FETCH_LIMIT),
        Filter::new()
            .kind(Kind::Repost)
            .event(note.id)
            .limit(REPOST_FETCH_LIMIT),
    ];
    if options.author_zappable {
        filters.push(
            Filter::new()
                .kind(Kind::ZapReceipt)
                .event(note.id)
                .limit(ZAP_FETCH_LIMIT),
        );
    }
    if let Some(viewer) = options.viewer {
        filters.push(
            Filter::new()
                .kinds([Kind::Reaction, Kind::Repost])
                .event(note.id)
                .author(viewer),
        );
        if options.author_zappable {
            filters.push(
                Filter::new()
                    .kind(Kind::ZapReceipt)
                    .event(note.id)
                    .custom_tag(SingleLetterTag::uppercase(Alphabet::P), viewer.to_hex()),
            );
        }
    }
    if let Some(since) = since {
        filters = filters.into_iter().map(|f| f.since(since)).collect();
    }

    let events = source.fetch_events(filters).await?;
    let folded = store.apply_events(&events);
    tracing::debug!(
        note = %note.id,
        fetched = events.len(),
        folded,
        incremental = since.is_some(),
        "refreshed note stats"
    );

    Ok(store.touch(note.id, Timestamp::now()))
}

/// Seed the store with the viewer's own recent activity.
///
/// Fetches the viewer's latest reactions and reposts, plus zap receipts for
/// zaps they sent, so notes render with the viewer's state before any
/// per-note refresh runs. Returns how many events were folded.
pub async fn seed_viewer_activity<S>(
    source: &S,
    store: &mut NoteStatsStore,
    viewer: PublicKey,
) -> Result<usize>
where
    S: EventSource,
{
    let filters = vec![
        Filter::new()
            .author(viewer)
            .kinds([Kind::Reaction, Kind::Repost])
            .limit(SEED_FETCH_LIMIT),
        Filter::new()
            .kind(Kind::ZapReceipt)
            .custom_tag(SingleLetterTag::uppercase(Alphabet::P), viewer.to_hex())
            .limit(SEED_FETCH_LIMIT),
    ];

    let events = source.fetch_events(filters).await?;
    let folded = store.apply_events(&events);
    tracing::debug!(viewer = %viewer, fetched = events.len(), folded, "seeded viewer activity");
    Ok(folded)
}

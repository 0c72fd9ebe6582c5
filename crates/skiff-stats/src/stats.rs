//! Per-note aggregate statistics.
//!
//! [`NoteStatsStore`] folds raw protocol events into per-note summaries.
//! Entries are created lazily on the first event that references a note and
//! are never explicitly destroyed; eviction belongs to the surrounding
//! application. Every fold is idempotent under re-delivery of the same
//! event, so refreshes can safely overlap previously seen data.

use std::collections::{HashMap, HashSet};

use nostr::{Event, EventId, Kind, PublicKey, Timestamp};
use serde::Serialize;

use crate::tags::{first_tag_value, last_tag_value};
use crate::zap::{Zap, parse_zap_receipt};

/// The latest reaction observed from one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reaction {
    /// Reaction content, e.g. `+` or an emoji.
    pub content: String,
    pub created_at: Timestamp,
}

/// Aggregate statistics for a single note.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteStats {
    /// Identities that reposted the note.
    pub reposted_by: HashSet<PublicKey>,
    /// Latest reaction per reacting identity.
    pub reactions: HashMap<PublicKey, Reaction>,
    /// Zaps, deduplicated by invoice and sorted descending by amount.
    pub zaps: Vec<Zap>,
    /// Reply count, monotonically non-decreasing once observed.
    pub reply_count: Option<u64>,
    /// When the note was last refreshed; refreshes fetch only newer events.
    pub updated_at: Option<Timestamp>,
}

impl NoteStats {
    /// Total sats zapped to the note.
    pub fn zapped_sats(&self) -> u64 {
        self.zaps.iter().map(|zap| zap.amount).sum()
    }

    fn insert_zap(&mut self, zap: Zap) -> bool {
        if self.zaps.iter().any(|z| z.invoice == zap.invoice) {
            return false;
        }
        self.zaps.push(zap);
        // Stable sort: equal amounts keep their arrival order.
        self.zaps.sort_by(|a, b| b.amount.cmp(&a.amount));
        true
    }
}

/// In-memory store of per-note statistics, keyed by note id.
///
/// Plain single-owner state: folds take `&mut self` and the last writer
/// wins. Callers that share a store across tasks wrap it themselves.
#[derive(Debug, Default)]
pub struct NoteStatsStore {
    stats: HashMap<EventId, NoteStats>,
}

impl NoteStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for a note, if any related event has been observed.
    pub fn get(&self, note: &EventId) -> Option<&NoteStats> {
        self.stats.get(note)
    }

    /// Number of notes with observed stats.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Fold fetched events into the store.
    ///
    /// Reposts (kind 6) target their first `e` tag, reactions (kind 7)
    /// their last. Zap receipts (kind 9735) are parsed and deduplicated by
    /// invoice. Everything else is ignored. Returns how many events
    /// actually changed a note's stats.
    pub fn apply_events<'a, I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut folded = 0;
        for event in events {
            let applied = match event.kind {
                Kind::Repost => self.apply_repost(event),
                Kind::Reaction => self.apply_reaction(event),
                Kind::ZapReceipt => self.apply_zap_receipt(event),
                _ => false,
            };
            if applied {
                folded += 1;
            }
        }
        folded
    }

    fn apply_repost(&mut self, event: &Event) -> bool {
        let Some(target) =
            first_tag_value(event, "e").and_then(|v| EventId::from_hex(v).ok())
        else {
            tracing::debug!(repost = %event.id, "repost without target note");
            return false;
        };
        self.entry(target).reposted_by.insert(event.pubkey)
    }

    fn apply_reaction(&mut self, event: &Event) -> bool {
        let Some(target) =
            last_tag_value(event, "e").and_then(|v| EventId::from_hex(v).ok())
        else {
            tracing::debug!(reaction = %event.id, "reaction without target note");
            return false;
        };
        let stats = self.entry(target);
        match stats.reactions.get(&event.pubkey) {
            // An older reaction never replaces a newer one, and re-delivery
            // of the current one is a no-op.
            Some(existing) if existing.created_at > event.created_at => false,
            Some(existing)
                if existing.created_at == event.created_at
                    && existing.content == event.content =>
            {
                false
            }
            _ => {
                stats.reactions.insert(
                    event.pubkey,
                    Reaction {
                        content: event.content.clone(),
                        created_at: event.created_at,
                    },
                );
                true
            }
        }
    }

    fn apply_zap_receipt(&mut self, event: &Event) -> bool {
        let Some(receipt) = parse_zap_receipt(event) else {
            return false;
        };
        self.entry(receipt.target).insert_zap(receipt.zap)
    }

    /// Raise a note's reply count. Counts only move up: a shallower fetch
    /// observing fewer replies never shrinks an earlier observation.
    pub fn update_reply_count(&mut self, note: EventId, count: u64) -> bool {
        let stats = self.entry(note);
        match stats.reply_count {
            Some(existing) if existing >= count => false,
            _ => {
                stats.reply_count = Some(count);
                true
            }
        }
    }

    /// Record a zap the local user just sent, before any receipt is seen.
    ///
    /// Same dedup and ordering rules as folded receipts, so the eventual
    /// receipt for the same invoice is a no-op.
    pub fn record_zap(&mut self, note: EventId, zap: Zap) -> bool {
        self.entry(note).insert_zap(zap)
    }

    /// Stamp a note's refresh time and return its (possibly fresh) stats.
    pub(crate) fn touch(&mut self, note: EventId, at: Timestamp) -> &NoteStats {
        let stats = self.entry(note);
        stats.updated_at = Some(at);
        stats
    }

    fn entry(&mut self, note: EventId) -> &mut NoteStats {
        self.stats.entry(note).or_default()
    }
}

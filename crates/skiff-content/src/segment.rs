//! The segment model produced by the annotator.

use serde::{Deserialize, Serialize};

/// Classification of an annotated substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentKind {
    /// Plain text passed through unclassified.
    Text,
    /// Direct link to an image file.
    Image,
    /// Direct link to a video file.
    Video,
    /// `nostr:` reference to another event (note, nevent, naddr).
    EventReference,
    /// Reference to a user (npub, nprofile).
    UserMention,
    /// `#tag` token.
    Hashtag,
    /// `ws://` or `wss://` relay address.
    RelayUrl,
    /// Any other `http(s)://` link.
    GenericUrl,
}

/// A classified substring of note text.
///
/// `raw` is the exact substring the segment covers; for [`SegmentKind::Text`]
/// it is the literal passthrough slice between recognized entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub raw: String,
}

impl Segment {
    pub fn new(kind: SegmentKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    /// Plain-text segment.
    pub fn text(raw: impl Into<String>) -> Self {
        Self::new(SegmentKind::Text, raw)
    }
}

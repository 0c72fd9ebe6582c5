//! Entity matchers.
//!
//! A [`Matcher`] pairs a [`SegmentKind`] with the regex that recognizes it.
//! Callers hand an ordered list of matchers to [`annotate`](crate::annotate);
//! the order decides precedence, so a kind checked earlier can claim
//! characters a later pattern would also match (an image URL is never
//! reported as a generic URL when the image matcher runs first).
//!
//! Matching is case-sensitive. Identifier-like classes (hashtags) are
//! Unicode-aware per their character classes.

use std::sync::LazyLock;

use regex::Regex;

use crate::SegmentKind;

/// Regex for direct image links (by file extension, optional query string).
static IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://[\w&./?=#@%+:!~*-]+\.(?:jpg|jpeg|png|gif|webp|bmp|tiff|svg)(?:\?[^ ]+)?",
    )
    .expect("image regex should compile")
});

/// Regex for direct video links (by file extension, optional query string).
static VIDEO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[\w&./?=#@%+:!~*-]+\.(?:mp4|webm|ogg|mov)(?:\?[^ ]+)?")
        .expect("video regex should compile")
});

/// Regex for `nostr:` event references (note, nevent, naddr).
static EVENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"nostr:(?:note1[a-z0-9]{58}|nevent1[a-z0-9]+|naddr1[a-z0-9]+)")
        .expect("event reference regex should compile")
});

/// Regex for `nostr:` user mentions (npub, nprofile).
static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"nostr:(?:npub1[a-z0-9]{58}|nprofile1[a-z0-9]+)")
        .expect("mention regex should compile")
});

/// Regex for bare npub/nprofile mentions without the `nostr:` prefix.
static LEGACY_MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"npub1[a-z0-9]{58}|nprofile1[a-z0-9]+")
        .expect("legacy mention regex should compile")
});

/// Regex for `#tag` tokens. `\p{M}` keeps combining marks inside the tag.
static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[\p{L}\p{N}\p{M}_]+").expect("hashtag regex should compile"));

/// Regex for relay websocket addresses.
static RELAY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"wss?://[\w&./?=#@%+:!~*-]+").expect("relay regex should compile")
});

/// Regex for any remaining http(s) link.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[\w&./?=#@%+:!~*-]+").expect("url regex should compile")
});

/// A (kind, pattern) pair describing how to recognize one entity kind.
#[derive(Debug, Clone)]
pub struct Matcher {
    kind: SegmentKind,
    pattern: Regex,
}

impl Matcher {
    /// Pair an arbitrary pattern with a segment kind.
    ///
    /// Matches use the pattern's own greedy semantics; the annotator adds no
    /// lookahead or backtracking of its own.
    pub fn new(kind: SegmentKind, pattern: Regex) -> Self {
        Self { kind, pattern }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Direct image links, e.g. `https://x.com/a.jpg?w=800`.
    pub fn image() -> Self {
        Self::new(SegmentKind::Image, IMAGE_REGEX.clone())
    }

    /// Direct video links, e.g. `https://x.com/clip.mp4`.
    pub fn video() -> Self {
        Self::new(SegmentKind::Video, VIDEO_REGEX.clone())
    }

    /// `nostr:note1…`, `nostr:nevent1…`, `nostr:naddr1…` references.
    pub fn event_reference() -> Self {
        Self::new(SegmentKind::EventReference, EVENT_REGEX.clone())
    }

    /// `nostr:npub1…` and `nostr:nprofile1…` mentions.
    pub fn user_mention() -> Self {
        Self::new(SegmentKind::UserMention, MENTION_REGEX.clone())
    }

    /// Bare `npub1…`/`nprofile1…` mentions, as older clients wrote them.
    pub fn legacy_user_mention() -> Self {
        Self::new(SegmentKind::UserMention, LEGACY_MENTION_REGEX.clone())
    }

    /// `#tag` tokens.
    pub fn hashtag() -> Self {
        Self::new(SegmentKind::Hashtag, HASHTAG_REGEX.clone())
    }

    /// `ws://`/`wss://` relay addresses.
    pub fn relay_url() -> Self {
        Self::new(SegmentKind::RelayUrl, RELAY_REGEX.clone())
    }

    /// Any other http(s) link. Run this after the media matchers or it will
    /// claim image and video URLs too.
    pub fn generic_url() -> Self {
        Self::new(SegmentKind::GenericUrl, URL_REGEX.clone())
    }
}

/// Matchers for a note body, in the order the note renderer applies them:
/// media first so image/video links are never downgraded to plain links.
pub fn note_matchers() -> Vec<Matcher> {
    vec![
        Matcher::image(),
        Matcher::video(),
        Matcher::generic_url(),
        Matcher::relay_url(),
        Matcher::event_reference(),
        Matcher::user_mention(),
        Matcher::hashtag(),
    ]
}

/// Matchers for a profile bio: links, hashtags, and mentions, but never
/// inline media.
pub fn profile_matchers() -> Vec<Matcher> {
    vec![
        Matcher::relay_url(),
        Matcher::generic_url(),
        Matcher::hashtag(),
        Matcher::user_mention(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_match(matcher: &Matcher, text: &str) -> Option<String> {
        matcher.pattern().find(text).map(|m| m.as_str().to_string())
    }

    #[test]
    fn image_matches_extension_and_query() {
        let m = Matcher::image();
        assert_eq!(
            only_match(&m, "https://x.com/a.jpg").as_deref(),
            Some("https://x.com/a.jpg")
        );
        assert_eq!(
            only_match(&m, "https://x.com/a.webp?w=800&q=90").as_deref(),
            Some("https://x.com/a.webp?w=800&q=90")
        );
        // Case-sensitive: uppercase extensions are not images.
        assert_eq!(only_match(&m, "https://x.com/a.JPG"), None);
        assert_eq!(only_match(&m, "https://x.com/page.html"), None);
    }

    #[test]
    fn video_matches_extension() {
        let m = Matcher::video();
        assert_eq!(
            only_match(&m, "see https://x.com/clip.mp4 now").as_deref(),
            Some("https://x.com/clip.mp4")
        );
        assert_eq!(only_match(&m, "https://x.com/a.jpg"), None);
    }

    #[test]
    fn mention_requires_full_npub_length() {
        let m = Matcher::user_mention();
        let npub = format!("npub1{}", "a".repeat(58));
        assert_eq!(
            only_match(&m, &format!("hi nostr:{npub}")).as_deref(),
            Some(format!("nostr:{npub}").as_str())
        );
        // One character short: not a valid npub token.
        let short = format!("nostr:npub1{}", "a".repeat(57));
        assert_eq!(only_match(&m, &short), None);
        // Bare npub without the prefix is the legacy form.
        assert_eq!(only_match(&m, &npub), None);
        assert_eq!(
            only_match(&Matcher::legacy_user_mention(), &npub).as_deref(),
            Some(npub.as_str())
        );
    }

    #[test]
    fn event_reference_accepts_nevent_and_naddr() {
        let m = Matcher::event_reference();
        let note = format!("nostr:note1{}", "b".repeat(58));
        assert_eq!(only_match(&m, &note).as_deref(), Some(note.as_str()));
        assert_eq!(
            only_match(&m, "nostr:nevent1qqsabc").as_deref(),
            Some("nostr:nevent1qqsabc")
        );
        assert_eq!(
            only_match(&m, "nostr:naddr1qqsabc").as_deref(),
            Some("nostr:naddr1qqsabc")
        );
    }

    #[test]
    fn hashtag_is_unicode_aware() {
        let m = Matcher::hashtag();
        assert_eq!(only_match(&m, "gm #nostr").as_deref(), Some("#nostr"));
        assert_eq!(only_match(&m, "#日本語 post").as_deref(), Some("#日本語"));
        assert_eq!(only_match(&m, "#tag_1").as_deref(), Some("#tag_1"));
        // Punctuation ends the tag.
        assert_eq!(only_match(&m, "#a,b").as_deref(), Some("#a"));
        assert_eq!(only_match(&m, "# not a tag"), None);
    }

    #[test]
    fn relay_matches_ws_and_wss() {
        let m = Matcher::relay_url();
        assert_eq!(
            only_match(&m, "join wss://relay.damus.io please").as_deref(),
            Some("wss://relay.damus.io")
        );
        assert_eq!(
            only_match(&m, "ws://localhost:8080").as_deref(),
            Some("ws://localhost:8080")
        );
        assert_eq!(only_match(&m, "https://x.com"), None);
    }
}

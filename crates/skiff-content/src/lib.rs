//! Content annotation for note text.
//!
//! This crate converts raw note text into an ordered sequence of typed
//! segments (plain text vs. recognized entities) so a rendering layer can
//! map each kind to a visual representation: inline image, mention chip,
//! hashtag chip, relay badge, link.
//!
//! # Architecture
//!
//! - **Segments**: the `{kind, raw}` unit the annotator produces.
//!   Concatenating `raw` across a whole annotation reproduces the input
//!   exactly; classification never drops or alters characters.
//! - **Matchers**: `(kind, pattern)` pairs. The annotator applies them as
//!   successive layered passes in caller order, each pass only splitting
//!   segments still classified as plain text. Ordering is part of the
//!   contract: an earlier matcher claims characters before a later one
//!   ever sees them.
//!
//! The annotator is a pure function over immutable inputs: no I/O, no
//! shared state, safe to call from any number of concurrent invocations.

mod annotate;
mod matcher;
mod segment;

pub use annotate::annotate;
pub use matcher::{Matcher, note_matchers, profile_matchers};
pub use segment::{Segment, SegmentKind};

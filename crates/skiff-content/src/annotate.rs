//! Layered annotation pass over note text.

use crate::{Matcher, Segment, SegmentKind};

/// Annotate `text` by applying `matchers` as successive layered passes.
///
/// Starts from a single plain-text segment covering the whole input. Each
/// matcher scans every segment still classified as text, left to right, and
/// splits it around its non-overlapping matches; segments already claimed by
/// an earlier matcher are passed through untouched. Zero-length text
/// segments are dropped, so adjacent matches and matches at either end of
/// the input produce no empty filler.
///
/// The pass never drops or alters characters: concatenating `raw` across
/// the returned segments reproduces `text` exactly.
///
/// An empty matcher list is the identity transform; an empty input yields
/// an empty sequence. The function is pure and total: same inputs, same
/// output, and no input can make it fail.
pub fn annotate(text: &str, matchers: &[Matcher]) -> Vec<Segment> {
    let mut segments = vec![Segment::text(text)];

    for matcher in matchers {
        let mut split = Vec::with_capacity(segments.len());
        for segment in segments {
            if segment.kind != SegmentKind::Text {
                split.push(segment);
                continue;
            }

            let mut tail = 0;
            for found in matcher.pattern().find_iter(&segment.raw) {
                if found.start() > tail {
                    split.push(Segment::text(&segment.raw[tail..found.start()]));
                }
                split.push(Segment::new(matcher.kind(), found.as_str()));
                tail = found.end();
            }

            if tail == 0 {
                // No matches: keep the segment as-is.
                split.push(segment);
            } else if tail < segment.raw.len() {
                split.push(Segment::text(&segment.raw[tail..]));
            }
        }
        segments = split;
    }

    // Empty text segments carry no content and would break rendering-key
    // uniqueness downstream; the empty input reduces to an empty sequence.
    segments.retain(|s| !(s.kind == SegmentKind::Text && s.raw.is_empty()));
    segments
}

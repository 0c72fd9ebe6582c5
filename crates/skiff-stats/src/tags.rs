//! Tag access helpers.

use nostr::Event;

/// Value of the first tag named `name`.
pub(crate) fn first_tag_value<'a>(event: &'a Event, name: &str) -> Option<&'a str> {
    event.tags.iter().find_map(|tag| match tag.as_slice() {
        [n, value, ..] if n.as_str() == name => Some(value.as_str()),
        _ => None,
    })
}

/// Value of the last tag named `name`.
///
/// Reactions reference their target as the last `e` tag; earlier `e` tags
/// point at the rest of the thread.
pub(crate) fn last_tag_value<'a>(event: &'a Event, name: &str) -> Option<&'a str> {
    event
        .tags
        .iter()
        .filter_map(|tag| match tag.as_slice() {
            [n, value, ..] if n.as_str() == name => Some(value.as_str()),
            _ => None,
        })
        .last()
}

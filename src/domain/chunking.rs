//! Splitting of chat text into Discord-sized messages.
//!
//! Every chunk is `header + body`. Bodies that continue a previous chunk start
//! with `"... "` and bodies that are continued end with `" ..."`. All lengths
//! are counted in chars.

/// Discord's per-message content limit.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

const ELLIPSIS: &str = "...";
const LEADING_MARKER: &str = "... ";
const TRAILING_MARKER: &str = " ...";
const MARKER_LEN: usize = 4;

/// Smallest body that can hold both markers and still carry content.
const MIN_MARKED_BODY: usize = 2 * MARKER_LEN + 1;

/// Chunks `message` under `header` so every chunk fits [`DISCORD_MESSAGE_LIMIT`].
pub fn chunk_for_discord(header: &str, message: &str) -> Vec<String> {
    let max_body_length = DISCORD_MESSAGE_LIMIT.saturating_sub(char_len(header));
    split_message(header, message, max_body_length)
}

/// Splits `message` into chunks of at most `max_body_length` chars each,
/// prefixed with `header`. An empty message yields no chunks.
pub fn split_message(header: &str, message: &str, max_body_length: usize) -> Vec<String> {
    if max_body_length < MIN_MARKED_BODY {
        return split_raw(header, message, max_body_length.max(1));
    }

    let mut chunks = Vec::new();
    let mut remaining = message.to_string();

    while !remaining.is_empty() {
        let (mut body, mut remainder) = extract_chunk(&remaining, max_body_length);

        // Continuation text must shrink every round or a single unbroken word
        // would be re-wrapped in markers forever.
        if remaining.starts_with(ELLIPSIS)
            && !remainder.is_empty()
            && char_len(&remainder) >= char_len(&remaining)
        {
            (body, remainder) = force_split(&remaining, max_body_length);
        }

        chunks.push(format!("{header}{body}"));

        remaining = if !remainder.is_empty() && !remainder.starts_with(ELLIPSIS) {
            format!("{ELLIPSIS}{remainder}")
        } else {
            remainder
        };
    }

    chunks
}

/// Takes one chunk body off the front of `message` at a word boundary.
///
/// Returns `(body, remainder)`; the remainder is empty when the whole message
/// fits. A message exactly `max_length` long is treated as not fitting.
pub fn extract_chunk(message: &str, max_length: usize) -> (String, String) {
    let chars: Vec<char> = message.chars().collect();
    if chars.len() < max_length {
        return (message.to_string(), String::new());
    }

    if chars.len() == max_length {
        return placeholder(message);
    }

    let mut end = max_length.saturating_sub(MARKER_LEN);
    while end > 0 && chars[end] != ' ' {
        end -= 1;
    }

    if end == 0 {
        return placeholder(message);
    }

    split_at_boundary(&chars, end)
}

fn placeholder(message: &str) -> (String, String) {
    (ELLIPSIS.to_string(), format!("{LEADING_MARKER}{message}"))
}

fn split_at_boundary(chars: &[char], end: usize) -> (String, String) {
    let head: String = chars[..end].iter().collect();
    let tail: String = chars[end + 1..].iter().collect();
    (
        format!("{head}{TRAILING_MARKER}"),
        format!("{LEADING_MARKER}{tail}"),
    )
}

/// Splits continuation text that [`extract_chunk`] could not shorten: at the
/// last space past the leading marker, or mid-word when there is none.
fn force_split(remaining: &str, max_length: usize) -> (String, String) {
    let chars: Vec<char> = remaining.chars().collect();
    let limit = max_length - MARKER_LEN;

    match (MARKER_LEN..=limit).rev().find(|&index| chars[index] == ' ') {
        Some(end) => split_at_boundary(&chars, end),
        None => {
            let head: String = chars[..limit].iter().collect();
            let tail: String = chars[limit..].iter().collect();
            (
                format!("{head}{TRAILING_MARKER}"),
                format!("{LEADING_MARKER}{tail}"),
            )
        }
    }
}

fn split_raw(header: &str, message: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = message.chars().collect();
    chars
        .chunks(size)
        .map(|piece| format!("{header}{}", piece.iter().collect::<String>()))
        .collect()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

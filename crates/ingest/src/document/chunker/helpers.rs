//! Word splitting utilities used by the chunker.

/// Word count via whitespace splitting.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Group the words of `text` into consecutive windows of `max_words`
/// words (the last may be shorter) and rejoin each with single spaces.
/// `max_words == 0` is treated as 1.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words.max(1))
        .map(|window| window.join(" "))
        .collect()
}

/// Split `chunk` in halves until every piece has at most `limit` words.
/// When a piece has an odd word count the first half gets the extra word.
pub fn fit_to_limit(chunk: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let words: Vec<&str> = chunk.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut stack = vec![&words[..]];
    // Depth-first with the right half pushed first keeps pieces in order.
    while let Some(slice) = stack.pop() {
        if slice.len() <= limit {
            pieces.push(slice.join(" "));
        } else {
            let mid = slice.len().div_ceil(2);
            stack.push(&slice[mid..]);
            stack.push(&slice[..mid]);
        }
    }
    pieces
}

//! Input line splitting.

/// Splits an input line into words.
///
/// Surrounding whitespace is trimmed, then the line is split on single
/// spaces. Doubled spaces therefore produce empty words, and an empty line
/// produces a single empty word. Patterns requiring a word simply fail to
/// match it.
pub fn split_line(line: &str) -> Vec<&str> {
    line.trim().split(' ').collect()
}

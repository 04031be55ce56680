//! Positional matching of input words against pattern elements.
//!
//! Elements are walked by position:
//!
//! - A token must equal the word at the same position.
//! - A value captures the word at its position. When it is the last element it
//!   captures the rest of the line instead, joined with single spaces.
//! - An optional value with no word at its position completes the match with
//!   its key unset.
//!
//! Resolving a value ends the walk: elements after it are never evaluated. A
//! pattern made only of tokens matches once every token matched. Words left
//! over after the last token are ignored.

use parley_core::{Args, Element, ElementKind};

/// Matches `words` against `elements`.
///
/// Returns the captured arguments on success.
pub fn match_elements(elements: &[Element], words: &[&str]) -> Option<Args> {
    let last = elements.len().checked_sub(1)?;

    for (i, element) in elements.iter().enumerate() {
        match element.kind() {
            ElementKind::Token => {
                if words.get(i).copied() != Some(element.key()) {
                    return None;
                }
            }
            ElementKind::Value => {
                let mut args = Args::new();
                match words.get(i) {
                    Some(_) if i == last => args.insert(element.key(), words[i..].join(" ")),
                    Some(word) => args.insert(element.key(), *word),
                    None if element.is_optional() => {}
                    None => return None,
                }
                return Some(args);
            }
        }
    }

    Some(Args::new())
}

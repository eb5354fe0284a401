//! Directory-name predicates for the archive grammar.
//!
//! No regex: each rule is an explicit predicate over a documented character
//! set, so the accepted alphabet is visible in one place.

use std::collections::HashSet;

/// Letters accepted beyond ASCII: the umlauts and sharp s that occur in the
/// archive's author and title names.
const EXTRA_LETTERS: &[char] = &['ä', 'ö', 'ü', 'Ä', 'Ö', 'Ü', 'ß'];

/// Returns true if `c` is a letter of the archive alphabet.
fn is_archive_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || EXTRA_LETTERS.contains(&c)
}

/// Word characters for author names: letters plus `_`, `-` and `.`.
fn is_author_word_char(c: char) -> bool {
    is_archive_letter(c) || matches!(c, '_' | '-' | '.')
}

/// Level 1: a single letter of the archive alphabet, any case.
pub fn is_letter_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if is_archive_letter(c))
}

/// Level 2: at least two words separated by single spaces, each word built
/// from letters, `_`, `-` and `.`. Leading or trailing whitespace rejects
/// the whole name, as does an empty word (double space).
pub fn is_author_name(name: &str) -> bool {
    if name.is_empty() || name.trim() != name {
        return false;
    }
    let words: Vec<&str> = name.split(' ').collect();
    words.len() >= 2
        && words
            .iter()
            .all(|w| !w.is_empty() && w.chars().all(is_author_word_char))
}

/// The two ways an author name can fail, for distinct report messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorNameIssue {
    /// Contains a character outside the allowed set, or misplaced whitespace.
    InvalidChars,
    /// A single well-formed word; the required embedded space is missing.
    MissingSpace,
}

/// Classifies an invalid author name, `None` if the name is valid.
pub fn author_name_issue(name: &str) -> Option<AuthorNameIssue> {
    if is_author_name(name) {
        None
    } else if !name.contains(' ') && !name.is_empty() && name.chars().all(is_author_word_char) {
        Some(AuthorNameIssue::MissingSpace)
    } else {
        Some(AuthorNameIssue::InvalidChars)
    }
}

/// Level 3: letters, ASCII digits, spaces, `_`, `-` and `.` only. No
/// multi-word requirement.
pub fn is_title_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            is_archive_letter(c) || c.is_ascii_digit() || matches!(c, ' ' | '_' | '-' | '.')
        })
}

/// Case-insensitive comparison of the author's first character against the
/// letter directory's character.
pub fn author_starts_with_letter(author: &str, letter: &str) -> bool {
    match (author.chars().next(), letter.chars().next()) {
        (Some(a), Some(l)) => a.to_lowercase().eq(l.to_lowercase()),
        _ => false,
    }
}

/// Returns true if author and title share a word, case-insensitively.
///
/// Word tokens are compared, not raw substrings: author "Peter Lustig" with
/// title "Lustige Abenteuer" passes, while "Peter und der Wolf" fails
/// because the token "Peter" occurs in both names.
pub fn names_mutually_contained(author: &str, title: &str) -> bool {
    let author_words: HashSet<String> = author
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    title
        .split_whitespace()
        .any(|w| author_words.contains(&w.to_lowercase()))
}

/// Repair candidate for an invalid author name: underscores become spaces,
/// runs of whitespace collapse to one space, outer whitespace is trimmed.
///
/// Returns `Some` only when the result differs from the input and passes
/// [`is_author_name`], so callers can rename unconditionally on `Some`.
pub fn normalize_author_name(name: &str) -> Option<String> {
    let spaced = name.replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed != name && is_author_name(&collapsed) {
        Some(collapsed)
    } else {
        None
    }
}

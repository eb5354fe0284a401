//! Cross-sibling analysis of CD directory names.
//!
//! All CD directories of one title are analyzed jointly: every name must
//! carry a number, the numbers must form the sequence 1..N, and the names
//! must be identical once the number is removed.

use std::collections::HashSet;

/// Joint analysis result for one title's CD directories.
///
/// The three findings are independent; any combination can be set for the
/// same group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CdGroupAnalysis {
    /// Names without a contiguous digit run, in input order.
    pub missing_number: Vec<String>,
    /// The non-digit remainders differ between siblings after trimming and
    /// case-folding.
    pub inconsistent_bases: bool,
    /// The parsed numbers, sorted, are not exactly `1..=N`.
    pub non_contiguous: bool,
}

impl CdGroupAnalysis {
    /// Returns true if no finding is set.
    pub fn ok(&self) -> bool {
        self.missing_number.is_empty() && !self.inconsistent_bases && !self.non_contiguous
    }
}

/// Splits a name at its first contiguous run of ASCII digits.
///
/// Returns the name with the run removed and the parsed value. `None` if
/// the name has no digits; runs too long for `u64` count as unnumbered.
fn split_number(name: &str) -> Option<(String, u64)> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let run_len = name[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    let end = start + run_len;
    let value: u64 = name[start..end].parse().ok()?;
    let mut base = String::with_capacity(name.len() - run_len);
    base.push_str(&name[..start]);
    base.push_str(&name[end..]);
    Some((base, value))
}

/// Analyzes the CD directory names of one title.
///
/// Names without a number are excluded from the numeric sequence but still
/// contribute to the base-name set with their whole name, so a stray
/// `"Bonus"` next to `"CD01"` surfaces as both a missing number and an
/// inconsistent base.
pub fn analyze_cd_group<S: AsRef<str>>(names: &[S]) -> CdGroupAnalysis {
    let mut analysis = CdGroupAnalysis::default();
    let mut bases: HashSet<String> = HashSet::new();
    let mut numbers: Vec<u64> = Vec::new();

    for name in names {
        let name = name.as_ref();
        match split_number(name) {
            Some((base, value)) => {
                bases.insert(base.trim().to_lowercase());
                numbers.push(value);
            }
            None => {
                analysis.missing_number.push(name.to_string());
                bases.insert(name.trim().to_lowercase());
            }
        }
    }

    analysis.inconsistent_bases = bases.len() > 1;
    numbers.sort_unstable();
    analysis.non_contiguous = !numbers
        .iter()
        .enumerate()
        .all(|(i, &n)| n == i as u64 + 1);
    analysis
}

//! Name normalization for output file names.

/// Transliterations applied before the whitespace pass.
const REPLACEMENTS: &[(char, &str)] = &[
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('Ä', "Ae"),
    ('Ö', "Oe"),
    ('Ü', "Ue"),
    ('ß', "ss"),
    ('.', "_"),
];

/// Normalizes an author or title for use in a file name: umlauts and sharp
/// s are transliterated, periods and whitespace runs become underscores,
/// and underscore runs collapse to one.
///
/// `"Jörg Übel. Groß"` becomes `"Joerg_Uebel_Gross"`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if let Some((_, repl)) = REPLACEMENTS.iter().find(|(orig, _)| *orig == c) {
            out.push_str(repl);
        } else if c.is_whitespace() {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    // Collapse underscore runs produced by "word. word" and similar.
    let mut collapsed = String::with_capacity(out.len());
    let mut last_was_underscore = false;
    for c in out.chars() {
        if c == '_' {
            if !last_was_underscore {
                collapsed.push(c);
            }
            last_was_underscore = true;
        } else {
            collapsed.push(c);
            last_was_underscore = false;
        }
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transliterates_umlauts_and_sharp_s() {
        assert_eq!(normalize_name("Jörg Übel. Groß"), "Joerg_Uebel_Gross");
        assert_eq!(
            normalize_name("Das große Hörbuch. Teil 1"),
            "Das_grosse_Hoerbuch_Teil_1"
        );
    }

    #[test]
    fn collapses_underscore_runs() {
        assert_eq!(normalize_name("a  b"), "a_b");
        assert_eq!(normalize_name("a_ b"), "a_b");
        assert_eq!(normalize_name("a._b"), "a_b");
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(normalize_name("Max_Mustermann"), "Max_Mustermann");
        assert_eq!(normalize_name("Winnetou"), "Winnetou");
    }
}

use std::sync::OnceLock;

use regex::Regex;

fn punctuation() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\w\s]").expect("punctuation pattern compiles"))
}

fn class_year() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\bclass of ([0-9]{4})\b").expect("class-year pattern compiles")
    })
}

/// Canonical comparison key for a free-text name.
///
/// `"Tserakhava, Anastasiya - Class of 2026"` and `"tserakhava anastasiya class of 2026"`
/// both become `"anastasiya tserakhava class of 2026"`. The first word is taken as the
/// family name and moved to the end; a single word is left alone. Only the first
/// `class of YYYY` year is kept, but every occurrence is removed before reordering.
/// A name that is nothing but a class year yields `"class of YYYY"` without a
/// leading space, where a plain `" class of YYYY"` append would leave one.
pub fn normalize(raw: &str) -> String {
    let stripped = punctuation().replace_all(raw, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = collapsed.to_lowercase();

    let year = class_year()
        .captures(&lowered)
        .and_then(|captures| captures.get(1))
        .map(|year| year.as_str().to_string());
    let remainder = class_year().replace_all(&lowered, "");

    let reordered = reorder(remainder.trim());

    match year {
        Some(year) if reordered.is_empty() => format!("class of {year}"),
        Some(year) => format!("{reordered} class of {year}"),
        None => reordered,
    }
}

/// Flip "last, first" or "last first..." into "first... last".
///
/// Empty parts on either side of a comma are dropped.
fn reorder(name: &str) -> String {
    if let Some((last, first)) = name.split_once(',') {
        return [first.trim(), last.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    match words.split_first() {
        Some((last, rest)) if !rest.is_empty() => format!("{} {}", rest.join(" "), last),
        _ => words.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t "), "");
        assert_eq!(normalize("?!,."), "");
    }

    #[test]
    fn comma_separated_name_is_flipped() {
        assert_eq!(normalize("Smith, John"), "john smith");
    }

    #[test]
    fn space_separated_name_moves_first_word_last() {
        assert_eq!(normalize("John Smith"), "smith john");
        assert_eq!(normalize("Garcia Maria  Elena"), "maria elena garcia");
    }

    #[test]
    fn class_year_is_extracted_and_reappended() {
        assert_eq!(
            normalize("Tserakhava, Anastasiya - Class of 2026"),
            "anastasiya tserakhava class of 2026"
        );
        assert_eq!(
            normalize("CLASS OF 2025 Lee Ann"),
            "ann lee class of 2025"
        );
    }

    #[test]
    fn only_first_class_year_is_kept_but_all_are_removed() {
        assert_eq!(
            normalize("Doe Jane class of 2024 class of 2030"),
            "jane doe class of 2024"
        );
    }

    #[test]
    fn class_year_needs_four_digits_on_word_boundaries() {
        assert_eq!(normalize("Doe Jane class of 20245"), "jane class of 20245 doe");
        assert_eq!(normalize("Doe Jane class of 202"), "jane class of 202 doe");
    }

    #[test]
    fn single_word_is_only_cleaned() {
        assert_eq!(normalize("  O'Neil!  "), "oneil");
    }

    #[test]
    fn bare_class_year_survives() {
        assert_eq!(normalize("Class of 2026"), "class of 2026");
    }

    #[test]
    fn canonical_form_without_reordering_is_stable() {
        for name in ["smith", "oneil", ""] {
            assert_eq!(normalize(&normalize(name)), normalize(name));
        }
    }

    #[test]
    fn output_has_no_punctuation_or_uppercase() {
        let samples = [
            "McDonald, Ronald-James (Jr.) - Class of 1999",
            "ÉLODIE Dupré; class of 2020!!",
            "  ___ weird__input , , ,  ",
            "Ünïcödé Ñame",
        ];
        for sample in samples {
            let canonical = normalize(sample);
            assert!(
                canonical
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == ' '),
                "punctuation left in {canonical:?}"
            );
            assert!(
                !canonical.chars().any(char::is_uppercase),
                "uppercase left in {canonical:?}"
            );
        }
    }

    #[test]
    fn non_ascii_letters_are_kept() {
        assert_eq!(normalize("Dupré, Élodie"), "élodie dupré");
    }

    #[test]
    fn reorder_handles_commas_directly() {
        assert_eq!(reorder("smith, john"), "john smith");
        assert_eq!(reorder("van der berg, anna maria"), "anna maria van der berg");
        assert_eq!(reorder("smith,"), "smith");
        assert_eq!(reorder(", john"), "john");
        assert_eq!(reorder("a, b, c"), "b, c a");
    }
}

//! Program and category label normalization.
//!
//! Spreadsheets disagree on whether programs carry the `Program Studi `
//! prefix and whether D3 programs carry their ` (D3)` suffix. Every label is
//! rewritten to the canonical short form before grouping so both spellings
//! land in one bucket.

const PROGRAM_PREFIX: &str = "Program Studi ";
const LEVEL_PREFIX: &str = "Tingkat ";
const D3_SUFFIX: &str = " (D3)";

/// Program names that lose their D3 suffix in some exports.
const D3_PROGRAMS: [&str; 2] = ["Analis Kimia", "Kimia Industri"];

/// Canonical program label.
///
/// ```
/// use iku_model::normalize_program;
///
/// assert_eq!(normalize_program("Program Studi Kimia"), "Kimia");
/// assert_eq!(normalize_program("  Kimia "), "Kimia");
/// assert_eq!(normalize_program("Analis Kimia"), "Analis Kimia (D3)");
/// assert_eq!(normalize_program("Program Studi Kimia Industri D3"), "Kimia Industri (D3)");
/// ```
pub fn normalize_program(label: &str) -> String {
    let collapsed = collapse_whitespace(label);
    let stripped = strip_program_prefix(&collapsed);
    restore_d3_suffix(stripped)
}

/// Removes leading `Program Studi ` prefixes, if any.
pub fn strip_program_prefix(label: &str) -> &str {
    let mut label = label.trim();
    while let Some(rest) = label.strip_prefix(PROGRAM_PREFIX) {
        label = rest.trim_start();
    }
    label
}

/// Removes a leading `Tingkat ` prefix (`Tingkat Nasional` → `Nasional`).
pub fn strip_level_prefix(label: &str) -> &str {
    let label = label.trim();
    label
        .strip_prefix(LEVEL_PREFIX)
        .map(str::trim_start)
        .unwrap_or(label)
}

fn restore_d3_suffix(label: &str) -> String {
    for name in D3_PROGRAMS {
        if let Some(rest) = label.strip_prefix(name) {
            let marker = rest.trim().trim_start_matches('(').trim_end_matches(')');
            if rest.is_empty() || (rest.starts_with(' ') && marker.eq_ignore_ascii_case("d3")) {
                return format!("{name}{D3_SUFFIX}");
            }
        }
    }
    label.to_string()
}

fn collapse_whitespace(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prefix_and_bare_labels_merge() {
        assert_eq!(
            normalize_program("Program Studi Kimia"),
            normalize_program("Kimia")
        );
        assert_eq!(
            normalize_program("Program Studi  Teknik   Sipil"),
            "Teknik Sipil"
        );
    }

    #[test]
    fn d3_suffix_restored_only_for_known_programs() {
        assert_eq!(normalize_program("Kimia Industri"), "Kimia Industri (D3)");
        assert_eq!(
            normalize_program("Program Studi Analis Kimia (D3)"),
            "Analis Kimia (D3)"
        );
        assert_eq!(normalize_program("Analis Kimia Terapan"), "Analis Kimia Terapan");
        assert_eq!(normalize_program("Kimia"), "Kimia");
    }

    #[test]
    fn level_prefix() {
        assert_eq!(strip_level_prefix("Tingkat Nasional"), "Nasional");
        assert_eq!(strip_level_prefix("Internasional"), "Internasional");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(label in "(Program Studi )?(Analis Kimia|Kimia Industri|Kimia|Teknik [A-Z][a-z]{2,8})( \\(D3\\)| D3)?") {
            let once = normalize_program(&label);
            prop_assert_eq!(normalize_program(&once), once.clone());
        }

        #[test]
        fn normalization_is_idempotent_for_arbitrary_text(label in "\\PC{0,40}") {
            let once = normalize_program(&label);
            prop_assert_eq!(normalize_program(&once), once.clone());
        }
    }
}

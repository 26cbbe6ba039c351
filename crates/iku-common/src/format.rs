//! Number and label formatting shared by the aggregation and chart crates.

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use iku_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(20.14), "20.14");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage label used on bars: whole numbers print without decimals,
/// everything else with one decimal.
///
/// ```
/// use iku_common::format_percent_short;
///
/// assert_eq!(format_percent_short(40.0), "40");
/// assert_eq!(format_percent_short(33.33), "33.3");
/// ```
pub fn format_percent_short(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// `numerator/denominator` with both sides printed via [`format_numeric`].
pub fn format_fraction(numerator: f64, denominator: f64) -> String {
    format!(
        "{}/{}",
        format_numeric(numerator),
        format_numeric(denominator)
    )
}

/// Greedy word wrap. Words longer than `width` are split across lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(40.0), 40.0);
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction(4.0, 10.0), "4/10");
        assert_eq!(format_fraction(1.25, 2.0), "1.25/2");
    }

    #[test]
    fn test_wrap_text_program_labels() {
        assert_eq!(
            wrap_text("Teknik Pertambangan", 12),
            vec!["Teknik", "Pertambangan"]
        );
        assert_eq!(
            wrap_text("Analis Kimia (D3)", 12),
            vec!["Analis Kimia", "(D3)"]
        );
        assert_eq!(wrap_text("", 12), Vec::<String>::new());
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    proptest! {
        #[test]
        fn wrapped_lines_respect_width(text in "[a-z ]{0,80}", width in 1usize..20) {
            for line in wrap_text(&text, width) {
                prop_assert!(line.chars().count() <= width);
            }
        }

        #[test]
        fn wrapping_keeps_every_word(text in "[a-z]{1,8}( [a-z]{1,8}){0,10}") {
            let joined = wrap_text(&text, 40).join(" ");
            prop_assert_eq!(joined, text);
        }
    }
}

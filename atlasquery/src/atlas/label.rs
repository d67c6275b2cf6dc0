//! Region label text helpers.

use std::sync::OnceLock;

use regex::Regex;

use super::side::Side;

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid prefix pattern"))
}

/// Removes trailing `.` padding from a table label.
pub fn clean_label(label: &str) -> &str {
    label.trim_end_matches('.')
}

/// Turns a label into a token usable in a dataset prefix.
///
/// Purely numeric labels normalize to their integer value; any run of
/// characters other than letters, digits, `.`, `-` and `_` becomes one `_`.
pub fn clean_label_to_prefix(label: &str) -> String {
    let trimmed = label.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(value) = trimmed.parse::<i64>() {
            return value.to_string();
        }
    }
    prefix_pattern().replace_all(trimmed, "_").into_owned()
}

/// Text following the first `left` (else `right`), any case, minus
/// leading blanks. Labels without either word are returned unchanged.
pub fn strip_side(label: &str) -> &str {
    let lower = label.to_ascii_lowercase();
    let rest = match lower.find("left") {
        Some(at) => Some(at + "left".len()),
        None => lower.find("right").map(|at| at + "right".len()),
    };
    match rest {
        Some(start) => label[start..].trim_start(),
        None => label,
    }
}

/// Prefixes `Left ` or `Right `; other sides leave the label unchanged.
pub fn with_side(label: &str, side: Side) -> String {
    match side {
        Side::Left => format!("Left {}", label),
        Side::Right => format!("Right {}", label),
        Side::Both | Side::Unknown => label.to_string(),
    }
}

/// Side named by the first alphabetic run of a label.
pub fn label_side(label: &str) -> Side {
    let first_word: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_alphabetic())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_lowercase();
    // Leading digits make the first chunk numeric, which never names a side
    let starts_with_digit = label
        .chars()
        .find(|c| c.is_ascii_alphanumeric())
        .is_some_and(|c| c.is_ascii_digit());
    if starts_with_digit {
        Side::Unknown
    } else if first_word.starts_with("left") {
        Side::Left
    } else if first_word.starts_with("right") {
        Side::Right
    } else {
        Side::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_label_strips_dots() {
        assert_eq!(clean_label("Left  Hippocampus...."), "Left  Hippocampus");
        assert_eq!(clean_label("Area 4a"), "Area 4a");
        assert_eq!(clean_label("...."), "");
    }

    #[test]
    fn test_prefix_numeric() {
        assert_eq!(clean_label_to_prefix("0042"), "42");
        assert_eq!(clean_label_to_prefix(" 7 "), "7");
    }

    #[test]
    fn test_prefix_collapses_runs() {
        assert_eq!(
            clean_label_to_prefix("Left Superior  Temporal (Gyrus)"),
            "Left_Superior_Temporal_Gyrus_"
        );
        assert_eq!(clean_label_to_prefix("hOc1-v2.x"), "hOc1-v2.x");
    }

    #[test]
    fn test_strip_side() {
        assert_eq!(strip_side("Left Hippocampus"), "Hippocampus");
        assert_eq!(strip_side("RIGHT   Amygdala"), "Amygdala");
        assert_eq!(strip_side("Hippocampus"), "Hippocampus");
        // Left is searched before right
        assert_eq!(strip_side("Right Cleft"), "");
    }

    #[test]
    fn test_with_side() {
        assert_eq!(with_side("Insula", Side::Left), "Left Insula");
        assert_eq!(with_side("Insula", Side::Right), "Right Insula");
        assert_eq!(with_side("Insula", Side::Unknown), "Insula");
    }

    #[test]
    fn test_label_side() {
        assert_eq!(label_side("Left Hippocampus"), Side::Left);
        assert_eq!(label_side("right_amygdala"), Side::Right);
        assert_eq!(label_side("Cerebellum Left"), Side::Unknown);
        assert_eq!(label_side("12 Leftovers"), Side::Unknown);
        assert_eq!(label_side(""), Side::Unknown);
    }
}

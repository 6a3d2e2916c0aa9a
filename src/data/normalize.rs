//! Cell Normalization Module
//! Email/group cleaning, locale-decimal coercion and grade categories.

use std::fmt;

/// Group labels that pandas-style exports write for empty cells.
const PLACEHOLDER_GROUPS: [&str; 3] = ["nan", "none", "null"];

/// Qualitative bucket derived from a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Below 10
    Insufficient,
    /// [10, 12)
    Passing,
    /// [12, 14)
    FairlyGood,
    /// [14, 16)
    Good,
    /// 16 and above
    VeryGood,
    /// Missing or non-numeric score
    Undefined,
}

impl Category {
    /// The five buckets a numeric score can fall into, lowest first.
    pub const GRADED: [Category; 5] = [
        Category::Insufficient,
        Category::Passing,
        Category::FairlyGood,
        Category::Good,
        Category::VeryGood,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Insufficient => "Insufficient (<10)",
            Category::Passing => "Passing (10-12)",
            Category::FairlyGood => "Fairly good (12-14)",
            Category::Good => "Good (14-16)",
            Category::VeryGood => "Very good (>=16)",
            Category::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a score. Buckets are inclusive-low, exclusive-high.
pub fn categorize(score: Option<f64>) -> Category {
    let Some(note) = score else {
        return Category::Undefined;
    };

    if note.is_nan() {
        Category::Undefined
    } else if note < 10.0 {
        Category::Insufficient
    } else if note < 12.0 {
        Category::Passing
    } else if note < 14.0 {
        Category::FairlyGood
    } else if note < 16.0 {
        Category::Good
    } else {
        Category::VeryGood
    }
}

/// Convert a locale-formatted cell ("15,5", " 12 ") to a number.
///
/// Empty, unparsable and non-finite text is treated as missing.
pub fn convert_score(raw: &str) -> Option<f64> {
    let text = raw.replace(',', ".");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Emails match case-insensitively and ignore surrounding whitespace.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trimmed group label, or `None` for empty and placeholder values.
pub fn normalize_group(raw: &str) -> Option<String> {
    let label = raw.trim();
    if label.is_empty()
        || PLACEHOLDER_GROUPS
            .iter()
            .any(|p| label.eq_ignore_ascii_case(p))
    {
        None
    } else {
        Some(label.to_string())
    }
}

/// Header cleanup: surrounding whitespace and a UTF-8 byte order mark.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_comma_decimal() {
        assert_eq!(convert_score("15,5"), Some(15.5));
        assert_eq!(convert_score(" 12 "), Some(12.0));
        assert_eq!(convert_score("8.25"), Some(8.25));
        assert_eq!(convert_score("-1"), Some(-1.0));
        assert_eq!(convert_score("0,75"), "0.75".parse::<f64>().ok());
    }

    #[test]
    fn test_convert_non_numeric_is_missing() {
        assert_eq!(convert_score(""), None);
        assert_eq!(convert_score("   "), None);
        assert_eq!(convert_score("-"), None);
        assert_eq!(convert_score("ABS"), None);
        assert_eq!(convert_score("1,2,3"), None);
        assert_eq!(convert_score("nan"), None);
        assert_eq!(convert_score("inf"), None);
    }

    #[test]
    fn test_categorize_boundaries() {
        assert_eq!(categorize(Some(9.99)), Category::Insufficient);
        assert_eq!(categorize(Some(-1.0)), Category::Insufficient);
        assert_eq!(categorize(Some(10.0)), Category::Passing);
        assert_eq!(categorize(Some(11.999)), Category::Passing);
        assert_eq!(categorize(Some(12.0)), Category::FairlyGood);
        assert_eq!(categorize(Some(14.0)), Category::Good);
        assert_eq!(categorize(Some(15.5)), Category::Good);
        assert_eq!(categorize(Some(16.0)), Category::VeryGood);
        assert_eq!(categorize(Some(20.0)), Category::VeryGood);
    }

    #[test]
    fn test_categorize_missing() {
        assert_eq!(categorize(None), Category::Undefined);
        assert_eq!(categorize(Some(f64::NAN)), Category::Undefined);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Foo@Bar.COM "), "foo@bar.com");
        assert_eq!(normalize_email("foo@bar.com"), "foo@bar.com");
    }

    #[test]
    fn test_normalize_group() {
        assert_eq!(normalize_group(" G1 "), Some("G1".to_string()));
        assert_eq!(normalize_group(""), None);
        assert_eq!(normalize_group("  "), None);
        assert_eq!(normalize_group("nan"), None);
        assert_eq!(normalize_group("NaN"), None);
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}Email "), "Email");
        assert_eq!(normalize_header(" DS"), "DS");
    }
}

//! Field constraints: string formats, numeric bounds and length rules

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use validator::ValidateEmail;

/// National ID: 17 digits followed by a digit or checksum `X`
pub const ID_NUMBER_PATTERN: &str = r"^\d{17}[\dXx]$";

/// Mobile phone number: exactly 11 digits
pub const PHONE_PATTERN: &str = r"^\d{11}$";

static ID_NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

/// Named string formats shared by every record
///
/// ID numbers and phones are regular expressions; email addresses use the
/// `validator` crate's HTML5 rules, including internationalized domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    IdNumber,
    Phone,
    Email,
}

impl Pattern {
    /// Source text of the expression, for regex-backed formats
    pub fn source(&self) -> Option<&'static str> {
        match self {
            Self::IdNumber => Some(ID_NUMBER_PATTERN),
            Self::Phone => Some(PHONE_PATTERN),
            Self::Email => None,
        }
    }

    fn regex(cell: &'static OnceLock<Regex>, source: &'static str) -> &'static Regex {
        // The sources are constants covered by tests
        cell.get_or_init(|| Regex::new(source).expect("built-in pattern must compile"))
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::IdNumber => Self::regex(&ID_NUMBER_RE, ID_NUMBER_PATTERN).is_match(text),
            Self::Phone => Self::regex(&PHONE_RE, PHONE_PATTERN).is_match(text),
            Self::Email => text.to_owned().validate_email(),
        }
    }

    /// Rule text used in violation messages
    pub fn describe(&self) -> String {
        match self.source() {
            Some(source) => format!("must match {}", source),
            None => "must be a valid email address".to_string(),
        }
    }
}

/// Inclusive integer bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntRange {
    /// `x >= min`
    pub const fn at_least(min: i64) -> Self {
        Self { min: Some(min), max: None }
    }

    /// `min <= x <= max`
    pub const fn between(min: i64, max: i64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    pub fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("must satisfy {} <= x <= {}", min, max),
            (Some(min), None) => format!("must satisfy x >= {}", min),
            (None, Some(max)) => format!("must satisfy x <= {}", max),
            (None, None) => "must be an integer".to_string(),
        }
    }
}

/// A rule attached to a field, checked against the raw JSON value
///
/// Checks only judge values of the type they apply to; a value of the wrong
/// type passes here and is reported by type decoding instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Pattern(Pattern),
    Range(IntRange),
    MinLength(usize),
}

impl Check {
    /// Returns the rule description when the value breaks the rule
    pub fn apply(&self, value: &Value) -> Result<(), String> {
        match (self, value) {
            (Self::Pattern(pattern), Value::String(text)) => {
                if pattern.is_match(text) {
                    Ok(())
                } else {
                    Err(pattern.describe())
                }
            }
            (Self::Range(range), Value::Number(number)) => match number.as_i64() {
                Some(n) if !range.contains(n) => Err(range.describe()),
                _ => Ok(()),
            },
            (Self::MinLength(min), Value::String(text)) => {
                if text.chars().count() >= *min {
                    Ok(())
                } else {
                    Err(format!("must be at least {} character(s) long", min))
                }
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_number_pattern() {
        assert!(Pattern::IdNumber.is_match("11010119900307891X"));
        assert!(Pattern::IdNumber.is_match("110101199003078915"));
        assert!(Pattern::IdNumber.is_match("11010119900307891x"));
        assert!(!Pattern::IdNumber.is_match("11010119900307891Y"));
        assert!(!Pattern::IdNumber.is_match("130223199512******"));
        assert!(!Pattern::IdNumber.is_match("1101011990030789"));
    }

    #[test]
    fn phone_pattern() {
        assert!(Pattern::Phone.is_match("13800001111"));
        assert!(!Pattern::Phone.is_match("1380000111"));
        assert!(!Pattern::Phone.is_match("138000011112"));
        assert!(!Pattern::Phone.is_match("138-0000-111"));
    }

    #[test]
    fn email_pattern() {
        assert!(Pattern::Email.is_match("a@b.com"));
        assert!(Pattern::Email.is_match("first.last+tag@mail.example.cn"));
        assert!(!Pattern::Email.is_match("plainaddress"));
        assert!(!Pattern::Email.is_match("@b.com"));
        assert!(!Pattern::Email.is_match("a b@c.com"));
        assert!(!Pattern::Email.is_match("li@"));
    }

    #[test]
    fn email_accepts_internationalized_domains() {
        assert!(Pattern::Email.is_match("li@例子.中国"));
        assert!(Pattern::Email.is_match("wang@münchen.de"));
        assert_eq!(Pattern::Email.source(), None);
        assert_eq!(Pattern::Email.describe(), "must be a valid email address");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let years = IntRange::between(1900, 2100);
        assert!(!years.contains(1899));
        assert!(years.contains(1900));
        assert!(years.contains(2100));
        assert!(!years.contains(2101));
        assert_eq!(years.describe(), "must satisfy 1900 <= x <= 2100");
    }

    #[test]
    fn checks_ignore_values_of_other_types() {
        let check = Check::Range(IntRange::at_least(0));
        assert!(check.apply(&json!(-1)).is_err());
        assert!(check.apply(&json!("-1")).is_ok());

        assert!(Check::MinLength(1).apply(&json!("   ")).is_ok());
        assert!(Check::MinLength(1).apply(&json!("")).is_err());
        assert!(Check::MinLength(1).apply(&json!("rust")).is_ok());
    }
}

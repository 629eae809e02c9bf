//! Spelling numbers out as words.
//!
//! Integers and floats are spelled as cardinals. Strings are treated as
//! dot-segmented identifiers (`12.345.6`): every segment must be a run of
//! ASCII digits, each segment is spelled on its own and the pieces are joined
//! with the language's "point" word.

mod english;
mod russian;

use thiserror::Error;

/// Language used for spelled-out numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Russian,
    English,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Russian => "ru",
            Self::English => "en",
        }
    }

    /// Word placed between the segments of a dotted identifier.
    pub fn connector(&self) -> &'static str {
        match self {
            Self::Russian => russian::CONNECTOR,
            Self::English => english::CONNECTOR,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ru" | "rus" | "russian" => Ok(Self::Russian),
            "en" | "eng" | "english" => Ok(Self::English),
            _ => Err(format!("unknown language: {s}")),
        }
    }
}

/// A value that cannot be spelled out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("'{0}' contains symbols besides digits and periods")]
    InvalidIdentifier(String),

    #[error("'{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("{0} is not a finite number")]
    NotFinite(f64),

    #[error("{0} is too large to spell out")]
    OutOfRange(String),
}

/// Failure of the words step on a value that already passed field validation.
pub type ConversionError = FormatError;

/// Input accepted by [`to_words`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeral<'a> {
    Integer(i64),
    Float(f64),
    Text(&'a str),
}

impl From<i32> for Numeral<'_> {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Numeral<'_> {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Numeral<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<'a> From<&'a str> for Numeral<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

/// Spell `value` out in `language`.
pub fn to_words<'a>(
    value: impl Into<Numeral<'a>>,
    language: Language,
) -> Result<String, FormatError> {
    match value.into() {
        Numeral::Integer(n) => Ok(integer_words(n, language)),
        Numeral::Float(f) => float_words(f, language),
        Numeral::Text(s) => identifier_words(s, language),
    }
}

fn integer_words(n: i64, language: Language) -> String {
    let words = match language {
        Language::Russian => russian::cardinal(n.unsigned_abs()),
        Language::English => english::cardinal(n.unsigned_abs()),
    };
    if n < 0 { format!("{} {words}", minus(language)) } else { words }
}

fn float_words(value: f64, language: Language) -> Result<String, FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NotFinite(value));
    }

    // f64's Display never switches to exponent notation.
    let text = value.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    let whole = whole
        .parse::<i64>()
        .map(i64::unsigned_abs)
        .map_err(|_| FormatError::OutOfRange(value.to_string()))?;

    let words = match language {
        Language::Russian => russian::decimal(whole, fraction)
            .ok_or_else(|| FormatError::OutOfRange(value.to_string()))?,
        Language::English => english::decimal(whole, fraction),
    };

    if value < 0.0 { Ok(format!("{} {words}", minus(language))) } else { Ok(words) }
}

fn identifier_words(value: &str, language: Language) -> Result<String, FormatError> {
    let mut spelled = Vec::new();

    for segment in value.split('.') {
        if segment.is_empty() {
            return Err(FormatError::EmptySegment(value.to_string()));
        }
        if !segment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::InvalidIdentifier(value.to_string()));
        }
        let n: u64 =
            segment.parse().map_err(|_| FormatError::OutOfRange(segment.to_string()))?;
        spelled.push(match language {
            Language::Russian => russian::cardinal(n),
            Language::English => english::cardinal(n),
        });
    }

    let separator = format!(" {} ", language.connector());
    Ok(spelled.join(&separator))
}

fn minus(language: Language) -> &'static str {
    match language {
        Language::Russian => "минус",
        Language::English => "minus",
    }
}

//! Field type and schema definitions.

use regex::Regex;
use serde::Deserialize;

use super::errors::{DefinitionError, ValidationError};
use super::value::Value;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text, optionally constrained by a pattern.
    #[default]
    #[serde(alias = "str")]
    String,
    /// Whole number.
    #[serde(alias = "int")]
    Integer,
    /// Finite floating point number.
    Float,
    /// Integer or float, whichever the input parses as.
    #[serde(alias = "numeric")]
    Number,
    /// One of a fixed set of values.
    #[serde(alias = "enumeration")]
    Enum,
}

impl FieldType {
    /// Get the display name for this field type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Number => "number",
            Self::Enum => "enum",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Number)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "str" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "number" | "numeric" => Ok(Self::Number),
            "enum" | "enumeration" => Ok(Self::Enum),
            _ => Err(format!("unknown field type: {}", s)),
        }
    }
}

/// Schema for a single prompted field. Immutable once built.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: String,
    field_type: FieldType,
    pattern: Option<Regex>,
    description: Option<String>,
    example: Option<String>,
    default: Option<Value>,
    optional: bool,
    hidden: bool,
    min: Option<f64>,
    max: Option<f64>,
    values: Vec<String>,
}

impl FieldSchema {
    pub fn builder(name: impl Into<String>, field_type: FieldType) -> FieldBuilder {
        FieldBuilder {
            name: name.into(),
            field_type,
            pattern: None,
            description: None,
            example: None,
            default: None,
            optional: false,
            hidden: false,
            min: None,
            max: None,
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    /// The default, already validated when the field was built.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Hidden fields are collected but left out of the output map.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// A field is required when it has no default and is not optional.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.optional
    }

    /// Validate one raw operator answer.
    ///
    /// Empty input yields `Null` for optional fields and `Required` otherwise;
    /// defaults are resolved by the caller before this is reached.
    pub fn validate(&self, raw: &str) -> Result<Value, ValidationError> {
        if raw.is_empty() {
            return if self.optional { Ok(Value::Null) } else { Err(ValidationError::Required) };
        }

        if let Some(re) = &self.pattern {
            if !re.is_match(raw) {
                return Err(ValidationError::PatternMismatch {
                    value: raw.to_string(),
                    pattern: re.as_str().to_string(),
                });
            }
        }

        let value = self.coerce(raw)?;
        self.check_range(raw, &value)?;
        Ok(value)
    }

    /// Prompt line shown to the operator.
    ///
    /// `*` marks required fields; the example and default follow the
    /// description in parentheses.
    pub fn prompt_text(&self) -> String {
        let mut text = String::new();
        if self.is_required() {
            text.push('*');
        }
        text.push_str(self.description.as_deref().unwrap_or(&self.name));
        if self.field_type == FieldType::Enum && !self.values.is_empty() {
            text.push_str(&format!(" [{}]", self.values.join("/")));
        }
        if let Some(example) = &self.example {
            text.push_str(&format!(" (e.g. {example})"));
        }
        if let Some(default) = &self.default {
            text.push_str(&format!(" (default: {default})"));
        }
        text.push_str(": ");
        text
    }

    fn coerce(&self, raw: &str) -> Result<Value, ValidationError> {
        let mismatch = |expected| ValidationError::TypeMismatch { value: raw.to_string(), expected };

        match self.field_type {
            FieldType::String => Ok(Value::Text(raw.to_string())),
            FieldType::Integer => {
                raw.trim().parse::<i64>().map(Value::Integer).map_err(|_| mismatch("integer"))
            }
            FieldType::Float => parse_finite(raw).map(Value::Float).ok_or_else(|| mismatch("number")),
            FieldType::Number => match raw.trim().parse::<i64>() {
                Ok(n) => Ok(Value::Integer(n)),
                Err(_) => parse_finite(raw).map(Value::Float).ok_or_else(|| mismatch("number")),
            },
            FieldType::Enum => {
                if self.values.iter().any(|v| v == raw) {
                    Ok(Value::Text(raw.to_string()))
                } else {
                    Err(ValidationError::NotInEnum {
                        value: raw.to_string(),
                        allowed: self.values.clone(),
                    })
                }
            }
        }
    }

    fn check_range(&self, raw: &str, value: &Value) -> Result<(), ValidationError> {
        let Some(n) = value.as_f64() else {
            return Ok(());
        };
        if let Some(min) = self.min {
            if n < min {
                return Err(ValidationError::OutOfRange {
                    value: raw.to_string(),
                    reason: format!("must be at least {min}"),
                });
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(ValidationError::OutOfRange {
                    value: raw.to_string(),
                    reason: format!("must be at most {max}"),
                });
            }
        }
        Ok(())
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Typed builder for [`FieldSchema`]; `build` runs the definition checks.
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    name: String,
    field_type: FieldType,
    pattern: Option<String>,
    description: Option<String>,
    example: Option<String>,
    default: Option<String>,
    optional: bool,
    hidden: bool,
    min: Option<f64>,
    max: Option<f64>,
    values: Vec<String>,
}

impl FieldBuilder {
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Raw default, validated like operator input when the field is built.
    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<FieldSchema, DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::EmptyFieldName);
        }
        let invalid = |message: &str| DefinitionError::InvalidField {
            field: self.name.clone(),
            message: message.to_string(),
        };

        if self.field_type == FieldType::Enum && self.values.is_empty() {
            return Err(invalid("enum fields need at least one value"));
        }
        if self.field_type != FieldType::Enum && !self.values.is_empty() {
            return Err(invalid("only enum fields take values"));
        }
        if (self.min.is_some() || self.max.is_some()) && !self.field_type.is_numeric() {
            return Err(invalid("min/max only apply to numeric fields"));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(invalid("min is greater than max"));
            }
        }

        let pattern = match &self.pattern {
            Some(p) => Some(Regex::new(p).map_err(|e| DefinitionError::InvalidPattern {
                field: self.name.clone(),
                pattern: p.clone(),
                message: e.to_string(),
            })?),
            None => None,
        };

        let mut field = FieldSchema {
            name: self.name,
            field_type: self.field_type,
            pattern,
            description: self.description,
            example: self.example,
            default: None,
            optional: self.optional,
            hidden: self.hidden,
            min: self.min,
            max: self.max,
            values: self.values,
        };

        if let Some(raw) = self.default {
            let value = field.validate(&raw).map_err(|source| DefinitionError::InvalidDefault {
                field: field.name.clone(),
                default: raw.clone(),
                source,
            })?;
            field.default = Some(value);
        }

        Ok(field)
    }
}

use std::collections::HashSet;

use tracing::debug;

use crate::engine::{CollectError, CollectionEngine, OutputMap};
use crate::schema::{DefinitionError, FieldSchema, FieldType, GroupSchema, Record, Value};
use crate::words::{self, ConversionError, Language};

/// A group whose numeric or identifier fields are also spelled out in words.
#[derive(Debug, Clone)]
pub struct DerivableMarker {
    group: GroupSchema,
    pairs: Vec<(String, String)>,
}

impl DerivableMarker {
    /// Wrap `group` with ordered `(source field, result key)` pairs.
    pub fn new<I, S, T>(group: GroupSchema, pairs: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let marker = Self {
            group,
            pairs: pairs.into_iter().map(|(s, r)| (s.into(), r.into())).collect(),
        };
        marker.validate_definition()?;
        Ok(marker)
    }

    pub fn group(&self) -> &GroupSchema {
        &self.group
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Sources must be prompted fields of numeric or string type; result keys
    /// must be unique and must not shadow a group field.
    pub fn validate_definition(&self) -> Result<(), DefinitionError> {
        let offending: Vec<String> = self
            .pairs
            .iter()
            .filter(|(source, _)| !self.group.field(source).is_some_and(spellable))
            .map(|(source, _)| source.clone())
            .collect();
        if !offending.is_empty() {
            return Err(DefinitionError::InvalidDerivable {
                group: self.group.name().to_string(),
                fields: offending,
            });
        }

        let mut seen = HashSet::new();
        for (_, result) in &self.pairs {
            if !seen.insert(result.as_str()) || self.group.has_field(result) {
                return Err(DefinitionError::DuplicateField {
                    group: self.group.name().to_string(),
                    field: result.clone(),
                });
            }
        }
        Ok(())
    }

    /// Rejects a collected value that cannot be spelled out, so the engine
    /// asks for it again.
    pub fn check(&self, field: &FieldSchema, value: &Value, language: Language) -> Result<(), String> {
        if self.pairs.iter().any(|(source, _)| source == field.name()) {
            convert(value, language).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    /// Spell out every source of an already collected record.
    pub fn derive(&self, record: &Record, language: Language) -> Result<OutputMap, CollectError> {
        let mut out = OutputMap::new();
        for (source, result) in &self.pairs {
            let words = match record.get(source) {
                Some(value) => convert(value, language).map_err(|e| CollectError::Conversion {
                    field: source.clone(),
                    source: e,
                })?,
                None => Value::Null,
            };
            out.insert(result.clone(), words);
        }
        Ok(out)
    }

    /// One cycle over the group plus its spelled-out results.
    pub fn collect(&self, engine: &mut CollectionEngine<'_>) -> Result<OutputMap, CollectError> {
        let language = engine.options().language;
        let record = engine
            .collect_group_checked(&self.group, &|field, value| self.check(field, value, language))?;

        let mut out = OutputMap::from(self.group.visible(&record));
        out.merge(self.derive(&record, language)?);
        debug!(group = self.group.name(), results = self.pairs.len(), "words derived");
        Ok(out)
    }
}

fn spellable(field: &FieldSchema) -> bool {
    field.field_type().is_numeric() || field.field_type() == FieldType::String
}

fn convert(value: &Value, language: Language) -> Result<Value, ConversionError> {
    let words = match value {
        Value::Null => return Ok(Value::Null),
        Value::Integer(n) => words::to_words(*n, language)?,
        Value::Float(f) => words::to_words(*f, language)?,
        Value::Text(s) => words::to_words(s.as_str(), language)?,
        Value::List(_) => return Err(ConversionError::InvalidIdentifier(value.to_string())),
    };
    Ok(Value::Text(words))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineOptions, LinePrompter};

    fn object() -> GroupSchema {
        GroupSchema::new(
            "object",
            vec![
                FieldSchema::builder("apart_no", FieldType::String).build().unwrap(),
                FieldSchema::builder("area", FieldType::Float).build().unwrap(),
                FieldSchema::builder("floor", FieldType::Integer).optional(true).build().unwrap(),
                FieldSchema::builder("kind", FieldType::Enum).values(["flat", "house"]).build().unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_unspellable_sources() {
        let err = DerivableMarker::new(object(), [("kind", "kind_words"), ("nope", "x")]).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::InvalidDerivable {
                group: "object".into(),
                fields: vec!["kind".into(), "nope".into()]
            }
        );
    }

    #[test]
    fn rejects_duplicate_or_shadowing_results() {
        assert!(DerivableMarker::new(object(), [("area", "w"), ("apart_no", "w")]).is_err());
        assert!(DerivableMarker::new(object(), [("area", "apart_no")]).is_err());
    }

    #[test]
    fn one_result_per_pair_even_for_shared_source() {
        let marker =
            DerivableMarker::new(object(), [("area", "area_words"), ("area", "area_words_2")])
                .unwrap();
        let record: Record = [("area".to_string(), Value::Float(1.5))].into_iter().collect();
        let out = marker.derive(&record, Language::English).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.get("area_words"), Some(&Value::from("one point five")));
        assert_eq!(out.get("area_words_2"), Some(&Value::from("one point five")));
    }

    #[test]
    fn optional_empty_source_yields_null() {
        let marker = DerivableMarker::new(object(), [("floor", "floor_words")]).unwrap();
        let record: Record = [("floor".to_string(), Value::Null)].into_iter().collect();
        let out = marker.derive(&record, Language::Russian).unwrap();
        assert_eq!(out.get("floor_words"), Some(&Value::Null));
    }

    #[test]
    fn unspellable_identifier_is_reasked() {
        let marker = DerivableMarker::new(object(), [("apart_no", "apart_no_words")]).unwrap();
        let input = "12a\n12.5\n40.2\n\nflat\n";
        let mut prompter = LinePrompter::new(input.as_bytes(), Vec::new());
        let options = EngineOptions { language: Language::English, ..EngineOptions::default() };
        let out = {
            let mut engine = CollectionEngine::new(&mut prompter, options);
            marker.collect(&mut engine).unwrap()
        };

        assert_eq!(out.get("apart_no"), Some(&Value::from("12.5")));
        assert_eq!(out.get("apart_no_words"), Some(&Value::from("twelve point five")));
        assert_eq!(out.get("floor"), Some(&Value::Null));

        let (_, transcript) = prompter.into_inner();
        let transcript = String::from_utf8(transcript).unwrap();
        assert!(transcript.contains("apart_no: '12a' contains symbols besides digits and periods"));
    }
}

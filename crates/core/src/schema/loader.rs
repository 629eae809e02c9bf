//! Loading `schema.yaml` and the shared group library into collection units.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::computed::{ComputedField, ComputedRule};
use super::errors::DefinitionError;
use super::field::{FieldSchema, FieldType};
use super::group::GroupSchema;
use crate::markers::{CollectionUnit, DerivableMarker, RepeatableMarker};

#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("failed to read schema file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse YAML in {0}: {1}")]
    ParseError(String, #[source] serde_yaml::Error),

    #[error("invalid schema in {0}: {1}")]
    Definition(String, #[source] DefinitionError),
}

impl SchemaLoadError {
    /// The schema was read but is inconsistent.
    pub fn is_definition_error(&self) -> bool {
        matches!(self, Self::Definition(..))
    }
}

/// Raw contents of a template's `schema.yaml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub groups: BTreeMap<String, GroupDecl>,
    #[serde(default)]
    pub units: Vec<UnitDecl>,
}

/// Raw contents of the shared `groups.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupLibrary {
    #[serde(default)]
    pub groups: BTreeMap<String, GroupDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDecl {
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub computed: Vec<ComputedDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub example: Option<Scalar>,
    #[serde(default)]
    pub default: Option<Scalar>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub values: Vec<Scalar>,
}

/// A YAML scalar taken as the text the operator would type.
///
/// YAML reads an unquoted `1.50` as the number 1.5, so decimals meant as
/// exact text must be quoted. Non-numeric fields reject unquoted decimals.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComputedDecl {
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub map: Option<MapDecl>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub sum: Option<SumDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapDecl {
    pub source: String,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SumDecl {
    pub fields: Vec<String>,
    #[serde(default = "default_precision")]
    pub precision: u32,
}

fn default_precision() -> u32 {
    2
}

/// One entry of `units`; exactly one key must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitDecl {
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub repeat: Option<RepeatDecl>,
    #[serde(default)]
    pub words: Option<WordsDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepeatDecl {
    pub group: String,
    pub field: String,
    pub result: String,
    pub description: String,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

fn default_min_count() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WordsDecl {
    pub group: String,
    /// Source field to result key, in declaration order.
    pub fields: serde_yaml::Mapping,
}

/// A fully validated template schema, ready for the engine.
#[derive(Debug, Clone)]
pub struct TemplateSchema {
    pub description: Option<String>,
    pub units: Vec<CollectionUnit>,
}

/// Load the shared group library. A missing file is an empty library.
pub fn load_group_library(path: &Path) -> Result<GroupLibrary, SchemaLoadError> {
    if !path.exists() {
        debug!(path = %path.display(), "no group library");
        return Ok(GroupLibrary::default());
    }
    let s = fs::read_to_string(path)
        .map_err(|e| SchemaLoadError::ReadError(path.display().to_string(), e))?;
    serde_yaml::from_str(&s)
        .map_err(|e| SchemaLoadError::ParseError(path.display().to_string(), e))
}

/// Read, parse and validate one `schema.yaml` against `library`.
pub fn load_template_schema(
    path: &Path,
    library: &GroupLibrary,
) -> Result<TemplateSchema, SchemaLoadError> {
    let s = fs::read_to_string(path)
        .map_err(|e| SchemaLoadError::ReadError(path.display().to_string(), e))?;
    let file: SchemaFile = serde_yaml::from_str(&s)
        .map_err(|e| SchemaLoadError::ParseError(path.display().to_string(), e))?;
    file.build(library)
        .map_err(|e| SchemaLoadError::Definition(path.display().to_string(), e))
}

impl SchemaFile {
    pub fn parse(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    /// Resolve groups and build every unit. Local groups shadow library
    /// groups of the same name.
    pub fn build(&self, library: &GroupLibrary) -> Result<TemplateSchema, DefinitionError> {
        if self.units.is_empty() {
            return Err(DefinitionError::NoUnits);
        }

        let mut resolver = GroupResolver::new(&self.groups, &library.groups);
        let mut units = Vec::with_capacity(self.units.len());
        for (index, decl) in self.units.iter().enumerate() {
            let unit = build_unit(index, decl, &mut resolver)?;
            unit.validate_definition()?;
            units.push(unit);
        }

        Ok(TemplateSchema { description: self.description.clone(), units })
    }
}

fn build_unit(
    index: usize,
    decl: &UnitDecl,
    resolver: &mut GroupResolver<'_>,
) -> Result<CollectionUnit, DefinitionError> {
    let invalid = |message: &str| DefinitionError::InvalidUnit { index, message: message.to_string() };

    match (&decl.group, &decl.repeat, &decl.words) {
        (Some(name), None, None) => Ok(CollectionUnit::Group(resolver.resolve(name)?)),
        (None, Some(repeat), None) => {
            let group = resolver.resolve(&repeat.group)?;
            let marker = RepeatableMarker::new(
                group,
                repeat.field.as_str(),
                repeat.result.as_str(),
                repeat.description.as_str(),
            )?
            .with_min_count(repeat.min_count)?;
            Ok(CollectionUnit::Repeatable(marker))
        }
        (None, None, Some(words)) => {
            if words.fields.is_empty() {
                return Err(invalid("words unit needs at least one field"));
            }
            let mut pairs = Vec::with_capacity(words.fields.len());
            for (source, result) in &words.fields {
                match (source.as_str(), result.as_str()) {
                    (Some(s), Some(r)) => pairs.push((s.to_string(), r.to_string())),
                    _ => return Err(invalid("words fields must map names to names")),
                }
            }
            let group = resolver.resolve(&words.group)?;
            Ok(CollectionUnit::Derivable(DerivableMarker::new(group, pairs)?))
        }
        _ => Err(invalid("expected exactly one of group, repeat, words")),
    }
}

/// Turns group declarations into [`GroupSchema`]s, following `extends`.
struct GroupResolver<'a> {
    local: &'a BTreeMap<String, GroupDecl>,
    library: &'a BTreeMap<String, GroupDecl>,
    resolved: HashMap<String, GroupSchema>,
    visiting: Vec<String>,
}

impl<'a> GroupResolver<'a> {
    fn new(
        local: &'a BTreeMap<String, GroupDecl>,
        library: &'a BTreeMap<String, GroupDecl>,
    ) -> Self {
        Self { local, library, resolved: HashMap::new(), visiting: Vec::new() }
    }

    fn resolve(&mut self, name: &str) -> Result<GroupSchema, DefinitionError> {
        if let Some(group) = self.resolved.get(name) {
            return Ok(group.clone());
        }
        if self.visiting.iter().any(|v| v == name) {
            return Err(DefinitionError::InheritanceCycle(name.to_string()));
        }

        let (local, library) = (self.local, self.library);
        let decl = local
            .get(name)
            .or_else(|| library.get(name))
            .ok_or_else(|| DefinitionError::UnknownGroup(name.to_string()))?;

        self.visiting.push(name.to_string());
        let parents = decl
            .extends
            .iter()
            .map(|parent| self.resolve(parent))
            .collect::<Result<Vec<_>, _>>();
        self.visiting.pop();
        let parents = parents?;

        let fields = decl.fields.iter().map(build_field).collect::<Result<Vec<_>, _>>()?;
        let computed = decl
            .computed
            .iter()
            .map(|c| build_computed(name, c))
            .collect::<Result<Vec<_>, _>>()?;

        let group = GroupSchema::compose(name, &parents, fields, computed)?;
        debug!(group = name, fields = group.fields().len(), "group resolved");
        self.resolved.insert(name.to_string(), group.clone());
        Ok(group)
    }
}

fn build_field(decl: &FieldDecl) -> Result<FieldSchema, DefinitionError> {
    let values = decl
        .values
        .iter()
        .map(|v| scalar_text(decl, "value", v))
        .collect::<Result<Vec<_>, _>>()?;
    let mut builder = FieldSchema::builder(decl.name.as_str(), decl.field_type)
        .optional(decl.optional)
        .hidden(decl.hidden)
        .values(values);

    if let Some(pattern) = &decl.pattern {
        builder = builder.pattern(pattern.as_str());
    }
    if let Some(description) = &decl.description {
        builder = builder.description(description.as_str());
    }
    if let Some(example) = &decl.example {
        builder = builder.example(scalar_text(decl, "example", example)?);
    }
    if let Some(default) = &decl.default {
        builder = builder.default(scalar_text(decl, "default", default)?);
    }
    if let Some(min) = decl.min {
        builder = builder.min(min);
    }
    if let Some(max) = decl.max {
        builder = builder.max(max);
    }
    builder.build()
}

fn scalar_text(decl: &FieldDecl, key: &str, scalar: &Scalar) -> Result<String, DefinitionError> {
    match scalar {
        Scalar::Float(x) if !decl.field_type.is_numeric() => Err(DefinitionError::InvalidField {
            field: decl.name.clone(),
            message: format!("{key} {x} is read as a number; quote it to keep the exact text"),
        }),
        other => Ok(other.to_string()),
    }
}

fn build_computed(group: &str, decl: &ComputedDecl) -> Result<ComputedField, DefinitionError> {
    let rule = match (&decl.map, &decl.format, &decl.sum) {
        (Some(map), None, None) => {
            ComputedRule::Map { source: map.source.clone(), values: map.values.clone() }
        }
        (None, Some(template), None) => ComputedRule::Format { template: template.clone() },
        (None, None, Some(sum)) => {
            ComputedRule::Sum { fields: sum.fields.clone(), precision: sum.precision }
        }
        _ => {
            return Err(DefinitionError::InvalidField {
                field: format!("{group}.{}", decl.name),
                message: "computed field needs exactly one of map, format, sum".to_string(),
            });
        }
    };
    Ok(ComputedField::new(decl.name.as_str(), rule).hidden(decl.hidden))
}

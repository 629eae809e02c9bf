//! Declarative description of what gets collected.

pub mod computed;
pub mod errors;
pub mod field;
pub mod group;
pub mod loader;
pub mod value;

pub use computed::{ComputedField, ComputedRule};
pub use errors::{ComputationError, DefinitionError, ValidationError};
pub use field::{FieldBuilder, FieldSchema, FieldType};
pub use group::GroupSchema;
pub use loader::{
    GroupLibrary, SchemaFile, SchemaLoadError, TemplateSchema, load_group_library,
    load_template_schema,
};
pub use value::{Record, Value};

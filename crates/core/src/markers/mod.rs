//! Augmentations layered on plain groups, and the unit type the engine consumes.

mod derivable;
mod repeatable;

pub use derivable::DerivableMarker;
pub use repeatable::RepeatableMarker;

use crate::schema::{DefinitionError, GroupSchema};

/// One step of a collection run.
#[derive(Debug, Clone)]
pub enum CollectionUnit {
    /// Collected once; non-hidden values merged under their own names.
    Group(GroupSchema),
    /// Collected N times; one field extracted into a list.
    Repeatable(RepeatableMarker),
    /// Collected once; selected fields also spelled out in words.
    Derivable(DerivableMarker),
}

impl CollectionUnit {
    /// The wrapped group.
    pub fn group(&self) -> &GroupSchema {
        match self {
            Self::Group(group) => group,
            Self::Repeatable(marker) => marker.group(),
            Self::Derivable(marker) => marker.group(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Repeatable(_) => "repeat",
            Self::Derivable(_) => "words",
        }
    }

    /// One-line summary used by `check`.
    pub fn describe(&self) -> String {
        let fields: Vec<&str> = self.group().fields().iter().map(|f| f.name()).collect();
        let base = format!("{} {} ({})", self.kind(), self.group().name(), fields.join(", "));
        match self {
            Self::Group(_) => base,
            Self::Repeatable(m) => format!(
                "{base} -> {}[] from {} (min {})",
                m.result(),
                m.field(),
                m.min_count()
            ),
            Self::Derivable(m) => {
                let pairs: Vec<String> =
                    m.pairs().iter().map(|(s, r)| format!("{s} -> {r}")).collect();
                format!("{base} -> {}", pairs.join(", "))
            }
        }
    }

    pub fn validate_definition(&self) -> Result<(), DefinitionError> {
        match self {
            Self::Group(_) => Ok(()),
            Self::Repeatable(marker) => marker.validate_definition(),
            Self::Derivable(marker) => marker.validate_definition(),
        }
    }
}

//! Named row fields

use serde::{Deserialize, Serialize};

/// One column of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field value
    pub value: String,
}

impl Field {
    /// Create a field.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Field {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// Keep only the fields whose names appear in `names`, in stored order.
pub fn project(row: Vec<Field>, names: &[String]) -> Vec<Field> {
    row.into_iter()
        .filter(|field| names.iter().any(|name| *name == field.name))
        .collect()
}

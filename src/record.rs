//! Record - one user entry in the remote `/users` collection.
//!
//! The same type doubles as the edit form's draft: a record without an id is
//! new (not yet persisted), a record with an id is existing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SessionError;

/// Backend-assigned identifier.
///
/// REST backends in the json-server family hand out either numbers or
/// strings. The original JSON shape is kept so it serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// A user record: name, age and profession.
///
/// Age is numeric but entered and carried as text; no client-side
/// validation is applied to any field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub profession: String,
}

impl Record {
    /// Create a new (not yet persisted) record.
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        profession: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            age: age.into(),
            profession: profession.into(),
        }
    }

    /// Attach a backend id, turning this into an existing record.
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// True when the backend has not assigned an id yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Age => &self.age,
            Field::Profession => &self.profession,
        }
    }

    /// Overwrite exactly one field, leaving the others untouched.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Age => &mut self.age,
            Field::Profession => &mut self.profession,
        };
        *slot = value.into();
    }
}

/// An editable field of a record, addressed by its form name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Age,
    Profession,
}

impl Field {
    /// Form order.
    pub const ALL: [Field; 3] = [Field::Name, Field::Age, Field::Profession];

    /// The form field name (`"name"`, `"age"`, `"profession"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Age => "age",
            Field::Profession => "profession",
        }
    }

    /// Human-facing label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Age => "Age",
            Field::Profession => "Profession",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "age" => Ok(Field::Age),
            "profession" => Ok(Field::Profession),
            _ => Err(SessionError::UnknownField(s.to_string())),
        }
    }
}

/// Accept a JSON string, number or null as text.
///
/// Backends echo back whatever was posted, so `age` may arrive as `"30"` or `30`.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
        Some(Raw::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}

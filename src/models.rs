// src/models.rs

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Identifiers ---

/// Opaque document identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reference to a document in another collection, stored as `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocRef {
    pub collection: String,
    pub id: DocId,
}

impl DocRef {
    pub fn new(collection: impl Into<String>, id: DocId) -> Self {
        DocRef {
            collection: collection.into(),
            id,
        }
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}

impl TryFrom<String> for DocRef {
    type Error = String;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        match path.split_once('/') {
            Some((collection, id))
                if !collection.is_empty() && !id.is_empty() && !id.contains('/') =>
            {
                Ok(DocRef::new(collection, DocId::new(id)))
            }
            _ => Err(format!("invalid document reference: {path:?}")),
        }
    }
}

impl From<DocRef> for String {
    fn from(r: DocRef) -> Self {
        r.path()
    }
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Unattempted,
    Attempted,
    Solved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unattempted => "unattempted",
            Status::Attempted => "attempted",
            Status::Solved => "solved",
        }
    }

    /// Capitalized display form.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Unattempted => LABEL_UNATTEMPTED,
            Status::Attempted => LABEL_ATTEMPTED,
            Status::Solved => LABEL_SOLVED,
        }
    }

    pub fn color_class(&self) -> &'static str {
        match self {
            Status::Unattempted => COLOR_RED,
            Status::Attempted => COLOR_YELLOW,
            Status::Solved => COLOR_GREEN,
        }
    }
}

/// Stored as its ordinal: easy=0, medium=1, hard=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    #[default]
    Easy = 0,
    Medium = 1,
    Hard = 2,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => LABEL_EASY,
            Difficulty::Medium => LABEL_MEDIUM,
            Difficulty::Hard => LABEL_HARD,
        }
    }

    pub fn color_class(&self) -> &'static str {
        match self {
            Difficulty::Easy => COLOR_GREEN,
            Difficulty::Medium => COLOR_YELLOW,
            Difficulty::Hard => COLOR_RED,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Difficulty::Easy),
            1 => Ok(Difficulty::Medium),
            2 => Ok(Difficulty::Hard),
            other => Err(format!("difficulty out of range: {other}")),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d as u8
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "easy" => Ok(Difficulty::Easy),
            "1" | "medium" => Ok(Difficulty::Medium),
            "2" | "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

// --- Records ---

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl TestCase {
    /// The explanation, if it has any visible text.
    pub fn visible_explanation(&self) -> Option<&str> {
        self.explanation.as_deref().filter(|e| !e.is_empty())
    }
}

/// A document in `problems`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    pub status: Status,
    pub problem_name: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub list: String,
    // Absent until the create flow links the meta document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DocRef>,
}

/// The editable body of a document in `problems_meta`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetaContent {
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub input_format: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default)]
    pub constraints: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// A document in `problems_meta`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetaRecord {
    // Informational only; lookups always go through `ProblemRecord::meta`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<DocId>,
    #[serde(flatten)]
    pub content: MetaContent,
}

/// Fields written to an existing problem by the edit flow.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemPatch {
    pub problem_name: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub list: String,
}

/// Links a problem to its meta document.
#[derive(Serialize, Debug, Clone)]
pub struct MetaLink {
    pub meta: DocRef,
}

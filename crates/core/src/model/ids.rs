use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when a subject or deck file name is unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NameError {
    #[error("{kind} name cannot be empty")]
    Empty { kind: &'static str },

    #[error("{kind} name cannot contain path separators: {raw}")]
    PathSeparator { kind: &'static str, raw: String },

    #[error("{kind} name cannot be a relative path component: {raw}")]
    Relative { kind: &'static str, raw: String },
}

fn validate(kind: &'static str, raw: String) -> Result<String, NameError> {
    if raw.trim().is_empty() {
        return Err(NameError::Empty { kind });
    }
    if raw.contains(['/', '\\']) {
        return Err(NameError::PathSeparator { kind, raw });
    }
    if raw == "." || raw == ".." {
        return Err(NameError::Relative { kind, raw });
    }
    Ok(raw)
}

/// Name of a subject, i.e. one directory of decks. Progress is keyed by it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectName(String);

impl SubjectName {
    /// # Errors
    ///
    /// Returns `NameError` if the name is blank or would escape its directory.
    pub fn new(raw: impl Into<String>) -> Result<Self, NameError> {
        validate("subject", raw.into()).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of a single deck file inside a subject, e.g. `basics.json`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeckFileName(String);

impl DeckFileName {
    /// # Errors
    ///
    /// Returns `NameError` if the name is blank or would escape its directory.
    pub fn new(raw: impl Into<String>) -> Result<Self, NameError> {
        validate("deck file", raw.into()).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubjectName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectName> for String {
    fn from(value: SubjectName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DeckFileName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeckFileName> for String {
    fn from(value: DeckFileName) -> Self {
        value.0
    }
}

impl FromStr for SubjectName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for DeckFileName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for SubjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectName({:?})", self.0)
    }
}

impl fmt::Debug for DeckFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeckFileName({:?})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for SubjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DeckFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_name_display() {
        let subject = SubjectName::new("biology").unwrap();
        assert_eq!(subject.to_string(), "biology");
    }

    #[test]
    fn subject_name_rejects_blank() {
        let err = SubjectName::new("   ").unwrap_err();
        assert_eq!(err, NameError::Empty { kind: "subject" });
    }

    #[test]
    fn deck_file_name_rejects_traversal() {
        assert!(matches!(
            "../secrets.json".parse::<DeckFileName>(),
            Err(NameError::PathSeparator { .. })
        ));
        assert!(matches!(
            "..".parse::<DeckFileName>(),
            Err(NameError::Relative { .. })
        ));
    }

    #[test]
    fn subject_name_deserializes_through_validation() {
        let ok: SubjectName = serde_json::from_str("\"chemistry\"").unwrap();
        assert_eq!(ok.as_str(), "chemistry");

        let bad = serde_json::from_str::<SubjectName>("\"\"");
        assert!(bad.is_err());
    }
}

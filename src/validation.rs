//! Field-level errors for request bodies that fail validation.

use std::fmt::Display;

use serde::Serialize;

/// The kind of problem found with a field in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field was not present.
    Missing,
    /// The value could not be read as an exact decimal number.
    DecimalParsing,
    /// The value was not a string.
    StringType,
    /// The value was a string, but an empty one.
    StringTooShort,
    /// The body was not valid JSON or not a JSON object.
    JsonInvalid,
}

impl FieldErrorKind {
    fn default_message(self) -> &'static str {
        match self {
            FieldErrorKind::Missing => "Field required",
            FieldErrorKind::DecimalParsing => "Input should be a valid decimal",
            FieldErrorKind::StringType => "Input should be a valid string",
            FieldErrorKind::StringTooShort => "String should have at least 1 character",
            FieldErrorKind::JsonInvalid => "Input should be a valid JSON object",
        }
    }
}

/// A single problem with a request body.
///
/// Serializes as `{"loc": ["body", "amount"], "msg": "...", "type": "missing"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Where the problem is, starting with `"body"` followed by the field name.
    pub loc: Vec<String>,
    /// A human readable description of the problem.
    pub msg: String,
    /// A machine readable description of the problem.
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Create an error for `field` with the default message for `kind`.
    pub fn new(field: &str, kind: FieldErrorKind) -> Self {
        Self {
            loc: vec!["body".to_owned(), field.to_owned()],
            msg: kind.default_message().to_owned(),
            kind,
        }
    }

    /// Create an error about the request body as a whole.
    pub fn body(kind: FieldErrorKind, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_owned()],
            msg: msg.into(),
            kind,
        }
    }

    /// The name of the offending field, if the error is about a single field.
    pub fn field(&self) -> Option<&str> {
        self.loc.get(1).map(String::as_str)
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.loc.join("."), self.msg)
    }
}

/// All the problems found in one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Record another problem.
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Whether no problems have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the recorded problems.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(value: Vec<FieldError>) -> Self {
        Self(value)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let errors: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", errors.join("; "))
    }
}

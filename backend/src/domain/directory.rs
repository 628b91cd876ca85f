//! Personnel directory records and the substring search over them.
//!
//! Records are created through [`NewDirectoryRecord`], which validates the
//! submitted fields, and receive their [`RecordId`] from the record store.
//! Nothing in the domain updates or deletes a record.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Submitted record fields, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// Full name.
    Name,
    /// Department.
    Department,
    /// Work email address.
    Email,
    /// Phone number.
    Phone,
    /// Job title.
    JobTitle,
}

impl RecordField {
    /// Wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Department => "department",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::JobTitle => "job_title",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for [`NewDirectoryRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    /// A required field was blank after trimming.
    #[error("{field} must not be empty")]
    EmptyField { field: RecordField },
    /// The email is not `local@domain`.
    #[error("email must contain a single @ between a local part and a domain")]
    InvalidEmail,
}

impl RecordValidationError {
    /// Field the error refers to.
    pub fn field(&self) -> RecordField {
        match self {
            Self::EmptyField { field } => *field,
            Self::InvalidEmail => RecordField::Email,
        }
    }
}

/// Raw, unvalidated record fields as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    /// Full name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Work email.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Job title.
    pub job_title: String,
}

/// A validated record awaiting an identifier from the store.
///
/// ## Invariants
/// - Every field is trimmed and non-empty.
/// - `email` holds exactly one `@` with text on both sides.
///
/// # Examples
/// ```
/// use directory_backend::domain::{NewDirectoryRecord, RecordDraft};
///
/// let record = NewDirectoryRecord::try_from(RecordDraft {
///     name: "Kim Park".into(),
///     department: "Finance".into(),
///     email: " kim@company.com ".into(),
///     phone: "555-0111".into(),
///     job_title: "Controller".into(),
/// })
/// .expect("valid record");
/// assert_eq!(record.email(), "kim@company.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDirectoryRecord {
    name: String,
    department: String,
    email: String,
    phone: String,
    job_title: String,
}

fn required(raw: &str, field: RecordField) -> Result<String, RecordValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(RecordValidationError::EmptyField { field });
    }
    Ok(value.to_owned())
}

impl NewDirectoryRecord {
    /// Trimmed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed department.
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Trimmed email, used as the uniqueness key.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Trimmed phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Trimmed job title.
    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    /// Attach the identifier assigned by the store.
    pub fn into_record(self, id: RecordId) -> DirectoryRecord {
        DirectoryRecord {
            id,
            name: self.name,
            department: self.department,
            email: self.email,
            phone: self.phone,
            job_title: self.job_title,
        }
    }
}

impl TryFrom<RecordDraft> for NewDirectoryRecord {
    type Error = RecordValidationError;

    fn try_from(draft: RecordDraft) -> Result<Self, Self::Error> {
        let name = required(&draft.name, RecordField::Name)?;
        let department = required(&draft.department, RecordField::Department)?;
        let email = required(&draft.email, RecordField::Email)?;
        let phone = required(&draft.phone, RecordField::Phone)?;
        let job_title = required(&draft.job_title, RecordField::JobTitle)?;

        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => return Err(RecordValidationError::InvalidEmail),
        }

        Ok(Self {
            name,
            department,
            email,
            phone,
            job_title,
        })
    }
}

/// A single personnel entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    #[schema(value_type = u64, example = 11)]
    id: RecordId,
    #[schema(example = "Alice Smith")]
    name: String,
    #[schema(example = "Engineering")]
    department: String,
    #[schema(example = "alice@company.com")]
    email: String,
    #[schema(example = "555-0101")]
    phone: String,
    #[schema(example = "Senior Engineer")]
    job_title: String,
}

impl DirectoryRecord {
    /// Store-assigned identifier.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Full name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Department.
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Unique work email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Job title.
    pub fn job_title(&self) -> &str {
        &self.job_title
    }
}

/// Ephemeral search request.
///
/// An empty term is the same as no term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    term: Option<String>,
}

impl SearchQuery {
    /// Query matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a query from an optional raw term.
    pub fn new(term: Option<impl Into<String>>) -> Self {
        let term = term.map(Into::into).filter(|t| !t.is_empty());
        Self { term }
    }

    /// The search term, if any.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    fn matcher(&self) -> Option<String> {
        self.term.as_deref().map(str::to_lowercase)
    }
}

fn record_matches(record: &DirectoryRecord, needle: &str) -> bool {
    [&record.name, &record.department, &record.job_title]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Filter `records` by `query`, keeping their order.
///
/// The term is matched as a case-insensitive substring of the name,
/// department, or job title. Email and phone are not searched.
///
/// # Examples
/// ```
/// use directory_backend::domain::{
///     NewDirectoryRecord, RecordDraft, RecordId, SearchQuery, search,
/// };
///
/// let record = NewDirectoryRecord::try_from(RecordDraft {
///     name: "Hank Green".into(),
///     department: "Engineering".into(),
///     email: "hank@company.com".into(),
///     phone: "555-0108".into(),
///     job_title: "QA Engineer".into(),
/// })
/// .unwrap()
/// .into_record(RecordId::new(8));
///
/// let records = [record];
/// assert_eq!(search(&records, &SearchQuery::new(Some("qa"))).len(), 1);
/// assert!(search(&records, &SearchQuery::new(Some("company.com"))).is_empty());
/// ```
pub fn search(records: &[DirectoryRecord], query: &SearchQuery) -> Vec<DirectoryRecord> {
    match query.matcher() {
        None => records.to_vec(),
        Some(needle) => records
            .iter()
            .filter(|record| record_matches(record, &needle))
            .cloned()
            .collect(),
    }
}

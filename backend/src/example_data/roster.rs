//! The ten-person example roster.

use crate::domain::{NewDirectoryRecord, RecordDraft, RecordValidationError};

/// `(name, department, email, phone, job_title)` for each example person,
/// in insertion order.
pub const ROSTER: [(&str, &str, &str, &str, &str); 10] = [
    ("Alice Smith", "Engineering", "alice@company.com", "555-0101", "Senior Engineer"),
    ("Bob Jones", "Engineering", "bob@company.com", "555-0102", "Software Developer"),
    ("Charlie Brown", "HR", "charlie@company.com", "555-0103", "HR Manager"),
    ("David Wilson", "Sales", "david@company.com", "555-0104", "Sales Director"),
    ("Eve Davis", "Engineering", "eve@company.com", "555-0105", "DevOps Engineer"),
    ("Frank Miller", "Sales", "frank@company.com", "555-0106", "Account Executive"),
    ("Grace Lee", "HR", "grace@company.com", "555-0107", "Recruiter"),
    ("Hank Green", "Engineering", "hank@company.com", "555-0108", "QA Engineer"),
    ("Ivy White", "Marketing", "ivy@company.com", "555-0109", "Marketing Lead"),
    ("Jack Black", "Marketing", "jack@company.com", "555-0110", "Content Creator"),
];

/// Validated records for [`ROSTER`].
pub fn roster_records() -> Result<Vec<NewDirectoryRecord>, RecordValidationError> {
    ROSTER
        .iter()
        .map(|&(name, department, email, phone, job_title)| {
            NewDirectoryRecord::try_from(RecordDraft {
                name: name.to_owned(),
                department: department.to_owned(),
                email: email.to_owned(),
                phone: phone.to_owned(),
                job_title: job_title.to_owned(),
            })
        })
        .collect()
}

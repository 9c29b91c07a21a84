//! The student record and its row mapping.

use crate::types::RollNumber;
use rosterdb_codec::{CodecResult, Row};

/// Column names written on the first line of every roster file.
pub const HEADER: [&str; 6] = ["RollNumber", "Name", "Department", "Age", "Email", "Phone"];

/// Number of fields in a record.
pub const FIELD_COUNT: usize = HEADER.len();

const ROLL: usize = 0;
const NAME: usize = 1;
const DEPARTMENT: usize = 2;
const AGE: usize = 3;
const EMAIL: usize = 4;
const PHONE: usize = 5;

/// A single student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    /// Unique key.
    pub roll_number: RollNumber,
    /// Full name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Age in years. Not range checked.
    pub age: i32,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

impl StudentRecord {
    /// Creates a record from its fields.
    pub fn new(
        roll_number: impl Into<RollNumber>,
        name: impl Into<String>,
        department: impl Into<String>,
        age: i32,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            roll_number: roll_number.into(),
            name: name.into(),
            department: department.into(),
            age,
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// The record's fields in file order.
    #[must_use]
    pub fn to_fields(&self) -> [String; FIELD_COUNT] {
        [
            self.roll_number.to_string(),
            self.name.clone(),
            self.department.clone(),
            self.age.to_string(),
            self.email.clone(),
            self.phone.clone(),
        ]
    }

    /// Builds a record from a decoded row.
    ///
    /// # Errors
    ///
    /// Returns an error if the roll number or age is not an integer.
    pub fn from_row(row: &Row) -> CodecResult<Self> {
        Ok(Self {
            roll_number: row.integer(ROLL, HEADER[ROLL])?,
            name: row.text(NAME).to_string(),
            department: row.text(DEPARTMENT).to_string(),
            age: row.integer(AGE, HEADER[AGE])?,
            email: row.text(EMAIL).to_string(),
            phone: row.text(PHONE).to_string(),
        })
    }

    /// Names of the text fields, other than the last, that contain `,`.
    ///
    /// Such fields do not survive the legacy format.
    #[must_use]
    pub fn fields_with_delimiter(&self) -> Vec<&'static str> {
        [
            (NAME, &self.name),
            (DEPARTMENT, &self.department),
            (EMAIL, &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.contains(rosterdb_codec::DELIMITER))
        .map(|(index, _)| HEADER[index])
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterdb_codec::CodecError;

    fn ann() -> StudentRecord {
        StudentRecord::new(101, "Ann", "CS", 20, "a@x.com", "555")
    }

    #[test]
    fn fields_in_header_order() {
        assert_eq!(
            ann().to_fields(),
            ["101", "Ann", "CS", "20", "a@x.com", "555"].map(String::from)
        );
    }

    #[test]
    fn from_row_parses_integers() {
        let row = Row::new(ann().to_fields().to_vec());
        assert_eq!(StudentRecord::from_row(&row).unwrap(), ann());
    }

    #[test]
    fn from_row_rejects_bad_age() {
        let row = Row::new(
            ["1", "Bob", "EE", "twenty", "b@x", "1"]
                .map(String::from)
                .to_vec(),
        );
        assert!(matches!(
            StudentRecord::from_row(&row),
            Err(CodecError::InvalidInteger { field, .. }) if field == "Age"
        ));
    }

    #[test]
    fn delimiter_fields_exclude_phone() {
        let record = StudentRecord::new(1, "Smith, A", "CS", 20, "a@x", "555, ext 2");
        assert_eq!(record.fields_with_delimiter(), vec!["Name"]);
    }
}

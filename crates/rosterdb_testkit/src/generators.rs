//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use proptest::prelude::*;
use rosterdb_core::{RollNumber, StudentRecord};

/// Strategy for roll numbers drawn from a small range, so that generated
/// operations collide often.
pub fn roll_number_strategy() -> impl Strategy<Value = RollNumber> {
    (-5i64..40).prop_map(RollNumber)
}

/// Strategy for free-text fields that survive the legacy format: printable
/// ASCII without commas.
pub fn text_field_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -+\\--~]{0,16}").expect("Invalid regex")
}

/// Strategy for free-text fields that only survive the quoted format.
pub fn tricky_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~\n\r]{0,16}").expect("Invalid regex")
}

/// Strategy for a record with the given roll number and legacy-safe fields.
pub fn record_with_roll(roll: RollNumber) -> impl Strategy<Value = StudentRecord> {
    (
        text_field_strategy(),
        text_field_strategy(),
        any::<i32>(),
        text_field_strategy(),
        text_field_strategy(),
    )
        .prop_map(move |(name, department, age, email, phone)| StudentRecord {
            roll_number: roll,
            name,
            department,
            age,
            email,
            phone,
        })
}

/// Strategy for a record with legacy-safe fields.
pub fn record_strategy() -> impl Strategy<Value = StudentRecord> {
    roll_number_strategy().prop_flat_map(record_with_roll)
}

/// Strategy for a record whose text fields may hold commas, quotes, and
/// line breaks.
pub fn tricky_record_strategy() -> impl Strategy<Value = StudentRecord> {
    (
        roll_number_strategy(),
        tricky_text_strategy(),
        tricky_text_strategy(),
        any::<i32>(),
        tricky_text_strategy(),
        tricky_text_strategy(),
    )
        .prop_map(|(roll, name, department, age, email, phone)| StudentRecord {
            roll_number: roll,
            name,
            department,
            age,
            email,
            phone,
        })
}

/// Strategy for up to `max` records with pairwise distinct roll numbers.
pub fn distinct_records_strategy(max: usize) -> impl Strategy<Value = Vec<StudentRecord>> {
    prop::collection::vec(record_strategy(), 0..=max).prop_map(|records| {
        let mut seen = std::collections::HashSet::new();
        records
            .into_iter()
            .filter(|r| seen.insert(r.roll_number))
            .collect()
    })
}

/// A store operation for model-based tests.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Add a record.
    Add(StudentRecord),
    /// Update the record with `roll`.
    Update {
        /// Roll number to update.
        roll: RollNumber,
        /// Replacement record.
        record: StudentRecord,
    },
    /// Delete the record with `roll`.
    Delete(RollNumber),
    /// Look up `roll`.
    Find(RollNumber),
}

/// Strategy for generating store operations.
pub fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    prop_oneof![
        3 => record_strategy().prop_map(StoreOperation::Add),
        2 => (roll_number_strategy(), record_strategy())
            .prop_map(|(roll, record)| StoreOperation::Update { roll, record }),
        1 => (roll_number_strategy(), record_strategy())
            .prop_map(|(roll, mut record)| {
                // Keep the key half the time so in-place edits are covered.
                if record.age % 2 == 0 {
                    record.roll_number = roll;
                }
                StoreOperation::Update { roll, record }
            }),
        2 => roll_number_strategy().prop_map(StoreOperation::Delete),
        2 => roll_number_strategy().prop_map(StoreOperation::Find),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(store_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn text_fields_have_no_commas(field in text_field_strategy()) {
            prop_assert!(!field.contains(','));
            prop_assert!(!field.contains('\n'));
        }

        #[test]
        fn distinct_records_are_distinct(records in distinct_records_strategy(20)) {
            let mut rolls: Vec<RollNumber> = records.iter().map(|r| r.roll_number).collect();
            rolls.sort();
            rolls.dedup();
            prop_assert_eq!(rolls.len(), records.len());
        }
    }
}

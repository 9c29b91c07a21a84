//! The record store: ordered records, lookups, and write-through persistence.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::load::{decode_records, LoadReport};
use crate::record::{StudentRecord, HEADER};
use crate::types::RollNumber;
use rosterdb_codec::{Format, RowEncoder};
use rosterdb_storage::{FileBackend, StorageBackend};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// An ordered collection of student records backed by a single document.
///
/// Records keep insertion order. Update replaces a record in place and
/// delete closes the gap. Roll numbers are unique at all times.
///
/// Every successful `add`, `update`, or `delete` rewrites the whole backing
/// document before returning. If that write fails the change is kept in
/// memory, the store is marked dirty, and [`CoreError::Persist`] is returned.
///
/// Lines that were skipped on load are written back verbatim after the
/// records, so a rewrite never drops text the store could not read.
///
/// # Example
///
/// ```rust
/// use rosterdb_core::{Config, RecordStore, RollNumber, StudentRecord};
/// use rosterdb_storage::InMemoryBackend;
///
/// let mut store = RecordStore::open_with_backend(&Config::default(), Box::new(InMemoryBackend::new()))?;
/// store.add(StudentRecord::new(101, "Ann", "CS", 20, "a@x.com", "555"))?;
///
/// let index = store.find_by_roll(RollNumber(101)).unwrap();
/// assert_eq!(store.all()[index].name, "Ann");
/// # Ok::<(), rosterdb_core::CoreError>(())
/// ```
pub struct RecordStore {
    records: Vec<StudentRecord>,
    /// Position of each roll number in `records`.
    index: HashMap<RollNumber, usize>,
    backend: Box<dyn StorageBackend>,
    format: Format,
    report: LoadReport,
    /// Text of skipped lines, in file order.
    retained: Vec<String>,
    dirty: bool,
}

impl RecordStore {
    /// Opens the store at `config.path`, loading the file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not UTF-8,
    /// or (under [`crate::LoadPolicy::Abort`]) contains a bad line.
    pub fn open(config: &Config) -> CoreResult<Self> {
        let backend = if config.create_dirs {
            FileBackend::open_with_create_dirs(&config.path)
        } else {
            FileBackend::open(&config.path)
        };
        Self::open_with_backend(config, Box::new(backend))
    }

    /// Opens the store over an arbitrary backend.
    ///
    /// `config.path` is ignored; the backend decides where data lives.
    ///
    /// # Errors
    ///
    /// Same as [`RecordStore::open`].
    pub fn open_with_backend(config: &Config, backend: Box<dyn StorageBackend>) -> CoreResult<Self> {
        let location = backend.location();

        let (records, report) = match backend.read()? {
            None => {
                info!(%location, "no roster file found, starting empty");
                (Vec::new(), LoadReport::absent())
            }
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(|_| CoreError::InvalidUtf8 {
                    location: location.clone(),
                })?;
                decode_records(&text, config.format, config.load_policy)?
            }
        };

        let index = build_index(&records);
        let retained: Vec<String> = report.skipped.iter().map(|s| s.text.clone()).collect();
        info!(
            %location,
            format = %config.format,
            loaded = records.len(),
            retained = retained.len(),
            skipped = report.skipped.len(),
            "opened roster"
        );

        Ok(Self {
            records,
            index,
            backend,
            format: config.format,
            report,
            retained,
            dirty: false,
        })
    }

    /// Position of the record with `roll`, if any.
    #[must_use]
    pub fn find_by_roll(&self, roll: RollNumber) -> Option<usize> {
        self.index.get(&roll).copied()
    }

    /// Positions of every record whose name contains `part`, ignoring case.
    ///
    /// Results are in store order. An empty `part` matches everything.
    #[must_use]
    pub fn find_by_name_part(&self, part: &str) -> Vec<usize> {
        let needle = part.to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// The record at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StudentRecord> {
        self.records.get(index)
    }

    /// The record with `roll`.
    #[must_use]
    pub fn get_by_roll(&self, roll: RollNumber) -> Option<&StudentRecord> {
        self.find_by_roll(roll).and_then(|i| self.records.get(i))
    }

    /// All records in store order.
    #[must_use]
    pub fn all(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a new record and persists.
    ///
    /// # Errors
    ///
    /// - [`CoreError::DuplicateKey`] if the roll number is taken; nothing changes
    /// - [`CoreError::Persist`] if the record was added but could not be saved
    pub fn add(&mut self, record: StudentRecord) -> CoreResult<()> {
        let roll = record.roll_number;
        if self.index.contains_key(&roll) {
            return Err(CoreError::duplicate_key(roll));
        }

        self.warn_if_lossy(&record);
        self.index.insert(roll, self.records.len());
        self.records.push(record);
        debug!(%roll, "added student");

        self.persist()
    }

    /// Replaces the record with `roll` by `record`, keeping its position.
    ///
    /// `record` may carry a different roll number as long as no other record
    /// uses it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if no record has `roll`
    /// - [`CoreError::DuplicateKey`] if the new roll number belongs to another record
    /// - [`CoreError::Persist`] if the record was replaced but could not be saved
    pub fn update(&mut self, roll: RollNumber, record: StudentRecord) -> CoreResult<()> {
        let position = self.find_by_roll(roll).ok_or_else(|| CoreError::not_found(roll))?;

        let new_roll = record.roll_number;
        if new_roll != roll {
            if let Some(other) = self.find_by_roll(new_roll) {
                if other != position {
                    return Err(CoreError::duplicate_key(new_roll));
                }
            }
            self.index.remove(&roll);
            self.index.insert(new_roll, position);
        }

        self.warn_if_lossy(&record);
        self.records[position] = record;
        debug!(%roll, %new_roll, position, "updated student");

        self.persist()
    }

    /// Removes the record with `roll` and returns it.
    ///
    /// There is no confirmation step here; callers ask before calling.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if no record has `roll`
    /// - [`CoreError::Persist`] if the record was removed but the removal could not be saved
    pub fn delete(&mut self, roll: RollNumber) -> CoreResult<StudentRecord> {
        let position = self.find_by_roll(roll).ok_or_else(|| CoreError::not_found(roll))?;

        let removed = self.records.remove(position);
        self.index.remove(&roll);
        for (i, record) in self.records.iter().enumerate().skip(position) {
            self.index.insert(record.roll_number, i);
        }
        debug!(%roll, position, "deleted student");

        self.persist().map(|()| removed)
    }

    /// Rewrites the backing document from the current records.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Persist`] if the write fails. The store stays
    /// dirty until a later persist succeeds.
    pub fn persist(&mut self) -> CoreResult<()> {
        let mut encoder = RowEncoder::new(self.format);
        encoder.encode_row(HEADER);
        for record in &self.records {
            encoder.encode_row(record.to_fields());
        }
        for line in &self.retained {
            encoder.encode_raw(line);
        }
        let text = encoder.into_string();

        match self.backend.write(text.as_bytes()) {
            Ok(()) => {
                self.dirty = false;
                debug!(records = self.records.len(), bytes = text.len(), "persisted roster");
                Ok(())
            }
            Err(source) => {
                self.dirty = true;
                let location = self.backend.location();
                warn!(%location, error = %source, "failed to persist roster");
                Err(CoreError::Persist { location, source })
            }
        }
    }

    /// Returns true if memory holds changes the backing document lacks.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// What happened when the store was opened.
    #[must_use]
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Where the backing document lives.
    #[must_use]
    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// The row encoding in use.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Fields of `record` that the current format cannot store losslessly.
    ///
    /// Always empty for [`Format::Quoted`].
    #[must_use]
    pub fn lossy_fields(&self, record: &StudentRecord) -> Vec<&'static str> {
        match self.format {
            Format::Legacy => record.fields_with_delimiter(),
            Format::Quoted => Vec::new(),
        }
    }

    fn warn_if_lossy(&self, record: &StudentRecord) {
        let fields = self.lossy_fields(record);
        if !fields.is_empty() {
            warn!(
                roll = %record.roll_number,
                ?fields,
                "field contains a comma and will not load back correctly"
            );
        }
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("location", &self.backend.location())
            .field("records", &self.records.len())
            .field("format", &self.format)
            .field("dirty", &self.dirty)
            .finish()
    }
}

fn build_index(records: &[StudentRecord]) -> HashMap<RollNumber, usize> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| (record.roll_number, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadPolicy;
    use rosterdb_storage::InMemoryBackend;

    fn record(roll: i64, name: &str) -> StudentRecord {
        StudentRecord::new(roll, name, "CS", 20, format!("{roll}@x.com"), "555")
    }

    fn memory_store() -> (RecordStore, InMemoryBackend) {
        let backend = InMemoryBackend::new();
        let store =
            RecordStore::open_with_backend(&Config::default(), Box::new(backend.clone())).unwrap();
        (store, backend)
    }

    fn names(store: &RecordStore) -> Vec<&str> {
        store.all().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn starts_empty_without_document() {
        let (store, backend) = memory_store();
        assert!(store.is_empty());
        assert!(!store.load_report().found);
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn add_appends_and_persists() {
        let (mut store, backend) = memory_store();
        store.add(record(101, "Ann")).unwrap();
        store.add(record(102, "Bob")).unwrap();

        assert_eq!(names(&store), vec!["Ann", "Bob"]);
        assert_eq!(backend.write_count(), 2);
        assert_eq!(
            backend.document_text().unwrap(),
            "RollNumber,Name,Department,Age,Email,Phone\n\
             101,Ann,CS,20,101@x.com,555\n\
             102,Bob,CS,20,102@x.com,555\n"
        );
    }

    #[test]
    fn add_duplicate_is_rejected() {
        let (mut store, backend) = memory_store();
        store.add(record(101, "Ann")).unwrap();

        let err = store.add(record(101, "Other")).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateKey { roll } if roll == RollNumber(101)));
        assert_eq!(names(&store), vec!["Ann"]);
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn find_by_roll_and_get() {
        let (mut store, _) = memory_store();
        store.add(record(5, "Eve")).unwrap();
        store.add(record(3, "Cy")).unwrap();

        assert_eq!(store.find_by_roll(RollNumber(3)), Some(1));
        assert_eq!(store.get_by_roll(RollNumber(5)).unwrap().name, "Eve");
        assert_eq!(store.find_by_roll(RollNumber(4)), None);
        assert!(store.get(2).is_none());
    }

    #[test]
    fn find_by_name_part_is_case_insensitive() {
        let (mut store, _) = memory_store();
        store.add(record(1, "Alice Smith")).unwrap();
        store.add(record(2, "Bob Jones")).unwrap();
        store.add(record(3, "Malice Long")).unwrap();

        assert_eq!(store.find_by_name_part("lic"), vec![0, 2]);
        assert_eq!(store.find_by_name_part("SMITH"), vec![0]);
        assert_eq!(store.find_by_name_part("alice smith"), vec![0]);
        assert!(store.find_by_name_part("zed").is_empty());
        assert_eq!(store.find_by_name_part(""), vec![0, 1, 2]);
    }

    #[test]
    fn update_non_key_fields_keeps_position() {
        let (mut store, backend) = memory_store();
        store.add(record(1, "Ann")).unwrap();
        store.add(record(2, "Bob")).unwrap();
        store.add(record(3, "Cy")).unwrap();

        store.update(RollNumber(2), record(2, "Robert")).unwrap();

        assert_eq!(names(&store), vec!["Ann", "Robert", "Cy"]);
        assert_eq!(backend.write_count(), 4);
    }

    #[test]
    fn update_key_to_unused_value() {
        let (mut store, _) = memory_store();
        store.add(record(1, "Ann")).unwrap();
        store.add(record(2, "Bob")).unwrap();

        store.update(RollNumber(1), record(10, "Ann")).unwrap();

        assert_eq!(store.find_by_roll(RollNumber(1)), None);
        assert_eq!(store.find_by_roll(RollNumber(10)), Some(0));
        assert_eq!(names(&store), vec!["Ann", "Bob"]);
    }

    #[test]
    fn update_key_to_taken_value_fails() {
        let (mut store, backend) = memory_store();
        store.add(record(1, "Ann")).unwrap();
        store.add(record(2, "Bob")).unwrap();

        let err = store.update(RollNumber(1), record(2, "Ann")).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateKey { roll } if roll == RollNumber(2)));
        assert_eq!(store.get_by_roll(RollNumber(1)).unwrap(), &record(1, "Ann"));
        assert_eq!(store.get_by_roll(RollNumber(2)).unwrap(), &record(2, "Bob"));
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn update_missing_fails() {
        let (mut store, _) = memory_store();
        let err = store.update(RollNumber(9), record(9, "Nobody")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_shifts_later_records() {
        let (mut store, backend) = memory_store();
        store.add(record(1, "Ann")).unwrap();
        store.add(record(2, "Bob")).unwrap();
        store.add(record(3, "Cy")).unwrap();

        let removed = store.delete(RollNumber(2)).unwrap();

        assert_eq!(removed.name, "Bob");
        assert_eq!(names(&store), vec!["Ann", "Cy"]);
        assert_eq!(store.find_by_roll(RollNumber(3)), Some(1));
        assert_eq!(store.find_by_roll(RollNumber(2)), None);
        assert_eq!(backend.write_count(), 4);
    }

    #[test]
    fn delete_missing_leaves_store_alone() {
        let (mut store, backend) = memory_store();
        store.add(record(1, "Ann")).unwrap();

        let err = store.delete(RollNumber(2)).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { roll } if roll == RollNumber(2)));
        assert_eq!(store.len(), 1);
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn failed_persist_keeps_change_and_marks_dirty() {
        let (mut store, backend) = memory_store();
        store.add(record(1, "Ann")).unwrap();
        backend.set_fail_writes(true);

        let err = store.add(record(2, "Bob")).unwrap_err();
        assert!(err.is_applied());
        assert!(matches!(err, CoreError::Persist { .. }));
        assert_eq!(store.len(), 2);
        assert!(store.is_dirty());

        backend.set_fail_writes(false);
        store.persist().unwrap();
        assert!(!store.is_dirty());
        assert!(backend.document_text().unwrap().contains("2,Bob"));
    }

    #[test]
    fn reopen_reads_persisted_records() {
        let (mut store, backend) = memory_store();
        store.add(record(1, "Ann")).unwrap();
        store.add(record(2, "Bob")).unwrap();
        drop(store);

        let reopened =
            RecordStore::open_with_backend(&Config::default(), Box::new(backend)).unwrap();
        assert_eq!(names(&reopened), vec!["Ann", "Bob"]);
        assert!(reopened.load_report().found);
        assert_eq!(reopened.load_report().loaded, 2);
    }

    #[test]
    fn open_rejects_non_utf8() {
        let backend = InMemoryBackend::with_data(vec![0xff, 0xfe, b'\n']);
        let result = RecordStore::open_with_backend(&Config::default(), Box::new(backend));
        assert!(matches!(result, Err(CoreError::InvalidUtf8 { .. })));
    }

    #[test]
    fn open_respects_abort_policy() {
        let backend = InMemoryBackend::with_data(
            "RollNumber,Name,Department,Age,Email,Phone\nx,Ann,CS,20,a,1\n",
        );
        let config = Config::new().load_policy(LoadPolicy::Abort);
        let result = RecordStore::open_with_backend(&config, Box::new(backend.clone()));
        assert!(matches!(result, Err(CoreError::Malformed { line: 2, .. })));

        let store = RecordStore::open_with_backend(&Config::default(), Box::new(backend)).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.load_report().skipped.len(), 1);
    }

    #[test]
    fn quoted_format_round_trips_commas() {
        let backend = InMemoryBackend::new();
        let config = Config::new().format(Format::Quoted);
        let mut store = RecordStore::open_with_backend(&config, Box::new(backend.clone())).unwrap();
        store
            .add(StudentRecord::new(1, "Smith, Ann", "CS, Math", 20, "a@x", "555"))
            .unwrap();
        drop(store);

        let reopened = RecordStore::open_with_backend(&config, Box::new(backend)).unwrap();
        assert_eq!(reopened.all()[0].name, "Smith, Ann");
        assert_eq!(reopened.all()[0].department, "CS, Math");
    }

    #[test]
    fn scenario_add_duplicate_find_delete() {
        let (mut store, _) = memory_store();
        let ann = StudentRecord::new(101, "Ann", "CS", 20, "a@x.com", "555");

        store.add(ann.clone()).unwrap();
        assert!(matches!(
            store.add(StudentRecord::new(101, "Zed", "EE", 30, "z@x.com", "1")),
            Err(CoreError::DuplicateKey { .. })
        ));
        assert_eq!(store.get_by_roll(RollNumber(101)), Some(&ann));

        store.delete(RollNumber(101)).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.find_by_roll(RollNumber(101)), None);
    }

    #[test]
    fn lossy_fields_depend_on_format() {
        let smith = StudentRecord::new(1, "Smith, Ann", "CS", 20, "a@x", "555, ext 1");
        let (legacy, _) = memory_store();
        assert_eq!(legacy.lossy_fields(&smith), vec!["Name"]);

        let quoted = RecordStore::open_with_backend(
            &Config::new().format(Format::Quoted),
            Box::new(InMemoryBackend::new()),
        )
        .unwrap();
        assert!(quoted.lossy_fields(&smith).is_empty());
    }

    #[test]
    fn skipped_lines_are_written_back_after_records() {
        let backend = InMemoryBackend::with_data(
            "RollNumber,Name,Department,Age,Email,Phone\nbad line\n1,Ann,CS,20,a,1\n1,Dup,CS,20,d,1\n",
        );
        let mut store =
            RecordStore::open_with_backend(&Config::default(), Box::new(backend.clone())).unwrap();
        assert_eq!(store.load_report().skipped.len(), 2);

        store.delete(RollNumber(1)).unwrap();
        assert_eq!(
            backend.document_text().unwrap(),
            "RollNumber,Name,Department,Age,Email,Phone\nbad line\n1,Dup,CS,20,d,1\n"
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn index_agrees_with_scan_after_deletes(
                rolls in prop::collection::hash_set(0i64..200, 0..40),
                deletes in prop::collection::vec(0i64..200, 0..40),
            ) {
                let (mut store, _) = memory_store();
                for roll in &rolls {
                    store.add(record(*roll, "x")).unwrap();
                }
                for roll in deletes {
                    let _ = store.delete(RollNumber(roll));
                }

                for roll in 0..200 {
                    let roll = RollNumber(roll);
                    let scanned = store.all().iter().position(|r| r.roll_number == roll);
                    prop_assert_eq!(store.find_by_roll(roll), scanned);
                }
            }
        }
    }
}

use crate::Record;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// An in-memory collection of records addressable by id.
///
/// Iteration follows insertion order, which keeps execution output and
/// candidate ordering reproducible across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Record>", into = "Vec<Record>")]
pub struct RecordCache {
    records: Vec<Record>,
    index: AHashMap<String, usize>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut cache = Self::new();
        for record in records {
            cache.upsert(record);
        }
        cache
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or replace a record. A replaced record keeps its position.
    pub fn upsert(&mut self, record: Record) {
        match self.index.get(&record.id) {
            Some(&position) => self.records[position] = record,
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }
}

impl From<Vec<Record>> for RecordCache {
    fn from(records: Vec<Record>) -> Self {
        Self::from_records(records)
    }
}

impl From<RecordCache> for Vec<Record> {
    fn from(cache: RecordCache) -> Self {
        cache.records
    }
}

impl<'a> IntoIterator for &'a RecordCache {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

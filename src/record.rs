use crate::FieldValue;

/// One record (row) of a table.
///
/// The values are in the same order as the fields of the table
/// they were read from.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Record {
    deleted: bool,
    values: Vec<FieldValue>,
}

impl Record {
    pub fn new(values: Vec<FieldValue>, deleted: bool) -> Self {
        Self { deleted, values }
    }

    /// Returns true if the record is marked as deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Returns the value of the field at the given index
    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<FieldValue> {
        self.values
    }
}

//! Store double that records every call and can fail on demand

use async_trait::async_trait;
use std::cell::RefCell;
use template_fields_core::{
    FieldStore, MemoryFieldStore, NewField, RemoteError, RemoteOperation, StoredField,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select(String),
    Delete(String),
    Insert(Vec<NewField>),
}

#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryFieldStore,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<Vec<(RemoteOperation, String)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<StoredField>) -> Self {
        Self {
            inner: MemoryFieldStore::with_rows(rows),
            ..Self::default()
        }
    }

    /// Make the next call of `operation` fail with `message`
    pub fn fail_next(&self, operation: RemoteOperation, message: &str) {
        self.failures
            .borrow_mut()
            .push((operation, message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn take_failure(&self, operation: RemoteOperation) -> Result<(), RemoteError> {
        let mut failures = self.failures.borrow_mut();
        match failures.iter().position(|(op, _)| *op == operation) {
            Some(index) => {
                let (_, message) = failures.remove(index);
                Err(RemoteError::new(operation, message))
            }
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl FieldStore for RecordingStore {
    async fn select_fields(&self, template_id: &str) -> Result<Vec<StoredField>, RemoteError> {
        self.calls
            .borrow_mut()
            .push(Call::Select(template_id.to_string()));
        self.take_failure(RemoteOperation::LoadFields)?;
        self.inner.select_fields(template_id).await
    }

    async fn delete_fields(&self, template_id: &str) -> Result<(), RemoteError> {
        self.calls
            .borrow_mut()
            .push(Call::Delete(template_id.to_string()));
        self.take_failure(RemoteOperation::DeleteFields)?;
        self.inner.delete_fields(template_id).await
    }

    async fn insert_fields(&self, rows: &[NewField]) -> Result<(), RemoteError> {
        self.calls.borrow_mut().push(Call::Insert(rows.to_vec()));
        self.take_failure(RemoteOperation::InsertFields)?;
        self.inner.insert_fields(rows).await
    }
}

use std::collections::HashSet;
use tracing::warn;

use crate::field::{Field, FieldEdit};

/// In-memory fields of the current template, unique by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCollection {
    fields: Vec<Field>,
}

impl FieldCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from loaded rows, keeping the first of any
    /// duplicated ids. Rows on page 0 are dropped; pages start at 1.
    pub fn from_loaded(fields: Vec<Field>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(fields.len());
        for field in fields {
            if field.page == 0 {
                warn!(field_id = %field.id, "Dropping field with page 0");
            } else if seen.insert(field.id.clone()) {
                kept.push(field);
            } else {
                warn!(field_id = %field.id, "Dropping field with duplicate id");
            }
        }
        Self { fields: kept }
    }

    /// Add a field, returning its id. A field whose id is already present
    /// replaces nothing and is rejected.
    pub fn insert(&mut self, field: Field) -> Option<String> {
        if self.contains(&field.id) {
            return None;
        }
        let id = field.id.clone();
        self.fields.push(field);
        Some(id)
    }

    /// Apply one attribute edit to the field with `id`
    pub fn apply(&mut self, id: &str, edit: FieldEdit) -> Option<&Field> {
        let field = self.fields.iter_mut().find(|f| f.id == id)?;
        field.apply(edit);
        Some(field)
    }

    /// Remove the field with `id`
    pub fn remove(&mut self, id: &str) -> Option<Field> {
        let index = self.fields.iter().position(|f| f.id == id)?;
        Some(self.fields.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Fields placed on `page`, in insertion order
    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.page == page)
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

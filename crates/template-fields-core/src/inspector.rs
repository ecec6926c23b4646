//! Selection state of the field inspector
//!
//! States are `Idle` and `Editing(field_id)`. Clicking or creating a field
//! moves to `Editing`; only deleting the bound field (or replacing the whole
//! collection on load) returns to `Idle`.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Inspector {
    #[default]
    Idle,
    Editing { field_id: String },
}

impl Inspector {
    /// Bind the inspector to `field_id`, from either state
    pub fn select(&mut self, field_id: impl Into<String>) {
        *self = Inspector::Editing {
            field_id: field_id.into(),
        };
    }

    /// Return to `Idle` if the inspector is bound to `field_id`
    pub fn release(&mut self, field_id: &str) -> bool {
        if self.selected() == Some(field_id) {
            *self = Inspector::Idle;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Inspector::Idle;
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            Inspector::Idle => None,
            Inspector::Editing { field_id } => Some(field_id),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Inspector::Editing { .. })
    }
}

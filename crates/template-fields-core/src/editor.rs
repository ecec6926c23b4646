//! The editor's single state object
//!
//! `FieldEditor` owns the field collection, the inspector binding, the page
//! navigator and the in-flight flags. The view layer drives it only through
//! the transitions below; remote calls happen outside it, bracketed by the
//! `begin_*`/`finish_*` pairs so no borrow is held across an await.

use tracing::debug;

use crate::collection::FieldCollection;
use crate::config::FieldDefaults;
use crate::coords::SurfacePoint;
use crate::error::{EditorError, RemoteError};
use crate::field::{Field, FieldAttribute, FieldEdit, Template};
use crate::inspector::Inspector;
use crate::pager::PageNavigator;

/// Issued when a template is selected; identifies which load a result
/// belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    template_id: String,
}

impl LoadTicket {
    pub fn template_id(&self) -> &str {
        &self.template_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The loaded fields replaced the collection
    Applied { count: usize },
    /// A newer template was selected meanwhile; the result was dropped
    Stale,
}

/// Snapshot of what a save should write
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    pub template_id: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct FieldEditor {
    defaults: FieldDefaults,
    template: Option<Template>,
    fields: FieldCollection,
    inspector: Inspector,
    pager: PageNavigator,
    load_generation: u64,
    saving: bool,
}

impl Default for FieldEditor {
    fn default() -> Self {
        Self::new(FieldDefaults::default())
    }
}

impl FieldEditor {
    pub fn new(defaults: FieldDefaults) -> Self {
        Self {
            defaults,
            template: None,
            fields: FieldCollection::new(),
            inspector: Inspector::Idle,
            pager: PageNavigator::new(),
            load_generation: 0,
            saving: false,
        }
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn fields(&self) -> &FieldCollection {
        &self.fields
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn pager(&self) -> &PageNavigator {
        &self.pager
    }

    pub fn current_page(&self) -> u32 {
        self.pager.current()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The field the inspector is bound to
    pub fn selected_field(&self) -> Option<&Field> {
        self.inspector.selected().and_then(|id| self.fields.get(id))
    }

    /// Fields drawn on the current page
    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.on_page(self.pager.current())
    }

    // ---- Template and document --------------------------------------------

    /// Switch to `template`. The collection keeps its contents until the
    /// returned ticket's load completes.
    pub fn set_template(&mut self, template: Template) -> LoadTicket {
        self.load_generation += 1;
        self.pager.reset();
        debug!(template_id = %template.id, generation = self.load_generation, "Template selected");
        let ticket = LoadTicket {
            generation: self.load_generation,
            template_id: template.id.clone(),
        };
        self.template = Some(template);
        ticket
    }

    /// Apply the result of the load identified by `ticket`.
    ///
    /// Results for superseded tickets are dropped, errors included. A failed
    /// current load leaves the collection as it was.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<Field>, RemoteError>,
    ) -> Result<LoadOutcome, RemoteError> {
        if ticket.generation != self.load_generation {
            debug!(template_id = %ticket.template_id, "Dropping stale load result");
            return Ok(LoadOutcome::Stale);
        }
        let loaded = result?;
        self.fields = FieldCollection::from_loaded(loaded);
        self.inspector.reset();
        Ok(LoadOutcome::Applied {
            count: self.fields.len(),
        })
    }

    /// Record the page count once the document has been parsed
    pub fn document_loaded(&mut self, num_pages: u32) {
        self.pager.set_num_pages(num_pages);
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous()
    }

    // ---- Overlay clicks ---------------------------------------------------

    /// Create a field at `point` on the current page and select it
    pub fn click_surface(&mut self, point: SurfacePoint) -> Result<&Field, EditorError> {
        let template_id = self
            .template
            .as_ref()
            .map(|t| t.id.clone())
            .ok_or(EditorError::NoTemplate)?;
        let page = self.pager.current();

        let field = loop {
            let candidate = Field::at_point(&template_id, point, page, &self.defaults);
            if !self.fields.contains(&candidate.id) {
                break candidate;
            }
        };
        let id = field.id.clone();
        self.fields.insert(field);
        self.inspector.select(id.clone());
        debug!(field_id = %id, x = point.x, y = point.y, page, "Field created");

        self.fields.get(&id).ok_or(EditorError::UnknownField(id))
    }

    /// Select an existing field
    pub fn click_field(&mut self, field_id: &str) -> Result<(), EditorError> {
        if !self.fields.contains(field_id) {
            return Err(EditorError::UnknownField(field_id.to_string()));
        }
        self.inspector.select(field_id);
        Ok(())
    }

    // ---- Inspector --------------------------------------------------------

    /// Overwrite one attribute of the selected field
    pub fn edit_selected(&mut self, edit: FieldEdit) -> Result<&Field, EditorError> {
        let id = self
            .inspector
            .selected()
            .ok_or(EditorError::NothingSelected)?
            .to_string();
        match self.fields.apply(&id, edit) {
            Some(field) => Ok(field),
            None => Err(EditorError::UnknownField(id)),
        }
    }

    /// Parse raw inspector input for `attribute` and apply it.
    /// Unparseable input leaves the field unchanged.
    pub fn edit_selected_raw(
        &mut self,
        attribute: FieldAttribute,
        raw: &str,
    ) -> Result<&Field, EditorError> {
        let edit = FieldEdit::parse(attribute, raw)?;
        self.edit_selected(edit)
    }

    /// Remove the selected field and close the inspector
    pub fn delete_selected(&mut self) -> Result<Field, EditorError> {
        let id = self
            .inspector
            .selected()
            .ok_or(EditorError::NothingSelected)?
            .to_string();
        let removed = self
            .fields
            .remove(&id)
            .ok_or_else(|| EditorError::UnknownField(id.clone()))?;
        self.inspector.release(&id);
        debug!(field_id = %id, "Field deleted");
        Ok(removed)
    }

    // ---- Save -------------------------------------------------------------

    /// Mark a save as in flight and snapshot what it should write.
    ///
    /// Rejected while another save is in flight.
    pub fn begin_save(&mut self) -> Result<SaveTicket, EditorError> {
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        let template_id = self
            .template
            .as_ref()
            .map(|t| t.id.clone())
            .ok_or(EditorError::NoTemplate)?;
        self.saving = true;
        Ok(SaveTicket {
            template_id,
            fields: self.fields.as_slice().to_vec(),
        })
    }

    /// Clear the in-flight flag. The collection is not touched whatever the
    /// save's outcome.
    pub fn finish_save(&mut self) {
        self.saving = false;
    }
}

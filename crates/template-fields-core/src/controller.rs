//! Remote round trips driven from UI events
//!
//! Each operation borrows the editor only between awaits and turns any
//! remote failure into one error notice carrying the store's message.

use std::cell::RefCell;
use tracing::{error, info};

use crate::editor::{FieldEditor, LoadOutcome};
use crate::error::{EditorError, RemoteError};
use crate::field::Template;
use crate::notify::{Notice, Notifier};
use crate::persistence::{load_fields_for_template, replace_fields_for_template, ReplaceReport};
use crate::store::FieldStore;

/// Select `template` and replace the in-memory fields with its stored ones
pub async fn load_template<S: FieldStore + ?Sized>(
    editor: &RefCell<FieldEditor>,
    store: &S,
    notifier: &dyn Notifier,
    template: Template,
) -> Result<LoadOutcome, RemoteError> {
    let ticket = editor.borrow_mut().set_template(template);
    let result = load_fields_for_template(store, ticket.template_id()).await;
    let outcome = editor.borrow_mut().finish_load(&ticket, result);

    match &outcome {
        Ok(LoadOutcome::Applied { count }) => {
            info!(template_id = ticket.template_id(), count, "Fields loaded");
        }
        Ok(LoadOutcome::Stale) => {}
        Err(e) => {
            error!(template_id = ticket.template_id(), error = %e, "Failed to load fields");
            notifier.notify(Notice::error("Error loading fields", e.message.clone()));
        }
    }
    outcome
}

/// Persist the whole in-memory collection for the current template
pub async fn save_fields<S: FieldStore + ?Sized>(
    editor: &RefCell<FieldEditor>,
    store: &S,
    notifier: &dyn Notifier,
) -> Result<ReplaceReport, EditorError> {
    let ticket = editor.borrow_mut().begin_save()?;

    let result =
        replace_fields_for_template(store, &ticket.template_id, &ticket.fields).await;
    editor.borrow_mut().finish_save();

    match result {
        Ok(report) => {
            notifier.notify(Notice::success(
                "Fields saved",
                format!("Saved {} field(s)", report.inserted),
            ));
            Ok(report)
        }
        Err(e) => {
            error!(template_id = %ticket.template_id, operation = %e.operation, error = %e, "Failed to save fields");
            notifier.notify(Notice::error("Error saving fields", e.message.clone()));
            Err(e.into())
        }
    }
}

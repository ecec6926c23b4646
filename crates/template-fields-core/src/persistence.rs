//! Loading and replacing a template's stored field collection

use tracing::{debug, info, warn};

use crate::error::RemoteError;
use crate::field::Field;
use crate::store::{FieldStore, NewField};

/// What a successful [`replace_fields_for_template`] wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceReport {
    pub inserted: usize,
}

/// Fetch every stored field of `template_id`
pub async fn load_fields_for_template<S: FieldStore + ?Sized>(
    store: &S,
    template_id: &str,
) -> Result<Vec<Field>, RemoteError> {
    let rows = store.select_fields(template_id).await?;
    debug!(template_id, count = rows.len(), "Loaded stored fields");
    Ok(rows.into_iter().map(Field::from).collect())
}

/// Replace the stored fields of `template_id` with `fields`.
///
/// Runs two remote calls in order: delete every stored field of the
/// template, then insert `fields` with their client ids dropped so the store
/// assigns new ones. A delete failure aborts before anything is written.
///
/// The two calls are not atomic. If the insert fails after the delete
/// succeeded, the template is left with zero stored fields.
pub async fn replace_fields_for_template<S: FieldStore + ?Sized>(
    store: &S,
    template_id: &str,
    fields: &[Field],
) -> Result<ReplaceReport, RemoteError> {
    let rows: Vec<NewField> = fields
        .iter()
        .map(|f| NewField::from_field(f, template_id))
        .collect();

    store.delete_fields(template_id).await?;
    debug!(template_id, "Deleted stored fields");

    if let Err(e) = store.insert_fields(&rows).await {
        warn!(
            template_id,
            error = %e,
            "Insert failed after delete; template now has no stored fields"
        );
        return Err(e);
    }

    info!(template_id, count = rows.len(), "Saved fields");
    Ok(ReplaceReport {
        inserted: rows.len(),
    })
}

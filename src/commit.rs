use crate::record::{Record, RecordId, ValidatedForm};
use crate::selection::{ActiveRecord, Editor};
use crate::statics;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub id: RecordId,
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("{}", statics::EN_ERR_NOTHING_SELECTED)]
    NothingSelected,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Write the editor's validated form into the store: insert with a fresh id for a new
/// record, update in place otherwise. On success the editor returns to no selection;
/// on failure neither the store nor the editor changes.
pub fn commit<R: Record>(
    store: &mut RecordStore<R>,
    editor: &mut Editor<R>,
    form: &ValidatedForm,
) -> Result<CommitOutcome, CommitError> {
    let outcome = match editor.active() {
        ActiveRecord::None => return Err(CommitError::NothingSelected),
        ActiveRecord::Existing(id) => {
            let mut record = store.get(id).cloned().ok_or(StoreError::NotFound(id))?;
            record.apply(form);
            store.update(record)?;
            CommitOutcome { id, created: false }
        }
        ActiveRecord::New(draft) => {
            let mut record = draft.clone();
            record.apply(form);
            let id = store.next_id()?;
            record.set_id(id);
            store.add(record)?;
            CommitOutcome { id, created: true }
        }
    };

    editor.clear();
    tracing::info!(
        target: statics::LOG_STORE,
        id = outcome.id,
        created = outcome.created,
        "commit"
    );
    Ok(outcome)
}

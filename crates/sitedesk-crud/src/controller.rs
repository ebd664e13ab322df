// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The list/create/edit/delete life cycle shared by every management screen.
//!
//! A controller owns one [`KeyedStore`], a search term, a [`Pager`], and at
//! most one open dialog. Dialog transitions:
//!
//! ```text
//! Closed --begin_create--> Creating --commit/cancel--> Closed
//! Closed --begin_edit----> Editing  --commit/cancel--> Closed
//! ```
//!
//! A commit that fails validation or storage leaves the dialog open with
//! the draft untouched.

use sitedesk_config::model::ListingConfig;
use sitedesk_core::{Fields, Record, SitedeskError};
use sitedesk_storage::KeyedStore;
use tracing::debug;

use crate::draft::{FormDraft, FormSchema};
use crate::page::Pager;
use crate::search::search_excluding;

/// Which dialog, if any, is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Creating,
    Editing(u64),
}

/// One page of a filtered list.
#[derive(Debug)]
pub struct ListView<'a, T> {
    pub rows: Vec<&'a T>,
    /// Rows matching the search term across all pages.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Row filter applied before search, e.g. "leaves of this owner".
pub type Scope<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub struct CrudController<T: Record> {
    store: KeyedStore<T>,
    scope: Option<Scope<T>>,
    schema: FormSchema<T>,
    pager: Pager,
    term: String,
    dialog: DialogState,
    draft: Option<FormDraft<T>>,
}

impl<T: Record> std::fmt::Debug for CrudController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudController")
            .field("store", &self.store)
            .field("pager", &self.pager)
            .field("scoped", &self.scope.is_some())
            .field("term", &self.term)
            .field("dialog", &self.dialog)
            .finish()
    }
}

impl<T: Record> CrudController<T> {
    pub fn new(store: KeyedStore<T>, schema: FormSchema<T>, listing: &ListingConfig) -> Self {
        Self {
            store,
            scope: None,
            schema,
            pager: Pager::new(listing),
            term: String::new(),
            dialog: DialogState::Closed,
            draft: None,
        }
    }

    /// Restrict every list, edit, and delete to records matching `scope`.
    pub fn with_scope(mut self, scope: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.scope = Some(Box::new(scope));
        self
    }

    pub fn store(&self) -> &KeyedStore<T> {
        &self.store
    }

    pub fn schema(&self) -> &FormSchema<T> {
        &self.schema
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    pub fn draft(&self) -> Option<&FormDraft<T>> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut FormDraft<T>> {
        self.draft.as_mut()
    }

    /// Records in scope, in collection order.
    pub fn records(&self) -> Vec<&T> {
        self.store.iter().filter(|r| self.in_scope(r)).collect()
    }

    /// Records in scope matching the current search term, in collection order.
    pub fn filtered(&self) -> Vec<&T> {
        let records = self.records();
        search_excluding(&records, &self.term, &self.schema.secret_fields())
            .into_iter()
            .copied()
            .collect()
    }

    /// The record with `id`, if it exists and is in scope.
    pub fn get(&self, id: u64) -> Option<&T> {
        self.store.get(id).filter(|r| self.in_scope(r))
    }

    /// The current page of the filtered list.
    pub fn view(&self) -> ListView<'_, T> {
        let filtered = self.filtered();
        let total = filtered.len();
        let rows = self.pager.slice(&filtered).to_vec();
        ListView {
            rows,
            total,
            page: self.pager.page(),
            page_size: self.pager.page_size(),
        }
    }

    /// Change the search term, keeping the page index within range.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.term = term.into();
        let count = self.filtered().len();
        self.pager.clamp(count);
    }

    pub fn set_page(&mut self, page: usize) {
        let count = self.filtered().len();
        self.pager.set_page(page, count);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), SitedeskError> {
        self.pager.set_page_size(page_size)
    }

    /// Open an empty create dialog with the schema's defaults.
    pub fn begin_create(&mut self) -> Result<&mut FormDraft<T>, SitedeskError> {
        self.ensure_closed()?;
        self.dialog = DialogState::Creating;
        Ok(self.draft.insert(self.schema.blank()))
    }

    /// Open an edit dialog pre-filled from the record with `id`.
    ///
    /// Returns `Ok(None)` and stays closed when the record does not exist.
    pub fn begin_edit(&mut self, id: u64) -> Result<Option<&mut FormDraft<T>>, SitedeskError> {
        self.ensure_closed()?;
        let Some(record) = self.get(id) else {
            debug!(key = self.store.key(), id, "edit of missing record ignored");
            return Ok(None);
        };
        let draft = self.schema.from_record(record)?;
        self.dialog = DialogState::Editing(id);
        Ok(Some(self.draft.insert(draft)))
    }

    /// Close the dialog and drop the draft.
    pub fn cancel(&mut self) {
        self.dialog = DialogState::Closed;
        self.draft = None;
    }

    /// Validate and persist the open draft.
    pub fn commit(&mut self) -> Result<Option<T>, SitedeskError> {
        self.commit_with(Fields::new())
    }

    /// As [`commit`](Self::commit), overlaying `extra` fields the user does not edit.
    ///
    /// Returns `Ok(None)` when the record being edited was deleted meanwhile;
    /// the dialog is closed in that case.
    pub fn commit_with(&mut self, extra: Fields) -> Result<Option<T>, SitedeskError> {
        let Some(draft) = &self.draft else {
            return Err(SitedeskError::Internal("no dialog is open".to_string()));
        };
        let mut fields = self.schema.finish(draft)?;
        fields.extend(extra);

        let saved = match self.dialog {
            DialogState::Closed => {
                return Err(SitedeskError::Internal("no dialog is open".to_string()));
            }
            DialogState::Creating => Some(self.store.insert(fields)?),
            DialogState::Editing(id) => self.store.update(id, fields)?,
        };
        debug!(
            key = self.store.key(),
            id = saved.as_ref().map(Record::id),
            "dialog committed"
        );
        self.cancel();
        Ok(saved)
    }

    /// Delete the record with `id` and pull the page index back into range.
    pub fn delete(&mut self, id: u64) -> Result<bool, SitedeskError> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let removed = self.store.remove(id)?;
        let count = self.filtered().len();
        self.pager.clamp(count);
        Ok(removed)
    }

    /// Re-read the collection from storage.
    pub fn reload(&mut self) -> Result<(), SitedeskError> {
        self.store.reload()?;
        let count = self.filtered().len();
        self.pager.clamp(count);
        Ok(())
    }

    fn in_scope(&self, record: &T) -> bool {
        self.scope.as_ref().is_none_or(|scope| scope(record))
    }

    fn ensure_closed(&self) -> Result<(), SitedeskError> {
        match self.dialog {
            DialogState::Closed => Ok(()),
            open => Err(SitedeskError::Internal(format!(
                "a dialog is already open ({open:?})"
            ))),
        }
    }
}

//! Client-side edit session over a confirmed layout snapshot.
//!
//! The confirmed layout and the local candidate are kept apart: edits only ever replace the
//! candidate, and the confirmed snapshot changes only when the server acknowledges a save or a
//! fresh copy is loaded.

use crate::catalog::SectionId;
use crate::error::HomepageError;
use crate::model::{Layout, LayoutVersion, Section};
use crate::reorder;
use crate::service::LayoutService;
use crate::store::LayoutStore;
use crate::validator::LayoutViolation;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Where the session is in its edit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Showing the confirmed layout.
    Idle,
    /// Holding local changes against the confirmed version.
    Editing,
    /// A save is in flight.
    Saving,
}

#[folio_derive::folio_error]
#[derive(Clone)]
pub enum SessionError {
    #[error("A save is already in progress{}", format_context(.context))]
    SaveInProgress { context: Option<Cow<'static, str>> },
    #[error("There are no local changes to save{}", format_context(.context))]
    NothingToSave { context: Option<Cow<'static, str>> },
    #[error("No save is in progress{}", format_context(.context))]
    NotSaving { context: Option<Cow<'static, str>> },
    #[error("Local changes would be lost{}", format_context(.context))]
    UnsavedChanges { context: Option<Cow<'static, str>> },
}

/// Outcome of a failed save as seen by the editor.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveFailure {
    /// Local changes were discarded; the editor must redo them on the latest layout.
    #[error("the layout was changed by someone else (now at version {current})")]
    Conflict { current: LayoutVersion },
    /// Local changes were kept; fix them and save again.
    #[error(transparent)]
    Invalid(LayoutViolation),
    /// Local changes were kept; saving again may succeed.
    #[error("the layout store is unavailable: {message}")]
    Unavailable { message: String },
    #[error("saving failed: {message}")]
    Failed { message: String },
    #[error(transparent)]
    Rejected(SessionError),
}

/// Candidate and base version handed to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub sections: Vec<Section>,
    pub base_version: LayoutVersion,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    confirmed: Layout,
    candidate: Option<Vec<Section>>,
    saving: bool,
    last_error: Option<SaveFailure>,
}

impl EditSession {
    #[must_use]
    pub const fn new(confirmed: Layout) -> Self {
        Self { confirmed, candidate: None, saving: false, last_error: None }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        if self.saving {
            SessionState::Saving
        } else if self.candidate.is_some() {
            SessionState::Editing
        } else {
            SessionState::Idle
        }
    }

    /// Last layout acknowledged by the server.
    #[must_use]
    pub const fn confirmed(&self) -> &Layout {
        &self.confirmed
    }

    #[must_use]
    pub fn candidate(&self) -> Option<&[Section]> {
        self.candidate.as_deref()
    }

    /// Sections as the editor currently sees them.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        self.candidate.as_deref().unwrap_or(&self.confirmed.sections)
    }

    #[must_use]
    pub const fn base_version(&self) -> LayoutVersion {
        self.confirmed.version
    }

    /// Whether the candidate differs from the confirmed layout.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.candidate.as_ref().is_some_and(|c| *c != self.confirmed.sections)
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&SaveFailure> {
        self.last_error.as_ref()
    }

    /// # Errors
    /// [`SessionError::SaveInProgress`] while saving.
    pub fn move_section(&mut self, id: SectionId, new_index: usize) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let next = reorder::move_section(self.sections(), id, new_index);
        self.candidate = Some(next);
        Ok(())
    }

    /// # Errors
    /// [`SessionError::SaveInProgress`] while saving.
    pub fn toggle_visibility(&mut self, id: SectionId) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let next = reorder::toggle_visibility(self.sections(), id);
        self.candidate = Some(next);
        Ok(())
    }

    /// Drops local changes and returns to the confirmed layout.
    ///
    /// # Errors
    /// [`SessionError::SaveInProgress`] while saving.
    pub fn discard(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.candidate = None;
        self.last_error = None;
        Ok(())
    }

    /// Replaces the confirmed layout with a freshly read one.
    ///
    /// # Errors
    /// [`SessionError::UnsavedChanges`] while editing, [`SessionError::SaveInProgress`] while
    /// saving.
    pub fn refresh(&mut self, latest: Layout) -> Result<(), SessionError> {
        match self.state() {
            SessionState::Idle => {
                self.confirmed = latest;
                Ok(())
            },
            SessionState::Editing => Err(SessionError::UnsavedChanges { context: None }),
            SessionState::Saving => Err(SessionError::SaveInProgress { context: None }),
        }
    }

    /// Enters `Saving` and returns what to commit.
    ///
    /// # Errors
    /// [`SessionError::SaveInProgress`] or [`SessionError::NothingToSave`].
    pub fn begin_save(&mut self) -> Result<SaveRequest, SessionError> {
        if self.saving {
            return Err(SessionError::SaveInProgress { context: None });
        }
        let sections =
            self.candidate.clone().ok_or(SessionError::NothingToSave { context: None })?;
        self.saving = true;
        Ok(SaveRequest { sections, base_version: self.confirmed.version })
    }

    /// Applies the writer's answer to a request from [`EditSession::begin_save`].
    ///
    /// On conflict the candidate is dropped and the session is idle on its stale snapshot;
    /// call [`EditSession::refresh`] with the latest layout. Any other failure keeps the
    /// candidate.
    ///
    /// # Errors
    /// The [`SaveFailure`] describing what happened; it is also kept as
    /// [`EditSession::last_error`].
    pub fn complete_save(
        &mut self,
        result: Result<Layout, HomepageError>,
    ) -> Result<LayoutVersion, SaveFailure> {
        if !self.saving {
            return Err(SaveFailure::Rejected(SessionError::NotSaving { context: None }));
        }
        self.saving = false;

        let failure = match result {
            Ok(layout) => {
                let version = layout.version;
                self.confirmed = layout;
                self.candidate = None;
                self.last_error = None;
                return Ok(version);
            },
            Err(HomepageError::Conflict { current, .. }) => {
                self.candidate = None;
                SaveFailure::Conflict { current }
            },
            Err(HomepageError::Invalid { source, .. }) => SaveFailure::Invalid(source),
            Err(err @ HomepageError::StoreUnavailable { .. }) => {
                SaveFailure::Unavailable { message: err.to_string() }
            },
            Err(err) => SaveFailure::Failed { message: err.to_string() },
        };
        self.last_error = Some(failure.clone());
        Err(failure)
    }

    /// Commits the candidate through `service`, re-reading the layout after a conflict.
    ///
    /// # Errors
    /// See [`EditSession::complete_save`]; begin-save errors are wrapped in
    /// [`SaveFailure::Rejected`].
    pub async fn save<S: LayoutStore>(
        &mut self,
        service: &LayoutService<S>,
    ) -> Result<LayoutVersion, SaveFailure> {
        let request = self.begin_save().map_err(SaveFailure::Rejected)?;
        let result = service.commit(request.sections, request.base_version).await;
        let outcome = self.complete_save(result);

        if let Err(SaveFailure::Conflict { current }) = &outcome {
            match service.read().await {
                Ok(latest) => {
                    debug!(%current, version = %latest.version, "Reloaded layout after conflict");
                    self.confirmed = latest;
                },
                Err(err) => warn!(error = %err, "Failed to reload layout after conflict"),
            }
        }
        outcome
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.saving {
            return Err(SessionError::SaveInProgress { context: None });
        }
        Ok(())
    }
}

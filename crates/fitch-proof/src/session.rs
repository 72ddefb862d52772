//! Proof session: owns one document for its lifetime.
//!
//! Every command runs to completion before the next is accepted. Structural
//! commands, checks and resets first commit whatever cell is open, so a typed
//! but unsaved value is never lost.
//!
//! Checking is the one asynchronous boundary. [`ProofSession::begin_check`]
//! hands out a [`CheckTicket`] with a fresh token; only the reply carrying the
//! most recent token is applied, and anything older is dropped as stale.

use crate::document::{ProofDocument, ProofLine};
use crate::error::EditError;
use crate::filters::{InputFilter, StandardFilter};
use crate::focus::{Cell, FocusState, PendingEdit};
use crate::location::{self, Location};
use crate::mutation::{self, Cascade, DeleteOutcome, NodeKind, Placement};
use crate::rules;
use crate::view::{self, ProofRow};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Identifies one check request of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckToken(u64);

/// What the checker needs to judge the proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPayload {
    /// The document with every justification in canonical form.
    pub proof_data: ProofDocument,
    pub wanted_conc: String,
    pub num_prems: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    pub token: CheckToken,
    pub payload: CheckPayload,
}

/// The checker's verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReply {
    #[serde(default)]
    pub issues: Vec<String>,
    /// Only meaningful when `issues` is empty.
    #[serde(rename = "concReached", default)]
    pub conc_reached: bool,
}

/// Result state visible to whoever renders the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckStatus {
    #[default]
    NotChecked,
    Checking,
    /// No errors, conclusion reached.
    Complete,
    /// No errors yet, conclusion not reached.
    Incomplete,
    /// The checker reported problems; shown verbatim.
    Error { issues: Vec<String> },
    /// The checker could not be reached.
    Unavailable { reason: String },
}

impl CheckStatus {
    pub fn from_reply(reply: CheckReply) -> Self {
        if !reply.issues.is_empty() {
            CheckStatus::Error {
                issues: reply.issues,
            }
        } else if reply.conc_reached {
            CheckStatus::Complete
        } else {
            CheckStatus::Incomplete
        }
    }
}

/// A hypothesis delete waiting for the user's answer.
///
/// Only valid for the document revision it was proposed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub position: usize,
    pub cascade: Cascade,
    revision: u64,
}

/// First phase of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteRequest {
    Done(DeleteOutcome),
    /// The target opens a subproof; call [`ProofSession::confirm_delete`] to
    /// remove the whole subproof, or drop the pending delete to keep it.
    NeedsConfirmation(PendingDelete),
}

#[derive(Debug)]
pub struct ProofSession {
    document: ProofDocument,
    initial: ProofDocument,
    conclusion: String,
    premise_count: usize,
    focus: FocusState,
    filter: Box<dyn InputFilter>,
    /// Bumped on every structural change.
    revision: u64,
    status: CheckStatus,
    outstanding: Option<CheckToken>,
    next_token: u64,
}

impl ProofSession {
    pub fn new(start: ProofDocument, conclusion: impl Into<String>) -> Self {
        let premise_count = start.premise_count();
        Self {
            document: start.clone(),
            initial: start,
            conclusion: conclusion.into(),
            premise_count,
            focus: FocusState::Closed,
            filter: Box::new(StandardFilter),
            revision: 0,
            status: CheckStatus::NotChecked,
            outstanding: None,
            next_token: 0,
        }
    }

    /// Continue a saved attempt: `start` stays the reset point, `current`
    /// becomes the working document.
    pub fn resume(
        start: ProofDocument,
        current: ProofDocument,
        conclusion: impl Into<String>,
    ) -> Self {
        let mut session = Self::new(start, conclusion);
        session.premise_count = current.premise_count();
        session.document = current;
        session
    }

    pub fn with_filter(mut self, filter: impl InputFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn document(&self) -> &ProofDocument {
        &self.document
    }

    pub fn initial_document(&self) -> &ProofDocument {
        &self.initial
    }

    pub fn conclusion(&self) -> &str {
        &self.conclusion
    }

    pub fn premise_count(&self) -> usize {
        self.premise_count
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn status(&self) -> &CheckStatus {
        &self.status
    }

    pub fn is_checking(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.document.leaf_count()
    }

    pub fn rows(&self) -> Vec<ProofRow> {
        view::rows(&self.document)
    }

    pub fn max_depth(&self) -> usize {
        location::max_depth(&self.document)
    }

    fn line(&self, position: usize) -> Result<&ProofLine, EditError> {
        location::flatten(&self.document)
            .into_iter()
            .nth(position)
            .map(|flat| flat.line)
            .ok_or(EditError::NoSuchLine { position })
    }

    // ========================================================================
    // Edit focus
    // ========================================================================

    /// Open the formula cell of the line at `position`.
    pub fn open_formula(&mut self, position: usize) -> Result<(), EditError> {
        if self.line(position)?.is_premise() {
            return Err(EditError::NotEditable {
                line: position + 1,
                reason: "premises are fixed",
            });
        }
        self.commit_focus();
        let initial = self.line(position)?.formula.clone();
        self.focus.open(Cell::Formula, position, initial);
        Ok(())
    }

    /// Open the justification cell of the line at `position`.
    pub fn open_justification(&mut self, position: usize) -> Result<(), EditError> {
        let line = self.line(position)?;
        if line.is_premise() || line.is_hypothesis() {
            return Err(EditError::NotEditable {
                line: position + 1,
                reason: "premise and hypothesis lines carry no rule",
            });
        }
        self.commit_focus();
        let initial = rules::to_display(&self.line(position)?.justification);
        self.focus.open(Cell::Justification, position, initial);
        Ok(())
    }

    /// Replace the live input of the open cell.
    pub fn set_input(&mut self, value: impl Into<String>) -> Result<(), EditError> {
        self.focus.set_input(value)
    }

    /// Write the open cell back to the document and close it. Returns true
    /// when the document changed.
    pub fn commit_focus(&mut self) -> bool {
        match self.focus.take() {
            Some(pending) => self.apply(pending),
            None => false,
        }
    }

    fn apply(&mut self, pending: PendingEdit) -> bool {
        let applied = match pending.cell {
            Cell::Formula => mutation::edit_formula(
                &mut self.document,
                pending.position,
                &pending.value,
                self.filter.as_ref(),
            ),
            Cell::Justification => mutation::edit_justification(
                &mut self.document,
                pending.position,
                &pending.value,
                self.filter.as_ref(),
            ),
        };
        debug!(position = pending.position, cell = ?pending.cell, applied, "committed focus");
        applied
    }

    // ========================================================================
    // Structural commands
    // ========================================================================

    /// Add an empty line below the line at `position`. Returns the new line's
    /// position; its formula cell is left open.
    pub fn add_line(&mut self, position: usize) -> usize {
        self.insert(position, NodeKind::Line, Placement::Sibling)
    }

    /// Start a subproof below the line at `position`.
    pub fn add_subproof(&mut self, position: usize) -> usize {
        self.insert(position, NodeKind::Subproof, Placement::Sibling)
    }

    /// Close the subproof containing `position` and add a line after it.
    pub fn add_line_to_parent(&mut self, position: usize) -> usize {
        self.insert(position, NodeKind::Line, Placement::Parent)
    }

    /// Close the subproof containing `position` and start another after it.
    pub fn add_subproof_to_parent(&mut self, position: usize) -> usize {
        self.insert(position, NodeKind::Subproof, Placement::Parent)
    }

    fn insert(&mut self, position: usize, kind: NodeKind, placement: Placement) -> usize {
        self.commit_focus();
        let at = mutation::insert_after(&mut self.document, position, kind, placement);
        self.structure_changed();
        let new_position = location::position_of(&self.document, &at).unwrap_or(position + 1);
        self.focus.open(Cell::Formula, new_position, String::new());
        new_position
    }

    /// Delete the line at `position`. A subproof's hypothesis is not removed
    /// right away; the returned pending delete must be confirmed.
    pub fn delete_line(&mut self, position: usize) -> DeleteRequest {
        self.commit_focus();
        if self.is_premise(position) {
            debug!(position, "refusing to delete a premise");
            return DeleteRequest::Done(DeleteOutcome::Unchanged);
        }
        match mutation::plan_delete(&self.document, position) {
            None => DeleteRequest::Done(DeleteOutcome::Unchanged),
            Some(Ok(_)) => {
                let outcome = mutation::delete_line(&mut self.document, position, |_| false);
                if outcome.changed() {
                    self.structure_changed();
                }
                DeleteRequest::Done(outcome)
            }
            Some(Err(cascade)) => DeleteRequest::NeedsConfirmation(PendingDelete {
                position,
                cascade,
                revision: self.revision,
            }),
        }
    }

    /// Second phase of a hypothesis delete. A pending delete proposed before
    /// the last structural change no longer applies.
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> DeleteOutcome {
        self.commit_focus();
        if pending.revision != self.revision {
            debug!(
                position = pending.position,
                proposed = pending.revision,
                current = self.revision,
                "pending delete is out of date"
            );
            return DeleteOutcome::Unchanged;
        }
        let outcome = mutation::delete_line(&mut self.document, pending.position, |_| true);
        if outcome.changed() {
            self.structure_changed();
        }
        outcome
    }

    /// One-shot delete asking `confirm` when a whole subproof would go.
    pub fn delete_line_with(
        &mut self,
        position: usize,
        confirm: impl FnOnce(&Cascade) -> bool,
    ) -> DeleteOutcome {
        self.commit_focus();
        if self.is_premise(position) {
            return DeleteOutcome::Unchanged;
        }
        let outcome = mutation::delete_line(&mut self.document, position, confirm);
        if outcome.changed() {
            self.structure_changed();
        }
        outcome
    }

    fn is_premise(&self, position: usize) -> bool {
        self.line(position).is_ok_and(ProofLine::is_premise)
    }

    fn structure_changed(&mut self) {
        self.revision += 1;
        self.premise_count = self.document.premise_count();
    }

    // ========================================================================
    // Direct edits
    // ========================================================================

    pub fn edit_formula(&mut self, position: usize, value: &str) -> Result<(), EditError> {
        if self.line(position)?.is_premise() {
            return Err(EditError::NotEditable {
                line: position + 1,
                reason: "premises are fixed",
            });
        }
        mutation::edit_formula(&mut self.document, position, value, self.filter.as_ref());
        Ok(())
    }

    pub fn edit_justification(&mut self, position: usize, value: &str) -> Result<(), EditError> {
        self.line(position)?;
        if mutation::edit_justification(&mut self.document, position, value, self.filter.as_ref()) {
            Ok(())
        } else {
            Err(EditError::NotEditable {
                line: position + 1,
                reason: "markers are set by the proof structure",
            })
        }
    }

    // ========================================================================
    // Reset and check
    // ========================================================================

    /// Throw the current attempt away and start again from the initial
    /// document. Any check in flight is forgotten.
    pub fn reset(&mut self) {
        self.commit_focus();
        self.document = self.initial.clone();
        self.structure_changed();
        self.status = CheckStatus::NotChecked;
        self.outstanding = None;
        info!(lines = self.line_count(), "session reset");
    }

    /// Start a check. Any earlier outstanding request becomes stale.
    pub fn begin_check(&mut self) -> CheckTicket {
        self.commit_focus();
        self.next_token += 1;
        let token = CheckToken(self.next_token);
        if let Some(previous) = self.outstanding.replace(token) {
            debug!(?previous, ?token, "superseding outstanding check");
        }
        self.status = CheckStatus::Checking;
        info!(?token, lines = self.line_count(), "check started");

        CheckTicket {
            token,
            payload: CheckPayload {
                proof_data: self.document.map_justifications(&rules::to_canonical),
                wanted_conc: self.conclusion.clone(),
                num_prems: self.premise_count,
            },
        }
    }

    /// Apply a checker reply. Returns false, leaving the status alone, when
    /// `token` is not the outstanding request.
    pub fn finish_check(&mut self, token: CheckToken, reply: CheckReply) -> bool {
        if !self.take_outstanding(token) {
            return false;
        }
        self.status = CheckStatus::from_reply(reply);
        info!(?token, status = ?self.status, "check finished");
        true
    }

    /// Record that the request for `token` could not be completed.
    pub fn fail_check(&mut self, token: CheckToken, reason: impl Into<String>) -> bool {
        if !self.take_outstanding(token) {
            return false;
        }
        let reason = reason.into();
        tracing::warn!(?token, %reason, "check failed");
        self.status = CheckStatus::Unavailable { reason };
        true
    }

    fn take_outstanding(&mut self, token: CheckToken) -> bool {
        if self.outstanding != Some(token) {
            debug!(?token, current = ?self.outstanding, "dropping stale check reply");
            return false;
        }
        self.outstanding = None;
        true
    }

    /// Location of the line at `position`, computed now.
    pub fn locate(&self, position: usize) -> Location {
        location::resolve(&self.document, position)
    }
}

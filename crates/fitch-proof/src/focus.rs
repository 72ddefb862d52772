//! The single "currently being edited" cell.
//!
//! At most one cell is open across the whole document. Opening a cell,
//! closing it, or running any structural command first drains the open cell
//! into a [`PendingEdit`], which the session applies before doing anything
//! else. An untouched empty cell drains to nothing.

use crate::error::EditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Formula,
    Justification,
}

/// Edit state of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FocusState {
    #[default]
    Closed,
    EditingFormula {
        position: usize,
        initial: String,
        input: String,
    },
    EditingJustification {
        position: usize,
        initial: String,
        input: String,
    },
}

/// A value waiting to be written back to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub cell: Cell,
    pub position: usize,
    pub value: String,
}

impl FocusState {
    /// The open cell and its flat position.
    pub fn open_cell(&self) -> Option<(Cell, usize)> {
        match self {
            FocusState::Closed => None,
            FocusState::EditingFormula { position, .. } => Some((Cell::Formula, *position)),
            FocusState::EditingJustification { position, .. } => {
                Some((Cell::Justification, *position))
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, FocusState::Closed)
    }

    /// Live input of the open cell.
    pub fn input(&self) -> Option<&str> {
        match self {
            FocusState::Closed => None,
            FocusState::EditingFormula { input, .. }
            | FocusState::EditingJustification { input, .. } => Some(input.as_str()),
        }
    }

    /// Replace the live input of the open cell.
    pub fn set_input(&mut self, value: impl Into<String>) -> Result<(), EditError> {
        match self {
            FocusState::Closed => Err(EditError::NothingOpen),
            FocusState::EditingFormula { input, .. }
            | FocusState::EditingJustification { input, .. } => {
                *input = value.into();
                Ok(())
            }
        }
    }

    /// Close whatever is open and return the edit it leaves behind, if any.
    pub fn take(&mut self) -> Option<PendingEdit> {
        let (cell, position, initial, input) = match std::mem::take(self) {
            FocusState::Closed => return None,
            FocusState::EditingFormula {
                position,
                initial,
                input,
            } => (Cell::Formula, position, initial, input),
            FocusState::EditingJustification {
                position,
                initial,
                input,
            } => (Cell::Justification, position, initial, input),
        };
        if input.is_empty() && input == initial {
            return None;
        }
        Some(PendingEdit {
            cell,
            position,
            value: input,
        })
    }

    /// Open `cell` at `position` with `initial` as its snapshot. Returns the
    /// edit drained from the previously open cell.
    pub fn open(&mut self, cell: Cell, position: usize, initial: String) -> Option<PendingEdit> {
        let pending = self.take();
        *self = match cell {
            Cell::Formula => FocusState::EditingFormula {
                position,
                input: initial.clone(),
                initial,
            },
            Cell::Justification => FocusState::EditingJustification {
                position,
                input: initial.clone(),
                initial,
            },
        };
        pending
    }
}

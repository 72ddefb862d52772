//! Fitch proof documents
//!
//! A proof is an ordered sequence of lines and arbitrarily nested subproofs:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       PROOF SESSION                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  commands ──► ┌────────────┐ ──► ┌──────────────┐            │
//! │               │ Edit focus │     │  Mutation    │            │
//! │               │ (1 cell)   │     │  engine      │            │
//! │               └────────────┘     └──────┬───────┘            │
//! │                                         │ resolve            │
//! │  ┌────────────┐                  ┌──────▼───────┐            │
//! │  │ Rule names │◄── display ──────│  Location &  │            │
//! │  │ translator │                  │  flattening  │            │
//! │  └────────────┘                  └──────────────┘            │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are addressed by their flat (pre-order) position; positions are
//! resolved to a [`Location`] on every operation and never cached across a
//! mutation.

pub mod document;
pub mod error;
pub mod filters;
pub mod focus;
pub mod location;
pub mod mutation;
pub mod rules;
pub mod session;
pub mod view;

pub use document::{ProofDocument, ProofLine, ProofNode, HYPOTHESIS, PREMISE};
pub use error::EditError;
pub use filters::{InputFilter, StandardFilter};
pub use focus::{Cell, FocusState};
pub use location::{flatten, max_depth, resolve, FlatLine, Location};
pub use mutation::{DeleteOutcome, NodeKind, Placement};
pub use session::{
    CheckPayload, CheckReply, CheckStatus, CheckTicket, CheckToken, DeleteRequest, PendingDelete,
    ProofSession,
};
pub use view::ProofRow;

//! Client for the remote Fitch proof checker
//!
//! ```text
//!  ProofSession ──begin_check──► CheckTicket
//!                                    │
//!                    VerificationRequest (form fields)
//!                                    │
//!                 ProofChecker::check ──► HTTP POST ──► checker
//!                                    │
//!  ProofSession ◄──finish_check── CheckReply { issues, concReached }
//! ```
//!
//! The session decides whether a reply is still current; this crate only
//! moves the payload across the wire.

pub mod client;
pub mod config;
pub mod protocol;

pub use client::{run_check, send_check, HttpChecker, ProofChecker, VerifyError};
pub use config::{CheckerConfig, ConfigError};
pub use protocol::{parse_reply, VerificationRequest};

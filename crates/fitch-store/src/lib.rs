//! Saved proof attempts
//!
//! ```text
//! ┌────────────────┐  from_session   ┌─────────────┐   store    ┌───────────────┐
//! │  ProofSession  │ ──────────────► │ ProofRecord │ ─────────► │  ProofStore   │
//! │                │ ◄────────────── │             │ ◄───────── │ (JSON file or │
//! └────────────────┘     resume      └─────────────┘   query    │  in memory)   │
//!                                                               └───────────────┘
//! ```
//!
//! Records are keyed by `(user_submitted, proof_name)`: storing a record for
//! an existing key updates it in place and keeps its id.

pub mod persistence;


use chrono::{DateTime, Utc};
use fitch_proof::{CheckStatus, ProofDocument, ProofSession};
use parking_lot::RwLock;
use persistence::StoreFile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name used for attempts the user never named; never listed.
pub const UNNAMED_PROOF: &str = "n/a";

pub const PROOF_ENTRY: &str = "proof";

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofType {
    /// Propositional (truth-functional) logic.
    Prop,
    /// First-order logic.
    Fol,
}

/// Outcome of the last check, as saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completion {
    True,
    #[default]
    False,
    Error,
}

impl Completion {
    pub fn from_status(status: &CheckStatus) -> Self {
        match status {
            CheckStatus::Complete => Completion::True,
            CheckStatus::Error { .. } => Completion::Error,
            _ => Completion::False,
        }
    }
}

/// One saved attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Assigned by the store; ignored on input.
    pub id: u64,
    pub entry_type: String,
    pub user_submitted: String,
    pub proof_name: String,
    pub proof_type: ProofType,
    pub premise: Vec<String>,
    pub logic: ProofDocument,
    pub completion: Completion,
    pub conclusion: String,
    pub repo_problem: bool,
    /// Set by the store on every write.
    pub time_submitted: DateTime<Utc>,
}

impl ProofRecord {
    /// Snapshot of `session`. Only committed values are captured, so commit
    /// the open cell first if it should be saved.
    pub fn from_session(
        session: &ProofSession,
        user: impl Into<String>,
        proof_name: impl Into<String>,
        proof_type: ProofType,
    ) -> Self {
        Self {
            id: 0,
            entry_type: PROOF_ENTRY.to_string(),
            user_submitted: user.into(),
            proof_name: proof_name.into(),
            proof_type,
            premise: session.initial_document().premises(),
            logic: session.document().clone(),
            completion: Completion::from_status(session.status()),
            conclusion: session.conclusion().to_string(),
            repo_problem: false,
            time_submitted: Utc::now(),
        }
    }

    /// Mark the attempt as started from a repository problem.
    pub fn with_repo_problem(mut self, repo_problem: bool) -> Self {
        self.repo_problem = repo_problem;
        self
    }

    /// Reopen the attempt. Start over returns to the saved premises.
    pub fn resume(&self) -> ProofSession {
        ProofSession::resume(
            ProofDocument::from_premises(self.premise.iter().cloned()),
            self.logic.clone(),
            self.conclusion.clone(),
        )
    }

    fn same_key(&self, other: &ProofRecord) -> bool {
        self.user_submitted == other.user_submitted && self.proof_name == other.proof_name
    }
}

// ============================================================================
// Store
// ============================================================================

pub trait ProofStore: Send + Sync {
    /// Insert `record`, or update the record with the same user and name.
    /// Returns the record as stored.
    fn store(&self, record: ProofRecord) -> anyhow::Result<ProofRecord>;

    /// A user's named attempts that are not yet complete.
    fn user_proofs(&self, user: &str) -> anyhow::Result<Vec<ProofRecord>>;

    fn user_completed_proofs(&self, user: &str) -> anyhow::Result<Vec<ProofRecord>>;

    /// Remove every record.
    fn empty(&self) -> anyhow::Result<()>;
}

/// Configuration for the proof store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file to load from and save to; `None` keeps records in memory.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

/// Records in memory, mirrored to a JSON file when configured.
pub struct FileProofStore {
    config: StoreConfig,
    state: RwLock<StoreFile>,
}

impl FileProofStore {
    pub fn new(config: StoreConfig) -> anyhow::Result<Self> {
        let state = match &config.path {
            Some(path) => persistence::load(path)?,
            None => StoreFile::default(),
        };
        Ok(Self {
            config,
            state: RwLock::new(state),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            config: StoreConfig::default(),
            state: RwLock::new(StoreFile::default()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write `state` to disk. Callers swap it into memory only on success.
    fn persist(&self, state: &StoreFile) -> anyhow::Result<()> {
        match &self.config.path {
            Some(path) => persistence::save(path, state),
            None => Ok(()),
        }
    }

    fn select(&self, keep: impl Fn(&ProofRecord) -> bool) -> Vec<ProofRecord> {
        self.state
            .read()
            .records
            .iter()
            .filter(|r| keep(r))
            .cloned()
            .collect()
    }
}

impl ProofStore for FileProofStore {
    fn store(&self, mut record: ProofRecord) -> anyhow::Result<ProofRecord> {
        let mut state = self.state.write();
        let mut next = state.clone();
        record.time_submitted = Utc::now();

        let existing = next.records.iter().position(|r| r.same_key(&record));
        match existing {
            Some(index) => {
                record.id = next.records[index].id;
                next.records[index] = record.clone();
            }
            None => {
                next.next_id = next.next_id.max(1);
                record.id = next.next_id;
                next.next_id += 1;
                next.records.push(record.clone());
            }
        }

        self.persist(&next)?;
        *state = next;
        tracing::debug!(
            id = record.id,
            name = %record.proof_name,
            updated = existing.is_some(),
            "stored proof"
        );
        Ok(record)
    }

    fn user_proofs(&self, user: &str) -> anyhow::Result<Vec<ProofRecord>> {
        Ok(self.select(|r| {
            r.user_submitted == user
                && r.completion != Completion::True
                && r.proof_name != UNNAMED_PROOF
        }))
    }

    fn user_completed_proofs(&self, user: &str) -> anyhow::Result<Vec<ProofRecord>> {
        Ok(self.select(|r| r.user_submitted == user && r.completion == Completion::True))
    }

    fn empty(&self) -> anyhow::Result<()> {
        let mut state = self.state.write();
        let next = StoreFile {
            next_id: state.next_id,
            records: Vec::new(),
        };
        self.persist(&next)?;
        *state = next;
        tracing::info!("proof store emptied");
        Ok(())
    }
}

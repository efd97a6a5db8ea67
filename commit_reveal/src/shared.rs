use crate::*;
use std::sync::{Arc, Mutex, MutexGuard};

/// An engine shared between threads
///
/// Every operation, reads included, goes through one mutex, which gives all operations a
/// single total order. Clones share the same engine.
pub struct SharedEngine<S: Store = MemStore, C: Clock = SystemClock> {
    inner: Arc<Mutex<Engine<S, C>>>,
}

impl<S: Store, C: Clock> Clone for SharedEngine<S, C> {
    fn clone(&self) -> Self {
        SharedEngine {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Store, C: Clock> From<Engine<S, C>> for SharedEngine<S, C> {
    fn from(engine: Engine<S, C>) -> Self {
        SharedEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }
}

impl<S: Store, C: Clock> SharedEngine<S, C> {
    pub fn new(engine: Engine<S, C>) -> Self {
        engine.into()
    }

    /// Lock the engine for a sequence of operations
    ///
    /// Operations validate before they mutate, so a panic in another holder cannot have left
    /// the engine half-updated and a poisoned lock is taken over as is.
    pub fn lock(&self) -> MutexGuard<'_, Engine<S, C>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn commit_vote(&self, commitment: Commitment) -> Result<(), ValidationError> {
        self.lock().commit_vote(commitment)
    }

    pub fn reveal_vote(
        &self,
        ballot: &str,
        commitment: &Commitment,
    ) -> Result<Choice, ValidationError> {
        self.lock().reveal_vote(ballot, commitment)
    }

    pub fn apply(&self, tx: &Transaction) -> Result<(), ValidationError> {
        self.lock().apply(tx)
    }

    pub fn get_winner(&self) -> Choice {
        self.lock().get_winner()
    }

    pub fn get_vote_commits_array(&self) -> Vec<Commitment> {
        self.lock().get_vote_commits_array()
    }

    pub fn vote_statuses(&self, commitment: &Commitment) -> Result<VoteStatus, CommitmentNotFound> {
        self.lock().vote_statuses(commitment)
    }

    pub fn number_of_votes_cast(&self) -> u64 {
        self.lock().number_of_votes_cast()
    }

    pub fn tally(&self) -> TallyResult {
        self.lock().tally()
    }
}

impl<C: Clock> SharedEngine<MemStore, C> {
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}

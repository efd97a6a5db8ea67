use crate::*;
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("commitment {0} not found")]
pub struct CommitmentNotFound(pub Commitment);

/// Status of a single commitment
#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub enum VoteStatus {
    Committed,
    Revealed,
}

impl std::fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            VoteStatus::Committed => "Committed",
            VoteStatus::Revealed => "Revealed",
        };
        write!(f, "{}", name)
    }
}

/// Everything stored about one commitment
#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub status: VoteStatus,

    /// Clock time of the commit, in seconds
    pub committed_at: u64,

    /// The choice counted when the commitment was revealed
    #[serde(default)]
    pub choice: Option<Choice>,
}

impl VoteRecord {
    pub fn new(committed_at: u64) -> Self {
        VoteRecord {
            status: VoteStatus::Committed,
            committed_at,
            choice: None,
        }
    }
}

/// A commitment store
///
/// Commitments are append-only: a store never removes a record or reorders its sequence.
pub trait Store {
    /// Get the record for a commitment
    fn get_record(&self, commitment: &Commitment) -> Option<VoteRecord>;

    /// Insert a new record, appending the commitment to the submission sequence
    fn insert_record(&mut self, commitment: Commitment, record: VoteRecord);

    /// Overwrite an existing record in place
    fn replace_record(
        &mut self,
        commitment: &Commitment,
        record: VoteRecord,
    ) -> Result<(), CommitmentNotFound>;

    /// All commitments in submission order
    fn commitments(&self) -> Vec<Commitment>;

    /// Number of commitments ever accepted
    fn votes_cast(&self) -> u64;

    /// Record a freshly submitted commitment
    fn record(&mut self, commitment: Commitment, committed_at: u64) {
        self.insert_record(commitment, VoteRecord::new(committed_at));
    }

    fn contains(&self, commitment: &Commitment) -> bool {
        self.get_record(commitment).is_some()
    }

    /// Get the status of a commitment
    fn status_of(&self, commitment: &Commitment) -> Result<VoteStatus, CommitmentNotFound> {
        self.get_record(commitment)
            .map(|record| record.status)
            .ok_or(CommitmentNotFound(*commitment))
    }

    /// Mark a commitment as revealed for `choice`
    fn mark_revealed(
        &mut self,
        commitment: &Commitment,
        choice: Choice,
    ) -> Result<(), CommitmentNotFound> {
        let mut record = self
            .get_record(commitment)
            .ok_or(CommitmentNotFound(*commitment))?;
        record.status = VoteStatus::Revealed;
        record.choice = Some(choice);
        self.replace_record(commitment, record)
    }
}

/// A simple store that uses an in-memory insertion-ordered map
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct MemStore {
    records: IndexMap<Commitment, VoteRecord>,
    votes_cast: u64,
}

impl MemStore {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over commitments and their records in submission order
    pub fn iter(&self) -> impl Iterator<Item = (&Commitment, &VoteRecord)> {
        self.records.iter()
    }
}

impl Store for MemStore {
    fn get_record(&self, commitment: &Commitment) -> Option<VoteRecord> {
        self.records.get(commitment).copied()
    }

    fn insert_record(&mut self, commitment: Commitment, record: VoteRecord) {
        // IndexMap keeps the original position if the key was already present
        self.records.insert(commitment, record);
        self.votes_cast += 1;
    }

    fn replace_record(
        &mut self,
        commitment: &Commitment,
        record: VoteRecord,
    ) -> Result<(), CommitmentNotFound> {
        let stored = self
            .records
            .get_mut(commitment)
            .ok_or(CommitmentNotFound(*commitment))?;
        *stored = record;
        Ok(())
    }

    fn commitments(&self) -> Vec<Commitment> {
        self.records.keys().copied().collect()
    }

    fn votes_cast(&self) -> u64 {
        self.votes_cast
    }
}

impl From<Vec<(Commitment, VoteRecord)>> for MemStore {
    fn from(item: Vec<(Commitment, VoteRecord)>) -> Self {
        let mut memstore = MemStore::default();
        for (commitment, record) in item {
            memstore.insert_record(commitment, record);
        }
        memstore
    }
}

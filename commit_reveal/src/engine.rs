use crate::*;
use log::{debug, info, warn};

/// The commit-reveal voting engine
///
/// Owns the commitment store, the tally and the clock. Mutations take `&mut self` and
/// validate fully before touching any state, so a rejected operation changes nothing.
/// Hosts that share an engine across threads should use [`SharedEngine`].
pub struct Engine<S: Store = MemStore, C: Clock = SystemClock> {
    store: S,
    tally: Tally,
    clock: C,
    config: Config,
}

impl<S: Store, C: Clock> Engine<S, C> {
    /// Create an engine over an existing store
    ///
    /// The tally is rebuilt from the revealed records already in the store.
    pub fn new(store: S, clock: C, config: Config) -> Self {
        let tally = Tally::from_store(&store);
        Engine {
            store,
            tally,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Check that a commitment may be submitted
    pub fn validate_commit(&self, commitment: &Commitment) -> Result<(), ValidationError> {
        if self.store.contains(commitment) {
            return Err(ValidationError::DuplicateCommitment(*commitment));
        }
        Ok(())
    }

    /// Submit a commitment
    pub fn commit_vote(&mut self, commitment: Commitment) -> Result<(), ValidationError> {
        if let Err(e) = self.validate_commit(&commitment) {
            warn!("commit-reveal: rejected commit: {}", e);
            return Err(e);
        }

        let now = self.clock.now();
        self.store.record(commitment, now);
        info!("commit-reveal: committed {} at {}", commitment, now);

        Ok(())
    }

    /// Earliest time at which a commitment may be revealed
    pub fn reveal_ready_at(&self, commitment: &Commitment) -> Result<u64, CommitmentNotFound> {
        let record = self
            .store
            .get_record(commitment)
            .ok_or(CommitmentNotFound(*commitment))?;
        Ok(record.committed_at.saturating_add(self.config.reveal_delay))
    }

    /// Check that a reveal would be accepted right now, returning the parsed ballot
    ///
    /// Checks run in a fixed order: the commitment must exist and still be committed, the
    /// reveal delay must have passed, the ballot must hash to the commitment, and only then
    /// must its choice be one that can be counted.
    pub fn validate_reveal(
        &self,
        ballot: &str,
        commitment: &Commitment,
    ) -> Result<Ballot, ValidationError> {
        let record = self
            .store
            .get_record(commitment)
            .ok_or(ValidationError::UnknownCommitment(*commitment))?;

        if record.status == VoteStatus::Revealed {
            return Err(ValidationError::AlreadyRevealed(*commitment));
        }

        let now = self.clock.now();
        let ready_at = record.committed_at.saturating_add(self.config.reveal_delay);
        if now < ready_at {
            return Err(ValidationError::RevealTooEarly { ready_at, now });
        }

        verify_reveal(ballot, commitment)
    }

    /// Reveal a previously committed ballot and count it
    pub fn reveal_vote(
        &mut self,
        ballot: &str,
        commitment: &Commitment,
    ) -> Result<Choice, ValidationError> {
        let ballot = match self.validate_reveal(ballot, commitment) {
            Ok(ballot) => ballot,
            Err(e) => {
                warn!("commit-reveal: rejected reveal: {}", e);
                return Err(e);
            }
        };

        self.store.mark_revealed(commitment, ballot.choice)?;
        self.tally.record(ballot.choice);
        info!("commit-reveal: revealed {} for {}", commitment, ballot.choice);
        debug!(
            "commit-reveal: tally is now {} - {}",
            self.tally.votes_for_choice_1(),
            self.tally.votes_for_choice_2()
        );

        Ok(ballot.choice)
    }

    /// Apply a transaction
    pub fn apply(&mut self, tx: &Transaction) -> Result<(), ValidationError> {
        match tx {
            Transaction::Commit(tx) => self.commit_vote(tx.commitment),
            Transaction::Reveal(tx) => self.reveal_vote(&tx.ballot, &tx.commitment).map(|_| ()),
        }
    }

    /// Check a transaction without applying it
    pub fn validate(&self, tx: &Transaction) -> Result<(), ValidationError> {
        match tx {
            Transaction::Commit(tx) => self.validate_commit(&tx.commitment),
            Transaction::Reveal(tx) => self
                .validate_reveal(&tx.ballot, &tx.commitment)
                .map(|_| ()),
        }
    }

    /// The current tally leader
    ///
    /// This reflects the reveals processed so far. Whether the reveal window is over is the
    /// caller's concern.
    pub fn get_winner(&self) -> Choice {
        self.tally.winner()
    }

    /// All commitments in submission order
    pub fn get_vote_commits_array(&self) -> Vec<Commitment> {
        self.store.commitments()
    }

    pub fn vote_statuses(&self, commitment: &Commitment) -> Result<VoteStatus, CommitmentNotFound> {
        self.store.status_of(commitment)
    }

    pub fn number_of_votes_cast(&self) -> u64 {
        self.store.votes_cast()
    }

    pub fn votes_for_choice_1(&self) -> u64 {
        self.tally.votes_for_choice_1()
    }

    pub fn votes_for_choice_2(&self) -> u64 {
        self.tally.votes_for_choice_2()
    }

    pub fn tally(&self) -> TallyResult {
        self.tally.result()
    }
}

impl<C: Clock> Engine<MemStore, C> {
    /// An empty in-memory engine
    pub fn with_clock(clock: C, config: Config) -> Self {
        Engine::new(MemStore::default(), clock, config)
    }

    /// Capture the complete engine state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config,
            store: self.store.clone(),
            tally: self.tally,
        }
    }

    /// Rebuild an engine from a snapshot
    ///
    /// The tally is recounted from the store, so a snapshot whose stored tally disagrees
    /// with its records can't skew the result.
    pub fn restore(snapshot: Snapshot, clock: C) -> Self {
        if let Err(e) = snapshot.validate() {
            warn!("commit-reveal: restoring inconsistent snapshot: {}", e);
        }
        Engine::new(snapshot.store, clock, snapshot.config)
    }
}

impl Default for Engine<MemStore, SystemClock> {
    fn default() -> Self {
        Engine::with_clock(SystemClock, Config::default())
    }
}

/// Persistable engine state
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub config: Config,
    pub store: MemStore,
    pub tally: Tally,
}

impl Snapshot {
    /// An empty state with the given config
    pub fn new(config: Config) -> Self {
        Snapshot {
            config,
            ..Snapshot::default()
        }
    }

    /// Decode a snapshot, rejecting one whose parts don't agree with each other
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        let snapshot: Snapshot = serde_json::from_slice(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check that the counters and the tally agree with the stored records
    pub fn validate(&self) -> Result<(), Error> {
        let records = self.store.len() as u64;
        if self.store.votes_cast() < records {
            return Err(Error::InconsistentState(format!(
                "{} votes cast but {} commitments stored",
                self.store.votes_cast(),
                records
            )));
        }

        for (commitment, record) in self.store.iter() {
            let has_choice = record.choice.is_some();
            if has_choice != (record.status == VoteStatus::Revealed) {
                return Err(Error::InconsistentState(format!(
                    "commitment {} is {} with choice {:?}",
                    commitment, record.status, record.choice
                )));
            }
        }

        let counted = Tally::from_store(&self.store);
        if counted != self.tally {
            return Err(Error::InconsistentState(format!(
                "tally is {} - {} but revealed records give {} - {}",
                self.tally.votes_for_choice_1(),
                self.tally.votes_for_choice_2(),
                counted.votes_for_choice_1(),
                counted.votes_for_choice_2()
            )));
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn engine(clock: &ManualClock) -> Engine<MemStore, ManualClock> {
        Engine::with_clock(clock.clone(), Config::with_reveal_delay(120))
    }

    #[test]
    fn test_commit() {
        let clock = ManualClock::new(1_000);
        let mut engine = engine(&clock);
        let commitment = Commitment::of_str("1~mybigsecret");

        engine.commit_vote(commitment).unwrap();

        assert_eq!(engine.get_vote_commits_array(), vec![commitment]);
        assert_eq!(engine.vote_statuses(&commitment), Ok(VoteStatus::Committed));
        assert_eq!(engine.number_of_votes_cast(), 1);
        assert_eq!(engine.reveal_ready_at(&commitment), Ok(1_120));
    }

    #[test]
    fn test_duplicate_commit_rejected() {
        let clock = ManualClock::new(0);
        let mut engine = engine(&clock);
        let commitment = Commitment::of_str("1~mybigsecret");

        engine.commit_vote(commitment).unwrap();
        clock.advance(120);
        engine.reveal_vote("1~mybigsecret", &commitment).unwrap();

        assert_eq!(
            engine.commit_vote(commitment),
            Err(ValidationError::DuplicateCommitment(commitment))
        );
        assert_eq!(engine.vote_statuses(&commitment), Ok(VoteStatus::Revealed));
        assert_eq!(engine.number_of_votes_cast(), 1);
        assert_eq!(engine.get_vote_commits_array().len(), 1);
    }

    #[test]
    fn test_reveal_delay_boundary() {
        let clock = ManualClock::new(500);
        let mut engine = engine(&clock);
        let commitment = Commitment::of_str("2~mybigsecret");
        engine.commit_vote(commitment).unwrap();

        clock.advance(119);
        assert_eq!(
            engine.reveal_vote("2~mybigsecret", &commitment),
            Err(ValidationError::RevealTooEarly {
                ready_at: 620,
                now: 619
            })
        );

        clock.advance(1);
        assert_eq!(engine.reveal_vote("2~mybigsecret", &commitment), Ok(Choice::No));
    }

    #[test]
    fn test_too_early_beats_bad_ballot() {
        let clock = ManualClock::new(0);
        let mut engine = engine(&clock);
        let commitment = Commitment::of_str("1~s");
        engine.commit_vote(commitment).unwrap();

        assert!(matches!(
            engine.reveal_vote("2~wrong", &commitment),
            Err(ValidationError::RevealTooEarly { .. })
        ));
    }

    #[test]
    fn test_unknown_commitment() {
        let clock = ManualClock::new(0);
        let mut engine = engine(&clock);
        let commitment = Commitment::of_str("1~s");

        assert_eq!(
            engine.reveal_vote("1~s", &commitment),
            Err(ValidationError::UnknownCommitment(commitment))
        );
        assert_eq!(
            engine.vote_statuses(&commitment),
            Err(CommitmentNotFound(commitment))
        );
        assert_eq!(
            engine.reveal_ready_at(&commitment),
            Err(CommitmentNotFound(commitment))
        );
    }

    #[test]
    fn test_zero_delay() {
        let clock = ManualClock::new(42);
        let mut engine = Engine::with_clock(clock, Config::with_reveal_delay(0));
        let commitment = Commitment::of_str("1~s");

        engine.commit_vote(commitment).unwrap();
        assert_eq!(engine.reveal_vote("1~s", &commitment), Ok(Choice::Yes));
    }

    #[test]
    fn test_apply_transactions() {
        let clock = ManualClock::new(0);
        let mut engine = engine(&clock);
        let commitment = Commitment::of_str("2~s");

        let commit = Transaction::commit(commitment);
        let reveal = Transaction::reveal("2~s", commitment);

        engine.validate(&commit).unwrap();
        engine.apply(&commit).unwrap();
        assert!(engine.validate(&reveal).is_err());

        clock.advance(120);
        engine.validate(&reveal).unwrap();

        // Validating alone changes nothing
        assert_eq!(engine.votes_for_choice_2(), 0);

        engine.apply(&reveal).unwrap();
        assert_eq!(engine.votes_for_choice_2(), 1);
        assert_eq!(
            engine.apply(&reveal),
            Err(ValidationError::AlreadyRevealed(commitment))
        );
    }

    #[test]
    fn test_snapshot_restore() {
        let clock = ManualClock::new(0);
        let mut engine = engine(&clock);
        let first = Commitment::of_str("1~a");
        let second = Commitment::of_str("2~b");

        engine.commit_vote(first).unwrap();
        engine.commit_vote(second).unwrap();
        clock.advance(120);
        engine.reveal_vote("1~a", &first).unwrap();

        let json = engine.snapshot().to_json().unwrap();
        let snapshot = Snapshot::from_json(json.as_bytes()).unwrap();
        assert_eq!(snapshot, engine.snapshot());

        let mut restored = Engine::restore(snapshot, clock.clone());
        assert_eq!(restored.config().reveal_delay, 120);
        assert_eq!(restored.get_vote_commits_array(), vec![first, second]);
        assert_eq!(restored.vote_statuses(&first), Ok(VoteStatus::Revealed));
        assert_eq!(restored.votes_for_choice_1(), 1);

        restored.reveal_vote("2~b", &second).unwrap();
        assert_eq!(restored.votes_for_choice_2(), 1);
        assert_eq!(restored.number_of_votes_cast(), 2);
    }

    #[test]
    fn test_new_over_existing_store_keeps_tally() {
        let clock = ManualClock::new(0);
        let mut engine = engine(&clock);
        let commitment = Commitment::of_str("1~mybigsecret");

        engine.commit_vote(commitment).unwrap();
        clock.advance(120);
        engine.reveal_vote("1~mybigsecret", &commitment).unwrap();

        let reopened = Engine::new(engine.store().clone(), clock.clone(), *engine.config());
        assert_eq!(reopened.vote_statuses(&commitment), Ok(VoteStatus::Revealed));
        assert_eq!(reopened.votes_for_choice_1(), 1);
        assert_eq!(reopened.get_winner(), Choice::Yes);
        assert_eq!(reopened.tally(), engine.tally());
    }

    fn edited_snapshot(edit: impl FnOnce(&mut serde_json::Value)) -> Vec<u8> {
        let clock = ManualClock::new(0);
        let mut engine = engine(&clock);
        let first = Commitment::of_str("1~a");
        let second = Commitment::of_str("2~b");

        engine.commit_vote(first).unwrap();
        engine.commit_vote(second).unwrap();
        clock.advance(120);
        engine.reveal_vote("1~a", &first).unwrap();

        let mut value = serde_json::to_value(&engine.snapshot()).unwrap();
        edit(&mut value);
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_snapshot_rejects_inconsistent_state() {
        // Untouched state loads fine
        assert!(Snapshot::from_json(&edited_snapshot(|_| {})).is_ok());

        // Fewer votes cast than stored commitments
        let bytes = edited_snapshot(|value| value["store"]["votes_cast"] = 1.into());
        assert!(matches!(
            Snapshot::from_json(&bytes),
            Err(Error::InconsistentState(_))
        ));

        // Tally counts a reveal that no record backs
        let bytes = edited_snapshot(|value| value["tally"]["votes_for_choice_2"] = 1.into());
        assert!(matches!(
            Snapshot::from_json(&bytes),
            Err(Error::InconsistentState(_))
        ));

        // Tally lost a reveal that a record backs
        let bytes = edited_snapshot(|value| value["tally"]["votes_for_choice_1"] = 0.into());
        assert!(matches!(
            Snapshot::from_json(&bytes),
            Err(Error::InconsistentState(_))
        ));

        // A revealed record without its choice
        let first = Commitment::of_str("1~a").to_string();
        let bytes = edited_snapshot(|value| {
            value["store"]["records"][&first]["choice"] = serde_json::Value::Null
        });
        assert!(matches!(
            Snapshot::from_json(&bytes),
            Err(Error::InconsistentState(_))
        ));
    }

    #[test]
    fn test_restore_recounts_tally() {
        let commitment = Commitment::of_str("1~a");
        let mut snapshot = Snapshot::new(Config::with_reveal_delay(0));
        snapshot.store.record(commitment, 0);
        snapshot.store.mark_revealed(&commitment, Choice::Yes).unwrap();

        // The stored tally is stale, the records win
        assert!(snapshot.validate().is_err());
        let restored = Engine::restore(snapshot, ManualClock::new(0));
        assert_eq!(restored.votes_for_choice_1(), 1);
        assert_eq!(restored.get_winner(), Choice::Yes);
    }
}

use crate::*;

/// Running counts of revealed votes
#[derive(Serialize, Deserialize, Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    votes_for_choice_1: u64,
    votes_for_choice_2: u64,
}

impl Tally {
    /// Count the choices of every revealed record in a store
    pub fn from_store<S: Store>(store: &S) -> Self {
        let mut tally = Tally::default();
        for commitment in store.commitments() {
            if let Some(VoteRecord {
                status: VoteStatus::Revealed,
                choice: Some(choice),
                ..
            }) = store.get_record(&commitment)
            {
                tally.record(choice);
            }
        }
        tally
    }

    pub fn record(&mut self, choice: Choice) {
        match choice {
            Choice::Yes => self.votes_for_choice_1 += 1,
            Choice::No => self.votes_for_choice_2 += 1,
        }
    }

    pub fn votes_for_choice_1(&self) -> u64 {
        self.votes_for_choice_1
    }

    pub fn votes_for_choice_2(&self) -> u64 {
        self.votes_for_choice_2
    }

    pub fn votes_for(&self, choice: Choice) -> u64 {
        match choice {
            Choice::Yes => self.votes_for_choice_1,
            Choice::No => self.votes_for_choice_2,
        }
    }

    /// Total revealed votes
    pub fn total(&self) -> u64 {
        self.votes_for_choice_1 + self.votes_for_choice_2
    }

    /// The current leader
    ///
    /// YES wins only with strictly more votes. A tie, including an empty tally, goes to NO.
    pub fn winner(&self) -> Choice {
        if self.votes_for_choice_1 > self.votes_for_choice_2 {
            Choice::Yes
        } else {
            Choice::No
        }
    }

    pub fn is_tied(&self) -> bool {
        self.votes_for_choice_1 == self.votes_for_choice_2
    }

    pub fn result(&self) -> TallyResult {
        TallyResult {
            votes_for_choice_1: self.votes_for_choice_1,
            votes_for_choice_2: self.votes_for_choice_2,
            tied: self.is_tied(),
            winner: self.winner(),
        }
    }
}

/// A point-in-time view of a tally
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TallyResult {
    pub votes_for_choice_1: u64,
    pub votes_for_choice_2: u64,
    pub tied: bool,
    pub winner: Choice,
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_empty_tally() {
        let tally = Tally::default();
        assert_eq!(tally.total(), 0);
        assert!(tally.is_tied());
        assert_eq!(tally.winner(), Choice::No);
    }

    #[test]
    fn test_winner() {
        let mut tally = Tally::default();

        tally.record(Choice::Yes);
        assert_eq!(tally.winner(), Choice::Yes);
        assert_eq!(tally.winner().name(), "YES");

        tally.record(Choice::No);
        assert!(tally.is_tied());
        assert_eq!(tally.winner(), Choice::No);

        tally.record(Choice::No);
        assert_eq!(tally.winner(), Choice::No);
        assert_eq!(tally.votes_for(Choice::Yes), 1);
        assert_eq!(tally.votes_for(Choice::No), 2);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_from_store() {
        let mut store = MemStore::default();
        let ballots = ["1~a", "1~b", "2~c", "1~d"];
        for ballot in ballots.iter() {
            store.record(Commitment::of_str(ballot), 0);
        }
        store.mark_revealed(&Commitment::of_str("1~a"), Choice::Yes).unwrap();
        store.mark_revealed(&Commitment::of_str("2~c"), Choice::No).unwrap();
        store.mark_revealed(&Commitment::of_str("1~d"), Choice::Yes).unwrap();

        // "1~b" is still only committed and doesn't count
        let tally = Tally::from_store(&store);
        assert_eq!(tally.votes_for_choice_1(), 2);
        assert_eq!(tally.votes_for_choice_2(), 1);
        assert_eq!(tally.winner(), Choice::Yes);

        assert_eq!(Tally::from_store(&MemStore::default()), Tally::default());
    }

    #[test]
    fn test_result() {
        let mut tally = Tally::default();
        tally.record(Choice::Yes);
        tally.record(Choice::Yes);
        tally.record(Choice::No);

        let result = tally.result();
        assert_eq!(
            result,
            TallyResult {
                votes_for_choice_1: 2,
                votes_for_choice_2: 1,
                tied: false,
                winner: Choice::Yes,
            }
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["winner"], "YES");
        assert_eq!(json["votes_for_choice_1"], 2);
    }
}

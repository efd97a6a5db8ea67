use crate::*;

/// A submitted operation
///
/// This is the form in which a host receives the two mutating operations, for example as
/// a posted JSON document: `{"type": "commit", "commitment": "<hex>"}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum Transaction {
    Commit(CommitTransaction),
    Reveal(RevealTransaction),
}

impl Transaction {
    pub fn commit(commitment: Commitment) -> Self {
        Transaction::Commit(CommitTransaction { commitment })
    }

    pub fn reveal(ballot: &str, commitment: Commitment) -> Self {
        Transaction::Reveal(RevealTransaction {
            ballot: ballot.to_owned(),
            commitment,
        })
    }

    /// Get the transaction type
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Transaction::Commit(_) => TransactionType::Commit,
            Transaction::Reveal(_) => TransactionType::Reveal,
        }
    }

    /// The commitment this transaction refers to
    pub fn commitment(&self) -> Commitment {
        match self {
            Transaction::Commit(tx) => tx.commitment,
            Transaction::Reveal(tx) => tx.commitment,
        }
    }

    /// Pack into CBOR bytes
    pub fn as_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Unpack from JSON or CBOR bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        // A CBOR map never starts with whitespace or `{`
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        match first {
            None if bytes.is_empty() => Err(Error::DeserializationEmpty),
            Some(b'{') | None => Ok(serde_json::from_slice(bytes)?),
            Some(_) => Ok(serde_cbor::from_slice(bytes)?),
        }
    }
}

impl From<CommitTransaction> for Transaction {
    fn from(tx: CommitTransaction) -> Self {
        Transaction::Commit(tx)
    }
}

impl From<RevealTransaction> for Transaction {
    fn from(tx: RevealTransaction) -> Self {
        Transaction::Reveal(tx)
    }
}

/// Submit a commitment
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CommitTransaction {
    pub commitment: Commitment,
}

/// Reveal the ballot behind a commitment
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RevealTransaction {
    /// The ballot exactly as it was hashed, `<choice>~<secret>`
    pub ballot: String,
    pub commitment: Commitment,
}

/// A transaction type
#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Commit,
    Reveal,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            TransactionType::Commit => "Commit",
            TransactionType::Reveal => "Reveal",
        };
        write!(f, "{}", name)
    }
}

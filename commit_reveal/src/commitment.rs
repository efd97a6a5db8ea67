use crate::*;
use digest::Digest;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::Keccak256;
use std::str::FromStr;

/// Length in bytes of a commitment digest
pub const COMMITMENT_LEN: usize = 32;

/// A vote commitment
///
/// The keccak-256 digest of a ballot string. This is the same digest Ethereum tooling produces
/// for `soliditySha3(string)`, so commitments generated by voters with that tooling verify here.
///
/// In text form a commitment is 64 lowercase hex characters. A leading `0x` is accepted
/// when parsing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Commitment([u8; COMMITMENT_LEN]);

impl Commitment {
    /// Wrap raw digest bytes
    pub fn from_array(bytes: [u8; COMMITMENT_LEN]) -> Self {
        Commitment(bytes)
    }

    /// Commit to arbitrary bytes
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Keccak256::digest(bytes);
        let mut out = [0u8; COMMITMENT_LEN];
        out.copy_from_slice(&digest);
        Commitment(out)
    }

    /// Commit to a ballot string, hashing its exact UTF-8 bytes
    pub fn of_str(ballot: &str) -> Self {
        Self::of(ballot.as_bytes())
    }

    pub fn to_array(&self) -> [u8; COMMITMENT_LEN] {
        self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl AsRef<[u8]> for Commitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; COMMITMENT_LEN]> for Commitment {
    fn from(bytes: [u8; COMMITMENT_LEN]) -> Self {
        Commitment(bytes)
    }
}

impl From<Commitment> for [u8; COMMITMENT_LEN] {
    fn from(item: Commitment) -> Self {
        item.0
    }
}

impl FromStr for Commitment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| Error::CommitmentBadHex)?;

        if bytes.len() != COMMITMENT_LEN {
            return Err(Error::CommitmentBadLen(bytes.len()));
        }

        let mut out = [0u8; COMMITMENT_LEN];
        out.copy_from_slice(&bytes);
        Ok(Commitment(out))
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for Commitment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

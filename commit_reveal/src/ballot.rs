use crate::*;
use num_enum::TryFromPrimitive;
use rand::Rng;
use std::str::FromStr;

/// Separator between the choice and the secret in a ballot string
pub const BALLOT_SEPARATOR: char = '~';

/// A ballot choice
#[derive(Serialize, Deserialize, TryFromPrimitive, Copy, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Choice {
    Yes = 1,
    No = 2,
}

impl Choice {
    /// Outcome name reported by a tally
    pub fn name(&self) -> &'static str {
        match self {
            Choice::Yes => "YES",
            Choice::No => "NO",
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Choice {
    type Err = ValidationError;

    /// Parse the numeric choice token of a ballot (`1` or `2`)
    ///
    /// Any canonical integer is well formed, so `3`, `256` and `-1` are invalid choices
    /// while `01`, `+1`, `-0` and `yes` are malformed ballots.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::MalformedBallot);
        }

        // Exactly one spelling per number
        if digits.starts_with('0') && (digits.len() > 1 || digits.len() != s.len()) {
            return Err(ValidationError::MalformedBallot);
        }

        s.parse::<u8>()
            .ok()
            .and_then(|value| Choice::try_from_primitive(value).ok())
            .ok_or_else(|| ValidationError::InvalidChoice(s.to_owned()))
    }
}

/// A plaintext ballot: `<choice>~<secret>`
///
/// The secret is everything after the first separator and may itself contain `~`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Ballot {
    pub choice: Choice,
    pub secret: String,
}

impl Ballot {
    pub fn new(choice: Choice, secret: &str) -> Self {
        Ballot {
            choice,
            secret: secret.to_owned(),
        }
    }

    /// Create a ballot with a random 128 bit hex secret
    pub fn generate(choice: Choice) -> Self {
        let mut csprng = rand::rngs::OsRng {};
        let secret: [u8; 16] = csprng.gen();

        Ballot {
            choice,
            secret: hex::encode(secret),
        }
    }

    /// The commitment a voter submits for this ballot
    pub fn commitment(&self) -> Commitment {
        Commitment::of_str(&self.to_string())
    }
}

impl FromStr for Ballot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, BALLOT_SEPARATOR);
        let choice = parts.next().ok_or(ValidationError::MalformedBallot)?;
        let secret = parts.next().ok_or(ValidationError::MalformedBallot)?;

        Ok(Ballot {
            choice: choice.parse()?,
            secret: secret.to_owned(),
        })
    }
}

impl std::fmt::Display for Ballot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}{}", self.choice as u8, BALLOT_SEPARATOR, self.secret)
    }
}

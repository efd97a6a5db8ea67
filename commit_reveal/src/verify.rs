use crate::*;

/// Check that a revealed ballot string hashes to the claimed commitment
///
/// The ballot is hashed exactly as given, so any difference in whitespace, separator or
/// casing from what the voter committed to fails verification.
pub fn verify(ballot: &str, commitment: &Commitment) -> bool {
    Commitment::of_str(ballot) == *commitment
}

/// Verify a reveal and parse the ballot it carries
pub fn verify_reveal(ballot: &str, commitment: &Commitment) -> Result<Ballot, ValidationError> {
    if !verify(ballot, commitment) {
        return Err(ValidationError::InvalidReveal(*commitment));
    }

    ballot.parse()
}

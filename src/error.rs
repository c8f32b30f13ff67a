//! Error taxonomy for the MtA / Batch-COT core.

/// Errors occurring during the validation or the execution of the MtA protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A buffer could not be decoded into a valid wire message: wrong length, a compressed
    /// point with an invalid prefix byte, or a point encoding that is not on the curve.
    WireFormatError,
    /// The `session_id` of an incoming message does not match the one recorded at round 1.
    SessionMismatch,
    /// A round was invoked on a state that is not in the round's required pre-state (e.g. the
    /// protocol already reached its terminal state).
    ProtocolStateError,
    /// The RNG failed to produce usable randomness: a sampled scalar was zero after bounded
    /// retries, an explicitly supplied scalar was zero, or the RNG returned fewer than the
    /// requested number of bytes.
    RandomnessError,
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::WireFormatError => {
                f.write_str("the message buffer could not be decoded into a valid wire message")
            }
            Error::SessionMismatch => {
                f.write_str("the message's session id does not match the session in progress")
            }
            Error::ProtocolStateError => {
                f.write_str("this round cannot be run on the current protocol state")
            }
            Error::RandomnessError => {
                f.write_str("the RNG failed to produce a usable scalar or enough random bytes")
            }
        }
    }
}

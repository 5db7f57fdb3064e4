use core::{fmt, result};

#[cfg(not(feature = "std"))]
use alloc::{borrow::ToOwned, format, string::String};

use hex::FromHexError;
use light_taproot_schnorr::Error as SchnorrError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MastError {
    /// Key, tweak or signature rejected by the schnorr layer
    Schnorr(SchnorrError),
    /// Format error of hex
    FromHexError(String),
    /// The tapscript is not a leaf of the parsed tree
    ScriptNotFound,
    /// Malformed textual tree
    InvalidTreeFormat(String),
    /// Leaf version outside the BIP341 set
    InvalidLeafVersion(u8),
    /// More merkle nodes than a control block can carry
    MaxNodeCountExceeded(usize),
    /// Control block of the wrong size
    InvalidControlBlock(usize),
    /// Witness stack without any element
    EmptyWitnessStack,
    /// Malformed witness serialization
    InvalidWitness,
}

impl fmt::Display for MastError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MastError::Schnorr(e) => write!(f, "{}", e),
            MastError::FromHexError(e) => write!(f, "invalid hex: {}", e),
            MastError::ScriptNotFound => f.write_str("tapscript not found in tree"),
            MastError::InvalidTreeFormat(e) => write!(f, "invalid tree format: {}", e),
            MastError::InvalidLeafVersion(v) => write!(f, "unsupported leaf version {:#04x}", v),
            MastError::MaxNodeCountExceeded(n) => write!(f, "too many tree nodes: {}", n),
            MastError::InvalidControlBlock(n) => write!(f, "invalid control block size: {}", n),
            MastError::EmptyWitnessStack => f.write_str("witness stack is empty"),
            MastError::InvalidWitness => f.write_str("invalid witness serialization"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MastError {}

impl From<SchnorrError> for MastError {
    fn from(e: SchnorrError) -> Self {
        MastError::Schnorr(e)
    }
}

impl From<FromHexError> for MastError {
    fn from(e: FromHexError) -> Self {
        match e {
            FromHexError::InvalidHexCharacter { c, index } => {
                MastError::FromHexError(format!("InvalidHexCharacter {}, {}", c, index))
            }
            FromHexError::OddLength => MastError::FromHexError("OddLength".to_owned()),
            FromHexError::InvalidStringLength => {
                MastError::FromHexError("InvalidStringLength".to_owned())
            }
        }
    }
}

impl From<light_taproot_serialization::Error> for MastError {
    fn from(_: light_taproot_serialization::Error) -> Self {
        MastError::InvalidWitness
    }
}

pub type Result<T> = result::Result<T, MastError>;

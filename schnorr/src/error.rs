use core::{fmt, result};

use hex::FromHexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input of the wrong size for a fixed-size type
    InvalidLength { expected: usize, actual: usize },
    /// Empty or otherwise unusable argument
    InvalidArgument(&'static str),
    /// Format error of hex
    InvalidHex,
    /// Key bytes are not a valid scalar or curve point
    InvalidKey,
    /// Tweak overflows the group order or cancels the key out
    InvalidTweak,
    /// Signature bytes are malformed
    InvalidSignature,
    /// Sighash type not allowed for schnorr signatures
    InvalidSigHashType(u8),
    /// Curve arithmetic failed on input that had already been validated
    InternalCrypto(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidLength { expected, actual } => {
                write!(f, "Invalid length: expected {}, got {}", expected, actual)
            }
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::InvalidHex => f.write_str("Invalid hex"),
            Error::InvalidKey => f.write_str("Invalid key"),
            Error::InvalidTweak => f.write_str("Invalid tweak"),
            Error::InvalidSignature => f.write_str("Invalid signature"),
            Error::InvalidSigHashType(t) => write!(f, "Invalid sighash type: {:#04x}", t),
            Error::InternalCrypto(msg) => write!(f, "Internal crypto error: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<FromHexError> for Error {
    fn from(_: FromHexError) -> Self {
        Error::InvalidHex
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Checks `bytes` has exactly `N` bytes and copies them out.
pub(crate) fn to_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    if bytes.len() != N {
        return Err(Error::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

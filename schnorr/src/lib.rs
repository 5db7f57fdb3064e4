//! BIP340 schnorr signatures and X-only key tweaks over secp256k1.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod curve;
pub mod error;
mod keypair;
mod private;
mod public;
pub mod schnorrsig;
pub mod signature;
pub mod taggedhash;
pub mod xonly;

pub use self::error::{Error, Result};
pub use self::keypair::KeyPair;
pub use self::private::Privkey;
pub use self::public::Pubkey;
pub use self::schnorrsig::{
    compute_sig_point, compute_sig_point_batch, message_from_slice, sign, sign_with_nonce, verify,
    Message,
};
#[cfg(feature = "getrandom")]
pub use self::schnorrsig::sign_random;
pub use self::signature::{SchnorrSignature, SCHNORR_SIGNATURE_SIZE, SIGHASH_DEFAULT};
pub use self::taggedhash::{tagged_hash, HashAdd, HashInto, Tagged};
pub use self::xonly::{SchnorrPubkey, SCHNORR_PUBKEY_SIZE};

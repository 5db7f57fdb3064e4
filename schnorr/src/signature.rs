//! This is 64-byte schnorr signature.
//!
//! More details:
//! [`BIP340`]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki#design
//!
//! A signature may also carry the sighash type that BIP341 appends as a
//! 65th byte on the witness stack.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};
use core::{
    convert::{TryFrom, TryInto},
    fmt,
    str::FromStr,
};

use arrayref::array_ref;
use codec::{Decode, Encode};
use light_taproot_primitives::H512;

use crate::{
    error::{Error, Result},
    private::Privkey,
    xonly::SchnorrPubkey,
};

pub const SCHNORR_SIGNATURE_SIZE: usize = 64;
/// Sighash type implied by a 64-byte signature.
pub const SIGHASH_DEFAULT: u8 = 0x00;

/// A standard for 64-byte Schnorr signatures over the elliptic curve secp256k1
#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode, scale_info::TypeInfo)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SchnorrSignature {
    data: H512,
    sighash_type: u8,
}

impl SchnorrSignature {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        SchnorrSignature {
            data: H512::from(bytes),
            sighash_type: SIGHASH_DEFAULT,
        }
    }

    /// Parses 64 bytes, or 65 bytes whose last byte is a non-default sighash type.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            SCHNORR_SIGNATURE_SIZE => Ok(Self::from_bytes(*array_ref!(bytes, 0, 64))),
            65 => {
                let sighash_type = bytes[SCHNORR_SIGNATURE_SIZE];
                if sighash_type == SIGHASH_DEFAULT || !Self::is_valid_sighash_type(sighash_type) {
                    return Err(Error::InvalidSigHashType(sighash_type));
                }
                Self::from_bytes(*array_ref!(bytes, 0, 64)).with_sighash_type(sighash_type)
            }
            actual => Err(Error::InvalidLength {
                expected: SCHNORR_SIGNATURE_SIZE,
                actual,
            }),
        }
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::parse(&hex::decode(s)?)
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        *self.data.as_fixed_bytes()
    }

    /// Signature bytes, with the sighash type appended when requested and
    /// not the default.
    pub fn serialize(&self, append_sighash_type: bool) -> Vec<u8> {
        let mut out = self.data.as_bytes().to_vec();
        if append_sighash_type && self.sighash_type != SIGHASH_DEFAULT {
            out.push(self.sighash_type);
        }
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.data.as_bytes())
    }

    pub fn sighash_type(&self) -> u8 {
        self.sighash_type
    }

    pub fn with_sighash_type(mut self, sighash_type: u8) -> Result<Self> {
        if !Self::is_valid_sighash_type(sighash_type) {
            return Err(Error::InvalidSigHashType(sighash_type));
        }
        self.sighash_type = sighash_type;
        Ok(self)
    }

    /// ALL/NONE/SINGLE with or without ANYONECANPAY, plus the default.
    pub fn is_valid_sighash_type(sighash_type: u8) -> bool {
        matches!(sighash_type, 0x00..=0x03 | 0x81..=0x83)
    }

    /// The nonce point `R`, as an X-only key.
    pub fn nonce(&self) -> SchnorrPubkey {
        SchnorrPubkey::from(*array_ref!(self.data.as_bytes(), 0, 32))
    }

    /// The response scalar `s`, in private key form.
    ///
    /// Fails when `s` is zero or not below the group order, which no valid
    /// signature has.
    pub fn privkey(&self) -> Result<Privkey> {
        Privkey::parse(array_ref!(self.data.as_bytes(), 32, 32)).map_err(|_| Error::InvalidSignature)
    }
}

impl TryFrom<&str> for SchnorrSignature {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::from_hex(value)
    }
}

impl FromStr for SchnorrSignature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.try_into()
    }
}

impl From<[u8; 64]> for SchnorrSignature {
    fn from(bytes: [u8; 64]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for SchnorrSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.serialize(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIG: &str = "6470fd1303dda4fda717b9837153c24a6eab377183fc438f939e0ed2b620e9ee5077c4a8b8dca28963d772a94f5f0ddf598e1c47c137f91933274c7c3edadce8";

    #[test]
    fn test_nonce_and_privkey() {
        let sig = SchnorrSignature::from_hex(SIG).unwrap();
        assert_eq!(
            sig.nonce().to_hex(),
            "6470fd1303dda4fda717b9837153c24a6eab377183fc438f939e0ed2b620e9ee"
        );
        assert_eq!(
            sig.privkey().unwrap().to_hex(),
            "5077c4a8b8dca28963d772a94f5f0ddf598e1c47c137f91933274c7c3edadce8"
        );
        assert_eq!(sig.to_hex(), SIG);
    }

    #[test]
    fn test_privkey_of_out_of_range_s() {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&hex::decode(&SIG[..64]).unwrap());
        let zero_s = SchnorrSignature::from_bytes(bytes);
        assert_eq!(zero_s.privkey(), Err(Error::InvalidSignature));

        bytes[32..].copy_from_slice(&[0xff; 32]);
        let overflow_s = SchnorrSignature::from_bytes(bytes);
        assert_eq!(overflow_s.privkey(), Err(Error::InvalidSignature));
        assert_eq!(overflow_s.nonce(), zero_s.nonce());
    }

    #[test]
    fn test_sighash_suffix() {
        let with_all = format!("{}01", SIG);
        let sig = SchnorrSignature::from_hex(&with_all).unwrap();
        assert_eq!(sig.sighash_type(), 0x01);
        assert_eq!(hex::encode(sig.serialize(true)), with_all);
        assert_eq!(sig.to_hex(), SIG);
        assert_eq!(sig.serialize(false).len(), 64);

        let default = SchnorrSignature::from_hex(SIG).unwrap();
        assert_eq!(default.serialize(true).len(), 64);

        assert_eq!(
            SchnorrSignature::from_hex(&format!("{}00", SIG)),
            Err(Error::InvalidSigHashType(0x00))
        );
        assert_eq!(
            SchnorrSignature::from_hex(&format!("{}84", SIG)),
            Err(Error::InvalidSigHashType(0x84))
        );
        assert!(default.with_sighash_type(0x83).is_ok());
        assert!(default.with_sighash_type(0x80).is_err());
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            SchnorrSignature::parse(&[0u8; 63]),
            Err(Error::InvalidLength {
                expected: 64,
                actual: 63
            })
        );
    }
}

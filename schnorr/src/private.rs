//! Wrapped the [`Secret`] scalar into a private key

#[cfg(not(feature = "std"))]
use alloc::string::String;
use core::{convert::TryFrom, fmt, str::FromStr};

use light_taproot_primitives::H256;
#[cfg(feature = "getrandom")]
use rand_core::{OsRng, RngCore};
#[cfg(feature = "std")]
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    curve::{parse_tweak, Point, Secret},
    error::{to_array, Error, Result},
    public::Pubkey,
};

/// 32-byte secp256k1 private key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Privkey(Secret);

impl Privkey {
    pub fn parse(bytes: &[u8; 32]) -> Result<Self> {
        Secret::parse(bytes).map(Privkey)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::parse(&to_array::<32>(bytes)?)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_slice(&hex::decode(s)?)
    }

    pub fn serialize(&self) -> [u8; 32] {
        self.0.serialize()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::from(Point::from_secret(&self.0))
    }

    pub fn negate(&self) -> Self {
        Privkey(self.0.neg())
    }

    /// `self + tweak` modulo the group order.
    pub fn create_tweak_add(&self, tweak: &H256) -> Result<Self> {
        let tweak = parse_tweak(tweak.as_fixed_bytes())?;
        self.0.tweak_add(&tweak).map(Privkey)
    }

    /// Sum of two private keys, the secret of the combined public keys.
    pub fn combine(&self, other: &Privkey) -> Result<Self> {
        self.0
            .tweak_add(other.0.scalar())
            .map(Privkey)
            .map_err(|_| Error::InvalidKey)
    }

    #[cfg(feature = "getrandom")]
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; 32];
        loop {
            OsRng.fill_bytes(&mut key);
            if let Ok(privkey) = Self::parse(&key) {
                return Ok(privkey);
            }
        }
    }

    pub(crate) fn secret(&self) -> &Secret {
        &self.0
    }

    pub(crate) fn from_secret(secret: Secret) -> Self {
        Privkey(secret)
    }
}

impl fmt::Debug for Privkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Privkey(..)")
    }
}

impl FromStr for Privkey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<&str> for Privkey {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::from_hex(value)
    }
}

#[cfg(feature = "std")]
impl Serialize for Privkey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "std")]
impl<'de> Deserialize<'de> for Privkey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Privkey::from_hex(&s).map_err(|_| SerdeError::custom("struct Privkey"))
    }
}

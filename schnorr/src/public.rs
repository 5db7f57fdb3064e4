//! Full (non X-only) secp256k1 public key.

#[cfg(not(feature = "std"))]
use alloc::string::String;
use core::{fmt, str::FromStr};

use light_taproot_primitives::H264;
#[cfg(feature = "std")]
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    curve::Point,
    error::{Error, Result},
};

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Pubkey(Point);

impl Pubkey {
    /// Parses the compressed (33 bytes) or uncompressed (65 bytes) form.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Point::parse(bytes).map(Pubkey)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::parse(&hex::decode(s)?)
    }

    /// Compressed encoding.
    pub fn serialize(&self) -> H264 {
        H264::from(self.0.serialize_compressed())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.serialize_compressed())
    }

    pub fn is_odd_y(&self) -> bool {
        self.0.is_odd_y()
    }

    /// Sum of the given points.
    pub fn combine(pubkeys: &[Pubkey]) -> Result<Self> {
        let (first, rest) = pubkeys
            .split_first()
            .ok_or(Error::InvalidArgument("no pubkeys to combine"))?;
        rest.iter()
            .try_fold(first.0, |acc, pk| acc.add_point(&pk.0))
            .map(Pubkey)
    }

    pub(crate) fn point(&self) -> &Point {
        &self.0
    }
}

impl From<Point> for Pubkey {
    fn from(p: Point) -> Self {
        Pubkey(p)
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Pubkey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

#[cfg(feature = "std")]
impl Serialize for Pubkey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "std")]
impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_hex(&s).map_err(|_| SerdeError::custom("struct Pubkey"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubkey_parse_forms() {
        let compressed = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
        let uncompressed = "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";
        let a = Pubkey::from_hex(compressed).unwrap();
        let b = Pubkey::from_hex(uncompressed).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.to_hex(), compressed);
        assert!(!a.is_odd_y());
        assert_eq!(
            Pubkey::from_hex("0579be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
            Err(Error::InvalidKey)
        );
        assert_eq!(
            Pubkey::parse(&[2u8; 32]),
            Err(Error::InvalidLength {
                expected: 33,
                actual: 32
            })
        );
    }

    #[test]
    fn test_pubkey_combine_empty() {
        assert!(matches!(
            Pubkey::combine(&[]),
            Err(Error::InvalidArgument(_))
        ));
    }
}

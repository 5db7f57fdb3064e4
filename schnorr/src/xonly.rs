//! X-only public keys and the BIP340/BIP341 tweak operations on them.

#[cfg(not(feature = "std"))]
use alloc::string::String;
use core::{fmt, str::FromStr};

use codec::{Decode, Encode};
use light_taproot_primitives::H256;
use subtle::ConstantTimeEq;

use crate::{
    curve::{negate_tweak, parse_tweak, Point},
    error::{to_array, Error, Result},
    keypair::KeyPair,
    private::Privkey,
    public::Pubkey,
    schnorrsig::{self, Message},
    signature::SchnorrSignature,
    taggedhash::HashInto,
};

pub const SCHNORR_PUBKEY_SIZE: usize = 32;

/// 32-byte X coordinate of a secp256k1 point.
///
/// The all-zero default stands for "not set". Bytes are not checked against
/// the curve until a curve operation needs the point, so any 32-byte
/// commitment can be carried in this type.
#[derive(
    Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, scale_info::TypeInfo,
)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SchnorrPubkey(H256);

impl SchnorrPubkey {
    /// Accepts 32 non-zero X-only bytes, or a 33/65-byte full point whose
    /// parity is dropped.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            33 | 65 => Ok(Self::from_pubkey(&Pubkey::parse(bytes)?).0),
            _ => {
                let key = SchnorrPubkey(H256::from(to_array::<32>(bytes)?));
                if !key.is_valid() {
                    return Err(Error::InvalidArgument("empty schnorr pubkey"));
                }
                Ok(key)
            }
        }
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_slice(&hex::decode(s)?)
    }

    /// X-only key of `privkey` and whether its full point has odd Y.
    pub fn from_privkey(privkey: &Privkey) -> (Self, bool) {
        Self::from_pubkey(&privkey.pubkey())
    }

    pub fn from_pubkey(pubkey: &Pubkey) -> (Self, bool) {
        let point = pubkey.point();
        (Self::from(point.x_only()), point.is_odd_y())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_fixed_bytes()
    }

    pub fn as_h256(&self) -> &H256 {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// `false` for the unset all-zero key.
    pub fn is_valid(&self) -> bool {
        !self.0.is_zero()
    }

    pub(crate) fn point(&self) -> Result<Point> {
        Point::lift_x(self.as_bytes())
    }

    /// The full point with the given Y parity.
    pub fn create_pubkey(&self, parity: bool) -> Result<Pubkey> {
        let point = self.point()?;
        Ok(Pubkey::from(if parity { point.neg() } else { point }))
    }

    /// `lift_x(self) + tweak * G`, as an X-only key and its Y parity.
    pub fn create_tweak_add(&self, tweak: &H256) -> Result<(Self, bool)> {
        let tweak = parse_tweak(tweak.as_fixed_bytes())?;
        let tweaked = self
            .point()
            .map_err(|_| Error::InvalidTweak)?
            .tweak_add(&tweak)?;
        Ok((Self::from(tweaked.x_only()), tweaked.is_odd_y()))
    }

    /// Applies `tweak` to the key pair of `privkey`.
    ///
    /// The returned private key already includes the negation for an odd
    /// internal point, so `from_privkey(tweaked_privkey)` gives back the
    /// returned X-only key and parity.
    pub fn create_tweak_add_from_privkey(
        privkey: &Privkey,
        tweak: &H256,
    ) -> Result<(Self, Privkey, bool)> {
        let keypair = KeyPair::from_privkey(privkey);
        let tweak = parse_tweak(tweak.as_fixed_bytes())?;
        let tweaked = keypair.secret().tweak_add(&tweak)?;
        let point = Point::from_secret(&tweaked);
        Ok((
            Self::from(point.x_only()),
            Privkey::from_secret(tweaked),
            point.is_odd_y(),
        ))
    }

    /// Whether `self` with `parity` is `base` tweaked by `tweak`.
    pub fn is_tweaked(&self, base: &SchnorrPubkey, tweak: &H256, parity: bool) -> bool {
        match base.create_tweak_add(tweak) {
            Ok((expected, expected_parity)) => {
                let same_key = expected.as_bytes()[..].ct_eq(&self.as_bytes()[..]);
                let same_parity = (expected_parity as u8).ct_eq(&(parity as u8));
                (same_key & same_parity).into()
            }
            Err(_) => false,
        }
    }

    pub fn tweak_add(&self, tweak: &H256) -> Result<Self> {
        Ok(self.create_tweak_add(tweak)?.0)
    }

    /// Adds the additive inverse of `tweak`.
    ///
    /// Undoes `tweak_add` only when that tweak produced an even-Y point.
    pub fn tweak_subtract(&self, tweak: &H256) -> Result<Self> {
        let negated = H256::from(negate_tweak(tweak.as_fixed_bytes())?);
        self.tweak_add(&negated)
    }

    pub fn verify(&self, signature: &SchnorrSignature, msg: &Message) -> bool {
        schnorrsig::verify(signature, msg, self)
    }
}

impl From<[u8; 32]> for SchnorrPubkey {
    fn from(bytes: [u8; 32]) -> Self {
        SchnorrPubkey(H256::from(bytes))
    }
}

impl From<H256> for SchnorrPubkey {
    fn from(hash: H256) -> Self {
        SchnorrPubkey(hash)
    }
}

impl HashInto for SchnorrPubkey {
    fn hash_into(&self, hash: &mut impl digest::Digest) {
        hash.update(self.as_bytes())
    }
}

impl fmt::Debug for SchnorrPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for SchnorrPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SchnorrPubkey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SK: &str = "688c77bc2d5aaff5491cf309d4753b732135470d05b7b2cd21add0744fe97bef";
    const PUBKEY: &str = "b33cc9edc096d0a83416964bd3c6247b8fecd256e4efa7870d2c854bdeb33390";
    const TWEAK1: &str = "45cfe14923541d2908a64f32aaf09b703dbd2cfb256830b0eebc5573b15a4476";
    const TWEAK2: &str = "0daf700e00c25a75feb3b747a5f31ba58f4a7c3c7b36eaceef7cb882a06a9bf1";

    fn h256(s: &str) -> H256 {
        H256::from_slice(&hex::decode(s).unwrap())
    }

    #[test]
    fn test_from_privkey() {
        let sk = Privkey::from_hex(SK).unwrap();
        let (pubkey, parity) = SchnorrPubkey::from_privkey(&sk);
        assert_eq!(pubkey.to_hex(), PUBKEY);
        assert!(parity);
    }

    #[test]
    fn test_from_pubkey() {
        let even = Pubkey::from_hex(
            "024d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d",
        )
        .unwrap();
        let odd = Pubkey::from_hex(
            "034d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d",
        )
        .unwrap();
        let (xonly, parity) = SchnorrPubkey::from_pubkey(&even);
        assert_eq!(
            xonly.to_hex(),
            "4d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d"
        );
        assert!(!parity);
        let (xonly_odd, parity) = SchnorrPubkey::from_pubkey(&odd);
        assert_eq!(xonly_odd, xonly);
        assert!(parity);
        assert_eq!(xonly.create_pubkey(true).unwrap(), odd);
        assert_eq!(xonly.create_pubkey(false).unwrap(), even);
    }

    #[test]
    fn test_from_slice_forms() {
        let full = SchnorrPubkey::from_hex(
            "034d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d",
        )
        .unwrap();
        assert_eq!(
            full.to_hex(),
            "4d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d"
        );
        assert_eq!(
            SchnorrPubkey::from_slice(&[1u8; 31]),
            Err(Error::InvalidLength {
                expected: 32,
                actual: 31
            })
        );
        assert!(!SchnorrPubkey::default().is_valid());
        assert!(full.is_valid());
    }

    #[test]
    fn test_from_slice_rejects_empty_key() {
        assert_eq!(
            SchnorrPubkey::from_slice(&[0u8; 32]),
            Err(Error::InvalidArgument("empty schnorr pubkey"))
        );
        assert!(SchnorrPubkey::from_hex(&"00".repeat(32)).is_err());
        // any other 32 bytes pass, curve point or not
        assert!(SchnorrPubkey::from_slice(&[0xff; 32]).is_ok());
    }

    #[test]
    fn test_create_tweak_add() {
        let pubkey = SchnorrPubkey::from_hex(PUBKEY).unwrap();

        let (tweaked, parity) = pubkey.create_tweak_add(&h256(TWEAK1)).unwrap();
        assert_eq!(
            tweaked.to_hex(),
            "ac52f50b28cdd4d3bcb7f0d5cb533f232e4c4ef12fbf3e718420b84d4e3c3440"
        );
        assert!(parity);

        let (tweaked, parity) = pubkey.create_tweak_add(&h256(TWEAK2)).unwrap();
        assert_eq!(
            tweaked.to_hex(),
            "943203db3a9a8845a4aee1af81b76cb9ec60ab08d700df59a32426a4e6e1557b"
        );
        assert!(!parity);
    }

    #[test]
    fn test_create_tweak_add_rejects_overflowing_tweak() {
        let pubkey = SchnorrPubkey::from_hex(PUBKEY).unwrap();
        assert_eq!(
            pubkey.create_tweak_add(&H256::repeat_byte(0xff)),
            Err(Error::InvalidTweak)
        );
    }

    #[test]
    fn test_create_tweak_add_from_privkey() {
        let sk = Privkey::from_hex(SK).unwrap();
        let (tweaked, tweaked_sk, parity) =
            SchnorrPubkey::create_tweak_add_from_privkey(&sk, &h256(TWEAK1)).unwrap();
        assert_eq!(
            tweaked.to_hex(),
            "ac52f50b28cdd4d3bcb7f0d5cb533f232e4c4ef12fbf3e718420b84d4e3c3440"
        );
        assert_eq!(
            tweaked_sk.to_hex(),
            "dd43698cf5f96d33bf895c28d67b5ffbd736c2d4cef91e1f8ce0e38c31a709c8"
        );
        assert!(parity);
        assert_eq!(SchnorrPubkey::from_privkey(&tweaked_sk), (tweaked, parity));
    }

    #[test]
    fn test_is_tweaked() {
        let base = SchnorrPubkey::from_hex(PUBKEY).unwrap();
        let tweaked = SchnorrPubkey::from_hex(
            "ac52f50b28cdd4d3bcb7f0d5cb533f232e4c4ef12fbf3e718420b84d4e3c3440",
        )
        .unwrap();
        assert!(tweaked.is_tweaked(&base, &h256(TWEAK1), true));
        assert!(!tweaked.is_tweaked(&base, &h256(TWEAK1), false));
        assert!(!tweaked.is_tweaked(&base, &h256(TWEAK2), true));
        assert!(!tweaked.is_tweaked(&base, &H256::repeat_byte(0xff), true));
    }

    #[test]
    fn test_tweak_subtract_undoes_even_tweak() {
        let pubkey = SchnorrPubkey::from_hex(PUBKEY).unwrap();
        let tweak = h256(TWEAK2);
        let tweaked = pubkey.tweak_add(&tweak).unwrap();
        assert_eq!(tweaked.tweak_subtract(&tweak).unwrap(), pubkey);
    }

    #[test]
    fn test_combined_key() {
        let sk_a =
            Privkey::from_hex("1d52f68124c59c3125d5c2e043cabf01cef46fafaf45be3132fc1f52ff0ec434")
                .unwrap();
        let sk_b =
            Privkey::from_hex("353a88e3c404380d9970d9b2d8ee9f6051b3d817ab32aabc12f5c3c65086e659")
                .unwrap();
        let expected = "c6cf31d72599553158c6ffed6139946bbd3a1648a6b1ef56bea812878bb2df71";

        let sk_c = sk_a.combine(&sk_b).unwrap();
        assert_eq!(SchnorrPubkey::from_privkey(&sk_c).0.to_hex(), expected);

        let pk = Pubkey::combine(&[sk_a.pubkey(), sk_b.pubkey()]).unwrap();
        assert_eq!(SchnorrPubkey::from_pubkey(&pk).0.to_hex(), expected);

        // tweaking by the other key's X coordinate is not key combination
        let pk_b = SchnorrPubkey::from_privkey(&sk_b).0;
        let pk_a = SchnorrPubkey::from_privkey(&sk_a).0;
        assert_ne!(pk_a.tweak_add(pk_b.as_h256()).unwrap().to_hex(), expected);
    }
}

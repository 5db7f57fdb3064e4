//! Tagged hashes from [BIP340](https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki#design).
//!
//! `tagged_hash(tag, msg) = SHA256(SHA256(tag) || SHA256(tag) || msg)`

use digest::Digest;
use light_taproot_primitives::H256;
use sha2::Sha256;

pub const TAG_TAP_LEAF: &[u8] = b"TapLeaf";
pub const TAG_TAP_BRANCH: &[u8] = b"TapBranch";
pub const TAG_TAP_TWEAK: &[u8] = b"TapTweak";
pub const TAG_BIP340_AUX: &[u8] = b"BIP0340/aux";
pub const TAG_BIP340_NONCE: &[u8] = b"BIP0340/nonce";
pub const TAG_BIP340_CHALLENGE: &[u8] = b"BIP0340/challenge";

/// Feeds a value into a running digest.
pub trait HashInto {
    fn hash_into(&self, hash: &mut impl Digest);
}

impl HashInto for [u8] {
    fn hash_into(&self, hash: &mut impl Digest) {
        hash.update(self)
    }
}

impl<const N: usize> HashInto for [u8; N] {
    fn hash_into(&self, hash: &mut impl Digest) {
        hash.update(&self[..])
    }
}

impl HashInto for H256 {
    fn hash_into(&self, hash: &mut impl Digest) {
        hash.update(self.as_bytes())
    }
}

pub trait HashAdd {
    fn add<T: HashInto + ?Sized>(self, data: &T) -> Self;
}

impl<D: Digest> HashAdd for D {
    fn add<T: HashInto + ?Sized>(mut self, data: &T) -> Self {
        data.hash_into(&mut self);
        self
    }
}

/// Prefixes a digest with the BIP340 tag.
pub trait Tagged {
    fn tagged(self, tag: &[u8]) -> Self;
}

impl<D: Digest> Tagged for D {
    fn tagged(self, tag: &[u8]) -> Self {
        let tag_hash = Sha256::digest(tag);
        self.chain(&tag_hash).chain(&tag_hash)
    }
}

pub fn tagged_hash(tag: &[u8], msg: &[u8]) -> H256 {
    let hash = Sha256::default().tagged(tag).add(msg).finalize();
    H256::from_slice(hash.as_slice())
}

//! BIP340 signing, verification and signature points.

use core::ops::Neg;

use digest::Digest;
use libsecp256k1::curve::Scalar;
use light_taproot_primitives::{h256_from_slice, H256};

use crate::{
    curve::{scalar_reduce, Point, Secret},
    error::{Error, Result},
    keypair::KeyPair,
    private::Privkey,
    public::Pubkey,
    signature::SchnorrSignature,
    taggedhash::{HashAdd, Tagged, TAG_BIP340_AUX, TAG_BIP340_CHALLENGE, TAG_BIP340_NONCE},
    xonly::SchnorrPubkey,
};

/// 32 bytes long signable message
pub type Message = H256;

/// Checks a message is exactly 32 bytes.
pub fn message_from_slice(bytes: &[u8]) -> Result<Message> {
    h256_from_slice(bytes).ok_or(Error::InvalidLength {
        expected: 32,
        actual: bytes.len(),
    })
}

/// Construct schnorr sig challenge
/// hash(R_x|P_x|msg)
fn challenge(rx: &[u8; 32], pkx: &[u8; 32], msg: &Message) -> Scalar {
    let tagged = sha2::Sha256::default()
        .tagged(TAG_BIP340_CHALLENGE)
        .add(rx)
        .add(pkx)
        .add(msg)
        .finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(tagged.as_slice());
    scalar_reduce(&bytes)
}

/// Nonce derivation from BIP340, masking the even-Y secret with the hashed
/// auxiliary randomness.
fn nonce_bip340(keypair: &KeyPair, msg: &Message, aux: &H256) -> Scalar {
    let aux_tagged = sha2::Sha256::default()
        .tagged(TAG_BIP340_AUX)
        .add(aux)
        .finalize();
    let mut masked = keypair.secret().serialize();
    for (byte, mask) in masked.iter_mut().zip(aux_tagged.iter()) {
        *byte ^= mask;
    }

    let nonce_tagged = sha2::Sha256::default()
        .tagged(TAG_BIP340_NONCE)
        .add(&masked)
        .add(keypair.public().as_bytes())
        .add(msg)
        .finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(nonce_tagged.as_slice());
    scalar_reduce(&bytes)
}

/// `s = k + e * d` with `k` negated when `R` has odd Y.
fn sign_with_scalar_nonce(msg: &Message, keypair: &KeyPair, nonce: Scalar) -> Result<SchnorrSignature> {
    let k0 = Secret::from_scalar(nonce).map_err(|_| Error::InternalCrypto("nonce is zero"))?;
    let r = Point::from_secret(&k0);
    let k = if r.is_odd_y() { k0.neg() } else { k0 };

    let rx = r.x_only();
    let e = challenge(&rx, keypair.public().as_bytes(), msg);
    let s = *k.scalar() + e * *keypair.secret().scalar();

    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(&rx);
    bytes[32..].copy_from_slice(&s.b32());
    Ok(SchnorrSignature::from_bytes(bytes))
}

/// Sign a message with BIP340 nonce derivation from `aux_rand`.
pub fn sign(msg: &Message, privkey: &Privkey, aux_rand: &H256) -> Result<SchnorrSignature> {
    let keypair = KeyPair::from_privkey(privkey);
    let nonce = nonce_bip340(&keypair, msg, aux_rand);
    sign_with_scalar_nonce(msg, &keypair, nonce)
}

/// Sign a message with fresh auxiliary randomness.
#[cfg(feature = "getrandom")]
pub fn sign_random(msg: &Message, privkey: &Privkey) -> Result<SchnorrSignature> {
    use rand_core::{OsRng, RngCore};

    let mut aux = [0u8; 32];
    OsRng.fill_bytes(&mut aux);
    sign(msg, privkey, &H256::from(aux))
}

/// Sign with a caller-chosen nonce, skipping BIP340 nonce derivation.
///
/// Reusing `nonce` for two different messages leaks the private key.
pub fn sign_with_nonce(msg: &Message, privkey: &Privkey, nonce: &Privkey) -> Result<SchnorrSignature> {
    let keypair = KeyPair::from_privkey(privkey);
    sign_with_scalar_nonce(msg, &keypair, *nonce.secret().scalar())
}

/// Verify a schnorr signature
pub fn verify(signature: &SchnorrSignature, msg: &Message, pubkey: &SchnorrPubkey) -> bool {
    let p = match pubkey.point() {
        Ok(p) => p,
        Err(_) => return false,
    };
    let bytes = signature.to_bytes();
    let mut rx = [0u8; 32];
    rx.copy_from_slice(&bytes[..32]);
    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&bytes[32..]);

    if Point::lift_x(&rx).is_err() {
        return false;
    }
    let mut s = Scalar::default();
    if bool::from(s.set_b32(&s_bytes)) {
        return false;
    }

    let e = challenge(&rx, pubkey.as_bytes(), msg);
    // R = s * G - e * P
    match p.mul_add(&e.neg(), &s) {
        Ok(r) => !r.is_odd_y() && r.x_only() == rx,
        Err(_) => false,
    }
}

/// The point `s * G` a valid signature with this nonce would have:
/// `lift_x(nonce) + e * lift_x(pubkey)`.
pub fn compute_sig_point(msg: &Message, nonce: &SchnorrPubkey, pubkey: &SchnorrPubkey) -> Result<Pubkey> {
    let r = nonce.point()?;
    let p = pubkey.point()?;
    let e = challenge(nonce.as_bytes(), pubkey.as_bytes(), msg);
    p.mul_add_point(&e, &r)
        .map(Pubkey::from)
        .map_err(|_| Error::InternalCrypto("signature point is infinity"))
}

/// Sum of the signature points of several messages signed by one key.
pub fn compute_sig_point_batch(
    msgs: &[Message],
    nonces: &[SchnorrPubkey],
    pubkey: &SchnorrPubkey,
) -> Result<Pubkey> {
    if msgs.len() != nonces.len() || msgs.is_empty() {
        return Err(Error::InvalidArgument(
            "expected the same number of messages and nonces, and at least one",
        ));
    }
    let p = pubkey.point()?;

    let mut points = nonces.iter().map(SchnorrPubkey::point);
    let first = points.next().ok_or(Error::InvalidArgument("no nonce"))??;
    let rs = points.try_fold(first, |acc, point| acc.add_point(&point?))?;

    let e_sum = msgs
        .iter()
        .zip(nonces)
        .fold(Scalar::from_int(0), |acc, (msg, nonce)| {
            acc + challenge(nonce.as_bytes(), pubkey.as_bytes(), msg)
        });

    p.mul_add_point(&e_sum, &rs)
        .map(Pubkey::from)
        .map_err(|_| Error::InternalCrypto("signature point is infinity"))
}

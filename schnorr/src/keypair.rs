//! Secret and public key held together for signing and tweaking.

use crate::{
    curve::{Point, Secret},
    private::Privkey,
    xonly::SchnorrPubkey,
};

/// A private key with its X-only public key.
///
/// `secret` is already negated when the full point has odd Y, so that
/// `secret * G` is always `lift_x(public)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    secret: Secret,
    public: SchnorrPubkey,
    parity: bool,
}

impl KeyPair {
    pub fn from_privkey(privkey: &Privkey) -> Self {
        let parity = Point::from_secret(privkey.secret()).is_odd_y();
        let (secret, point) = privkey.secret().to_even_y();
        KeyPair {
            secret,
            public: SchnorrPubkey::from(point.x_only()),
            parity,
        }
    }

    pub fn from_secret_hex(secret: &str) -> crate::error::Result<Self> {
        Ok(KeyPair::from_privkey(&Privkey::from_hex(secret)?))
    }

    /// The even-Y secret.
    pub fn secret_key(&self) -> Privkey {
        Privkey::from_secret(self.secret)
    }

    pub fn public(&self) -> &SchnorrPubkey {
        &self.public
    }

    /// Whether the original private key's point had odd Y.
    pub fn parity(&self) -> bool {
        self.parity
    }

    pub(crate) fn secret(&self) -> &Secret {
        &self.secret
    }
}

//! Wrap [`Affine`] and [`Scalar`] into points and secrets.
//!
//! Every other module goes through this one for curve arithmetic; nothing
//! above it touches libsecp256k1 types directly.

use core::{fmt, ops::Neg};

use arrayref::{array_mut_ref, array_ref};
use libsecp256k1::{
    curve::{Affine, Field, Jacobian, Scalar},
    ECMULT_CONTEXT, ECMULT_GEN_CONTEXT,
};

use crate::error::{Error, Result};

const TAG_PUBKEY_EVEN: u8 = 0x02;
const TAG_PUBKEY_ODD: u8 = 0x03;
const TAG_PUBKEY_FULL: u8 = 0x04;

/// A curve point other than infinity, with normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point(Affine);

/// A scalar in `[1, n)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secret(Scalar);

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Reduces 32 big-endian bytes modulo the group order.
pub fn scalar_reduce(bytes: &[u8; 32]) -> Scalar {
    let mut scalar = Scalar::default();
    let _ = scalar.set_b32(bytes);
    scalar
}

/// Parses a tweak, which may be zero but must be below the group order.
pub fn parse_tweak(bytes: &[u8; 32]) -> Result<Scalar> {
    let mut scalar = Scalar::default();
    if bool::from(scalar.set_b32(bytes)) {
        return Err(Error::InvalidTweak);
    }
    Ok(scalar)
}

/// Additive inverse of a tweak, as 32 bytes.
pub fn negate_tweak(bytes: &[u8; 32]) -> Result<[u8; 32]> {
    Ok(parse_tweak(bytes)?.neg().b32())
}

impl Point {
    fn from_jacobian(j: &Jacobian) -> Result<Self> {
        if j.is_infinity() {
            return Err(Error::InvalidKey);
        }
        let mut p = Affine::default();
        p.set_gej(j);
        p.x.normalize();
        p.y.normalize();
        Ok(Point(p))
    }

    /// `secret * G`
    pub fn from_secret(secret: &Secret) -> Self {
        let mut pj = Jacobian::default();
        ECMULT_GEN_CONTEXT.ecmult_gen(&mut pj, &secret.0);
        let mut p = Affine::default();
        p.set_gej(&pj);
        p.x.normalize();
        p.y.normalize();
        Point(p)
    }

    /// `lift_x` from BIP340: the point with this X coordinate and even Y.
    pub fn lift_x(x: &[u8; 32]) -> Result<Self> {
        Self::from_x(x, false)
    }

    fn from_x(x: &[u8; 32], odd: bool) -> Result<Self> {
        let mut elem = Field::default();
        let mut affine = Affine::default();
        if elem.set_b32(x) && affine.set_xo_var(&elem, odd) {
            affine.x.normalize();
            affine.y.normalize();
            Ok(Point(affine))
        } else {
            Err(Error::InvalidKey)
        }
    }

    /// Parses the 33-byte compressed or 65-byte uncompressed encoding.
    pub fn parse(p: &[u8]) -> Result<Self> {
        match p.len() {
            33 => {
                if !(p[0] == TAG_PUBKEY_EVEN || p[0] == TAG_PUBKEY_ODD) {
                    return Err(Error::InvalidKey);
                }
                Self::from_x(array_ref!(p, 1, 32), p[0] == TAG_PUBKEY_ODD)
            }
            65 => {
                if p[0] != TAG_PUBKEY_FULL {
                    return Err(Error::InvalidKey);
                }
                let mut x = Field::default();
                let mut y = Field::default();
                if !x.set_b32(array_ref!(p, 1, 32)) || !y.set_b32(array_ref!(p, 33, 32)) {
                    return Err(Error::InvalidKey);
                }
                let mut elem = Affine::default();
                elem.set_xy(&x, &y);
                if elem.is_infinity() || !elem.is_valid_var() {
                    return Err(Error::InvalidKey);
                }
                elem.x.normalize();
                elem.y.normalize();
                Ok(Point(elem))
            }
            actual => Err(Error::InvalidLength {
                expected: 33,
                actual,
            }),
        }
    }

    pub fn x_only(&self) -> [u8; 32] {
        self.0.x.b32()
    }

    pub fn is_odd_y(&self) -> bool {
        self.0.y.is_odd()
    }

    pub fn serialize_compressed(&self) -> [u8; 33] {
        let mut ret = [0u8; 33];
        self.0.x.fill_b32(array_mut_ref!(ret, 1, 32));
        ret[0] = if self.is_odd_y() {
            TAG_PUBKEY_ODD
        } else {
            TAG_PUBKEY_EVEN
        };
        ret
    }

    pub fn neg(&self) -> Self {
        let mut p = self.0.neg();
        p.y.normalize();
        Point(p)
    }

    /// `self + rhs`, failing when the sum is infinity.
    pub fn add_point(&self, rhs: &Self) -> Result<Self> {
        let j = Jacobian::from_ge(&self.0).add_ge_var(&rhs.0, None);
        Self::from_jacobian(&j)
    }

    /// `na * self + ng * G`
    pub fn mul_add(&self, na: &Scalar, ng: &Scalar) -> Result<Self> {
        let mut r = Jacobian::default();
        ECMULT_CONTEXT.ecmult(&mut r, &Jacobian::from_ge(&self.0), na, ng);
        Self::from_jacobian(&r)
    }

    /// `na * self + rhs`
    pub fn mul_add_point(&self, na: &Scalar, rhs: &Self) -> Result<Self> {
        let mut r = Jacobian::default();
        ECMULT_CONTEXT.ecmult(
            &mut r,
            &Jacobian::from_ge(&self.0),
            na,
            &Scalar::from_int(0),
        );
        Self::from_jacobian(&r.add_ge_var(&rhs.0, None))
    }

    /// `self + tweak * G`
    pub fn tweak_add(&self, tweak: &Scalar) -> Result<Self> {
        self.mul_add(&Scalar::from_int(1), tweak)
            .map_err(|_| Error::InvalidTweak)
    }
}

impl Secret {
    pub fn parse(bytes: &[u8; 32]) -> Result<Self> {
        let mut scalar = Scalar::default();
        if bool::from(scalar.set_b32(bytes)) || scalar.is_zero() {
            return Err(Error::InvalidKey);
        }
        Ok(Secret(scalar))
    }

    pub fn from_scalar(scalar: Scalar) -> Result<Self> {
        if scalar.is_zero() {
            return Err(Error::InvalidKey);
        }
        Ok(Secret(scalar))
    }

    pub fn scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn serialize(&self) -> [u8; 32] {
        self.0.b32()
    }

    pub fn neg(&self) -> Self {
        Secret(self.0.neg())
    }

    /// `self + tweak`, failing when the sum is zero.
    pub fn tweak_add(&self, tweak: &Scalar) -> Result<Self> {
        Self::from_scalar(self.0 + *tweak).map_err(|_| Error::InvalidTweak)
    }

    /// Negates the secret when its point has odd Y, so that it matches the
    /// X-only public key.
    pub fn to_even_y(&self) -> (Self, Point) {
        let point = Point::from_secret(self);
        if point.is_odd_y() {
            (self.neg(), point.neg())
        } else {
            (*self, point)
        }
    }
}

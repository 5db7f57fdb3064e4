#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod compact_integer;
mod impls;
mod reader;
mod stream;

pub use self::compact_integer::CompactInteger;
pub use self::reader::{deserialize, Deserializable, Error, Reader};
pub use self::stream::{serialize, Serializable, Stream};

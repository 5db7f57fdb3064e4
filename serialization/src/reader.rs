#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::fmt;

use crate::compact_integer::CompactInteger;

pub fn deserialize<T>(buffer: &[u8]) -> Result<T, Error>
where
    T: Deserializable,
{
    let mut reader = Reader::new(buffer);
    let result = reader.read()?;

    if reader.is_finished() {
        Ok(result)
    } else {
        Err(Error::UnreadData)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The buffer ended before the value was complete.
    UnexpectedEnd,
    MalformedData,
    /// Bytes remained after the value was read.
    UnreadData,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::UnexpectedEnd => "Unexpected end of data",
            Error::MalformedData => "Malformed data",
            Error::UnreadData => "Unread data",
        };

        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub trait Deserializable: Sized {
    fn deserialize(reader: &mut Reader) -> Result<Self, Error>;
}

/// Bitcoin structures reader over a borrowed buffer.
#[derive(Debug)]
pub struct Reader<'a> {
    buffer: &'a [u8],
    read: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Reader { buffer, read: 0 }
    }

    pub fn read<T>(&mut self) -> Result<T, Error>
    where
        T: Deserializable,
    {
        T::deserialize(self)
    }

    /// Borrows the next `len` bytes.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < len {
            return Err(Error::UnexpectedEnd);
        }
        let slice = &self.buffer[self.read..self.read + len];
        self.read += len;
        Ok(slice)
    }

    /// Reads a compact-size prefixed list.
    pub fn read_list<T>(&mut self) -> Result<Vec<T>, Error>
    where
        T: Deserializable,
    {
        let len: usize = self.read::<CompactInteger>()?.into();
        // every element is at least one byte
        if len > self.remaining() {
            return Err(Error::MalformedData);
        }
        let mut result = Vec::with_capacity(len);
        for _ in 0..len {
            result.push(self.read()?);
        }
        Ok(result)
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.read
    }

    pub fn is_finished(&self) -> bool {
        self.read == self.buffer.len()
    }
}

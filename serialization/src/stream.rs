//! Stream used for serialization of Bitcoin structures

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::compact_integer::CompactInteger;

pub fn serialize<T>(t: &T) -> Vec<u8>
where
    T: Serializable,
{
    let mut stream = Stream::default();
    stream.append(t);
    stream.out()
}

pub trait Serializable {
    /// Serialize the struct and appends it to the end of stream.
    fn serialize(&self, s: &mut Stream);

    /// Hint about the size of serialized struct.
    fn serialized_size(&self) -> usize;
}

/// Stream used for serialization of Bitcoin structures
#[derive(Default)]
pub struct Stream {
    buffer: Vec<u8>,
}

impl Stream {
    /// New stream
    pub fn new() -> Self {
        Stream { buffer: Vec::new() }
    }

    /// Serializes the struct and appends it to the end of stream.
    pub fn append<T>(&mut self, t: &T) -> &mut Self
    where
        T: Serializable + ?Sized,
    {
        t.serialize(self);
        self
    }

    /// Appends raw bytes to the end of the stream.
    pub fn append_slice(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    /// Appends a list of serializable structs to the end of the stream,
    /// prefixed with its compact size.
    pub fn append_list<T>(&mut self, t: &[T]) -> &mut Self
    where
        T: Serializable,
    {
        CompactInteger::from(t.len()).serialize(self);
        for i in t {
            i.serialize(self);
        }
        self
    }

    /// Length of the bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Full stream.
    pub fn out(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_append() {
        let mut stream = Stream::default();
        stream
            .append(&1u8)
            .append(&2u16)
            .append(&3u32)
            .append(&4u64)
            .append_slice(&[0xaa, 0xbb]);

        let expected = vec![
            1, 2, 0, 3, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0xaa, 0xbb,
        ];
        assert_eq!(stream.len(), expected.len());
        assert_eq!(stream.out(), expected);
    }

    #[test]
    fn test_stream_append_list_is_size_prefixed() {
        let mut stream = Stream::new();
        stream.append_list(&[0x51u8]);
        assert_eq!(stream.out(), vec![0x01, 0x51]);

        let long = vec![0u8; 0xfd];
        let mut stream = Stream::new();
        stream.append_list(&long);
        let out = stream.out();
        assert_eq!(&out[..3], &[0xfd, 0xfd, 0x00]);
        assert_eq!(out.len(), 3 + 0xfd);
    }
}

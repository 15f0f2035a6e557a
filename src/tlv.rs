//! Decoded Tag-Length-Value records

use crate::ber::{Header, Tag};

/// One TLV as seen by the decode container
///
/// The value of a TLV the grammar reads as a whole is *materialized*: its
/// encoding is copied out of the input as it arrives, across as many calls as
/// needed. A constructed TLV the grammar descends into is only a boundary: its
/// value is made of the child TLVs and is never materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    length: usize,
    header_len: usize,
    offset: usize,
    depth: usize,
    encoded: Option<Vec<u8>>,
}

impl Tlv {
    pub(crate) fn materialized(header: Header, header_bytes: &[u8], offset: usize, depth: usize) -> Tlv {
        let encoded = header_bytes.to_vec();
        Tlv {
            tag: header.tag,
            length: header.length,
            header_len: header.header_len,
            offset,
            depth,
            encoded: Some(encoded),
        }
    }

    pub(crate) fn boundary(header: Header, offset: usize, depth: usize) -> Tlv {
        Tlv {
            tag: header.tag,
            length: header.length,
            header_len: header.header_len,
            offset,
            depth,
            encoded: None,
        }
    }

    /// Copy as many value bytes as are still missing, return how many were used
    ///
    /// The buffer grows by the bytes received, not by the declared length.
    pub(crate) fn fill(&mut self, input: &[u8]) -> usize {
        let missing = self.remaining();
        match self.encoded {
            Some(ref mut encoded) => {
                let n = missing.min(input.len());
                encoded.reserve(n);
                encoded.extend_from_slice(&input[..n]);
                n
            }
            None => 0,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Declared length of the value
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Header plus value
    pub fn total_len(&self) -> usize {
        self.header_len + self.length
    }

    /// Absolute input offset of the first identifier octet
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of constructed TLVs enclosing this one
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Value bytes read so far
    ///
    /// Always 0 for a constructed TLV the grammar descended into: its value is
    /// never materialized, and the bytes of its children are counted by the
    /// enclosing [`NestingFrame`](crate::container::NestingFrame) instead.
    pub fn consumed(&self) -> usize {
        match self.encoded {
            Some(ref encoded) => encoded.len() - self.header_len,
            None => 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.length - self.consumed()
    }

    pub fn is_complete(&self) -> bool {
        self.encoded.is_some() && self.consumed() == self.length
    }

    /// Value bytes, if materialized
    pub fn value(&self) -> Option<&[u8]> {
        self.encoded.as_ref().map(|e| &e[self.header_len..])
    }

    /// Identifier, length and value bytes, if materialized
    pub fn encoded(&self) -> Option<&[u8]> {
        self.encoded.as_deref()
    }
}

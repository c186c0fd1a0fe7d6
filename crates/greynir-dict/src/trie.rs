//! Radix trie node encoding shared by the builder and the reader (§4.1).
//!
//! All pointers in this file are absolute byte offsets from the start of
//! the dictionary file, including the "forms" section pointer in the file
//! header, which addresses the root node directly (the root is written
//! last, since every node is serialized only after all of its children).
//!
//! Every node's header is one DWORD:
//! - fragment length == 1: bit 31 set, bit 30 = childless, bits 29..23 =
//!   alphabet index of the single character, bits 22..0 = value.
//! - fragment length == 0 (root) or > 1: bit 31 clear, bit 30 =
//!   childless, bits 22..0 = value. A child-count DWORD and that many
//!   child-offset DWORDs follow when not childless, then the
//!   zero-terminated fragment bytes (padded to a DWORD boundary); single-
//!   character nodes omit the fragment bytes, since the alphabet index
//!   already names the one character.

use crate::error::DictError;
use crate::layout::*;

pub struct DecodedNode {
    pub value: Option<u32>,
    pub children: Vec<u32>,
    pub fragment: Vec<u8>,
}

pub fn encode_node(out: &mut Vec<u8>, fragment: &[u8], value: Option<u32>, children: &[u32], alphabet_index: impl Fn(u8) -> u8) -> u32 {
    let offset = out.len() as u32;
    let childless = children.is_empty();
    let value_bits = value.unwrap_or(NODE_NO_VALUE) & NODE_VALUE_MASK;

    if fragment.len() == 1 {
        let idx = alphabet_index(fragment[0]) as u32;
        let mut header = NODE_SINGLE_CHAR_BIT | (idx << NODE_ALPHABET_SHIFT) | value_bits;
        if childless {
            header |= NODE_CHILDLESS_BIT;
        }
        out.extend_from_slice(&header.to_le_bytes());
    } else {
        let mut header = value_bits;
        if childless {
            header |= NODE_CHILDLESS_BIT;
        }
        out.extend_from_slice(&header.to_le_bytes());
    }

    if !childless {
        out.extend_from_slice(&(children.len() as u32).to_le_bytes());
        for &c in children {
            out.extend_from_slice(&c.to_le_bytes());
        }
    }

    if fragment.len() != 1 {
        out.extend_from_slice(fragment);
        out.push(0);
        let padded = pad4(out.len() - offset as usize) + offset as usize;
        while out.len() < padded {
            out.push(0);
        }
    }

    offset
}

pub fn decode_node(buf: &[u8], offset: u32, alphabet: &[u8]) -> Result<DecodedNode, DictError> {
    let trunc = |reason: &str| DictError::Truncated { path: Default::default(), reason: reason.to_string() };
    let off = offset as usize;
    let header_bytes: [u8; 4] = buf.get(off..off + 4).ok_or_else(|| trunc("trie node header"))?.try_into().unwrap();
    let header = u32::from_le_bytes(header_bytes);
    let mut pos = off + 4;

    let single_char = header & NODE_SINGLE_CHAR_BIT != 0;
    let childless = header & NODE_CHILDLESS_BIT != 0;
    let value_bits = header & NODE_VALUE_MASK;
    let value = if value_bits == NODE_NO_VALUE { None } else { Some(value_bits) };

    let mut children = Vec::new();
    if !childless {
        let count_bytes: [u8; 4] = buf.get(pos..pos + 4).ok_or_else(|| trunc("trie child count"))?.try_into().unwrap();
        let count = u32::from_le_bytes(count_bytes) as usize;
        pos += 4;
        for _ in 0..count {
            let off_bytes: [u8; 4] = buf.get(pos..pos + 4).ok_or_else(|| trunc("trie child offset"))?.try_into().unwrap();
            children.push(u32::from_le_bytes(off_bytes));
            pos += 4;
        }
    }

    let fragment = if single_char {
        let idx = (header >> NODE_ALPHABET_SHIFT) & NODE_ALPHABET_MASK;
        if idx == 0 {
            Vec::new()
        } else {
            let byte = *alphabet.get(idx as usize - 1).ok_or_else(|| trunc("alphabet index out of range"))?;
            vec![byte]
        }
    } else {
        let start = pos;
        let mut end = start;
        while *buf.get(end).ok_or_else(|| trunc("unterminated fragment"))? != 0 {
            end += 1;
        }
        buf[start..end].to_vec()
    };

    Ok(DecodedNode { value, children, fragment })
}

/// Binary-search `node`'s children for one whose fragment starts with `first_byte`.
pub fn find_child(buf: &[u8], node: &DecodedNode, alphabet: &[u8], first_byte: u8) -> Result<Option<DecodedNode>, DictError> {
    let mut lo = 0usize;
    let mut hi = node.children.len();
    while lo < hi {
        let mid = (lo + hi) / 2;
        let child = decode_node(buf, node.children[mid], alphabet)?;
        let key = child.fragment.first().copied().unwrap_or(0);
        match key.cmp(&first_byte) {
            std::cmp::Ordering::Less => lo = mid + 1,
            std::cmp::Ordering::Greater => hi = mid,
            std::cmp::Ordering::Equal => return Ok(Some(child)),
        }
    }
    Ok(None)
}

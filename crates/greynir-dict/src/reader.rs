//! Memory-mapped reader for the compressed dictionary (§4.1).

use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::DictError;
use crate::layout::*;
use crate::trie;
use greynir_core::Reading;

/// One raw dictionary entry, exactly the tuple described by §4.1:
/// `(stem, word_id, word_class, subclass, word_form, inflection_tag)`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DictReading {
    pub stem: String,
    pub word_id: Option<i32>,
    pub word_class: String,
    pub subclass: String,
    pub word_form: String,
    pub inflection: String,
}

impl From<DictReading> for Reading {
    fn from(r: DictReading) -> Reading {
        Reading::new(r.stem, r.word_class, r.subclass, &r.inflection)
    }
}

pub struct Dict {
    mmap: Mmap,
    path: PathBuf,
    mappings_offset: u32,
    forms_root: u32,
    stems_offset: u32,
    meanings_offset: u32,
    alphabet: Vec<u8>,
    /// Maps a Latin-1 byte to its 1-based alphabet index, 0 if absent.
    alphabet_index: [u8; 256],
}

impl Dict {
    pub fn open(path: impl AsRef<Path>) -> Result<Dict, DictError> {
        let path = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path).map_err(|source| DictError::Io { path: path.clone(), source })?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| DictError::Io { path: path.clone(), source })?;
        Self::from_mmap(mmap, path)
    }

    fn from_mmap(mmap: Mmap, path: PathBuf) -> Result<Dict, DictError> {
        let buf = &mmap[..];
        if buf.len() < HEADER_LEN {
            return Err(DictError::Truncated { path, reason: "file shorter than header".into() });
        }
        let mut magic = [0u8; 16];
        magic.copy_from_slice(&buf[0..16]);
        if magic != VERSION {
            return Err(DictError::BadMagic { path, expected: VERSION, found: magic });
        }
        let mut offs = [0u32; 5];
        for (i, o) in offs.iter_mut().enumerate() {
            let at = 16 + i * 4;
            *o = u32::from_le_bytes(buf[at..at + 4].try_into().unwrap());
        }
        let [mappings_offset, forms_root, stems_offset, meanings_offset, alphabet_offset] = offs;

        let tag_start = alphabet_offset as usize;
        let tag = buf.get(tag_start..tag_start + 16).ok_or_else(|| DictError::Truncated { path: path.clone(), reason: "alphabet tag".into() })?;
        if tag != ALPHABET_TAG {
            return Err(DictError::Truncated { path: path.clone(), reason: "bad alphabet tag".into() });
        }
        let len_start = tag_start + 16;
        let len = u32::from_le_bytes(
            buf.get(len_start..len_start + 4).ok_or_else(|| DictError::Truncated { path: path.clone(), reason: "alphabet length".into() })?.try_into().unwrap(),
        ) as usize;
        let bytes_start = len_start + 4;
        let alphabet = buf
            .get(bytes_start..bytes_start + len)
            .ok_or_else(|| DictError::Truncated { path: path.clone(), reason: "alphabet bytes".into() })?
            .to_vec();

        let mut alphabet_index = [0u8; 256];
        for (i, &b) in alphabet.iter().enumerate() {
            alphabet_index[b as usize] = i as u8 + 1;
        }

        Ok(Dict {
            mmap,
            path,
            mappings_offset,
            forms_root,
            stems_offset,
            meanings_offset,
            alphabet,
            alphabet_index,
        })
    }

    fn buf(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Look up a word form, returning its morphological readings (empty if
    /// unknown or outside the dictionary's Latin-1 alphabet).
    pub fn lookup(&self, word_form: &str) -> Result<Vec<DictReading>, DictError> {
        let mut bytes = Vec::with_capacity(word_form.len());
        for c in word_form.chars() {
            let Ok(b) = u8::try_from(u32::from(c)) else { return Ok(Vec::new()) };
            if self.alphabet_index[b as usize] == 0 {
                return Ok(Vec::new());
            }
            bytes.push(b);
        }

        let buf = self.buf();
        let mut node = trie::decode_node(buf, self.forms_root, &self.alphabet)?;
        let mut remaining: &[u8] = &bytes;

        loop {
            if remaining.is_empty() {
                return match node.value {
                    Some(v) => self.read_mappings(v, word_form),
                    None => Ok(Vec::new()),
                };
            }
            let Some(child) = trie::find_child(buf, &node, &self.alphabet, remaining[0])? else {
                return Ok(Vec::new());
            };
            if remaining.len() < child.fragment.len() || &remaining[..child.fragment.len()] != child.fragment.as_slice() {
                return Ok(Vec::new());
            }
            remaining = &remaining[child.fragment.len()..];
            node = child;
        }
    }

    /// Convenience wrapper for callers (the matcher, the reducer) that only
    /// need the lemma/class/subclass/variant tuple a [`Token`] carries.
    pub fn lookup_readings(&self, word_form: &str) -> Result<Vec<Reading>, DictError> {
        Ok(self.lookup(word_form)?.into_iter().map(Reading::from).collect())
    }

    fn read_mappings(&self, start: u32, word_form: &str) -> Result<Vec<DictReading>, DictError> {
        let buf = self.buf();
        let mut readings = Vec::new();
        let mut pos = start as usize;
        loop {
            let word = u32::from_le_bytes(
                buf.get(pos..pos + 4).ok_or_else(|| DictError::Truncated { path: self.path.clone(), reason: "mapping entry".into() })?.try_into().unwrap(),
            );
            pos += 4;
            let last = word & MAPPING_LAST_BIT != 0;
            let stem_idx = (word >> MAPPING_STEM_SHIFT) & MAPPING_STEM_MASK;
            let meaning_idx = word & MAPPING_MEANING_MASK;
            let (stem, word_id) = self.read_stem(stem_idx)?;
            let (word_class, subclass, inflection) = self.read_meaning(meaning_idx)?;
            readings.push(DictReading {
                stem,
                word_id,
                word_class,
                subclass,
                word_form: word_form.to_string(),
                inflection,
            });
            if last {
                break;
            }
        }
        Ok(readings)
    }

    fn read_stem(&self, index: u32) -> Result<(String, Option<i32>), DictError> {
        let buf = self.buf();
        let trunc = |reason: &str| DictError::Truncated { path: self.path.clone(), reason: reason.to_string() };
        let table_pos = self.stems_offset as usize + 4 + index as usize * 4;
        let record_offset = u32::from_le_bytes(buf.get(table_pos..table_pos + 4).ok_or_else(|| trunc("stem offset table"))?.try_into().unwrap()) as usize;
        let word_id = i32::from_le_bytes(buf.get(record_offset..record_offset + 4).ok_or_else(|| trunc("stem word id"))?.try_into().unwrap());
        let str_start = record_offset + 4;
        let mut end = str_start;
        while *buf.get(end).ok_or_else(|| trunc("unterminated stem"))? != 0 {
            end += 1;
        }
        let stem = String::from_utf8_lossy(&buf[str_start..end]).into_owned();
        Ok((stem, Some(word_id)))
    }

    fn read_meaning(&self, index: u32) -> Result<(String, String, String), DictError> {
        let buf = self.buf();
        let trunc = |reason: &str| DictError::Truncated { path: self.path.clone(), reason: reason.to_string() };
        let table_pos = self.meanings_offset as usize + 4 + index as usize * 4;
        let record_offset = u32::from_le_bytes(buf.get(table_pos..table_pos + 4).ok_or_else(|| trunc("meaning offset table"))?.try_into().unwrap()) as usize;
        let record = buf.get(record_offset..record_offset + MEANING_RECORD_LEN).ok_or_else(|| trunc("meaning record"))?;
        let text = String::from_utf8_lossy(record);
        let mut parts = text.trim_end().splitn(3, ' ');
        let class = parts.next().unwrap_or("").to_string();
        let subclass = parts.next().unwrap_or("").to_string();
        let inflection = parts.next().unwrap_or("").to_string();
        Ok((class, subclass, inflection))
    }
}

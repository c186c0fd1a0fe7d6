//! The precompiled binary grammar container (§6): a fixed little-endian
//! header (magic, format version, CRC32 of the payload, section offsets)
//! followed by the nonterminal/terminal name blobs, the nonterminal score
//! table, and the production table.
//!
//! Unlike [`crate::Dict`]'s compressed lexicon, a grammar is small enough
//! to deserialize eagerly; this is a plain read/decode, not an mmap.

use std::path::Path;

use crate::error::GrammarError;
use crate::symbol_ids::{GrammarSymbol, NonterminalId, ProductionId, TerminalId};

use super::types::{Grammar, Nonterminal, Production, Terminal};

pub const MAGIC: [u8; 16] = *b"GREYNIRGRAMMAR01";
pub const FORMAT_VERSION: u32 = 1;

/// Fixed-size file header. Every field is little-endian on disk; encoding
/// and decoding is done field-by-field rather than by transmute so the
/// layout is independent of the host's struct-layout rules.
#[repr(C)]
struct Header {
    magic: [u8; 16],
    version: u32,
    checksum: u32,
    nonterminal_count: u32,
    terminal_count: u32,
    production_count: u32,
    root: u32,
    nonterminal_names_offset: u32,
    terminal_names_offset: u32,
    scores_offset: u32,
    productions_offset: u32,
}

const HEADER_LEN: usize = 16 + 4 * 10;
const _: () = assert!(std::mem::size_of::<Header>() >= HEADER_LEN);

impl Header {
    fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        let mut w = 0;
        buf[w..w + 16].copy_from_slice(&self.magic);
        w += 16;
        for field in [
            self.version,
            self.checksum,
            self.nonterminal_count,
            self.terminal_count,
            self.production_count,
            self.root,
            self.nonterminal_names_offset,
            self.terminal_names_offset,
            self.scores_offset,
            self.productions_offset,
        ] {
            buf[w..w + 4].copy_from_slice(&field.to_le_bytes());
            w += 4;
        }
        buf
    }

    fn from_bytes(buf: &[u8], path: &Path) -> Result<Header, GrammarError> {
        if buf.len() < HEADER_LEN {
            return Err(GrammarError::Truncated { path: path.to_path_buf(), reason: "file shorter than header".into() });
        }
        let mut magic = [0u8; 16];
        magic.copy_from_slice(&buf[0..16]);
        if magic != MAGIC {
            return Err(GrammarError::BadMagic { path: path.to_path_buf(), expected: MAGIC, found: magic });
        }
        let mut fields = [0u32; 10];
        for (i, field) in fields.iter_mut().enumerate() {
            let off = 16 + i * 4;
            *field = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        }
        Ok(Header {
            magic,
            version: fields[0],
            checksum: fields[1],
            nonterminal_count: fields[2],
            terminal_count: fields[3],
            production_count: fields[4],
            root: fields[5],
            nonterminal_names_offset: fields[6],
            terminal_names_offset: fields[7],
            scores_offset: fields[8],
            productions_offset: fields[9],
        })
    }
}

fn write_blob(out: &mut Vec<u8>, names: impl Iterator<Item = impl AsRef<str>>) {
    let names: Vec<String> = names.map(|s| s.as_ref().to_string()).collect();
    out.extend_from_slice(&(names.len() as u32).to_le_bytes());
    for name in &names {
        let bytes = name.as_bytes();
        out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(bytes);
    }
}

fn read_blob(buf: &[u8], offset: usize, path: &Path) -> Result<Vec<String>, GrammarError> {
    let trunc = || GrammarError::Truncated { path: path.to_path_buf(), reason: "name blob truncated".into() };
    let mut pos = offset;
    let count = u32::from_le_bytes(buf.get(pos..pos + 4).ok_or_else(trunc)?.try_into().unwrap()) as usize;
    pos += 4;
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        let len = u32::from_le_bytes(buf.get(pos..pos + 4).ok_or_else(trunc)?.try_into().unwrap()) as usize;
        pos += 4;
        let bytes = buf.get(pos..pos + len).ok_or_else(trunc)?;
        names.push(String::from_utf8(bytes.to_vec()).map_err(|_| GrammarError::Truncated {
            path: path.to_path_buf(),
            reason: "name is not valid utf-8".into(),
        })?);
        pos += len;
    }
    Ok(names)
}

pub fn to_binary(grammar: &Grammar) -> Vec<u8> {
    let mut nonterminal_names = Vec::new();
    write_blob(&mut nonterminal_names, grammar.nonterminals().iter().map(|n| n.name.clone()));

    let mut terminal_names = Vec::new();
    write_blob(&mut terminal_names, grammar.terminals().iter().skip(1).map(|t| t.name.clone()));

    let mut scores = Vec::new();
    for nt in grammar.nonterminals() {
        scores.extend_from_slice(&grammar.nonterminal_score(nt.index).to_le_bytes());
    }

    let mut productions = Vec::new();
    productions.extend_from_slice(&(grammar.productions.len() as u32).to_le_bytes());
    for p in &grammar.productions {
        productions.extend_from_slice(&p.nonterminal.0.to_le_bytes());
        productions.extend_from_slice(&p.priority.to_le_bytes());
        productions.extend_from_slice(&(p.symbols.len() as u32).to_le_bytes());
        for sym in &p.symbols {
            productions.extend_from_slice(&sym.to_encoded().to_le_bytes());
        }
    }

    let nonterminal_names_offset = HEADER_LEN as u32;
    let terminal_names_offset = nonterminal_names_offset + nonterminal_names.len() as u32;
    let scores_offset = terminal_names_offset + terminal_names.len() as u32;
    let productions_offset = scores_offset + scores.len() as u32;

    let mut payload = Vec::new();
    payload.extend_from_slice(&nonterminal_names);
    payload.extend_from_slice(&terminal_names);
    payload.extend_from_slice(&scores);
    payload.extend_from_slice(&productions);

    let checksum = crc32fast::hash(&payload);

    let header = Header {
        magic: MAGIC,
        version: FORMAT_VERSION,
        checksum,
        nonterminal_count: grammar.nonterminals().len() as u32,
        terminal_count: grammar.terminal_count() as u32,
        production_count: grammar.productions.len() as u32,
        root: grammar.root.0,
        nonterminal_names_offset,
        terminal_names_offset,
        scores_offset,
        productions_offset,
    };

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload);
    out
}

pub fn from_binary(buf: &[u8], path: &Path) -> Result<Grammar, GrammarError> {
    let header = Header::from_bytes(buf, path)?;
    let payload = &buf[HEADER_LEN..];
    let actual_checksum = crc32fast::hash(payload);
    if actual_checksum != header.checksum {
        return Err(GrammarError::Checksum { path: path.to_path_buf() });
    }

    let nt_names = read_blob(buf, header.nonterminal_names_offset as usize, path)?;
    let t_names = read_blob(buf, header.terminal_names_offset as usize, path)?;

    let nonterminals: Vec<Nonterminal> = nt_names
        .into_iter()
        .enumerate()
        .map(|(i, name)| Nonterminal::new(name, NonterminalId(i as u32)))
        .collect();

    let mut terminals = vec![Terminal::new("", TerminalId(0))];
    terminals.extend(t_names.into_iter().enumerate().map(|(i, name)| Terminal::new(name, TerminalId(i as u32 + 1))));

    let trunc = || GrammarError::Truncated { path: path.to_path_buf(), reason: "score table truncated".into() };
    let mut pos = header.scores_offset as usize;
    let mut nonterminal_scores = Vec::with_capacity(nonterminals.len());
    for _ in 0..nonterminals.len() {
        let v = i32::from_le_bytes(buf.get(pos..pos + 4).ok_or_else(trunc)?.try_into().unwrap());
        nonterminal_scores.push(v);
        pos += 4;
    }

    let trunc = || GrammarError::Truncated { path: path.to_path_buf(), reason: "production table truncated".into() };
    let mut pos = header.productions_offset as usize;
    let count = u32::from_le_bytes(buf.get(pos..pos + 4).ok_or_else(trunc)?.try_into().unwrap()) as usize;
    pos += 4;
    let mut productions = Vec::with_capacity(count);
    let mut productions_by_nonterminal: indexmap::IndexMap<NonterminalId, Vec<ProductionId>> = indexmap::IndexMap::new();
    for i in 0..count {
        let nt = NonterminalId(u32::from_le_bytes(buf.get(pos..pos + 4).ok_or_else(trunc)?.try_into().unwrap()));
        pos += 4;
        let priority = i32::from_le_bytes(buf.get(pos..pos + 4).ok_or_else(trunc)?.try_into().unwrap());
        pos += 4;
        let num_symbols = u32::from_le_bytes(buf.get(pos..pos + 4).ok_or_else(trunc)?.try_into().unwrap()) as usize;
        pos += 4;
        let mut symbols = Vec::with_capacity(num_symbols);
        for _ in 0..num_symbols {
            let raw = i32::from_le_bytes(buf.get(pos..pos + 4).ok_or_else(trunc)?.try_into().unwrap());
            symbols.push(GrammarSymbol::from_encoded(raw));
            pos += 4;
        }
        let id = ProductionId(i as u32);
        productions_by_nonterminal.entry(nt).or_default().push(id);
        productions.push(Production { id, nonterminal: nt, priority, symbols });
    }

    Ok(Grammar {
        nonterminals,
        terminals,
        productions,
        productions_by_nonterminal,
        nonterminal_scores,
        root: NonterminalId(header.root),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_a_small_grammar() {
        let src = "Root -> no_nf \"og\" Root\nRoot -> 0\n";
        let g = super::super::text::parse(src, "t.grammar").unwrap();
        let bytes = to_binary(&g);
        let g2 = from_binary(&bytes, Path::new("t.bin")).unwrap();
        assert_eq!(g2.nonterminals().len(), g.nonterminals().len());
        assert_eq!(g2.terminal_count(), g.terminal_count());
        assert_eq!(g2.root, g.root);
        assert_eq!(g2.productions.len(), g.productions.len());
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let src = "Root -> no_nf\n";
        let g = super::super::text::parse(src, "t.grammar").unwrap();
        let mut bytes = to_binary(&g);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let err = from_binary(&bytes, Path::new("t.bin")).unwrap_err();
        assert!(matches!(err, GrammarError::Checksum { .. }));
    }
}

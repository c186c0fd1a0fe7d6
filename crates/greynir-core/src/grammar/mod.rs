mod binary;
mod invariants;
mod text;
mod types;

pub use types::{Grammar, Nonterminal, Production, Terminal};

impl Grammar {
    /// Compile a grammar from its human-authored `.grammar` text form,
    /// applying the load-time invariants (§4.2) before returning.
    pub fn from_text(source: &str, source_name: &str) -> Result<Grammar, crate::error::GrammarError> {
        text::parse(source, source_name)
    }

    /// Decode a precompiled binary grammar file's contents.
    pub fn from_binary_bytes(bytes: &[u8], path: &std::path::Path) -> Result<Grammar, crate::error::GrammarError> {
        binary::from_binary(bytes, path)
    }

    /// Encode this grammar into the binary container format.
    pub fn to_binary_bytes(&self) -> Vec<u8> {
        binary::to_binary(self)
    }

    /// Load a precompiled binary grammar file from disk.
    pub fn load_binary(path: &std::path::Path) -> Result<Grammar, crate::error::GrammarError> {
        let bytes = std::fs::read(path).map_err(|source| crate::error::GrammarError::Io { path: path.to_path_buf(), source })?;
        Self::from_binary_bytes(&bytes, path)
    }

    /// Load and compile a text-format grammar file from disk.
    pub fn load_text(path: &std::path::Path) -> Result<Grammar, crate::error::GrammarError> {
        let text = std::fs::read_to_string(path).map_err(|source| crate::error::GrammarError::Io { path: path.to_path_buf(), source })?;
        Self::from_text(&text, &path.display().to_string())
    }
}

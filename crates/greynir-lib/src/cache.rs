//! §5's process-wide grammar cache: a `Mutex`-guarded map from grammar
//! file path to the loaded [`Grammar`], reloaded only when the file's
//! mtime changes. This is the one piece of cross-parse shared state the
//! concurrency model calls out; everything else a parse touches (Earley
//! columns, the SPPF, scoring tables) is owned by a single parse job, so
//! there is nothing else here to serialize.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::SystemTime;

use greynir_core::{Grammar, GrammarError};

struct Entry {
    grammar: Arc<Grammar>,
    modified: SystemTime,
}

/// A lazily-initialized, mutex-guarded cache of loaded binary grammars,
/// keyed by file path. Safe to share across threads; reload is exclusive
/// with every other lookup (the reference implementation's "process-wide
/// named lock" around grammar (re)generation), but once loaded, readers
/// share the same `Arc<Grammar>` without further locking.
#[derive(Default)]
pub struct GrammarCache {
    entries: Mutex<HashMap<PathBuf, Entry>>,
}

impl GrammarCache {
    pub fn new() -> Self {
        GrammarCache { entries: Mutex::new(HashMap::new()) }
    }

    /// The process-wide instance, initialized on first use.
    pub fn shared() -> &'static GrammarCache {
        static CACHE: OnceLock<GrammarCache> = OnceLock::new();
        CACHE.get_or_init(GrammarCache::new)
    }

    /// Return the grammar loaded from `path`, reloading it if the file's
    /// mtime has advanced since it was last cached (or loading it for the
    /// first time).
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Grammar>, GrammarError> {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).map_err(|source| GrammarError::Io { path: path.to_path_buf(), source })?;

        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(entry) = entries.get(path) {
            if entry.modified == modified {
                return Ok(Arc::clone(&entry.grammar));
            }
        }

        let grammar = Arc::new(Grammar::load_binary(path)?);
        entries.insert(path.to_path_buf(), Entry { grammar: Arc::clone(&grammar), modified });
        Ok(grammar)
    }

    /// Drop every cached grammar, forcing the next lookup to reload from
    /// disk regardless of mtime.
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greynir_core::Grammar;

    fn write_grammar(path: &Path, source: &str) {
        let grammar = Grammar::from_text(source, "test").unwrap();
        std::fs::write(path, grammar.to_binary_bytes()).unwrap();
    }

    #[test]
    fn reloads_only_when_mtime_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.bin");
        write_grammar(&path, "Root -> no_nf\n");

        let cache = GrammarCache::new();
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second), "unchanged mtime should reuse the cached grammar");

        // Force the mtime forward: some filesystems have coarse mtime
        // resolution, so bump it explicitly rather than just re-writing.
        let future = SystemTime::now() + std::time::Duration::from_secs(2);
        write_grammar(&path, "Root -> no_þf\n");
        let file = std::fs::File::open(&path).unwrap();
        file.set_modified(future).unwrap();

        let third = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &third), "changed mtime should reload");
        assert_eq!(third.terminal(greynir_core::TerminalId(1)).name, "no_þf");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let cache = GrammarCache::new();
        let err = cache.get_or_load(Path::new("/nonexistent/grammar.bin")).unwrap_err();
        assert!(matches!(err, GrammarError::Io { .. }));
    }
}

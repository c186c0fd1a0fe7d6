use std::path::PathBuf;

/// Errors raised while compiling or loading a [`crate::Grammar`].
///
/// Loading a grammar is the one place in this crate where a byte range into
/// a source file is meaningful, so [`GrammarError::Syntax`] carries enough to
/// render an `annotate-snippets` diagnostic; the other variants are plain
/// messages.
#[derive(thiserror::Error, Debug)]
pub enum GrammarError {
    #[error("could not read grammar file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("grammar file {path:?} has bad magic (expected {expected:?}, found {found:?})")]
    BadMagic {
        path: PathBuf,
        expected: [u8; 16],
        found: [u8; 16],
    },

    #[error("grammar file {path:?} is truncated or malformed: {reason}")]
    Truncated { path: PathBuf, reason: String },

    #[error("grammar file {path:?} failed its checksum")]
    Checksum { path: PathBuf },

    #[error("syntax error at byte {span:?}: {message}")]
    Syntax {
        message: String,
        span: std::ops::Range<usize>,
        source_name: String,
        source_text: String,
    },

    #[error("nonterminal {name:?} has no productions")]
    EmptyNonterminal { name: String },

    #[error("nonterminal {name:?} is unreachable from the root")]
    Unreachable { name: String },

    #[error("nonterminal {name:?} can never derive a terminal string")]
    Unproductive { name: String },

    #[error("nonterminal {name:?} rewrites to itself in a single step with no alternative")]
    TrivialCycle { name: String },
}

impl GrammarError {
    /// Render a human-readable diagnostic for variants that carry source
    /// context (currently only [`GrammarError::Syntax`]); falls back to
    /// `Display` for everything else.
    pub fn render(&self) -> String {
        use annotate_snippets::{Level, Renderer, Snippet};

        let GrammarError::Syntax {
            message,
            span,
            source_name,
            source_text,
        } = self
        else {
            return self.to_string();
        };

        let message = Level::Error.title(message).snippet(
            Snippet::source(source_text)
                .origin(source_name)
                .fold(true)
                .annotation(Level::Error.span(span.clone())),
        );
        Renderer::styled().render(message).to_string()
    }
}

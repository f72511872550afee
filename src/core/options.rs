//! Per-call options.
//!
//! Cross-cutting switches travel with each call instead of living in global
//! state, so two callers (or two tests) never see each other's settings.

/// Options passed to every namespace operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Answer "yes" to every confirmation, e.g. overwriting an existing
    /// secret.
    pub always_yes: bool,
    /// Include hidden entries (any segment starting with `.`) in listings.
    pub show_hidden: bool,
}

impl Options {
    /// Default options: confirmations refused, hidden entries not listed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `always_yes`.
    pub fn with_always_yes(mut self, yes: bool) -> Self {
        self.always_yes = yes;
        self
    }

    /// Set `show_hidden`.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.show_hidden = hidden;
        self
    }
}

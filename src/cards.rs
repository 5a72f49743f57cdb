//! Card tokens and the symbol pool.
//!
//! A deck is built from `SymbolDef` entries: each selected symbol is
//! expanded into two [`CardToken`]s sharing a `symbol_key`. Tokens are
//! generated fresh per session and owned by that session's deck.
//!
//! The engine never interprets `glyph` or `art_ref` - they are opaque
//! references for rendering hosts (emoji fallback and image asset path).

use serde::{Deserialize, Serialize};

/// A symbol available for deck construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolDef {
    /// Base name; pair identity derives from this.
    pub key: &'static str,

    /// Emoji fallback for hosts without image assets.
    pub glyph: &'static str,

    /// Image file name under the host's asset directory.
    pub art_file: &'static str,
}

/// Built-in symbol catalog.
///
/// Sized so every fixed difficulty preset satisfies
/// `pair_count <= SYMBOL_POOL.len()`.
pub const SYMBOL_POOL: &[SymbolDef] = &[
    SymbolDef { key: "fox", glyph: "\u{1F98A}", art_file: "fox.jpg" },
    SymbolDef { key: "tiger", glyph: "\u{1F42F}", art_file: "tiger.jpg" },
    SymbolDef { key: "wolf", glyph: "\u{1F43A}", art_file: "wolf.jpg" },
    SymbolDef { key: "panda", glyph: "\u{1F43C}", art_file: "panda.jpg" },
    SymbolDef { key: "penguin", glyph: "\u{1F427}", art_file: "penguin.jpg" },
    SymbolDef { key: "cat", glyph: "\u{1F431}", art_file: "cat.jpg" },
    SymbolDef { key: "dog", glyph: "\u{1F436}", art_file: "dog.jpg" },
    SymbolDef { key: "lion", glyph: "\u{1F981}", art_file: "lion.jpg" },
    SymbolDef { key: "giraffe", glyph: "\u{1F992}", art_file: "giraffe.jpg" },
    SymbolDef { key: "koala", glyph: "\u{1F428}", art_file: "koala.jpg" },
    SymbolDef { key: "bear", glyph: "\u{1F43B}", art_file: "bear.jpg" },
    SymbolDef { key: "monkey", glyph: "\u{1F435}", art_file: "monkey.jpg" },
    SymbolDef { key: "dolphin", glyph: "\u{1F42C}", art_file: "dolphin.jpg" },
    SymbolDef { key: "elephant", glyph: "\u{1F418}", art_file: "elephant.jpg" },
];

/// A single card in a session's deck.
///
/// Two tokens sharing `symbol_key` form a matching pair; `id` is unique
/// within the deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToken {
    /// Unique token id (`<key>-a` / `<key>-b`).
    pub id: String,

    /// Pair identity - tokens match iff these are equal.
    pub symbol_key: String,

    /// Emoji fallback for display.
    pub glyph: String,

    /// Opaque art asset reference.
    pub art_ref: String,
}

impl CardToken {
    /// Build the two tokens of a pair from a symbol definition.
    #[must_use]
    pub fn pair_from(symbol: &SymbolDef) -> [CardToken; 2] {
        let art_ref = format!("assets/img/{}", symbol.art_file);
        let token = |suffix: char| CardToken {
            id: format!("{}-{}", symbol.key, suffix),
            symbol_key: symbol.key.to_string(),
            glyph: symbol.glyph.to_string(),
            art_ref: art_ref.clone(),
        };
        [token('a'), token('b')]
    }

    /// Check whether two tokens form a matching pair.
    #[must_use]
    pub fn matches(&self, other: &CardToken) -> bool {
        self.symbol_key == other.symbol_key
    }
}

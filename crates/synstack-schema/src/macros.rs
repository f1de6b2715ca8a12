use serde::Serialize;

/// A `key=value` override applied to generated configuration files during
/// the architecture-specific configuration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroDef {
    pub key: String,
    pub value: String,
}

impl MacroDef {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parse a macro file: whitespace-separated `key=value` tokens.
///
/// `#`-prefixed tokens are comments. Tokens without a `=` (or with an empty
/// key) are malformed; they are skipped but counted, so callers can surface
/// the count instead of dropping them silently.
pub fn parse_macro_str(text: &str) -> (Vec<MacroDef>, usize) {
    let mut defs = Vec::new();
    let mut skipped = 0;

    for token in text.split_whitespace() {
        if token.starts_with('#') {
            continue;
        }
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => defs.push(MacroDef::new(key, value)),
            _ => skipped += 1,
        }
    }

    (defs, skipped)
}

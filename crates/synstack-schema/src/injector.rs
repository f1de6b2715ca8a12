use crate::preset::builtin_target;
use serde::Serialize;
use thiserror::Error;

/// Directive line naming the file an injector fragment is written into.
pub const TARGET_DIRECTIVE: &str = "__TARGET_LOC__=";

#[derive(Debug, Error)]
pub enum InjectorParseError {
    #[error("injector fragment '{0}' has no __TARGET_LOC__ directive and no built-in target")]
    MissingTarget(String),
}

/// A named template fragment plus the (macro-bearing) path of the file it
/// is injected into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectorFile {
    name: String,
    target: String,
    contents: String,
}

impl InjectorFile {
    /// Parse a fragment file: a `__TARGET_LOC__=` line names the target,
    /// every other non-comment, non-empty line is injectable content kept
    /// verbatim and in order.
    ///
    /// A fragment without an explicit target falls back to the built-in
    /// target for its file name (see [`crate::preset`]).
    pub fn parse(name: &str, text: &str) -> Result<Self, InjectorParseError> {
        let mut target = None;
        let mut contents = String::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Some(raw) = trimmed.strip_prefix(TARGET_DIRECTIVE) {
                target = Some(raw.to_owned());
            } else {
                contents.push_str(line);
                contents.push('\n');
            }
        }

        let target = target
            .or_else(|| builtin_target(name).map(str::to_owned))
            .ok_or_else(|| InjectorParseError::MissingTarget(name.to_owned()))?;

        Ok(Self {
            name: name.to_owned(),
            target,
            contents,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

use crate::module::InstallModule;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unresolved path macro '$({name})' in '{raw}'")]
    UnresolvedMacro { name: String, raw: String },
    #[error("unterminated path macro in '{0}'")]
    UnterminatedMacro(String),
}

/// Context a macro-bearing path is resolved against.
///
/// `modules` must contain only modules that appeared earlier in the manifest;
/// resolution is order-dependent by design. `self_version` carries the current
/// row's version for `$(VERSION)` self-substitution and is `None` when
/// resolving paths outside a module row (injector targets).
pub struct ResolveCtx<'a> {
    pub install_location: &'a Path,
    pub modules: &'a [InstallModule],
    pub self_version: Option<&'a str>,
}

/// Expand `$(NAME)` macros in a path.
///
/// `$(INSTALL)` expands to the install root, `$(VERSION)` to the current
/// row's own version, and `$(NAME)` to the resolved absolute path of an
/// already-added module of that name. A reference to an unknown module —
/// including a forward reference to a module that appears later in the
/// manifest — is an error, never a plausible-looking literal path.
pub fn resolve_path(raw: &str, ctx: &ResolveCtx<'_>) -> Result<String, ResolveError> {
    let mut resolved = raw.to_owned();
    if let Some(version) = ctx.self_version {
        resolved = resolved.replace("$(VERSION)", version);
    }

    while let Some(start) = resolved.find("$(") {
        let rest = &resolved[start + 2..];
        let Some(close) = rest.find(')') else {
            return Err(ResolveError::UnterminatedMacro(raw.to_owned()));
        };
        let name = &rest[..close];
        let replacement = if name == "INSTALL" {
            ctx.install_location.to_string_lossy().into_owned()
        } else if let Some(module) = ctx.modules.iter().find(|m| m.name == name) {
            module.abs_path.clone()
        } else {
            return Err(ResolveError::UnresolvedMacro {
                name: name.to_owned(),
                raw: raw.to_owned(),
            });
        };
        let suffix = &resolved[start + 2 + close + 1..];
        resolved = format!("{}{replacement}{suffix}", &resolved[..start]);
    }

    Ok(resolved)
}

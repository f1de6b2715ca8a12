//! Manifest parsing, module registry, and path macro resolution for synstack.
//!
//! This crate defines the schema layer: line-oriented `INSTALL_CONFIG`
//! manifest parsing (`parse_configure_dir`), the resolved module registry
//! (`InstallConfig`), `$(NAME)`-style path macro resolution (`resolve_path`),
//! injector-fragment and macro-file sub-parsers, and built-in injector
//! target presets.

pub mod config;
pub mod injector;
pub mod macros;
pub mod manifest;
pub mod module;
pub mod preset;
pub mod resolve;

pub use config::{ConfigError, InstallConfig};
pub use injector::{InjectorFile, InjectorParseError, TARGET_DIRECTIVE};
pub use macros::{parse_macro_str, MacroDef};
pub use manifest::{
    parse_configure_dir, parse_manifest_str, ManifestError, ParseOptions, ParseOutcome,
    DEFAULT_MANIFEST, INJECTION_DIR, MACRO_DIR,
};
pub use module::{InstallModule, UrlType};
pub use preset::{builtin_target, BuiltinTarget, BUILTIN_TARGETS};
pub use resolve::{resolve_path, ResolveCtx, ResolveError};

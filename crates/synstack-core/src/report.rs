use serde::Serialize;

/// What an apply pass did (or, in dry-run mode, would do).
#[derive(Debug, Default, Serialize)]
pub struct ApplyReport {
    pub dry_run: bool,
    /// Modules in the resolved configuration.
    pub modules: usize,
    /// Fragment names injected into their targets (planned in dry-run).
    pub fragments_injected: Vec<String>,
    /// Resolved paths whose target file or directory was absent.
    pub targets_missing: Vec<String>,
    /// Macro pairs loaded from the macro-file collection.
    pub macros_defined: usize,
    /// Files rewritten by the macro updater.
    pub files_rewritten: usize,
    /// Ineligible files relocated to the backup directory.
    pub files_relocated: usize,
    /// Lines replaced in place with `key=value`.
    pub lines_replaced: usize,
    /// Macro pairs appended because no existing line matched.
    pub macros_appended: usize,
    /// Malformed macro-file tokens skipped during parsing.
    pub skipped_macro_tokens: usize,
    /// Non-fatal issues accumulated across parse and apply.
    pub warnings: Vec<String>,
}

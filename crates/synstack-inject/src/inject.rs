use crate::{atomic_write, InjectError};
use std::fs;
use std::path::PathBuf;
use synstack_schema::{InjectorFile, InstallConfig};
use tracing::{debug, info};

/// First line of an injected block. The fragment name follows the prefix.
pub const INJECT_BEGIN_PREFIX: &str = "# ---- synstack inject begin: ";
/// Last line of an injected block.
pub const INJECT_END_PREFIX: &str = "# ---- synstack inject end: ";

fn begin_marker(name: &str) -> String {
    format!("{INJECT_BEGIN_PREFIX}{name} ----")
}

fn end_marker(name: &str) -> String {
    format!("{INJECT_END_PREFIX}{name} ----")
}

/// Inject a fragment into its target file.
///
/// The target path is resolved against the configuration's module table and
/// must already exist; injection appends settings to generated build files,
/// it never creates them. The fragment's content lands verbatim between a
/// begin and an end marker comment. Re-running replaces an existing block
/// for the same fragment instead of appending a second copy.
pub fn inject_fragment(
    fragment: &InjectorFile,
    config: &InstallConfig,
) -> Result<PathBuf, InjectError> {
    let target = PathBuf::from(config.convert_path_abs(fragment.target())?);
    if !target.is_file() {
        return Err(InjectError::TargetNotFound(target));
    }

    let original = fs::read_to_string(&target)?;
    let mut out = strip_block(&original, fragment.name());
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&begin_marker(fragment.name()));
    out.push('\n');
    out.push_str(fragment.contents());
    if !fragment.contents().is_empty() && !fragment.contents().ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&end_marker(fragment.name()));
    out.push('\n');

    atomic_write(&target, out.as_bytes())?;
    info!(
        "injected fragment '{}' into {}",
        fragment.name(),
        target.display()
    );
    Ok(target)
}

/// Drop a previously injected block (markers included) for `name`, leaving
/// all other content untouched.
fn strip_block(content: &str, name: &str) -> String {
    let begin = begin_marker(name);
    let end = end_marker(name);
    let mut out = String::new();
    let mut in_block = false;

    for line in content.lines() {
        if line == begin {
            in_block = true;
            debug!("replacing existing injected block '{name}'");
            continue;
        }
        if in_block {
            if line == end {
                in_block = false;
            }
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }

    out
}

use crate::{atomic_write, backup, InjectError};
use std::fs;
use std::path::{Path, PathBuf};
use synstack_schema::MacroDef;
use tracing::{debug, info};

/// What a macro update pass did to a target directory.
#[derive(Debug, Default)]
pub struct MacroUpdateOutcome {
    /// Files rewritten at (or renamed into) their final location.
    pub rewritten: Vec<PathBuf>,
    /// Ineligible files moved into the backup directory untouched.
    pub relocated: Vec<PathBuf>,
    /// Lines replaced in place with `key=value`.
    pub replaced: usize,
    /// Macro pairs appended because no line in the file matched them.
    pub appended: usize,
}

/// Apply macro pairs to every regular file directly inside `target_dir`.
///
/// Originals are preserved by copy under [`backup::BACKUP_DIR`] before the
/// first rewrite. A file is eligible for substitution when its name ends
/// with the architecture suffix, ends with `.local`, or contains no dot;
/// other files are relocated into the backup directory and left untouched.
/// Eligible `EXAMPLE_`-prefixed templates are rewritten under the name
/// without the prefix.
///
/// Consumption is tracked per file: each macro key substitutes at most one
/// line per file, and state never leaks between files. Pairs that match no
/// line are appended, so applying the same pair list twice leaves each key
/// defined exactly once.
pub fn update_macros(
    pairs: &[MacroDef],
    target_dir: &Path,
    epics_arch: &str,
) -> Result<MacroUpdateOutcome, InjectError> {
    if !target_dir.is_dir() {
        return Err(InjectError::TargetDirNotFound(target_dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(target_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut outcome = MacroUpdateOutcome::default();
    for path in files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };

        if !is_eligible(&name, epics_arch) {
            backup::relocate(target_dir, &name)?;
            debug!("relocated ineligible file {name}");
            outcome.relocated.push(path);
            continue;
        }

        backup::preserve(target_dir, &name)?;
        let content = fs::read_to_string(&path)?;
        let (rewritten, replaced, appended) = rewrite_content(&content, pairs);

        let out_name = name.strip_prefix("EXAMPLE_").unwrap_or(&name);
        let out_path = target_dir.join(out_name);
        atomic_write(&out_path, rewritten.as_bytes())?;
        if out_name != name {
            fs::remove_file(&path)?;
        }

        debug!("rewrote {out_name}: {replaced} replaced, {appended} appended");
        outcome.rewritten.push(out_path);
        outcome.replaced += replaced;
        outcome.appended += appended;
    }

    info!(
        "macro update of {}: {} rewritten, {} relocated",
        target_dir.display(),
        outcome.rewritten.len(),
        outcome.relocated.len()
    );
    Ok(outcome)
}

/// Architecture-specific build files, `.local` overrides, and extensionless
/// files carry macro settings; everything else is a template or doc.
fn is_eligible(name: &str, epics_arch: &str) -> bool {
    name.ends_with(epics_arch) || name.ends_with(".local") || !name.contains('.')
}

/// Rewrite one file's content against a fresh copy of the macro pairs.
///
/// A line containing an unconsumed `key=` is replaced wholesale by
/// `key=value` (first matching pair wins, pair consumed). Unmatched
/// non-comment lines are commented out as stale; comment lines pass
/// through. Unconsumed pairs are appended at the end.
fn rewrite_content(content: &str, pairs: &[MacroDef]) -> (String, usize, usize) {
    let mut consumed = vec![false; pairs.len()];
    let mut out = String::new();
    let mut replaced = 0;

    for raw_line in content.lines() {
        let line = raw_line.trim();
        let hit = pairs
            .iter()
            .enumerate()
            .find(|(i, p)| !consumed[*i] && line.contains(&format!("{}=", p.key)));
        match hit {
            Some((i, pair)) => {
                out.push_str(&pair.key);
                out.push('=');
                out.push_str(&pair.value);
                out.push('\n');
                consumed[i] = true;
                replaced += 1;
            }
            None if line.starts_with('#') => {
                out.push_str(line);
                out.push('\n');
            }
            None => {
                out.push('#');
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    let mut appended = 0;
    for (pair, done) in pairs.iter().zip(&consumed) {
        if !done {
            out.push_str(&pair.key);
            out.push('=');
            out.push_str(&pair.value);
            out.push('\n');
            appended += 1;
        }
    }

    (out, replaced, appended)
}

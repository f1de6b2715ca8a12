use crate::config::{ConfigError, InstallConfig};
use crate::injector::InjectorFile;
use crate::macros::parse_macro_str;
use crate::module::{InstallModule, UrlType};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default manifest file name inside the configure directory.
pub const DEFAULT_MANIFEST: &str = "INSTALL_CONFIG";
/// Subdirectory holding injector fragment files.
pub const INJECTION_DIR: &str = "injectionFiles";
/// Subdirectory holding macro definition files.
pub const MACRO_DIR: &str = "macroFiles";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("configure path not found or not a directory: {0}")]
    ConfigurePathNotFound(PathBuf),
    #[error("manifest not found: {0}")]
    ManifestNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line_no}: malformed module row, expected 6 fields, got {fields}: '{line}'")]
    MalformedRow {
        line_no: usize,
        fields: usize,
        line: String,
    },
    #[error("line {line_no}: invalid flag '{value}', expected YES or NO")]
    InvalidFlag { line_no: usize, value: String },
    #[error("line {line_no}: module row before INSTALL= directive")]
    MissingInstall { line_no: usize },
    #[error("line {line_no}: module row before GIT_URL= or WGET_URL= directive")]
    MissingUrl { line_no: usize },
    #[error("manifest contains no INSTALL= directive")]
    NoInstall,
    #[error("install path exists but is not writable: {0}")]
    InstallPathPermission(PathBuf),
    #[error("install path cannot be created: {0}")]
    InstallPathCreate(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Manifest file name inside the configure directory; defaults to
    /// [`DEFAULT_MANIFEST`].
    pub manifest_filename: Option<String>,
    /// Overrides the install root from the `INSTALL=` line.
    pub force_location: Option<PathBuf>,
    /// Downgrade install-root and path-resolution failures to warnings,
    /// keeping unresolved paths literal.
    pub allow_illegal: bool,
}

/// A parsed configuration plus the non-fatal issues found along the way.
#[derive(Debug)]
pub struct ParseOutcome {
    pub config: InstallConfig,
    pub warnings: Vec<String>,
    /// Malformed macro-file tokens skipped during the collection pass.
    pub skipped_macro_tokens: usize,
}

/// Parse a full configure directory: the manifest table, then the injector
/// fragment and macro file collections.
pub fn parse_configure_dir(
    configure_path: &Path,
    options: &ParseOptions,
) -> Result<ParseOutcome, ManifestError> {
    if !configure_path.is_dir() {
        return Err(ManifestError::ConfigurePathNotFound(
            configure_path.to_path_buf(),
        ));
    }

    let manifest_name = options
        .manifest_filename
        .as_deref()
        .unwrap_or(DEFAULT_MANIFEST);
    let manifest_path = configure_path.join(manifest_name);
    if !manifest_path.is_file() {
        return Err(ManifestError::ManifestNotFound(manifest_path));
    }

    let text = fs::read_to_string(&manifest_path)?;
    let mut outcome = parse_manifest_str(&text, configure_path, options)?;
    load_injector_files(configure_path, &mut outcome)?;
    load_macro_files(configure_path, &mut outcome)?;
    Ok(outcome)
}

/// Parse the manifest table itself.
///
/// Directive lines (`INSTALL=`, `GIT_URL=`, `WGET_URL=`, `EPICS_ARCH=`)
/// update running parse state; every other non-comment line is a six-field
/// module row combined with the current URL directive. The current URL is
/// local sequential state threaded through the loop, nothing process-wide.
pub fn parse_manifest_str(
    text: &str,
    configure_path: &Path,
    options: &ParseOptions,
) -> Result<ParseOutcome, ManifestError> {
    let mut config: Option<InstallConfig> = None;
    let mut current_url: Option<(UrlType, String)> = None;
    let mut epics_arch: Option<String> = None;
    let mut warnings = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(path) = line.strip_prefix("INSTALL=") {
            if config.is_some() {
                warnings.push(format!("line {line_no}: duplicate INSTALL= directive ignored"));
                continue;
            }
            let location = options
                .force_location
                .clone()
                .unwrap_or_else(|| PathBuf::from(path));
            validate_install_root(&location, options.allow_illegal, &mut warnings)?;
            config = Some(InstallConfig::new(location, configure_path));
        } else if let Some(url) = line.strip_prefix("GIT_URL=") {
            current_url = Some((UrlType::Git, url.to_owned()));
        } else if let Some(url) = line.strip_prefix("WGET_URL=") {
            current_url = Some((UrlType::Wget, url.to_owned()));
        } else if let Some(arch) = line.strip_prefix("EPICS_ARCH=") {
            epics_arch = Some(arch.to_owned());
        } else {
            let Some(cfg) = config.as_mut() else {
                return Err(ManifestError::MissingInstall { line_no });
            };
            let Some((url_type, url)) = current_url.clone() else {
                return Err(ManifestError::MissingUrl { line_no });
            };
            let module = parse_module_row(line, line_no, url_type, &url)?;
            match cfg.add_module(module.clone()) {
                Ok(()) => {}
                Err(ConfigError::Resolve(e)) if options.allow_illegal => {
                    warnings.push(format!("line {line_no}: {e}; keeping literal path"));
                    cfg.add_module_literal(module)?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    let Some(mut config) = config else {
        return Err(ManifestError::NoInstall);
    };
    if let Some(arch) = epics_arch {
        config.set_epics_arch(arch);
    }

    Ok(ParseOutcome {
        config,
        warnings,
        skipped_macro_tokens: 0,
    })
}

/// Split a module row into its six positional fields. Tabs and runs of
/// spaces collapse via whitespace splitting.
fn parse_module_row(
    line: &str,
    line_no: usize,
    url_type: UrlType,
    url: &str,
) -> Result<InstallModule, ManifestError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ManifestError::MalformedRow {
            line_no,
            fields: fields.len(),
            line: line.to_owned(),
        });
    }

    let clone = parse_flag(fields[4], line_no)?;
    let build = parse_flag(fields[5], line_no)?;
    let version = fields[1];
    // The repository column may pin its own version, e.g. "ADCore-$(VERSION)".
    let repository = fields[3].replace("$(VERSION)", version);

    Ok(InstallModule::new(
        fields[0], version, fields[2], url_type, url, repository, clone, build,
    ))
}

fn parse_flag(value: &str, line_no: usize) -> Result<bool, ManifestError> {
    match value.to_ascii_uppercase().as_str() {
        "YES" => Ok(true),
        "NO" => Ok(false),
        _ => Err(ManifestError::InvalidFlag {
            line_no,
            value: value.to_owned(),
        }),
    }
}

fn validate_install_root(
    location: &Path,
    allow_illegal: bool,
    warnings: &mut Vec<String>,
) -> Result<(), ManifestError> {
    if location.is_dir() {
        if !dir_is_writable(location) {
            if allow_illegal {
                warnings.push(format!(
                    "install path not writable: {}",
                    location.display()
                ));
                return Ok(());
            }
            return Err(ManifestError::InstallPathPermission(location.to_path_buf()));
        }
    } else if let Err(e) = fs::create_dir_all(location) {
        if allow_illegal {
            warnings.push(format!(
                "cannot create install path {}: {e}",
                location.display()
            ));
            return Ok(());
        }
        return Err(ManifestError::InstallPathCreate(location.to_path_buf()));
    }
    Ok(())
}

/// Probe writability by creating and removing a marker file. Permission
/// bits alone miss ACLs and read-only mounts.
fn dir_is_writable(dir: &Path) -> bool {
    let probe = dir.join(".synstack-probe");
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
    {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&probe);
            true
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

fn load_injector_files(
    configure_path: &Path,
    outcome: &mut ParseOutcome,
) -> Result<(), ManifestError> {
    for path in sorted_files(&configure_path.join(INJECTION_DIR))? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(&path)?;
        match InjectorFile::parse(name, &text) {
            Ok(fragment) => outcome.config.add_injector_file(fragment),
            Err(e) => outcome.warnings.push(format!("{}: {e}", path.display())),
        }
    }
    Ok(())
}

fn load_macro_files(
    configure_path: &Path,
    outcome: &mut ParseOutcome,
) -> Result<(), ManifestError> {
    for path in sorted_files(&configure_path.join(MACRO_DIR))? {
        let text = fs::read_to_string(&path)?;
        let (defs, skipped) = parse_macro_str(&text);
        if skipped > 0 {
            outcome.warnings.push(format!(
                "{}: {skipped} malformed macro token(s) skipped",
                path.display()
            ));
            outcome.skipped_macro_tokens += skipped;
        }
        outcome.config.add_macros(defs);
    }
    Ok(())
}

/// Regular files directly inside `dir`, sorted by name for deterministic
/// load order. A missing directory is an empty collection, not an error.
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

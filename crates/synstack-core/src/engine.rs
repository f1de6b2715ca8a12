use crate::lock::{InstallLock, LOCK_FILE};
use crate::report::ApplyReport;
use crate::CoreError;
use std::path::{Path, PathBuf};
use synstack_inject::{inject_fragment, update_macros, InjectError};
use synstack_schema::{parse_configure_dir, InstallConfig, ParseOptions, ParseOutcome};
use tracing::{debug, info, warn};

/// Subdirectory of the areaDetector tree whose files take the macro pass.
const AD_CONFIGURE_DIR: &str = "configure";

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub parse: ParseOptions,
    /// Report what would change without touching the install tree.
    pub dry_run: bool,
}

/// Orchestrates a full configuration pass: parse the configure directory,
/// inject every fragment into the resolved install tree, then run the macro
/// update over the areaDetector configure directory.
pub struct Engine {
    configure_path: PathBuf,
}

impl Engine {
    pub fn new(configure_path: impl Into<PathBuf>) -> Self {
        Self {
            configure_path: configure_path.into(),
        }
    }

    pub fn configure_path(&self) -> &Path {
        &self.configure_path
    }

    /// Parse the configure directory into a resolved configuration.
    pub fn load(&self, options: &ParseOptions) -> Result<ParseOutcome, CoreError> {
        info!(
            "loading install configuration from {}",
            self.configure_path.display()
        );
        Ok(parse_configure_dir(&self.configure_path, options)?)
    }

    /// Run the full configuration pass.
    ///
    /// Per-fragment missing targets are collected into the report rather
    /// than aborting the pass; structural failures (unresolvable macros,
    /// I/O errors) abort. Mutating runs hold an exclusive lock on the
    /// install root for their duration.
    pub fn apply(&self, options: &ApplyOptions) -> Result<ApplyReport, CoreError> {
        let outcome = self.load(&options.parse)?;
        let config = outcome.config;

        let mut report = ApplyReport {
            dry_run: options.dry_run,
            modules: config.modules().len(),
            macros_defined: config.macros().len(),
            skipped_macro_tokens: outcome.skipped_macro_tokens,
            warnings: outcome.warnings,
            ..ApplyReport::default()
        };

        let _lock = if options.dry_run {
            None
        } else {
            Some(InstallLock::acquire(
                &config.install_location().join(LOCK_FILE),
            )?)
        };

        self.inject_fragments(&config, options.dry_run, &mut report)?;
        self.update_macro_files(&config, options.dry_run, &mut report)?;

        info!(
            "apply finished: {} fragment(s), {} file(s) rewritten, {} warning(s)",
            report.fragments_injected.len(),
            report.files_rewritten,
            report.warnings.len()
        );
        Ok(report)
    }

    fn inject_fragments(
        &self,
        config: &InstallConfig,
        dry_run: bool,
        report: &mut ApplyReport,
    ) -> Result<(), CoreError> {
        for fragment in config.injector_files() {
            if dry_run {
                let target = PathBuf::from(config.convert_path_abs(fragment.target())?);
                if target.is_file() {
                    debug!("would inject '{}' into {}", fragment.name(), target.display());
                    report.fragments_injected.push(fragment.name().to_owned());
                } else {
                    report.targets_missing.push(target.display().to_string());
                }
                continue;
            }

            match inject_fragment(fragment, config) {
                Ok(_) => report.fragments_injected.push(fragment.name().to_owned()),
                Err(InjectError::TargetNotFound(path)) => {
                    warn!(
                        "skipping fragment '{}': target {} does not exist",
                        fragment.name(),
                        path.display()
                    );
                    report.targets_missing.push(path.display().to_string());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn update_macro_files(
        &self,
        config: &InstallConfig,
        dry_run: bool,
        report: &mut ApplyReport,
    ) -> Result<(), CoreError> {
        if config.macros().is_empty() {
            return Ok(());
        }
        let Some(ad_path) = config.ad_path() else {
            warn!("no AREA_DETECTOR module in manifest; skipping macro update");
            report
                .warnings
                .push("no AREA_DETECTOR module; macro update skipped".to_owned());
            return Ok(());
        };

        let target_dir = ad_path.join(AD_CONFIGURE_DIR);
        if !target_dir.is_dir() {
            warn!(
                "macro target directory {} does not exist; skipping",
                target_dir.display()
            );
            report.targets_missing.push(target_dir.display().to_string());
            return Ok(());
        }
        if dry_run {
            debug!("would update macros in {}", target_dir.display());
            return Ok(());
        }

        let outcome = update_macros(config.macros(), &target_dir, config.epics_arch())?;
        report.files_rewritten = outcome.rewritten.len();
        report.files_relocated = outcome.relocated.len();
        report.lines_replaced = outcome.replaced;
        report.macros_appended = outcome.appended;
        Ok(())
    }
}

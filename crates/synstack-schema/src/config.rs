use crate::injector::InjectorFile;
use crate::macros::MacroDef;
use crate::module::InstallModule;
use crate::resolve::{resolve_path, ResolveCtx, ResolveError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default target architecture suffix used by the macro updater's
/// file-eligibility rule.
pub const DEFAULT_EPICS_ARCH: &str = "linux-x86_64";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("well-known module '{0}' declared more than once")]
    DuplicateWellKnown(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// The resolved module registry: install root, manifest-ordered modules,
/// derived well-known paths, and the injector/macro collections attached
/// after the table pass.
///
/// Order matters: a module's path macros may only reference modules added
/// before it, so resolution happens at add time. The registry is mutated
/// during parsing and read-only afterward.
#[derive(Debug, Clone, Serialize)]
pub struct InstallConfig {
    install_location: PathBuf,
    configure_path: PathBuf,
    epics_arch: String,
    modules: Vec<InstallModule>,
    base_path: Option<PathBuf>,
    support_path: Option<PathBuf>,
    ad_path: Option<PathBuf>,
    injector_files: Vec<InjectorFile>,
    macros: Vec<MacroDef>,
}

impl InstallConfig {
    pub fn new(install_location: impl Into<PathBuf>, configure_path: impl Into<PathBuf>) -> Self {
        Self {
            install_location: install_location.into(),
            configure_path: configure_path.into(),
            epics_arch: DEFAULT_EPICS_ARCH.to_owned(),
            modules: Vec::new(),
            base_path: None,
            support_path: None,
            ad_path: None,
            injector_files: Vec::new(),
            macros: Vec::new(),
        }
    }

    /// Resolve the module's install path against the root and all previously
    /// added modules, then append it to the registry.
    ///
    /// Adding a module named `EPICS_BASE`, `SUPPORT`, or `AREA_DETECTOR`
    /// derives the corresponding well-known path; declaring one of those
    /// names twice is an error, never a silent overwrite.
    pub fn add_module(&mut self, mut module: InstallModule) -> Result<(), ConfigError> {
        let ctx = ResolveCtx {
            install_location: &self.install_location,
            modules: &self.modules,
            self_version: Some(&module.version),
        };
        module.abs_path = resolve_path(&module.rel_path, &ctx)?;
        self.register_well_known(&module)?;
        self.modules.push(module);
        Ok(())
    }

    /// Append a module keeping its raw path as the resolved value.
    ///
    /// Used by the parser's allow-illegal mode after an unresolved macro has
    /// been reported; the well-known once-only invariant still holds.
    pub fn add_module_literal(&mut self, mut module: InstallModule) -> Result<(), ConfigError> {
        module.abs_path = module.rel_path.clone();
        self.register_well_known(&module)?;
        self.modules.push(module);
        Ok(())
    }

    fn register_well_known(&mut self, module: &InstallModule) -> Result<(), ConfigError> {
        let slot = match module.name.as_str() {
            "EPICS_BASE" => &mut self.base_path,
            "SUPPORT" => &mut self.support_path,
            "AREA_DETECTOR" => &mut self.ad_path,
            _ => return Ok(()),
        };
        if slot.is_some() {
            return Err(ConfigError::DuplicateWellKnown(module.name.clone()));
        }
        *slot = Some(PathBuf::from(&module.abs_path));
        Ok(())
    }

    /// Resolve a macro-bearing path against the full module table.
    pub fn convert_path_abs(&self, raw: &str) -> Result<String, ResolveError> {
        let ctx = ResolveCtx {
            install_location: &self.install_location,
            modules: &self.modules,
            self_version: None,
        };
        resolve_path(raw, &ctx)
    }

    pub fn add_injector_file(&mut self, file: InjectorFile) {
        self.injector_files.push(file);
    }

    /// Attach macro definitions. A key may repeat across macro files; the
    /// last definition wins, so the applied list holds each key once.
    pub fn add_macros(&mut self, defs: Vec<MacroDef>) {
        for def in defs {
            match self.macros.iter_mut().find(|m| m.key == def.key) {
                Some(existing) => existing.value = def.value,
                None => self.macros.push(def),
            }
        }
    }

    pub fn set_epics_arch(&mut self, arch: impl Into<String>) {
        self.epics_arch = arch.into();
    }

    pub fn install_location(&self) -> &Path {
        &self.install_location
    }

    pub fn configure_path(&self) -> &Path {
        &self.configure_path
    }

    pub fn epics_arch(&self) -> &str {
        &self.epics_arch
    }

    pub fn modules(&self) -> &[InstallModule] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&InstallModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    pub fn support_path(&self) -> Option<&Path> {
        self.support_path.as_deref()
    }

    pub fn ad_path(&self) -> Option<&Path> {
        self.ad_path.as_deref()
    }

    pub fn injector_files(&self) -> &[InjectorFile] {
        &self.injector_files
    }

    pub fn macros(&self) -> &[MacroDef] {
        &self.macros
    }
}

use serde::Serialize;

/// Built-in injection target for a standard fragment name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuiltinTarget {
    pub name: &'static str,
    pub description: &'static str,
    pub target: &'static str,
}

/// Default target locations for the standard areaDetector fragment names.
/// A fragment file carrying no `__TARGET_LOC__` directive injects into the
/// target registered here for its file name.
pub const BUILTIN_TARGETS: &[BuiltinTarget] = &[
    BuiltinTarget {
        name: "AD_RELEASE_CONFIG",
        description: "Product release paths for areaDetector drivers and plugins",
        target: "$(AREA_DETECTOR)/configure/RELEASE_PRODS.local",
    },
    BuiltinTarget {
        name: "AUTOSAVE_CONFIG",
        description: "Autosave request entries for common plugins",
        target: "$(AREA_DETECTOR)/ADCore/iocBoot/commonPlugin_settings.req",
    },
    BuiltinTarget {
        name: "MAKEFILE_CONFIG",
        description: "Driver makefile additions shared by all IOCs",
        target: "$(AREA_DETECTOR)/ADCore/ADApp/commonDriverMakefile",
    },
    BuiltinTarget {
        name: "PLUGIN_CONFIG",
        description: "IOC startup commands for common plugins",
        target: "$(AREA_DETECTOR)/ADCore/iocBoot/commonPlugins.cmd",
    },
];

pub fn builtin_target(name: &str) -> Option<&'static str> {
    BUILTIN_TARGETS
        .iter()
        .find(|t| t.name == name)
        .map(|t| t.target)
}

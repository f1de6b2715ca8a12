use super::{json_pretty, load_outcome, print_warnings, EXIT_SUCCESS};
use synstack_core::Engine;
use synstack_schema::ParseOptions;

pub fn run(engine: &Engine, options: &ParseOptions, json: bool) -> Result<u8, String> {
    let outcome = load_outcome(engine, options)?;
    let cfg = &outcome.config;

    if json {
        println!("{}", json_pretty(cfg)?);
        return Ok(EXIT_SUCCESS);
    }

    print_warnings(&outcome.warnings);
    println!("install:  {}", cfg.install_location().display());
    println!("arch:     {}", cfg.epics_arch());
    if let Some(p) = cfg.base_path() {
        println!("base:     {}", p.display());
    }
    if let Some(p) = cfg.support_path() {
        println!("support:  {}", p.display());
    }
    if let Some(p) = cfg.ad_path() {
        println!("ad:       {}", p.display());
    }
    println!();
    for module in cfg.modules() {
        println!(
            "{:<16} {:<10} {:<5} {:<6} {}",
            module.name,
            module.version,
            if module.clone { "clone" } else { "-" },
            if module.build { "build" } else { "-" },
            module.abs_path
        );
    }
    if !cfg.injector_files().is_empty() {
        println!();
        for fragment in cfg.injector_files() {
            println!("fragment {:<20} -> {}", fragment.name(), fragment.target());
        }
    }
    if !cfg.macros().is_empty() {
        println!();
        println!("{} macro definition(s) loaded", cfg.macros().len());
    }
    Ok(EXIT_SUCCESS)
}

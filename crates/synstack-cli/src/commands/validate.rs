use super::{json_pretty, load_outcome, print_warnings, EXIT_SUCCESS};
use synstack_core::Engine;
use synstack_schema::ParseOptions;

pub fn run(engine: &Engine, options: &ParseOptions, json: bool) -> Result<u8, String> {
    let outcome = load_outcome(engine, options)?;
    let cfg = &outcome.config;

    if json {
        let payload = serde_json::json!({
            "status": "ok",
            "modules": cfg.modules().len(),
            "injector_files": cfg.injector_files().len(),
            "macros": cfg.macros().len(),
            "skipped_macro_tokens": outcome.skipped_macro_tokens,
            "warnings": outcome.warnings,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        print_warnings(&outcome.warnings);
        println!(
            "manifest ok: {} module(s), {} fragment(s), {} macro(s)",
            cfg.modules().len(),
            cfg.injector_files().len(),
            cfg.macros().len()
        );
    }
    Ok(EXIT_SUCCESS)
}

use super::{json_pretty, load_outcome, print_warnings, EXIT_SUCCESS};
use std::path::Path;
use synstack_core::Engine;
use synstack_inject::update_macros;
use synstack_schema::ParseOptions;

pub fn run(
    engine: &Engine,
    options: &ParseOptions,
    target_dir: Option<&Path>,
    json: bool,
) -> Result<u8, String> {
    let outcome = load_outcome(engine, options)?;
    let cfg = &outcome.config;

    let default_dir;
    let target_dir = match target_dir {
        Some(dir) => dir,
        None => {
            let ad_path = cfg.ad_path().ok_or_else(|| {
                "no AREA_DETECTOR module in manifest; pass --target-dir explicitly".to_owned()
            })?;
            default_dir = ad_path.join("configure");
            &default_dir
        }
    };

    let result = update_macros(cfg.macros(), target_dir, cfg.epics_arch())
        .map_err(|e| format!("inject error: {e}"))?;

    if json {
        let payload = serde_json::json!({
            "target_dir": target_dir,
            "files_rewritten": result.rewritten.len(),
            "files_relocated": result.relocated.len(),
            "lines_replaced": result.replaced,
            "macros_appended": result.appended,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        print_warnings(&outcome.warnings);
        println!(
            "updated {}: {} file(s) rewritten, {} relocated, {} line(s) replaced, {} macro(s) appended",
            target_dir.display(),
            result.rewritten.len(),
            result.relocated.len(),
            result.replaced,
            result.appended
        );
    }
    Ok(EXIT_SUCCESS)
}

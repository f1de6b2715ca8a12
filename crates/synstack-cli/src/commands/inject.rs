use super::{json_pretty, load_outcome, print_warnings, EXIT_SUCCESS};
use synstack_core::Engine;
use synstack_inject::{inject_fragment, InjectError};
use synstack_schema::{InjectorFile, ParseOptions};

pub fn run(
    engine: &Engine,
    options: &ParseOptions,
    name: Option<&str>,
    json: bool,
) -> Result<u8, String> {
    let outcome = load_outcome(engine, options)?;
    let cfg = &outcome.config;

    let fragments: Vec<&InjectorFile> = match name {
        Some(name) => {
            let fragment = cfg
                .injector_files()
                .iter()
                .find(|f| f.name() == name)
                .ok_or_else(|| format!("no injector fragment named '{name}'"))?;
            vec![fragment]
        }
        None => cfg.injector_files().iter().collect(),
    };

    let mut injected = Vec::new();
    let mut missing = Vec::new();
    for fragment in fragments {
        match inject_fragment(fragment, cfg) {
            Ok(target) => injected.push((fragment.name().to_owned(), target)),
            Err(InjectError::TargetNotFound(path)) => {
                missing.push((fragment.name().to_owned(), path));
            }
            Err(e) => return Err(format!("inject error: {e}")),
        }
    }

    if json {
        let payload = serde_json::json!({
            "injected": injected
                .iter()
                .map(|(name, target)| serde_json::json!({ "fragment": name, "target": target }))
                .collect::<Vec<_>>(),
            "targets_missing": missing
                .iter()
                .map(|(name, target)| serde_json::json!({ "fragment": name, "target": target }))
                .collect::<Vec<_>>(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        print_warnings(&outcome.warnings);
        for (name, target) in &injected {
            println!("injected {name} into {}", target.display());
        }
        for (name, target) in &missing {
            eprintln!("skipped {name}: target {} does not exist", target.display());
        }
    }

    // A single named fragment with a missing target is a hard failure;
    // a bulk pass reports and moves on.
    if name.is_some() && !missing.is_empty() {
        let (name, target) = &missing[0];
        return Err(format!(
            "inject error: fragment '{name}' target {} does not exist",
            target.display()
        ));
    }
    Ok(EXIT_SUCCESS)
}

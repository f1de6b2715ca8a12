use super::{json_pretty, print_warnings, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use synstack_core::{ApplyOptions, Engine};
use synstack_schema::ParseOptions;

pub fn run(
    engine: &Engine,
    options: &ParseOptions,
    dry_run: bool,
    json: bool,
) -> Result<u8, String> {
    let apply_options = ApplyOptions {
        parse: options.clone(),
        dry_run,
    };

    let pb = if json {
        None
    } else {
        Some(spinner(if dry_run {
            "planning configuration pass..."
        } else {
            "applying configuration..."
        }))
    };

    let report = match engine.apply(&apply_options) {
        Ok(report) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, if dry_run { "plan complete" } else { "configuration applied" });
            }
            report
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "configuration pass failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        print_warnings(&report.warnings);
        let verb = if report.dry_run { "would inject" } else { "injected" };
        println!(
            "{verb} {} fragment(s) across {} module(s)",
            report.fragments_injected.len(),
            report.modules
        );
        if !report.targets_missing.is_empty() {
            println!("{} target(s) missing:", report.targets_missing.len());
            for target in &report.targets_missing {
                println!("  {target}");
            }
        }
        if report.files_rewritten > 0 || report.files_relocated > 0 {
            println!(
                "macro update: {} file(s) rewritten, {} relocated, {} line(s) replaced, {} appended",
                report.files_rewritten,
                report.files_relocated,
                report.lines_replaced,
                report.macros_appended
            );
        }
    }
    Ok(EXIT_SUCCESS)
}

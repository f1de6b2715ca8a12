pub mod apply;
pub mod completions;
pub mod inject;
pub mod inspect;
pub mod presets;
pub mod update_macros;
pub mod validate;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use synstack_core::Engine;
use synstack_schema::{ParseOptions, ParseOutcome};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_INJECT_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn load_outcome(engine: &Engine, options: &ParseOptions) -> Result<ParseOutcome, String> {
    engine.load(options).map_err(|e| e.to_string())
}

pub fn print_warnings(warnings: &[String]) {
    use console::Style;
    let style = Style::new().yellow();
    for warning in warnings {
        eprintln!("{} {warning}", style.apply_to("warning:"));
    }
}

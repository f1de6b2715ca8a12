use super::{json_pretty, EXIT_SUCCESS};
use synstack_schema::BUILTIN_TARGETS;

pub fn run(json: bool) -> Result<u8, String> {
    if json {
        println!("{}", json_pretty(&BUILTIN_TARGETS)?);
    } else {
        for preset in BUILTIN_TARGETS {
            println!("{:<20} {}", preset.name, preset.target);
            println!("{:<20} {}", "", preset.description);
        }
    }
    Ok(EXIT_SUCCESS)
}

use anyhow::Result;
use codegrade_core::Language;
use serde_json::json;

use super::super::args::{LanguagesArgs, OutputFormat};
use crate::exit_codes;

pub fn run(args: LanguagesArgs) -> Result<i32> {
    match args.format {
        OutputFormat::Text => {
            for lang in Language::ALL {
                let runtime = lang.runtime();
                println!(
                    "{:<12} {:<20} piston {:<10} {:<9} judge0 {}",
                    lang.name(),
                    lang.aliases().join(", "),
                    runtime.piston_language,
                    runtime.piston_version,
                    runtime.judge0_id
                );
            }
        }
        OutputFormat::Json => {
            let listing: Vec<_> = Language::ALL
                .into_iter()
                .map(|lang| {
                    let runtime = lang.runtime();
                    json!({
                        "name": lang.name(),
                        "aliases": lang.aliases(),
                        "piston": {
                            "language": runtime.piston_language,
                            "version": runtime.piston_version,
                        },
                        "judge0Id": runtime.judge0_id,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(exit_codes::SUCCESS)
}

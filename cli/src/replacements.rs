use anyhow::{Context, Result};
use asg_test_model::{resolve_replacement_values, ValueSource};
use clap::Parser;
use std::path::Path;

/// Print the replacement values, one `KEY=value` per line.
#[derive(Debug, Parser)]
pub(crate) struct Replacements {
    /// Print the values as a JSON object instead.
    #[clap(long)]
    json: bool,
}

impl Replacements {
    pub(crate) fn run(self, bootstrap_dir: &Path) -> Result<()> {
        let replacements = resolve_replacement_values(bootstrap_dir);
        if replacements.source == ValueSource::Fallback {
            eprintln!(
                "No usable bootstrap descriptor in '{}', showing fallback values",
                bootstrap_dir.display()
            );
        }
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&replacements.values)
                    .context("Unable to serialize replacement values")?
            );
        } else {
            for (key, value) in &replacements.values {
                println!("{}={}", key, value);
            }
        }
        Ok(())
    }
}

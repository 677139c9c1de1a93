use anyhow::{Context, Error, Result};
use asg_test_model::constants::ASG_NAME;
use asg_test_model::{get_replacement_values, random_suffix_name, ManifestTemplate};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Render `<resource-dir>/<template>.yaml` with the replacement values and print it as JSON.
#[derive(Debug, Parser)]
pub(crate) struct Render {
    /// The template name, without the `.yaml` extension.
    #[clap(default_value = "auto_scaling_group")]
    template: String,

    /// The directory holding the templates.
    #[clap(long = "resource-dir", default_value = "resources")]
    resource_dir: PathBuf,

    /// The value for `$ASG_NAME`. A random name is generated when absent.
    #[clap(long)]
    name: Option<String>,

    /// Extra `KEY=VALUE` replacements. These override the bootstrap values.
    #[clap(long = "set", parse(try_from_str = parse_key_value))]
    set: Vec<(String, String)>,
}

impl Render {
    pub(crate) fn run(self, bootstrap_dir: &Path) -> Result<()> {
        let name = self
            .name
            .unwrap_or_else(|| random_suffix_name("ack-test-asg", 32));
        let rendered = ManifestTemplate::new(self.template.as_str())
            .with_replacements(get_replacement_values(bootstrap_dir))
            .with_replacement(ASG_NAME, name)
            .with_replacements(self.set)
            .render(&self.resource_dir)
            .context(format!("Unable to render '{}'", self.template))?;
        println!(
            "{}",
            serde_json::to_string_pretty(&rendered).context("Unable to serialize manifest")?
        );
        Ok(())
    }
}

fn parse_key_value(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| Error::msg(format!("'{}' is not of the form KEY=VALUE", arg)))?;
    Ok((key.to_string(), value.to_string()))
}

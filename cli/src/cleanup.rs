use anyhow::{Error, Result};
use asg_test_bootstrap::aws::ec2_client;
use asg_test_bootstrap::ResourceCleaner;
use clap::Parser;
use std::path::Path;

/// Delete the bootstrapped launch template and the descriptor. Steps that fail are reported but
/// do not stop the others.
#[derive(Debug, Parser)]
pub(crate) struct Cleanup {
    /// Exit with an error if any cleanup step failed.
    #[clap(long)]
    strict: bool,
}

impl Cleanup {
    pub(crate) async fn run(self, bootstrap_dir: &Path, region: &Option<String>) -> Result<()> {
        let report = ResourceCleaner::new(ec2_client(region).await)
            .cleanup(bootstrap_dir)
            .await;
        for (step, outcome) in report.steps() {
            println!("{}: {}", step, outcome);
        }
        if self.strict && report.has_failures() {
            return Err(Error::msg("One or more cleanup steps failed"));
        }
        Ok(())
    }
}

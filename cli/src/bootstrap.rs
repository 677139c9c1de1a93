use anyhow::{Context, Result};
use asg_test_bootstrap::aws::ec2_client;
use asg_test_bootstrap::ResourceBootstrapper;
use clap::Parser;
use std::path::Path;

/// Discover the default VPC, pick an image, create or adopt the launch template and write the
/// bootstrap descriptor.
#[derive(Debug, Parser)]
pub(crate) struct Bootstrap {
    /// Use a launch template name other than the default.
    #[clap(long = "launch-template-name")]
    launch_template_name: Option<String>,
}

impl Bootstrap {
    pub(crate) async fn run(self, bootstrap_dir: &Path, region: &Option<String>) -> Result<()> {
        let mut bootstrapper = ResourceBootstrapper::new(ec2_client(region).await);
        if let Some(name) = self.launch_template_name {
            bootstrapper = bootstrapper.with_launch_template_name(name);
        }
        let path = bootstrapper
            .bootstrap_to(bootstrap_dir)
            .await
            .context("Unable to bootstrap the test prerequisites")?;
        println!("Wrote bootstrap descriptor to '{}'", path.display());
        Ok(())
    }
}

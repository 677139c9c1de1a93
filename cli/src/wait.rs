use anyhow::{Context, Error, Result};
use asg_test_model::clients::{KubeResourceClient, ResourceClient};
use asg_test_model::constants::{CONDITION_RESOURCE_SYNCED, CONDITION_TRUE, DEFAULT_NAMESPACE};
use asg_test_model::{ConditionExpectation, Poller, ResourceHandle};
use clap::Parser;
use std::path::Path;
use std::time::Duration;

/// Poll an auto scaling group custom resource until a status condition has the expected value.
#[derive(Debug, Parser)]
pub(crate) struct Wait {
    /// The name of the custom resource.
    name: String,

    #[clap(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// The condition type to watch.
    #[clap(long, default_value = CONDITION_RESOURCE_SYNCED)]
    condition: String,

    /// The expected condition status.
    #[clap(long, default_value = CONDITION_TRUE)]
    status: String,

    /// How many times to check the condition.
    #[clap(long, default_value = "3")]
    attempts: u32,

    /// Seconds to sleep between checks.
    #[clap(long = "interval", default_value = "10")]
    interval_secs: u64,
}

impl Wait {
    pub(crate) async fn run(self, kubeconfig: Option<&Path>) -> Result<()> {
        let client = match kubeconfig {
            Some(path) => KubeResourceClient::new_from_kubeconfig_path(path)
                .await
                .context(format!(
                    "Unable to create kubernetes client from path '{}'",
                    path.display()
                ))?,
            None => KubeResourceClient::new()
                .await
                .context("Unable to create default kubernetes client")?,
        };
        let handle =
            ResourceHandle::auto_scaling_group(self.name.as_str()).in_namespace(self.namespace);
        let expectation = ConditionExpectation::new(
            self.condition.as_str(),
            self.status.as_str(),
            Poller::new(self.attempts, Duration::from_secs(self.interval_secs)),
        );
        if !client.wait_on_condition(&handle, &expectation).await {
            return Err(Error::msg(format!(
                "Condition '{}' of {} did not become '{}'",
                self.condition, handle, self.status
            )));
        }
        println!("{}: {}={}", handle, self.condition, self.status);
        Ok(())
    }
}

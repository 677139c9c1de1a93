use asg_test_bootstrap::{CloudError, CloudResult};
use asg_test_model::{AsgTag, Poller};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::future::Future;

/// The live state of an auto scaling group, reduced to the fields the scenarios assert on.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AutoScalingGroupState {
    pub name: String,
    pub min_size: i32,
    pub max_size: i32,
    pub desired_capacity: i32,
    pub tags: Vec<AsgTag>,
}

#[async_trait]
pub trait AutoScalingApi: Send + Sync {
    /// The groups called `name`. Empty once the group has been deleted.
    async fn describe_groups(&self, name: &str) -> CloudResult<Vec<AutoScalingGroupState>>;
}

#[async_trait]
impl AutoScalingApi for aws_sdk_autoscaling::Client {
    async fn describe_groups(&self, name: &str) -> CloudResult<Vec<AutoScalingGroupState>> {
        let output = self
            .describe_auto_scaling_groups()
            .auto_scaling_group_names(name)
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DescribeAutoScalingGroups", e))?;
        Ok(output
            .auto_scaling_groups()
            .unwrap_or_default()
            .iter()
            .map(|group| AutoScalingGroupState {
                name: group
                    .auto_scaling_group_name()
                    .unwrap_or_default()
                    .to_string(),
                min_size: group.min_size().unwrap_or_default(),
                max_size: group.max_size().unwrap_or_default(),
                desired_capacity: group.desired_capacity().unwrap_or_default(),
                tags: group
                    .tags()
                    .unwrap_or_default()
                    .iter()
                    .map(|tag| {
                        AsgTag::new(
                            tag.key().unwrap_or_default(),
                            tag.value().unwrap_or_default(),
                            tag.propagate_at_launch().unwrap_or_default(),
                        )
                    })
                    .collect(),
            })
            .collect())
    }
}

/// Poll `describe` until `key` is no longer in its result set. A failed describe counts as the
/// entity still being present. Returns `false` if the budget runs out first.
pub async fn wait_for_absence<F, Fut, K>(mut describe: F, key: &str, poller: Poller) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CloudResult<Vec<K>>>,
    K: AsRef<str>,
{
    info!(
        "Waiting up to {}s for '{}' to disappear",
        poller.budget().as_secs(),
        key
    );
    let absent = poller
        .until(|| {
            let described = describe();
            async move {
                match described.await {
                    Ok(keys) => {
                        let present = keys.iter().any(|k| k.as_ref() == key);
                        debug!("'{}' present: {}", key, present);
                        !present
                    }
                    Err(e) => {
                        debug!("Unable to describe '{}': {}", key, e);
                        false
                    }
                }
            }
        })
        .await;
    if !absent {
        warn!(
            "'{}' still exists after {} attempts",
            key,
            poller.max_attempts()
        );
    }
    absent
}

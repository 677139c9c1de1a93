use crate::constants::DEFAULT_REGION;
use aws_config::retry::RetryConfig;
use aws_smithy_types::retry::RetryMode;
use aws_types::region::Region;
use aws_types::SdkConfig;
use log::info;

/// Set up the config for aws calls. Credentials come from the default provider chain; `region`
/// overrides the default region.
pub async fn aws_config(region: &Option<String>) -> SdkConfig {
    let region = region
        .as_ref()
        .unwrap_or(&DEFAULT_REGION.to_string())
        .to_string();
    info!(
        "Creating a custom region provider for '{}' to be used in the aws config.",
        region
    );

    aws_config::from_env()
        .retry_config(retry_config())
        .region(Region::new(region))
        .load()
        .await
}

fn retry_config() -> RetryConfig {
    RetryConfig::standard()
        .with_retry_mode(RetryMode::Adaptive)
        .with_max_attempts(15)
}

/// An EC2 client for `region`.
pub async fn ec2_client(region: &Option<String>) -> aws_sdk_ec2::Client {
    aws_sdk_ec2::Client::new(&aws_config(region).await)
}

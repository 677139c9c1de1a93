use crate::CloudError;
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

/// Why bootstrapping stopped. Any of these means the test suite cannot run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to describe VPCs: {}", source))]
    DescribeVpcs { source: CloudError },

    #[snafu(display("The account has no default VPC"))]
    NoDefaultVpc,

    #[snafu(display("Unable to describe the subnets of '{}': {}", vpc_id, source))]
    DescribeSubnets { vpc_id: String, source: CloudError },

    #[snafu(display("The default VPC '{}' has no subnets", vpc_id))]
    NoSubnets { vpc_id: String },

    #[snafu(display("Unable to describe images matching '{}': {}", pattern, source))]
    DescribeImages { pattern: String, source: CloudError },

    #[snafu(display("No image matches any of {:?}", patterns))]
    NoImage { patterns: Vec<String> },

    #[snafu(display("Unable to create launch template '{}': {}", name, source))]
    CreateLaunchTemplate { name: String, source: CloudError },

    #[snafu(display("Unable to look up existing launch template '{}': {}", name, source))]
    AdoptLaunchTemplate { name: String, source: CloudError },

    #[snafu(display("Launch template '{}' already exists but could not be found", name))]
    LaunchTemplateMissing { name: String },

    #[snafu(display("Unable to persist the resource descriptor: {}", source))]
    Persist { source: asg_test_model::Error },
}

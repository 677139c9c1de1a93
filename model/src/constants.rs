/// Helper macro to avoid retyping the base domain-like name of the controller's API group when
/// creating further string constants from it. When given no parameters, this returns the base
/// domain-like name. When given a string literal parameter it adds `/parameter` to the end.
macro_rules! services_k8s_aws {
    () => {
        "services.k8s.aws"
    };
    ($s:literal) => {
        concat!(services_k8s_aws!(), "/", $s)
    };
}

// Custom resource identifiers
pub const CRD_GROUP: &str = concat!("autoscaling.", services_k8s_aws!());
pub const CRD_VERSION: &str = "v1alpha1";
pub const RESOURCE_PLURAL: &str = "autoscalinggroups";
pub const RESOURCE_KIND: &str = "AutoScalingGroup";
pub const DEFAULT_NAMESPACE: &str = "default";

// Conditions
pub const CONDITION_RESOURCE_SYNCED: &str = "ACK.ResourceSynced";
pub const CONDITION_TRUE: &str = "True";

// System tags injected by the controller
pub const SYSTEM_TAG_PREFIX: &str = services_k8s_aws!();
pub const SYSTEM_TAG_CONTROLLER_VERSION: &str = services_k8s_aws!("controller-version");
pub const SYSTEM_TAG_NAMESPACE: &str = services_k8s_aws!("namespace");
pub const AWS_TAG_PREFIX: &str = "aws:";

// Bootstrap record
pub const BOOTSTRAP_FILE_NAME: &str = "bootstrap.yaml";

// Replacement keys
pub const LAUNCH_TEMPLATE_ID: &str = "LAUNCH_TEMPLATE_ID";
pub const LAUNCH_TEMPLATE_VERSION: &str = "LAUNCH_TEMPLATE_VERSION";
pub const AVAILABILITY_ZONE_1: &str = "AVAILABILITY_ZONE_1";
pub const VPC_ZONE_IDENTIFIER: &str = "VPC_ZONE_IDENTIFIER";
pub const ASG_NAME: &str = "ASG_NAME";

// Defaults
pub const LATEST_LAUNCH_TEMPLATE_VERSION: &str = "$Latest";
pub const DEFAULT_AVAILABILITY_ZONE: &str = "us-west-2a";

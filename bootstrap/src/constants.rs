/// The region used when none is configured.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Process exit status reserved for bootstrap failures.
pub const BOOTSTRAP_FAILURE_EXIT_CODE: i32 = 254;

// Launch template
pub const LAUNCH_TEMPLATE_NAME: &str = "ack-test-asg-launch-template";
pub const INSTANCE_TYPE: &str = "t3.micro";
pub const INSTANCE_NAME_TAG: &str = "ack-test-asg-instance";
pub const MANAGED_BY_TAG: &str = "ManagedBy";
pub const MANAGED_BY_VALUE: &str = "ACK";

// Machine images, most preferred first
pub const IMAGE_OWNER: &str = "amazon";
pub const IMAGE_NAME_PATTERNS: [&str; 2] = ["al2023-ami-2023.*-x86_64", "amzn2-ami-hvm-*-x86_64-gp2"];

// EC2 error codes
pub const LAUNCH_TEMPLATE_ALREADY_EXISTS: &str = "InvalidLaunchTemplateName.AlreadyExistsException";
pub const LAUNCH_TEMPLATE_NOT_FOUND: &str = "InvalidLaunchTemplateId.NotFound";

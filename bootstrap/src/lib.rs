/*!

`asg-test-bootstrap` creates the cloud prerequisites for the auto-scaling-group end-to-end tests
and removes them again afterwards.

`bootstrap` discovers the default VPC and its subnets, picks a machine image and creates (or
adopts) a launch template. `cleanup` reverses that on a best-effort basis. Both talk to EC2
through the [`Ec2Api`] trait so they can be exercised without an AWS account.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use bootstrap::{newest_image, ResourceBootstrapper};
pub use cleanup::{CleanupReport, ResourceCleaner, StepOutcome};
pub use ec2::{CloudError, CloudResult, Ec2Api, LaunchTemplateRequest, MachineImage, Subnet};
pub use error::{Error, Error as BootstrapError, Result};

pub mod aws;
mod bootstrap;
mod cleanup;
pub mod constants;
mod ec2;
mod error;

/*!

`asg-test-scenario` drives `AutoScalingGroup` custom resources through create, update and delete
scenarios and checks the resulting auto scaling groups in the cloud.

Every synchronisation point goes through a bounded poller: the custom resource's
`ACK.ResourceSynced` condition on the Kubernetes side, and [`wait_for_absence`] on the cloud side.
The live scenarios are in `tests/auto_scaling_group.rs` and only build with the `integ` feature.

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

pub use autoscaling::{wait_for_absence, AutoScalingApi, AutoScalingGroupState};
pub use error::{Error, Result};
pub use runner::{
    check_expectation, Expectation, Fixture, Scenario, ScenarioRunner, ScenarioStep,
};
pub use test_settings::TestSettings;

pub mod autoscaling;
mod error;
pub mod runner;
mod test_settings;

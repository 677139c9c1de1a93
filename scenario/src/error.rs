use asg_test_bootstrap::CloudError;
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

/// A scenario failure. Poll timeouts surface here only once a caller has decided that the
/// exhausted budget fails the scenario.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to render manifest '{}': {}", name, source))]
    Render {
        name: String,
        source: asg_test_model::Error,
    },

    #[snafu(display("Unable to create {}: {}", what, source))]
    Create {
        what: String,
        source: asg_test_model::clients::Error,
    },

    #[snafu(display("{} was not consumed by the controller", what))]
    NotConsumed { what: String },

    #[snafu(display("{} does not exist", what))]
    Missing { what: String },

    #[snafu(display("Unable to patch {}: {}", what, source))]
    Patch {
        what: String,
        source: asg_test_model::clients::Error,
    },

    #[snafu(display("{} did not sync within {} attempts", what, attempts))]
    NotSynced { what: String, attempts: u32 },

    #[snafu(display("Unable to describe auto scaling group '{}': {}", name, source))]
    Describe { name: String, source: CloudError },

    #[snafu(display("Expected 1 auto scaling group named '{}', found {}", name, count))]
    GroupCount { name: String, count: usize },

    #[snafu(display("Auto scaling group '{}' {}", name, message))]
    Mismatch { name: String, message: String },

    #[snafu(display("Unable to delete {}: {}", what, source))]
    Delete {
        what: String,
        source: asg_test_model::clients::Error,
    },

    #[snafu(display("{} was not deleted within {} attempts", what, attempts))]
    NotDeleted { what: String, attempts: u32 },

    #[snafu(display(
        "Auto scaling group '{}' still exists after {} seconds",
        name,
        seconds
    ))]
    StillPresent { name: String, seconds: u64 },

    #[snafu(display("Unable to read test settings from the environment: {}", source))]
    Settings { source: envy::Error },
}

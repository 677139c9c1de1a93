/*!

This library provides the data model shared by the auto-scaling-group end-to-end harness: the
bootstrap resource descriptor, custom resource handles, manifest rendering, replacement values,
tag comparison rules, the bounded poller and the Kubernetes custom resource client.

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

pub use descriptor::ResourceDescriptor;
pub use error::{Error, Result};
pub use handle::ResourceHandle;
pub use manifest::{random_suffix_name, ManifestTemplate};
pub use poll::{ConditionExpectation, Poller};
pub use replacement::{
    get_replacement_values, resolve_replacement_values, ReplacementValues, ValueSource,
};
pub use tags::AsgTag;

pub mod clients;
pub mod constants;
mod descriptor;
mod error;
mod handle;
mod manifest;
pub mod poll;
mod replacement;
pub mod tags;

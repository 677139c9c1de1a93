use crate::constants::{
    AVAILABILITY_ZONE_1, DEFAULT_AVAILABILITY_ZONE, LATEST_LAUNCH_TEMPLATE_VERSION,
    LAUNCH_TEMPLATE_ID, LAUNCH_TEMPLATE_VERSION, VPC_ZONE_IDENTIFIER,
};
use crate::ResourceDescriptor;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// Where a set of replacement values came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueSource {
    /// Read from a bootstrap descriptor.
    Bootstrap,
    /// The descriptor could not be used; static defaults were substituted.
    Fallback,
}

/// The placeholder values used to render manifests, tagged with their origin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplacementValues {
    pub source: ValueSource,
    pub values: BTreeMap<String, String>,
}

impl ReplacementValues {
    pub fn from_descriptor(descriptor: &ResourceDescriptor) -> Self {
        Self {
            source: ValueSource::Bootstrap,
            values: values(
                descriptor.launch_template_id(),
                descriptor.availability_zone_1(),
                descriptor.vpc_zone_identifier(),
            ),
        }
    }

    pub fn fallback() -> Self {
        Self {
            source: ValueSource::Fallback,
            values: values("", DEFAULT_AVAILABILITY_ZONE, ""),
        }
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.values
    }
}

fn values(
    launch_template_id: &str,
    availability_zone: &str,
    vpc_zone_identifier: &str,
) -> BTreeMap<String, String> {
    [
        (LAUNCH_TEMPLATE_ID, launch_template_id),
        (LAUNCH_TEMPLATE_VERSION, LATEST_LAUNCH_TEMPLATE_VERSION),
        (AVAILABILITY_ZONE_1, availability_zone),
        (VPC_ZONE_IDENTIFIER, vpc_zone_identifier),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

/// Resolve replacement values from the descriptor in `bootstrap_dir`. This never fails: when the
/// descriptor cannot be read the cause is logged and fallback values are returned.
pub fn resolve_replacement_values<P: AsRef<Path>>(bootstrap_dir: P) -> ReplacementValues {
    match ResourceDescriptor::read_from(bootstrap_dir) {
        Ok(descriptor) => {
            debug!("using replacement values from bootstrap descriptor");
            ReplacementValues::from_descriptor(&descriptor)
        }
        Err(e) => {
            warn!("Using fallback replacement values: {}", e);
            ReplacementValues::fallback()
        }
    }
}

/// The replacement values from `bootstrap_dir`, or the fallback values.
pub fn get_replacement_values<P: AsRef<Path>>(bootstrap_dir: P) -> BTreeMap<String, String> {
    resolve_replacement_values(bootstrap_dir).into_map()
}

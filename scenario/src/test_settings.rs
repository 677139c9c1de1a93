use crate::error::{self, Result};
use asg_test_model::constants::DEFAULT_NAMESPACE;
use serde::Deserialize;
use snafu::ResultExt;
use std::path::PathBuf;

/// Environment variable prefix for all suite settings.
pub const SETTINGS_PREFIX: &str = "ASG_E2E_";

/// Test settings provide a way to send arguments into the scenarios using environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TestSettings {
    /// The directory holding the bootstrap descriptor.
    ///
    /// # Example
    ///
    /// ```text
    /// ASG_E2E_BOOTSTRAP_DIR=/tmp/asg-e2e
    /// ```
    #[serde(default = "bootstrap_dir")]
    pub bootstrap_dir: PathBuf,

    /// The directory holding the manifest templates. Defaults to this crate's `resources`.
    #[serde(default = "resource_dir")]
    pub resource_dir: PathBuf,

    #[serde(default = "namespace")]
    pub namespace: String,

    /// Overrides the default AWS region.
    #[serde(default)]
    pub region: Option<String>,
}

impl TestSettings {
    pub fn from_env() -> Result<Self> {
        envy::prefixed(SETTINGS_PREFIX)
            .from_env::<Self>()
            .context(error::SettingsSnafu)
    }
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            bootstrap_dir: bootstrap_dir(),
            resource_dir: resource_dir(),
            namespace: namespace(),
            region: None,
        }
    }
}

fn bootstrap_dir() -> PathBuf {
    PathBuf::from(".")
}

pub(crate) fn resource_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

fn namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

#[cfg(test)]
mod test {
    use super::TestSettings;
    use std::path::PathBuf;

    #[test]
    fn defaults() {
        let settings = envy::prefixed("ASG_E2E_UNSET_")
            .from_iter::<_, TestSettings>(Vec::<(String, String)>::new())
            .unwrap();
        assert_eq!(settings, TestSettings::default());
        assert!(settings.resource_dir.join("auto_scaling_group.yaml").is_file());
    }

    #[test]
    fn overrides() {
        let settings = envy::prefixed("ASG_E2E_")
            .from_iter::<_, TestSettings>(vec![
                ("ASG_E2E_BOOTSTRAP_DIR".to_string(), "/tmp/bootstrap".to_string()),
                ("ASG_E2E_NAMESPACE".to_string(), "ack-system".to_string()),
                ("ASG_E2E_REGION".to_string(), "eu-west-1".to_string()),
            ])
            .unwrap();
        assert_eq!(settings.bootstrap_dir, PathBuf::from("/tmp/bootstrap"));
        assert_eq!(settings.namespace, "ack-system");
        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
    }
}

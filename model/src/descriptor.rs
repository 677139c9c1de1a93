use crate::constants::BOOTSTRAP_FILE_NAME;
use crate::error::{self, Result};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};

/// The cloud prerequisites created by bootstrapping. A descriptor is written once per test run
/// and read back by the replacement value provider and the cleaner, so its fields are only
/// reachable through accessors.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(rename = "LaunchTemplateID")]
    launch_template_id: String,
    #[serde(rename = "LaunchTemplateName")]
    launch_template_name: String,
    #[serde(rename = "AvailabilityZone1")]
    availability_zone_1: String,
    /// Comma-joined subnet ids.
    #[serde(rename = "VPCZoneIdentifier")]
    vpc_zone_identifier: String,
}

impl ResourceDescriptor {
    pub fn new<S1, S2, S3, I, S4>(
        launch_template_id: S1,
        launch_template_name: S2,
        availability_zone_1: S3,
        subnet_ids: I,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        I: IntoIterator<Item = S4>,
        S4: AsRef<str>,
    {
        Self {
            launch_template_id: launch_template_id.into(),
            launch_template_name: launch_template_name.into(),
            availability_zone_1: availability_zone_1.into(),
            vpc_zone_identifier: subnet_ids
                .into_iter()
                .map(|id| id.as_ref().to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    pub fn launch_template_id(&self) -> &str {
        &self.launch_template_id
    }

    pub fn launch_template_name(&self) -> &str {
        &self.launch_template_name
    }

    pub fn availability_zone_1(&self) -> &str {
        &self.availability_zone_1
    }

    pub fn vpc_zone_identifier(&self) -> &str {
        &self.vpc_zone_identifier
    }

    /// The individual subnet ids held in `vpc_zone_identifier`.
    pub fn subnet_ids(&self) -> impl Iterator<Item = &str> {
        self.vpc_zone_identifier
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// The location of the descriptor record inside `bootstrap_dir`.
    pub fn path_in<P: AsRef<Path>>(bootstrap_dir: P) -> PathBuf {
        bootstrap_dir.as_ref().join(BOOTSTRAP_FILE_NAME)
    }

    /// Serialize the descriptor into `bootstrap_dir`, creating the directory if needed.
    pub fn write_to<P: AsRef<Path>>(&self, bootstrap_dir: P) -> Result<PathBuf> {
        let bootstrap_dir = bootstrap_dir.as_ref();
        let path = Self::path_in(bootstrap_dir);
        fs::create_dir_all(bootstrap_dir).context(error::DescriptorWriteSnafu {
            path: bootstrap_dir,
        })?;
        let yaml = serde_yaml::to_string(self).context(error::DescriptorSerializeSnafu)?;
        fs::write(&path, yaml).context(error::DescriptorWriteSnafu { path: &path })?;
        Ok(path)
    }

    /// Deserialize the descriptor previously written into `bootstrap_dir`.
    pub fn read_from<P: AsRef<Path>>(bootstrap_dir: P) -> Result<Self> {
        let path = Self::path_in(bootstrap_dir);
        let yaml = fs::read_to_string(&path).context(error::DescriptorReadSnafu { path: &path })?;
        Ok(serde_yaml::from_str(&yaml).context(error::DescriptorParseSnafu { path })?)
    }

    /// Remove the descriptor record from `bootstrap_dir`.
    pub fn remove_from<P: AsRef<Path>>(bootstrap_dir: P) -> Result<()> {
        let path = Self::path_in(bootstrap_dir);
        fs::remove_file(&path).context(error::DescriptorWriteSnafu { path })?;
        Ok(())
    }
}

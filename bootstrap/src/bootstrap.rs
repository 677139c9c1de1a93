use crate::constants::{
    IMAGE_NAME_PATTERNS, IMAGE_OWNER, INSTANCE_NAME_TAG, LAUNCH_TEMPLATE_ALREADY_EXISTS,
    LAUNCH_TEMPLATE_NAME,
};
use crate::error::{self, Result};
use crate::{Ec2Api, LaunchTemplateRequest, MachineImage, Subnet};
use asg_test_model::constants::DEFAULT_AVAILABILITY_ZONE;
use asg_test_model::ResourceDescriptor;
use log::{debug, info, warn};
use snafu::{ensure, OptionExt, ResultExt};
use std::path::{Path, PathBuf};

/// Creates the cloud prerequisites for the auto-scaling-group tests: the default VPC's subnets,
/// a recent machine image and a launch template that uses it.
///
/// Bootstrapping is idempotent with respect to the launch template. If a template with the same
/// name already exists it is adopted rather than treated as a failure.
pub struct ResourceBootstrapper<E> {
    ec2: E,
    launch_template_name: String,
}

impl<E: Ec2Api> ResourceBootstrapper<E> {
    pub fn new(ec2: E) -> Self {
        Self {
            ec2,
            launch_template_name: LAUNCH_TEMPLATE_NAME.to_string(),
        }
    }

    pub fn with_launch_template_name<S: Into<String>>(mut self, name: S) -> Self {
        self.launch_template_name = name.into();
        self
    }

    /// Discover or create every prerequisite and return the descriptor that records them.
    pub async fn bootstrap(&self) -> Result<ResourceDescriptor> {
        let vpc_id = self.default_vpc_id().await?;
        info!("Using default VPC '{}'", vpc_id);

        let subnets = self.subnets(&vpc_id).await?;
        let availability_zone = subnets
            .first()
            .and_then(|subnet| subnet.availability_zone.clone())
            .unwrap_or_else(|| DEFAULT_AVAILABILITY_ZONE.to_string());
        debug!(
            "Found {} subnets, first availability zone is '{}'",
            subnets.len(),
            availability_zone
        );

        let image_id = self.latest_image_id().await?;
        info!("Using image '{}'", image_id);

        let launch_template_id = self.create_or_adopt_launch_template(&image_id).await?;
        info!(
            "Using launch template '{}' ({})",
            self.launch_template_name, launch_template_id
        );

        Ok(ResourceDescriptor::new(
            launch_template_id,
            self.launch_template_name.as_str(),
            availability_zone,
            subnets.iter().map(|subnet| subnet.subnet_id.as_str()),
        ))
    }

    /// Bootstrap and persist the descriptor to `bootstrap_dir`. Returns the descriptor's path.
    pub async fn bootstrap_to<P: AsRef<Path>>(&self, bootstrap_dir: P) -> Result<PathBuf> {
        let descriptor = self.bootstrap().await?;
        let path = descriptor
            .write_to(bootstrap_dir)
            .context(error::PersistSnafu)?;
        info!("Wrote resource descriptor to '{}'", path.display());
        Ok(path)
    }

    async fn default_vpc_id(&self) -> Result<String> {
        self.ec2
            .default_vpc_ids()
            .await
            .context(error::DescribeVpcsSnafu)?
            .into_iter()
            .next()
            .context(error::NoDefaultVpcSnafu)
    }

    async fn subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>> {
        let subnets = self
            .ec2
            .subnets(vpc_id)
            .await
            .context(error::DescribeSubnetsSnafu { vpc_id })?;
        ensure!(!subnets.is_empty(), error::NoSubnetsSnafu { vpc_id });
        Ok(subnets)
    }

    /// The newest image for the first name pattern that matches anything.
    async fn latest_image_id(&self) -> Result<String> {
        for pattern in IMAGE_NAME_PATTERNS {
            let images = self
                .ec2
                .images(IMAGE_OWNER, pattern)
                .await
                .context(error::DescribeImagesSnafu { pattern })?;
            match newest_image(&images) {
                Some(image) => return Ok(image.image_id.clone()),
                None => warn!("No images match '{}'", pattern),
            }
        }
        error::NoImageSnafu {
            patterns: IMAGE_NAME_PATTERNS
                .iter()
                .map(|pattern| pattern.to_string())
                .collect::<Vec<_>>(),
        }
        .fail()
    }

    async fn create_or_adopt_launch_template(&self, image_id: &str) -> Result<String> {
        let name = self.launch_template_name.as_str();
        let request = LaunchTemplateRequest::new(name, image_id, INSTANCE_NAME_TAG);
        match self.ec2.create_template(&request).await {
            Ok(id) => {
                info!("Created launch template '{}'", name);
                Ok(id)
            }
            Err(e) if e.has_code(LAUNCH_TEMPLATE_ALREADY_EXISTS) => {
                info!("Launch template '{}' already exists, adopting it", name);
                self.ec2
                    .template_id(name)
                    .await
                    .context(error::AdoptLaunchTemplateSnafu { name })?
                    .context(error::LaunchTemplateMissingSnafu { name })
            }
            Err(e) => Err(e).context(error::CreateLaunchTemplateSnafu { name }),
        }
    }
}

/// The image with the latest creation date. Images without a creation date lose to any image
/// that has one.
pub fn newest_image(images: &[MachineImage]) -> Option<&MachineImage> {
    // ISO-8601 timestamps order correctly as strings and `None` orders before `Some`.
    images
        .iter()
        .max_by(|a, b| a.creation_date.cmp(&b.creation_date))
}

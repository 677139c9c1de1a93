use crate::constants::{INSTANCE_TYPE, MANAGED_BY_TAG, MANAGED_BY_VALUE};
use async_trait::async_trait;
use aws_sdk_ec2::model::{
    Filter, InstanceType, LaunchTemplateTagSpecificationRequest, RequestLaunchTemplateData,
    ResourceType, Tag, TagSpecification,
};
use aws_sdk_ec2::types::SdkError;
use aws_smithy_types::retry::ProvideErrorKind;
use std::fmt::{self, Display, Formatter};

pub type CloudResult<T> = std::result::Result<T, CloudError>;

/// A failed EC2 call, reduced to the parts the bootstrapper and cleaner act on.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CloudError {
    operation: String,
    code: Option<String>,
    message: String,
}

impl CloudError {
    pub fn new<S1, S2>(operation: S1, code: Option<&str>, message: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            operation: operation.into(),
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Wrap an SDK error, keeping the service error code when there is one.
    pub fn from_sdk<E, R>(operation: &str, error: SdkError<E, R>) -> Self
    where
        E: ProvideErrorKind + std::error::Error + 'static,
        R: fmt::Debug,
    {
        let code = match &error {
            SdkError::ServiceError(context) => context.err().code().map(str::to_string),
            _ => None,
        };
        Self {
            operation: operation.to_string(),
            code,
            message: format!("{}", error),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The service error code, e.g. `InvalidLaunchTemplateId.NotFound`.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code() == Some(code)
    }
}

impl Display for CloudError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} failed ({}): {}", self.operation, code, self.message),
            None => write!(f, "{} failed: {}", self.operation, self.message),
        }
    }
}

impl std::error::Error for CloudError {}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Subnet {
    pub subnet_id: String,
    pub availability_zone: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MachineImage {
    pub image_id: String,
    /// ISO-8601 timestamp as reported by EC2.
    pub creation_date: Option<String>,
}

/// Everything needed to create the test launch template.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LaunchTemplateRequest {
    pub name: String,
    pub image_id: String,
    pub instance_type: String,
    /// Tags applied to instances launched from the template.
    pub instance_tags: Vec<(String, String)>,
    /// Tags applied to the template itself.
    pub template_tags: Vec<(String, String)>,
}

impl LaunchTemplateRequest {
    pub fn new<S1, S2>(name: S1, image_id: S2, instance_name: &str) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let name = name.into();
        Self {
            template_tags: vec![
                ("Name".to_string(), name.clone()),
                (MANAGED_BY_TAG.to_string(), MANAGED_BY_VALUE.to_string()),
            ],
            instance_tags: vec![
                ("Name".to_string(), instance_name.to_string()),
                (MANAGED_BY_TAG.to_string(), MANAGED_BY_VALUE.to_string()),
            ],
            name,
            image_id: image_id.into(),
            instance_type: INSTANCE_TYPE.to_string(),
        }
    }
}

/// The EC2 calls needed to bootstrap and clean up the test prerequisites.
#[async_trait]
pub trait Ec2Api: Send + Sync {
    /// Ids of the VPCs marked as the account default.
    async fn default_vpc_ids(&self) -> CloudResult<Vec<String>>;

    async fn subnets(&self, vpc_id: &str) -> CloudResult<Vec<Subnet>>;

    /// Available images owned by `owner` whose name matches `name_pattern`.
    async fn images(&self, owner: &str, name_pattern: &str) -> CloudResult<Vec<MachineImage>>;

    /// Create a launch template and return its id.
    async fn create_template(&self, request: &LaunchTemplateRequest) -> CloudResult<String>;

    /// The id of the launch template called `name`, if there is one.
    async fn template_id(&self, name: &str) -> CloudResult<Option<String>>;

    async fn delete_template(&self, launch_template_id: &str) -> CloudResult<()>;
}

#[async_trait]
impl<'a, T: Ec2Api + ?Sized> Ec2Api for &'a T {
    async fn default_vpc_ids(&self) -> CloudResult<Vec<String>> {
        (**self).default_vpc_ids().await
    }

    async fn subnets(&self, vpc_id: &str) -> CloudResult<Vec<Subnet>> {
        (**self).subnets(vpc_id).await
    }

    async fn images(&self, owner: &str, name_pattern: &str) -> CloudResult<Vec<MachineImage>> {
        (**self).images(owner, name_pattern).await
    }

    async fn create_template(&self, request: &LaunchTemplateRequest) -> CloudResult<String> {
        (**self).create_template(request).await
    }

    async fn template_id(&self, name: &str) -> CloudResult<Option<String>> {
        (**self).template_id(name).await
    }

    async fn delete_template(&self, launch_template_id: &str) -> CloudResult<()> {
        (**self).delete_template(launch_template_id).await
    }
}

fn tags(tags: &[(String, String)]) -> Vec<Tag> {
    tags.iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build())
        .collect()
}

#[async_trait]
impl Ec2Api for aws_sdk_ec2::Client {
    async fn default_vpc_ids(&self) -> CloudResult<Vec<String>> {
        let output = self
            .describe_vpcs()
            .filters(Filter::builder().name("isDefault").values("true").build())
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DescribeVpcs", e))?;
        Ok(output
            .vpcs()
            .unwrap_or_default()
            .iter()
            .filter_map(|vpc| vpc.vpc_id().map(str::to_string))
            .collect())
    }

    async fn subnets(&self, vpc_id: &str) -> CloudResult<Vec<Subnet>> {
        let output = self
            .describe_subnets()
            .filters(Filter::builder().name("vpc-id").values(vpc_id).build())
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DescribeSubnets", e))?;
        Ok(output
            .subnets()
            .unwrap_or_default()
            .iter()
            .filter_map(|subnet| {
                subnet.subnet_id().map(|subnet_id| Subnet {
                    subnet_id: subnet_id.to_string(),
                    availability_zone: subnet.availability_zone().map(str::to_string),
                })
            })
            .collect())
    }

    async fn images(&self, owner: &str, name_pattern: &str) -> CloudResult<Vec<MachineImage>> {
        let output = self
            .describe_images()
            .owners(owner)
            .filters(Filter::builder().name("name").values(name_pattern).build())
            .filters(Filter::builder().name("state").values("available").build())
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DescribeImages", e))?;
        Ok(output
            .images()
            .unwrap_or_default()
            .iter()
            .filter_map(|image| {
                image.image_id().map(|image_id| MachineImage {
                    image_id: image_id.to_string(),
                    creation_date: image.creation_date().map(str::to_string),
                })
            })
            .collect())
    }

    async fn create_template(&self, request: &LaunchTemplateRequest) -> CloudResult<String> {
        let data = RequestLaunchTemplateData::builder()
            .image_id(&request.image_id)
            .instance_type(InstanceType::from(request.instance_type.as_str()))
            .tag_specifications(
                LaunchTemplateTagSpecificationRequest::builder()
                    .resource_type(ResourceType::Instance)
                    .set_tags(Some(tags(&request.instance_tags)))
                    .build(),
            )
            .build();
        let output = self
            .create_launch_template()
            .launch_template_name(&request.name)
            .launch_template_data(data)
            .tag_specifications(
                TagSpecification::builder()
                    .resource_type(ResourceType::LaunchTemplate)
                    .set_tags(Some(tags(&request.template_tags)))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("CreateLaunchTemplate", e))?;
        output
            .launch_template()
            .and_then(|template| template.launch_template_id())
            .map(str::to_string)
            .ok_or_else(|| {
                CloudError::new(
                    "CreateLaunchTemplate",
                    None,
                    "the response did not include a launch template id",
                )
            })
    }

    async fn template_id(&self, name: &str) -> CloudResult<Option<String>> {
        let output = self
            .describe_launch_templates()
            .launch_template_names(name)
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DescribeLaunchTemplates", e))?;
        Ok(output
            .launch_templates()
            .unwrap_or_default()
            .iter()
            .find_map(|template| template.launch_template_id().map(str::to_string)))
    }

    async fn delete_template(&self, launch_template_id: &str) -> CloudResult<()> {
        self.delete_launch_template()
            .launch_template_id(launch_template_id)
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DeleteLaunchTemplate", e))?;
        Ok(())
    }
}

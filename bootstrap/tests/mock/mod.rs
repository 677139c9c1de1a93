use asg_test_bootstrap::{
    CloudError, CloudResult, Ec2Api, LaunchTemplateRequest, MachineImage, Subnet,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory EC2 account.
#[derive(Default)]
pub(crate) struct FakeEc2 {
    pub(crate) default_vpcs: Vec<String>,
    pub(crate) subnets: Vec<Subnet>,
    /// Images keyed by the name pattern that finds them.
    pub(crate) images: HashMap<String, Vec<MachineImage>>,
    /// When set, every call to this operation fails with this error.
    pub(crate) failing_operation: Option<CloudError>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    templates: HashMap<String, String>,
    requests: Vec<LaunchTemplateRequest>,
    deletes: Vec<String>,
    next_id: u32,
}

impl FakeEc2 {
    pub(crate) fn with_default_vpc() -> Self {
        Self {
            default_vpcs: vec!["vpc-1".to_string()],
            subnets: vec![
                subnet("subnet-a", Some("us-west-2b")),
                subnet("subnet-b", Some("us-west-2c")),
            ],
            ..Self::default()
        }
    }

    pub(crate) fn with_images(mut self, pattern: &str, images: Vec<MachineImage>) -> Self {
        self.images.insert(pattern.to_string(), images);
        self
    }

    pub(crate) fn failing(mut self, error: CloudError) -> Self {
        self.failing_operation = Some(error);
        self
    }

    pub(crate) fn requests(&self) -> Vec<LaunchTemplateRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn deletes(&self) -> Vec<String> {
        self.state.lock().unwrap().deletes.clone()
    }

    pub(crate) fn template_count(&self) -> usize {
        self.state.lock().unwrap().templates.len()
    }

    fn fail_if_configured(&self, operation: &str) -> CloudResult<()> {
        match &self.failing_operation {
            Some(e) if e.operation() == operation => Err(e.clone()),
            _ => Ok(()),
        }
    }
}

pub(crate) fn subnet(id: &str, zone: Option<&str>) -> Subnet {
    Subnet {
        subnet_id: id.to_string(),
        availability_zone: zone.map(str::to_string),
    }
}

pub(crate) fn image(id: &str, date: Option<&str>) -> MachineImage {
    MachineImage {
        image_id: id.to_string(),
        creation_date: date.map(str::to_string),
    }
}

#[async_trait::async_trait]
impl Ec2Api for FakeEc2 {
    async fn default_vpc_ids(&self) -> CloudResult<Vec<String>> {
        self.fail_if_configured("DescribeVpcs")?;
        Ok(self.default_vpcs.clone())
    }

    async fn subnets(&self, vpc_id: &str) -> CloudResult<Vec<Subnet>> {
        self.fail_if_configured("DescribeSubnets")?;
        if self.default_vpcs.iter().any(|vpc| vpc == vpc_id) {
            Ok(self.subnets.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn images(&self, owner: &str, name_pattern: &str) -> CloudResult<Vec<MachineImage>> {
        self.fail_if_configured("DescribeImages")?;
        assert_eq!(owner, "amazon");
        Ok(self.images.get(name_pattern).cloned().unwrap_or_default())
    }

    async fn create_template(&self, request: &LaunchTemplateRequest) -> CloudResult<String> {
        self.fail_if_configured("CreateLaunchTemplate")?;
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if state.templates.contains_key(&request.name) {
            return Err(CloudError::new(
                "CreateLaunchTemplate",
                Some("InvalidLaunchTemplateName.AlreadyExistsException"),
                "Launch template name already in use.",
            ));
        }
        state.next_id += 1;
        let id = format!("lt-{:04}", state.next_id);
        state.templates.insert(request.name.clone(), id.clone());
        Ok(id)
    }

    async fn template_id(&self, name: &str) -> CloudResult<Option<String>> {
        self.fail_if_configured("DescribeLaunchTemplates")?;
        Ok(self.state.lock().unwrap().templates.get(name).cloned())
    }

    async fn delete_template(&self, launch_template_id: &str) -> CloudResult<()> {
        self.fail_if_configured("DeleteLaunchTemplate")?;
        let mut state = self.state.lock().unwrap();
        state.deletes.push(launch_template_id.to_string());
        let name = state
            .templates
            .iter()
            .find(|(_, id)| id.as_str() == launch_template_id)
            .map(|(name, _)| name.clone());
        match name {
            Some(name) => {
                state.templates.remove(&name);
                Ok(())
            }
            None => Err(CloudError::new(
                "DeleteLaunchTemplate",
                Some("InvalidLaunchTemplateId.NotFound"),
                format!("The specified launch template, with template ID {}, does not exist.", launch_template_id),
            )),
        }
    }
}

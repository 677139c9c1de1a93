use crate::autoscaling::{wait_for_absence, AutoScalingApi, AutoScalingGroupState};
use crate::error::{self, Result};
use crate::test_settings::{resource_dir, TestSettings};
use asg_test_model::clients::ResourceClient;
use asg_test_model::constants::{ASG_NAME, DEFAULT_NAMESPACE};
use asg_test_model::tags::{equal_without_system_tags, find, missing_system_tags};
use asg_test_model::{
    get_replacement_values, random_suffix_name, ConditionExpectation, ManifestTemplate, Poller,
    ResourceHandle,
};
use log::{debug, info, warn};
use serde_json::{json, Value};
use snafu::{ensure, OptionExt, ResultExt};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The manifest template every scenario starts from.
pub const ASG_TEMPLATE: &str = "auto_scaling_group";
/// Generated resource names never exceed this length.
pub const MAX_NAME_LENGTH: usize = 32;
/// How long to let the controller notice a patch before polling for convergence.
pub const SETTLE_TIME: Duration = Duration::from_secs(5);

pub const SYNC_ATTEMPTS: u32 = 3;
pub const TAG_SYNC_ATTEMPTS: u32 = 10;
pub const INITIAL_TAG_SYNC_ATTEMPTS: u32 = 30;
/// Cloud-side deletion of a scaling group can take many minutes.
pub const ABSENCE_ATTEMPTS: u32 = 120;

/// A custom resource created for one scenario, as first seen once the controller owned it.
#[derive(Debug, Clone)]
pub struct Fixture {
    handle: ResourceHandle,
    resource: Value,
}

impl Fixture {
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    pub fn resource(&self) -> &Value {
        &self.resource
    }

    /// The cloud-side name, `spec.autoScalingGroupName`, falling back to the resource name.
    pub fn asg_name(&self) -> &str {
        self.resource
            .get("spec")
            .and_then(|spec| spec.get("autoScalingGroupName"))
            .and_then(Value::as_str)
            .unwrap_or_else(|| self.handle.name())
    }
}

/// What the live auto scaling group must look like after a step has converged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// The group exists and its sizes match the custom resource's spec. A spec without
    /// `desiredCapacity` expects the group's desired capacity to equal `minSize`.
    Exists,
    DesiredCapacity(i32),
    MinMax { min: i32, max: i32 },
    /// The required system tags are present and the user tags equal these exactly.
    Tags(BTreeMap<String, String>),
    Tag {
        key: String,
        value: String,
        propagate_at_launch: bool,
    },
}

/// One mutate-then-wait-then-assert step. A step without a patch only waits and asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioStep {
    pub description: String,
    pub patch: Option<Value>,
    pub sync_attempts: u32,
    pub expectation: Expectation,
}

impl ScenarioStep {
    pub fn observe<S: Into<String>>(
        description: S,
        sync_attempts: u32,
        expectation: Expectation,
    ) -> Self {
        Self {
            description: description.into(),
            patch: None,
            sync_attempts,
            expectation,
        }
    }

    pub fn patch<S: Into<String>>(
        description: S,
        patch: Value,
        sync_attempts: u32,
        expectation: Expectation,
    ) -> Self {
        Self {
            description: description.into(),
            patch: Some(patch),
            sync_attempts,
            expectation,
        }
    }
}

/// The auto scaling group scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    CreateDelete,
    UpdateCapacity,
    UpdateMinMaxSize,
    CreateDeleteTags,
    /// Deletes the custom resource and confirms the cloud-side group goes away.
    Delete,
}

impl Scenario {
    pub fn all() -> [Scenario; 5] {
        [
            Scenario::CreateDelete,
            Scenario::UpdateCapacity,
            Scenario::UpdateMinMaxSize,
            Scenario::CreateDeleteTags,
            Scenario::Delete,
        ]
    }

    pub fn name_prefix(&self) -> &'static str {
        match self {
            Scenario::Delete => "ack-test-asg-del",
            _ => "ack-test-asg",
        }
    }

    /// Whether the scenario ends with a confirmed deletion rather than a best-effort teardown.
    pub fn confirms_deletion(&self) -> bool {
        matches!(self, Scenario::Delete)
    }

    pub fn steps(&self) -> Vec<ScenarioStep> {
        let initial_sync =
            ScenarioStep::observe("initial sync", SYNC_ATTEMPTS, Expectation::Exists);
        match self {
            Scenario::CreateDelete | Scenario::Delete => vec![initial_sync],
            Scenario::UpdateCapacity => vec![
                initial_sync,
                ScenarioStep::patch(
                    "update desired capacity",
                    json!({ "spec": { "desiredCapacity": 2 } }),
                    SYNC_ATTEMPTS,
                    Expectation::DesiredCapacity(2),
                ),
            ],
            Scenario::UpdateMinMaxSize => vec![
                initial_sync,
                ScenarioStep::patch(
                    "update min and max size",
                    json!({ "spec": { "minSize": 1, "maxSize": 5 } }),
                    SYNC_ATTEMPTS,
                    Expectation::MinMax { min: 1, max: 5 },
                ),
            ],
            Scenario::CreateDeleteTags => vec![
                initial_sync,
                ScenarioStep::observe(
                    "settle before tagging",
                    INITIAL_TAG_SYNC_ATTEMPTS,
                    Expectation::Exists,
                ),
                ScenarioStep::patch(
                    "add tag",
                    tags_patch("new-tag-value-1", true),
                    TAG_SYNC_ATTEMPTS,
                    Expectation::Tags(tag_map("new-tag-value-1")),
                ),
                ScenarioStep::patch(
                    "update tag value",
                    tags_patch("new-tag-value-2", true),
                    TAG_SYNC_ATTEMPTS,
                    Expectation::Tags(tag_map("new-tag-value-2")),
                ),
                ScenarioStep::patch(
                    "update propagateAtLaunch",
                    tags_patch("new-tag-value-2", false),
                    TAG_SYNC_ATTEMPTS,
                    Expectation::Tag {
                        key: "new-tag-key".to_string(),
                        value: "new-tag-value-2".to_string(),
                        propagate_at_launch: false,
                    },
                ),
                ScenarioStep::patch(
                    "delete all tags",
                    json!({ "spec": { "tags": [] } }),
                    TAG_SYNC_ATTEMPTS,
                    Expectation::Tags(BTreeMap::new()),
                ),
            ],
        }
    }
}

fn tags_patch(value: &str, propagate_at_launch: bool) -> Value {
    json!({
        "spec": {
            "tags": [
                { "key": "new-tag-key", "value": value, "propagateAtLaunch": propagate_at_launch }
            ]
        }
    })
}

fn tag_map(value: &str) -> BTreeMap<String, String> {
    [("new-tag-key".to_string(), value.to_string())]
        .into_iter()
        .collect()
}

/// Check `group` against `expectation`. `resource` is the custom resource as last read; its spec
/// supplies the sizes for [`Expectation::Exists`]. The error describes the first mismatch.
pub fn check_expectation(
    expectation: &Expectation,
    group: &AutoScalingGroupState,
    resource: &Value,
) -> std::result::Result<(), String> {
    let spec = resource.get("spec").cloned().unwrap_or(Value::Null);
    let spec_int = |field: &str| spec.get(field).and_then(Value::as_i64);
    match expectation {
        Expectation::Exists => {
            if let Some(name) = spec.get("autoScalingGroupName").and_then(Value::as_str) {
                mismatch("name", name, group.name.as_str())?;
            }
            let min = spec_int("minSize");
            let max = spec_int("maxSize");
            let desired = spec_int("desiredCapacity").or(min);
            for (what, expected, actual) in [
                ("min size", min, group.min_size),
                ("max size", max, group.max_size),
                ("desired capacity", desired, group.desired_capacity),
            ] {
                match expected {
                    Some(expected) => mismatch(what, expected, i64::from(actual))?,
                    None => return Err(format!("has no {} in the custom resource spec", what)),
                }
            }
            Ok(())
        }
        Expectation::DesiredCapacity(desired) => {
            mismatch("desired capacity", desired, &group.desired_capacity)
        }
        Expectation::MinMax { min, max } => {
            mismatch("min size", min, &group.min_size)?;
            mismatch("max size", max, &group.max_size)
        }
        Expectation::Tags(expected) => {
            let missing = missing_system_tags(&group.tags);
            if !missing.is_empty() {
                return Err(format!("is missing system tags {:?}", missing));
            }
            if !equal_without_system_tags(expected, &group.tags) {
                return Err(format!(
                    "has tags {:?}, expected {:?} besides system tags",
                    group.tags, expected
                ));
            }
            Ok(())
        }
        Expectation::Tag {
            key,
            value,
            propagate_at_launch,
        } => {
            let tag = find(&group.tags, key).ok_or_else(|| format!("has no tag '{}'", key))?;
            mismatch("tag value", value, &tag.value)?;
            mismatch("propagateAtLaunch", propagate_at_launch, &tag.propagate_at_launch)
        }
    }
}

fn mismatch<T>(what: &str, expected: T, actual: T) -> std::result::Result<(), String>
where
    T: PartialEq + std::fmt::Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(format!("has {} {:?}, expected {:?}", what, actual, expected))
    }
}

/// Drives auto scaling group custom resources through the scenarios and checks the live cloud
/// state after every convergence point.
pub struct ScenarioRunner<R, A> {
    resources: R,
    autoscaling: A,
    replacements: BTreeMap<String, String>,
    resource_dir: PathBuf,
    namespace: String,
    settle_time: Duration,
    consumed_poller: Poller,
    delete_poller: Poller,
    absence_poller: Poller,
}

impl<R, A> ScenarioRunner<R, A>
where
    R: ResourceClient,
    A: AutoScalingApi,
{
    pub fn new(resources: R, autoscaling: A, replacements: BTreeMap<String, String>) -> Self {
        Self {
            resources,
            autoscaling,
            replacements,
            resource_dir: resource_dir(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            settle_time: SETTLE_TIME,
            consumed_poller: Poller::new(15, Duration::from_secs(2)),
            delete_poller: Poller::sync(3),
            absence_poller: Poller::sync(ABSENCE_ATTEMPTS),
        }
    }

    /// A runner whose replacement values come from the bootstrap directory in `settings`.
    pub fn from_settings(resources: R, autoscaling: A, settings: &TestSettings) -> Self {
        Self::new(
            resources,
            autoscaling,
            get_replacement_values(&settings.bootstrap_dir),
        )
        .with_resource_dir(&settings.resource_dir)
        .with_namespace(&settings.namespace)
    }

    pub fn with_resource_dir<P: AsRef<Path>>(mut self, resource_dir: P) -> Self {
        self.resource_dir = resource_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_settle_time(mut self, settle_time: Duration) -> Self {
        self.settle_time = settle_time;
        self
    }

    pub fn with_absence_poller(mut self, poller: Poller) -> Self {
        self.absence_poller = poller;
        self
    }

    /// Run `scenario` from fixture creation to teardown.
    pub async fn run(&self, scenario: Scenario) -> Result<()> {
        info!("Running scenario {:?}", scenario);
        let fixture = self.create_fixture(scenario.name_prefix()).await?;
        for step in scenario.steps() {
            if let Err(e) = self.run_step(&fixture, &step).await {
                self.teardown(&fixture).await;
                return Err(e);
            }
        }
        if scenario.confirms_deletion() {
            self.delete_and_confirm(&fixture).await
        } else {
            self.teardown(&fixture).await;
            Ok(())
        }
    }

    /// Render the auto scaling group manifest under a fresh name, create it and wait for the
    /// controller to take ownership.
    pub async fn create_fixture(&self, prefix: &str) -> Result<Fixture> {
        let name = random_suffix_name(prefix, MAX_NAME_LENGTH);
        let handle = ResourceHandle::auto_scaling_group(name.as_str()).in_namespace(&self.namespace);
        let body = ManifestTemplate::new(ASG_TEMPLATE)
            .with_replacements(self.replacements.clone())
            .with_replacement(ASG_NAME, name.as_str())
            .render(&self.resource_dir)
            .context(error::RenderSnafu { name: ASG_TEMPLATE })?;
        debug!("Rendered {}: {}", handle, body);

        self.resources
            .create(&handle, body)
            .await
            .context(error::CreateSnafu {
                what: handle.to_string(),
            })?;
        let mut fixture = Fixture {
            handle,
            resource: Value::Null,
        };
        match self.wait_owned(&fixture.handle).await {
            Ok(resource) => {
                info!("Created {}", fixture.handle);
                fixture.resource = resource;
                Ok(fixture)
            }
            Err(e) => {
                self.teardown(&fixture).await;
                Err(e)
            }
        }
    }

    async fn wait_owned(&self, handle: &ResourceHandle) -> Result<Value> {
        let resource = self
            .resources
            .wait_resource_consumed_by_controller(handle, self.consumed_poller)
            .await
            .context(error::NotConsumedSnafu {
                what: handle.to_string(),
            })?;
        ensure!(
            self.resources.get_resource_exists(handle).await,
            error::MissingSnafu {
                what: handle.to_string()
            }
        );
        Ok(resource)
    }

    /// Apply the step's patch, wait for the controller to sync and check the live group.
    pub async fn run_step(
        &self,
        fixture: &Fixture,
        step: &ScenarioStep,
    ) -> Result<AutoScalingGroupState> {
        let handle = fixture.handle();
        info!("{}: {}", handle, step.description);
        if let Some(patch) = &step.patch {
            self.resources
                .patch(handle, patch.clone())
                .await
                .context(error::PatchSnafu {
                    what: handle.to_string(),
                })?;
            tokio::time::sleep(self.settle_time).await;
        }

        let synced = self
            .resources
            .wait_on_condition(handle, &ConditionExpectation::synced(step.sync_attempts))
            .await;
        ensure!(
            synced,
            error::NotSyncedSnafu {
                what: handle.to_string(),
                attempts: step.sync_attempts,
            }
        );

        let resource = self
            .resources
            .get_resource(handle)
            .await
            .context(error::MissingSnafu {
                what: handle.to_string(),
            })?;
        let group = self.describe(fixture.asg_name()).await?;
        if let Err(message) = check_expectation(&step.expectation, &group, &resource) {
            return error::MismatchSnafu {
                name: group.name,
                message,
            }
            .fail();
        }
        Ok(group)
    }

    /// The live state of the single group called `name`.
    pub async fn describe(&self, name: &str) -> Result<AutoScalingGroupState> {
        let mut groups = self
            .autoscaling
            .describe_groups(name)
            .await
            .context(error::DescribeSnafu { name })?;
        ensure!(
            groups.len() == 1,
            error::GroupCountSnafu {
                name,
                count: groups.len()
            }
        );
        groups.pop().context(error::GroupCountSnafu { name, count: 0usize })
    }

    /// Best-effort removal of the fixture. Failures are logged and otherwise ignored.
    pub async fn teardown(&self, fixture: &Fixture) {
        let handle = fixture.handle();
        match self
            .resources
            .delete_custom_resource(handle, self.delete_poller)
            .await
        {
            Ok(true) => info!("Tore down {}", handle),
            Ok(false) => warn!("{} was not deleted during teardown", handle),
            Err(e) => warn!("Unable to tear down {}: {}", handle, e),
        }
    }

    /// Delete the fixture and wait until the cloud no longer lists its group.
    pub async fn delete_and_confirm(&self, fixture: &Fixture) -> Result<()> {
        let handle = fixture.handle();
        let deleted = self
            .resources
            .delete_custom_resource(handle, self.delete_poller)
            .await
            .context(error::DeleteSnafu {
                what: handle.to_string(),
            })?;
        ensure!(
            deleted,
            error::NotDeletedSnafu {
                what: handle.to_string(),
                attempts: self.delete_poller.max_attempts(),
            }
        );

        let name = fixture.asg_name();
        let autoscaling = &self.autoscaling;
        let absent = wait_for_absence(
            move || async move {
                autoscaling.describe_groups(name).await.map(|groups| {
                    groups
                        .into_iter()
                        .map(|group| group.name)
                        .collect::<Vec<_>>()
                })
            },
            name,
            self.absence_poller,
        )
        .await;
        ensure!(
            absent,
            error::StillPresentSnafu {
                name,
                seconds: self.absence_poller.budget().as_secs(),
            }
        );
        info!("Auto scaling group '{}' is gone", name);
        Ok(())
    }
}

use asg_test_bootstrap::CloudResult;
use asg_test_model::clients::{Error, ResourceClient, Result};
use asg_test_model::{AsgTag, ResourceHandle};
use asg_test_scenario::{AutoScalingApi, AutoScalingGroupState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared state between the fake Kubernetes API and the fake cloud. Reading a custom resource
/// runs one reconcile pass: after `sync_after_gets` reads the spec is projected onto the cloud
/// group and the resource reports `ACK.ResourceSynced=True`.
#[derive(Default)]
struct World {
    objects: HashMap<String, Value>,
    pending_sync: HashMap<String, u32>,
    groups: HashMap<String, AutoScalingGroupState>,
    /// Describes left before a group whose resource was deleted disappears.
    groups_deleting: HashMap<String, u32>,
    sync_after_gets: u32,
    group_delete_lag: u32,
    /// When set, the controller never syncs.
    stuck: bool,
    patches: Vec<Value>,
    describes: u32,
}

#[derive(Clone)]
pub(crate) struct FakeAck {
    world: Arc<Mutex<World>>,
}

pub(crate) struct FakeKube(FakeAck);

pub(crate) struct FakeAutoScaling(FakeAck);

impl FakeAck {
    pub(crate) fn new(sync_after_gets: u32, group_delete_lag: u32) -> Self {
        Self {
            world: Arc::new(Mutex::new(World {
                sync_after_gets,
                group_delete_lag,
                ..World::default()
            })),
        }
    }

    /// Stop the controller: nothing syncs from now on.
    pub(crate) fn freeze(&self) {
        let mut world = self.world.lock().unwrap();
        world.stuck = true;
        world.pending_sync.clear();
    }

    pub(crate) fn clients(&self) -> (FakeKube, FakeAutoScaling) {
        (FakeKube(self.clone()), FakeAutoScaling(self.clone()))
    }

    pub(crate) fn objects(&self) -> Vec<Value> {
        self.world.lock().unwrap().objects.values().cloned().collect()
    }

    pub(crate) fn patches(&self) -> Vec<Value> {
        self.world.lock().unwrap().patches.clone()
    }

    pub(crate) fn group_names(&self) -> Vec<String> {
        self.world.lock().unwrap().groups.keys().cloned().collect()
    }

    pub(crate) fn describes(&self) -> u32 {
        self.world.lock().unwrap().describes
    }
}

fn synced_status(status: &str) -> Value {
    json!({
        "ackResourceMetadata": { "ownerAccountID": "111122223333" },
        "conditions": [{ "type": "ACK.ResourceSynced", "status": status }]
    })
}

fn merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    target.remove(key);
                } else {
                    merge(target.entry(key.clone()).or_insert(Value::Null), value);
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

/// The group the controller would converge to for `spec`, or `None` when the cloud would reject
/// the sizes.
fn project(spec: &Value, namespace: &str) -> Option<AutoScalingGroupState> {
    let int = |field: &str| spec.get(field).and_then(Value::as_i64).map(|v| v as i32);
    let min_size = int("minSize").unwrap_or_default();
    let max_size = int("maxSize").unwrap_or_default();
    let desired_capacity = int("desiredCapacity").unwrap_or(min_size);
    if !(min_size <= desired_capacity && desired_capacity <= max_size) {
        return None;
    }
    let mut tags = vec![
        AsgTag::new("services.k8s.aws/controller-version", "autoscaling-v0.0.0", false),
        AsgTag::new("services.k8s.aws/namespace", namespace, false),
    ];
    if let Some(user_tags) = spec.get("tags").and_then(Value::as_array) {
        tags.extend(
            user_tags
                .iter()
                .filter_map(|tag| serde_json::from_value::<AsgTag>(tag.clone()).ok()),
        );
    }
    Some(AutoScalingGroupState {
        name: spec
            .get("autoScalingGroupName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        min_size,
        max_size,
        desired_capacity,
        tags,
    })
}

#[async_trait::async_trait]
impl ResourceClient for FakeKube {
    async fn create(&self, handle: &ResourceHandle, body: Value) -> Result<Value> {
        let mut world = self.0.world.lock().unwrap();
        let name = handle.name().to_string();
        let after = world.sync_after_gets;
        if !world.stuck {
            world.pending_sync.insert(name.clone(), after);
        }
        world.objects.insert(name, body.clone());
        Ok(body)
    }

    async fn get(&self, handle: &ResourceHandle) -> Result<Value> {
        let mut world = self.0.world.lock().unwrap();
        let name = handle.name().to_string();
        let synced_now = match world.pending_sync.get_mut(&name) {
            Some(0) => true,
            Some(remaining) => {
                *remaining -= 1;
                false
            }
            None => false,
        };
        if synced_now {
            world.pending_sync.remove(&name);
            let object = world
                .objects
                .get_mut(&name)
                .ok_or_else(|| Error::not_found(handle.to_string()))?;
            match project(&object["spec"], handle.namespace()) {
                Some(group) => {
                    object["status"] = synced_status("True");
                    world.groups.insert(group.name.clone(), group);
                }
                None => object["status"] = synced_status("False"),
            }
        }
        world
            .objects
            .get(&name)
            .cloned()
            .ok_or_else(|| Error::not_found(handle.to_string()))
    }

    async fn patch(&self, handle: &ResourceHandle, patch: Value) -> Result<Value> {
        let mut world = self.0.world.lock().unwrap();
        world.patches.push(patch.clone());
        let name = handle.name().to_string();
        let object = world
            .objects
            .get_mut(&name)
            .ok_or_else(|| Error::not_found(handle.to_string()))?;
        merge(object, &patch);
        object["status"] = synced_status("False");
        let patched = object.clone();
        if !world.stuck {
            let after = world.sync_after_gets;
            world.pending_sync.insert(name, after);
        }
        Ok(patched)
    }

    async fn delete(&self, handle: &ResourceHandle) -> Result<()> {
        let mut world = self.0.world.lock().unwrap();
        let object = world
            .objects
            .remove(handle.name())
            .ok_or_else(|| Error::not_found(handle.to_string()))?;
        world.pending_sync.remove(handle.name());
        if let Some(group) = object["spec"]["autoScalingGroupName"].as_str() {
            let lag = world.group_delete_lag;
            world.groups_deleting.insert(group.to_string(), lag);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AutoScalingApi for FakeAutoScaling {
    async fn describe_groups(&self, name: &str) -> CloudResult<Vec<AutoScalingGroupState>> {
        let mut world = self.0.world.lock().unwrap();
        world.describes += 1;
        let gone = match world.groups_deleting.get_mut(name) {
            Some(0) => true,
            Some(remaining) => {
                *remaining -= 1;
                false
            }
            None => false,
        };
        if gone {
            world.groups_deleting.remove(name);
            world.groups.remove(name);
        }
        Ok(world.groups.get(name).cloned().into_iter().collect())
    }
}

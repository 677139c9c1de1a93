use asg_test_model::clients::{Error, ResourceClient, Result};
use asg_test_model::ResourceHandle;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// A [`ResourceClient`] that keeps objects in memory and plays the part of a controller: after a
/// create or patch, the object reports `ACK.ResourceSynced=True` once it has been read
/// `sync_after_gets` times. Deleted objects stay readable for `delete_lag_gets` reads.
pub(crate) struct FakeController {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    objects: HashMap<String, Value>,
    pending_sync: HashMap<String, u32>,
    deleting: HashMap<String, u32>,
    sync_after_gets: Option<u32>,
    delete_lag_gets: u32,
    gets: u32,
}

impl FakeController {
    /// `sync_after_gets` of `None` means the controller never reports the resource as synced.
    pub(crate) fn new(sync_after_gets: Option<u32>, delete_lag_gets: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sync_after_gets,
                delete_lag_gets,
                ..Inner::default()
            }),
        }
    }

    pub(crate) fn gets(&self) -> u32 {
        self.inner.lock().unwrap().gets
    }

    pub(crate) fn insert_synced(&self, name: &str, body: Value) {
        let mut inner = self.inner.lock().unwrap();
        let mut body = body;
        body["status"] = synced_status("True");
        inner.objects.insert(name.to_string(), body);
    }
}

fn synced_status(status: &str) -> Value {
    json!({
        "conditions": [
            { "type": "ACK.ResourceSynced", "status": status }
        ]
    })
}

/// RFC 7386 merge patch.
pub(crate) fn merge(target: &mut Value, patch: &Value) {
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

#[async_trait::async_trait]
impl ResourceClient for FakeController {
    async fn create(&self, handle: &ResourceHandle, body: Value) -> Result<Value> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(after) = inner.sync_after_gets {
            inner.pending_sync.insert(handle.name().to_string(), after);
        }
        inner
            .objects
            .insert(handle.name().to_string(), body.clone());
        Ok(body)
    }

    async fn get(&self, handle: &ResourceHandle) -> Result<Value> {
        let mut inner = self.inner.lock().unwrap();
        inner.gets += 1;
        let name = handle.name().to_string();
        if let Some(remaining) = inner.deleting.get_mut(&name) {
            if *remaining == 0 {
                inner.deleting.remove(&name);
                inner.objects.remove(&name);
            } else {
                *remaining -= 1;
            }
        }
        let synced_now = match inner.pending_sync.get_mut(&name) {
            Some(0) => true,
            Some(remaining) => {
                *remaining -= 1;
                false
            }
            None => false,
        };
        if synced_now {
            inner.pending_sync.remove(&name);
            if let Some(object) = inner.objects.get_mut(&name) {
                object["status"] = synced_status("True");
            }
        }
        inner
            .objects
            .get(&name)
            .cloned()
            .ok_or_else(|| Error::not_found(handle.to_string()))
    }

    async fn patch(&self, handle: &ResourceHandle, patch: Value) -> Result<Value> {
        let mut inner = self.inner.lock().unwrap();
        let name = handle.name().to_string();
        let sync_after = inner.sync_after_gets;
        let object = inner
            .objects
            .get_mut(&name)
            .ok_or_else(|| Error::not_found(handle.to_string()))?;
        merge(object, &patch);
        object["status"] = synced_status("False");
        let patched = object.clone();
        if let Some(after) = sync_after {
            inner.pending_sync.insert(name, after);
        }
        Ok(patched)
    }

    async fn delete(&self, handle: &ResourceHandle) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let name = handle.name().to_string();
        if !inner.objects.contains_key(&name) {
            return Err(Error::not_found(handle.to_string()));
        }
        let lag = inner.delete_lag_gets;
        inner.deleting.insert(name, lag);
        Ok(())
    }
}

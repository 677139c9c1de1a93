use super::{HttpStatusCode, Result};
use crate::{ConditionExpectation, Poller, ResourceHandle};
use log::{debug, info, trace, warn};
use serde_json::Value;

/// Create, read, patch and delete operations on custom resources addressed by a
/// [`ResourceHandle`], plus the waits built on top of them.
///
/// Implementors only provide the four raw calls; every wait has a default implementation that
/// goes through a [`Poller`]. `get` must return an error whose [`HttpStatusCode`] is `404` when
/// the resource does not exist.
#[async_trait::async_trait]
pub trait ResourceClient: Send + Sync {
    async fn create(&self, handle: &ResourceHandle, body: Value) -> Result<Value>;

    async fn get(&self, handle: &ResourceHandle) -> Result<Value>;

    /// Apply a JSON merge patch to the resource.
    async fn patch(&self, handle: &ResourceHandle, patch: Value) -> Result<Value>;

    async fn delete(&self, handle: &ResourceHandle) -> Result<()>;

    /// The resource, or `None` if it cannot be read for any reason.
    async fn get_resource(&self, handle: &ResourceHandle) -> Option<Value> {
        match self.get(handle).await {
            Ok(resource) => Some(resource),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!("Unable to get {}: {}", handle, e);
                None
            }
        }
    }

    async fn get_resource_exists(&self, handle: &ResourceHandle) -> bool {
        self.get_resource(handle).await.is_some()
    }

    /// The status condition of type `condition_type`, if the controller has set it.
    async fn get_resource_condition(
        &self,
        handle: &ResourceHandle,
        condition_type: &str,
    ) -> Option<Value> {
        let resource = self.get_resource(handle).await?;
        find_condition(&resource, condition_type).cloned()
    }

    /// Poll the resource until the expected condition holds. Returns `false` when the budget is
    /// exhausted first.
    async fn wait_on_condition(
        &self,
        handle: &ResourceHandle,
        expectation: &ConditionExpectation,
    ) -> bool {
        let condition_type = expectation.condition_type.as_str();
        let expected_status = expectation.expected_status.as_str();
        info!(
            "Waiting for {} condition '{}' to be '{}'",
            handle, condition_type, expected_status
        );
        let satisfied = expectation
            .poller
            .until(move || async move {
                let status = self
                    .get_resource_condition(handle, condition_type)
                    .await
                    .and_then(|condition| condition_status(&condition));
                trace!(
                    "condition '{}' of {} is {:?}",
                    condition_type,
                    handle,
                    status
                );
                status.as_deref() == Some(expected_status)
            })
            .await;
        if !satisfied {
            warn!(
                "Condition '{}' of {} did not become '{}' within {} attempts",
                condition_type,
                handle,
                expected_status,
                expectation.poller.max_attempts()
            );
        }
        satisfied
    }

    /// Wait until the controller has populated the resource's `status`, which means it has taken
    /// ownership of it. Returns the resource as it was first seen with a status.
    async fn wait_resource_consumed_by_controller(
        &self,
        handle: &ResourceHandle,
        poller: Poller,
    ) -> Option<Value> {
        debug!("Waiting for {} to be consumed by the controller", handle);
        poller
            .find_after_delay(move || async move {
                self.get_resource(handle)
                    .await
                    .filter(|resource| resource.get("status").is_some())
            })
            .await
    }

    /// Delete the resource and wait until the API server no longer returns it. A resource that
    /// is already gone counts as deleted.
    async fn delete_custom_resource(&self, handle: &ResourceHandle, poller: Poller) -> Result<bool> {
        match self.delete(handle).await {
            Ok(()) => info!("Deleted {}", handle),
            Err(e) if e.is_not_found() => {
                debug!("{} was already deleted", handle);
                return Ok(true);
            }
            Err(e) => return Err(e),
        }
        let gone = poller
            .find_after_delay(move || async move {
                match self.get(handle).await {
                    Ok(_) => None,
                    Err(e) if e.is_not_found() => Some(()),
                    Err(e) => {
                        debug!("Unable to check whether {} is gone: {}", handle, e);
                        None
                    }
                }
            })
            .await
            .is_some();
        if !gone {
            warn!(
                "{} still exists after {} attempts",
                handle,
                poller.max_attempts()
            );
        }
        Ok(gone)
    }
}

/// Find the condition of type `condition_type` in `status.conditions`.
pub fn find_condition<'a>(resource: &'a Value, condition_type: &str) -> Option<&'a Value> {
    resource
        .get("status")?
        .get("conditions")?
        .as_array()?
        .iter()
        .find(|condition| {
            condition.get("type").and_then(Value::as_str) == Some(condition_type)
        })
}

fn condition_status(condition: &Value) -> Option<String> {
    condition
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string)
}

use super::error::{self, Result};
use super::ResourceClient;
use crate::ResourceHandle;
use kube::api::{DeleteParams, DynamicObject, Patch, PatchParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use log::trace;
use serde_json::Value;
use snafu::ResultExt;
use std::convert::TryFrom;
use std::path::Path;

/// A [`ResourceClient`] backed by the Kubernetes API server. Custom resources are handled as
/// `DynamicObject`s so any group, version and plural can be addressed.
///
/// # Example
///
/// ```
///# use asg_test_model::clients::{KubeResourceClient, ResourceClient};
///# use asg_test_model::ResourceHandle;
///# async fn no_run() {
/// let client = KubeResourceClient::new().await.unwrap();
/// let handle = ResourceHandle::auto_scaling_group("my-asg");
/// let exists = client.get_resource_exists(&handle).await;
///# }
/// ```
#[derive(Clone)]
pub struct KubeResourceClient {
    client: Client,
}

impl KubeResourceClient {
    /// Create a client from the inferred environment (in-cluster config or `KUBECONFIG`).
    pub async fn new() -> Result<Self> {
        let client = Client::try_default()
            .await
            .context(error::InitializationSnafu)?;
        Ok(Self::new_from_k8s_client(client))
    }

    pub fn new_from_k8s_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a client from the kubeconfig file at `path`.
    pub async fn new_from_kubeconfig_path(path: &Path) -> Result<Self> {
        let kubeconfig = Kubeconfig::read_from(path).context(error::KubeconfigSnafu)?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context(error::KubeconfigSnafu)?;
        let client = Client::try_from(config).context(error::InitializationSnafu)?;
        Ok(Self::new_from_k8s_client(client))
    }

    fn api(&self, handle: &ResourceHandle) -> Api<DynamicObject> {
        Api::namespaced_with(
            self.client.clone(),
            handle.namespace(),
            &handle.api_resource(),
        )
    }
}

fn to_value(object: &DynamicObject, what: &ResourceHandle) -> Result<Value> {
    Ok(serde_json::to_value(object).context(error::SerdeSnafu {
        what: what.to_string(),
    })?)
}

#[async_trait::async_trait]
impl ResourceClient for KubeResourceClient {
    async fn create(&self, handle: &ResourceHandle, body: Value) -> Result<Value> {
        let mut object: DynamicObject =
            serde_json::from_value(body).context(error::SerdeSnafu {
                what: handle.to_string(),
            })?;
        object.metadata.name = Some(handle.name().to_string());
        object.metadata.namespace = Some(handle.namespace().to_string());
        trace!("creating {}", handle);
        let created = self
            .api(handle)
            .create(&PostParams::default(), &object)
            .await
            .context(error::KubeApiCallSnafu {
                method: "create",
                what: handle.to_string(),
            })?;
        to_value(&created, handle)
    }

    async fn get(&self, handle: &ResourceHandle) -> Result<Value> {
        let object = self
            .api(handle)
            .get(handle.name())
            .await
            .context(error::KubeApiCallSnafu {
                method: "get",
                what: handle.to_string(),
            })?;
        to_value(&object, handle)
    }

    async fn patch(&self, handle: &ResourceHandle, patch: Value) -> Result<Value> {
        trace!("patching {} with {}", handle, patch);
        let patched = self
            .api(handle)
            .patch(handle.name(), &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .context(error::KubeApiCallSnafu {
                method: "patch",
                what: handle.to_string(),
            })?;
        to_value(&patched, handle)
    }

    async fn delete(&self, handle: &ResourceHandle) -> Result<()> {
        self.api(handle)
            .delete(handle.name(), &DeleteParams::default())
            .await
            .context(error::KubeApiCallSnafu {
                method: "delete",
                what: handle.to_string(),
            })?;
        Ok(())
    }
}

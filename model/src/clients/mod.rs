mod error;
mod http_status_code;
mod kube_client;
mod resource_client;

pub use error::{Error, Result};
pub use http_status_code::{HttpStatusCode, StatusCode};
pub use kube_client::KubeResourceClient;
pub use resource_client::{find_condition, ResourceClient};

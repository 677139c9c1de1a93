use crate::constants::{CRD_GROUP, CRD_VERSION, DEFAULT_NAMESPACE, RESOURCE_KIND, RESOURCE_PLURAL};
use kube::api::ApiResource;
use std::fmt::{Display, Formatter};

/// Identifies one instance of a custom resource. A handle is created once per fixture and is the
/// key for every subsequent operation on that instance.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ResourceHandle {
    group: String,
    version: String,
    plural: String,
    name: String,
    namespace: String,
}

impl ResourceHandle {
    pub fn new<S1, S2, S3, S4, S5>(
        group: S1,
        version: S2,
        plural: S3,
        name: S4,
        namespace: S5,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
        S5: Into<String>,
    {
        Self {
            group: group.into(),
            version: version.into(),
            plural: plural.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// A handle for an `AutoScalingGroup` named `name` in the `default` namespace.
    pub fn auto_scaling_group<S: Into<String>>(name: S) -> Self {
        Self::new(
            CRD_GROUP,
            CRD_VERSION,
            RESOURCE_PLURAL,
            name,
            DEFAULT_NAMESPACE,
        )
    }

    /// The same resource in a different namespace.
    pub fn in_namespace<S: Into<String>>(self, namespace: S) -> Self {
        Self {
            namespace: namespace.into(),
            ..self
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// The kind served under `plural`. Only the auto scaling group plural is known; anything else
    /// falls back to the plural with its trailing `s` removed.
    pub fn kind(&self) -> String {
        if self.plural == RESOURCE_PLURAL {
            return RESOURCE_KIND.to_string();
        }
        let singular = self.plural.strip_suffix('s').unwrap_or(&self.plural);
        let mut chars = singular.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.group.clone(),
            version: self.version.clone(),
            api_version: self.api_version(),
            kind: self.kind(),
            plural: self.plural.clone(),
        }
    }
}

impl Display for ResourceHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}/{} '{}/{}'",
            self.plural, self.group, self.version, self.namespace, self.name
        )
    }
}

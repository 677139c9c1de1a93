use crate::error::{self, Result};
use log::trace;
use regex::{Captures, Regex};
use serde_json::Value;
use snafu::{ensure, ResultExt};
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholders look like `$NAME`, where the name is upper case letters, digits and underscores.
const PLACEHOLDER_PATTERN: &str = r"\$([A-Z][A-Z0-9_]*)";

/// A named manifest template and the values for its placeholders. The template is loaded from
/// `<resource dir>/<name>.yaml` and rendered exactly once into a resource body.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ManifestTemplate {
    name: String,
    replacements: BTreeMap<String, String>,
}

impl ManifestTemplate {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            replacements: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn replacements(&self) -> &BTreeMap<String, String> {
        &self.replacements
    }

    /// Add or override a single placeholder value.
    pub fn with_replacement<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.replacements.insert(key.into(), value.into());
        self
    }

    /// Add or override every placeholder value in `replacements`.
    pub fn with_replacements<I, K, V>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.replacements.extend(
            replacements
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self
    }

    /// Substitute placeholders in `template` in a single pass. Replacement values are never
    /// expanded again, and placeholders without a value are left as they are.
    pub fn render_str(&self, template: &str) -> Result<String> {
        let pattern = Regex::new(PLACEHOLDER_PATTERN).context(error::PlaceholderPatternSnafu)?;
        Ok(pattern
            .replace_all(template, |captures: &Captures<'_>| {
                match self.replacements.get(&captures[1]) {
                    Some(value) => value.clone(),
                    None => captures[0].to_string(),
                }
            })
            .into_owned())
    }

    /// Render `template` and parse the result into a resource body.
    pub fn render_yaml(&self, template: &str) -> Result<Value> {
        let rendered = self.render_str(template)?;
        trace!("rendered manifest '{}':\n{}", self.name, rendered);
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&rendered).context(error::ManifestParseSnafu { name: &self.name })?;
        let body =
            serde_json::to_value(yaml).context(error::ManifestConvertSnafu { name: &self.name })?;
        ensure!(
            body.is_object(),
            error::ManifestShapeSnafu { name: &self.name }
        );
        Ok(body)
    }

    /// Load `<resource_dir>/<name>.yaml` and render it.
    pub fn render<P: AsRef<Path>>(&self, resource_dir: P) -> Result<Value> {
        let path = resource_dir.as_ref().join(format!("{}.yaml", self.name));
        let template =
            std::fs::read_to_string(&path).context(error::ManifestReadSnafu { path: &path })?;
        self.render_yaml(&template)
    }
}

/// Returns `prefix-<random>` filled with random lower case hex characters up to exactly
/// `max_length` characters. A prefix that is too long is truncated.
pub fn random_suffix_name(prefix: &str, max_length: usize) -> String {
    let mut name: String = format!("{}-", prefix).chars().take(max_length).collect();
    let mut length = name.chars().count();
    while length < max_length {
        let random = uuid::Uuid::new_v4().simple().to_string();
        let suffix: String = random.chars().take(max_length - length).collect();
        length += suffix.chars().count();
        name.push_str(&suffix);
    }
    name
}

/*!

Tag comparison rules for auto scaling groups. The controller injects its own system tags, and the
cloud adds `aws:` tags, so user supplied tags are compared only after those are removed.

!*/

use crate::constants::{
    AWS_TAG_PREFIX, SYSTEM_TAG_CONTROLLER_VERSION, SYSTEM_TAG_NAMESPACE, SYSTEM_TAG_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The tags every controller-managed resource must carry.
pub const REQUIRED_SYSTEM_TAGS: [&str; 2] = [SYSTEM_TAG_CONTROLLER_VERSION, SYSTEM_TAG_NAMESPACE];

/// A tag as observed on an auto scaling group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsgTag {
    pub key: String,
    pub value: String,
    pub propagate_at_launch: bool,
}

impl AsgTag {
    pub fn new<S1, S2>(key: S1, value: S2, propagate_at_launch: bool) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
            propagate_at_launch,
        }
    }
}

/// Tags whose key starts with `aws:` or the controller's own prefix.
pub fn is_system_tag(key: &str) -> bool {
    key.starts_with(AWS_TAG_PREFIX) || key.starts_with(SYSTEM_TAG_PREFIX)
}

/// The user supplied tags in `tags` as a key to value map.
pub fn without_system_tags<'a, I>(tags: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a AsgTag>,
{
    tags.into_iter()
        .filter(|tag| !is_system_tag(&tag.key))
        .map(|tag| (tag.key.clone(), tag.value.clone()))
        .collect()
}

/// The required system tags that are absent from `tags`.
pub fn missing_system_tags<'a, I>(tags: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a AsgTag>,
{
    let tags: Vec<&AsgTag> = tags.into_iter().collect();
    REQUIRED_SYSTEM_TAGS
        .iter()
        .filter(|required| !tags.iter().any(|tag| tag.key == **required))
        .copied()
        .collect()
}

/// `true` when `actual`, net of system tags, holds exactly the `expected` key/value pairs.
pub fn equal_without_system_tags<'a, I>(expected: &BTreeMap<String, String>, actual: I) -> bool
where
    I: IntoIterator<Item = &'a AsgTag>,
{
    let expected: BTreeMap<&String, &String> = expected
        .iter()
        .filter(|(key, _)| !is_system_tag(key))
        .collect();
    let actual = without_system_tags(actual);
    expected.len() == actual.len()
        && expected
            .iter()
            .all(|(key, value)| actual.get(*key) == Some(*value))
}

/// Find the tag named `key`.
pub fn find<'a, I>(tags: I, key: &str) -> Option<&'a AsgTag>
where
    I: IntoIterator<Item = &'a AsgTag>,
{
    tags.into_iter().find(|tag| tag.key == key)
}

#[cfg(test)]
mod test {
    use super::*;

    fn system_tags() -> Vec<AsgTag> {
        vec![
            AsgTag::new("services.k8s.aws/controller-version", "autoscaling-v0.0.1", false),
            AsgTag::new("services.k8s.aws/namespace", "default", false),
            AsgTag::new("aws:cloudformation:stack-name", "stack", true),
        ]
    }

    fn expected(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn system_tags_are_ignored() {
        let mut tags = system_tags();
        tags.push(AsgTag::new("new-tag-key", "new-tag-value-1", true));
        assert!(missing_system_tags(&tags).is_empty());
        assert!(equal_without_system_tags(
            &expected(&[("new-tag-key", "new-tag-value-1")]),
            &tags
        ));
        assert!(!equal_without_system_tags(
            &expected(&[("new-tag-key", "new-tag-value-2")]),
            &tags
        ));
    }

    #[test]
    fn tag_value_update_then_clear() {
        let mut tags = system_tags();
        tags.push(AsgTag::new("k", "v1", true));
        assert!(equal_without_system_tags(&expected(&[("k", "v1")]), &tags));

        tags.last_mut().unwrap().value = "v2".into();
        assert!(equal_without_system_tags(&expected(&[("k", "v2")]), &tags));
        assert!(!equal_without_system_tags(&expected(&[("k", "v1")]), &tags));

        tags.pop();
        assert!(equal_without_system_tags(&expected(&[]), &tags));
        assert!(!equal_without_system_tags(&expected(&[("k", "v2")]), &tags));
    }

    #[test]
    fn extra_user_tag_is_a_mismatch() {
        let mut tags = system_tags();
        tags.push(AsgTag::new("a", "1", false));
        tags.push(AsgTag::new("b", "2", false));
        assert!(!equal_without_system_tags(&expected(&[("a", "1")]), &tags));
    }

    #[test]
    fn missing_system_tags_are_reported() {
        let tags = vec![AsgTag::new("services.k8s.aws/namespace", "default", false)];
        assert_eq!(
            missing_system_tags(&tags),
            vec!["services.k8s.aws/controller-version"]
        );
    }

    #[test]
    fn find_by_key() {
        let mut tags = system_tags();
        tags.push(AsgTag::new("k", "v", false));
        assert_eq!(find(&tags, "k").map(|t| t.propagate_at_launch), Some(false));
        assert!(find(&tags, "absent").is_none());
    }
}

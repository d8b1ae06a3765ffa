//! Instance-scoped type restrictions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;

/// A stowable's type tag is not permitted in a basket instance.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("type '{type_tag}' is not stowable in basket instance '{instance}'")]
pub struct UnstowableObject {
    pub type_tag: String,
    pub instance: String,
}

/// Decides which stowable types a basket instance accepts.
///
/// The check gates additions only. Items already in a basket are never purged
/// when the policy changes.
pub trait StowabilityPolicy: Send + Sync {
    fn verify(&self, instance: &str, type_tag: &str) -> Result<(), UnstowableObject>;
}

impl<P> StowabilityPolicy for Arc<P>
where
    P: StowabilityPolicy + ?Sized,
{
    fn verify(&self, instance: &str, type_tag: &str) -> Result<(), UnstowableObject> {
        (**self).verify(instance, type_tag)
    }
}

/// Accepts every type in every instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenPolicy;

impl StowabilityPolicy for OpenPolicy {
    fn verify(&self, _instance: &str, _type_tag: &str) -> Result<(), UnstowableObject> {
        Ok(())
    }
}

/// Per-instance allow-lists of type tags.
///
/// Instances without a list, or with an empty list, are unrestricted.
#[derive(Debug, Default, Clone)]
pub struct AllowListPolicy {
    allowed: HashMap<String, HashSet<String>>,
}

impl AllowListPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: restrict `instance` to `types`.
    pub fn allow<I, T>(mut self, instance: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.allowed
            .entry(instance.into())
            .or_default()
            .extend(types.into_iter().map(Into::into));
        self
    }

    /// Allow-list configured for `instance`, if it restricts anything.
    pub fn restrictions(&self, instance: &str) -> Option<&HashSet<String>> {
        self.allowed.get(instance).filter(|types| !types.is_empty())
    }
}

impl<K, I, T> FromIterator<(K, I)> for AllowListPolicy
where
    K: Into<String>,
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    fn from_iter<It: IntoIterator<Item = (K, I)>>(iter: It) -> Self {
        iter.into_iter()
            .fold(Self::new(), |policy, (instance, types)| policy.allow(instance, types))
    }
}

impl StowabilityPolicy for AllowListPolicy {
    fn verify(&self, instance: &str, type_tag: &str) -> Result<(), UnstowableObject> {
        match self.restrictions(instance) {
            Some(types) if !types.contains(type_tag) => Err(UnstowableObject {
                type_tag: type_tag.to_string(),
                instance: instance.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_instances_are_open() {
        let policy = AllowListPolicy::new().allow("wishlist", ["Product"]);
        assert!(policy.verify("basket", "Anything").is_ok());
    }

    #[test]
    fn configured_instances_reject_unlisted_types() {
        let policy = AllowListPolicy::new().allow("basket", ["Widget"]);
        assert!(policy.verify("basket", "Widget").is_ok());

        let err = policy.verify("basket", "Gadget").unwrap_err();
        assert_eq!(
            err,
            UnstowableObject {
                type_tag: "Gadget".into(),
                instance: "basket".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "type 'Gadget' is not stowable in basket instance 'basket'"
        );
    }

    #[test]
    fn empty_allow_list_means_unrestricted() {
        let policy = AllowListPolicy::new().allow("basket", Vec::<String>::new());
        assert!(policy.restrictions("basket").is_none());
        assert!(policy.verify("basket", "Gadget").is_ok());
    }

    #[test]
    fn collects_from_instance_pairs() {
        let policy: AllowListPolicy = [("basket", vec!["Widget", "Gadget"]), ("wishlist", vec!["Widget"])]
            .into_iter()
            .collect();
        assert!(policy.verify("basket", "Gadget").is_ok());
        assert!(policy.verify("wishlist", "Gadget").is_err());
    }

    #[test]
    fn open_policy_accepts_everything() {
        assert!(OpenPolicy.verify("basket", "Anything").is_ok());
    }
}

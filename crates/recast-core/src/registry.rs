//! Record type -> transformer identifier bindings, scoped by group
//!
//! The registry holds every configured group and remembers which one is
//! active. The active group is plain state on the registry value: switching
//! it needs `&mut self`, and hosts that want a per-request group keep a
//! registry per request or pass the group to [`TransformerRegistry::lookup`]
//! directly.

use std::collections::HashMap;

use crate::config::{GroupBindings, RegistryConfig};

/// Group that is active until the host switches
pub const DEFAULT_GROUP: &str = "default";

/// Group-scoped mapping from record type to transformer identifier
#[derive(Debug, Clone)]
pub struct TransformerRegistry {
    groups: HashMap<String, GroupBindings>,
    active: String,
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl TransformerRegistry {
    /// Build a registry from configuration, with `default` active
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            groups: config.groups,
            active: DEFAULT_GROUP.to_string(),
        }
    }

    /// Transformer identifier bound to `record_type` in `group`.
    ///
    /// `None` when the group is unknown or has no binding for the type.
    pub fn lookup(&self, group: &str, record_type: &str) -> Option<&str> {
        self.groups
            .get(group)
            .and_then(|bindings| bindings.get(record_type))
            .map(String::as_str)
    }

    /// [`TransformerRegistry::lookup`] in the active group
    pub fn resolve(&self, record_type: &str) -> Option<&str> {
        self.lookup(&self.active, record_type)
    }

    /// Make `group` the active group.
    ///
    /// Returns `false`, leaving the active group unchanged, when `group` is
    /// not configured.
    pub fn set_active_group(&mut self, group: &str) -> bool {
        if !self.groups.contains_key(group) {
            tracing::warn!(group, active = %self.active, "unknown transformer group");
            return false;
        }

        tracing::debug!(from = %self.active, to = group, "switching transformer group");
        self.active = group.to_string();
        true
    }

    /// Name of the active group
    pub fn active_group(&self) -> &str {
        &self.active
    }

    /// Whether `group` is configured
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Configured group names, sorted
    pub fn groups(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Bindings of one group
    pub fn bindings(&self, group: &str) -> Option<&GroupBindings> {
        self.groups.get(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> TransformerRegistry {
        let config = RegistryConfig::from_host_yaml(
            r#"
recast:
  groups:
    default:
      User: UserTransformer
      Post: PostTransformer
    admin:
      User: AdminUserTransformer
"#,
        )
        .unwrap();
        TransformerRegistry::new(config)
    }

    #[rstest]
    fn test_active_group_starts_as_default(registry: TransformerRegistry) {
        assert_eq!(registry.active_group(), "default");
    }

    #[rstest]
    #[case("default", "User", Some("UserTransformer"))]
    #[case("default", "Post", Some("PostTransformer"))]
    #[case("admin", "User", Some("AdminUserTransformer"))]
    #[case("admin", "Post", None)]
    #[case("missing", "User", None)]
    fn test_lookup(
        registry: TransformerRegistry,
        #[case] group: &str,
        #[case] record_type: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(registry.lookup(group, record_type), expected);
    }

    #[rstest]
    fn test_set_active_group_existing(mut registry: TransformerRegistry) {
        assert!(registry.set_active_group("admin"));
        assert_eq!(registry.active_group(), "admin");
        assert_eq!(registry.resolve("User"), Some("AdminUserTransformer"));
    }

    #[rstest]
    fn test_set_active_group_nonexistent(mut registry: TransformerRegistry) {
        registry.set_active_group("admin");
        assert!(!registry.set_active_group("nonexistent"));
        assert_eq!(registry.active_group(), "admin");
    }

    #[rstest]
    fn test_switch_back_to_default(mut registry: TransformerRegistry) {
        assert!(registry.set_active_group("admin"));
        assert!(registry.set_active_group("default"));
        assert_eq!(registry.resolve("Post"), Some("PostTransformer"));
    }

    #[rstest]
    fn test_groups_sorted(registry: TransformerRegistry) {
        assert_eq!(registry.groups(), vec!["admin", "default"]);
        assert!(registry.has_group("admin"));
        assert_eq!(registry.bindings("admin").map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_default_registry_is_empty_default_group() {
        let registry = TransformerRegistry::default();
        assert_eq!(registry.groups(), vec!["default"]);
        assert_eq!(registry.resolve("User"), None);
    }
}

//! Tree configuration.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::TreeError;
use crate::id::NodeId;
use crate::policy::{BuildWarningPolicy, FailFast};
use crate::serializer::{FlatSerializer, TreeSerializer};

pub const DEFAULT_ID_KEY: &str = "id";
pub const DEFAULT_PARENT_KEY: &str = "parent";

/// Options recognized when building a tree.
///
/// | Option | Default |
/// |--------|---------|
/// | `root_id` | `0` |
/// | `id_key` | `"id"` |
/// | `parent_key` | `"parent"` |
/// | `build_warning` | [`FailFast`] |
/// | `serializer` | [`FlatSerializer`] |
/// | `reject_duplicate_ids` | `false` |
#[derive(Clone)]
pub struct TreeOptions {
    root_id: NodeId,
    id_key: String,
    parent_key: String,
    build_warning: Arc<dyn BuildWarningPolicy>,
    serializer: Arc<dyn TreeSerializer>,
    reject_duplicate_ids: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            root_id: NodeId::default(),
            id_key: DEFAULT_ID_KEY.to_string(),
            parent_key: DEFAULT_PARENT_KEY.to_string(),
            build_warning: Arc::new(FailFast),
            serializer: Arc::new(FlatSerializer),
            reject_duplicate_ids: false,
        }
    }
}

impl fmt::Debug for TreeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeOptions")
            .field("root_id", &self.root_id)
            .field("id_key", &self.id_key)
            .field("parent_key", &self.parent_key)
            .field("reject_duplicate_ids", &self.reject_duplicate_ids)
            .finish_non_exhaustive()
    }
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON object.
    ///
    /// Keys match case-insensitively: `rootId`, `id`, `parent`,
    /// `rejectDuplicateIds`. Empty `id` / `parent` values keep the defaults
    /// and unknown keys are ignored. Policies and serializers cannot be
    /// expressed in JSON; set them with the `with_*` methods.
    pub fn from_value(value: &Value) -> Result<Self, TreeError> {
        let Value::Object(map) = value else {
            return Err(TreeError::invalid_option("options", "must be an object"));
        };
        let mut options = Self::default();
        for (key, value) in map {
            match key.to_lowercase().as_str() {
                "rootid" => {
                    options.root_id = NodeId::from_value(value)
                        .ok_or_else(|| TreeError::invalid_option("rootId", "must be a string, number or null"))?;
                }
                "id" => {
                    if let Some(key) = non_empty_string("id", value)? {
                        options.id_key = key;
                    }
                }
                "parent" => {
                    if let Some(key) = non_empty_string("parent", value)? {
                        options.parent_key = key;
                    }
                }
                "rejectduplicateids" => {
                    options.reject_duplicate_ids = serde_json::from_value(value.clone())
                        .map_err(|_| TreeError::invalid_option("rejectDuplicateIds", "must be a boolean"))?;
                }
                _ => {}
            }
        }
        Ok(options)
    }

    pub fn with_root_id(mut self, root_id: impl Into<NodeId>) -> Self {
        self.root_id = root_id.into();
        self
    }

    /// Sets the id field name. An empty name keeps the current one.
    pub fn with_id_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.is_empty() {
            self.id_key = key;
        }
        self
    }

    /// Sets the parent field name. An empty name keeps the current one.
    pub fn with_parent_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.is_empty() {
            self.parent_key = key;
        }
        self
    }

    pub fn with_build_warning(mut self, policy: impl BuildWarningPolicy + 'static) -> Self {
        self.build_warning = Arc::new(policy);
        self
    }

    pub fn with_serializer(mut self, serializer: impl TreeSerializer + 'static) -> Self {
        self.serializer = Arc::new(serializer);
        self
    }

    pub fn reject_duplicate_ids(mut self, reject: bool) -> Self {
        self.reject_duplicate_ids = reject;
        self
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    pub fn parent_key(&self) -> &str {
        &self.parent_key
    }

    pub fn build_warning(&self) -> &dyn BuildWarningPolicy {
        self.build_warning.as_ref()
    }

    pub fn serializer(&self) -> &dyn TreeSerializer {
        self.serializer.as_ref()
    }

    pub(crate) fn set_serializer(&mut self, serializer: Arc<dyn TreeSerializer>) {
        self.serializer = serializer;
    }

    pub fn rejects_duplicate_ids(&self) -> bool {
        self.reject_duplicate_ids
    }
}

fn non_empty_string(option: &str, value: &Value) -> Result<Option<String>, TreeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(TreeError::invalid_option(option, "must be a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let options = TreeOptions::default();
        assert_eq!(options.root_id(), &NodeId::Int(0));
        assert_eq!(options.id_key(), "id");
        assert_eq!(options.parent_key(), "parent");
        assert!(!options.rejects_duplicate_ids());
    }

    #[test]
    fn keys_match_case_insensitively() {
        let options = TreeOptions::from_value(&json!({
            "rootId": "",
            "ID": "id_node",
            "Parent": "id_parent",
            "rejectDuplicateIds": true,
            "somethingElse": [1, 2],
        }))
        .unwrap();
        assert_eq!(options.root_id(), &NodeId::from(""));
        assert_eq!(options.id_key(), "id_node");
        assert_eq!(options.parent_key(), "id_parent");
        assert!(options.rejects_duplicate_ids());
    }

    #[test]
    fn null_root_id_is_allowed() {
        let options = TreeOptions::from_value(&json!({"rootid": null})).unwrap();
        assert_eq!(options.root_id(), &NodeId::Null);
    }

    #[test]
    fn empty_keys_keep_defaults() {
        let options = TreeOptions::from_value(&json!({"id": "", "parent": null})).unwrap();
        assert_eq!(options.id_key(), "id");
        assert_eq!(options.parent_key(), "parent");
        assert_eq!(TreeOptions::new().with_id_key("").id_key(), "id");
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        assert!(matches!(
            TreeOptions::from_value(&json!({"rootId": [1]})),
            Err(TreeError::InvalidOption { .. })
        ));
        assert_eq!(
            TreeOptions::from_value(&json!({"rootId": true})).unwrap_err(),
            TreeError::invalid_option("rootId", "must be a string, number or null")
        );
        assert!(matches!(
            TreeOptions::from_value(&json!({"id": 5})),
            Err(TreeError::InvalidOption { .. })
        ));
        assert!(matches!(
            TreeOptions::from_value(&json!({"rejectDuplicateIds": "yes"})),
            Err(TreeError::InvalidOption { .. })
        ));
        assert!(matches!(
            TreeOptions::from_value(&json!([])),
            Err(TreeError::InvalidOption { .. })
        ));
    }
}

//! Read-only views over a parsed feature-control response
//!
//! The response is kept as a [`JsonNode`] tree so that positional lookups
//! (see [`crate::json::locator`]) and repeated keys still see every member.
//! Named lookups take the first member with that key. The views in
//! this module borrow that tree and turn each field access into an `Option`,
//! so a missing field or a field of the wrong type is something callers match
//! on instead of something that can fault.

use crate::json::JsonNode;

/// Key of the top-level object holding the feature list
pub const FEATURE_CONTROL_KEY: &str = "featureControl";

/// Feature name that carries an SSH allow-list
pub const SSH_WHITELIST_FEATURE: &str = "sshwhitelist";

/// State of a string field that is only ever logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticField<'a> {
    /// The key is not in the document
    Missing,
    /// The key is present but holds `null` or a non-string value
    Null,
    /// The key holds a string
    Value(&'a str),
}

impl<'a> DiagnosticField<'a> {
    fn read(object: &'a JsonNode, key: &str) -> Self {
        match object.get(key) {
            None => DiagnosticField::Missing,
            Some(JsonNode::String(s)) => DiagnosticField::Value(s),
            Some(_) => DiagnosticField::Null,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            DiagnosticField::Value(s) => Some(s),
            _ => None,
        }
    }
}

/// The `featureControl` object of a response
#[derive(Debug, Clone, Copy)]
pub struct FeatureControlDocument<'a> {
    object: &'a JsonNode,
}

impl<'a> FeatureControlDocument<'a> {
    /// Locates `featureControl` in the parsed root.
    ///
    /// Returns `None` when the root is not an object, or when the key is
    /// missing or does not hold an object.
    pub fn from_root(root: &'a JsonNode) -> Option<Self> {
        root.get(FEATURE_CONTROL_KEY)
            .filter(|object| object.is_object())
            .map(|object| Self { object })
    }

    pub fn configset_id(&self) -> DiagnosticField<'a> {
        DiagnosticField::read(self.object, "configset-id")
    }

    pub fn configset_label(&self) -> DiagnosticField<'a> {
        DiagnosticField::read(self.object, "configset-label")
    }

    /// Number of entries in `features`, or `None` if it is absent or not an array
    pub fn feature_count(&self) -> Option<usize> {
        self.features_array().map(|features| features.len())
    }

    /// Entries of `features` in document order.
    ///
    /// `None` when `features` is absent or not an array. Elements that are not
    /// objects are still yielded; every accessor on them answers `None`.
    pub fn features(&self) -> Option<impl Iterator<Item = FeatureEntry<'a>> + 'a> {
        self.features_array()
            .map(|features| features.iter().map(FeatureEntry::new))
    }

    fn features_array(&self) -> Option<&'a [JsonNode]> {
        self.object.get("features").and_then(JsonNode::as_array)
    }
}

/// Value of a feature's `effectiveImmediate` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveImmediate {
    /// Field not present
    Absent,
    /// Field present with a usable value
    Flag(bool),
    /// Field present with a value that cannot be read as a flag
    Invalid,
}

impl EffectiveImmediate {
    fn from_node(value: Option<&JsonNode>) -> Self {
        match value {
            None => EffectiveImmediate::Absent,
            Some(JsonNode::Bool(b)) => EffectiveImmediate::Flag(*b),
            Some(JsonNode::Number(n)) => {
                let zero = n.as_f64().map(|f| f == 0.0).unwrap_or(false);
                EffectiveImmediate::Flag(!zero)
            }
            Some(JsonNode::String(s)) => {
                EffectiveImmediate::Flag(s.eq_ignore_ascii_case("true") || s == "1")
            }
            Some(_) => EffectiveImmediate::Invalid,
        }
    }

    /// The integer written to the config output. Absent and invalid values
    /// are written as `0`.
    pub fn as_flag(&self) -> u8 {
        match self {
            EffectiveImmediate::Flag(true) => 1,
            _ => 0,
        }
    }
}

/// One element of `featureControl.features`
#[derive(Debug, Clone, Copy)]
pub struct FeatureEntry<'a> {
    raw: &'a JsonNode,
}

impl<'a> FeatureEntry<'a> {
    pub fn new(raw: &'a JsonNode) -> Self {
        Self { raw }
    }

    /// The underlying JSON node
    pub fn raw(&self) -> &'a JsonNode {
        self.raw
    }

    /// `name`, when it is a string
    pub fn name(&self) -> Option<&'a str> {
        self.raw.get("name").and_then(JsonNode::as_str)
    }

    /// `listType` is only checked for presence, any JSON type counts
    pub fn list_type(&self) -> Option<&'a JsonNode> {
        self.raw.get("listType")
    }

    /// True when both `name` and `listType` are present and `name` equals
    /// `sshwhitelist` ignoring ASCII case.
    pub fn is_ssh_whitelist(&self) -> bool {
        self.list_type().is_some()
            && self
                .name()
                .map(|name| name.eq_ignore_ascii_case(SSH_WHITELIST_FEATURE))
                .unwrap_or(false)
    }

    pub fn effective_immediate(&self) -> EffectiveImmediate {
        EffectiveImmediate::from_node(self.raw.get("effectiveImmediate"))
    }

    /// `configData` members in document order, when it is an object.
    /// Repeated keys are all kept.
    pub fn config_data(&self) -> Option<&'a [(String, JsonNode)]> {
        self.raw.get("configData").and_then(JsonNode::members)
    }

    /// True when `configData` is present but holds something other than an object
    pub fn has_malformed_config_data(&self) -> bool {
        matches!(self.raw.get("configData"), Some(v) if !v.is_object())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use yare::parameterized;

    fn node(value: Value) -> JsonNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_feature_control() {
        for value in [json!({"other": {}}), json!([1, 2]), json!({"featureControl": "x"})] {
            let root = node(value);
            assert!(FeatureControlDocument::from_root(&root).is_none());
        }
    }

    #[test]
    fn test_diagnostic_fields() {
        let root = node(json!({"featureControl": {
            "configset-id": "abc-123",
            "configset-label": null
        }}));
        let doc = FeatureControlDocument::from_root(&root).unwrap();

        assert_eq!(doc.configset_id(), DiagnosticField::Value("abc-123"));
        assert_eq!(doc.configset_id().as_str(), Some("abc-123"));
        assert_eq!(doc.configset_label(), DiagnosticField::Null);
    }

    #[test]
    fn test_diagnostic_field_missing_and_non_string() {
        let root = node(json!({"featureControl": {"configset-id": 7}}));
        let doc = FeatureControlDocument::from_root(&root).unwrap();

        assert_eq!(doc.configset_id(), DiagnosticField::Null);
        assert_eq!(doc.configset_label(), DiagnosticField::Missing);
    }

    #[test]
    fn test_features_absent_or_not_array() {
        let root = node(json!({"featureControl": {}}));
        let doc = FeatureControlDocument::from_root(&root).unwrap();
        assert!(doc.features().is_none());
        assert_eq!(doc.feature_count(), None);

        let root = node(json!({"featureControl": {"features": {"name": "x"}}}));
        let doc = FeatureControlDocument::from_root(&root).unwrap();
        assert!(doc.features().is_none());
    }

    #[test]
    fn test_features_in_document_order() {
        let root = node(json!({"featureControl": {"features": [
            {"name": "first"}, 42, {"name": "third"}
        ]}}));
        let doc = FeatureControlDocument::from_root(&root).unwrap();

        let names: Vec<_> = doc.features().unwrap().map(|f| f.name()).collect();
        assert_eq!(names, vec![Some("first"), None, Some("third")]);
        assert_eq!(doc.feature_count(), Some(3));
    }

    #[parameterized(
        lower = { "sshwhitelist" },
        upper = { "SSHWHITELIST" },
        mixed = { "SSHWhiteList" },
        camel = { "sshWhitelist" },
    )]
    fn test_ssh_whitelist_name_ignores_case(name: &str) {
        let raw = node(json!({"name": name, "listType": "IPv4"}));
        assert!(FeatureEntry::new(&raw).is_ssh_whitelist());
    }

    #[test]
    fn test_ssh_whitelist_requires_list_type() {
        let raw = node(json!({"name": "SSHWhitelist"}));
        assert!(!FeatureEntry::new(&raw).is_ssh_whitelist());
    }

    #[test]
    fn test_ssh_whitelist_requires_string_name() {
        let raw = node(json!({"name": 5, "listType": "IPv4"}));
        assert!(!FeatureEntry::new(&raw).is_ssh_whitelist());

        let raw = node(json!({"name": "SSHWhitelistV2", "listType": "IPv4"}));
        assert!(!FeatureEntry::new(&raw).is_ssh_whitelist());
    }

    #[parameterized(
        bool_true = { json!({"effectiveImmediate": true}), EffectiveImmediate::Flag(true), 1 },
        bool_false = { json!({"effectiveImmediate": false}), EffectiveImmediate::Flag(false), 0 },
        number_one = { json!({"effectiveImmediate": 1}), EffectiveImmediate::Flag(true), 1 },
        number_zero = { json!({"effectiveImmediate": 0}), EffectiveImmediate::Flag(false), 0 },
        string_true = { json!({"effectiveImmediate": "TRUE"}), EffectiveImmediate::Flag(true), 1 },
        string_one = { json!({"effectiveImmediate": "1"}), EffectiveImmediate::Flag(true), 1 },
        string_other = { json!({"effectiveImmediate": "yes"}), EffectiveImmediate::Flag(false), 0 },
        null = { json!({"effectiveImmediate": null}), EffectiveImmediate::Invalid, 0 },
        absent = { json!({}), EffectiveImmediate::Absent, 0 },
    )]
    fn test_effective_immediate(raw: Value, expected: EffectiveImmediate, flag: u8) {
        let raw = node(raw);
        let entry = FeatureEntry::new(&raw);
        assert_eq!(entry.effective_immediate(), expected);
        assert_eq!(entry.effective_immediate().as_flag(), flag);
    }

    #[test]
    fn test_config_data_access() {
        let raw = node(json!({"configData": {"tr181.A": "1"}}));
        let entry = FeatureEntry::new(&raw);
        assert_eq!(entry.config_data().map(|m| m.len()), Some(1));
        assert!(!entry.has_malformed_config_data());

        let raw = node(json!({"configData": ["tr181.A"]}));
        let entry = FeatureEntry::new(&raw);
        assert!(entry.config_data().is_none());
        assert!(entry.has_malformed_config_data());
    }

    #[test]
    fn test_non_object_entry_answers_none() {
        let raw = node(json!("just a string"));
        let entry = FeatureEntry::new(&raw);
        assert_eq!(entry.name(), None);
        assert_eq!(entry.list_type(), None);
        assert!(entry.config_data().is_none());
        assert_eq!(entry.effective_immediate(), EffectiveImmediate::Absent);
    }

    #[test]
    fn test_config_data_keeps_repeated_keys() {
        let raw = JsonNode::parse(br#"{"configData": {"tr181.A": "1", "tr181.A": "2"}}"#).unwrap();
        let keys: Vec<_> = FeatureEntry::new(&raw)
            .config_data()
            .unwrap()
            .iter()
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(keys, vec!["tr181.A", "tr181.A"]);
    }

    #[test]
    fn test_repeated_name_uses_first_occurrence() {
        let raw = JsonNode::parse(
            br#"{"name": "SSHWhitelist", "listType": "IPv4", "name": "Other"}"#,
        )
        .unwrap();
        let entry = FeatureEntry::new(&raw);
        assert_eq!(entry.name(), Some("SSHWhitelist"));
        assert!(entry.is_ssh_whitelist());
    }
}

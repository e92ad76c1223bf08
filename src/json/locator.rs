//! Positional array lookup over a JSON tree
//!
//! Some payloads embed a list under a key whose name changes from one
//! document to the next (`"RDK_RPI"`, `"SNMP IP4 WL"`, ...). Rather than
//! matching on key names, the list is found by its position in the tree.

use super::JsonNode;

/// Returns the first array in `node`'s subtree, searching depth-first in
/// pre-order and starting with `node` itself.
///
/// Object members are visited in document order, so the whole subtree of a
/// member is exhausted before its next sibling is considered. The search never
/// leaves the subtree rooted at `node`.
///
/// # Example
///
/// ```
/// use featurectl::json::{find_first_array, JsonNode};
///
/// let feature = JsonNode::parse(br#"{"name": "SSHWhitelist", "RDK_RPI": ["10.0.0.1"]}"#).unwrap();
/// let found = find_first_array(&feature).unwrap();
/// assert_eq!(found.to_string(), r#"["10.0.0.1"]"#);
/// ```
pub fn find_first_array(node: &JsonNode) -> Option<&JsonNode> {
    match node {
        JsonNode::Array(_) => Some(node),
        JsonNode::Object(members) => members.iter().find_map(|(_, value)| find_first_array(value)),
        _ => None,
    }
}

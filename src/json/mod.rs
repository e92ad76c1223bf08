//! Parsed JSON trees and positional lookups over them

pub mod locator;
pub mod node;

pub use locator::find_first_array;
pub use node::JsonNode;

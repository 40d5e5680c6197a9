//! # Metadata Fields
//!
//! Media players expose track information through a `Metadata` property holding a map whose
//! keys are namespaced as `descriptor:field` (`xesam:title`, `mpris:trackid`, ...).
//!
//! A field can be requested either by its full key or by the part after the first colon.
use serde_json::Value;

/// Name of the property holding the metadata map.
pub const METADATA_PROPERTY: &str = "Metadata";

/// Looks `name` up in a metadata map.
///
/// An exact key match wins; otherwise the first key (in map order) whose field part equals
/// `name` is used. Returns `None` when nothing matches or when `metadata` is not a map.
pub fn lookup<'m>(metadata: &'m Value, name: &str) -> Option<&'m Value> {
    let map = metadata.as_object()?;

    if let Some(value) = map.get(name) {
        return Some(value);
    }

    map.iter()
        .find(|(key, _)| key.split_once(':').is_some_and(|(_, field)| field == name))
        .map(|(_, value)| value)
}

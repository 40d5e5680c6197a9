//! # Bus Gateway
//!
//! The boundary between the dispatch logic and the bus. A [`BusGateway`] fetches the
//! introspection document, invokes methods and reads or writes properties on one remote object.
//!
//! Implementations own the wire concerns (connection, marshalling, timeouts). Values cross this
//! boundary as `serde_json::Value`; the gateway decides how they map to wire types.
//!
//! * [`dbus::ZbusGateway`]: talks to a real session or system bus through `zbus`.
//! * [`codec`]: the JSON <-> D-Bus value conversion used by `ZbusGateway`.
pub mod codec;
pub mod dbus;

use async_trait::async_trait;
use serde_json::Value;

/// Operations the router needs from the remote object.
///
/// Every call is a single round trip; callers await it to completion before issuing the next.
#[async_trait]
pub trait BusGateway: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the introspection document of the remote object.
    async fn introspect(&self) -> Result<String, Self::Error>;

    /// Calls `interface.method` with positional `args`, returning the reply.
    async fn invoke_method(
        &self,
        interface: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, Self::Error>;

    async fn get_property(&self, interface: &str, property: &str) -> Result<Value, Self::Error>;

    /// Writes a property. Rejecting writes to read-only properties is the remote side's job.
    async fn set_property(
        &self,
        interface: &str,
        property: &str,
        value: Value,
    ) -> Result<(), Self::Error>;
}

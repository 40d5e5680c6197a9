//! # Dynbus Core
//!
//! `dynbus-core` is the foundational library powering the Dynbus CLI. It provides a dynamic
//! D-Bus client capable of driving any remote object without compile-time bindings for its
//! interfaces.
//!
//! ## Key Components
//!
//! * **[`RemoteObject`]:** The main entry point. It introspects the remote object once at
//!   construction and routes generic `get(name)` / `set(name, value)` requests to a method
//!   invocation, a property read or write, or a `Metadata` field lookup.
//! * **[`Catalog`]:** The typed command catalog (methods and properties) built from the
//!   introspection document.
//! * **[`BusGateway`]:** The seam to the bus itself. [`ZbusGateway`] talks to a real session or
//!   system bus; tests inject their own implementation.
//!
//! ## Values
//!
//! Arguments, replies and property values travel through the router as `serde_json::Value`.
//! Translating them to and from D-Bus wire values is the gateway's job (see [`gateway::codec`]).
//!
//! ## Re-exports
//!
//! This crate re-exports `zbus` so consumers building their own [`ZbusGateway`] from an existing
//! connection use a compatible version.
pub mod catalog;
pub mod config;
pub mod gateway;
pub mod metadata;
pub mod object;
pub mod schema;

pub use catalog::{Catalog, SchemaParseError};
pub use config::{BusKind, BusTarget};
pub use gateway::{
    BusGateway,
    dbus::{GatewayError, ZbusGateway},
};
pub use object::{
    Attribute, IntrospectError, Introspected, MethodInvoker, Pending, RemoteObject, ResolveError,
};

// Re-exports
pub use zbus;

//! # Remote Object
//!
//! This module implements the generic attribute access on top of a [`BusGateway`].
//!
//! The [`RemoteObject`] uses a **Typestate Pattern** to separate construction from use:
//!
//! 1. **[`Pending`]**: The object holds a gateway and a local field store but no catalog yet.
//!    Writes are plain local assignments.
//! 2. **[`Introspected`]**: The catalog has been built from the remote introspection document.
//!    Reads and writes are routed to the remote object.
//!
//! ## Resolution order
//!
//! [`RemoteObject::get`] resolves a name against, in order:
//!
//! 1. local members: the local field store, then the built-in `catalog`, `methods` and
//!    `properties` accessors,
//! 2. remote methods (returned as a [`MethodInvoker`], nothing is called yet),
//! 3. remote properties (read immediately),
//! 4. fields of the remote `Metadata` property.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dynbus_core::{Attribute, BusTarget, RemoteObject, ZbusGateway};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = ZbusGateway::connect(&BusTarget::default()).await?;
//! let mut player = RemoteObject::connect(gateway).await?;
//!
//! if let Attribute::Method(play_pause) = player.get("PlayPause").await? {
//!     play_pause.call(vec![]).await?;
//! }
//!
//! player.set("Volume", serde_json::json!(0.5)).await?;
//! # Ok(())
//! # }
//! ```
use crate::{
    catalog::{Catalog, SchemaParseError},
    gateway::BusGateway,
    metadata::{self, METADATA_PROPERTY},
    schema::{Method, Property},
};
use serde_json::Value;
use std::{collections::HashMap, fmt};

/// Errors that can occur while introspecting the remote object.
#[derive(Debug, thiserror::Error)]
pub enum IntrospectError<E> {
    #[error("Introspection request failed: '{0}'")]
    Request(#[source] E),
    #[error("Failed to build command catalog: '{0}'")]
    Schema(#[from] SchemaParseError),
}

/// Errors that can occur when resolving a name with [`RemoteObject::get`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError<E> {
    #[error("'{0}' is not a local member, remote method, remote property or metadata field")]
    NotFound(String),
    #[error("Remote access failed: '{0}'")]
    Remote(#[source] E),
}

/// State: catalog not built yet.
#[derive(Debug, Clone, Default)]
pub struct Pending;

/// State: catalog built from the remote introspection document.
#[derive(Debug, Clone)]
pub struct Introspected {
    catalog: Catalog,
}

/// A remote object driven entirely by its introspection data.
///
/// The generic parameter `S` represents the current state of the object.
#[derive(Debug)]
pub struct RemoteObject<G, S = Introspected> {
    gateway: G,
    fields: HashMap<String, Value>,
    state: S,
}

impl<G, S> RemoteObject<G, S> {
    /// Reads the local field store, without any remote dispatch.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

impl<G: BusGateway> RemoteObject<G, Pending> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            fields: HashMap::new(),
            state: Pending,
        }
    }

    /// Assigns a local field. No catalog exists yet, so nothing is sent to the bus.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Fetches the introspection document and builds the catalog.
    ///
    /// This is the only time the remote schema is read; the catalog is never refreshed.
    pub async fn introspect(self) -> Result<RemoteObject<G>, IntrospectError<G::Error>> {
        tracing::info!("Introspecting methods and properties");

        let document = self
            .gateway
            .introspect()
            .await
            .map_err(IntrospectError::Request)?;
        let catalog = Catalog::parse(&document)?;

        tracing::info!(
            methods = catalog.methods().len(),
            properties = catalog.properties().len(),
            "Completed introspection"
        );

        Ok(RemoteObject {
            gateway: self.gateway,
            fields: self.fields,
            state: Introspected { catalog },
        })
    }
}

impl<G: BusGateway> RemoteObject<G, Introspected> {
    /// Creates an object and introspects it right away.
    ///
    /// # Returns
    ///
    /// * `Ok(RemoteObject)` - The object, ready to route reads and writes.
    /// * `Err(IntrospectError)` - If introspection failed or returned an unusable document.
    pub async fn connect(gateway: G) -> Result<Self, IntrospectError<G::Error>> {
        RemoteObject::new(gateway).introspect().await
    }

    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    /// Resolves `name` to a local member, a remote method, a remote property value or a
    /// metadata field, in that order.
    ///
    /// Resolving a property performs the remote read; resolving a method does not call it.
    pub async fn get(&self, name: &str) -> Result<Attribute<'_, G>, ResolveError<G::Error>> {
        if let Some(attribute) = self.local_member(name) {
            tracing::debug!(name, "Resolved to a local member");
            return Ok(attribute);
        }

        let catalog = &self.state.catalog;

        if let Some(method) = catalog.find_method(name) {
            tracing::debug!(name, interface = %method.interface, "Resolved to a remote method");
            return Ok(Attribute::Method(MethodInvoker {
                gateway: &self.gateway,
                method,
            }));
        }

        if let Some(property) = catalog.find_property(name) {
            let value = self
                .read_property(property)
                .await
                .map_err(ResolveError::Remote)?;
            return Ok(Attribute::Property(value));
        }

        if let Some(value) = self
            .metadata_field(name)
            .await
            .map_err(ResolveError::Remote)?
        {
            return Ok(Attribute::Metadata(value));
        }

        Err(ResolveError::NotFound(name.to_string()))
    }

    /// Writes `value` under `name`.
    ///
    /// When `name` is a remote property the value is sent to the bus first; a remote failure is
    /// returned as is and leaves the local field store untouched. The local field store is then
    /// updated in every case.
    pub async fn set(&mut self, name: impl Into<String>, value: Value) -> Result<(), G::Error> {
        let name = name.into();

        if let Some(property) = self.state.catalog.find_property(&name) {
            tracing::info!(
                interface = %property.interface,
                property = %property.name,
                %value,
                "Setting property"
            );
            self.gateway
                .set_property(&property.interface, &property.name, value.clone())
                .await?;
        }

        self.fields.insert(name, value);
        Ok(())
    }

    fn local_member(&self, name: &str) -> Option<Attribute<'_, G>> {
        if let Some(value) = self.fields.get(name) {
            return Some(Attribute::Field(value));
        }

        let catalog = &self.state.catalog;
        match name {
            "catalog" => Some(Attribute::Catalog(catalog)),
            "methods" => Some(Attribute::Methods(catalog.methods())),
            "properties" => Some(Attribute::Properties(catalog.properties())),
            _ => None,
        }
    }

    async fn read_property(&self, property: &Property) -> Result<Value, G::Error> {
        tracing::info!(
            interface = %property.interface,
            property = %property.name,
            "Getting property"
        );
        self.gateway
            .get_property(&property.interface, &property.name)
            .await
    }

    async fn metadata_field(&self, name: &str) -> Result<Option<Value>, G::Error> {
        let Some(property) = self.state.catalog.find_property(METADATA_PROPERTY) else {
            return Ok(None);
        };

        let metadata = self.read_property(property).await?;
        Ok(metadata::lookup(&metadata, name).cloned())
    }
}

/// The outcome of a successful [`RemoteObject::get`].
pub enum Attribute<'a, G> {
    /// A value from the local field store.
    Field(&'a Value),
    Catalog(&'a Catalog),
    Methods(&'a [Method]),
    Properties(&'a [Property]),
    /// A remote method, ready to be called.
    Method(MethodInvoker<'a, G>),
    /// The current value of a remote property.
    Property(Value),
    /// A field of the remote `Metadata` property.
    Metadata(Value),
}

impl<G> Attribute<'_, G> {
    /// Returns the value carried by a field, property or metadata attribute.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Attribute::Field(value) => Some(value.clone()),
            Attribute::Property(value) | Attribute::Metadata(value) => Some(value),
            _ => None,
        }
    }
}

impl<G> fmt::Debug for Attribute<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Field(value) => f.debug_tuple("Field").field(value).finish(),
            Attribute::Catalog(catalog) => f.debug_tuple("Catalog").field(catalog).finish(),
            Attribute::Methods(methods) => f.debug_tuple("Methods").field(methods).finish(),
            Attribute::Properties(properties) => {
                f.debug_tuple("Properties").field(properties).finish()
            }
            Attribute::Method(invoker) => f.debug_tuple("Method").field(invoker).finish(),
            Attribute::Property(value) => f.debug_tuple("Property").field(value).finish(),
            Attribute::Metadata(value) => f.debug_tuple("Metadata").field(value).finish(),
        }
    }
}

/// A remote method bound to the gateway it is called through.
pub struct MethodInvoker<'a, G> {
    gateway: &'a G,
    method: &'a Method,
}

impl<'a, G> MethodInvoker<'a, G> {
    pub fn method(&self) -> &'a Method {
        self.method
    }
}

impl<G: BusGateway> MethodInvoker<'_, G> {
    /// Calls the method with positional `args`, passed to the gateway unchanged.
    pub async fn call(&self, args: Vec<Value>) -> Result<Value, G::Error> {
        tracing::info!(
            interface = %self.method.interface,
            method = %self.method.name,
            "Calling method"
        );
        self.gateway
            .invoke_method(&self.method.interface, &self.method.name, args)
            .await
    }
}

impl<G> fmt::Debug for MethodInvoker<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvoker")
            .field("method", self.method)
            .finish()
    }
}

//! # zbus Gateway
//!
//! A [`BusGateway`] backed by a `zbus` connection.
//!
//! Every operation builds a short-lived proxy for the interface it needs (the target interface
//! for method calls, `org.freedesktop.DBus.Properties` for property access and
//! `org.freedesktop.DBus.Introspectable` for introspection) and performs one call through it.
//! Property caching is disabled so each read is a real round trip.
use super::{
    BusGateway,
    codec::{self, CodecError},
};
use crate::config::{BusKind, BusTarget};
use async_trait::async_trait;
use serde_json::Value;
use zbus::{
    Connection, Proxy,
    proxy::{Builder, CacheProperties},
};
use zvariant::{OwnedValue, Structure, StructureBuilder};

const INTROSPECTABLE_INTERFACE: &str = "org.freedesktop.DBus.Introspectable";
const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Errors reported by [`ZbusGateway`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("D-Bus call failed: '{0}'")]
    Bus(#[from] zbus::Error),
    #[error("Failed to convert value: '{0}'")]
    Codec(#[from] CodecError),
}

/// A gateway to one object on a session or system bus.
#[derive(Debug, Clone)]
pub struct ZbusGateway {
    connection: Connection,
    destination: String,
    path: String,
}

impl ZbusGateway {
    /// Connects to the bus named by `target`.
    ///
    /// # Returns
    ///
    /// * `Ok(ZbusGateway)` - A gateway bound to `target.destination` and `target.path`.
    /// * `Err(zbus::Error)` - If no bus connection could be established.
    pub async fn connect(target: &BusTarget) -> Result<Self, zbus::Error> {
        let connection = match target.bus {
            BusKind::Session => Connection::session().await?,
            BusKind::System => Connection::system().await?,
        };

        tracing::debug!(%target, "Connected to bus");

        Ok(Self::new(connection, target))
    }

    /// Creates a gateway from an existing connection.
    pub fn new(connection: Connection, target: &BusTarget) -> Self {
        Self {
            connection,
            destination: target.destination.clone(),
            path: target.path.clone(),
        }
    }

    async fn proxy<'a>(&'a self, interface: &'a str) -> Result<Proxy<'a>, zbus::Error> {
        Builder::<Proxy<'a>>::new(&self.connection)
            .destination(self.destination.as_str())?
            .path(self.path.as_str())?
            .interface(interface)?
            .cache_properties(CacheProperties::No)
            .build()
            .await
    }
}

#[async_trait]
impl BusGateway for ZbusGateway {
    type Error = GatewayError;

    async fn introspect(&self) -> Result<String, Self::Error> {
        let proxy = self.proxy(INTROSPECTABLE_INTERFACE).await?;
        let document: String = proxy.call("Introspect", &()).await?;
        Ok(document)
    }

    async fn invoke_method(
        &self,
        interface: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, Self::Error> {
        let proxy = self.proxy(interface).await?;

        let reply = if args.is_empty() {
            proxy.call_method(method, &()).await?
        } else {
            let mut builder = StructureBuilder::new();
            for arg in &args {
                builder = builder.append_field(codec::to_value(arg)?);
            }
            let body = builder.build().map_err(zbus::Error::from)?;
            proxy.call_method(method, &body).await?
        };

        let body = reply.body();
        if body.is_empty() {
            return Ok(Value::Null);
        }

        let fields: Structure<'_> = body.deserialize()?;
        match fields.fields() {
            [single] => Ok(codec::to_json(single)?),
            many => Ok(Value::Array(
                many.iter()
                    .map(codec::to_json)
                    .collect::<Result<_, _>>()?,
            )),
        }
    }

    async fn get_property(&self, interface: &str, property: &str) -> Result<Value, Self::Error> {
        let proxy = self.proxy(PROPERTIES_INTERFACE).await?;
        let value: OwnedValue = proxy.call("Get", &(interface, property)).await?;
        Ok(codec::to_json(&value)?)
    }

    async fn set_property(
        &self,
        interface: &str,
        property: &str,
        value: Value,
    ) -> Result<(), Self::Error> {
        let proxy = self.proxy(PROPERTIES_INTERFACE).await?;
        let value = codec::to_value(&value)?;
        proxy
            .call::<_, _, ()>("Set", &(interface, property, value))
            .await?;
        Ok(())
    }
}

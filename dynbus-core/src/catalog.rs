//! # Command Catalog
//!
//! This module turns an introspection document into a flat, ordered catalog of
//! [`Method`]s and [`Property`]s and answers name lookups against it.
//!
//! The document is the XML returned by `org.freedesktop.DBus.Introspectable.Introspect`:
//!
//! ```xml
//! <node>
//!   <interface name="org.mpris.MediaPlayer2.Player">
//!     <method name="Seek">
//!       <arg name="Offset" type="x" direction="in"/>
//!     </method>
//!     <property name="Volume" type="d" access="readwrite"/>
//!     <signal name="Seeked">
//!       <arg name="Position" type="x"/>
//!     </signal>
//!   </interface>
//! </node>
//! ```
//!
//! Signals are not modeled and never produce an entry.
//!
//! ## Lookups
//!
//! The catalog is flat, so two interfaces may declare members with the same name. Lookups scan
//! in document order and the first declaration wins.
use crate::schema::{Access, Arg, Method, Property, Response};
use roxmltree::{Document, Node, ParsingOptions, TextPos};
use std::fmt::{self, Display};

/// Errors that can occur while building a [`Catalog`] from an introspection document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaParseError {
    #[error("Malformed introspection document: '{0}'")]
    Xml(#[from] roxmltree::Error),
    #[error("<{element}> at {position} is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
        position: TextPos,
    },
    #[error("<property> '{property}' at {position}: {source}")]
    InvalidAccess {
        property: String,
        position: TextPos,
        #[source]
        source: crate::schema::InvalidAccess,
    },
}

/// The methods and properties of a remote object, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    methods: Vec<Method>,
    properties: Vec<Property>,
}

impl Catalog {
    /// Builds a catalog from an introspection document.
    ///
    /// Either the whole document is understood or an error is returned; partial catalogs are
    /// never produced.
    pub fn parse(document: &str) -> Result<Self, SchemaParseError> {
        let options = ParsingOptions {
            // Introspection replies start with the freedesktop DOCTYPE declaration
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = Document::parse_with_options(document, options)?;

        let mut catalog = Catalog::default();

        for interface in element_children(document.root_element(), "interface") {
            let interface_name = required_attribute(interface, "interface", "name")?;

            for member in interface.children().filter(|n| n.is_element()) {
                match member.tag_name().name() {
                    "method" => catalog
                        .methods
                        .push(parse_method(interface_name, member)?),
                    "property" => catalog
                        .properties
                        .push(parse_property(interface_name, member)?),
                    // Signals are not supported, annotations carry nothing we route on
                    _ => {}
                }
            }
        }

        tracing::debug!(
            methods = catalog.methods.len(),
            properties = catalog.properties.len(),
            "Built command catalog"
        );

        Ok(catalog)
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Returns the first method named `name`, if any.
    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Returns the first property named `name`, if any.
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.find_method(name).is_some()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.find_property(name).is_some()
    }
}

/// One line per method, then one line per property.
impl Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for method in &self.methods {
            writeln!(f, "{method}")?;
        }
        for property in &self.properties {
            writeln!(f, "{property}")?;
        }
        Ok(())
    }
}

fn parse_method(interface: &str, node: Node<'_, '_>) -> Result<Method, SchemaParseError> {
    let name = required_attribute(node, "method", "name")?;

    let mut args = Vec::new();
    let mut response: Option<Response> = None;

    for param in element_children(node, "arg") {
        match param.attribute("direction") {
            Some("in") => args.push(parse_arg(param)?),
            Some("out") => {
                let out = parse_arg(param)?;
                if let Some(discarded) = response.replace(out) {
                    tracing::warn!(
                        interface,
                        method = name,
                        discarded = %discarded,
                        "Method declares several out parameters, only the last one is kept"
                    );
                }
            }
            direction => {
                tracing::debug!(
                    interface,
                    method = name,
                    ?direction,
                    "Skipping parameter without a usable direction"
                );
            }
        }
    }

    Ok(Method {
        interface: interface.to_string(),
        name: name.to_string(),
        args,
        response,
    })
}

fn parse_arg(node: Node<'_, '_>) -> Result<Arg, SchemaParseError> {
    let wire_type = required_attribute(node, "arg", "type")?;
    let name = node.attribute("name").unwrap_or_default();
    Ok(Arg::new(name, wire_type))
}

fn parse_property(interface: &str, node: Node<'_, '_>) -> Result<Property, SchemaParseError> {
    let name = required_attribute(node, "property", "name")?;
    let wire_type = required_attribute(node, "property", "type")?;
    let access = required_attribute(node, "property", "access")?
        .parse::<Access>()
        .map_err(|source| SchemaParseError::InvalidAccess {
            property: name.to_string(),
            position: position_of(node),
            source,
        })?;

    Ok(Property {
        interface: interface.to_string(),
        name: name.to_string(),
        wire_type: wire_type.into(),
        access,
    })
}

fn element_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == tag)
}

fn required_attribute<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, SchemaParseError> {
    node.attribute(attribute)
        .ok_or_else(|| SchemaParseError::MissingAttribute {
            element,
            attribute,
            position: position_of(node),
        })
}

fn position_of(node: Node<'_, '_>) -> TextPos {
    node.document().text_pos_at(node.range().start)
}

//! # Schema Model
//!
//! Plain records describing what a remote object exposes: its methods (with ordered input
//! arguments and a single response) and its properties (with an access mode).
//!
//! Records are built once by the [`Catalog`](crate::Catalog) and never mutated afterwards.
use std::fmt::{self, Display};
use std::str::FromStr;

/// The wire type of an argument, response or property.
///
/// Basic types are identified by their single-character code. Container signatures such as
/// `as` or `a{sv}` are kept verbatim in [`WireType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireType {
    Byte,
    Boolean,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Double,
    UnixFd,
    String,
    ObjectPath,
    Signature,
    Other(String),
}

impl WireType {
    /// Returns the type signature as it appears on the wire (e.g. `s`, `x`, `a{sv}`).
    pub fn code(&self) -> &str {
        match self {
            WireType::Byte => "y",
            WireType::Boolean => "b",
            WireType::Int16 => "n",
            WireType::Uint16 => "q",
            WireType::Int32 => "i",
            WireType::Uint32 => "u",
            WireType::Int64 => "x",
            WireType::Uint64 => "t",
            WireType::Double => "d",
            WireType::UnixFd => "h",
            WireType::String => "s",
            WireType::ObjectPath => "o",
            WireType::Signature => "g",
            WireType::Other(signature) => signature,
        }
    }
}

impl From<&str> for WireType {
    fn from(signature: &str) -> Self {
        match signature {
            "y" => WireType::Byte,
            "b" => WireType::Boolean,
            "n" => WireType::Int16,
            "q" => WireType::Uint16,
            "i" => WireType::Int32,
            "u" => WireType::Uint32,
            "x" => WireType::Int64,
            "t" => WireType::Uint64,
            "d" => WireType::Double,
            "h" => WireType::UnixFd,
            "s" => WireType::String,
            "o" => WireType::ObjectPath,
            "g" => WireType::Signature,
            other => WireType::Other(other.to_string()),
        }
    }
}

impl Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A named, typed parameter of a method.
///
/// The same shape describes a method's output, see [`Response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    /// May be empty, D-Bus does not require parameters to be named.
    pub name: String,
    pub wire_type: WireType,
}

impl Arg {
    pub fn new(name: impl Into<String>, wire_type: impl Into<WireType>) -> Self {
        Self {
            name: name.into(),
            wire_type: wire_type.into(),
        }
    }
}

impl Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.wire_type)
        } else {
            write!(f, "{}: {}", self.name, self.wire_type)
        }
    }
}

/// The output descriptor of a [`Method`].
pub type Response = Arg;

/// A callable method exposed by the remote object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// The interface declaring the method (e.g. `org.mpris.MediaPlayer2.Player`).
    pub interface: String,
    pub name: String,
    /// Input parameters, in call order.
    pub args: Vec<Arg>,
    /// `None` when the method declares no output.
    pub response: Option<Response>,
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")?;

        if let Some(response) = &self.response {
            write!(f, " -> {response}")?;
        }

        Ok(())
    }
}

/// Whether a property can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    ReadWrite,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::ReadWrite => "readwrite",
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Access::ReadWrite)
    }
}

/// Returned when an access marker is neither `read` nor `readwrite`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown access mode '{0}', expected 'read' or 'readwrite'")]
pub struct InvalidAccess(pub String);

impl FromStr for Access {
    type Err = InvalidAccess;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Access::Read),
            "readwrite" => Ok(Access::ReadWrite),
            other => Err(InvalidAccess(other.to_string())),
        }
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property exposed by the remote object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub interface: String,
    pub name: String,
    pub wire_type: WireType,
    pub access: Access,
}

impl Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.name, self.wire_type, self.access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_codes() {
        for code in ["y", "b", "n", "q", "i", "u", "x", "t", "d", "h", "s", "o", "g"] {
            let wire_type = WireType::from(code);
            assert!(!matches!(wire_type, WireType::Other(_)), "{code} is basic");
            assert_eq!(wire_type.code(), code);
        }

        assert_eq!(
            WireType::from("a{sv}"),
            WireType::Other("a{sv}".to_string())
        );
        assert_eq!(WireType::from("a{sv}").to_string(), "a{sv}");
    }

    #[test]
    fn test_access_parsing() {
        assert_eq!("read".parse::<Access>(), Ok(Access::Read));
        assert_eq!("readwrite".parse::<Access>(), Ok(Access::ReadWrite));
        assert_eq!(
            "write".parse::<Access>(),
            Err(InvalidAccess("write".to_string()))
        );
        assert!(!Access::Read.is_writable());
    }

    #[test]
    fn test_method_display() {
        let method = Method {
            interface: "org.mpris.MediaPlayer2.Player".to_string(),
            name: "SetPosition".to_string(),
            args: vec![Arg::new("TrackId", "o"), Arg::new("Position", "x")],
            response: None,
        };
        assert_eq!(method.to_string(), "SetPosition(TrackId: o, Position: x)");

        let method = Method {
            interface: "I".to_string(),
            name: "M".to_string(),
            args: vec![Arg::new("a", "s"), Arg::new("", "i")],
            response: Some(Arg::new("r", "s")),
        };
        assert_eq!(method.to_string(), "M(a: s, i) -> r: s");
    }

    #[test]
    fn test_property_display() {
        let property = Property {
            interface: "org.mpris.MediaPlayer2.Player".to_string(),
            name: "Volume".to_string(),
            wire_type: WireType::Double,
            access: Access::ReadWrite,
        };
        assert_eq!(property.to_string(), "Volume -> d (readwrite)");
    }
}

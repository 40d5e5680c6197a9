//! # Bus Target
//!
//! Where the remote object lives: which bus, which well-known name, which object path.
//!
//! The defaults point at Spotify's MPRIS endpoint on the session bus.
use std::fmt::{self, Display};

/// Well-known name of the default destination.
pub const DEFAULT_DESTINATION: &str = "org.mpris.MediaPlayer2.spotify";
/// Object path of the default remote object.
pub const DEFAULT_OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BusKind {
    #[default]
    Session,
    System,
}

/// The remote object a [`ZbusGateway`](crate::ZbusGateway) talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusTarget {
    pub bus: BusKind,
    /// Bus name of the peer owning the object (e.g. `org.mpris.MediaPlayer2.vlc`).
    pub destination: String,
    pub path: String,
}

impl BusTarget {
    pub fn new(bus: BusKind, destination: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bus,
            destination: destination.into(),
            path: path.into(),
        }
    }
}

impl Default for BusTarget {
    fn default() -> Self {
        Self::new(BusKind::Session, DEFAULT_DESTINATION, DEFAULT_OBJECT_PATH)
    }
}

impl Display for BusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bus = match self.bus {
            BusKind::Session => "session",
            BusKind::System => "system",
        };
        write!(f, "{bus}:{}{}", self.destination, self.path)
    }
}

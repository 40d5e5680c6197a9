//! # CLI
//!
//! This module defines the command-line interface of `dynbus` using `clap`.
//!
//! It is responsible for parsing user input: the bus target (global flags, with environment
//! fallbacks) and the JSON literals passed as method arguments or property values.
use clap::{Parser, Subcommand};
use dynbus_core::{BusKind, BusTarget, config};

#[derive(Parser)]
#[command(name = "dynbus", version, about = "Dynamic D-Bus CLI")]
pub struct Cli {
    /// Well-known bus name of the remote object
    #[arg(long, global = true, env = "DYNBUS_DEST", default_value = config::DEFAULT_DESTINATION)]
    pub dest: String,

    /// Object path of the remote object
    #[arg(long, global = true, env = "DYNBUS_PATH", default_value = config::DEFAULT_OBJECT_PATH)]
    pub path: String,

    /// Connect to the system bus instead of the session bus
    #[arg(long, global = true, env = "DYNBUS_SYSTEM")]
    pub system: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn target(&self) -> BusTarget {
        let bus = if self.system {
            BusKind::System
        } else {
            BusKind::Session
        };
        BusTarget::new(bus, self.dest.clone(), self.path.clone())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the methods and properties of the remote object
    List,

    /// Read a name from the remote object
    ///
    /// Methods are called with the given arguments, properties and metadata fields are printed.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// dynbus get PlayPause
    /// dynbus get Seek 5000000
    /// dynbus get title
    /// ```
    Get {
        /// Method, property or metadata field name
        name: String,

        /// Positional method arguments, each a JSON literal (e.g. 42, 0.5, true, '"text"')
        #[arg(value_parser = parse_json, allow_negative_numbers = true)]
        args: Vec<serde_json::Value>,
    },

    /// Write a property of the remote object
    Set {
        /// Property name
        name: String,

        /// New value as a JSON literal (e.g. 0.5, true, '"Playlist"')
        #[arg(value_parser = parse_json, allow_negative_numbers = true)]
        value: serde_json::Value,
    },
}

fn parse_json(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_literals() {
        assert_eq!(parse_json("42").unwrap(), json!(42));
        assert_eq!(parse_json("-5000000").unwrap(), json!(-5_000_000));
        assert_eq!(parse_json("0.5").unwrap(), json!(0.5));
        assert_eq!(parse_json("\"text\"").unwrap(), json!("text"));
        assert!(parse_json("text").is_err());
    }

    #[test]
    fn test_set_value_must_be_json() {
        let cli = Cli::try_parse_from(["dynbus", "set", "Volume", "0.3"]).unwrap();
        assert!(matches!(cli.command, Commands::Set { ref value, .. } if *value == json!(0.3)));

        assert!(Cli::try_parse_from(["dynbus", "set", "LoopStatus", "Playlist"]).is_err());
    }

    #[test]
    fn test_get_with_arguments() {
        let cli = Cli::try_parse_from(["dynbus", "get", "Seek", "-5000000"]).unwrap();

        let Commands::Get { name, args } = cli.command else {
            panic!("Expected the get command");
        };
        assert_eq!(name, "Seek");
        assert_eq!(args, vec![json!(-5_000_000)]);
    }

    #[test]
    fn test_global_target_flags() {
        let cli = Cli::try_parse_from([
            "dynbus",
            "list",
            "--system",
            "--dest",
            "org.mpris.MediaPlayer2.vlc",
        ])
        .unwrap();

        let target = cli.target();
        assert_eq!(target.bus, BusKind::System);
        assert_eq!(target.destination, "org.mpris.MediaPlayer2.vlc");
        assert_eq!(target.path, config::DEFAULT_OBJECT_PATH);
    }

    #[test]
    fn test_set_requires_value() {
        assert!(Cli::try_parse_from(["dynbus", "set", "Volume"]).is_err());
    }
}

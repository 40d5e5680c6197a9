//! # Dynbus CLI Entry Point
//!
//! The main executable for the Dynbus tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Installs the `tracing` subscriber and parses command-line arguments
//!    using [`cli::Cli`].
//! 2. **Connection**: Connects to the bus and introspects the target object via `dynbus_core`.
//! 3. **Execution**: Routes the requested name through the `RemoteObject`.
//! 4. **Presentation**: Formats and prints the resulting data or error to standard output/error.

mod cli;
mod formatter;

use clap::Parser;
use cli::{Cli, Commands};
use dynbus_core::{Attribute, BusTarget, Catalog, RemoteObject, ZbusGateway};
use formatter::{FormattedString, GenericError};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Cli::parse();
    let target = args.target();

    match args.command {
        Commands::List => list(&target).await,
        Commands::Get { name, args } => get(&target, &name, args).await,
        Commands::Set { name, value } => set(&target, name, value).await,
    }
}

/// Logs go to stderr so stdout only carries command output. `RUST_LOG` overrides the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(err: impl Into<FormattedString>) -> ! {
    eprintln!("{}", err.into());
    process::exit(1);
}

async fn connect_or_exit(target: &BusTarget) -> RemoteObject<ZbusGateway> {
    let gateway = match ZbusGateway::connect(target).await {
        Ok(gateway) => gateway,
        Err(err) => exit_with(err),
    };

    match RemoteObject::connect(gateway).await {
        Ok(object) => object,
        Err(err) => exit_with(err),
    }
}

async fn list(target: &BusTarget) {
    let object = connect_or_exit(target).await;
    println!("{}", FormattedString::from(object.catalog()));
}

async fn get(target: &BusTarget, name: &str, args: Vec<serde_json::Value>) {
    let object = connect_or_exit(target).await;

    match object.get(name).await {
        Ok(Attribute::Method(invoker)) => match invoker.call(args).await {
            Ok(reply) => println!("{}", FormattedString::from(reply)),
            Err(err) => exit_with(err),
        },
        Ok(_) if !args.is_empty() => exit_with(GenericError(
            "Unexpected arguments",
            format!("'{name}' is not a method"),
        )),
        Ok(attribute) => println!("{}", FormattedString::from(attribute)),
        Err(err) => exit_with(err),
    }
}

async fn set(target: &BusTarget, name: String, value: serde_json::Value) {
    let mut object = connect_or_exit(target).await;

    // A local-only write would vanish with the process
    if let Err(err) = ensure_property(object.catalog(), &name) {
        exit_with(err);
    }

    if let Err(err) = object.set(name, value).await {
        exit_with(err);
    }
}

fn ensure_property(catalog: &Catalog, name: &str) -> Result<(), GenericError<String>> {
    if catalog.has_property(name) {
        Ok(())
    } else {
        Err(GenericError(
            "Unknown property",
            format!("'{name}' is not a property of the remote object"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_unknown_property() {
        let catalog = Catalog::parse(
            r#"<node>
  <interface name="org.mpris.MediaPlayer2.Player">
    <method name="PlayPause"/>
    <property name="Volume" type="d" access="readwrite"/>
  </interface>
</node>"#,
        )
        .unwrap();

        assert!(ensure_property(&catalog, "Volume").is_ok());

        let GenericError(title, detail) = ensure_property(&catalog, "Volum").unwrap_err();
        assert_eq!(title, "Unknown property");
        assert!(detail.contains("'Volum'"));

        assert!(ensure_property(&catalog, "PlayPause").is_err());
    }
}

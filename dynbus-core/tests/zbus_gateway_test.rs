use dynbus_core::{
    Attribute, BusGateway, BusKind, BusTarget, GatewayError, RemoteObject, ZbusGateway,
};
use serde_json::json;
use std::collections::HashMap;
use zbus::{Connection, Guid, connection, interface, zvariant::OwnedValue};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

struct Player {
    volume: f64,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl Player {
    fn play_pause(&self) {}

    fn echo(&self, text: String, count: i64) -> String {
        format!("{text}-{count}")
    }

    fn pair(&self) -> (String, u32) {
        ("a".to_string(), 7)
    }

    #[zbus(property)]
    fn playback_status(&self) -> String {
        "Playing".to_string()
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.volume
    }

    #[zbus(property)]
    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        HashMap::from([
            ("xesam:title".to_string(), OwnedValue::from(zbus::zvariant::Str::from("Song"))),
            ("mpris:length".to_string(), OwnedValue::from(180_000_000i64)),
        ])
    }
}

/// Serves a `Player` over a private peer-to-peer connection and introspects it.
///
/// The server connection is returned so it stays alive for the duration of the test.
async fn setup_player() -> (Connection, RemoteObject<ZbusGateway>) {
    let (server_stream, client_stream) =
        tokio::net::UnixStream::pair().expect("Failed to create socket pair");

    let server = connection::Builder::unix_stream(server_stream)
        .server(Guid::generate())
        .expect("Failed to configure server")
        .p2p()
        .serve_at(OBJECT_PATH, Player { volume: 0.5 })
        .expect("Failed to serve player")
        .build();
    let client = connection::Builder::unix_stream(client_stream).p2p().build();

    let (server, client) = tokio::join!(server, client);
    let server = server.expect("Failed to start server");
    let client = client.expect("Failed to connect client");

    // Peer-to-peer connections have no bus to route on, the destination is not checked
    let target = BusTarget::new(BusKind::Session, "org.mpris.MediaPlayer2.test", OBJECT_PATH);
    let gateway = ZbusGateway::new(client, &target);

    let player = RemoteObject::connect(gateway)
        .await
        .expect("Failed to introspect player");

    (server, player)
}

#[tokio::test]
async fn test_catalog_from_real_introspection() {
    let (_server, player) = setup_player().await;
    let catalog = player.catalog();

    let echo = catalog.find_method("Echo").unwrap();
    assert_eq!(echo.interface, "org.mpris.MediaPlayer2.Player");
    assert_eq!(echo.args.len(), 2);
    assert!(echo.response.is_some());

    assert!(catalog.has_method("PlayPause"));
    assert!(catalog.has_property("Volume"));
    assert_eq!(
        catalog.find_property("Metadata").unwrap().wire_type.to_string(),
        "a{sv}"
    );
}

#[tokio::test]
async fn test_method_replies() {
    let (_server, player) = setup_player().await;

    let Attribute::Method(play_pause) = player.get("PlayPause").await.unwrap() else {
        panic!("Expected PlayPause to be a method");
    };
    assert_eq!(play_pause.call(vec![]).await.unwrap(), json!(null));

    let Attribute::Method(echo) = player.get("Echo").await.unwrap() else {
        panic!("Expected Echo to be a method");
    };
    let reply = echo.call(vec![json!("x"), json!(3)]).await.unwrap();
    assert_eq!(reply, json!("x-3"));

    let Attribute::Method(pair) = player.get("Pair").await.unwrap() else {
        panic!("Expected Pair to be a method");
    };
    assert_eq!(pair.call(vec![]).await.unwrap(), json!(["a", 7]));
}

#[tokio::test]
async fn test_property_read_and_write() {
    let (_server, mut player) = setup_player().await;

    let volume = player.get("Volume").await.unwrap().into_value();
    assert_eq!(volume, Some(json!(0.5)));

    player.set("Volume", json!(0.25)).await.unwrap();

    // Bypass the local shadow to see what the remote side holds now
    let remote = player
        .gateway()
        .get_property("org.mpris.MediaPlayer2.Player", "Volume")
        .await
        .unwrap();
    assert_eq!(remote, json!(0.25));
}

#[tokio::test]
async fn test_metadata_field_lookup() {
    let (_server, player) = setup_player().await;

    let title = player.get("title").await.unwrap();
    assert!(matches!(title, Attribute::Metadata(ref v) if *v == json!("Song")));

    let length = player.get("mpris:length").await.unwrap().into_value();
    assert_eq!(length, Some(json!(180_000_000i64)));
}

#[tokio::test]
async fn test_remote_rejections_propagate() {
    let (_server, mut player) = setup_player().await;

    // An integer is sent as `x`, the property is declared `d`
    let result = player.set("Volume", json!(1)).await;
    assert!(matches!(result, Err(GatewayError::Bus(_))));
    assert_eq!(player.field("Volume"), None);

    let result = player.set("PlaybackStatus", json!("Paused")).await;
    assert!(matches!(result, Err(GatewayError::Bus(_))));

    let Attribute::Method(echo) = player.get("Echo").await.unwrap() else {
        panic!("Expected Echo to be a method");
    };
    let result = echo.call(vec![json!(true)]).await;
    assert!(matches!(result, Err(GatewayError::Bus(_))));
}

//! Stream command listener (WebSocket).
//!
//! One task per client. Each inbound text frame is one JSON command
//! object; malformed frames are logged and the connection stays open —
//! firmware-era clients send the occasional junk frame and expect the
//! link to survive it. On connect the client is greeted with a small
//! JSON frame carrying its ID, mirroring the fixture firmware.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;

use crate::app::channel::CommandBus;
use crate::config::SimConfig;
use crate::proto::json;

/// Path clients must request during the WebSocket handshake.
pub const WS_PATH: &str = "/ws";

/// Bind the configured stream port and accept clients until shutdown.
pub async fn serve(config: SimConfig, bus: CommandBus) {
    let addr = format!("{}:{}", config.bind_addr, config.ws_port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("stream listener bind failed on {addr}: {e}");
            return;
        }
    };
    info!("stream listener on ws://{addr}{WS_PATH}");
    listen(listener, bus).await;
}

/// Accept loop over an already-bound listener.
pub async fn listen(listener: TcpListener, bus: CommandBus) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(handle_client(stream, peer, bus.clone()));
            }
            Err(e) => {
                warn!("stream accept error: {e}");
            }
        }
    }
}

async fn handle_client(stream: TcpStream, peer: SocketAddr, bus: CommandBus) {
    let check_path = |req: &Request, resp: Response| {
        if req.uri().path() == WS_PATH {
            Ok(resp)
        } else {
            let mut reject = ErrorResponse::new(Some("not found".into()));
            *reject.status_mut() = StatusCode::NOT_FOUND;
            Err(reject)
        }
    };

    let ws = match accept_hdr_async(stream, check_path).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!("handshake with {peer} failed: {e}");
            return;
        }
    };
    info!("client {peer} connected");

    let (mut write, mut read) = ws.split();

    let greeting = serde_json::json!({
        "message": "Connected successfully",
        "clientId": peer.to_string(),
    });
    if write.send(Message::Text(greeting.to_string())).await.is_err() {
        return;
    }

    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(text)) => match json::parse(&text) {
                Ok(commands) => {
                    for cmd in commands {
                        bus.submit(cmd);
                    }
                }
                Err(e) => {
                    // Malformed frame: drop it, keep the connection.
                    warn!("client {peer}: dropping frame: {e}");
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = write.send(Message::Pong(payload)).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {} // binary/pong frames carry no commands
            Err(e) => {
                debug!("client {peer} read error: {e}");
                break;
            }
        }
    }

    info!("client {peer} disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::channel::command_channel;
    use crate::app::commands::{Axis, Command};
    use futures_util::{SinkExt, StreamExt};
    use std::time::Duration;
    use tokio_tungstenite::connect_async;

    async fn drain_one(queue: &mut crate::app::channel::CommandQueue) -> Command {
        for _ in 0..200 {
            if let Some(cmd) = queue.try_next() {
                return cmd;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no command arrived on the bus");
    }

    #[tokio::test]
    async fn client_is_greeted_and_frames_are_normalised() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (bus, mut queue) = command_channel();
        tokio::spawn(listen(listener, bus));

        let (mut client, _) = connect_async(format!("ws://{addr}{WS_PATH}")).await.unwrap();

        // Greeting arrives first.
        let greeting = client.next().await.unwrap().unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(greeting.to_text().unwrap()).unwrap();
        assert_eq!(doc["message"], "Connected successfully");

        client
            .send(Message::Text(r#"{"servo": "base", "angle": 45}"#.into()))
            .await
            .unwrap();

        assert_eq!(
            drain_one(&mut queue).await,
            Command::Servo {
                axis: Axis::Base,
                angle_deg: 45.0
            }
        );
    }

    #[tokio::test]
    async fn malformed_frame_keeps_connection_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (bus, mut queue) = command_channel();
        tokio::spawn(listen(listener, bus));

        let (mut client, _) = connect_async(format!("ws://{addr}{WS_PATH}")).await.unwrap();
        let _greeting = client.next().await.unwrap().unwrap();

        client
            .send(Message::Text("{not json".into()))
            .await
            .unwrap();
        client
            .send(Message::Text(r#"{"led": {"r": 255, "g": 0, "b": 0}}"#.into()))
            .await
            .unwrap();

        // The bad frame was dropped; the good one still got through.
        assert_eq!(
            drain_one(&mut queue).await,
            Command::LedSet {
                color: (255, 0, 0)
            }
        );
    }

    #[tokio::test]
    async fn wrong_path_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (bus, _queue) = command_channel();
        tokio::spawn(listen(listener, bus));

        let result = connect_async(format!("ws://{addr}/bogus")).await;
        assert!(result.is_err());
    }
}

//! Datagram command listener.
//!
//! Receives `<packetID>;key=value;...` text packets, runs the packet ID
//! through the sequence guard, and forwards the normalised commands to
//! the engine. Accepted packets are answered with `ACK:<id>` — a
//! best-effort courtesy to the sender, not required for correctness.
//! Duplicate or stale packets are dropped without an ACK; the sender's
//! retransmission logic (out of scope) is the only recovery path.

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::net::UdpSocket;

use crate::app::channel::CommandBus;
use crate::config::SimConfig;
use crate::proto::datagram;
use crate::proto::seq_guard::SequenceGuard;

/// Largest datagram the listener will read.
const MAX_DATAGRAM: usize = 4096;

/// Bind the configured UDP port and run the receive loop until shutdown.
pub async fn serve(config: SimConfig, bus: CommandBus, guard: Arc<SequenceGuard>) {
    let addr = format!("{}:{}", config.bind_addr, config.udp_port);
    let socket = match UdpSocket::bind(&addr).await {
        Ok(s) => s,
        Err(e) => {
            // Fatal to this listener only; the rest of the simulator runs on.
            error!("datagram listener bind failed on {addr}: {e}");
            return;
        }
    };
    info!("datagram listener on udp://{addr}");
    listen(socket, bus, guard).await;
}

/// Receive loop over an already-bound socket.
pub async fn listen(socket: UdpSocket, bus: CommandBus, guard: Arc<SequenceGuard>) {
    let mut buf = [0u8; MAX_DATAGRAM];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(x) => x,
            Err(e) => {
                warn!("datagram receive error: {e}");
                continue;
            }
        };

        let text = String::from_utf8_lossy(&buf[..len]);
        let (packet_id, commands) = match datagram::parse(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("datagram from {peer} dropped: {e}");
                continue;
            }
        };

        if !guard.accept(packet_id) {
            info!("duplicate or stale packet {packet_id} from {peer}, ignoring");
            continue;
        }

        debug!("packet {packet_id} from {peer}: {} command(s)", commands.len());
        for cmd in commands {
            bus.submit(cmd);
        }

        if let Err(e) = socket.send_to(format!("ACK:{packet_id}").as_bytes(), peer).await {
            debug!("ACK to {peer} failed: {e}");
        }
    }
}

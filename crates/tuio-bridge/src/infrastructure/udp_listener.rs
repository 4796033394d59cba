//! UDP receive loop and the single pipeline task behind it.
//!
//! ```text
//! UdpSocket ──recv──► decode_packet ──mpsc──► pipeline task ──► ZoneRouter ──► event writer
//! ```
//!
//! The receive loop never touches touch state.  All frames go through one
//! channel to one task, so frames are applied strictly in arrival order and
//! the lifecycle engines have a single writer.
//!
//! Shutdown is triggered by clearing the shared `running` flag.  The receive
//! loop checks it every 200 ms, then drops its sender; the pipeline task
//! drains what is left in the channel and returns.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncWrite;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, trace};

use tuio_core::protocol::codec::decode_packet;
use tuio_core::protocol::messages::OscPacket;

use crate::application::ZoneRouter;
use crate::domain::config::AppConfig;
use crate::infrastructure::event_writer::write_events;

/// Largest datagram accepted; anything longer is truncated by the OS.
const MAX_DATAGRAM: usize = 65_536;

/// Packets buffered between the socket and the pipeline task.
const CHANNEL_CAPACITY: usize = 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Pause after the first failed receive; doubled on each further failure.
const ERROR_BACKOFF_BASE: Duration = Duration::from_millis(10);

const ERROR_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// One decoded datagram on its way to the pipeline task.
#[derive(Debug, Clone)]
pub struct Inbound {
    /// Sender address, used to keep loose messages of different trackers apart.
    pub origin: SocketAddr,
    pub packet: OscPacket,
}

/// Binds the configured address and runs the bridge until `running` is
/// cleared, writing JSON lines to stdout.
///
/// # Errors
///
/// Returns an error if the address is invalid or the socket cannot be bound.
pub async fn run_bridge(config: AppConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let addr = config.network.socket_addr()?;
    let socket = UdpSocket::bind(addr)
        .await
        .with_context(|| format!("failed to bind UDP socket on {addr}"))?;
    info!("listening for TUIO on udp://{addr}");

    let router = ZoneRouter::new(&config.effective_zones());
    serve(socket, router, running, tokio::io::stdout()).await
}

/// Runs the receive loop and the pipeline task on an already bound socket.
///
/// # Errors
///
/// Returns an error if writing events to `out` fails.
pub async fn serve<W>(
    socket: UdpSocket,
    router: ZoneRouter,
    running: Arc<AtomicBool>,
    out: W,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let pipeline = tokio::spawn(run_pipeline(rx, router, out));

    receive_loop(&socket, tx, &running).await;

    pipeline.await.context("pipeline task panicked")?
}

async fn receive_loop(socket: &UdpSocket, tx: mpsc::Sender<Inbound>, running: &AtomicBool) {
    let mut buf = vec![0u8; MAX_DATAGRAM];
    let mut consecutive_errors: u32 = 0;

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping receive loop");
            break;
        }

        let (len, origin) = match timeout(POLL_INTERVAL, socket.recv_from(&mut buf)).await {
            Ok(Ok(received)) => {
                consecutive_errors = 0;
                received
            }
            Ok(Err(e)) => {
                consecutive_errors = consecutive_errors.saturating_add(1);
                let pause = error_backoff(consecutive_errors);
                error!(consecutive_errors, ?pause, "UDP receive error: {e}");
                tokio::time::sleep(pause).await;
                continue;
            }
            Err(_) => continue,
        };

        let packet = match decode_packet(&buf[..len]) {
            Ok(packet) => packet,
            Err(e) => {
                debug!(%origin, len, "dropping undecodable datagram: {e}");
                continue;
            }
        };
        trace!(%origin, len, "datagram decoded");

        if tx.send(Inbound { origin, packet }).await.is_err() {
            error!("pipeline task stopped; stopping receive loop");
            break;
        }
    }
}

/// Pause before the next receive after `consecutive` failures in a row.
fn error_backoff(consecutive: u32) -> Duration {
    let shift = consecutive.saturating_sub(1).min(16);
    ERROR_BACKOFF_BASE
        .saturating_mul(1u32 << shift)
        .min(ERROR_BACKOFF_MAX)
}

async fn run_pipeline<W>(
    mut rx: mpsc::Receiver<Inbound>,
    mut router: ZoneRouter,
    mut out: W,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(Inbound { origin, packet }) = rx.recv().await {
        let events = router.route(&origin.to_string(), &packet);
        if !events.is_empty() {
            write_events(&mut out, &events).await?;
        }
    }
    debug!("pipeline task finished");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

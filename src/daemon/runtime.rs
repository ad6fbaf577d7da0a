//! Daemon runtime for the ambient sound mixer.
//!
//! Hosts one session for the lifetime of the process:
//! - owns the audio backend (with graceful degradation to silent operation)
//! - serves the Unix-socket control surface
//! - drives the countdown at the fixed tick cadence
//! - renders status notifications from the session's event stream
//! - exits when the session signals shutdown

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::audio::{AudioBackend, NullAudioBackend, RodioAudioBackend};
use crate::session::{SessionEvent, SessionManager, TIMER_TICK_MS};
use crate::types::SessionConfig;

use super::ipc::{IpcServer, RequestHandler};

// ============================================================================
// DaemonOptions
// ============================================================================

/// Options for running the daemon.
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    /// Path of the Unix socket to listen on
    pub socket_path: PathBuf,
    /// Session configuration
    pub config: SessionConfig,
    /// Skip audio hardware entirely and run with the no-op backend
    pub no_audio: bool,
}

impl DaemonOptions {
    /// Creates daemon options with the default session configuration.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            config: SessionConfig::default(),
            no_audio: false,
        }
    }
}

// ============================================================================
// Daemon entry points
// ============================================================================

/// Runs the daemon until the session shuts down.
///
/// Selects the audio backend: the no-op backend when `no_audio` is set, a
/// rodio backend when an output device is available, and the no-op backend
/// with a warning otherwise.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the socket cannot
/// be bound.
pub async fn run(options: DaemonOptions) -> Result<()> {
    options.config.validate().map_err(anyhow::Error::msg)?;

    // The rodio output stream cannot be sent across threads; it lives on
    // this task for as long as any track may produce sound.
    let mut _stream = None;
    let backend: Box<dyn AudioBackend> = if options.no_audio {
        info!("Audio disabled, using the no-op backend");
        Box::new(NullAudioBackend::new())
    } else {
        match RodioAudioBackend::try_default() {
            Ok((stream, backend)) => {
                _stream = Some(stream);
                Box::new(backend)
            }
            Err(e) => {
                warn!("Audio not available, running silent: {}", e);
                Box::new(NullAudioBackend::new())
            }
        }
    };

    serve(options, backend).await
}

/// Serves the control surface with an explicit backend.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound.
pub async fn serve(options: DaemonOptions, backend: Box<dyn AudioBackend>) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let session = Arc::new(Mutex::new(SessionManager::new(
        backend,
        options.config,
        event_tx,
    )));
    let server = IpcServer::new(&options.socket_path)?;
    let handler = RequestHandler::new(session.clone());

    info!("Listening on {:?}", server.socket_path());

    let ticker = tokio::spawn(run_ticker(session.clone()));

    loop {
        tokio::select! {
            conn = server.accept() => {
                match conn {
                    Ok(mut stream) => {
                        match IpcServer::receive_request(&mut stream).await {
                            Ok(request) => {
                                debug!("Handling request: {:?}", request);
                                let response = handler.handle(request).await;
                                if let Err(e) = IpcServer::send_response(&mut stream, &response).await {
                                    warn!("Failed to send response: {}", e);
                                }
                            }
                            Err(e) => warn!("Failed to read request: {}", e),
                        }
                    }
                    Err(e) => warn!("Failed to accept connection: {}", e),
                }
            }
            event = event_rx.recv() => {
                match event {
                    Some(SessionEvent::StatusChanged(snapshot)) => {
                        // The stand-in for the foreground status notification
                        info!("{}", snapshot.label());
                    }
                    Some(SessionEvent::TimerTick { remaining_ms }) => {
                        debug!("Timer remaining: {} seconds", remaining_ms / 1000);
                    }
                    Some(SessionEvent::TimerFinished) => {
                        info!("タイマーが終了しました");
                    }
                    Some(SessionEvent::ShutdownRequested) => {
                        info!("Session stopped, shutting down");
                        break;
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping session");
                // stop() queues ShutdownRequested; the next loop turn exits
                session.lock().await.stop();
            }
        }
    }

    ticker.abort();
    Ok(())
}

/// Advances the session countdown at the fixed tick cadence.
///
/// Ticks are serialized with every user-triggered mutation through the
/// session mutex; a cancelled countdown is a no-op tick.
async fn run_ticker(session: Arc<Mutex<SessionManager>>) {
    let mut ticker = interval(Duration::from_millis(TIMER_TICK_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        session.lock().await.tick_timer();
    }
}

// ============================================================================
// Tests
// ============================================================================

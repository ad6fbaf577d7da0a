//! IPC server for the ambient sound mixer daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for session commands
//! - Integration with SessionManager for command execution

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

use crate::audio::{resolve_source, SoundSource};
use crate::session::SessionManager;
use crate::types::{IpcRequest, IpcResponse, ResponseData, SoundId, TrackData};

// ============================================================================
// Constants
// ============================================================================

/// Socket path relative to the home directory
pub const SOCKET_PATH_SUFFIX: &str = ".ambience/ambience.sock";

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

/// Returns the default socket path under the home directory.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("ホームディレクトリが見つかりません")?;
    Ok(home.join(SOCKET_PATH_SUFFIX))
}

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Socket binding error
    #[error("Failed to bind socket: {0}")]
    BindError(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Write error
    #[error("Failed to write response: {0}")]
    WriteError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        // Remove existing socket file if present
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("Connection closed by client");
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .with_context(|| "Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        // Clean up socket file on drop
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to the SessionManager.
pub struct RequestHandler {
    /// Shared reference to the session manager
    session: Arc<Mutex<SessionManager>>,
}

impl RequestHandler {
    /// Creates a new request handler with the given session manager.
    pub fn new(session: Arc<Mutex<SessionManager>>) -> Self {
        Self { session }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Add { sound, file } => self.handle_add(sound, file).await,
            IpcRequest::Remove { sound } => self.handle_remove(sound).await,
            IpcRequest::Volume { sound, percent } => self.handle_volume(sound, percent).await,
            IpcRequest::Play => self.handle_play().await,
            IpcRequest::Pause => self.handle_pause().await,
            IpcRequest::Stop => self.handle_stop().await,
            IpcRequest::Timer { duration_ms } => self.handle_timer(duration_ms).await,
            IpcRequest::Status => self.handle_status().await,
        }
    }

    /// Handles the add command.
    async fn handle_add(&self, sound: SoundId, file: Option<PathBuf>) -> IpcResponse {
        let mut session = self.session.lock().await;

        let source = match file {
            Some(path) => match SoundSource::file_validated(sound.as_str(), path) {
                Ok(source) => source,
                Err(e) => return IpcResponse::error(e.to_string()),
            },
            None => resolve_source(sound, session.config().sounds_dir.as_deref()),
        };

        match session.add_track(sound, &source) {
            Ok(()) => IpcResponse::success(
                format!("サウンド '{}' を追加しました", sound),
                Some(response_data(&session)),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the remove command.
    async fn handle_remove(&self, sound: SoundId) -> IpcResponse {
        let mut session = self.session.lock().await;
        session.remove_track(sound);

        IpcResponse::success(
            format!("サウンド '{}' を削除しました", sound),
            Some(response_data(&session)),
        )
    }

    /// Handles the volume command.
    async fn handle_volume(&self, sound: SoundId, percent: u8) -> IpcResponse {
        let mut session = self.session.lock().await;

        if !session.is_track_active(sound) {
            return IpcResponse::error(format!("サウンド '{}' は追加されていません", sound));
        }

        session.set_volume(sound, percent);
        IpcResponse::success(
            format!("'{}' の音量を {}% に設定しました", sound, percent.min(100)),
            Some(response_data(&session)),
        )
    }

    /// Handles the play command.
    async fn handle_play(&self) -> IpcResponse {
        let mut session = self.session.lock().await;

        match session.play() {
            Ok(()) => {
                IpcResponse::success("再生を開始しました", Some(response_data(&session)))
            }
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the pause command.
    async fn handle_pause(&self) -> IpcResponse {
        let mut session = self.session.lock().await;
        session.pause();

        IpcResponse::success("一時停止しました", Some(response_data(&session)))
    }

    /// Handles the stop command.
    async fn handle_stop(&self) -> IpcResponse {
        let mut session = self.session.lock().await;
        session.stop();

        IpcResponse::success("停止しました", Some(response_data(&session)))
    }

    /// Handles the timer command.
    async fn handle_timer(&self, duration_ms: u64) -> IpcResponse {
        let mut session = self.session.lock().await;
        session.set_initial_timer(duration_ms);

        let message = if duration_ms == 0 {
            "タイマーを解除しました".to_string()
        } else {
            format!(
                "タイマーを {} 分に設定しました (次の再生開始から)",
                duration_ms / 60_000
            )
        };
        IpcResponse::success(message, Some(response_data(&session)))
    }

    /// Handles the status command.
    async fn handle_status(&self) -> IpcResponse {
        let session = self.session.lock().await;

        IpcResponse::success("", Some(response_data(&session)))
    }
}

/// Builds the response data snapshot for the current session state.
fn response_data(session: &SessionManager) -> ResponseData {
    let snapshot = session.snapshot();
    let tracks = session
        .registered()
        .into_iter()
        .map(|sound| TrackData {
            sound,
            volume: session.get_volume(sound),
        })
        .collect();

    ResponseData {
        status: Some(snapshot.status().as_str().to_string()),
        playing: Some(snapshot.playing),
        tracks: Some(tracks),
        timer: Some(session.timer_info()),
    }
}

// ============================================================================
// Tests
// ============================================================================

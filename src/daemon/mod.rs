//! Daemon module for the ambient sound mixer.
//!
//! This module contains the hosting process:
//! - `ipc`: Unix Domain Socket server and request dispatch
//! - `runtime`: backend selection, accept loop, countdown ticker, shutdown

pub mod ipc;
pub mod runtime;

pub use ipc::{default_socket_path, IpcError, IpcServer, RequestHandler};
pub use runtime::{run, serve, DaemonOptions};

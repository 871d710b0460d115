//! IPC listener that accepts hook events over a Unix socket.
//!
//! Window-manager hooks, key-bind helpers and scripts connect to the socket
//! and send newline-delimited JSON events.

pub mod listener;

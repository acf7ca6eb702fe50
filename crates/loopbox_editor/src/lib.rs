//! The editing session layer: owns the in-memory draft (segments + image
//! groups), routes decoded drag payloads to the pure reconciliation
//! functions in `loopbox_core`, and reconciles the draft with backend
//! snapshots on save/render. Between saves the draft is the source of
//! truth and may diverge from the server.

pub mod error;
pub mod session;

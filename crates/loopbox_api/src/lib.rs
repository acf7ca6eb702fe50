//! The resource contract between the Loopbox editor and its backend: wire
//! DTOs for the video resource and version catalogs, the [`client::VideoApi`]
//! trait the editor is generic over, a render-status polling loop, and an
//! in-memory fake backend for tests.
//!
//! The HTTP transport itself lives outside this workspace; the trait is
//! the seam.

pub mod client;
pub mod error;
pub mod fake;
pub mod poll;
pub mod types;

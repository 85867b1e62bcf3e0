//! Front-end channels over the collaborator surface.
//!
//! Each channel drives [`LearnService`](crate::service::LearnService)
//! independently and runs until the shutdown token is cancelled. The
//! console channel is always built; the HTTP channel is behind the
//! `channel-http` feature.

pub mod console;

#[cfg(feature = "channel-http")]
pub mod http;

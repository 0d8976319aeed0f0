//! pgrkam-api: client for the PGRKAM assistant chat endpoint
//!
//! This crate defines the wire types of the `/chat` endpoint, the [`ChatApi`]
//! seam the conversation controller talks through, and an HTTP implementation
//! of it built on reqwest.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ChatApi, HttpChatClient};
pub use error::{Error, ErrorKind, Result};
pub use types::*;

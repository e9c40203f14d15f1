//! # Palisade Core
//!
//! Core types for the Palisade edge gateway.
//!
//! This crate provides the foundational types used throughout Palisade:
//!
//! - [`Identity`] - Verified caller identity extracted from a bearer credential
//! - [`RequestId`] - UUID v7 request identifier
//! - [`TokenVerifier`] - HS256 bearer-token verification against configured key material
//! - [`AuthError`] - Authentication failure taxonomy
//! - [`StatusBand`] - Status-code classification for log categorization

#![doc(html_root_url = "https://docs.rs/palisade-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod fixtures;
mod identity;
mod status;
mod token;

pub use error::{AuthError, KeyError};
pub use identity::{Identity, RequestId};
pub use status::StatusBand;
pub use token::TokenVerifier;

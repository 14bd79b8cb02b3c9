//! API client library for letflix.
//!
//! Provides a client for the letflix movie catalog REST backend, the DTOs it
//! exchanges, and the token storage seam used for bearer authentication.

/// Backend operation trait.
mod api;
/// HTTP client implementation.
mod client;
/// Generic request failure.
pub mod error;
/// Request path encoding.
pub mod path;
/// Session token storage.
pub mod token;
/// Request and response payloads.
pub mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
pub use client::{DEFAULT_BASE_URL, MovieClient, MovieClientBuilder};
pub use error::{ApiResult, GENERIC_FAILURE_MESSAGE, RequestFailed};
pub use token::{MemoryTokenStore, TokenStore};
pub use types::{
    Credentials, Director, FavoriteEntry, Genre, LoginResponse, MessageResponse, Movie,
    Registration, User, UserUpdate,
};

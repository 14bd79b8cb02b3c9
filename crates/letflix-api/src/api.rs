//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use crate::error::ApiResult;
use crate::types::{
    Credentials, Director, FavoriteEntry, Genre, LoginResponse, MessageResponse, Movie,
    Registration, User, UserUpdate,
};

/// letflix backend operations, one per endpoint.
///
/// Abstracts the client so forms can be exercised against mock
/// implementations. Every operation performs exactly one request and fails
/// with the generic [`RequestFailed`](crate::RequestFailed) on any error.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Registers a new user (`POST users`).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn register(&self, registration: &Registration) -> ApiResult<MessageResponse>;

    /// Logs in and obtains a bearer token (`POST login`).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;

    /// Lists every movie in the catalog (`GET movies`, bearer).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn all_movies(&self) -> ApiResult<Vec<Movie>>;

    /// Fetches one movie by title (`GET movies/{title}`).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn movie_by_title(&self, title: &str) -> ApiResult<Movie>;

    /// Fetches a director by name (`GET directors/{name}`).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn director(&self, name: &str) -> ApiResult<Director>;

    /// Fetches a genre by name (`GET movies/genres/{genre}`).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn genre(&self, name: &str) -> ApiResult<Genre>;

    /// Fetches a user by username (`GET users/{username}`, bearer).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn user(&self, username: &str) -> ApiResult<User>;

    /// Lists a user's favorite movies (`GET users/{user}/favorites`).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn favorite_movies(&self, user: &str) -> ApiResult<Vec<FavoriteEntry>>;

    /// Adds a movie to a user's favorites (`POST users/{username}/movies/{movieId}`, bearer).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn add_favorite_movie(&self, username: &str, movie_id: &str) -> ApiResult<User>;

    /// Removes a movie from a user's favorites (`DELETE users/{username}/movies/{movieId}`, bearer).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn remove_favorite_movie(&self, username: &str, movie_id: &str) -> ApiResult<User>;

    /// Updates a user's details (`PUT users/{id}`, bearer).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> ApiResult<User>;

    /// Deletes a user (`DELETE users/{id}`, bearer).
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the request fails or is rejected.
    async fn delete_user(&self, user_id: &str) -> ApiResult<MessageResponse>;
}

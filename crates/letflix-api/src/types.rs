//! letflix request and response payloads.
//!
//! The backend owns the shape of these objects. Response types keep any field
//! they do not name in a flattened `extra` map, so nothing the server sends is
//! dropped on the way through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Registration {
    /// Desired username.
    pub username: String,
    /// Plain-text password.
    pub password: String,
    /// Email address.
    pub email: String,
    /// Birthday as entered (`YYYY-MM-DD`).
    pub birthday: String,
}

/// Query parameters of `POST login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

/// Body of `PUT users/{id}`. Only fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct UserUpdate {
    /// New username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// New email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New birthday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

impl UserUpdate {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
    }
}

/// A registered user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// Backend document id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Password hash as stored by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Birthday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Favorite movie ids.
    #[serde(default)]
    pub favorite_movies: Vec<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reply to a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    /// The authenticated user.
    pub user: User,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// A reply that may carry a human-readable message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    /// Server message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Everything else in the reply.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A movie genre.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    /// Genre name.
    #[serde(default)]
    pub name: String,
    /// Genre description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A movie director.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Director {
    /// Director name.
    #[serde(default)]
    pub name: String,
    /// Biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Date of birth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    /// Date of death.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A catalog movie.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    /// Backend document id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Genre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    /// Director.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<Director>,
    /// Poster image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Featured flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One item of a favorites listing.
///
/// Depending on the backend version, favorites come back either as bare
/// movie ids or as embedded movie objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FavoriteEntry {
    /// A movie id.
    Id(String),
    /// An embedded movie.
    Movie(Box<Movie>),
}

impl FavoriteEntry {
    /// Returns the movie id, when known.
    #[must_use]
    pub fn movie_id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Movie(movie) => movie.id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_registration_uses_pascal_case() {
        // Arrange
        let registration = Registration {
            username: String::from("alice"),
            password: String::from("s3cret"),
            email: String::from("alice@example.com"),
            birthday: String::from("1990-04-12"),
        };

        // Act
        let json = serde_json::to_value(&registration).unwrap();

        // Assert
        assert_eq!(
            json,
            serde_json::json!({
                "Username": "alice",
                "Password": "s3cret",
                "Email": "alice@example.com",
                "Birthday": "1990-04-12",
            })
        );
    }

    #[test]
    fn test_user_update_skips_unset_fields() {
        // Arrange
        let update = UserUpdate {
            email: Some(String::from("new@example.com")),
            ..UserUpdate::default()
        };

        // Act
        let json = serde_json::to_string(&update).unwrap();

        // Assert
        assert_eq!(json, r#"{"Email":"new@example.com"}"#);
        assert!(!update.is_empty());
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn test_parse_movie_fixture_keeps_unknown_fields() {
        // Arrange
        let json = include_str!("../../../fixtures/letflix/movie_leon.json");

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.id.as_deref(), Some("507f1f77bcf86cd799439011"));
        assert_eq!(movie.title, "Léon: The Professional");
        assert_eq!(movie.genre.unwrap().name, "Thriller");
        let director = movie.director.unwrap();
        assert_eq!(director.name, "Luc Besson");
        assert_eq!(director.death, None);
        assert_eq!(movie.featured, Some(true));
        assert!(movie.extra.contains_key("Actors"));
    }

    #[test]
    fn test_parse_user_fixture() {
        // Arrange
        let json = include_str!("../../../fixtures/letflix/user_alice.json");

        // Act
        let user: User = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        assert_eq!(user.favorite_movies, vec![String::from("507f1f77bcf86cd799439011")]);
        assert!(user.extra.contains_key("__v"));
    }

    #[test]
    fn test_empty_object_decodes_to_defaults() {
        // Arrange & Act
        let user: User = serde_json::from_str("{}").unwrap();
        let message: MessageResponse = serde_json::from_str("{}").unwrap();

        // Assert
        assert_eq!(user, User::default());
        assert_eq!(message.message, None);
    }

    #[test]
    fn test_favorite_entries_accept_ids_and_movies() {
        // Arrange
        let json = r#"["507f1f77bcf86cd799439011", {"_id": "507f1f77bcf86cd799439012", "Title": "Amélie"}]"#;

        // Act
        let entries: Vec<FavoriteEntry> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries.first(), Some(FavoriteEntry::Id(_))));
        assert!(matches!(entries.get(1), Some(FavoriteEntry::Movie(m)) if m.title == "Amélie"));
        assert_eq!(
            entries.get(1).and_then(FavoriteEntry::movie_id),
            Some("507f1f77bcf86cd799439012")
        );
    }
}

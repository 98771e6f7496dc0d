use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;

/// Longest email, name or personal name accepted, in characters.
pub const MAX_NAME_LEN: usize = 128;
/// Longest place description accepted, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// A registered account.
///
/// Deliberately not `Serialize`: the password hash must never leave the
/// process. API layers convert to their own response types.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    /// Login key, unique across all users.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Something a place can offer (wifi, pool, ...). Shared between places.
#[derive(Debug, Clone, PartialEq)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rentable place owned by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub number_rooms: i32,
    pub number_bathrooms: i32,
    pub max_guest: i32,
    pub price_by_night: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for inserting a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// DTO for inserting a new amenity.
#[derive(Debug, Clone)]
pub struct NewAmenity {
    pub name: String,
}

/// DTO for inserting a new place.
#[derive(Debug, Clone, Default)]
pub struct NewPlace {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub number_rooms: i32,
    pub number_bathrooms: i32,
    pub max_guest: i32,
    pub price_by_night: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

impl NewUser {
    /// Reject fields longer than the storage columns allow.
    pub fn validate(&self) -> Result<(), AppError> {
        check_len("email", &self.email, MAX_NAME_LEN)?;
        if let Some(first_name) = &self.first_name {
            check_len("first_name", first_name, MAX_NAME_LEN)?;
        }
        if let Some(last_name) = &self.last_name {
            check_len("last_name", last_name, MAX_NAME_LEN)?;
        }
        Ok(())
    }
}

impl NewAmenity {
    pub fn validate(&self) -> Result<(), AppError> {
        check_len("name", &self.name, MAX_NAME_LEN)
    }
}

impl NewPlace {
    pub fn validate(&self) -> Result<(), AppError> {
        check_len("name", &self.name, MAX_NAME_LEN)?;
        if let Some(description) = &self.description {
            check_len("description", description, MAX_DESCRIPTION_LEN)?;
        }
        Ok(())
    }
}

/// Parse an id taken from a request path.
///
/// A string that is not a UUID cannot name any stored entity, so callers treat
/// `None` exactly like a lookup miss.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

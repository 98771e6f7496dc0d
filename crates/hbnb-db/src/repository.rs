use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use hbnb_core::error::AppError;
use hbnb_core::models::{Amenity, NewAmenity, NewPlace, NewUser, Place, User};
use hbnb_core::traits::{AmenityStore, PlaceStore, Storage, UserStore};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, created_at, updated_at";
const AMENITY_COLUMNS: &str = "id, name, created_at, updated_at";
const PLACE_COLUMNS: &str = "id, user_id, name, description, number_rooms, number_bathrooms, \
     max_guest, price_by_night, latitude, longitude, created_at, updated_at";

/// PostgreSQL-backed storage for users, amenities, places and their links.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> AppError {
    AppError::DatabaseError(e.to_string())
}

// -- Internal row types for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AmenityRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AmenityRow> for Amenity {
    fn from(row: AmenityRow) -> Self {
        Amenity {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PlaceRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: Option<String>,
    number_rooms: i32,
    number_bathrooms: i32,
    max_guest: i32,
    price_by_night: i32,
    latitude: Option<f64>,
    longitude: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Place {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            number_rooms: row.number_rooms,
            number_bathrooms: row.number_bathrooms,
            max_guest: row.max_guest,
            price_by_night: row.price_by_night,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// -- Trait implementations --

impl UserStore for PgStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        user.validate()?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Validation("Email already registered".into())
            }
            other => db_err(other),
        })?;

        Ok(row.into())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

impl AmenityStore for PgStore {
    async fn get_amenity(&self, id: Uuid) -> Result<Option<Amenity>, AppError> {
        let row = sqlx::query_as::<_, AmenityRow>(&format!(
            "SELECT {AMENITY_COLUMNS} FROM amenities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_amenities(&self) -> Result<Vec<Amenity>, AppError> {
        let rows = sqlx::query_as::<_, AmenityRow>(&format!(
            "SELECT {AMENITY_COLUMNS} FROM amenities ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_amenity(&self, amenity: &NewAmenity) -> Result<Amenity, AppError> {
        amenity.validate()?;

        let row = sqlx::query_as::<_, AmenityRow>(&format!(
            "INSERT INTO amenities (id, name) VALUES ($1, $2) RETURNING {AMENITY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&amenity.name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn delete_amenity(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM amenities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

impl PlaceStore for PgStore {
    async fn get_place(&self, id: Uuid) -> Result<Option<Place>, AppError> {
        let row = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_places(&self) -> Result<Vec<Place>, AppError> {
        let rows = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_place(&self, place: &NewPlace) -> Result<Place, AppError> {
        place.validate()?;

        let row = sqlx::query_as::<_, PlaceRow>(&format!(
            r#"
            INSERT INTO places (id, user_id, name, description, number_rooms,
                number_bathrooms, max_guest, price_by_night, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PLACE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(place.user_id)
        .bind(&place.name)
        .bind(&place.description)
        .bind(place.number_rooms)
        .bind(place.number_bathrooms)
        .bind(place.max_guest)
        .bind(place.price_by_night)
        .bind(place.latitude)
        .bind(place.longitude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                AppError::NotFound(format!("User not found: {}", place.user_id))
            }
            other => db_err(other),
        })?;

        Ok(row.into())
    }

    async fn place_amenities(&self, place_id: Uuid) -> Result<Vec<Amenity>, AppError> {
        let rows = sqlx::query_as::<_, AmenityRow>(
            r#"
            SELECT a.id, a.name, a.created_at, a.updated_at
            FROM amenities a
            JOIN place_amenity pa ON pa.amenity_id = a.id
            WHERE pa.place_id = $1
            ORDER BY pa.linked_at, a.id
            "#,
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn link_amenity(&self, place_id: Uuid, amenity_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO place_amenity (place_id, amenity_id)
            VALUES ($1, $2)
            ON CONFLICT (place_id, amenity_id) DO NOTHING
            "#,
        )
        .bind(place_id)
        .bind(amenity_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn unlink_amenity(&self, place_id: Uuid, amenity_id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM place_amenity WHERE place_id = $1 AND amenity_id = $2")
                .bind(place_id)
                .bind(amenity_id)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(result.rows_affected() == 1)
    }
}

impl Storage for PgStore {
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

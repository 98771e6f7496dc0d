use std::future::Future;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Amenity, NewAmenity, NewPlace, NewUser, Place, User};

/// Persists and retrieves users.
pub trait UserStore: Send + Sync + Clone {
    fn get_user(&self, id: Uuid) -> impl Future<Output = Result<Option<User>, AppError>> + Send;

    /// Exact-match lookup on the unique email index.
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, AppError>> + Send;

    /// All users, oldest first.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, AppError>> + Send;

    /// Insert a user. Fails with [`AppError::Validation`] if the email is taken.
    fn create_user(&self, user: &NewUser)
    -> impl Future<Output = Result<User, AppError>> + Send;

    /// Delete a user and the places they own. Returns false if no such user.
    fn delete_user(&self, id: Uuid) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// Persists and retrieves amenities.
pub trait AmenityStore: Send + Sync + Clone {
    fn get_amenity(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Amenity>, AppError>> + Send;

    /// All amenities, oldest first.
    fn list_amenities(&self) -> impl Future<Output = Result<Vec<Amenity>, AppError>> + Send;

    fn create_amenity(
        &self,
        amenity: &NewAmenity,
    ) -> impl Future<Output = Result<Amenity, AppError>> + Send;

    /// Delete an amenity and every link to it. Returns false if no such amenity.
    fn delete_amenity(&self, id: Uuid) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// Persists places and their amenity link sets.
pub trait PlaceStore: Send + Sync + Clone {
    fn get_place(&self, id: Uuid) -> impl Future<Output = Result<Option<Place>, AppError>> + Send;

    /// All places, oldest first.
    fn list_places(&self) -> impl Future<Output = Result<Vec<Place>, AppError>> + Send;

    fn create_place(
        &self,
        place: &NewPlace,
    ) -> impl Future<Output = Result<Place, AppError>> + Send;

    /// Amenities linked to a place, in the order they were linked.
    fn place_amenities(
        &self,
        place_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Amenity>, AppError>> + Send;

    /// Add an amenity to a place's link set and commit.
    ///
    /// Returns true if the link was created, false if it already existed.
    /// The check and the insert happen as one step.
    fn link_amenity(
        &self,
        place_id: Uuid,
        amenity_id: Uuid,
    ) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Remove an amenity from a place's link set and commit.
    ///
    /// Returns false if the amenity was not linked.
    fn unlink_amenity(
        &self,
        place_id: Uuid,
        amenity_id: Uuid,
    ) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// The full storage facade handed to services and handlers.
pub trait Storage: UserStore + AmenityStore + PlaceStore + 'static {
    /// Check the backend is reachable.
    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}

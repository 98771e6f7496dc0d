//! Test utilities: fixtures and an instrumented storage wrapper.
//!
//! Shared by the unit tests in this crate and the integration tests of the
//! server and database crates.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Amenity, NewAmenity, NewPlace, NewUser, Place, User};
use crate::password::hash_password;
use crate::traits::{AmenityStore, PlaceStore, Storage, UserStore};

/// Password used by every fixture user.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A `NewUser` whose password is [`TEST_PASSWORD`].
pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing test password"),
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
    }
}

/// A minimal `NewPlace` owned by `user_id`.
pub fn new_place(user_id: Uuid, name: &str) -> NewPlace {
    NewPlace {
        user_id,
        name: name.to_string(),
        number_rooms: 2,
        number_bathrooms: 1,
        max_guest: 4,
        price_by_night: 90,
        ..Default::default()
    }
}

pub async fn seed_user<S: UserStore>(store: &S, email: &str) -> User {
    store
        .create_user(&new_user(email))
        .await
        .expect("seeding user")
}

pub async fn seed_amenity<S: AmenityStore>(store: &S, name: &str) -> Amenity {
    store
        .create_amenity(&NewAmenity {
            name: name.to_string(),
        })
        .await
        .expect("seeding amenity")
}

pub async fn seed_place<S: PlaceStore>(store: &S, owner: Uuid, name: &str) -> Place {
    store
        .create_place(&new_place(owner, name))
        .await
        .expect("seeding place")
}

// ---------------------------------------------------------------------------
// CountingStore
// ---------------------------------------------------------------------------

/// Wraps a store and counts every read that reaches it.
///
/// Lets tests assert that a request was rejected before touching storage.
#[derive(Clone)]
pub struct CountingStore<S> {
    inner: S,
    reads: Arc<AtomicUsize>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of read calls observed so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

impl<S: UserStore> UserStore for CountingStore<S> {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.record();
        self.inner.get_user(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.record();
        self.inner.find_user_by_email(email).await
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.record();
        self.inner.list_users().await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        self.inner.create_user(user).await
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_user(id).await
    }
}

impl<S: AmenityStore> AmenityStore for CountingStore<S> {
    async fn get_amenity(&self, id: Uuid) -> Result<Option<Amenity>, AppError> {
        self.record();
        self.inner.get_amenity(id).await
    }

    async fn list_amenities(&self) -> Result<Vec<Amenity>, AppError> {
        self.record();
        self.inner.list_amenities().await
    }

    async fn create_amenity(&self, amenity: &NewAmenity) -> Result<Amenity, AppError> {
        self.inner.create_amenity(amenity).await
    }

    async fn delete_amenity(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_amenity(id).await
    }
}

impl<S: PlaceStore> PlaceStore for CountingStore<S> {
    async fn get_place(&self, id: Uuid) -> Result<Option<Place>, AppError> {
        self.record();
        self.inner.get_place(id).await
    }

    async fn list_places(&self) -> Result<Vec<Place>, AppError> {
        self.record();
        self.inner.list_places().await
    }

    async fn create_place(&self, place: &NewPlace) -> Result<Place, AppError> {
        self.inner.create_place(place).await
    }

    async fn place_amenities(&self, place_id: Uuid) -> Result<Vec<Amenity>, AppError> {
        self.record();
        self.inner.place_amenities(place_id).await
    }

    async fn link_amenity(&self, place_id: Uuid, amenity_id: Uuid) -> Result<bool, AppError> {
        self.inner.link_amenity(place_id, amenity_id).await
    }

    async fn unlink_amenity(&self, place_id: Uuid, amenity_id: Uuid) -> Result<bool, AppError> {
        self.inner.unlink_amenity(place_id, amenity_id).await
    }
}

impl<S: Storage> Storage for CountingStore<S> {
    async fn health_check(&self) -> Result<(), AppError> {
        self.inner.health_check().await
    }
}

//! Process-local storage backend.
//!
//! Used when `HBNB_TYPE_STORAGE=memory` and throughout the test suites. All
//! tables live behind one `RwLock`, so every trait call is atomic.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Amenity, NewAmenity, NewPlace, NewUser, Place, User};
use crate::traits::{AmenityStore, PlaceStore, Storage, UserStore};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    users_by_email: HashMap<String, Uuid>,
    amenities: HashMap<Uuid, Amenity>,
    places: HashMap<Uuid, Place>,
    /// place id -> amenity ids in link order
    links: HashMap<Uuid, Vec<Uuid>>,
}

/// In-memory [`Storage`] implementation. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Generic("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Generic("memory store lock poisoned".into()))
    }
}

fn sorted<T: Clone>(
    values: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (chrono::DateTime<Utc>, Uuid),
) -> Vec<T> {
    let mut out: Vec<T> = values.collect();
    out.sort_by_key(|v| key(v));
    out
}

impl UserStore for MemoryStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .users_by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let tables = self.read()?;
        Ok(sorted(tables.users.values().cloned(), |u| (u.created_at, u.id)))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        user.validate()?;
        let mut tables = self.write()?;
        if tables.users_by_email.contains_key(&user.email) {
            return Err(AppError::Validation("Email already registered".into()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables
            .users_by_email
            .insert(created.email.clone(), created.id);
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        let Some(user) = tables.users.remove(&id) else {
            return Ok(false);
        };
        tables.users_by_email.remove(&user.email);

        let owned: Vec<Uuid> = tables
            .places
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for place_id in owned {
            tables.places.remove(&place_id);
            tables.links.remove(&place_id);
        }
        Ok(true)
    }
}

impl AmenityStore for MemoryStore {
    async fn get_amenity(&self, id: Uuid) -> Result<Option<Amenity>, AppError> {
        Ok(self.read()?.amenities.get(&id).cloned())
    }

    async fn list_amenities(&self) -> Result<Vec<Amenity>, AppError> {
        let tables = self.read()?;
        Ok(sorted(tables.amenities.values().cloned(), |a| {
            (a.created_at, a.id)
        }))
    }

    async fn create_amenity(&self, amenity: &NewAmenity) -> Result<Amenity, AppError> {
        amenity.validate()?;
        let now = Utc::now();
        let created = Amenity {
            id: Uuid::new_v4(),
            name: amenity.name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.write()?.amenities.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_amenity(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        if tables.amenities.remove(&id).is_none() {
            return Ok(false);
        }
        for linked in tables.links.values_mut() {
            linked.retain(|a| *a != id);
        }
        Ok(true)
    }
}

impl PlaceStore for MemoryStore {
    async fn get_place(&self, id: Uuid) -> Result<Option<Place>, AppError> {
        Ok(self.read()?.places.get(&id).cloned())
    }

    async fn list_places(&self) -> Result<Vec<Place>, AppError> {
        let tables = self.read()?;
        Ok(sorted(tables.places.values().cloned(), |p| (p.created_at, p.id)))
    }

    async fn create_place(&self, place: &NewPlace) -> Result<Place, AppError> {
        place.validate()?;
        let mut tables = self.write()?;
        if !tables.users.contains_key(&place.user_id) {
            return Err(AppError::NotFound(format!(
                "User not found: {}",
                place.user_id
            )));
        }

        let now = Utc::now();
        let created = Place {
            id: Uuid::new_v4(),
            user_id: place.user_id,
            name: place.name.clone(),
            description: place.description.clone(),
            number_rooms: place.number_rooms,
            number_bathrooms: place.number_bathrooms,
            max_guest: place.max_guest,
            price_by_night: place.price_by_night,
            latitude: place.latitude,
            longitude: place.longitude,
            created_at: now,
            updated_at: now,
        };
        tables.places.insert(created.id, created.clone());
        Ok(created)
    }

    async fn place_amenities(&self, place_id: Uuid) -> Result<Vec<Amenity>, AppError> {
        let tables = self.read()?;
        let Some(linked) = tables.links.get(&place_id) else {
            return Ok(Vec::new());
        };
        Ok(linked
            .iter()
            .filter_map(|id| tables.amenities.get(id))
            .cloned()
            .collect())
    }

    async fn link_amenity(&self, place_id: Uuid, amenity_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        let linked = tables.links.entry(place_id).or_default();
        if linked.contains(&amenity_id) {
            return Ok(false);
        }
        linked.push(amenity_id);
        Ok(true)
    }

    async fn unlink_amenity(&self, place_id: Uuid, amenity_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        let Some(linked) = tables.links.get_mut(&place_id) else {
            return Ok(false);
        };
        let before = linked.len();
        linked.retain(|a| *a != amenity_id);
        Ok(linked.len() != before)
    }
}

impl Storage for MemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Amenity, Place};
use crate::traits::{AmenityStore, PlaceStore};

/// Result of attaching an amenity to a place.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// The amenity was newly added to the link set.
    Linked(Amenity),
    /// The amenity was already linked; nothing changed.
    AlreadyLinked(Amenity),
}

impl LinkOutcome {
    pub fn amenity(&self) -> &Amenity {
        match self {
            LinkOutcome::Linked(a) | LinkOutcome::AlreadyLinked(a) => a,
        }
    }

    pub fn into_amenity(self) -> Amenity {
        match self {
            LinkOutcome::Linked(a) | LinkOutcome::AlreadyLinked(a) => a,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, LinkOutcome::Linked(_))
    }
}

/// Manages the many-to-many association between places and amenities.
///
/// Every operation resolves the place first, then the amenity, and reports
/// a missing one as [`AppError::NotFound`].
pub struct PlaceAmenityService<S>
where
    S: PlaceStore + AmenityStore,
{
    store: S,
}

impl<S> PlaceAmenityService<S>
where
    S: PlaceStore + AmenityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Amenities linked to the place, in link order.
    pub async fn list(&self, place_id: Uuid) -> Result<Vec<Amenity>, AppError> {
        let place = self.require_place(place_id).await?;
        self.store.place_amenities(place.id).await
    }

    /// Attach an amenity to a place. Safe to retry.
    pub async fn link(&self, place_id: Uuid, amenity_id: Uuid) -> Result<LinkOutcome, AppError> {
        let place = self.require_place(place_id).await?;
        let amenity = self.require_amenity(amenity_id).await?;

        if self.store.link_amenity(place.id, amenity.id).await? {
            tracing::info!(place_id = %place.id, amenity_id = %amenity.id, "Amenity linked");
            Ok(LinkOutcome::Linked(amenity))
        } else {
            tracing::debug!(place_id = %place.id, amenity_id = %amenity.id, "Amenity already linked");
            Ok(LinkOutcome::AlreadyLinked(amenity))
        }
    }

    /// Detach an amenity from a place. The amenity must currently be linked.
    pub async fn unlink(&self, place_id: Uuid, amenity_id: Uuid) -> Result<(), AppError> {
        let place = self.require_place(place_id).await?;
        let amenity = self.require_amenity(amenity_id).await?;

        if !self.store.unlink_amenity(place.id, amenity.id).await? {
            return Err(AppError::NotFound(format!(
                "Amenity {} is not linked to place {}",
                amenity.id, place.id
            )));
        }

        tracing::info!(place_id = %place.id, amenity_id = %amenity.id, "Amenity unlinked");
        Ok(())
    }

    async fn require_place(&self, id: Uuid) -> Result<Place, AppError> {
        self.store
            .get_place(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Place not found: {id}")))
    }

    async fn require_amenity(&self, id: Uuid) -> Result<Amenity, AppError> {
        self.store
            .get_amenity(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Amenity not found: {id}")))
    }
}

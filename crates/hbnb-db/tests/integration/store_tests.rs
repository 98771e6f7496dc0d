use hbnb_core::models::{MAX_NAME_LEN, NewAmenity};
use hbnb_core::testutil::{new_user, seed_amenity, seed_place, seed_user};
use hbnb_core::{AmenityStore, AppError, PlaceStore, Storage, UserStore};
use uuid::Uuid;

use crate::common::setup_test_store;

#[tokio::test]
async fn health_check_succeeds() {
    let (store, _container) = setup_test_store().await;
    store.health_check().await.unwrap();
}

#[tokio::test]
async fn user_lookup_by_id_and_email() {
    let (store, _container) = setup_test_store().await;
    let user = seed_user(&store, "ana@example.com").await;

    let by_id = store.get_user(user.id).await.unwrap().expect("by id");
    let by_email = store
        .find_user_by_email("ana@example.com")
        .await
        .unwrap()
        .expect("by email");

    assert_eq!(by_id.email, "ana@example.com");
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.password_hash, user.password_hash);
    assert!(store.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_validation_error() {
    let (store, _container) = setup_test_store().await;
    seed_user(&store, "dup@example.com").await;

    let err = store
        .create_user(&new_user("dup@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn link_is_idempotent_and_ordered() {
    let (store, _container) = setup_test_store().await;
    let owner = seed_user(&store, "host@example.com").await;
    let place = seed_place(&store, owner.id, "Cabin").await;
    let wifi = seed_amenity(&store, "Wifi").await;
    let pool = seed_amenity(&store, "Pool").await;

    assert!(store.link_amenity(place.id, pool.id).await.unwrap());
    assert!(store.link_amenity(place.id, wifi.id).await.unwrap());
    assert!(!store.link_amenity(place.id, pool.id).await.unwrap());

    let ids: Vec<Uuid> = store
        .place_amenities(place.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![pool.id, wifi.id]);
}

#[tokio::test]
async fn unlink_only_removes_existing_links() {
    let (store, _container) = setup_test_store().await;
    let owner = seed_user(&store, "host@example.com").await;
    let place = seed_place(&store, owner.id, "Cabin").await;
    let wifi = seed_amenity(&store, "Wifi").await;

    assert!(!store.unlink_amenity(place.id, wifi.id).await.unwrap());
    store.link_amenity(place.id, wifi.id).await.unwrap();
    assert!(store.unlink_amenity(place.id, wifi.id).await.unwrap());
    assert!(store.place_amenities(place.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deletes_cascade() {
    let (store, _container) = setup_test_store().await;
    let owner = seed_user(&store, "host@example.com").await;
    let place = seed_place(&store, owner.id, "Cabin").await;
    let wifi = seed_amenity(&store, "Wifi").await;
    store.link_amenity(place.id, wifi.id).await.unwrap();

    assert!(store.delete_amenity(wifi.id).await.unwrap());
    assert!(store.place_amenities(place.id).await.unwrap().is_empty());

    assert!(store.delete_user(owner.id).await.unwrap());
    assert!(store.get_place(place.id).await.unwrap().is_none());
    assert!(!store.delete_user(owner.id).await.unwrap());
}

#[tokio::test]
async fn place_with_unknown_owner_is_not_found() {
    let (store, _container) = setup_test_store().await;

    let err = store
        .create_place(&hbnb_core::testutil::new_place(Uuid::new_v4(), "Orphan"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn over_long_name_is_validation_error() {
    let (store, _container) = setup_test_store().await;

    let err = store
        .create_amenity(&NewAmenity {
            name: "x".repeat(MAX_NAME_LEN + 1),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(store.list_amenities().await.unwrap().is_empty());
}

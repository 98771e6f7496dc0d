pub mod auth;
pub mod error;
pub mod linking;
pub mod memory;
pub mod models;
pub mod password;
pub mod testutil;
pub mod token;
pub mod traits;

pub use auth::{AuthService, Registration};
pub use error::AppError;
pub use linking::{LinkOutcome, PlaceAmenityService};
pub use memory::MemoryStore;
pub use models::{Amenity, NewAmenity, NewPlace, NewUser, Place, User, parse_id};
pub use token::{Claims, TokenIssuer};
pub use traits::{AmenityStore, PlaceStore, Storage, UserStore};

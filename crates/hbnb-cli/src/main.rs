use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use hbnb_core::{
    AmenityStore, LinkOutcome, NewAmenity, NewPlace, PlaceAmenityService, PlaceStore,
    Registration, UserStore,
};
use hbnb_db::{Database, DatabaseConfig, PgStore};

#[derive(Parser)]
#[command(name = "hbnb", version, about = "HBnB database administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Register a user account
    CreateUser {
        #[arg(long)]
        email: String,

        /// Plaintext password; stored as an Argon2 hash
        #[arg(long, env = "HBNB_USER_PASSWORD")]
        password: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },

    /// Add an amenity to the catalogue
    CreateAmenity {
        #[arg(long)]
        name: String,
    },

    /// Create a place owned by an existing user
    CreatePlace {
        /// Email of the owning user
        #[arg(long)]
        owner_email: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, default_value_t = 0)]
        number_rooms: i32,

        #[arg(long, default_value_t = 0)]
        number_bathrooms: i32,

        #[arg(long, default_value_t = 0)]
        max_guest: i32,

        #[arg(long, default_value_t = 0)]
        price_by_night: i32,
    },

    /// Link an amenity to a place (no-op if already linked)
    Link {
        /// Place ID
        #[arg(long)]
        place: Uuid,

        /// Amenity ID
        #[arg(long)]
        amenity: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hbnb=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = connect_db().await?;

    match cli.command {
        Commands::Migrate => {
            // connect_db already migrated
            println!("Database is up to date");
        }
        Commands::CreateUser {
            email,
            password,
            first_name,
            last_name,
        } => {
            let registration = Registration {
                email,
                password,
                first_name,
                last_name,
            };
            let user = store
                .create_user(&registration.into_new_user()?)
                .await
                .context("Failed to create user")?;
            println!("{}", user.id);
        }
        Commands::CreateAmenity { name } => {
            let amenity = store
                .create_amenity(&NewAmenity { name })
                .await
                .context("Failed to create amenity")?;
            println!("{}", amenity.id);
        }
        Commands::CreatePlace {
            owner_email,
            name,
            description,
            number_rooms,
            number_bathrooms,
            max_guest,
            price_by_night,
        } => {
            let owner = store
                .find_user_by_email(&owner_email)
                .await?
                .with_context(|| format!("No user with email {owner_email}"))?;

            let place = store
                .create_place(&NewPlace {
                    user_id: owner.id,
                    name,
                    description,
                    number_rooms,
                    number_bathrooms,
                    max_guest,
                    price_by_night,
                    ..Default::default()
                })
                .await
                .context("Failed to create place")?;
            println!("{}", place.id);
        }
        Commands::Link { place, amenity } => {
            let outcome = PlaceAmenityService::new(store).link(place, amenity).await?;
            match outcome {
                LinkOutcome::Linked(a) => println!("Linked {} ({})", a.name, a.id),
                LinkOutcome::AlreadyLinked(a) => println!("Already linked: {} ({})", a.name, a.id),
            }
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using `DATABASE_URL` and apply migrations.
async fn connect_db() -> Result<PgStore> {
    let config = DatabaseConfig::from_env().context("DATABASE_URL not set")?;
    let db = Database::open(&config)
        .await
        .context("Failed to open database")?;

    Ok(db.store())
}

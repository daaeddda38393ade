//! Client for the Pet Shop HTTP API
//!
//! | Operation    | Request                     |
//! |--------------|-----------------------------|
//! | list owners  | `GET /owners`               |
//! | create owner | `POST /owners` (JSON)       |
//! | list pets    | `GET /pets`                 |
//! | create pet   | `POST /pets` (multipart)    |
//! | pet photo    | `GET /images/{filename}`    |

mod client;
pub mod response;

use std::path::PathBuf;

pub use client::{ApiClient, photo_url};

use crate::models::{NewOwner, NewPet, Owner, Pet, RecordKind, SchemaError};

/// Everything that can go wrong talking to the API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, timeout or body transfer failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The body was not JSON at all
    #[error("API did not return valid JSON. Response: {body}")]
    InvalidJson { body: String },

    /// The body was JSON but not an array
    #[error("API did not return a list of {record}s. Got: {got}")]
    NotAList { record: RecordKind, got: String },

    /// The array did not match the record schema
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A single created record could not be decoded
    #[error("Unexpected response from API: {0}")]
    Decode(String),

    /// The photo chosen for upload could not be read
    #[error("Could not read photo {}: {source}", .path.display())]
    Photo {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Operations the Pet Shop API offers to this client
#[allow(async_fn_in_trait)]
pub trait PetShopApi {
    /// List every owner
    async fn fetch_owners(&self) -> Result<Vec<Owner>, ApiError>;

    /// Create an owner and return it with its assigned identifier
    async fn create_owner(&self, owner: &NewOwner) -> Result<Owner, ApiError>;

    /// List every pet
    async fn fetch_pets(&self) -> Result<Vec<Pet>, ApiError>;

    /// Create a pet, uploading its photo when one was chosen
    async fn create_pet(&self, pet: &NewPet) -> Result<Pet, ApiError>;

    /// Download a stored pet photo
    async fn fetch_photo(&self, filename: &str) -> Result<Vec<u8>, ApiError>;
}

/// Fetch pets and owners concurrently.
///
/// Both must succeed; the first failure wins and the other result is
/// discarded.
pub async fn fetch_pets_with_owners<A: PetShopApi>(
    api: &A,
) -> Result<(Vec<Pet>, Vec<Owner>), ApiError> {
    tokio::try_join!(api.fetch_pets(), api.fetch_owners())
}

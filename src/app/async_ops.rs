//! Async operations for the TUI
//!
//! Uses channels to communicate between the sync TUI loop and async tasks.
//! Every command runs in its own task so a slow create never holds up a
//! list fetch. Results carry the mount id they were issued for.

use std::path::PathBuf;

use image::DynamicImage;
use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiError, PetShopApi, fetch_pets_with_owners};
use crate::images;
use crate::models::{NewOwner, NewPet, Owner, Pet};

use super::list::MountId;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum AsyncCommand {
    /// Fetch the owner list for a mounted owner view
    LoadOwners { mount: MountId },
    /// Fetch pets and owners together for a mounted pet view
    LoadPets { mount: MountId },
    /// Fetch the owners offered by the pet form
    LoadOwnerChoices { mount: MountId },
    /// Create an owner
    CreateOwner { owner: NewOwner },
    /// Create a pet, uploading its photo if chosen
    CreatePet { pet: NewPet },
    /// Download and decode a pet photo
    LoadPhoto { mount: MountId, filename: String },
    /// Read and decode the local file chosen in the pet form
    LoadPreview { path: PathBuf },
    /// Shutdown the worker
    Shutdown,
}

/// Results sent back from the async worker to the TUI
#[derive(Debug)]
pub enum AsyncResult {
    OwnersLoaded {
        mount: MountId,
        result: Result<Vec<Owner>, String>,
    },
    PetsLoaded {
        mount: MountId,
        result: Result<(Vec<Pet>, Vec<Owner>), String>,
    },
    OwnerChoicesLoaded {
        mount: MountId,
        result: Result<Vec<Owner>, String>,
    },
    OwnerCreated { result: Result<Owner, String> },
    PetCreated { result: Result<Pet, String> },
    PhotoLoaded {
        mount: MountId,
        filename: String,
        result: Result<DynamicImage, String>,
    },
    PreviewLoaded {
        path: PathBuf,
        result: Result<DynamicImage, String>,
    },
}

/// Channel handles for communicating with the async worker
pub struct AsyncHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<AsyncCommand>,
    /// Receive results from the worker
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

fn message<T>(result: Result<T, ApiError>) -> Result<T, String> {
    result.map_err(|e| {
        tracing::debug!("request failed: {e:?}");
        e.to_string()
    })
}

/// Spawn the async worker and return handles
pub fn spawn_worker(client: ApiClient) -> AsyncHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AsyncCommand>(32);
    let (result_tx, result_rx) = mpsc::channel::<AsyncResult>(32);

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            if matches!(cmd, AsyncCommand::Shutdown) {
                break;
            }
            let client = client.clone();
            let result_tx = result_tx.clone();
            tokio::spawn(async move {
                if let Some(result) = execute(&client, cmd).await {
                    let _ = result_tx.send(result).await;
                }
            });
        }
    });

    AsyncHandle { cmd_tx, result_rx }
}

async fn execute(client: &ApiClient, cmd: AsyncCommand) -> Option<AsyncResult> {
    let result = match cmd {
        AsyncCommand::LoadOwners { mount } => AsyncResult::OwnersLoaded {
            mount,
            result: message(client.fetch_owners().await),
        },
        AsyncCommand::LoadPets { mount } => AsyncResult::PetsLoaded {
            mount,
            result: message(fetch_pets_with_owners(client).await),
        },
        AsyncCommand::LoadOwnerChoices { mount } => AsyncResult::OwnerChoicesLoaded {
            mount,
            result: message(client.fetch_owners().await),
        },
        AsyncCommand::CreateOwner { owner } => AsyncResult::OwnerCreated {
            result: message(client.create_owner(&owner).await),
        },
        AsyncCommand::CreatePet { pet } => AsyncResult::PetCreated {
            result: message(client.create_pet(&pet).await),
        },
        AsyncCommand::LoadPhoto { mount, filename } => {
            let result = load_photo(client, &filename).await;
            AsyncResult::PhotoLoaded {
                mount,
                filename,
                result,
            }
        }
        AsyncCommand::LoadPreview { path } => {
            let result = load_preview(&path).await;
            AsyncResult::PreviewLoaded { path, result }
        }
        AsyncCommand::Shutdown => return None,
    };
    Some(result)
}

async fn load_photo(client: &ApiClient, filename: &str) -> Result<DynamicImage, String> {
    let bytes = message(client.fetch_photo(filename).await)?;
    decode(bytes).await
}

async fn load_preview(path: &std::path::Path) -> Result<DynamicImage, String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    decode(bytes).await
}

async fn decode(bytes: Vec<u8>) -> Result<DynamicImage, String> {
    tokio::task::spawn_blocking(move || images::decode_photo(&bytes))
        .await
        .map_err(|e| format!("Photo decoding aborted: {e}"))?
        .map_err(|e| format!("Could not decode photo: {e}"))
}

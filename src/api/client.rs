//! reqwest-backed implementation of [`PetShopApi`]

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};

use super::response::{check_photo, parse_created, parse_owner_list, parse_pet_list};
use super::{ApiError, PetShopApi};
use crate::config::Config;
use crate::models::{NewOwner, NewPet, Owner, Pet, RecordKind};

/// Public URL of a stored pet photo under an API root
pub fn photo_url(base_url: &str, filename: &str) -> String {
    format!(
        "{}/images/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(filename)
    )
}

/// Pet Shop API client.
///
/// Cheap to clone; clones share one connection pool. Every call is a fresh
/// round trip with no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("petshop/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// The API root this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Public URL of a stored pet photo
    pub fn photo_url(&self, filename: &str) -> String {
        photo_url(&self.base_url, filename)
    }

    async fn read(response: Response) -> Result<(u16, String), ApiError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    async fn multipart_form(pet: &NewPet) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in pet.form_fields() {
            form = form.text(name, value);
        }

        if let Some(photo) = &pet.photo {
            let bytes = tokio::fs::read(&photo.path)
                .await
                .map_err(|source| ApiError::Photo {
                    path: photo.path.clone(),
                    source,
                })?;
            let part = Part::bytes(bytes)
                .file_name(photo.file_name.clone())
                .mime_str(photo.mime_type())?;
            form = form.part("photo", part);
        }
        Ok(form)
    }

    async fn post_pet(&self, url: &str, pet: &NewPet) -> Result<Response, ApiError> {
        let form = Self::multipart_form(pet).await?;
        Ok(self.client.post(url).multipart(form).send().await?)
    }
}

/// Where a 307/308 answer asks for the request to be repeated.
///
/// reqwest follows these itself only when the body can be replayed, which a
/// multipart upload cannot.
fn replay_target(response: &Response) -> Option<Url> {
    if !matches!(
        response.status(),
        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
    ) {
        return None;
    }
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)?
        .to_str()
        .ok()?;
    response.url().join(location).ok()
}

impl PetShopApi for ApiClient {
    async fn fetch_owners(&self) -> Result<Vec<Owner>, ApiError> {
        let url = self.url("/owners");
        tracing::debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let (status, body) = Self::read(response).await?;
        parse_owner_list(status, &body)
    }

    async fn create_owner(&self, owner: &NewOwner) -> Result<Owner, ApiError> {
        let url = self.url("/owners");
        tracing::debug!("POST {url}");

        let response = self.client.post(&url).json(owner).send().await?;
        let (status, body) = Self::read(response).await?;
        let created: Owner = parse_created(status, &body, RecordKind::Owner)?;

        tracing::info!(id = created.id, "created owner");
        Ok(created)
    }

    async fn fetch_pets(&self) -> Result<Vec<Pet>, ApiError> {
        let url = self.url("/pets");
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let (status, body) = Self::read(response).await?;
        parse_pet_list(status, &body)
    }

    async fn create_pet(&self, pet: &NewPet) -> Result<Pet, ApiError> {
        let url = self.url("/pets");
        tracing::debug!(with_photo = pet.photo.is_some(), "POST {url}");

        let mut response = self.post_pet(&url, pet).await?;
        if let Some(target) = replay_target(&response) {
            tracing::debug!("POST {url} redirected to {target}, sending the form again");
            response = self.post_pet(target.as_str(), pet).await?;
        }
        let (status, body) = Self::read(response).await?;
        let created: Pet = parse_created(status, &body, RecordKind::Pet)?;

        tracing::info!(id = created.id, owner_id = created.owner_id, "created pet");
        Ok(created)
    }

    async fn fetch_photo(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.photo_url(filename);
        tracing::debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        check_photo(response.status().as_u16(), filename)?;
        Ok(response.bytes().await?.to_vec())
    }
}

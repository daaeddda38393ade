//! Pet records and the photo attachment used when creating one

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Record, non_empty};

/// An animal record referencing exactly one owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Server-assigned identifier
    pub id: i64,
    pub name: String,
    /// Free-text species; absent or null becomes an empty string
    #[serde(default, deserialize_with = "null_as_empty")]
    pub species: String,
    /// Identifier of the owning [`Owner`](super::Owner)
    pub owner_id: i64,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub is_vaccinated: Option<bool>,
    #[serde(default)]
    pub birthdate: Option<String>,
    /// Server-set creation timestamp
    #[serde(default)]
    pub date_added: Option<String>,
    /// Set by the server after a successful photo upload
    #[serde(default)]
    pub photo_filename: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Record for Pet {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Pet {
    /// Species for display, `None` when unknown
    pub fn species_label(&self) -> Option<&str> {
        if self.species.is_empty() {
            None
        } else {
            Some(&self.species)
        }
    }

    /// Photo filename, ignoring blank values
    pub fn photo(&self) -> Option<&str> {
        self.photo_filename.as_deref().filter(|f| !f.is_empty())
    }

    /// Creation timestamp formatted for humans.
    ///
    /// Falls back to the raw server text when it isn't a recognizable
    /// timestamp.
    pub fn date_added_display(&self) -> Option<String> {
        let raw = self.date_added.as_deref().filter(|d| !d.is_empty())?;
        let formatted = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .map(|dt| dt.format("%b %-d, %Y %H:%M").to_string());
        Some(formatted.unwrap_or_else(|_| raw.to_string()))
    }

    /// Labelled detail rows shown when the pet card is expanded
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        let mut text = |label: &'static str, value: &Option<String>| {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                rows.push((label, v.to_string()));
            }
        };
        text("Breed", &self.breed);
        text("Color", &self.color);

        if let Some(age) = self.age.filter(|a| *a != 0) {
            rows.push(("Age", format!("{age} year(s)")));
        }
        if let Some(weight) = self.weight.filter(|w| *w != 0.0) {
            rows.push(("Weight", format!("{weight} kg")));
        }
        if let Some(gender) = self.gender.as_deref().filter(|g| !g.is_empty()) {
            rows.push(("Gender", gender.to_string()));
        }
        if let Some(birthdate) = self.birthdate.as_deref().filter(|b| !b.is_empty()) {
            rows.push(("Birthdate", birthdate.to_string()));
        }
        if let Some(vaccinated) = self.is_vaccinated {
            rows.push(("Vaccinated", if vaccinated { "Yes" } else { "No" }.to_string()));
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            rows.push(("Description", description.to_string()));
        }
        if let Some(added) = self.date_added_display() {
            rows.push(("Added", added));
        }
        rows
    }
}

/// Gender choices offered by the pet form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Unset,
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Cycle forward through the choices
    pub const fn next(self) -> Self {
        match self {
            Self::Unset => Self::Male,
            Self::Male => Self::Female,
            Self::Female => Self::Unknown,
            Self::Unknown => Self::Unset,
        }
    }

    /// Cycle backward through the choices
    pub const fn prev(self) -> Self {
        match self {
            Self::Unset => Self::Unknown,
            Self::Male => Self::Unset,
            Self::Female => Self::Male,
            Self::Unknown => Self::Female,
        }
    }

    /// Wire value, `None` when no choice was made
    pub const fn as_wire(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Male => Some("male"),
            Self::Female => Some("female"),
            Self::Unknown => Some("unknown"),
        }
    }

    /// Parse a wire value
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Label for the form
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unset => "Not specified",
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

/// A local image file chosen for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    /// Where the bytes are read from at submit time
    pub path: PathBuf,
    /// Name sent as the multipart filename
    pub file_name: String,
}

/// Extensions the picker advertises; anything else is accepted with a hint
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

impl PhotoFile {
    /// Reference an existing regular file.
    ///
    /// Only existence is checked here; the server decides whether it
    /// accepts the content.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let file_name = path
            .file_name()
            .map_or_else(|| "photo".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
        })
    }

    fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    /// Whether the extension looks like an image (advisory only)
    pub fn looks_like_image(&self) -> bool {
        self.extension()
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
    }

    /// MIME type guessed from the extension
    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("tif" | "tiff") => "image/tiff",
            _ => "application/octet-stream",
        }
    }
}

/// Payload for `POST /pets`, sent as a multipart form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub owner_id: i64,
    pub species: Option<String>,
    pub age: Option<u32>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub description: Option<String>,
    pub gender: Option<String>,
    pub is_vaccinated: Option<bool>,
    pub birthdate: Option<String>,
    pub photo: Option<PhotoFile>,
}

impl NewPet {
    /// Create a payload with only the required fields set
    pub fn new(name: impl Into<String>, owner_id: i64) -> Self {
        Self {
            name: name.into(),
            owner_id,
            ..Default::default()
        }
    }

    /// Scalar multipart fields in wire order.
    ///
    /// `name` and `owner_id` are always present; every other field appears
    /// only when it carries a value. The photo is not included here.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("owner_id", self.owner_id.to_string()),
        ];
        let text = |v: &Option<String>| v.as_deref().and_then(non_empty);

        if let Some(species) = text(&self.species) {
            fields.push(("species", species));
        }
        if let Some(age) = self.age {
            fields.push(("age", age.to_string()));
        }
        if let Some(breed) = text(&self.breed) {
            fields.push(("breed", breed));
        }
        if let Some(color) = text(&self.color) {
            fields.push(("color", color));
        }
        if let Some(weight) = self.weight {
            fields.push(("weight", weight.to_string()));
        }
        if let Some(description) = text(&self.description) {
            fields.push(("description", description));
        }
        if let Some(gender) = text(&self.gender) {
            fields.push(("gender", gender));
        }
        if let Some(vaccinated) = self.is_vaccinated {
            fields.push(("is_vaccinated", vaccinated.to_string()));
        }
        if let Some(birthdate) = text(&self.birthdate) {
            fields.push(("birthdate", birthdate));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet() -> Pet {
        serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Rex",
            "owner_id": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_species_becomes_empty() {
        let pet = pet();
        assert_eq!(pet.species, "");
        assert_eq!(pet.species_label(), None);
    }

    #[test]
    fn test_null_species_becomes_empty() {
        let pet: Pet = serde_json::from_value(serde_json::json!({
            "id": 3, "name": "Rex", "owner_id": 1, "species": null
        }))
        .unwrap();
        assert_eq!(pet.species, "");
    }

    #[test]
    fn test_detail_rows_hide_zero_age_and_weight() {
        let mut pet = pet();
        pet.age = Some(0);
        pet.weight = Some(0.0);
        pet.is_vaccinated = Some(false);
        let rows = pet.detail_rows();
        assert_eq!(rows, vec![("Vaccinated", "No".to_string())]);

        pet.age = Some(4);
        pet.weight = Some(12.5);
        let rows = pet.detail_rows();
        assert!(rows.contains(&("Age", "4 year(s)".to_string())));
        assert!(rows.contains(&("Weight", "12.5 kg".to_string())));
    }

    #[test]
    fn test_date_added_formatting() {
        let mut pet = pet();
        pet.date_added = Some("2024-05-14T09:30:00".to_string());
        assert_eq!(pet.date_added_display().as_deref(), Some("May 14, 2024 09:30"));

        pet.date_added = Some("yesterday".to_string());
        assert_eq!(pet.date_added_display().as_deref(), Some("yesterday"));
    }

    #[test]
    fn test_form_fields_only_required() {
        let fields = NewPet::new("Rex", 7).form_fields();
        assert_eq!(
            fields,
            vec![("name", "Rex".to_string()), ("owner_id", "7".to_string())]
        );
    }

    #[test]
    fn test_form_fields_include_present_values() {
        let pet = NewPet {
            species: Some("dog".to_string()),
            breed: Some(String::new()),
            age: Some(3),
            weight: Some(4.5),
            is_vaccinated: Some(false),
            ..NewPet::new("Rex", 7)
        };
        let names: Vec<_> = pet.form_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            vec!["name", "owner_id", "species", "age", "weight", "is_vaccinated"]
        );
    }

    #[test]
    fn test_gender_cycle() {
        assert_eq!(Gender::Unset.next().as_wire(), Some("male"));
        assert_eq!(Gender::Unset.prev(), Gender::Unknown);
        assert_eq!(Gender::from_wire("Female"), Some(Gender::Female));
    }

    #[test]
    fn test_photo_file_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PhotoFile::from_path(dir.path()).is_err());
        assert!(PhotoFile::from_path(dir.path().join("missing.png")).is_err());

        let path = dir.path().join("Rex.JPG");
        std::fs::write(&path, b"not really a jpeg").unwrap();
        let photo = PhotoFile::from_path(&path).unwrap();
        assert_eq!(photo.file_name, "Rex.JPG");
        assert!(photo.looks_like_image());
        assert_eq!(photo.mime_type(), "image/jpeg");
    }
}

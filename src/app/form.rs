//! Create forms for owners and pets.
//!
//! Forms hold uncommitted input until submit. A submission is single-flight:
//! while one is outstanding further submits are ignored. On success every
//! field is cleared and the `on_created` callback runs exactly once; on
//! failure the message is kept and the input is left intact for a retry.

use std::path::{Path, PathBuf};

use crate::models::{Gender, NewOwner, NewPet, Owner, Pet, PhotoFile, non_empty};

use super::list::{LoadState, MountId, PhotoSlot};
use super::photo::{PhotoChange, PhotoUpload};

/// A single-line text input
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

impl TextField {
    const fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            required: false,
        }
    }

    const fn required(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            required: true,
        }
    }

    /// Trimmed value, `None` when blank
    pub fn optional(&self) -> Option<String> {
        non_empty(&self.value)
    }

    fn is_missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }
}

/// Submission state shared by both forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStatus {
    submitting: bool,
    /// Last failure, shown under the fields
    pub error: Option<String>,
}

impl FormStatus {
    /// Whether a submission is in flight (submit control disabled)
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(super) fn begin(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    fn reject(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    fn finish<T>(&mut self, result: &Result<T, String>) {
        self.submitting = false;
        self.error = result.as_ref().err().cloned();
    }
}

/// Fields of the owner form, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerField {
    Name,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Country,
    DateOfBirth,
    Submit,
}

impl OwnerField {
    /// Every focus stop, in order
    pub const ALL: [Self; 10] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::Country,
        Self::DateOfBirth,
        Self::Submit,
    ];
}

/// Input state of the add-owner form
#[derive(Debug, Clone)]
pub struct OwnerForm {
    /// Text inputs, indexed like [`OwnerField::ALL`]
    pub fields: [TextField; 9],
    focus: usize,
    pub status: FormStatus,
}

impl Default for OwnerForm {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerForm {
    /// Empty form with focus on the name
    pub const fn new() -> Self {
        Self {
            fields: [
                TextField::required("Name"),
                TextField::new("Email"),
                TextField::new("Phone"),
                TextField::new("Address"),
                TextField::new("City"),
                TextField::new("State"),
                TextField::new("ZIP Code"),
                TextField::new("Country"),
                TextField::new("Date of Birth"),
            ],
            focus: 0,
            status: FormStatus {
                submitting: false,
                error: None,
            },
        }
    }

    /// Field with focus
    pub const fn focused(&self) -> OwnerField {
        OwnerField::ALL[self.focus]
    }

    /// Move focus down, wrapping
    pub const fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % OwnerField::ALL.len();
    }

    /// Move focus up, wrapping
    pub const fn focus_prev(&mut self) {
        self.focus = (self.focus + OwnerField::ALL.len() - 1) % OwnerField::ALL.len();
    }

    fn focused_text(&mut self) -> Option<&mut TextField> {
        self.fields.get_mut(self.focus)
    }

    /// Type into the focused field
    pub fn input(&mut self, c: char) {
        if let Some(field) = self.focused_text() {
            field.value.push(c);
        }
    }

    /// Paste text into the focused field (newlines dropped)
    pub fn paste(&mut self, text: &str) {
        if let Some(field) = self.focused_text() {
            field.value.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_text() {
            field.value.pop();
        }
    }

    /// Payload for the current input
    pub fn to_new_owner(&self) -> NewOwner {
        let [name, email, phone, address, city, state, zip_code, country, date_of_birth] =
            &self.fields;
        NewOwner {
            name: name.value.trim().to_string(),
            email: email.optional(),
            phone: phone.optional(),
            address: address.optional(),
            city: city.optional(),
            state: state.optional(),
            zip_code: zip_code.optional(),
            country: country.optional(),
            date_of_birth: date_of_birth.optional(),
        }
    }

    /// Start a submission.
    ///
    /// Returns `None` while a submission is already in flight or when the
    /// required name is blank.
    pub fn submit(&mut self) -> Option<NewOwner> {
        if self.status.is_submitting() {
            return None;
        }
        if let Some(missing) = self.fields.iter().find(|f| f.is_missing()) {
            self.status.reject(format!("{} is required", missing.label));
            return None;
        }
        self.status.begin();
        Some(self.to_new_owner())
    }

    /// Finish the outstanding submission
    pub fn complete(&mut self, result: Result<Owner, String>, on_created: impl FnOnce(&Owner)) {
        self.status.finish(&result);
        if let Ok(owner) = result {
            for field in &mut self.fields {
                field.value.clear();
            }
            self.focus = 0;
            on_created(&owner);
        }
    }
}

/// Fields of the pet form, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetField {
    Name,
    Species,
    Owner,
    Age,
    Breed,
    Color,
    Weight,
    Birthdate,
    Gender,
    Description,
    Vaccinated,
    Photo,
    Submit,
}

impl PetField {
    /// Every focus stop, in order
    pub const ALL: [Self; 13] = [
        Self::Name,
        Self::Species,
        Self::Owner,
        Self::Age,
        Self::Breed,
        Self::Color,
        Self::Weight,
        Self::Birthdate,
        Self::Gender,
        Self::Description,
        Self::Vaccinated,
        Self::Photo,
        Self::Submit,
    ];
}

/// Input state of the add-pet form
pub struct PetForm {
    mount: MountId,
    pub name: TextField,
    pub species: TextField,
    /// Owners offered for selection, fetched when the form mounts
    pub owner_choices: LoadState<Owner>,
    /// Index into the loaded owner choices
    pub owner_index: Option<usize>,
    /// Owner to reselect once a reload of the choices lands
    keep_owner: Option<i64>,
    pub age: TextField,
    pub breed: TextField,
    pub color: TextField,
    pub weight: TextField,
    pub birthdate: TextField,
    pub gender: Gender,
    pub description: TextField,
    pub vaccinated: bool,
    pub photo: Option<PhotoFile>,
    /// Decoded preview of `photo`, when previews are on
    pub preview: Option<PhotoSlot>,
    pub photo_zone: PhotoUpload,
    focus: usize,
    pub status: FormStatus,
}

impl PetForm {
    /// Mount an empty form; owner choices start loading
    pub fn mount(mount: MountId) -> Self {
        Self {
            mount,
            name: TextField::required("Name"),
            species: TextField::required("Species"),
            owner_choices: LoadState::Loading,
            owner_index: None,
            keep_owner: None,
            age: TextField::new("Age (years)"),
            breed: TextField::new("Breed"),
            color: TextField::new("Color"),
            weight: TextField::new("Weight (kg)"),
            birthdate: TextField::new("Birthdate"),
            gender: Gender::Unset,
            description: TextField::new("Description"),
            vaccinated: false,
            photo: None,
            preview: None,
            photo_zone: PhotoUpload::default(),
            focus: 0,
            status: FormStatus::default(),
        }
    }

    /// Mount id of the current owner-choices fetch
    pub const fn mount_id(&self) -> MountId {
        self.mount
    }

    /// Refetch the owner choices, keeping the rest of the input.
    ///
    /// The chosen owner stays chosen if the fresh list still has it.
    pub fn reload_owners(&mut self, mount: MountId) {
        if let Some(owner) = self.selected_owner() {
            self.keep_owner = Some(owner.id);
        }
        self.mount = mount;
        self.owner_choices = LoadState::Loading;
        self.owner_index = None;
    }

    /// Apply the owner-choices fetch for this mount
    pub fn resolve_owners(&mut self, mount: MountId, result: Result<Vec<Owner>, String>) -> bool {
        if mount != self.mount || !matches!(self.owner_choices, LoadState::Loading) {
            return false;
        }
        match result {
            Ok(owners) => {
                self.owner_index = self
                    .keep_owner
                    .take()
                    .and_then(|id| owners.iter().position(|o| o.id == id));
                self.owner_choices = LoadState::Loaded(owners);
            }
            Err(message) => {
                self.keep_owner = None;
                self.status.error = Some(message.clone());
                self.owner_choices = LoadState::Error(message);
            }
        }
        true
    }

    fn owners(&self) -> &[Owner] {
        match &self.owner_choices {
            LoadState::Loaded(owners) => owners,
            _ => &[],
        }
    }

    /// Currently selected owner
    pub fn selected_owner(&self) -> Option<&Owner> {
        self.owner_index.and_then(|i| self.owners().get(i))
    }

    /// Select the next owner (from "no selection" to the first)
    pub fn next_owner(&mut self) {
        let len = self.owners().len();
        if len == 0 {
            return;
        }
        self.owner_index = match self.owner_index {
            None => Some(0),
            Some(i) if i + 1 < len => Some(i + 1),
            Some(_) => None,
        };
    }

    /// Select the previous owner
    pub fn prev_owner(&mut self) {
        let len = self.owners().len();
        if len == 0 {
            return;
        }
        self.owner_index = match self.owner_index {
            None => Some(len - 1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Field with focus
    pub const fn focused(&self) -> PetField {
        PetField::ALL[self.focus]
    }

    fn set_focus(&mut self, focus: usize) {
        if self.focused() == PetField::Photo {
            self.photo_zone.drag_leave();
        }
        self.focus = focus;
        if self.focused() == PetField::Photo {
            self.photo_zone.drag_enter();
        }
    }

    /// Move focus down, wrapping
    pub fn focus_next(&mut self) {
        self.set_focus((self.focus + 1) % PetField::ALL.len());
    }

    /// Move focus up, wrapping
    pub fn focus_prev(&mut self) {
        self.set_focus((self.focus + PetField::ALL.len() - 1) % PetField::ALL.len());
    }

    fn focused_text(&mut self) -> Option<&mut TextField> {
        match self.focused() {
            PetField::Name => Some(&mut self.name),
            PetField::Species => Some(&mut self.species),
            PetField::Age => Some(&mut self.age),
            PetField::Breed => Some(&mut self.breed),
            PetField::Color => Some(&mut self.color),
            PetField::Weight => Some(&mut self.weight),
            PetField::Birthdate => Some(&mut self.birthdate),
            PetField::Description => Some(&mut self.description),
            PetField::Owner
            | PetField::Gender
            | PetField::Vaccinated
            | PetField::Photo
            | PetField::Submit => None,
        }
    }

    /// Type into the focused text field
    pub fn input(&mut self, c: char) {
        if let Some(field) = self.focused_text() {
            field.value.push(c);
        }
    }

    /// Delete the last character of the focused text field
    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_text() {
            field.value.pop();
        }
    }

    /// Handle pasted text: a drop on the photo zone or text for a field
    pub fn paste(&mut self, text: &str) -> Option<&PhotoFile> {
        if self.focused() == PetField::Photo {
            let change = self.photo_zone.drop_text(text);
            // Still focused, so keep the zone armed for another drop
            self.photo_zone.drag_enter();
            self.apply_photo(change?);
            return self.photo.as_ref();
        }
        if let Some(field) = self.focused_text() {
            field.value.extend(text.chars().filter(|c| !c.is_control()));
        }
        None
    }

    /// Record what the drop zone reported; any old preview is dropped
    pub fn apply_photo(&mut self, change: PhotoChange) {
        self.preview = None;
        self.photo = match change {
            PhotoChange::Selected(photo) => Some(photo),
            PhotoChange::Cleared => None,
        };
    }

    /// Mark the preview of the chosen photo as loading.
    ///
    /// Returns the file to decode, or `None` when there is no photo or its
    /// preview was already requested.
    pub fn request_preview(&mut self) -> Option<PathBuf> {
        if self.preview.is_some() {
            return None;
        }
        let path = self.photo.as_ref()?.path.clone();
        self.preview = Some(PhotoSlot::Loading);
        Some(path)
    }

    /// Store a decoded preview if `path` is still the chosen photo
    pub fn store_preview(&mut self, path: &Path, slot: PhotoSlot) -> bool {
        if self.photo.as_ref().is_none_or(|p| p.path != path) {
            return false;
        }
        self.preview = Some(slot);
        true
    }

    fn parse_number<T: std::str::FromStr>(field: &TextField) -> Result<Option<T>, String> {
        match field.optional() {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| format!("{} must be a number", field.label)),
        }
    }

    /// Build the payload, or explain what blocks submission
    pub fn to_new_pet(&self) -> Result<NewPet, String> {
        if let Some(missing) = [&self.name, &self.species].into_iter().find(|f| f.is_missing()) {
            return Err(format!("{} is required", missing.label));
        }
        let owner = self.selected_owner().ok_or("Select an owner")?;
        let age: Option<u32> = Self::parse_number(&self.age)?;
        let weight: Option<f64> = Self::parse_number(&self.weight)?;
        if weight.is_some_and(|w| !w.is_finite()) {
            return Err(format!("{} must be a number", self.weight.label));
        }
        if weight.is_some_and(|w| w < 0.0) {
            return Err(format!("{} must not be negative", self.weight.label));
        }

        Ok(NewPet {
            name: self.name.value.trim().to_string(),
            owner_id: owner.id,
            species: self.species.optional(),
            age,
            breed: self.breed.optional(),
            color: self.color.optional(),
            weight,
            description: self.description.optional(),
            gender: self.gender.as_wire().map(str::to_string),
            is_vaccinated: Some(self.vaccinated),
            birthdate: self.birthdate.optional(),
            photo: self.photo.clone(),
        })
    }

    /// Start a submission; `None` while one is in flight or input is invalid
    pub fn submit(&mut self) -> Option<NewPet> {
        if self.status.is_submitting() {
            return None;
        }
        match self.to_new_pet() {
            Ok(pet) => {
                self.status.begin();
                Some(pet)
            }
            Err(message) => {
                self.status.reject(message);
                None
            }
        }
    }

    /// Finish the outstanding submission
    pub fn complete(&mut self, result: Result<Pet, String>, on_created: impl FnOnce(&Pet)) {
        self.status.finish(&result);
        if let Ok(pet) = result {
            for field in [
                &mut self.name,
                &mut self.species,
                &mut self.age,
                &mut self.breed,
                &mut self.color,
                &mut self.weight,
                &mut self.birthdate,
                &mut self.description,
            ] {
                field.value.clear();
            }
            self.owner_index = None;
            self.gender = Gender::Unset;
            self.vaccinated = false;
            self.photo = None;
            self.preview = None;
            self.photo_zone = PhotoUpload::default();
            self.set_focus(0);
            on_created(&pet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(id: i64, name: &str) -> Owner {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    fn type_str(form: &mut OwnerForm, s: &str) {
        for c in s.chars() {
            form.input(c);
        }
    }

    #[test]
    fn test_owner_form_name_only_submission() {
        let mut form = OwnerForm::new();
        type_str(&mut form, "Ada");

        let payload = form.submit().unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({ "name": "Ada" })
        );
        assert!(form.status.is_submitting());

        let mut created = 0;
        form.complete(Ok(owner(5, "Ada")), |o| {
            assert_eq!(o.id, 5);
            created += 1;
        });
        assert_eq!(created, 1);
        assert!(form.fields.iter().all(|f| f.value.is_empty()));
        assert!(!form.status.is_submitting());
        assert_eq!(form.status.error, None);
    }

    #[test]
    fn test_owner_form_single_flight() {
        let mut form = OwnerForm::new();
        type_str(&mut form, "Ada");
        assert!(form.submit().is_some());
        assert!(form.submit().is_none());
    }

    #[test]
    fn test_owner_form_failure_keeps_input() {
        let mut form = OwnerForm::new();
        type_str(&mut form, "Ada");
        form.focus_next();
        type_str(&mut form, "ada@example.com");
        form.submit().unwrap();

        let mut created = 0;
        form.complete(Err("Failed to create owner".to_string()), |_| created += 1);
        assert_eq!(created, 0);
        assert_eq!(form.status.error.as_deref(), Some("Failed to create owner"));
        assert_eq!(form.fields[0].value, "Ada");
        assert_eq!(form.fields[1].value, "ada@example.com");

        // Resubmission is allowed again
        assert!(form.submit().is_some());
    }

    #[test]
    fn test_owner_form_requires_name() {
        let mut form = OwnerForm::new();
        form.paste("   ");
        assert!(form.submit().is_none());
        assert_eq!(form.status.error.as_deref(), Some("Name is required"));
        assert!(!form.status.is_submitting());
    }

    #[test]
    fn test_owner_form_focus_wraps() {
        let mut form = OwnerForm::new();
        form.focus_prev();
        assert_eq!(form.focused(), OwnerField::Submit);
        form.input('x');
        assert!(form.fields.iter().all(|f| f.value.is_empty()));
        form.focus_next();
        assert_eq!(form.focused(), OwnerField::Name);
    }

    fn ready_pet_form() -> PetForm {
        let mut form = PetForm::mount(1);
        assert!(form.resolve_owners(1, Ok(vec![owner(1, "Ada"), owner(2, "Grace")])));
        form.name.value = "Rex".to_string();
        form.species.value = "dog".to_string();
        form.next_owner();
        form.next_owner();
        form
    }

    #[test]
    fn test_pet_form_without_photo() {
        let mut form = ready_pet_form();
        let pet = form.submit().unwrap();
        assert_eq!(pet.owner_id, 2);
        assert_eq!(pet.photo, None);
        assert_eq!(pet.is_vaccinated, Some(false));
        assert_eq!(pet.age, None);
    }

    #[test]
    fn test_pet_form_with_photo_and_success_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rex.png");
        std::fs::write(&path, b"png").unwrap();

        let mut form = ready_pet_form();
        while form.focused() != PetField::Photo {
            form.focus_next();
        }
        assert!(form.photo_zone.is_drag_active());
        assert!(form.paste(&path.display().to_string()).is_some());

        form.age.value = "3".to_string();
        form.vaccinated = true;
        let pet = form.submit().unwrap();
        assert_eq!(pet.photo.as_ref().map(|p| p.file_name.as_str()), Some("rex.png"));
        assert_eq!(pet.age, Some(3));

        let created: Pet = serde_json::from_value(serde_json::json!({
            "id": 10, "name": "Rex", "owner_id": 2, "photo_filename": "rex.png"
        }))
        .unwrap();
        let mut calls = 0;
        form.complete(Ok(created), |_| calls += 1);
        assert_eq!(calls, 1);
        assert!(form.photo.is_none());
        assert!(form.name.value.is_empty());
        assert!(!form.vaccinated);
        assert_eq!(form.selected_owner(), None);
        assert_eq!(form.focused(), PetField::Name);
    }

    #[test]
    fn test_pet_form_validation_messages() {
        let mut form = PetForm::mount(1);
        form.resolve_owners(1, Ok(vec![owner(1, "Ada")]));
        form.name.value = "Rex".to_string();
        assert!(form.submit().is_none());
        assert_eq!(form.status.error.as_deref(), Some("Species is required"));

        form.species.value = "dog".to_string();
        assert!(form.submit().is_none());
        assert_eq!(form.status.error.as_deref(), Some("Select an owner"));

        form.next_owner();
        form.weight.value = "heavy".to_string();
        assert!(form.submit().is_none());
        assert_eq!(form.status.error.as_deref(), Some("Weight (kg) must be a number"));

        form.weight.value = "-2".to_string();
        assert!(form.submit().is_none());
        assert_eq!(form.status.error.as_deref(), Some("Weight (kg) must not be negative"));

        for raw in ["NaN", "inf", "-infinity"] {
            form.weight.value = raw.to_string();
            assert!(form.submit().is_none());
            assert_eq!(form.status.error.as_deref(), Some("Weight (kg) must be a number"));
        }

        form.weight.value = String::new();
        form.age.value = "NaN".to_string();
        assert!(form.submit().is_none());
        assert_eq!(form.status.error.as_deref(), Some("Age (years) must be a number"));
        form.age.value = String::new();

        form.weight.value = "4.25".to_string();
        assert_eq!(form.submit().unwrap().weight, Some(4.25));
    }

    #[test]
    fn test_pet_form_owner_choices_failure() {
        let mut form = PetForm::mount(4);
        assert!(!form.resolve_owners(3, Ok(Vec::new())));
        assert!(form.resolve_owners(4, Err("Failed to fetch owners".to_string())));
        assert_eq!(form.status.error.as_deref(), Some("Failed to fetch owners"));
        form.next_owner();
        assert_eq!(form.selected_owner(), None);
    }

    #[test]
    fn test_owner_selection_cycles_through_none() {
        let mut form = PetForm::mount(1);
        form.resolve_owners(1, Ok(vec![owner(1, "Ada"), owner(2, "Grace")]));
        form.prev_owner();
        assert_eq!(form.selected_owner().map(|o| o.id), Some(2));
        form.next_owner();
        assert_eq!(form.selected_owner(), None);
        form.next_owner();
        assert_eq!(form.selected_owner().map(|o| o.id), Some(1));
    }

    #[test]
    fn test_reload_keeps_owner_still_listed() {
        let mut form = PetForm::mount(1);
        form.resolve_owners(1, Ok(vec![owner(1, "Ada"), owner(2, "Grace")]));
        form.next_owner();
        form.next_owner();

        form.reload_owners(2);
        assert_eq!(form.selected_owner(), None);
        form.resolve_owners(2, Ok(vec![owner(5, "Linus"), owner(1, "Ada"), owner(2, "Grace")]));
        assert_eq!(form.selected_owner().map(|o| o.id), Some(2));

        // Gone from the fresh list: nothing is selected
        form.reload_owners(3);
        form.resolve_owners(3, Ok(vec![owner(1, "Ada")]));
        assert_eq!(form.selected_owner(), None);
    }

    #[test]
    fn test_preview_follows_chosen_photo() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("rex.png");
        let second = dir.path().join("tom.png");
        std::fs::write(&first, b"a").unwrap();
        std::fs::write(&second, b"b").unwrap();

        let mut form = PetForm::mount(1);
        assert_eq!(form.request_preview(), None);

        form.apply_photo(PhotoChange::Selected(PhotoFile::from_path(&first).unwrap()));
        assert_eq!(form.request_preview(), Some(first.clone()));
        assert_eq!(form.request_preview(), None);
        assert!(matches!(form.preview, Some(PhotoSlot::Loading)));

        // A new choice replaces the pending preview; the old decode is ignored
        form.apply_photo(PhotoChange::Selected(PhotoFile::from_path(&second).unwrap()));
        assert!(form.preview.is_none());
        assert!(!form.store_preview(&first, PhotoSlot::Unavailable));
        assert_eq!(form.request_preview(), Some(second.clone()));
        assert!(form.store_preview(&second, PhotoSlot::Failed("bad".to_string())));

        form.apply_photo(PhotoChange::Cleared);
        assert!(form.preview.is_none());
        assert!(!form.store_preview(&second, PhotoSlot::Unavailable));
    }
}

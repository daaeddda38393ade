//! List view state: loading/error/loaded plus single-card expansion.
//!
//! A view is created fresh on every mount with a unique mount id. Fetch
//! results carry the id they were issued for; results for any other mount
//! are ignored, so a remount can never be overwritten by the fetch of the
//! view it replaced.

use std::collections::{HashMap, HashSet};

use ratatui_image::protocol::StatefulProtocol;

use crate::models::{Owner, Pet, Record};

/// Identifies one mount of a view
pub type MountId = u64;

/// Fetch lifecycle of a mounted list
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Initial state, fetch in flight
    Loading,
    /// Fetch or validation failed; terminal for this mount
    Error(String),
    /// Data present
    Loaded(Vec<T>),
}

/// A mounted list of records with a cursor and at most one expanded card
#[derive(Debug, Clone)]
pub struct ListView<T> {
    mount: MountId,
    state: LoadState<T>,
    /// Row under the cursor
    pub cursor: usize,
    /// First card drawn; maintained by the renderer
    pub scroll: usize,
    expanded: Option<i64>,
}

impl<T: Record> ListView<T> {
    /// Mount a view in the loading state
    pub const fn mount(mount: MountId) -> Self {
        Self {
            mount,
            state: LoadState::Loading,
            cursor: 0,
            scroll: 0,
            expanded: None,
        }
    }

    /// Mount id this view was created with
    pub const fn mount_id(&self) -> MountId {
        self.mount
    }

    /// Current fetch state
    pub const fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Whether the view is still waiting for its fetch
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Apply a fetch result.
    ///
    /// Only the first result for this mount is applied; later ones and
    /// results for other mounts are dropped. Returns whether it was applied.
    pub fn resolve(&mut self, mount: MountId, result: Result<Vec<T>, String>) -> bool {
        if mount != self.mount || !self.is_loading() {
            tracing::debug!(mount, current = self.mount, "dropping stale list result");
            return false;
        }
        self.state = match result {
            Ok(items) => LoadState::Loaded(items),
            Err(message) => LoadState::Error(message),
        };
        true
    }

    /// Loaded records, empty while loading or failed
    pub fn items(&self) -> &[T] {
        match &self.state {
            LoadState::Loaded(items) => items,
            _ => &[],
        }
    }

    /// Record under the cursor
    pub fn selected(&self) -> Option<&T> {
        self.items().get(self.cursor)
    }

    /// Identifier of the expanded record, if any
    pub const fn expanded(&self) -> Option<i64> {
        self.expanded
    }

    /// Whether the given record is the expanded one
    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded == Some(id)
    }

    /// Toggle a record's card.
    ///
    /// Expanding one record collapses whichever was expanded before.
    pub fn toggle(&mut self, id: i64) {
        self.expanded = if self.is_expanded(id) { None } else { Some(id) };
    }

    /// Toggle the card under the cursor, returning the newly expanded id
    pub fn toggle_selected(&mut self) -> Option<i64> {
        let id = self.selected()?.id();
        self.toggle(id);
        self.expanded
    }

    /// Move the cursor down
    pub fn select_next(&mut self) {
        let len = self.items().len();
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    /// Move the cursor up
    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Jump to the first row
    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    /// Jump to the last row
    pub fn select_last(&mut self) {
        self.cursor = self.items().len().saturating_sub(1);
    }
}

/// Download state of one pet photo within a pet list mount
pub enum PhotoSlot {
    Loading,
    Ready(Box<StatefulProtocol>),
    /// Downloaded but not drawable (no graphics, photos disabled)
    Unavailable,
    Failed(String),
}

/// Pet list: pets, the owners used to label them, and their photos
pub struct PetListView {
    pub list: ListView<Pet>,
    owners: Vec<Owner>,
    photos: HashMap<String, PhotoSlot>,
    unresolved: HashSet<i64>,
}

impl PetListView {
    /// Mount a pet list in the loading state
    pub fn mount(mount: MountId) -> Self {
        Self {
            list: ListView::mount(mount),
            owners: Vec::new(),
            photos: HashMap::new(),
            unresolved: HashSet::new(),
        }
    }

    /// Apply the joint pets-and-owners fetch result
    pub fn resolve(&mut self, mount: MountId, result: Result<(Vec<Pet>, Vec<Owner>), String>) -> bool {
        let (pets, owners) = match result {
            Ok((pets, owners)) => (Ok(pets), owners),
            Err(e) => (Err(e), Vec::new()),
        };
        if !self.list.resolve(mount, pets) {
            return false;
        }
        self.owners = owners;

        for pet in self.list.items() {
            if !self.owners.iter().any(|o| o.id == pet.owner_id)
                && self.unresolved.insert(pet.owner_id)
            {
                tracing::warn!(pet = pet.id, owner_id = pet.owner_id, "pet references unknown owner");
            }
        }
        true
    }

    /// Display name of a pet's owner, or `Owner #<id>` when not found
    pub fn owner_name(&self, owner_id: i64) -> String {
        self.owners
            .iter()
            .find(|o| o.id == owner_id)
            .map_or_else(|| format!("Owner #{owner_id}"), |o| o.name.clone())
    }

    /// Number of distinct owner ids that matched no fetched owner
    pub fn unresolved_owner_count(&self) -> usize {
        self.unresolved.len()
    }

    /// Mark a photo as requested; returns false if already known
    pub fn request_photo(&mut self, filename: &str) -> bool {
        if self.photos.contains_key(filename) {
            return false;
        }
        self.photos.insert(filename.to_string(), PhotoSlot::Loading);
        true
    }

    /// Store the outcome of a photo download for this mount
    pub fn store_photo(&mut self, mount: MountId, filename: String, slot: PhotoSlot) {
        if mount == self.list.mount_id() {
            self.photos.insert(filename, slot);
        }
    }

    /// Photo state for a filename
    pub fn photo(&self, filename: &str) -> Option<&PhotoSlot> {
        self.photos.get(filename)
    }

    /// Mutable photo state, needed to draw a stateful image
    pub fn photo_mut(&mut self, filename: &str) -> Option<&mut PhotoSlot> {
        self.photos.get_mut(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(id: i64, name: &str) -> Owner {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    fn pet(id: i64, owner_id: i64) -> Pet {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": format!("pet{id}"), "owner_id": owner_id
        }))
        .unwrap()
    }

    #[test]
    fn test_loading_to_loaded() {
        let mut view = ListView::mount(1);
        assert!(view.is_loading());
        assert!(view.resolve(1, Ok(vec![owner(1, "Ada"), owner(2, "Grace")])));
        assert_eq!(view.items().len(), 2);
    }

    #[test]
    fn test_error_is_terminal() {
        let mut view: ListView<Owner> = ListView::mount(1);
        assert!(view.resolve(1, Err("boom".to_string())));
        assert!(!view.resolve(1, Ok(vec![owner(1, "Ada")])));
        assert_eq!(view.state(), &LoadState::Error("boom".to_string()));
        assert!(view.items().is_empty());
    }

    #[test]
    fn test_stale_mount_is_ignored() {
        let mut view: ListView<Owner> = ListView::mount(2);
        assert!(!view.resolve(1, Ok(vec![owner(1, "Ada")])));
        assert!(view.is_loading());
    }

    #[test]
    fn test_expanding_another_card_collapses_previous() {
        let mut view = ListView::mount(1);
        view.resolve(1, Ok(vec![owner(1, "Ada"), owner(2, "Grace")]));

        assert_eq!(view.toggle_selected(), Some(1));
        view.select_next();
        assert_eq!(view.toggle_selected(), Some(2));
        assert!(!view.is_expanded(1));
        assert!(view.is_expanded(2));

        // Toggling the expanded card collapses it
        assert_eq!(view.toggle_selected(), None);
        assert_eq!(view.expanded(), None);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut view = ListView::mount(1);
        view.select_next();
        assert_eq!(view.cursor, 0);
        view.resolve(1, Ok(vec![owner(1, "Ada"), owner(2, "Grace")]));
        view.select_next();
        view.select_next();
        assert_eq!(view.cursor, 1);
        view.select_first();
        view.select_prev();
        assert_eq!(view.cursor, 0);
        view.select_last();
        assert_eq!(view.cursor, 1);
    }

    #[test]
    fn test_owner_name_fallback() {
        let mut view = PetListView::mount(1);
        view.resolve(1, Ok((vec![pet(1, 1), pet(2, 7)], vec![owner(1, "Ada")])));
        assert_eq!(view.owner_name(1), "Ada");
        assert_eq!(view.owner_name(7), "Owner #7");
        assert_eq!(view.unresolved_owner_count(), 1);
    }

    #[test]
    fn test_failed_joint_fetch_shows_error() {
        let mut view = PetListView::mount(1);
        view.resolve(1, Err("Failed to fetch owners".to_string()));
        assert!(matches!(view.list.state(), LoadState::Error(_)));
    }

    #[test]
    fn test_photo_requested_once_per_mount() {
        let mut view = PetListView::mount(3);
        assert!(view.request_photo("rex.png"));
        assert!(!view.request_photo("rex.png"));

        view.store_photo(2, "rex.png".to_string(), PhotoSlot::Failed("old".to_string()));
        assert!(matches!(view.photo("rex.png"), Some(PhotoSlot::Loading)));

        view.store_photo(3, "rex.png".to_string(), PhotoSlot::Unavailable);
        assert!(matches!(view.photo("rex.png"), Some(PhotoSlot::Unavailable)));
    }
}

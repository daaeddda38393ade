//! Application state

use crate::config::Config;
use crate::models::{Owner, Pet};
use crate::theme::Theme;

use super::async_ops::AsyncCommand;
use super::form::{OwnerForm, PetForm};
use super::list::{ListView, MountId, PetListView};

/// Navigation destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Owners,
    AddOwner,
    Pets,
    AddPet,
}

impl Route {
    /// Every route, in tab order
    pub const fn all() -> [Self; 4] {
        [Self::Owners, Self::AddOwner, Self::Pets, Self::AddPet]
    }

    /// Tab label
    pub const fn title(self) -> &'static str {
        match self {
            Self::Owners => "Owners",
            Self::AddOwner => "Add Owner",
            Self::Pets => "Pets",
            Self::AddPet => "Add Pet",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Owners => 0,
            Self::AddOwner => 1,
            Self::Pets => 2,
            Self::AddPet => 3,
        }
    }

    pub const fn next(self) -> Self {
        Self::all()[(self.index() + 1) % 4]
    }

    pub const fn prev(self) -> Self {
        Self::all()[(self.index() + 3) % 4]
    }

    /// Route for a path; `/` is the owners list
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" | "/owners" => Some(Self::Owners),
            "/add-owner" => Some(Self::AddOwner),
            "/pets" => Some(Self::Pets),
            "/add-pet" => Some(Self::AddPet),
            _ => None,
        }
    }

    /// Whether the route is one of the record lists
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Owners | Self::Pets)
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Help,
    ThemePicker,
}

/// Application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Whether to quit
    pub should_quit: bool,
    /// Current theme
    pub theme: Theme,
    /// Active route
    pub route: Route,
    /// Current mode
    pub mode: Mode,

    /// Owner list view
    pub owners: ListView<Owner>,
    /// Pet list view
    pub pets: PetListView,
    /// Add-owner form
    pub owner_form: OwnerForm,
    /// Add-pet form
    pub pet_form: PetForm,

    /// Route whose view is currently mounted
    shown: Option<Route>,
    next_mount: MountId,

    /// Status message (bottom bar)
    pub status: String,
    /// Selected theme index in theme picker
    pub theme_picker_index: usize,

    /// Tick counter for animations
    tick: u64,
}

impl AppState {
    /// Create a new app state; nothing is mounted until a route is shown
    pub fn new(config: Config) -> Self {
        let theme = config.theme;
        Self {
            config,
            should_quit: false,
            theme,
            route: Route::Owners,
            mode: Mode::Normal,
            owners: ListView::mount(0),
            pets: PetListView::mount(0),
            owner_form: OwnerForm::new(),
            pet_form: PetForm::mount(0),
            shown: None,
            next_mount: 1,
            status: String::new(),
            theme_picker_index: 0,
            tick: 0,
        }
    }

    fn mount_id(&mut self) -> MountId {
        let id = self.next_mount;
        self.next_mount += 1;
        id
    }

    /// Switch to a route, mounting its view afresh.
    ///
    /// Every entry to a route is a new mount with a new fetch, so records
    /// created elsewhere show up. Choosing the route already shown does
    /// nothing; `r` forces a refetch there.
    pub fn show(&mut self, route: Route) -> Option<AsyncCommand> {
        if self.shown == Some(route) {
            return None;
        }
        if self.route == Route::AddPet {
            self.pet_form.photo_zone.drag_leave();
        }
        self.route = route;
        self.shown = Some(route);
        match route {
            Route::Owners => Some(self.remount_owners()),
            Route::Pets => Some(self.remount_pets()),
            Route::AddPet => {
                let mount = self.mount_id();
                self.pet_form.reload_owners(mount);
                Some(AsyncCommand::LoadOwnerChoices { mount })
            }
            Route::AddOwner => None,
        }
    }

    fn remount_owners(&mut self) -> AsyncCommand {
        let mount = self.mount_id();
        self.owners = ListView::mount(mount);
        tracing::debug!(mount, "mounting owner list");
        AsyncCommand::LoadOwners { mount }
    }

    fn remount_pets(&mut self) -> AsyncCommand {
        let mount = self.mount_id();
        self.pets = PetListView::mount(mount);
        tracing::debug!(mount, "mounting pet list");
        AsyncCommand::LoadPets { mount }
    }

    /// Remount the current list with a fresh fetch
    pub fn remount(&mut self) -> Option<AsyncCommand> {
        match self.route {
            Route::Owners => Some(self.remount_owners()),
            Route::Pets => Some(self.remount_pets()),
            Route::AddOwner | Route::AddPet => None,
        }
    }

    /// Refresh signal from the owner form.
    ///
    /// The owner list and the pet form's owner choices refetch on their
    /// next mount, which every route entry is.
    pub fn on_owner_created(&mut self, owner: &Owner) {
        tracing::info!(id = owner.id, "owner created from form");
        self.set_status(format!("Created owner {} (#{})", owner.name, owner.id));
    }

    /// Refresh signal from the pet form
    pub fn on_pet_created(&mut self, pet: &Pet) {
        tracing::info!(id = pet.id, "pet created from form");
        self.set_status(format!("Created pet {} (#{})", pet.name, pet.id));
    }

    /// Toggle the pet card under the cursor, requesting its photo if needed
    pub fn toggle_pet(&mut self) -> Option<AsyncCommand> {
        let id = self.pets.list.toggle_selected()?;
        if !self.config.show_photos {
            return None;
        }
        let filename = self
            .pets
            .list
            .items()
            .iter()
            .find(|p| p.id == id)
            .and_then(Pet::photo)?
            .to_string();
        self.pets.request_photo(&filename).then(|| AsyncCommand::LoadPhoto {
            mount: self.pets.list.mount_id(),
            filename,
        })
    }

    /// Decode the photo just chosen in the pet form, when photos are shown
    pub fn preview_photo(&mut self) -> Option<AsyncCommand> {
        if !self.config.show_photos {
            return None;
        }
        let path = self.pet_form.request_preview()?;
        Some(AsyncCommand::LoadPreview { path })
    }

    /// Whether any fetch or submission is outstanding
    pub const fn is_busy(&self) -> bool {
        match self.route {
            Route::Owners => self.owners.is_loading(),
            Route::Pets => self.pets.list.is_loading(),
            Route::AddOwner => self.owner_form.status.is_submitting(),
            Route::AddPet => self.pet_form.status.is_submitting(),
        }
    }

    /// Tick for animations
    pub const fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Get current tick
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    /// Open the theme picker on the current theme
    pub fn open_theme_picker(&mut self) {
        self.theme_picker_index = Theme::all()
            .iter()
            .position(|t| *t == self.theme.inner())
            .unwrap_or(0);
        self.mode = Mode::ThemePicker;
    }

    /// Preview a theme from the picker
    pub fn preview_theme(&mut self, index: usize) {
        if let Some(name) = Theme::all().get(index) {
            self.theme_picker_index = index;
            self.theme = Theme(*name);
        }
    }

    /// Keep the previewed theme
    pub fn confirm_theme(&mut self) {
        self.config.theme = self.theme;
        self.mode = Mode::Normal;
        self.set_status(format!("Theme: {}", self.theme));
    }

    /// Drop the previewed theme
    pub fn cancel_theme(&mut self) {
        self.theme = self.config.theme;
        self.mode = Mode::Normal;
    }
}

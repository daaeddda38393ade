//! Terminal shell: routes, list and form views, and the run loop

mod async_ops;
mod card;
mod events;
mod form;
mod list;
mod photo;
mod state;
mod ui;

pub use state::{AppState, Mode, Route};

use anyhow::Result;
use image::DynamicImage;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::api::ApiClient;
use crate::config::Config;
use crate::images;

use async_ops::{AsyncCommand, AsyncHandle, AsyncResult, spawn_worker};
use list::PhotoSlot;

/// Run the TUI application, starting on `start`
pub fn run(config: Config, start: Route) -> Result<()> {
    let rt = Runtime::new()?;

    let client = ApiClient::from_config(&config)?;
    tracing::info!("Using API at {}", client.base_url());
    let async_handle = rt.block_on(async { spawn_worker(client) });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if config.show_photos {
        images::init_picker();
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = AppState::new(config);
    let first = state.show(start);

    let result = run_app(&mut terminal, &mut state, async_handle, first, &rt);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    mut async_handle: AsyncHandle,
    first: Option<AsyncCommand>,
    _rt: &Runtime,
) -> Result<()> {
    if let Some(cmd) = first {
        let _ = async_handle.cmd_tx.blocking_send(cmd);
    }

    loop {
        // Process any async results
        while let Ok(result) = async_handle.result_rx.try_recv() {
            if let Some(cmd) = handle_async_result(state, result) {
                let _ = async_handle.cmd_tx.blocking_send(cmd);
            }
        }

        terminal.draw(|frame| ui::render(frame, state))?;

        if event::poll(Duration::from_millis(50))? {
            let cmd = match event::read()? {
                Event::Key(key) => events::handle_key(state, key),
                Event::Paste(text) => events::handle_paste(state, &text),
                _ => None,
            };
            if let Some(cmd) = cmd {
                let _ = async_handle.cmd_tx.blocking_send(cmd);
            }
        }

        // Tick for animations
        state.tick();

        if state.should_quit {
            let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::Shutdown);
            break;
        }
    }

    // Persist the theme; URL overrides from env or flags stay out of the file
    let mut saved = Config::load()?;
    saved.theme = state.config.theme;
    saved.save()?;

    Ok(())
}

fn handle_async_result(state: &mut AppState, result: AsyncResult) -> Option<AsyncCommand> {
    match result {
        AsyncResult::OwnersLoaded { mount, result } => {
            if !state.owners.resolve(mount, result) {
                tracing::debug!(mount, "dropped owner list result for a replaced view");
            }
            None
        }
        AsyncResult::PetsLoaded { mount, result } => {
            if !state.pets.resolve(mount, result) {
                tracing::debug!(mount, "dropped pet list result for a replaced view");
            }
            None
        }
        AsyncResult::OwnerChoicesLoaded { mount, result } => {
            state.pet_form.resolve_owners(mount, result);
            None
        }
        AsyncResult::OwnerCreated { result } => {
            let mut created = None;
            state
                .owner_form
                .complete(result, |owner| created = Some(owner.clone()));
            if let Some(owner) = created {
                state.on_owner_created(&owner);
            }
            None
        }
        AsyncResult::PetCreated { result } => {
            let mut created = None;
            state
                .pet_form
                .complete(result, |pet| created = Some(pet.clone()));
            if let Some(pet) = created {
                state.on_pet_created(&pet);
            }
            None
        }
        AsyncResult::PhotoLoaded {
            mount,
            filename,
            result,
        } => {
            if let Err(message) = &result {
                tracing::warn!("Failed to load photo {filename}: {message}");
            }
            state.pets.store_photo(mount, filename, photo_slot(result));
            None
        }
        AsyncResult::PreviewLoaded { path, result } => {
            if let Err(message) = &result {
                tracing::warn!("Failed to preview {}: {message}", path.display());
            }
            if !state.pet_form.store_preview(&path, photo_slot(result)) {
                tracing::debug!("dropped preview of {}, photo changed", path.display());
            }
            None
        }
    }
}

fn photo_slot(result: Result<DynamicImage, String>) -> PhotoSlot {
    match (result, images::picker()) {
        (Ok(image), Some(picker)) => PhotoSlot::Ready(Box::new(picker.new_resize_protocol(image))),
        (Ok(_), None) => PhotoSlot::Unavailable,
        (Err(message), _) => PhotoSlot::Failed(message),
    }
}

#[cfg(test)]
mod tests {
    use super::photo::PhotoChange;
    use super::*;
    use crate::models::{Owner, Pet, PhotoFile};

    fn owner(id: i64, name: &str) -> Owner {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    #[test]
    fn test_owner_created_flows_back_to_list() {
        let mut state = AppState::new(Config::default());
        state.show(Route::AddOwner);
        state.owner_form.input('A');
        assert!(state.owner_form.submit().is_some());

        handle_async_result(
            &mut state,
            AsyncResult::OwnerCreated {
                result: Ok(owner(4, "A")),
            },
        );
        assert_eq!(state.status, "Created owner A (#4)");
        assert!(state.owner_form.fields[0].value.is_empty());
        assert!(matches!(state.show(Route::Owners), Some(AsyncCommand::LoadOwners { .. })));
    }

    #[test]
    fn test_failed_create_keeps_form_input() {
        let mut state = AppState::new(Config::default());
        state.show(Route::AddPet);
        state.pet_form.name.value = "Rex".to_string();

        handle_async_result(
            &mut state,
            AsyncResult::PetCreated {
                result: Err("Failed to create pet".to_string()),
            },
        );
        assert_eq!(
            state.pet_form.status.error.as_deref(),
            Some("Failed to create pet")
        );
        assert_eq!(state.pet_form.name.value, "Rex");
        assert!(state.status.is_empty());
    }

    #[test]
    fn test_stale_list_result_is_dropped() {
        let mut state = AppState::new(Config::default());
        let Some(AsyncCommand::LoadPets { mount: old }) = state.show(Route::Pets) else {
            panic!("expected pet fetch");
        };
        let Some(AsyncCommand::LoadPets { mount: new }) = state.remount() else {
            panic!("expected pet refetch");
        };

        let pet: Pet = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Rex", "owner_id": 1
        }))
        .unwrap();
        handle_async_result(
            &mut state,
            AsyncResult::PetsLoaded {
                mount: old,
                result: Ok((vec![pet], Vec::new())),
            },
        );
        assert!(state.pets.list.is_loading());

        handle_async_result(
            &mut state,
            AsyncResult::PetsLoaded {
                mount: new,
                result: Err("Failed to fetch pets".to_string()),
            },
        );
        assert!(!state.pets.list.is_loading());
    }

    #[test]
    fn test_photo_failure_is_recorded() {
        let mut state = AppState::new(Config::default());
        let Some(AsyncCommand::LoadPets { mount }) = state.show(Route::Pets) else {
            panic!("expected pet fetch");
        };
        state.pets.request_photo("rex.png");
        handle_async_result(
            &mut state,
            AsyncResult::PhotoLoaded {
                mount,
                filename: "rex.png".to_string(),
                result: Err("Could not decode photo".to_string()),
            },
        );
        assert!(matches!(
            state.pets.photo("rex.png"),
            Some(PhotoSlot::Failed(message)) if message == "Could not decode photo"
        ));
    }

    #[test]
    fn test_preview_result_lands_in_drop_zone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rex.png");
        std::fs::write(&path, b"not a png").unwrap();

        let mut state = AppState::new(Config::default());
        state.show(Route::AddPet);
        let photo = PhotoFile::from_path(&path).unwrap();
        state.pet_form.apply_photo(PhotoChange::Selected(photo));
        assert!(state.preview_photo().is_some());

        handle_async_result(
            &mut state,
            AsyncResult::PreviewLoaded {
                path: dir.path().join("other.png"),
                result: Err("stale".to_string()),
            },
        );
        assert!(matches!(state.pet_form.preview, Some(PhotoSlot::Loading)));

        handle_async_result(
            &mut state,
            AsyncResult::PreviewLoaded {
                path,
                result: Err("Could not decode photo".to_string()),
            },
        );
        assert!(matches!(
            &state.pet_form.preview,
            Some(PhotoSlot::Failed(message)) if message == "Could not decode photo"
        ));
    }
}

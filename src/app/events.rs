//! Event handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::async_ops::AsyncCommand;
use super::form::{OwnerField, PetField};
use super::state::{AppState, Mode, Route};
use crate::theme::Theme;

/// Handle key events, returning an optional async command
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match state.mode {
        Mode::ThemePicker => {
            handle_theme_picker_key(state, key);
            return None;
        }
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                state.mode = Mode::Normal;
            }
            return None;
        }
        Mode::Normal => {}
    }

    // Shortcuts that work on every route
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            state.should_quit = true;
            return None;
        }
        (_, KeyCode::F(n @ 1..=4)) => {
            return state.show(Route::all()[usize::from(n) - 1]);
        }
        _ => {}
    }

    match state.route {
        Route::Owners | Route::Pets => handle_list_key(state, key),
        Route::AddOwner => handle_owner_form_key(state, key),
        Route::AddPet => handle_pet_form_key(state, key),
    }
}

/// Handle a bracketed paste: a drop on the photo zone or text for a field.
///
/// A dropped photo asks for its preview.
pub fn handle_paste(state: &mut AppState, text: &str) -> Option<AsyncCommand> {
    if state.mode != Mode::Normal {
        return None;
    }
    match state.route {
        Route::AddOwner => state.owner_form.paste(text),
        Route::AddPet => {
            if state.pet_form.photo_zone.picker_input().is_some() {
                for c in text.chars().filter(|c| !c.is_control()) {
                    state.pet_form.photo_zone.picker_push(c);
                }
            } else if let Some(photo) = state.pet_form.paste(text) {
                let message = format!("Photo selected: {}", photo.file_name);
                state.set_status(message);
                return state.preview_photo();
            }
        }
        Route::Owners | Route::Pets => {}
    }
    None
}

fn handle_theme_picker_key(state: &mut AppState, key: KeyEvent) {
    let count = Theme::all().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => state.cancel_theme(),
        KeyCode::Enter => state.confirm_theme(),
        KeyCode::Char('j') | KeyCode::Down => {
            state.preview_theme((state.theme_picker_index + 1) % count);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.preview_theme((state.theme_picker_index + count - 1) % count);
        }
        _ => {}
    }
}

fn handle_list_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    let on_pets = state.route == Route::Pets;
    match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
            None
        }
        KeyCode::Char('?') => {
            state.mode = Mode::Help;
            None
        }
        KeyCode::Char('t') => {
            state.open_theme_picker();
            None
        }
        KeyCode::Tab => state.show(state.route.next()),
        KeyCode::BackTab => state.show(state.route.prev()),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            state.show(Route::all()[index])
        }
        KeyCode::Char('r') => state.remount(),
        KeyCode::Char('j') | KeyCode::Down => {
            if on_pets {
                state.pets.list.select_next();
            } else {
                state.owners.select_next();
            }
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if on_pets {
                state.pets.list.select_prev();
            } else {
                state.owners.select_prev();
            }
            None
        }
        KeyCode::Char('g') | KeyCode::Home => {
            if on_pets {
                state.pets.list.select_first();
            } else {
                state.owners.select_first();
            }
            None
        }
        KeyCode::Char('G') | KeyCode::End => {
            if on_pets {
                state.pets.list.select_last();
            } else {
                state.owners.select_last();
            }
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if on_pets {
                state.toggle_pet()
            } else {
                state.owners.toggle_selected();
                None
            }
        }
        KeyCode::Char('o') if on_pets => {
            open_selected_photo(state);
            None
        }
        _ => None,
    }
}

fn open_selected_photo(state: &mut AppState) {
    let Some(filename) = state.pets.list.selected().and_then(|p| p.photo()) else {
        state.set_status("No photo for this pet");
        return;
    };
    let url = crate::api::photo_url(&state.config.api_url, filename);
    match open::that(&url) {
        Ok(()) => state.set_status(format!("Opened {url}")),
        Err(e) => {
            tracing::warn!("Failed to open {url}: {e}");
            state.set_status(format!("Failed to open {url}: {e}"));
        }
    }
}

fn is_submit(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s')
}

fn handle_owner_form_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    let form = &mut state.owner_form;
    let submit = is_submit(key)
        || (key.code == KeyCode::Enter && form.focused() == OwnerField::Submit);
    if submit {
        return form.submit().map(|owner| AsyncCommand::CreateOwner { owner });
    }

    match key.code {
        KeyCode::Esc => return state.show(Route::Owners),
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input(c),
        _ => {}
    }
    None
}

fn handle_pet_form_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    let form = &mut state.pet_form;

    // The picker prompt takes every key until it closes
    if form.photo_zone.picker_input().is_some() {
        match key.code {
            KeyCode::Esc => form.photo_zone.cancel_picker(),
            KeyCode::Enter => {
                if let Some(change) = form.photo_zone.confirm_picker() {
                    form.apply_photo(change);
                    return state.preview_photo();
                }
            }
            KeyCode::Backspace => form.photo_zone.picker_pop(),
            KeyCode::Char(c) => form.photo_zone.picker_push(c),
            _ => {}
        }
        return None;
    }

    let submit =
        is_submit(key) || (key.code == KeyCode::Enter && form.focused() == PetField::Submit);
    if submit {
        return form.submit().map(|pet| AsyncCommand::CreatePet { pet });
    }

    let focused = form.focused();
    match key.code {
        KeyCode::Esc => return state.show(Route::Pets),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter if focused == PetField::Photo => form.photo_zone.open_picker(),
        KeyCode::Enter => form.focus_next(),
        KeyCode::Left => match focused {
            PetField::Owner => form.prev_owner(),
            PetField::Gender => form.gender = form.gender.prev(),
            _ => {}
        },
        KeyCode::Right => match focused {
            PetField::Owner => form.next_owner(),
            PetField::Gender => form.gender = form.gender.next(),
            _ => {}
        },
        KeyCode::Char(' ') if focused == PetField::Vaccinated => {
            form.vaccinated = !form.vaccinated;
        }
        KeyCode::Char(' ') if focused == PetField::Gender => form.gender = form.gender.next(),
        KeyCode::Char(' ') if focused == PetField::Owner => form.next_owner(),
        KeyCode::Backspace | KeyCode::Delete if focused == PetField::Photo => {
            let change = form.photo_zone.clear();
            form.apply_photo(change);
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input(c),
        _ => {}
    }
    None
}

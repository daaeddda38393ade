//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use ratatui_image::StatefulImage;

use super::card::Card;
use super::form::{OwnerField, PetField, TextField};
use super::list::{ListView, LoadState, PhotoSlot};
use super::state::{AppState, Mode, Route};
use crate::models::{Owner, Pet};
use crate::theme::{Theme, ThemeColors};

/// Shop icon shown in the tab bar
const ICON: &str = "🐾";

/// Rows given to a loaded photo inside an expanded pet card
const PHOTO_ROWS: u16 = 12;

/// Rows given to the preview of a chosen photo in the drop zone
const PREVIEW_ROWS: u16 = 8;

/// Spinner animation frames
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Width of the label column in forms
const LABEL_WIDTH: usize = 16;

/// Main render function
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let colors = state.theme.colors();

    let area = frame.area();
    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_tabs(frame, state, chunks[0]);
    match state.route {
        Route::Owners => render_owner_list(frame, state, chunks[1]),
        Route::Pets => render_pet_list(frame, state, chunks[1]),
        Route::AddOwner => render_owner_form(frame, state, chunks[1]),
        Route::AddPet => render_pet_form(frame, state, chunks[1]),
    }
    render_status_bar(frame, state, chunks[2]);

    match state.mode {
        Mode::Help => render_help_popup(frame, state),
        Mode::ThemePicker => render_theme_picker(frame, state),
        Mode::Normal => {}
    }
}

fn render_tabs(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let titles: Vec<Line> = Route::all()
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let marker = if *route == state.route { "●" } else { "○" };
            Line::from(format!("{marker} F{} {}", i + 1, route.title()))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.border())
                .title(format!(" {ICON} Pet Shop "))
                .title_style(colors.title()),
        )
        .select(state.route.index())
        .style(colors.tab())
        .highlight_style(colors.tab_active())
        .divider(Span::styled(" │ ", colors.muted_text()));

    frame.render_widget(tabs, area);
}

fn list_block<'a>(title: String, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.border_focus())
        .title(title)
        .title_style(colors.title())
}

/// Render the loading or error line of a list; returns false once loaded
fn render_list_placeholder<T>(
    frame: &mut Frame,
    state: &LoadState<T>,
    what: &str,
    colors: &ThemeColors,
    area: Rect,
) -> bool {
    let line = match state {
        LoadState::Loading => Line::styled(format!("Loading {what}..."), colors.muted_text()),
        LoadState::Error(message) => Line::styled(format!("Error: {message}"), colors.error_text()),
        LoadState::Loaded(items) if items.is_empty() => {
            Line::styled(format!("No {what} yet"), colors.muted_text())
        }
        LoadState::Loaded(_) => return false,
    };
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), area);
    true
}

/// Place cards top to bottom starting at `scroll`, keeping `cursor` visible.
///
/// Returns the index and area of every card that is at least partly shown.
fn layout_cards(heights: &[u16], cursor: usize, scroll: &mut usize, area: Rect) -> Vec<(usize, Rect)> {
    if heights.is_empty() {
        *scroll = 0;
        return Vec::new();
    }
    let cursor = cursor.min(heights.len() - 1);
    if *scroll > cursor {
        *scroll = cursor;
    }
    // Scroll forward until the cursor card fits (or is the first shown)
    while *scroll < cursor {
        let used: u32 = heights[*scroll..=cursor].iter().map(|h| u32::from(*h)).sum();
        if used <= u32::from(area.height) {
            break;
        }
        *scroll += 1;
    }

    let mut placed = Vec::new();
    let mut y = area.y;
    let bottom = area.y + area.height;
    for (index, height) in heights.iter().enumerate().skip(*scroll) {
        if y >= bottom {
            break;
        }
        let height = (*height).min(bottom - y);
        placed.push((index, Rect::new(area.x, y, area.width, height)));
        y += height;
    }
    placed
}

fn owner_card<'a>(owner: &Owner, list: &ListView<Owner>, index: usize, colors: &'a ThemeColors) -> Card<'a> {
    let mut contact = Vec::new();
    if let Some(email) = owner.email.as_deref().filter(|s| !s.is_empty()) {
        contact.push(Span::styled(format!("✉ {email}"), colors.value()));
    }
    if let Some(phone) = owner.phone.as_deref().filter(|s| !s.is_empty()) {
        if !contact.is_empty() {
            contact.push(Span::raw("   "));
        }
        contact.push(Span::styled(format!("☎ {phone}"), colors.value()));
    }
    let header = if contact.is_empty() {
        vec![Line::styled("No contact details", colors.muted_text())]
    } else {
        vec![Line::from(contact)]
    };
    let details = owner
        .detail_rows()
        .into_iter()
        .map(|(label, value)| (label, value.to_string()))
        .collect();

    Card::new(
        Line::from(vec![
            Span::styled(format!(" {} ", owner.name), colors.accent_text()),
            Span::styled(format!("#{} ", owner.id), colors.muted_text()),
        ]),
        colors,
    )
    .header(header)
    .details(details)
    .selected(index == list.cursor)
    .expanded(list.is_expanded(owner.id))
}

fn render_owner_list(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let colors = state.theme.colors();
    let title = match state.owners.state() {
        LoadState::Loaded(owners) => format!(" Owners ({}) ", owners.len()),
        _ => " Owners ".to_string(),
    };
    let block = list_block(title, &colors);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if render_list_placeholder(frame, state.owners.state(), "owners", &colors, inner) {
        return;
    }

    let view = &state.owners;
    let cards: Vec<Card> = view
        .items()
        .iter()
        .enumerate()
        .map(|(i, owner)| owner_card(owner, view, i, &colors))
        .collect();
    let heights: Vec<u16> = cards.iter().map(|c| c.height(inner.width)).collect();
    let list = &mut state.owners;
    let placed = layout_cards(&heights, list.cursor, &mut list.scroll, inner);

    let mut cards: Vec<Option<Card>> = cards.into_iter().map(Some).collect();
    for (index, rect) in placed {
        if let Some(card) = cards[index].take() {
            frame.render_widget(card, rect);
        }
    }
}

fn pet_card<'a>(
    pet: &Pet,
    state: &AppState,
    index: usize,
    colors: &'a ThemeColors,
) -> (Card<'a>, bool) {
    let pets = &state.pets;
    let expanded = pets.list.is_expanded(pet.id);

    let species = match pet.species_label() {
        Some(species) => Span::styled(species.to_string(), colors.secondary_text()),
        None => Span::styled(
            "Unknown",
            colors.muted_text().add_modifier(Modifier::ITALIC),
        ),
    };
    let header = vec![Line::from(vec![
        species,
        Span::styled("  ·  Owner: ", colors.muted_text()),
        Span::styled(pets.owner_name(pet.owner_id), colors.value()),
    ])];

    let mut details = pet.detail_rows();
    let mut photo_ready = false;
    if expanded && let Some(filename) = pet.photo() {
        match pets.photo(filename) {
            Some(PhotoSlot::Ready(_)) => photo_ready = true,
            Some(PhotoSlot::Loading) => details.push(("Photo", "loading...".to_string())),
            Some(PhotoSlot::Failed(e)) => details.push(("Photo", e.clone())),
            Some(PhotoSlot::Unavailable) | None => details.push((
                "Photo",
                crate::api::photo_url(&state.config.api_url, filename),
            )),
        }
    }

    let icon = if pet.photo().is_some() { "📷 " } else { "" };
    let card = Card::new(
        Line::from(vec![
            Span::styled(format!(" {icon}{} ", pet.name), colors.accent_text()),
            Span::styled(format!("#{} ", pet.id), colors.muted_text()),
        ]),
        colors,
    )
    .header(header)
    .details(details)
    .photo_rows(if photo_ready { PHOTO_ROWS } else { 0 })
    .selected(index == pets.list.cursor)
    .expanded(expanded);
    (card, photo_ready)
}

fn render_pet_list(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let colors = state.theme.colors();
    let mut title = match state.pets.list.state() {
        LoadState::Loaded(pets) => format!(" Pets ({}) ", pets.len()),
        _ => " Pets ".to_string(),
    };
    let unresolved = state.pets.unresolved_owner_count();
    if unresolved > 0 {
        let plural = if unresolved == 1 { "" } else { "s" };
        title.push_str(&format!("· {unresolved} unknown owner{plural} "));
    }
    let block = list_block(title, &colors);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if render_list_placeholder(frame, state.pets.list.state(), "pets", &colors, inner) {
        return;
    }

    let built: Vec<(Card, bool)> = {
        let view: &AppState = state;
        view.pets
            .list
            .items()
            .iter()
            .enumerate()
            .map(|(i, pet)| pet_card(pet, view, i, &colors))
            .collect()
    };
    let heights: Vec<u16> = built.iter().map(|(c, _)| c.height(inner.width)).collect();
    let list = &mut state.pets.list;
    let placed = layout_cards(&heights, list.cursor, &mut list.scroll, inner);

    // Draw text first, then photos into the areas the cards reserved
    let mut photos = Vec::new();
    let mut built: Vec<Option<(Card, bool)>> = built.into_iter().map(Some).collect();
    for (index, rect) in placed {
        let Some((card, photo_ready)) = built[index].take() else {
            continue;
        };
        if photo_ready
            && let Some(photo_area) = card.photo_area(rect)
            && photo_area.height == PHOTO_ROWS
            && let Some(filename) = list.items().get(index).and_then(Pet::photo)
        {
            photos.push((filename.to_string(), photo_area));
        }
        frame.render_widget(card, rect);
    }

    for (filename, photo_area) in photos {
        if let Some(PhotoSlot::Ready(protocol)) = state.pets.photo_mut(&filename) {
            frame.render_stateful_widget(StatefulImage::new(), photo_area, protocol.as_mut());
        }
    }
}

fn field_line<'a>(field: &TextField, focused: bool, colors: &ThemeColors) -> Line<'a> {
    let marker = if field.required { "*" } else { "" };
    let label = format!("{:<LABEL_WIDTH$}", format!("{}{marker}:", field.label));
    let mut value = field.value.clone();
    if focused {
        value.push('▏');
    }
    Line::from(vec![
        Span::styled(label, if focused { colors.accent_text() } else { colors.label() }),
        Span::styled(value, if focused { colors.focus() } else { colors.value() }),
    ])
}

fn choice_line<'a>(label: &str, value: String, focused: bool, colors: &ThemeColors) -> Line<'a> {
    let label = format!("{label:<LABEL_WIDTH$}");
    let value = if focused { format!("◀ {value} ▶") } else { value };
    Line::from(vec![
        Span::styled(label, if focused { colors.accent_text() } else { colors.label() }),
        Span::styled(value, if focused { colors.focus() } else { colors.value() }),
    ])
}

fn submit_lines<'a>(
    focused: bool,
    submitting: bool,
    error: Option<&str>,
    colors: &ThemeColors,
) -> Vec<Line<'a>> {
    let button = if submitting {
        Span::styled("[ Submitting... ]", colors.muted_text())
    } else if focused {
        Span::styled("[ Submit ]", colors.focus())
    } else {
        Span::styled("[ Submit ]", colors.accent_text())
    };
    let mut lines = vec![
        Line::default(),
        Line::from(vec![Span::raw(" ".repeat(LABEL_WIDTH)), button]),
    ];
    if let Some(error) = error {
        lines.push(Line::default());
        lines.push(Line::styled(format!("Error: {error}"), colors.error_text()));
    }
    lines
}

fn form_block<'a>(title: &'a str, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.border_focus())
        .title(title)
        .title_style(colors.title())
        .title_bottom(Line::from(" Tab/↑↓ move │ Ctrl+S submit │ Esc back ").centered())
}

fn render_owner_form(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();
    let form = &state.owner_form;

    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .zip(OwnerField::ALL)
        .map(|(field, id)| field_line(field, form.focused() == id, &colors))
        .collect();
    lines.extend(submit_lines(
        form.focused() == OwnerField::Submit,
        form.status.is_submitting(),
        form.status.error.as_deref(),
        &colors,
    ));

    let paragraph = Paragraph::new(lines)
        .block(form_block(" Add Owner ", &colors))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn owner_choice(state: &AppState) -> String {
    let form = &state.pet_form;
    match &form.owner_choices {
        LoadState::Loading => "Loading owners...".to_string(),
        LoadState::Error(message) => format!("Error: {message}"),
        LoadState::Loaded(owners) if owners.is_empty() => "No owners yet".to_string(),
        LoadState::Loaded(_) => form
            .selected_owner()
            .map_or_else(|| "Select an owner".to_string(), |o| format!("{} (#{})", o.name, o.id)),
    }
}

fn render_pet_form(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let colors = state.theme.colors();
    let form = &state.pet_form;
    let focused = form.focused();

    let block = form_block(" Add Pet ", &colors);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        field_line(&form.name, focused == PetField::Name, &colors),
        field_line(&form.species, focused == PetField::Species, &colors),
        choice_line("Owner*:", owner_choice(state), focused == PetField::Owner, &colors),
        field_line(&form.age, focused == PetField::Age, &colors),
        field_line(&form.breed, focused == PetField::Breed, &colors),
        field_line(&form.color, focused == PetField::Color, &colors),
        field_line(&form.weight, focused == PetField::Weight, &colors),
        field_line(&form.birthdate, focused == PetField::Birthdate, &colors),
        choice_line(
            "Gender:",
            form.gender.label().to_string(),
            focused == PetField::Gender,
            &colors,
        ),
        field_line(&form.description, focused == PetField::Description, &colors),
    ];
    let checkbox = if form.vaccinated { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{:<LABEL_WIDTH$}", "Vaccinated:"),
            if focused == PetField::Vaccinated { colors.accent_text() } else { colors.label() },
        ),
        Span::styled(
            checkbox,
            if focused == PetField::Vaccinated { colors.focus() } else { colors.value() },
        ),
    ]));

    let footer = submit_lines(
        focused == PetField::Submit,
        form.status.is_submitting(),
        form.status.error.as_deref(),
        &colors,
    );
    let zone_height = match form.preview {
        Some(PhotoSlot::Ready(_)) => 5 + PREVIEW_ROWS,
        _ => 5,
    };

    let fields_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(fields_height),
            Constraint::Length(zone_height), // Drop zone
            Constraint::Min(0),              // Submit and error
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(lines), chunks[0]);
    frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: false }), chunks[2]);
    render_drop_zone(frame, state, chunks[1]);
}

/// Drop zone: chosen file, hints, and the preview image below them
fn render_drop_zone(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let colors = state.theme.colors();
    let form = &state.pet_form;
    let zone = &form.photo_zone;

    let border = if zone.is_drag_active() {
        colors.drop_zone_active()
    } else {
        colors.border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if zone.is_drag_active() { BorderType::Double } else { BorderType::Rounded })
        .border_style(border)
        .title(" Photo ");

    let mut lines = Vec::new();
    if let Some(input) = zone.picker_input() {
        lines.push(Line::from(vec![
            Span::styled("Path: ", colors.label()),
            Span::styled(format!("{input}▏"), colors.focus()),
        ]));
        lines.push(Line::styled("Enter choose │ Esc cancel", colors.muted_text()));
    } else {
        match &form.photo {
            Some(photo) => lines.push(Line::from(vec![
                Span::styled("📷 ", colors.value()),
                Span::styled(photo.file_name.clone(), colors.success_text()),
                Span::styled("  (Backspace removes)", colors.muted_text()),
            ])),
            None if zone.is_drag_active() => lines.push(Line::styled(
                "Drop an image here, or press Enter to choose a file",
                colors.info_text(),
            )),
            None => lines.push(Line::styled("No photo chosen", colors.muted_text())),
        }
        if let Some(hint) = &zone.hint {
            lines.push(Line::styled(hint.clone(), colors.warning_text()));
        }
        match &form.preview {
            Some(PhotoSlot::Loading) => {
                lines.push(Line::styled("Loading preview...", colors.muted_text()));
            }
            Some(PhotoSlot::Failed(e)) => {
                lines.push(Line::styled(format!("No preview: {e}"), colors.warning_text()));
            }
            Some(PhotoSlot::Ready(_) | PhotoSlot::Unavailable) | None => {}
        }
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let image_rows = if inner.height > PREVIEW_ROWS { PREVIEW_ROWS } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(image_rows)])
        .split(inner);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

    if image_rows > 0
        && zone.picker_input().is_none()
        && let Some(PhotoSlot::Ready(protocol)) = state.pet_form.preview.as_mut()
    {
        frame.render_stateful_widget(StatefulImage::new(), chunks[1], protocol.as_mut());
    }
}

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let loading_indicator = if state.is_busy() {
        let frame_idx = usize::try_from(state.current_tick() / 2).unwrap_or(0) % SPINNER.len();
        format!("{} ", SPINNER[frame_idx])
    } else {
        String::new()
    };

    let mut content = vec![
        Span::styled(" ", Style::default()),
        Span::styled(loading_indicator, colors.secondary_text()),
    ];
    if !state.status.is_empty() {
        content.push(Span::styled(state.status.clone(), colors.secondary_text()));
    } else if state.route.is_list() {
        for (key, action) in [
            ("F1-F4", ": views  "),
            ("Enter", ": details  "),
            ("r", ": reload  "),
            ("?", ": help  "),
            ("t", ": theme  "),
            ("q", ": quit"),
        ] {
            content.push(Span::styled(key, colors.key_hint()));
            content.push(Span::styled(action, colors.muted_text()));
        }
    } else {
        for (key, action) in [
            ("F1-F4", ": views  "),
            ("Ctrl+S", ": submit  "),
            ("Esc", ": back  "),
            ("Ctrl+C", ": quit"),
        ] {
            content.push(Span::styled(key, colors.key_hint()));
            content.push(Span::styled(action, colors.muted_text()));
        }
    }

    let status =
        Paragraph::new(Line::from(content)).style(Style::default().bg(colors.surface));
    frame.render_widget(status, area);
}

fn help_section<'a>(title: &'a str, keys: &[(&'a str, &'a str)], colors: &ThemeColors) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("  {title}"),
        colors.accent_text().add_modifier(Modifier::BOLD),
    ))];
    for (key, action) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<17}"), colors.key_hint()),
            Span::styled(*action, colors.value()),
        ]));
    }
    lines.push(Line::default());
    lines
}

fn render_help_popup(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(60, 80, frame.area());

    let bg_block = Block::default().style(Style::default().bg(colors.surface));
    frame.render_widget(Clear, popup_area);
    frame.render_widget(bg_block, popup_area);

    let mut lines = vec![Line::default()];
    lines.extend(help_section(
        "Navigation",
        &[
            ("F1-F4", "Owners / Add Owner / Pets / Add Pet"),
            ("1-4, Tab", "Switch views (in lists)"),
            ("j/k or ↑/↓", "Move between cards"),
            ("g/G", "Go to first/last card"),
        ],
        &colors,
    ));
    lines.extend(help_section(
        "Lists",
        &[
            ("Enter/Space", "Show or hide details"),
            ("r", "Reload the list"),
            ("o", "Open the pet photo in a browser"),
        ],
        &colors,
    ));
    lines.extend(help_section(
        "Forms",
        &[
            ("Tab/↑/↓", "Move between fields"),
            ("←/→", "Change owner or gender"),
            ("Space", "Toggle vaccinated"),
            ("Enter on Photo", "Type a file path"),
            ("Paste on Photo", "Drop a file"),
            ("Ctrl+S", "Submit"),
            ("Esc", "Back to the list"),
        ],
        &colors,
    ));
    lines.extend(help_section(
        "General",
        &[("t", "Theme picker"), ("?", "Toggle help"), ("q/Ctrl+C", "Quit")],
        &colors,
    ));

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.accent))
            .title(" Help ")
            .title_bottom(Line::from(" Esc close ").centered()),
    );
    frame.render_widget(help, popup_area);
}

/// Palette list with a sample pet card drawn in the highlighted palette
fn render_theme_picker(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(50, 80, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.border_focus())
        .style(Style::default().bg(colors.surface))
        .title(format!(" Theme: {} ", state.theme))
        .title_style(colors.title())
        .title_bottom(Line::from(" ↑↓ try │ Enter keep │ Esc revert ").centered());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let sample = Card::new(
        Line::from(vec![
            Span::styled(" Rex ", colors.accent_text()),
            Span::styled("#1 ", colors.muted_text()),
        ]),
        &colors,
    )
    .header(vec![Line::from(vec![
        Span::styled("dog", colors.secondary_text()),
        Span::styled("  ·  Owner: ", colors.muted_text()),
        Span::styled("Ada", colors.value()),
    ])])
    .details(vec![("Breed", "Labrador".to_string())])
    .selected(true)
    .expanded(true);
    let sample_height = sample.height(inner.width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(sample_height)])
        .split(inner);

    let items: Vec<ListItem> = Theme::all()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let palette = name.palette();
            let current = i == state.theme_picker_index;
            let style = if current { colors.focus() } else { colors.value() };
            let swatches = [palette.accent, palette.secondary, palette.success, palette.error]
                .into_iter()
                .map(|c| Span::styled("■", Style::default().fg(c)));
            let mut spans = vec![Span::styled(
                format!("{} {:<22}", if current { "›" } else { " " }, name.display_name()),
                style,
            )];
            spans.extend(swatches);
            ListItem::new(Line::from(spans))
        })
        .collect();
    let mut list_state = ListState::default().with_selected(Some(state.theme_picker_index));
    frame.render_stateful_widget(List::new(items), chunks[0], &mut list_state);
    frame.render_widget(sample, chunks[1]);
}

const fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_width = r.width * percent_x / 100;
    let popup_height = r.height * percent_y / 100;
    Rect {
        x: r.x + (r.width.saturating_sub(popup_width)) / 2,
        y: r.y + (r.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::async_ops::AsyncCommand;
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn owner(id: i64, name: &str) -> Owner {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "address": "1 Main St",
            "city": null
        }))
        .unwrap()
    }

    fn draw(state: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_layout_keeps_cursor_visible() {
        let area = Rect::new(0, 0, 20, 10);
        let mut scroll = 0;
        let placed = layout_cards(&[4, 4, 4, 4], 3, &mut scroll, area);
        assert_eq!(scroll, 2);
        assert_eq!(placed, vec![(2, Rect::new(0, 0, 20, 4)), (3, Rect::new(0, 4, 20, 4))]);

        let placed = layout_cards(&[4, 4, 4, 4], 0, &mut scroll, area);
        assert_eq!(scroll, 0);
        assert_eq!(placed.len(), 3);
        assert_eq!(placed[2].1.height, 2);
    }

    #[test]
    fn test_owner_list_renders_one_card_per_owner() {
        let mut state = AppState::new(Config::default());
        let Some(AsyncCommand::LoadOwners { mount }) =
            state.show(Route::Owners)
        else {
            panic!("expected owner fetch");
        };
        state.owners.resolve(
            mount,
            Ok(vec![owner(1, "Ada"), owner(2, "Grace"), owner(3, "Linus")]),
        );
        state.owners.toggle(2);

        let screen = draw(&mut state, 80, 40);
        assert_eq!(screen.matches("Show details").count(), 2);
        assert_eq!(screen.matches("Hide details").count(), 1);
        assert_eq!(screen.matches("Address:").count(), 1);
        assert!(screen.contains("grace@example.com"));
        assert!(screen.contains("Owners (3)"));
    }

    #[test]
    fn test_list_error_line() {
        let mut state = AppState::new(Config::default());
        let Some(AsyncCommand::LoadPets { mount }) =
            state.show(Route::Pets)
        else {
            panic!("expected pet fetch");
        };
        assert!(draw(&mut state, 80, 20).contains("Loading pets..."));

        state
            .pets
            .resolve(mount, Err("Failed to fetch pets".to_string()));
        let screen = draw(&mut state, 80, 20);
        assert!(screen.contains("Error: Failed to fetch pets"));
        assert!(!screen.contains("Show details"));
    }

    #[test]
    fn test_pet_list_owner_fallback() {
        let mut state = AppState::new(Config::default());
        let Some(AsyncCommand::LoadPets { mount }) =
            state.show(Route::Pets)
        else {
            panic!("expected pet fetch");
        };
        let pet: Pet = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Rex", "owner_id": 42
        }))
        .unwrap();
        state.pets.resolve(mount, Ok((vec![pet], vec![owner(1, "Ada")])));

        let screen = draw(&mut state, 80, 20);
        assert!(screen.contains("Owner #42"));
        assert!(screen.contains("Unknown"));
        assert!(screen.contains("1 unknown owner"));
    }

    fn pet(value: serde_json::Value) -> Pet {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pet_list_single_expanded_card() {
        let mut state = AppState::new(Config::default());
        let Some(AsyncCommand::LoadPets { mount }) =
            state.show(Route::Pets)
        else {
            panic!("expected pet fetch");
        };
        let pets = vec![
            pet(serde_json::json!({
                "id": 1, "name": "Rex", "owner_id": 1, "species": "dog",
                "breed": "Lab", "photo_filename": "rex.png"
            })),
            pet(serde_json::json!({
                "id": 2, "name": "Tom", "owner_id": 42,
                "breed": "Tabby", "photo_filename": "tom.png"
            })),
            pet(serde_json::json!({
                "id": 3, "name": "Kiwi", "owner_id": 1, "species": "bird"
            })),
        ];
        state.pets.resolve(mount, Ok((pets, vec![owner(1, "Ada")])));
        state.pets.list.toggle(1);
        state.pets.list.toggle(2);
        assert!(state.pets.request_photo("tom.png"));

        let mut terminal = Terminal::new(TestBackend::new(80, 50)).unwrap();
        terminal.draw(|frame| render(frame, &mut state)).unwrap();
        let cells = terminal.backend().buffer().content();
        let screen: String = cells.iter().map(ratatui::buffer::Cell::symbol).collect();

        assert!(screen.contains("Pets (3)"));
        assert_eq!(screen.matches("Show details").count(), 2);
        assert_eq!(screen.matches("Hide details").count(), 1);
        assert!(screen.contains("Breed: Tabby"));
        assert!(!screen.contains("Breed: Lab"));
        assert_eq!(screen.matches("Photo:").count(), 1);
        assert!(screen.contains("loading..."));
        assert_eq!(screen.matches("Owner: Ada").count(), 2);
        assert!(screen.contains("Owner #42"));

        let unknown: Vec<_> = cells
            .windows(7)
            .filter(|w| w.iter().map(ratatui::buffer::Cell::symbol).collect::<String>() == "Unknown")
            .collect();
        assert_eq!(unknown.len(), 1);
        assert!(unknown[0].iter().all(|c| c.modifier.contains(Modifier::ITALIC)));
    }

    #[test]
    fn test_pet_form_renders_submitting_state() {
        let mut state = AppState::new(Config::default());
        state.show(Route::AddPet);
        state.pet_form.name.value = "Rex".to_string();
        let screen = draw(&mut state, 80, 40);
        assert!(screen.contains("Loading owners..."));
        assert!(screen.contains("[ Submit ]"));
        assert!(screen.contains("No photo chosen"));

        state.pet_form.status.begin();
        let screen = draw(&mut state, 80, 40);
        assert!(screen.contains("[ Submitting... ]"));
        assert!(!screen.contains("[ Submit ]"));
    }

    #[test]
    fn test_theme_picker_shows_sample_card() {
        let mut state = AppState::new(Config::default());
        state.open_theme_picker();
        let screen = draw(&mut state, 100, 40);
        assert!(screen.contains(&format!("Theme: {}", state.theme)));
        assert!(screen.contains("Rex #1"));
        assert!(screen.contains("Enter keep"));
    }
}

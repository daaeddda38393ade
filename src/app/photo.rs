//! Photo drop zone for the pet form.
//!
//! Terminals deliver a dragged file as pasted text (its path), so a paste
//! while the zone is focused counts as a drop. `Enter` opens a path prompt
//! that stands in for a file picker. The zone only holds UI state; the
//! chosen file is reported back to the form as a [`PhotoChange`].

use std::path::PathBuf;

use crate::models::PhotoFile;

/// What the drop zone reports to its form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoChange {
    Selected(PhotoFile),
    Cleared,
}

/// UI state of the drop zone
#[derive(Debug, Clone, Default)]
pub struct PhotoUpload {
    drag_active: bool,
    picker: Option<String>,
    /// Advisory note or selection problem shown under the zone
    pub hint: Option<String>,
}

impl PhotoUpload {
    /// Whether the zone is armed for a drop (drawn highlighted)
    pub const fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Focus entered the zone
    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    /// Focus left the zone; an open picker is abandoned
    pub fn drag_leave(&mut self) {
        self.drag_active = false;
        self.picker = None;
    }

    /// Path typed so far when the picker prompt is open
    pub fn picker_input(&self) -> Option<&str> {
        self.picker.as_deref()
    }

    /// Open the picker prompt
    pub fn open_picker(&mut self) {
        self.picker = Some(String::new());
        self.hint = None;
    }

    /// Close the picker without choosing
    pub fn cancel_picker(&mut self) {
        self.picker = None;
    }

    /// Type into the picker prompt
    pub fn picker_push(&mut self, c: char) {
        if let Some(input) = &mut self.picker {
            input.push(c);
        }
    }

    /// Delete the last character of the picker prompt
    pub fn picker_pop(&mut self) {
        if let Some(input) = &mut self.picker {
            input.pop();
        }
    }

    /// Choose the path typed into the picker
    pub fn confirm_picker(&mut self) -> Option<PhotoChange> {
        let input = self.picker.take()?;
        let path = parse_dropped_paths(&input).into_iter().next()?;
        self.select(path)
    }

    /// Handle text dropped (pasted) onto the zone.
    ///
    /// Only the first path is used when several files arrive at once.
    pub fn drop_text(&mut self, text: &str) -> Option<PhotoChange> {
        self.drag_active = false;
        self.picker = None;
        let path = parse_dropped_paths(text).into_iter().next()?;
        self.select(path)
    }

    /// Remove the current selection
    pub fn clear(&mut self) -> PhotoChange {
        self.hint = None;
        PhotoChange::Cleared
    }

    fn select(&mut self, path: PathBuf) -> Option<PhotoChange> {
        match PhotoFile::from_path(&path) {
            Ok(photo) => {
                self.hint = (!photo.looks_like_image())
                    .then(|| format!("{} may not be an image", photo.file_name));
                Some(PhotoChange::Selected(photo))
            }
            Err(e) => {
                tracing::debug!("rejected photo path {}: {e}", path.display());
                self.hint = Some(format!("Cannot use {}: {e}", path.display()));
                None
            }
        }
    }
}

/// Extract file paths from dropped text.
///
/// Handles one path per line, `file://` URIs, surrounding quotes and the
/// backslash-escaped spaces some terminals emit.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = line
                .strip_prefix('\'')
                .and_then(|l| l.strip_suffix('\''))
                .or_else(|| line.strip_prefix('"').and_then(|l| l.strip_suffix('"')))
                .unwrap_or(line);
            let line = line.strip_prefix("file://").map_or_else(
                || line.to_string(),
                |rest| urlencoding::decode(rest).map_or_else(|_| rest.to_string(), |d| d.into_owned()),
            );
            PathBuf::from(line.replace("\\ ", " "))
        })
        .collect()
}

//! Model selector shared by the chat and evaluation sessions

use crate::api::{ApiError, ModelEntry};
use tracing::warn;

/// Label shown before the first listing has resolved
pub const LOADING_LABEL: &str = "Loading models...";

/// Label shown when the listing resolved to zero models
pub const NO_MODELS_LABEL: &str = "No models available";

/// Label shown when the listing could not be fetched
pub const LOAD_ERROR_LABEL: &str = "Error loading models";

/// A selectable option
///
/// Placeholder options ("No models available" and friends) carry an empty id,
/// so `selected_id()` stays empty until a real model is selected.
#[derive(Debug, Clone)]
pub struct PickerOption {
    pub id: String,
    pub label: String,
}

impl PickerOption {
    fn placeholder(label: &str) -> Self {
        Self {
            id: String::new(),
            label: label.to_string(),
        }
    }
}

/// Outcome of populating the picker from a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// At least one model was listed; the first one is now selected
    Loaded,
    /// The listing resolved but was empty
    Empty,
    /// The listing could not be fetched
    Failed,
}

/// Selector state: the populated options plus the current selection
#[derive(Debug)]
pub struct ModelPicker {
    options: Vec<PickerOption>,
    selected: usize,
}

impl ModelPicker {
    /// Create a picker in its pre-load state
    pub fn new() -> Self {
        Self {
            options: vec![PickerOption::placeholder(LOADING_LABEL)],
            selected: 0,
        }
    }

    /// Replace all options from a model listing result
    ///
    /// A non-empty listing selects its first entry. An empty or failed
    /// listing leaves a single placeholder option with an empty id.
    pub fn populate(&mut self, listing: Result<Vec<ModelEntry>, ApiError>) -> LoadOutcome {
        self.selected = 0;

        match listing {
            Ok(models) if !models.is_empty() => {
                self.options = models
                    .iter()
                    .map(|model| PickerOption {
                        id: model.name.clone(),
                        label: model.display_label(),
                    })
                    .collect();
                LoadOutcome::Loaded
            }
            Ok(_) => {
                self.options = vec![PickerOption::placeholder(NO_MODELS_LABEL)];
                LoadOutcome::Empty
            }
            Err(error) => {
                warn!(%error, "failed to load model listing");
                self.options = vec![PickerOption::placeholder(LOAD_ERROR_LABEL)];
                LoadOutcome::Failed
            }
        }
    }

    /// Select a model by id; ids not among the populated options are ignored
    pub fn select(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        match self.options.iter().position(|option| option.id == id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Id of the current selection; empty while a placeholder is current
    pub fn selected_id(&self) -> &str {
        &self.options[self.selected].id
    }

    /// Label of the current selection
    pub fn selected_label(&self) -> &str {
        &self.options[self.selected].label
    }

    /// All options, in listing order
    pub fn options(&self) -> &[PickerOption] {
        &self.options
    }
}

impl Default for ModelPicker {
    fn default() -> Self {
        Self::new()
    }
}

//! Evaluation session: select a benchmark and a model, run, collect results

use crate::api::{BenchService, EvalCase, ModelCatalog};
use crate::picker::{LoadOutcome, ModelPicker, PickerOption};
use std::sync::Arc;
use tracing::{info, warn};

/// Blocking notice shown when a run is attempted without both selections
pub const MISSING_SELECTION_NOTICE: &str = "Please select both a model and a benchmark.";

/// Selector placeholder shown when the benchmark listing failed
pub const BENCHMARKS_FAILED_LABEL: &str = "Error loading benchmarks";

/// Description panel text shown when the benchmark listing failed
pub const BENCHMARKS_FAILED_NOTICE: &str =
    "Failed to load benchmarks. Please try refreshing the page.";

/// Description panel text for a name missing from the listing
pub const NO_DESCRIPTION: &str = "No description available.";

/// Description panel text when the description lookup itself failed
pub const DESCRIPTION_FAILED: &str = "Error loading benchmark description.";

/// Lifecycle of the most recent run, with its display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running(String),
    Completed(String),
    Failed(String),
}

impl RunStatus {
    /// Display text for the status banner
    pub fn text(&self) -> &str {
        match self {
            RunStatus::Idle => "",
            RunStatus::Running(text) | RunStatus::Completed(text) | RunStatus::Failed(text) => {
                text
            }
        }
    }
}

/// Outcome of a run operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Rejected client-side; no request was issued
    MissingSelection,
    Completed,
    Failed,
}

/// Controller state for the benchmark-evaluation view
///
/// One run is in flight at a time: `run` takes `&mut self` and is awaited to
/// completion, so a second run cannot start while one is pending. The
/// `run_enabled` flag mirrors that state for frontends.
pub struct EvaluationSession {
    service: Arc<dyn BenchService>,
    catalog: Arc<dyn ModelCatalog>,
    picker: ModelPicker,
    benchmarks: Vec<PickerOption>,
    selected_benchmark: String,
    description: String,
    status: RunStatus,
    results: Vec<EvalCase>,
    run_enabled: bool,
}

impl EvaluationSession {
    /// Create a session with unpopulated selectors
    pub fn new(service: Arc<dyn BenchService>, catalog: Arc<dyn ModelCatalog>) -> Self {
        Self {
            service,
            catalog,
            picker: ModelPicker::new(),
            benchmarks: Vec::new(),
            selected_benchmark: String::new(),
            description: String::new(),
            status: RunStatus::Idle,
            results: Vec::new(),
            run_enabled: true,
        }
    }

    /// Populate the benchmark selector (run once on mount)
    ///
    /// On success the first benchmark is selected and its description loaded.
    pub async fn load_benchmarks(&mut self) {
        match self.service.list_benchmarks().await {
            Ok(listing) => {
                self.benchmarks = listing
                    .keys()
                    .map(|name| PickerOption {
                        id: name.clone(),
                        label: name.clone(),
                    })
                    .collect();

                if let Some(first) = self.benchmarks.first().map(|option| option.id.clone()) {
                    self.select_benchmark(&first).await;
                }
            }
            Err(error) => {
                warn!(%error, "failed to load benchmarks");
                self.benchmarks = vec![PickerOption {
                    id: String::new(),
                    label: BENCHMARKS_FAILED_LABEL.to_string(),
                }];
                self.description = BENCHMARKS_FAILED_NOTICE.to_string();
            }
        }
    }

    /// Select a benchmark and load its description
    ///
    /// The description is always looked up against a fresh listing fetch;
    /// nothing is cached between selection changes.
    pub async fn select_benchmark(&mut self, name: &str) {
        self.selected_benchmark = name.to_string();

        match self.service.list_benchmarks().await {
            Ok(listing) => {
                self.description = listing
                    .get(name)
                    .map(|benchmark| benchmark.description.clone())
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string());
            }
            Err(error) => {
                warn!(%error, benchmark = name, "failed to load benchmark description");
                self.description = DESCRIPTION_FAILED.to_string();
            }
        }
    }

    /// Populate the model picker from the catalog (run once on mount)
    pub async fn load_models(&mut self) -> LoadOutcome {
        self.picker.populate(self.catalog.list_models().await)
    }

    /// Switch to one of the populated models; no network call
    pub fn select_model(&mut self, id: &str) -> bool {
        self.picker.select(id)
    }

    /// Run the selected benchmark against the selected model
    ///
    /// Rejected client-side when either selection is empty. The run control
    /// is re-enabled on every settled path.
    pub async fn run(&mut self) -> RunOutcome {
        let model_id = self.picker.selected_id().to_string();
        let benchmark = self.selected_benchmark.clone();

        if model_id.is_empty() || benchmark.is_empty() {
            return RunOutcome::MissingSelection;
        }

        self.status = RunStatus::Running(format!(
            "Running evaluation of {model_id} on {benchmark}..."
        ));
        self.results.clear();
        self.run_enabled = false;
        info!(model = %model_id, benchmark = %benchmark, "starting evaluation");

        let outcome = match self.service.run_evaluation(&model_id, &benchmark).await {
            Ok(summary) => {
                self.status =
                    RunStatus::Completed(format!("Evaluation completed: {}", summary.status));
                self.results = summary.results;
                RunOutcome::Completed
            }
            Err(error) => {
                warn!(%error, "evaluation failed");
                self.status = RunStatus::Failed(format!("Error: {error}"));
                RunOutcome::Failed
            }
        };

        self.run_enabled = true;
        outcome
    }

    /// Benchmark selector options, in listing order
    pub fn benchmarks(&self) -> &[PickerOption] {
        &self.benchmarks
    }

    /// Name of the selected benchmark; empty when none is selected
    pub fn selected_benchmark(&self) -> &str {
        &self.selected_benchmark
    }

    /// Description panel text for the selected benchmark
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    /// Result rows from the most recent completed run
    pub fn results(&self) -> &[EvalCase] {
        &self.results
    }

    /// Whether the run control is currently enabled
    pub fn run_enabled(&self) -> bool {
        self.run_enabled
    }

    pub fn picker(&self) -> &ModelPicker {
        &self.picker
    }
}

use super::selection::StyleSelection;
use super::validation::ValidationError;
use crate::config::DEFAULT_SIZE;
use crate::error::CONNECTIVITY_MESSAGE;
use crate::models::{
    GenerationRecord, GenerationResult, HealthStatus, PurposeOption, SizeOption, StyleOption,
};
use std::collections::BTreeSet;
use std::fmt;

/// Submit lifecycle. `Loading` is the only transient phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// The initial reads issued when the form opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InitSource {
    Styles,
    Sizes,
    Health,
    Purposes,
}

impl InitSource {
    /// Purposes are optional; losing them does not raise the connectivity error.
    pub fn is_required(&self) -> bool {
        !matches!(self, InitSource::Purposes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InitSource::Styles => "styles",
            InitSource::Sizes => "sizes",
            InitSource::Health => "health",
            InitSource::Purposes => "purposes",
        }
    }
}

impl fmt::Display for InitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StylesLoaded(Vec<StyleOption>),
    SizesLoaded(Vec<SizeOption>),
    PurposesLoaded(Vec<PurposeOption>),
    HealthChecked(HealthStatus),
    InitFailed(InitSource),

    SetTheme(String),
    ToggleStyle(String),
    SelectSize(String),
    SelectPurpose(Option<String>),
    SetExtraDescription(String),

    ValidationFailed(ValidationError),
    SubmitStarted,
    SubmitSucceeded(GenerationResult),
    SubmitFailed(String),

    HistoryLoaded(Vec<GenerationRecord>),
}

/// Snapshot of the whole form. Only [`FormState::reduce`] produces new snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    styles: Vec<StyleOption>,
    sizes: Vec<SizeOption>,
    purposes: Vec<PurposeOption>,
    health: HealthStatus,

    theme: String,
    selection: StyleSelection,
    size: String,
    purpose: Option<String>,
    extra_description: String,

    phase: SubmitPhase,
    result: Option<GenerationResult>,
    error: Option<String>,
    init_failures: BTreeSet<InitSource>,

    last_generation_id: Option<String>,
    history: Vec<GenerationRecord>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl FormState {
    pub fn new(default_size: impl Into<String>) -> Self {
        Self {
            styles: Vec::new(),
            sizes: Vec::new(),
            purposes: Vec::new(),
            health: HealthStatus::Unknown,
            theme: String::new(),
            selection: StyleSelection::new(),
            size: default_size.into(),
            purpose: None,
            extra_description: String::new(),
            phase: SubmitPhase::Idle,
            result: None,
            error: None,
            init_failures: BTreeSet::new(),
            last_generation_id: None,
            history: Vec::new(),
        }
    }

    pub fn reduce(mut self, action: Action) -> Self {
        let loading = self.is_loading();

        match action {
            Action::StylesLoaded(styles) => {
                self.selection.retain_known(&styles);
                self.styles = styles;
            }
            Action::SizesLoaded(sizes) => self.sizes = sizes,
            Action::PurposesLoaded(purposes) => {
                if let Some(chosen) = &self.purpose {
                    if !purposes.iter().any(|p| &p.id == chosen) {
                        self.purpose = None;
                    }
                }
                self.purposes = purposes;
            }
            Action::HealthChecked(status) => self.health = status,
            Action::InitFailed(source) => {
                self.init_failures.insert(source);
                if source.is_required() {
                    self.result = None;
                    self.error = Some(CONNECTIVITY_MESSAGE.to_string());
                }
            }

            // Inputs are disabled while a request is in flight.
            Action::SetTheme(_)
            | Action::ToggleStyle(_)
            | Action::SelectSize(_)
            | Action::SelectPurpose(_)
            | Action::SetExtraDescription(_)
            | Action::ValidationFailed(_)
            | Action::SubmitStarted
                if loading => {}

            Action::SetTheme(theme) => self.theme = theme,
            Action::ToggleStyle(id) => self.selection.toggle(&id),
            Action::SelectSize(size) => self.size = size,
            Action::SelectPurpose(purpose) => self.purpose = purpose,
            Action::SetExtraDescription(extra) => self.extra_description = extra,

            Action::ValidationFailed(err) => {
                self.result = None;
                self.error = Some(err.to_string());
                self.phase = SubmitPhase::Failed;
            }
            Action::SubmitStarted => {
                self.result = None;
                self.error = None;
                self.phase = SubmitPhase::Loading;
            }
            Action::SubmitSucceeded(result) => {
                if self.last_generation_id.as_deref() != Some(result.generation_id.as_str()) {
                    self.history.clear();
                }
                self.last_generation_id = Some(result.generation_id.clone());
                self.result = Some(result);
                self.error = None;
                self.phase = SubmitPhase::Succeeded;
            }
            Action::SubmitFailed(message) => {
                self.result = None;
                self.error = Some(message);
                self.phase = SubmitPhase::Failed;
            }

            Action::HistoryLoaded(records) => self.history = records,
        }

        self
    }

    pub fn styles(&self) -> &[StyleOption] {
        &self.styles
    }

    pub fn sizes(&self) -> &[SizeOption] {
        &self.sizes
    }

    pub fn purposes(&self) -> &[PurposeOption] {
        &self.purposes
    }

    pub fn health(&self) -> HealthStatus {
        self.health
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn selection(&self) -> &StyleSelection {
        &self.selection
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    pub fn extra_description(&self) -> &str {
        &self.extra_description
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn init_failures(&self) -> &BTreeSet<InitSource> {
        &self.init_failures
    }

    /// Id of the most recent successful generation, kept across later failures.
    /// Only used to tell when the loaded history belongs to an older generation.
    pub fn last_generation_id(&self) -> Option<&str> {
        self.last_generation_id.as_deref()
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SubmitPhase::Loading
    }

    /// Submit (and refine) is offered only when idle and the backend reported healthy.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && self.health.is_healthy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str) -> GenerationResult {
        GenerationResult {
            generation_id: id.into(),
            optimized_prompt: "p".into(),
            image_url: None,
            original_generation_id: None,
        }
    }

    fn healthy() -> FormState {
        FormState::default().reduce(Action::HealthChecked(HealthStatus::Healthy))
    }

    #[test]
    fn test_defaults() {
        let state = FormState::default();
        assert_eq!(state.size(), "square_medium");
        assert_eq!(state.phase(), SubmitPhase::Idle);
        assert_eq!(state.health(), HealthStatus::Unknown);
        assert!(!state.can_submit());
    }

    #[test]
    fn test_health_gates_submit() {
        for status in [HealthStatus::Unknown, HealthStatus::Unhealthy] {
            let state = FormState::default()
                .reduce(Action::HealthChecked(status))
                .reduce(Action::SetTheme("cat".into()))
                .reduce(Action::ToggleStyle("A".into()));
            assert!(!state.can_submit());
        }
        assert!(healthy().can_submit());
    }

    #[test]
    fn test_loading_disables_submit_and_inputs() {
        let state = healthy()
            .reduce(Action::SetTheme("cat".into()))
            .reduce(Action::SubmitStarted);
        assert!(state.is_loading());
        assert!(!state.can_submit());

        let after = state
            .clone()
            .reduce(Action::SetTheme("dog".into()))
            .reduce(Action::ToggleStyle("A".into()))
            .reduce(Action::SubmitStarted);
        assert_eq!(after, state);
    }

    #[test]
    fn test_submit_clears_previous_result_and_error() {
        let state = healthy()
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(result("g1")));
        assert_eq!(state.result().map(|r| r.generation_id.as_str()), Some("g1"));
        assert_eq!(state.phase(), SubmitPhase::Succeeded);

        let state = state.reduce(Action::SubmitStarted);
        assert!(state.result().is_none());
        assert!(state.error().is_none());

        let state = state.reduce(Action::SubmitFailed("quota exceeded".into()));
        assert!(state.result().is_none());
        assert_eq!(state.error(), Some("quota exceeded"));
        assert_eq!(state.phase(), SubmitPhase::Failed);
        assert_eq!(state.last_generation_id(), Some("g1"));
    }

    #[test]
    fn test_validation_failure_replaces_result() {
        let state = healthy()
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(result("g1")))
            .reduce(Action::ValidationFailed(ValidationError::EmptyTheme));
        assert!(state.result().is_none());
        assert_eq!(state.error(), Some("please enter a theme"));
    }

    #[test]
    fn test_required_init_failure_sets_connectivity_error() {
        let state = FormState::default()
            .reduce(Action::StylesLoaded(vec![StyleOption::new("A", "Alpha")]))
            .reduce(Action::InitFailed(InitSource::Health))
            .reduce(Action::InitFailed(InitSource::Sizes));
        assert_eq!(state.error(), Some(CONNECTIVITY_MESSAGE));
        assert_eq!(state.styles().len(), 1);
        assert_eq!(
            state.init_failures().iter().copied().collect::<Vec<_>>(),
            vec![InitSource::Sizes, InitSource::Health]
        );
    }

    #[test]
    fn test_init_failure_hides_existing_result() {
        let state = healthy()
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(result("g1")))
            .reduce(Action::InitFailed(InitSource::Sizes));
        assert!(state.result().is_none());
        assert_eq!(state.error(), Some(CONNECTIVITY_MESSAGE));

        let state = healthy()
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(result("g1")))
            .reduce(Action::InitFailed(InitSource::Purposes));
        assert_eq!(state.result().map(|r| r.generation_id.as_str()), Some("g1"));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_optional_init_failure_is_quiet() {
        let state = FormState::default().reduce(Action::InitFailed(InitSource::Purposes));
        assert!(state.error().is_none());
        assert!(state.init_failures().contains(&InitSource::Purposes));
    }

    #[test]
    fn test_catalog_load_prunes_unknown_selection() {
        let state = FormState::default()
            .reduce(Action::ToggleStyle("A".into()))
            .reduce(Action::ToggleStyle("Z".into()))
            .reduce(Action::StylesLoaded(vec![
                StyleOption::new("A", "Alpha"),
                StyleOption::new("B", "Beta"),
            ]));
        assert!(state.selection().contains("A"));
        assert!(!state.selection().contains("Z"));
    }

    #[test]
    fn test_purpose_cleared_when_not_offered() {
        let state = FormState::default()
            .reduce(Action::SelectPurpose(Some("gift".into())))
            .reduce(Action::PurposesLoaded(vec![PurposeOption::new("sticker", "贴纸")]));
        assert_eq!(state.purpose(), None);
    }

    #[test]
    fn test_history_reset_on_new_generation() {
        let record = GenerationRecord {
            generation_id: "g1".into(),
            image_url: None,
            optimized_prompt: "p".into(),
            refine_instruction: None,
            parent_id: None,
            seed: None,
            model: None,
            created_at: None,
        };
        let state = healthy()
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(result("g1")))
            .reduce(Action::HistoryLoaded(vec![record]));
        assert_eq!(state.history().len(), 1);

        let state = state
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(result("g2")));
        assert!(state.history().is_empty());
    }
}

use super::state::{Action, FormState, InitSource};
use super::validation::{build_generation_request, build_refine_request, ValidationError};
use super::view::FormView;
use crate::{
    api::{GenerationApi, HttpApiClient},
    config::ClientConfig,
    error::{IllustError, Result},
    logger,
    models::{
        GenerationRecord, GenerationRequest, GenerationResult, HealthStatus, RefineRequest,
    },
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What happened to one submit (or refine) attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The control was disabled: a request is in flight or the backend is not healthy.
    Disabled,
    /// Rejected locally; nothing was sent.
    Rejected(ValidationError),
    Generated(GenerationResult),
    /// The request failed; carries the message shown in the error panel.
    Failed(String),
}

/// Which initial reads failed. Each successful read has already landed in the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub failed: BTreeSet<InitSource>,
}

impl InitReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// True when a required read failed and the connectivity error is showing.
    pub fn has_connectivity_error(&self) -> bool {
        self.failed.iter().any(InitSource::is_required)
    }
}

/// Owns the form snapshot and drives backend calls for it.
pub struct FormSession {
    api: Arc<dyn GenerationApi>,
    state: FormState,
}

impl FormSession {
    pub fn new(api: Arc<dyn GenerationApi>) -> Self {
        Self {
            api,
            state: FormState::default(),
        }
    }

    pub fn with_default_size(api: Arc<dyn GenerationApi>, size: impl Into<String>) -> Self {
        Self {
            api,
            state: FormState::new(size),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = HttpApiClient::from_config(config)?;
        Ok(Self::with_default_size(
            Arc::new(client),
            config.default_size.clone(),
        ))
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn view(&self) -> FormView {
        FormView::from_state(&self.state)
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.dispatch(Action::SetTheme(theme.into()));
    }

    pub fn toggle_style(&mut self, id: impl Into<String>) {
        self.dispatch(Action::ToggleStyle(id.into()));
    }

    pub fn select_size(&mut self, id: impl Into<String>) {
        self.dispatch(Action::SelectSize(id.into()));
    }

    pub fn select_purpose(&mut self, id: Option<String>) {
        self.dispatch(Action::SelectPurpose(id));
    }

    pub fn set_extra_description(&mut self, extra: impl Into<String>) {
        self.dispatch(Action::SetExtraDescription(extra.into()));
    }

    /// Fetches styles, sizes, health and purposes concurrently and settles
    /// every result into the state, whichever order they finish in.
    pub async fn initialize(&mut self) -> InitReport {
        let api = Arc::clone(&self.api);
        let (styles, sizes, health, purposes) = futures::join!(
            api.list_styles(),
            api.list_sizes(),
            api.health(),
            api.list_purposes()
        );

        let mut report = InitReport::default();
        self.settle(&mut report, InitSource::Styles, styles, Action::StylesLoaded);
        self.settle(&mut report, InitSource::Sizes, sizes, Action::SizesLoaded);
        self.settle(&mut report, InitSource::Health, health, |response| {
            if response.status != crate::models::HEALTHY {
                log::warn!("⚠️  Backend reports status {:?}", response.status);
            }
            Action::HealthChecked(HealthStatus::from(&response))
        });
        self.settle(
            &mut report,
            InitSource::Purposes,
            purposes,
            Action::PurposesLoaded,
        );

        if report.is_complete() {
            log::info!(
                "✅ Form ready: {} styles, {} sizes, {} purposes",
                self.state.styles().len(),
                self.state.sizes().len(),
                self.state.purposes().len()
            );
        }
        report
    }

    fn settle<T>(
        &mut self,
        report: &mut InitReport,
        source: InitSource,
        result: Result<T>,
        on_ok: impl FnOnce(T) -> Action,
    ) {
        match result {
            Ok(value) => self.dispatch(on_ok(value)),
            Err(e) => {
                if source.is_required() {
                    log::error!("❌ Failed to load {}: {}", source, e);
                } else {
                    log::warn!("⚠️  Optional {} unavailable: {}", source, e);
                }
                report.failed.insert(source);
                self.dispatch(Action::InitFailed(source));
            }
        }
    }

    /// Validates and moves the form into loading. Returns the payload to send,
    /// or the outcome when nothing should be sent.
    pub fn prepare_submit(&mut self) -> std::result::Result<GenerationRequest, SubmitOutcome> {
        if !self.state.can_submit() {
            log::debug!("Submit ignored: control disabled");
            return Err(SubmitOutcome::Disabled);
        }
        match build_generation_request(&self.state) {
            Ok(request) => {
                self.dispatch(Action::SubmitStarted);
                Ok(request)
            }
            Err(e) => {
                log::debug!("Submit rejected: {}", e);
                self.dispatch(Action::ValidationFailed(e.clone()));
                Err(SubmitOutcome::Rejected(e))
            }
        }
    }

    /// Settles a finished generate or refine call. Always leaves loading.
    pub fn complete_submit(&mut self, response: Result<GenerationResult>) -> SubmitOutcome {
        match response {
            Ok(result) => {
                log::info!("✅ Generation {} ready", result.generation_id);
                self.dispatch(Action::SubmitSucceeded(result.clone()));
                SubmitOutcome::Generated(result)
            }
            Err(e) => {
                log::error!("❌ Generation failed: {}", e);
                let message = e.user_message();
                self.dispatch(Action::SubmitFailed(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let request = match self.prepare_submit() {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };

        let mut timer = logger::timer("generate");
        let response = self.api.generate(&request).await;
        timer.stop();

        self.complete_submit(response)
    }

    pub fn prepare_refine(
        &mut self,
        instruction: &str,
    ) -> std::result::Result<RefineRequest, SubmitOutcome> {
        if !self.state.can_submit() {
            return Err(SubmitOutcome::Disabled);
        }
        match build_refine_request(&self.state, instruction) {
            Ok(request) => {
                self.dispatch(Action::SubmitStarted);
                Ok(request)
            }
            Err(e) => {
                self.dispatch(Action::ValidationFailed(e.clone()));
                Err(SubmitOutcome::Rejected(e))
            }
        }
    }

    /// Asks the backend to rework the latest generation with `instruction`.
    pub async fn refine(&mut self, instruction: &str) -> SubmitOutcome {
        let request = match self.prepare_refine(instruction) {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };

        let mut timer = logger::timer("refine");
        let response = self.api.refine(&request).await;
        timer.stop();

        self.complete_submit(response)
    }

    /// Loads the refinement chain of the current result into the state.
    pub async fn load_history(&mut self) -> Result<usize> {
        let generation_id = self
            .state
            .result()
            .ok_or(ValidationError::NoGeneration)?
            .generation_id
            .clone();

        let records = self.api.generation_history(&generation_id).await?;
        let count = records.len();
        log::info!("📜 Loaded {} history entries for {}", count, generation_id);
        self.dispatch(Action::HistoryLoaded(records));
        Ok(count)
    }

    pub async fn lookup_generation(&self, generation_id: &str) -> Result<GenerationRecord> {
        let generation_id = generation_id.trim();
        if generation_id.is_empty() {
            return Err(IllustError::Validation(ValidationError::NoGeneration));
        }
        self.api.get_generation(generation_id).await
    }

    /// Downloads the current result's image to `path`, or to a timestamped
    /// file in the working directory.
    pub async fn save_image(&self, path: Option<&Path>) -> Result<PathBuf> {
        let result = self
            .state
            .result()
            .ok_or(IllustError::Validation(ValidationError::NoGeneration))?;
        let url = result
            .image_url
            .as_deref()
            .ok_or_else(|| IllustError::Response("result has no image".into()))?;

        let bytes = self.api.fetch_image(url).await?;
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(format!(
                "illustration_{}_{}.png",
                result.generation_id,
                chrono::Utc::now().timestamp()
            )),
        };
        tokio::fs::write(&target, &bytes).await?;
        log::info!("💾 Image saved to: {} ({} bytes)", target.display(), bytes.len());
        Ok(target)
    }
}

use crate::{
    error::{IllustError, Result},
    models::{
        GenerationRecord, GenerationRequest, GenerationResult, HealthResponse, PurposeOption,
        RefineRequest, SizeOption, StyleOption,
    },
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::GenerationApi;

/// Canned backend for session tests. `None` in a slot makes that call fail.
pub(crate) struct FakeApi {
    pub health: Option<String>,
    pub styles: Option<Vec<StyleOption>>,
    pub sizes: Option<Vec<SizeOption>>,
    pub purposes: Option<Vec<PurposeOption>>,
    pub generate_response: Mutex<Option<Result<GenerationResult>>>,
    pub history: Vec<GenerationRecord>,
    pub image: Option<Vec<u8>>,
    pub generate_calls: AtomicUsize,
    pub refine_calls: AtomicUsize,
    pub last_generate: Mutex<Option<GenerationRequest>>,
    pub last_refine: Mutex<Option<RefineRequest>>,
}

fn unreachable() -> IllustError {
    IllustError::Http {
        status: 503,
        detail: None,
    }
}

impl FakeApi {
    pub fn healthy() -> Self {
        Self {
            health: Some("healthy".into()),
            styles: Some(vec![
                StyleOption::new("q_version", "Q版漫画"),
                StyleOption::new("fluffy", "毛绒质感"),
                StyleOption::new("ghibli", "吉卜力童话"),
            ]),
            sizes: Some(vec![
                SizeOption::new("square_small", "小正方形", "512x512"),
                SizeOption::new("square_medium", "中正方形", "1024x1024"),
            ]),
            purposes: Some(vec![PurposeOption::new("sticker", "表情包/贴纸")]),
            generate_response: Mutex::new(None),
            history: Vec::new(),
            image: None,
            generate_calls: AtomicUsize::new(0),
            refine_calls: AtomicUsize::new(0),
            last_generate: Mutex::new(None),
            last_refine: Mutex::new(None),
        }
    }

    pub fn responding(self, response: Result<GenerationResult>) -> Self {
        *self.generate_response.lock().unwrap() = Some(response);
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn refine_calls(&self) -> usize {
        self.refine_calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Result<GenerationResult> {
        self.generate_response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(unreachable()))
    }
}

#[async_trait]
impl GenerationApi for FakeApi {
    async fn health(&self) -> Result<HealthResponse> {
        self.health
            .clone()
            .map(|status| HealthResponse { status })
            .ok_or_else(unreachable)
    }

    async fn list_styles(&self) -> Result<Vec<StyleOption>> {
        self.styles.clone().ok_or_else(unreachable)
    }

    async fn list_sizes(&self) -> Result<Vec<SizeOption>> {
        self.sizes.clone().ok_or_else(unreachable)
    }

    async fn list_purposes(&self) -> Result<Vec<PurposeOption>> {
        self.purposes.clone().ok_or_else(unreachable)
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_generate.lock().unwrap() = Some(request.clone());
        self.next_response()
    }

    async fn refine(&self, request: &RefineRequest) -> Result<GenerationResult> {
        self.refine_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_refine.lock().unwrap() = Some(request.clone());
        self.next_response()
    }

    async fn get_generation(&self, generation_id: &str) -> Result<GenerationRecord> {
        self.history
            .iter()
            .find(|r| r.generation_id == generation_id)
            .cloned()
            .ok_or_else(|| IllustError::Http {
                status: 404,
                detail: Some(format!("generation not found: {}", generation_id)),
            })
    }

    async fn generation_history(&self, _generation_id: &str) -> Result<Vec<GenerationRecord>> {
        Ok(self.history.clone())
    }

    async fn fetch_image(&self, _url: &str) -> Result<Vec<u8>> {
        self.image.clone().ok_or_else(unreachable)
    }
}

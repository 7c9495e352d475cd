pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logger;
pub mod models;

pub use api::{GenerationApi, HttpApiClient};
pub use config::ClientConfig;
pub use error::{IllustError, Result};
pub use form::{Action, FormSession, FormState, FormView, InitReport, SubmitOutcome};
pub use models::*;

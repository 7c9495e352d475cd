//! The generation form: state snapshot, reducer, validation, session
//! controller and render model.

pub mod selection;
pub mod session;
pub mod state;
pub mod validation;
pub mod view;

pub use selection::StyleSelection;
pub use session::{FormSession, InitReport, SubmitOutcome};
pub use state::{Action, FormState, InitSource, SubmitPhase};
pub use validation::ValidationError;
pub use view::FormView;

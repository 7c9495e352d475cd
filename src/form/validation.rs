use super::state::FormState;
use crate::models::{GenerationRequest, RefineRequest, STYLE_STRENGTH};
use thiserror::Error;

pub const MAX_THEME_CHARS: usize = 200;
pub const MAX_EXTRA_DESCRIPTION_CHARS: usize = 500;
pub const MAX_REFINE_INSTRUCTION_CHARS: usize = 200;

/// Input problems caught before anything is sent to the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please enter a theme")]
    EmptyTheme,

    #[error("please choose at least one style")]
    NoStyleSelected,

    #[error("theme must be at most {max} characters")]
    ThemeTooLong { max: usize },

    #[error("extra description must be at most {max} characters")]
    ExtraDescriptionTooLong { max: usize },

    #[error("generate an illustration first")]
    NoGeneration,

    #[error("please enter a refine instruction")]
    EmptyRefineInstruction,

    #[error("refine instruction must be at most {max} characters")]
    RefineInstructionTooLong { max: usize },
}

/// Checks the form and builds the generate payload.
///
/// The theme check runs first, then the style check; length limits after that.
pub fn build_generation_request(state: &FormState) -> Result<GenerationRequest, ValidationError> {
    let theme = state.theme().trim();
    if theme.is_empty() {
        return Err(ValidationError::EmptyTheme);
    }
    if state.selection().is_empty() {
        return Err(ValidationError::NoStyleSelected);
    }
    if theme.chars().count() > MAX_THEME_CHARS {
        return Err(ValidationError::ThemeTooLong {
            max: MAX_THEME_CHARS,
        });
    }

    let extra = state.extra_description().trim();
    if extra.chars().count() > MAX_EXTRA_DESCRIPTION_CHARS {
        return Err(ValidationError::ExtraDescriptionTooLong {
            max: MAX_EXTRA_DESCRIPTION_CHARS,
        });
    }

    Ok(GenerationRequest {
        theme: theme.to_string(),
        styles: state.selection().to_vec(),
        size: state.size().to_string(),
        purpose: state.purpose().map(str::to_string),
        extra_description: (!extra.is_empty()).then(|| extra.to_string()),
        style_strength: STYLE_STRENGTH,
    })
}

pub fn build_refine_request(
    state: &FormState,
    instruction: &str,
) -> Result<RefineRequest, ValidationError> {
    let generation_id = state
        .result()
        .map(|r| r.generation_id.as_str())
        .ok_or(ValidationError::NoGeneration)?;
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(ValidationError::EmptyRefineInstruction);
    }
    if instruction.chars().count() > MAX_REFINE_INSTRUCTION_CHARS {
        return Err(ValidationError::RefineInstructionTooLong {
            max: MAX_REFINE_INSTRUCTION_CHARS,
        });
    }

    Ok(RefineRequest {
        generation_id: generation_id.to_string(),
        refine_instruction: instruction.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::state::Action;
    use crate::models::GenerationResult;
    use serde_json::json;

    fn state_with(theme: &str, styles: &[&str], extra: &str) -> FormState {
        let mut state = FormState::default();
        state = state.reduce(Action::SetTheme(theme.into()));
        for id in styles {
            state = state.reduce(Action::ToggleStyle(id.to_string()));
        }
        state.reduce(Action::SetExtraDescription(extra.into()))
    }

    #[test]
    fn test_blank_themes_are_rejected() {
        for theme in ["", " ", "\t", "  \n  "] {
            let state = state_with(theme, &["A"], "");
            assert_eq!(
                build_generation_request(&state),
                Err(ValidationError::EmptyTheme),
                "theme {:?}",
                theme
            );
        }
    }

    #[test]
    fn test_theme_checked_before_styles() {
        let state = state_with("   ", &[], "");
        assert_eq!(
            build_generation_request(&state),
            Err(ValidationError::EmptyTheme)
        );
    }

    #[test]
    fn test_no_styles_rejected() {
        let state = state_with("cat", &[], "");
        let err = build_generation_request(&state).unwrap_err();
        assert_eq!(err, ValidationError::NoStyleSelected);
        assert_eq!(err.to_string(), "please choose at least one style");
    }

    #[test]
    fn test_payload_shape() {
        let state = state_with("cat", &["A", "B"], "");
        let request = build_generation_request(&state).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "theme": "cat",
                "styles": ["A", "B"],
                "size": "square_medium",
                "extra_description": null,
                "style_strength": 0.8
            })
        );
    }

    #[test]
    fn test_payload_trims_and_carries_purpose() {
        let state = state_with("  a cat with a bow  ", &["fluffy"], "  playing on grass ")
            .reduce(Action::SelectSize("portrait_hd".into()))
            .reduce(Action::SelectPurpose(Some("sticker".into())));
        let request = build_generation_request(&state).unwrap();
        assert_eq!(request.theme, "a cat with a bow");
        assert_eq!(request.extra_description.as_deref(), Some("playing on grass"));
        assert_eq!(request.size, "portrait_hd");
        assert_eq!(request.purpose.as_deref(), Some("sticker"));
    }

    #[test]
    fn test_length_limits() {
        let long_theme = "猫".repeat(MAX_THEME_CHARS + 1);
        let state = state_with(&long_theme, &["A"], "");
        assert_eq!(
            build_generation_request(&state),
            Err(ValidationError::ThemeTooLong { max: 200 })
        );

        let at_limit = "猫".repeat(MAX_THEME_CHARS);
        assert!(build_generation_request(&state_with(&at_limit, &["A"], "")).is_ok());

        let long_extra = "x".repeat(MAX_EXTRA_DESCRIPTION_CHARS + 1);
        assert_eq!(
            build_generation_request(&state_with("cat", &["A"], &long_extra)),
            Err(ValidationError::ExtraDescriptionTooLong { max: 500 })
        );
    }

    #[test]
    fn test_refine_request() {
        let state = FormState::default();
        assert_eq!(
            build_refine_request(&state, "fatter"),
            Err(ValidationError::NoGeneration)
        );

        let state = state
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(GenerationResult {
                generation_id: "gen_1".into(),
                optimized_prompt: "a cat".into(),
                image_url: None,
                original_generation_id: None,
            }));
        assert_eq!(
            build_refine_request(&state, "  "),
            Err(ValidationError::EmptyRefineInstruction)
        );
        let request = build_refine_request(&state, " fatter, plush ").unwrap();
        assert_eq!(request.generation_id, "gen_1");
        assert_eq!(request.refine_instruction, "fatter, plush");
    }

    #[test]
    fn test_refine_needs_visible_result() {
        let state = FormState::default()
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(GenerationResult {
                generation_id: "gen_1".into(),
                optimized_prompt: "a cat".into(),
                image_url: None,
                original_generation_id: None,
            }))
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitFailed("quota exceeded".into()));
        assert_eq!(state.last_generation_id(), Some("gen_1"));
        assert_eq!(
            build_refine_request(&state, "fatter"),
            Err(ValidationError::NoGeneration)
        );
    }
}

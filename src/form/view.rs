use super::state::{FormState, InitSource};
use crate::error::CONNECTIVITY_MESSAGE;
use colored::*;
use std::fmt;

pub const CONNECTED_GLYPH: &str = "✅";
pub const DISCONNECTED_GLYPH: &str = "❌";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleButton {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub message: String,
    /// Required initial reads that failed, listed with the connectivity message.
    pub failed_sources: Vec<InitSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel {
    pub generation_id: String,
    pub optimized_prompt: String,
    /// Present only when the backend returned an image URL.
    pub image_url: Option<String>,
    pub refined_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub generation_id: String,
    pub summary: String,
}

/// Everything a front end needs to draw the form, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub connected: bool,
    pub theme: String,
    pub extra_description: String,
    pub styles: Vec<StyleButton>,
    pub sizes: Vec<Choice>,
    pub purposes: Vec<Choice>,
    pub inputs_enabled: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub error: Option<ErrorPanel>,
    pub result: Option<ResultPanel>,
    pub history: Vec<HistoryLine>,
}

impl FormView {
    pub fn from_state(state: &FormState) -> Self {
        let styles = state
            .styles()
            .iter()
            .map(|style| StyleButton {
                id: style.id.clone(),
                name: style.name.clone(),
                selected: state.selection().contains(&style.id),
            })
            .collect();

        let sizes = state
            .sizes()
            .iter()
            .map(|size| Choice {
                id: size.id.clone(),
                label: size.label(),
                selected: size.id == state.size(),
            })
            .collect();

        let purposes = state
            .purposes()
            .iter()
            .map(|purpose| Choice {
                id: purpose.id.clone(),
                label: purpose.name.clone(),
                selected: state.purpose() == Some(purpose.id.as_str()),
            })
            .collect();

        let error = state.error().map(|message| ErrorPanel {
            message: message.to_string(),
            failed_sources: if message == CONNECTIVITY_MESSAGE {
                state
                    .init_failures()
                    .iter()
                    .copied()
                    .filter(InitSource::is_required)
                    .collect()
            } else {
                Vec::new()
            },
        });

        let result = state.result().map(|result| ResultPanel {
            generation_id: result.generation_id.clone(),
            optimized_prompt: result.optimized_prompt.clone(),
            image_url: result.image_url.clone().filter(|url| !url.is_empty()),
            refined_from: result.original_generation_id.clone(),
        });

        let history = state
            .history()
            .iter()
            .map(|record| HistoryLine {
                generation_id: record.generation_id.clone(),
                summary: match &record.refine_instruction {
                    Some(instruction) => format!("refined: {}", instruction),
                    None => "original".to_string(),
                },
            })
            .collect();

        FormView {
            connected: state.health().is_healthy(),
            theme: state.theme().to_string(),
            extra_description: state.extra_description().to_string(),
            styles,
            sizes,
            purposes,
            inputs_enabled: !state.is_loading(),
            submit_enabled: state.can_submit(),
            submit_label: if state.is_loading() {
                "Generating..."
            } else {
                "Generate illustration"
            },
            error,
            result,
            history,
        }
    }

    pub fn status_line(&self) -> String {
        if self.connected {
            format!("Backend: {} connected", CONNECTED_GLYPH)
        } else {
            format!("Backend: {} disconnected", DISCONNECTED_GLYPH)
        }
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "Cute Illustration Generator".bold())?;
        writeln!(f, "{}", self.status_line())?;
        writeln!(f)?;

        writeln!(f, "{} {}", "Theme *:".bold(), self.theme)?;

        write!(f, "{}", "Styles * (toggle):".bold())?;
        for style in &self.styles {
            if style.selected {
                write!(f, " {}", format!("[x] {} ({})", style.name, style.id).green())?;
            } else {
                write!(f, " [ ] {} ({})", style.name, style.id)?;
            }
        }
        writeln!(f)?;

        write!(f, "{}", "Size:".bold())?;
        for size in &self.sizes {
            let mark = if size.selected { "(•)" } else { "( )" };
            write!(f, " {} {} [{}]", mark, size.label, size.id)?;
        }
        writeln!(f)?;

        if !self.purposes.is_empty() {
            write!(f, "{}", "Purpose:".bold())?;
            for purpose in &self.purposes {
                let mark = if purpose.selected { "(•)" } else { "( )" };
                write!(f, " {} {} [{}]", mark, purpose.label, purpose.id)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{} {}", "Extra:".bold(), self.extra_description)?;

        if self.submit_enabled {
            writeln!(f, "[ {} ]", self.submit_label.bold())?;
        } else {
            writeln!(f, "[ {} ] (disabled)", self.submit_label.dimmed())?;
        }

        if let Some(error) = &self.error {
            writeln!(f)?;
            writeln!(f, "{}", error.message.red().bold())?;
            if !error.failed_sources.is_empty() {
                let names: Vec<&str> = error.failed_sources.iter().map(|s| s.as_str()).collect();
                writeln!(f, "  failed: {}", names.join(", "))?;
            }
        }

        if let Some(result) = &self.result {
            writeln!(f)?;
            writeln!(f, "{}", "Result".bold())?;
            writeln!(f, "  Generation ID: {}", result.generation_id)?;
            if let Some(parent) = &result.refined_from {
                writeln!(f, "  Refined from: {}", parent)?;
            }
            writeln!(f, "  Optimized prompt:")?;
            for line in result.optimized_prompt.lines() {
                writeln!(f, "    {}", line)?;
            }
            if let Some(url) = &result.image_url {
                writeln!(f, "  Image: {}", url.cyan().underline())?;
            }
        }

        if !self.history.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", "History".bold())?;
            for line in &self.history {
                writeln!(f, "  {} {}", line.generation_id, line.summary)?;
            }
        }

        Ok(())
    }
}

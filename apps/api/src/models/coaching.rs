use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Default signal strength when the client sends none.
pub const DEFAULT_CONFIDENCE: &str = "exploring";

/// What the user told us in the direction step.
/// Shared by the assessment, mentor and plan endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachingRequest {
    /// Signal id chosen in the UI (e.g. `data-insights`). Informational only.
    pub direction: String,
    /// Human-readable direction. Stamped onto every coaching response.
    pub direction_label: String,
    pub background: String,
    pub confidence: String,
    /// Free-text corrections from the confirmation step.
    pub adjustments: Option<String>,
}

impl Default for CoachingRequest {
    fn default() -> Self {
        Self {
            direction: String::new(),
            direction_label: String::new(),
            background: String::new(),
            confidence: DEFAULT_CONFIDENCE.to_string(),
            adjustments: None,
        }
    }
}

impl CoachingRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.direction_label.trim().is_empty() {
            return Err(AppError::Validation("directionLabel is required".to_string()));
        }
        if self.background.trim().is_empty() {
            return Err(AppError::Validation("background cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Fills `{direction_label}`, `{background}`, `{confidence}` and
    /// `{adjustments_line}` in a prompt template.
    pub fn render(&self, template: &str) -> String {
        let confidence = if self.confidence.trim().is_empty() {
            DEFAULT_CONFIDENCE
        } else {
            self.confidence.trim()
        };

        template
            .replace("{direction_label}", self.direction_label.trim())
            .replace("{background}", self.background.trim())
            .replace("{confidence}", confidence)
            .replace("{adjustments_line}", &self.adjustments_line())
    }

    fn adjustments_line(&self) -> String {
        match self.adjustments.as_deref().map(str::trim) {
            Some(adjustments) if !adjustments.is_empty() => {
                format!("- They added: {adjustments}")
            }
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CoachingRequest {
        CoachingRequest {
            direction: "data-insights".to_string(),
            direction_label: "Working with data & insights".to_string(),
            background: "  Three years in retail ops, self-taught SQL. ".to_string(),
            confidence: "drawn".to_string(),
            adjustments: None,
        }
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let parsed: CoachingRequest = serde_json::from_str(
            r#"{"directionLabel": "Designing experiences", "background": "Print designer"}"#,
        )
        .unwrap();
        assert_eq!(parsed.direction_label, "Designing experiences");
        assert_eq!(parsed.confidence, DEFAULT_CONFIDENCE);
        assert!(parsed.adjustments.is_none());
    }

    #[test]
    fn test_validate_requires_label_and_background() {
        assert!(request().validate().is_ok());

        let mut missing_label = request();
        missing_label.direction_label = "  ".to_string();
        assert!(matches!(missing_label.validate(), Err(AppError::Validation(_))));

        let mut missing_background = request();
        missing_background.background = String::new();
        assert!(matches!(missing_background.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_render_fills_placeholders() {
        let rendered = request().render(
            "D={direction_label}|B={background}|C={confidence}|{adjustments_line}",
        );
        assert_eq!(
            rendered,
            "D=Working with data & insights|B=Three years in retail ops, self-taught SQL.|C=drawn|"
        );
    }

    #[test]
    fn test_render_includes_adjustments_when_present() {
        let mut with_adjustments = request();
        with_adjustments.adjustments = Some("I also mentor juniors".to_string());
        assert_eq!(
            with_adjustments.render("{adjustments_line}"),
            "- They added: I also mentor juniors"
        );

        with_adjustments.adjustments = Some("   ".to_string());
        assert_eq!(with_adjustments.render("{adjustments_line}"), "");
    }
}

// File: src/outcome.rs
// Purpose: What a form flow hands back to the rendering/redirect layer

use indexmap::IndexMap;
use serde::Serialize;
use vitrine_validation::ErrorMap;

/// Change to the session cookie requested by a flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "token", rename_all = "snake_case")]
pub enum SessionCookie {
    Set(String),
    Clear,
}

/// Redirect with an optional flash message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionCookie>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: None,
            session: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_session(mut self, session: SessionCookie) -> Self {
        self.session = Some(session);
        self
    }

    /// Always 302, matching what the browser form flow expects after POST
    pub fn status_code(&self) -> u16 {
        302
    }
}

/// Result of a submitted form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormOutcome {
    /// Validation failed: show the form again with messages and echoed values
    Rerender {
        template: String,
        errors: ErrorMap,
        values: IndexMap<String, String>,
    },
    /// Side effect done: go elsewhere
    Redirect(Redirect),
}

impl FormOutcome {
    pub fn rerender(
        template: impl Into<String>,
        errors: ErrorMap,
        values: IndexMap<String, String>,
    ) -> Self {
        FormOutcome::Rerender {
            template: template.into(),
            errors,
            values,
        }
    }

    pub fn redirect(location: impl Into<String>, message: impl Into<String>) -> Self {
        FormOutcome::Redirect(Redirect::to(location).with_message(message))
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, FormOutcome::Redirect(_))
    }

    pub fn errors(&self) -> Option<&ErrorMap> {
        match self {
            FormOutcome::Rerender { errors, .. } => Some(errors),
            FormOutcome::Redirect(_) => None,
        }
    }

    pub fn values(&self) -> Option<&IndexMap<String, String>> {
        match self {
            FormOutcome::Rerender { values, .. } => Some(values),
            FormOutcome::Redirect(_) => None,
        }
    }

    pub fn as_redirect(&self) -> Option<&Redirect> {
        match self {
            FormOutcome::Redirect(redirect) => Some(redirect),
            FormOutcome::Rerender { .. } => None,
        }
    }
}

/// Echo map of already-normalized values, in form order
pub fn echo_values(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

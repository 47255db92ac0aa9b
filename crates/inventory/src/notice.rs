//! User-facing notices raised when a count is validated.

use serde::{Deserialize, Serialize};

/// Message sent to the notification surface after a validation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    IncompleteWarning { completed: usize, total: usize },
    NoVarianceConfirmation,
    VarianceSummary { count: usize },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::IncompleteWarning { .. } => "Inventaire incomplet",
            Notice::NoVarianceConfirmation => "Inventaire validé",
            Notice::VarianceSummary { .. } => "Inventaire complété",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notice::IncompleteWarning { completed, total } => {
                format!("Veuillez compter tous les articles ({completed}/{total} complétés)")
            }
            Notice::NoVarianceConfirmation => "Aucun écart détecté dans l'inventaire".to_string(),
            Notice::VarianceSummary { count } => {
                format!("{count} écart(s) détecté(s) et ajusté(s)")
            }
        }
    }

    /// Blocking notices are rendered as errors.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Notice::IncompleteWarning { .. })
    }
}

impl core::fmt::Display for Notice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.title(), self.description())
    }
}

use serde::{Deserialize, Serialize};

use stocksnap_core::{DomainError, DomainResult};

/// How sure the extractor is about a guessed name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    High,
    Low,
}

/// One `(name, quantity)` line read off a photographed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanGuess {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub confidence: Confidence,
    /// Other plausible readings, most likely first. Only meaningful for
    /// low-confidence guesses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl ScanGuess {
    /// A confident guess with no alternatives.
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        let name = name.into();
        Self {
            original_text: name.clone(),
            name,
            quantity,
            confidence: Confidence::High,
            alternatives: Vec::new(),
        }
    }

    /// Needs a human to pick between readings before reconciliation.
    pub fn needs_review(&self) -> bool {
        self.confidence == Confidence::Low && !self.alternatives.is_empty()
    }

    /// Resolve an ambiguous guess to one of its alternatives.
    pub fn choose_alternative(&mut self, name: &str) -> DomainResult<()> {
        if !self.alternatives.iter().any(|alt| alt == name) {
            return Err(DomainError::validation(format!(
                "'{name}' is not an alternative for '{}'",
                self.original_text
            )));
        }
        self.name = name.to_string();
        self.confidence = Confidence::High;
        self.alternatives.clear();
        Ok(())
    }

    /// Reconciliation needs a usable name and a positive quantity.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("scanned name cannot be empty"));
        }
        if self.quantity == 0 {
            return Err(DomainError::validation(format!(
                "scanned quantity for '{}' must be positive",
                self.name
            )));
        }
        Ok(())
    }
}

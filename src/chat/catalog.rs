//! The model catalog: which models the user can pick from.
//!
//! The catalog is fetched once per session load and treated as transient.
//! A fetch failure of any kind degrades to the built-in default list with
//! a user-visible warning; it never aborts the session.

use crate::error::Result;
use crate::observability::{CATALOG_FALLBACKS, CATALOG_FETCHES};
use crate::render::Renderer;
use crate::types::ModelListResponse;

/// Models offered when the catalog endpoint cannot be reached.
const DEFAULT_MODELS: &[&str] = &[
    "openai/gpt-4-turbo-preview",
    "openai/gpt-4",
    "openai/gpt-3.5-turbo",
    "anthropic/claude-3-opus",
    "anthropic/claude-3-sonnet",
    "anthropic/claude-2.1",
    "google/gemini-pro",
    "mistralai/mistral-7b-instruct",
    "meta-llama/llama-2-70b-chat",
];

/// An ordered collection of selectable model identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<String>,
}

impl ModelCatalog {
    /// Builds a catalog from a fetch outcome.
    ///
    /// On success the server-provided order is preserved. On any failure
    /// (network, timeout, malformed body) a warning is emitted through the
    /// renderer and the built-in default list is used instead. This never
    /// raises to the caller.
    pub fn from_fetch(
        fetched: Result<ModelListResponse>,
        renderer: &mut dyn Renderer,
    ) -> Self {
        CATALOG_FETCHES.click();
        match fetched {
            Ok(response) => Self {
                models: response.model_ids(),
            },
            Err(err) => {
                CATALOG_FALLBACKS.click();
                renderer.print_warning(&format!(
                    "could not fetch model catalog ({err}); using built-in model list"
                ));
                Self::fallback()
            }
        }
    }

    /// The built-in default catalog.
    pub fn fallback() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Returns true when the given id is in the catalog.
    pub fn contains(&self, model_id: &str) -> bool {
        self.models.iter().any(|m| m == model_id)
    }

    /// The model identifiers, in display order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Number of selectable models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true when the catalog offers nothing.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

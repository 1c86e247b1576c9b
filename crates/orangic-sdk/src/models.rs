//! Models resource.

use crate::client::Client;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Information about a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Object type (always "model").
    #[serde(default = "default_model_object")]
    pub object: String,
    /// Unix timestamp of when the model was created.
    #[serde(default)]
    pub created: i64,
    /// Organization that owns the model.
    #[serde(default)]
    pub owned_by: String,
}

fn default_model_object() -> String {
    "model".to_string()
}

/// Response containing a list of models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    /// Object type (always "list").
    #[serde(default = "default_list_object")]
    pub object: String,
    /// List of available models.
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

fn default_list_object() -> String {
    "list".to_string()
}

impl ModelList {
    /// Look a model up by id.
    pub fn get(&self, id: &str) -> Option<&ModelInfo> {
        self.data.iter().find(|m| m.id == id)
    }

    /// Model ids in server order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|m| m.id.as_str())
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The `/v1/models` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Models<'a> {
    client: &'a Client,
}

impl<'a> Models<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List available models.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<ModelList> {
        let url = self.client.endpoint(&["v1", "models"])?;
        self.client.get_json(url).await
    }

    /// Retrieve a single model by id.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, id: &str) -> Result<ModelInfo> {
        if id.trim().is_empty() {
            return Err(Error::invalid_parameter("id", "model id must not be empty"));
        }
        // URL path normalisation would drop these segments
        if matches!(id, "." | "..") {
            return Err(Error::invalid_parameter("id", format!("invalid model id: {id:?}")));
        }
        let url = self.client.endpoint(&["v1", "models", id])?;
        self.client.get_json(url).await
    }
}

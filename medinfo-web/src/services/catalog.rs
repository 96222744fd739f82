//! Disease catalog and image registry, loaded from `data/catalog.json`.

use crate::models::Disease;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse disease catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Disease catalog is empty")]
    Empty,

    #[error("Duplicate disease id in catalog: {0}")]
    DuplicateId(String),
}

/// Ordered, immutable set of diseases known to the site.
#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseCatalog {
    diseases: Vec<Disease>,
    #[serde(default)]
    general_images: Vec<String>,
}

impl DiseaseCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: DiseaseCatalog = serde_json::from_str(json)?;

        if catalog.diseases.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for disease in &catalog.diseases {
            if !seen.insert(disease.id.as_str()) {
                return Err(CatalogError::DuplicateId(disease.id.clone()));
            }
        }

        Ok(catalog)
    }

    pub fn diseases(&self) -> &[Disease] {
        &self.diseases
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.diseases.iter().map(|disease| disease.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Disease> {
        self.diseases.iter().find(|disease| disease.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Images registered for `id`; empty when the disease has none or is unknown.
    pub fn images_for(&self, id: &str) -> &[String] {
        self.get(id)
            .map(|disease| disease.images.as_slice())
            .unwrap_or_default()
    }

    /// Illustrations shown on every disease page.
    pub fn general_images(&self) -> &[String] {
        &self.general_images
    }
}

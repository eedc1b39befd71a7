use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use motoreserve_core::{BrandId, DomainError, DomainResult, Entity, ModelId};

/// A vehicle brand.
///
/// Brands carry no mutation API, so a brand is immutable once a model
/// references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    id: BrandId,
    name: String,
    created_at: DateTime<Utc>,
}

impl Brand {
    pub(crate) fn new(id: BrandId, name: &str, created_at: DateTime<Utc>) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("brand name cannot be empty"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    pub fn id_typed(&self) -> BrandId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Brand {
    type Id = BrandId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A vehicle model, owned by exactly one brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    id: ModelId,
    brand_id: BrandId,
    name: String,
    created_at: DateTime<Utc>,
}

impl Model {
    pub(crate) fn new(
        id: ModelId,
        brand_id: BrandId,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("model name cannot be empty"));
        }
        Ok(Self {
            id,
            brand_id,
            name: name.to_string(),
            created_at,
        })
    }

    pub fn id_typed(&self) -> ModelId {
        self.id
    }

    pub fn brand_id(&self) -> BrandId {
        self.brand_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Model {
    type Id = ModelId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

//! In-memory AOI storage for development, seeding and tests.

use async_trait::async_trait;
use aoi_core::error::{AoiError, Result};
use aoi_core::models::{AccessScope, AoiId, AoiUpdate, AreaOfInterest, NewAreaOfInterest};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::lifecycle::{apply_update, ensure_deletable, new_record};
use crate::ports::AoiRepository;

/// In-memory implementation of [`AoiRepository`]
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryAoiStore {
    records: Arc<RwLock<HashMap<AoiId, AreaOfInterest>>>,
}

impl MemoryAoiStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given rows exactly as provided
    ///
    /// Rows are not validated or re-derived, so a seed can carry legacy
    /// records whose stored geometry no longer parses.
    pub fn with_records(records: impl IntoIterator<Item = AreaOfInterest>) -> Self {
        let map = records.into_iter().map(|record| (record.id, record)).collect();
        Self { records: Arc::new(RwLock::new(map)) }
    }

    /// Load raw rows from a JSON array file
    pub async fn from_seed_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let records: Vec<AreaOfInterest> = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), count = records.len(), "Loaded AOI seed file");
        Ok(Self::with_records(records))
    }

    /// Insert or replace a raw row without validation
    pub async fn insert_raw(&self, record: AreaOfInterest) {
        self.records.write().await.insert(record.id, record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AoiRepository for MemoryAoiStore {
    async fn list_candidates(&self, scope: AccessScope) -> Result<Vec<AreaOfInterest>> {
        let records = self.records.read().await;
        Ok(records.values().filter(|r| scope.permits(r.station_id)).cloned().collect())
    }

    async fn get(&self, id: AoiId) -> Result<Option<AreaOfInterest>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn create(&self, input: NewAreaOfInterest) -> Result<AreaOfInterest> {
        let record = new_record(input, Utc::now())?;
        tracing::debug!(aoi_id = %record.id, name = %record.name, "Created AOI");
        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: AoiId, update: AoiUpdate) -> Result<AreaOfInterest> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or_else(|| AoiError::not_found(id))?;
        apply_update(record, update, Utc::now())?;
        Ok(record.clone())
    }

    async fn delete(&self, id: AoiId) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records.get(&id).ok_or_else(|| AoiError::not_found(id))?;
        ensure_deletable(record)?;
        records.remove(&id);
        tracing::debug!(aoi_id = %id, "Deleted AOI");
        Ok(())
    }

    async fn set_campaign_refs(&self, id: AoiId, count: u32) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or_else(|| AoiError::not_found(id))?;
        record.campaign_refs = count;
        Ok(())
    }
}

use async_trait::async_trait;
use aoi_core::error::Result;
use aoi_core::models::{AccessScope, AoiId, AoiUpdate, AreaOfInterest, NewAreaOfInterest};

/// Port for AOI storage operations
#[async_trait]
pub trait AoiRepository: Send + Sync {
    /// Snapshot of every AOI visible under `scope`
    ///
    /// Backends should narrow by scope where they can; the query engine
    /// applies the scope again regardless.
    async fn list_candidates(&self, scope: AccessScope) -> Result<Vec<AreaOfInterest>>;

    /// Get a specific AOI by ID, ignoring scope
    async fn get(&self, id: AoiId) -> Result<Option<AreaOfInterest>>;

    /// Create an AOI, deriving bbox, centroid and normalized name
    async fn create(&self, input: NewAreaOfInterest) -> Result<AreaOfInterest>;

    /// Apply a partial update, recomputing derived attributes when geometry changes
    async fn update(&self, id: AoiId, update: AoiUpdate) -> Result<AreaOfInterest>;

    /// Hard-delete an AOI. Fails while campaigns still reference it.
    async fn delete(&self, id: AoiId) -> Result<()>;

    /// Record how many campaigns reference an AOI
    async fn set_campaign_refs(&self, id: AoiId, count: u32) -> Result<()>;
}

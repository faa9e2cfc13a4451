use aoi_core::models::{AreaOfInterest, Principal};

/// Restrict candidates to the AOIs the principal may see
///
/// Runs before any status or geometry evaluation so that limits and counts
/// are computed over the scoped set only.
pub fn apply_scope(principal: &Principal, candidates: Vec<AreaOfInterest>) -> Vec<AreaOfInterest> {
    let scope = principal.scope();
    let before = candidates.len();

    let visible: Vec<AreaOfInterest> =
        candidates.into_iter().filter(|aoi| scope.permits(aoi.station_id)).collect();

    tracing::debug!(
        subject = %principal.subject,
        role = %principal.role,
        before,
        after = visible.len(),
        "Applied scope filter"
    );

    visible
}

/// Whether a single AOI is visible to the principal
pub fn is_visible(principal: &Principal, aoi: &AreaOfInterest) -> bool {
    principal.scope().permits(aoi.station_id)
}

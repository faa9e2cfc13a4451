use aoi_core::config::EngineConfig;
use aoi_core::error::{AoiError, Result};
use aoi_core::models::{AoiId, AreaOfInterest, Principal};
use aoi_geo::{
    compute_bbox, contains_point, equirectangular_distance_sq, haversine_km, latitude_gap_km,
};
use aoi_store::ports::AoiRepository;
use geo::Point;
use serde_json::Value;
use std::cmp::Ordering;

use crate::models::{AoiMatch, QueryOptions, QueryResult, QueryStats, SpatialQuery};
use crate::scope::{apply_scope, is_visible};

/// Spatial query engine
///
/// Holds nothing but configuration. Each query evaluates a snapshot of
/// candidates handed in by the caller or fetched from a repository.
#[derive(Debug, Clone, Default)]
pub struct SpatialQueryEngine {
    config: EngineConfig,
}

impl SpatialQueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch scoped candidates from the repository and evaluate the query
    pub async fn execute(
        &self,
        repository: &dyn AoiRepository,
        principal: &Principal,
        query: &SpatialQuery,
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        let candidates = repository.list_candidates(principal.scope()).await?;
        Ok(self.evaluate(principal, query, options, candidates))
    }

    /// Look up one AOI within the principal's scope
    ///
    /// An AOI outside the scope is reported exactly like a missing one.
    /// Status does not filter lookups.
    pub async fn lookup(
        &self,
        repository: &dyn AoiRepository,
        principal: &Principal,
        id: AoiId,
    ) -> Result<AreaOfInterest> {
        match repository.get(id).await? {
            Some(aoi) if is_visible(principal, &aoi) => Ok(aoi),
            Some(_) => {
                tracing::debug!(aoi_id = %id, subject = %principal.subject, "AOI outside scope");
                Err(AoiError::not_found(id))
            }
            None => Err(AoiError::not_found(id)),
        }
    }

    /// Evaluate a query against a candidate snapshot
    ///
    /// Pipeline: scope filter, status filter, geometry parse (unparsable
    /// records are logged and skipped), kind-specific evaluation, ordering.
    pub fn evaluate(
        &self,
        principal: &Principal,
        query: &SpatialQuery,
        options: &QueryOptions,
        candidates: Vec<AreaOfInterest>,
    ) -> QueryResult {
        let mut stats = QueryStats::default();

        let scoped = apply_scope(principal, candidates);
        stats.in_scope = scoped.len();

        let mut parsed = Vec::with_capacity(scoped.len());
        for aoi in scoped.into_iter().filter(|aoi| options.permits(aoi.status)) {
            stats.status_matched += 1;
            let aoi_id = aoi.id;
            match prepare(aoi) {
                Ok(candidate) => parsed.push(candidate),
                Err(e) => {
                    stats.unparsable += 1;
                    tracing::warn!(%aoi_id, error = %e, "Excluding AOI with unparsable geometry");
                }
            }
        }

        let matches = match query {
            SpatialQuery::Nearest { lon, lat, limit } => {
                self.rank_nearest(parsed, Point::new(*lon, *lat), *limit)
            }
            _ => {
                let mut matches: Vec<AoiMatch> =
                    parsed.into_iter().filter(|c| self.matches(query, c)).collect();
                matches.sort_by(compare_identity);
                matches
            }
        };
        stats.returned = matches.len();

        tracing::info!(
            kind = %query.kind(),
            subject = %principal.subject,
            in_scope = stats.in_scope,
            unparsable = stats.unparsable,
            returned = stats.returned,
            "Spatial query evaluated"
        );

        let mut parameters = query.parameters();
        parameters.insert("status".to_string(), Value::from(options.status_labels()));

        QueryResult { kind: query.kind(), parameters, matches, stats }
    }

    fn matches(&self, query: &SpatialQuery, candidate: &AoiMatch) -> bool {
        match query {
            SpatialQuery::BBox(bbox) => bbox.contains_point(candidate.centroid),
            SpatialQuery::Point { lon, lat } => {
                contains_point(&candidate.geometry, Point::new(*lon, *lat))
            }
            SpatialQuery::Intersects { bbox, .. } => {
                let prefilter = bbox.expand(self.config.intersects_margin_deg);
                candidate.bbox.overlaps(&prefilter) && candidate.bbox.overlaps(bbox)
            }
            SpatialQuery::Within { geometry, bbox } => {
                bbox.contains_point(candidate.centroid)
                    && contains_point(geometry, candidate.centroid)
            }
            SpatialQuery::Nearest { .. } => true,
        }
    }

    /// Equirectangular pre-filter on centroids, then haversine ranking
    ///
    /// Candidates cut by the pre-filter come back whenever their latitude gap
    /// alone does not rule them out against the current `limit`-th distance,
    /// so the pre-filter never changes the result.
    fn rank_nearest(
        &self,
        mut candidates: Vec<AoiMatch>,
        origin: Point,
        limit: usize,
    ) -> Vec<AoiMatch> {
        let keep = limit.saturating_mul(self.config.nearest_prefilter_factor).max(limit);
        candidates.sort_by(|a, b| {
            let da = equirectangular_distance_sq(origin, a.centroid);
            let db = equirectangular_distance_sq(origin, b.centroid);
            da.total_cmp(&db).then_with(|| compare_identity(a, b))
        });
        let dropped = candidates.split_off(keep.min(candidates.len()));

        for candidate in &mut candidates {
            candidate.distance_km = Some(haversine_km(origin, candidate.centroid));
        }
        sort_by_distance(&mut candidates);

        if limit > 0 && !dropped.is_empty() && candidates.len() >= limit {
            let threshold = candidates[limit - 1].distance_km.unwrap_or(f64::INFINITY);
            let mut rescued = 0usize;
            for mut candidate in dropped {
                if latitude_gap_km(origin, candidate.centroid) > threshold {
                    continue;
                }
                let distance = haversine_km(origin, candidate.centroid);
                if distance <= threshold {
                    candidate.distance_km = Some(distance);
                    candidates.push(candidate);
                    rescued += 1;
                }
            }
            if rescued > 0 {
                sort_by_distance(&mut candidates);
            }
            tracing::debug!(kept = keep, rescued, limit, "Nearest pre-filter");
        }

        candidates.truncate(limit);
        candidates
    }
}

fn sort_by_distance(candidates: &mut [AoiMatch]) {
    candidates.sort_by(|a, b| {
        let da = a.distance_km.unwrap_or(f64::INFINITY);
        let db = b.distance_km.unwrap_or(f64::INFINITY);
        da.total_cmp(&db).then_with(|| compare_identity(a, b))
    });
}

fn compare_identity(a: &AoiMatch, b: &AoiMatch) -> Ordering {
    a.record.name.cmp(&b.record.name).then_with(|| a.record.id.cmp(&b.record.id))
}

/// Parse a record's stored geometry and derive the attributes evaluation uses
fn prepare(record: AreaOfInterest) -> Result<AoiMatch> {
    let geometry = record.parse_geometry()?;
    let bbox = compute_bbox(&geometry).ok_or_else(|| AoiError::RecordGeometryUnparsable {
        aoi_id: record.id.to_string(),
        reason: "geometry has no coordinates".to_string(),
    })?;
    let centroid = bbox.center();

    Ok(AoiMatch { record, geometry, bbox, centroid, distance_km: None })
}

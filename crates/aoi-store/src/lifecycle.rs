//! Write-side rules shared by every storage backend.
//!
//! bbox and centroid are derived here and nowhere else, so the cached values
//! always agree with the stored geometry.

use aoi_core::error::{AoiError, Result};
use aoi_core::models::{
    normalize_name, AoiId, AoiUpdate, AreaOfInterest, Geometry, NewAreaOfInterest,
};
use aoi_geo::{compute_bbox, ensure_valid};
use chrono::{DateTime, Utc};

/// Cached spatial attributes of a geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialAttributes {
    pub bbox: [f64; 4],
    pub centroid: [f64; 2],
}

/// Validate a geometry and derive its bbox and centroid
pub fn derive_spatial_attributes(geometry: &Geometry) -> Result<SpatialAttributes> {
    ensure_valid(geometry)?;

    let bbox = compute_bbox(geometry)
        .ok_or_else(|| AoiError::invalid_geometry("geometry has no coordinates"))?;
    let center = bbox.center();

    Ok(SpatialAttributes { bbox: bbox.to_array(), centroid: [center.x(), center.y()] })
}

/// Build the stored record for a create request
pub fn new_record(input: NewAreaOfInterest, now: DateTime<Utc>) -> Result<AreaOfInterest> {
    let attributes = derive_spatial_attributes(&input.geometry)?;

    Ok(AreaOfInterest {
        id: AoiId::new(),
        station_id: input.station_id,
        platform_id: input.platform_id,
        normalized_name: normalize_name(&input.name),
        name: input.name,
        geometry_type: input.geometry.geometry_type(),
        geometry_json: input.geometry.to_json_string(),
        source_crs: input.source_crs,
        bbox: Some(attributes.bbox),
        centroid: Some(attributes.centroid),
        area_m2: input.area_m2,
        perimeter_m: input.perimeter_m,
        ecosystem_code: input.ecosystem_code,
        purpose: input.purpose,
        aoi_type: input.aoi_type,
        status: input.status,
        source: input.source,
        source_file: input.source_file,
        station_name: input.station_name,
        platform_name: input.platform_name,
        campaign_refs: 0,
        created_at: now,
        updated_at: now,
        created_by: input.created_by,
    })
}

/// Apply a partial update in place
///
/// The record is left untouched when the new geometry is invalid. The
/// normalized name never changes, even when `name` does.
pub fn apply_update(
    record: &mut AreaOfInterest,
    update: AoiUpdate,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(geometry) = &update.geometry {
        let attributes = derive_spatial_attributes(geometry)?;
        record.geometry_type = geometry.geometry_type();
        record.geometry_json = geometry.to_json_string();
        record.bbox = Some(attributes.bbox);
        record.centroid = Some(attributes.centroid);
    }

    if let Some(name) = update.name {
        record.name = name;
    }
    if let Some(area) = update.area_m2 {
        record.area_m2 = Some(area);
    }
    if let Some(perimeter) = update.perimeter_m {
        record.perimeter_m = Some(perimeter);
    }
    if let Some(code) = update.ecosystem_code {
        record.ecosystem_code = Some(code);
    }
    if let Some(purpose) = update.purpose {
        record.purpose = Some(purpose);
    }
    if let Some(aoi_type) = update.aoi_type {
        record.aoi_type = Some(aoi_type);
    }
    if let Some(status) = update.status {
        record.status = status;
    }

    record.updated_at = now;
    Ok(())
}

/// Refuse deletion of AOIs that campaigns still reference
pub fn ensure_deletable(record: &AreaOfInterest) -> Result<()> {
    if record.campaign_refs > 0 {
        return Err(AoiError::ReferencedByCampaigns {
            id: record.id.to_string(),
            count: record.campaign_refs,
        });
    }
    Ok(())
}

//! Area of Interest records and their lifecycle inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::geometry::{Geometry, GeometryType, WGS84_EPSG};
use crate::error::{AoiError, Result};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier of an area of interest
    AoiId
);
uuid_id!(
    /// Identifier of the monitoring station owning an AOI
    StationId
);
uuid_id!(
    /// Identifier of a platform an AOI may belong to
    PlatformId
);

/// Lifecycle status of an AOI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AoiStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

impl AoiStatus {
    pub const ALL: [AoiStatus; 3] = [AoiStatus::Active, AoiStatus::Inactive, AoiStatus::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            AoiStatus::Active => "active",
            AoiStatus::Inactive => "inactive",
            AoiStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for AoiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AoiStatus {
    type Err = AoiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(AoiStatus::Active),
            "inactive" => Ok(AoiStatus::Inactive),
            "archived" => Ok(AoiStatus::Archived),
            other => Err(AoiError::invalid_parameters(format!(
                "unknown status '{}': expected active, inactive or archived",
                other
            ))),
        }
    }
}

/// How the AOI geometry entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AoiSource {
    #[default]
    Manual,
    Import,
    Digitized,
}

/// A georeferenced region tracked for a monitoring station
///
/// `geometry_json` is the payload as stored. `bbox` and `centroid` are cached
/// derivations of it and are rewritten whenever the geometry changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    pub id: AoiId,
    pub station_id: StationId,
    #[serde(default)]
    pub platform_id: Option<PlatformId>,

    pub name: String,
    pub normalized_name: String,

    pub geometry_type: GeometryType,
    pub geometry_json: String,
    #[serde(default = "default_source_crs")]
    pub source_crs: u32,

    /// `[minLon, minLat, maxLon, maxLat]`
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    /// `[lon, lat]`, the bbox midpoint
    #[serde(default)]
    pub centroid: Option<[f64; 2]>,
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub perimeter_m: Option<f64>,

    #[serde(default)]
    pub ecosystem_code: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub aoi_type: Option<String>,
    #[serde(default)]
    pub status: AoiStatus,

    #[serde(default)]
    pub source: AoiSource,
    #[serde(default)]
    pub source_file: Option<String>,

    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub platform_name: Option<String>,

    /// Number of acquisition campaigns referencing this AOI
    #[serde(default)]
    pub campaign_refs: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
}

fn default_source_crs() -> u32 {
    WGS84_EPSG
}

impl AreaOfInterest {
    /// Parse the stored geometry payload
    ///
    /// Any failure, including a payload whose type disagrees with the stored
    /// `geometry_type` tag, is reported as [`AoiError::RecordGeometryUnparsable`].
    pub fn parse_geometry(&self) -> Result<Geometry> {
        let geometry = Geometry::parse_str(&self.geometry_json).map_err(|e| {
            AoiError::RecordGeometryUnparsable { aoi_id: self.id.to_string(), reason: e.to_string() }
        })?;

        if geometry.geometry_type() != self.geometry_type {
            return Err(AoiError::RecordGeometryUnparsable {
                aoi_id: self.id.to_string(),
                reason: format!(
                    "stored type tag {} does not match payload type {}",
                    self.geometry_type,
                    geometry.geometry_type()
                ),
            });
        }

        Ok(geometry)
    }

    pub fn is_active(&self) -> bool {
        self.status == AoiStatus::Active
    }
}

/// Input for creating an AOI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAreaOfInterest {
    pub station_id: StationId,
    #[serde(default)]
    pub platform_id: Option<PlatformId>,
    pub name: String,
    pub geometry: Geometry,
    #[serde(default = "default_source_crs")]
    pub source_crs: u32,
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub perimeter_m: Option<f64>,
    #[serde(default)]
    pub ecosystem_code: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub aoi_type: Option<String>,
    #[serde(default)]
    pub status: AoiStatus,
    #[serde(default)]
    pub source: AoiSource,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub platform_name: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl NewAreaOfInterest {
    /// Create a minimal active AOI input
    pub fn new(station_id: StationId, name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            station_id,
            platform_id: None,
            name: name.into(),
            geometry,
            source_crs: WGS84_EPSG,
            area_m2: None,
            perimeter_m: None,
            ecosystem_code: None,
            purpose: None,
            aoi_type: None,
            status: AoiStatus::Active,
            source: AoiSource::Manual,
            source_file: None,
            station_name: None,
            platform_name: None,
            created_by: None,
        }
    }

    pub fn with_status(mut self, status: AoiStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_aoi_type(mut self, aoi_type: impl Into<String>) -> Self {
        self.aoi_type = Some(aoi_type.into());
        self
    }

    pub fn with_platform(mut self, platform_id: PlatformId) -> Self {
        self.platform_id = Some(platform_id);
        self
    }
}

/// Partial update of an AOI. `None` leaves the field untouched.
///
/// The normalized name is not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AoiUpdate {
    pub name: Option<String>,
    pub geometry: Option<Geometry>,
    pub area_m2: Option<f64>,
    pub perimeter_m: Option<f64>,
    pub ecosystem_code: Option<String>,
    pub purpose: Option<String>,
    pub aoi_type: Option<String>,
    pub status: Option<AoiStatus>,
}

impl AoiUpdate {
    pub fn touches_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}

/// Derive the slug form of an AOI name
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single `_` and trims leading and trailing separators.
pub fn normalize_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

//! Requesting principals and the visibility scope they carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::aoi::StationId;
use crate::error::{AoiError, Result};

/// Role assigned to a principal by the authentication layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full read/write access to every station
    Admin,
    /// Read-only access to every station
    Auditor,
    /// Read/write access to a single station
    StationManager,
    /// Read-only access to a single station
    StationViewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Auditor => "auditor",
            Role::StationManager => "station_manager",
            Role::StationViewer => "station_viewer",
        }
    }

    /// Whether visibility is limited to the principal's own station
    pub fn is_station_scoped(&self) -> bool {
        matches!(self, Role::StationManager | Role::StationViewer)
    }

    pub fn can_write(&self) -> bool {
        matches!(self, Role::Admin | Role::StationManager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AoiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "auditor" => Ok(Role::Auditor),
            "station_manager" => Ok(Role::StationManager),
            "station_viewer" => Ok(Role::StationViewer),
            other => Err(AoiError::invalid_parameters(format!("unknown role '{}'", other))),
        }
    }
}

/// The caller on whose behalf a query runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
    pub role: Role,
    pub station_id: Option<StationId>,
}

impl Principal {
    pub fn new(subject: impl Into<String>, role: Role, station_id: Option<StationId>) -> Self {
        Self { subject: subject.into(), role, station_id }
    }

    pub fn admin(subject: impl Into<String>) -> Self {
        Self::new(subject, Role::Admin, None)
    }

    pub fn station_viewer(subject: impl Into<String>, station_id: StationId) -> Self {
        Self::new(subject, Role::StationViewer, Some(station_id))
    }

    /// Resolve the set of AOIs this principal may see
    pub fn scope(&self) -> AccessScope {
        if !self.role.is_station_scoped() {
            return AccessScope::All;
        }
        match self.station_id {
            Some(station_id) => AccessScope::Station(station_id),
            None => AccessScope::Nothing,
        }
    }

    /// Whether this principal may create, modify or delete AOIs of a station
    pub fn can_write_station(&self, station_id: StationId) -> bool {
        self.role.can_write() && self.scope().permits(station_id)
    }
}

/// Visibility restriction applied to candidate AOIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessScope {
    /// Every AOI is visible
    All,
    /// Only AOIs owned by this station are visible
    Station(StationId),
    /// Station-scoped principal without a station: nothing is visible
    Nothing,
}

impl AccessScope {
    pub fn permits(&self, station_id: StationId) -> bool {
        match self {
            AccessScope::All => true,
            AccessScope::Station(own) => *own == station_id,
            AccessScope::Nothing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevated_roles_see_everything() {
        assert_eq!(Principal::admin("root").scope(), AccessScope::All);
        let auditor = Principal::new("audit", Role::Auditor, Some(StationId::new()));
        assert_eq!(auditor.scope(), AccessScope::All);
    }

    #[test]
    fn test_station_roles_are_scoped() {
        let station = StationId::new();
        let viewer = Principal::station_viewer("field-tech", station);
        assert_eq!(viewer.scope(), AccessScope::Station(station));
        assert!(viewer.scope().permits(station));
        assert!(!viewer.scope().permits(StationId::new()));
    }

    #[test]
    fn test_station_role_without_station_sees_nothing() {
        let orphan = Principal::new("orphan", Role::StationManager, None);
        assert_eq!(orphan.scope(), AccessScope::Nothing);
        assert!(!orphan.scope().permits(StationId::new()));
    }

    #[test]
    fn test_write_permissions() {
        let station = StationId::new();
        let manager = Principal::new("manager", Role::StationManager, Some(station));
        assert!(manager.can_write_station(station));
        assert!(!manager.can_write_station(StationId::new()));

        assert!(Principal::admin("root").can_write_station(StationId::new()));
        assert!(!Principal::station_viewer("viewer", station).can_write_station(station));
        assert!(!Principal::new("audit", Role::Auditor, None).can_write_station(station));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Station_Viewer".parse::<Role>().unwrap(), Role::StationViewer);
        assert!("superuser".parse::<Role>().is_err());
    }
}

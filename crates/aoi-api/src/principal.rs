//! Principal extraction from the trusted headers set by the authentication layer.

use aoi_core::models::{Principal, Role, StationId};
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::error::ApiError;

pub const ROLE_HEADER: &str = "x-principal-role";
pub const STATION_HEADER: &str = "x-station-id";
pub const SUBJECT_HEADER: &str = "x-principal-subject";

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct Caller(pub Principal);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_from_headers(&parts.headers).map(Caller)
    }
}

/// Build a principal from request headers
///
/// The role header is mandatory. The station header must be a UUID when
/// present.
pub fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, ApiError> {
    let role = header_str(headers, ROLE_HEADER)
        .ok_or_else(|| ApiError::unauthorized("Missing principal role"))?
        .parse::<Role>()
        .map_err(|e| ApiError::unauthorized("Unknown principal role").with_details(e.to_string()))?;

    let station_id = match header_str(headers, STATION_HEADER) {
        Some(raw) => Some(raw.parse::<StationId>().map_err(|e| {
            ApiError::unauthorized("Invalid station identity").with_details(e.to_string())
        })?),
        None => None,
    };

    let subject = header_str(headers, SUBJECT_HEADER).unwrap_or("anonymous");

    Ok(Principal::new(subject, role, station_id))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoi_core::models::AccessScope;
    use axum::http::{HeaderValue, StatusCode};

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_station_viewer_headers() {
        let station = StationId::new();
        let principal = principal_from_headers(&headers(&[
            (ROLE_HEADER, "station_viewer"),
            (STATION_HEADER, &station.to_string()),
            (SUBJECT_HEADER, "field-tech"),
        ]))
        .unwrap();

        assert_eq!(principal.subject, "field-tech");
        assert_eq!(principal.scope(), AccessScope::Station(station));
    }

    #[test]
    fn test_missing_or_unknown_role_is_unauthorized() {
        let err = principal_from_headers(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let err = principal_from_headers(&headers(&[(ROLE_HEADER, "root")])).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_malformed_station_is_unauthorized() {
        let err = principal_from_headers(&headers(&[
            (ROLE_HEADER, "station_manager"),
            (STATION_HEADER, "station-7"),
        ]))
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_admin_without_subject() {
        let principal = principal_from_headers(&headers(&[(ROLE_HEADER, "admin")])).unwrap();
        assert_eq!(principal.subject, "anonymous");
        assert_eq!(principal.scope(), AccessScope::All);
    }
}

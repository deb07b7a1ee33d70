use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::consts::{MJD_OFFSET, SECONDS_PER_DAY, UNIX_EPOCH_JD};
use crate::error::{PhotoError, Result};
use crate::io::header::Header;

/// Header keyword that supplied an observation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSource {
    /// `JD` keyword, used as is.
    Jd,
    /// `MJD` keyword, used as is (no offset applied).
    Mjd,
    /// `DATE-OBS` converted to a Julian Date (UTC).
    DateObs,
    /// No time keyword; the time is 0.0.
    Missing,
}

impl std::fmt::Display for TimeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jd => write!(f, "JD"),
            Self::Mjd => write!(f, "MJD"),
            Self::DateObs => write!(f, "DATE-OBS"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// Time scale used for light-curve output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    #[default]
    #[serde(rename = "JD")]
    Jd,
    #[serde(rename = "MJD")]
    Mjd,
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jd => write!(f, "JD"),
            Self::Mjd => write!(f, "MJD"),
        }
    }
}

/// Observation time of a frame, by priority `JD`, `MJD`, `DATE-OBS`, else 0.0.
pub fn observation_time(header: &Header) -> Result<(f64, TimeSource)> {
    if let Some(jd) = header.get_f64("JD") {
        return Ok((jd, TimeSource::Jd));
    }
    if let Some(mjd) = header.get_f64("MJD") {
        return Ok((mjd, TimeSource::Mjd));
    }
    if let Some(date) = header.get("DATE-OBS") {
        return Ok((date_obs_to_jd(&date.to_string())?, TimeSource::DateObs));
    }
    Ok((0.0, TimeSource::Missing))
}

/// Convert an ISO `DATE-OBS` string (UTC) to a Julian Date.
///
/// Accepts `YYYY-MM-DDThh:mm[:ss[.fff]][Z]`, a space instead of `T`, or a
/// bare `YYYY-MM-DD` (midnight).
pub fn date_obs_to_jd(value: &str) -> Result<f64> {
    let trimmed = value.trim().trim_end_matches('Z');
    let parsed = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    .or_else(|| {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
    .ok_or_else(|| PhotoError::InvalidDate(value.to_string()))?;

    let utc = parsed.and_utc();
    let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
    Ok(UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY)
}

/// Express a time from `source` in `unit`. Times without a known source, or
/// from a missing keyword, are returned unchanged.
pub fn convert_time(time: f64, source: Option<TimeSource>, unit: TimeUnit) -> f64 {
    match (source, unit) {
        (Some(TimeSource::Jd | TimeSource::DateObs), TimeUnit::Mjd) => time - MJD_OFFSET,
        (Some(TimeSource::Mjd), TimeUnit::Jd) => time + MJD_OFFSET,
        _ => time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_j2000_epoch() {
        let jd = date_obs_to_jd("2000-01-01T12:00:00").unwrap();
        assert!((jd - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_seconds_and_zulu() {
        let jd = date_obs_to_jd("2000-01-01T12:00:43.2Z").unwrap();
        assert!((jd - 2_451_545.0005).abs() < 1e-8);
    }

    #[test]
    fn test_minutes_without_seconds() {
        let jd = date_obs_to_jd("2000-01-01T12:00").unwrap();
        assert!((jd - 2_451_545.0).abs() < 1e-9);
        let jd = date_obs_to_jd("2000-01-01 18:00Z").unwrap();
        assert!((jd - 2_451_545.25).abs() < 1e-9);
    }

    #[test]
    fn test_date_only() {
        let jd = date_obs_to_jd("1970-01-01").unwrap();
        assert!((jd - UNIX_EPOCH_JD).abs() < 1e-12);
    }

    #[test]
    fn test_bad_date_is_error() {
        assert!(matches!(
            date_obs_to_jd("yesterday"),
            Err(PhotoError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_priority_order() {
        let mut h = Header::new();
        h.set("DATE-OBS", "2000-01-01T12:00:00");
        assert_eq!(observation_time(&h).unwrap().1, TimeSource::DateObs);
        h.set("MJD", 51544.5);
        assert_eq!(observation_time(&h).unwrap(), (51544.5, TimeSource::Mjd));
        h.set("JD", 2451545.0);
        assert_eq!(observation_time(&h).unwrap(), (2451545.0, TimeSource::Jd));
        assert_eq!(observation_time(&Header::new()).unwrap(), (0.0, TimeSource::Missing));
    }

    #[test]
    fn test_convert_time() {
        assert_eq!(convert_time(2451545.0, Some(TimeSource::Jd), TimeUnit::Mjd), 51544.5);
        assert_eq!(convert_time(51544.5, Some(TimeSource::Mjd), TimeUnit::Jd), 2451545.0);
        assert_eq!(convert_time(0.0, Some(TimeSource::Missing), TimeUnit::Mjd), 0.0);
    }
}

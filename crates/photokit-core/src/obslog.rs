use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::OBSLOG_KEYWORDS;
use crate::error::Result;
use crate::io::files::file_name_string;
use crate::io::fits::read_header;
use crate::io::header::HeaderValue;

/// Selected header values of a FITS file, in the requested order.
///
/// With `keywords = None` every valued card is returned (commentary cards
/// are skipped). Requested keywords absent from the header map to `None`.
pub fn get_header_info(
    path: &Path,
    keywords: Option<&[&str]>,
) -> Result<Vec<(String, Option<HeaderValue>)>> {
    let header = read_header(path)?;
    let info = match keywords {
        Some(keys) => keys
            .iter()
            .map(|k| (k.to_string(), header.get(k).cloned()))
            .collect(),
        None => header
            .cards()
            .iter()
            .filter(|c| !c.is_commentary())
            .map(|c| (c.keyword.clone(), c.value.clone()))
            .collect(),
    };
    Ok(info)
}

/// A numeric log column. Header text that is not a number is kept as written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    Number(f64),
    Text(String),
}

impl LogValue {
    fn from_header(value: &HeaderValue) -> Self {
        match value.as_f64() {
            Some(n) => Self::Number(n),
            None => Self::Text(value.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for LogValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n:.2}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One row of the observation log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    #[serde(rename = "OBJECT")]
    pub object: Option<String>,
    #[serde(rename = "FILTER")]
    pub filter: Option<String>,
    #[serde(rename = "EXPTIME")]
    pub exptime: Option<LogValue>,
    #[serde(rename = "AIRMASS")]
    pub airmass: Option<LogValue>,
    #[serde(rename = "DATE-OBS")]
    pub date_obs: Option<String>,
    pub filename: String,
}

impl ObservationRecord {
    pub fn from_file(path: &Path) -> Result<Self> {
        let info = get_header_info(path, Some(&OBSLOG_KEYWORDS[..]))?;
        let text = |i: usize| info[i].1.as_ref().map(|v| v.to_string());
        let number = |i: usize| info[i].1.as_ref().map(LogValue::from_header);

        Ok(Self {
            object: text(0),
            filter: text(1),
            exptime: number(2),
            airmass: number(3),
            date_obs: text(4),
            filename: file_name_string(path),
        })
    }
}

/// Build the observation log for `files`, optionally saving it as CSV with
/// columns `OBJECT,FILTER,EXPTIME,AIRMASS,DATE-OBS,filename`.
pub fn create_observation_log(
    files: &[PathBuf],
    output_csv: Option<&Path>,
) -> Result<Vec<ObservationRecord>> {
    let records = files
        .iter()
        .map(|f| ObservationRecord::from_file(f))
        .collect::<Result<Vec<_>>>()?;

    if let Some(path) = output_csv {
        write_observation_log(path, &records)?;
        info!(rows = records.len(), path = %path.display(), "Observation log saved");
    }

    Ok(records)
}

pub fn write_observation_log(path: &Path, records: &[ObservationRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

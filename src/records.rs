//! Hotspot records and the rows of the hourly CSV tables.
//!
//! Each FHS file stores its detections as text lines in the `FPT` variable. The
//! first [`N_HEADER_RECORDS`] lines are metadata; every line after that has
//! eleven whitespace-separated fields:
//!
//! | # | field               | type  |
//! |---|---------------------|-------|
//! | 0 | pixel number        | int   |
//! | 1 | pixel hotspot no.   | int   |
//! | 2 | reliability code    | int   |
//! | 3 | latitude            | float |
//! | 4 | longitude           | float |
//! | 5 | pixel size (km)     | float |
//! | 6 | burned size (hm)    | float |
//! | 7 | FRP (mW)            | float |
//! | 8 | intensity code      | int   |
//! | 9 | land type code      | int   |
//! | 10| administrative area | int   |
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Number of leading `FPT` entries that are not detections.
pub const N_HEADER_RECORDS: usize = 5;

/// Number of fields in one detection record.
pub const N_FIELDS: usize = 11;

/// Column names of the hourly CSV files, in order.
pub const CSV_COLUMNS: [&str; 12] = [
    "Beijing_Time",
    "latitude",
    "longitude",
    "Pixel_No",
    "Pixel_Hot_Spot_NO",
    "Reliability",
    "Pixel_Size(km)",
    "Burned_Size(hm)",
    "FRP(mw)",
    "Intensity",
    "Land_Type",
    "Administrstive_area",
];

/// One fire detection parsed from an `FPT` line.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotRecord {
    pub pixel_no: i64,
    pub pixel_hot_spot_no: i64,
    pub reliability: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub pixel_size_km: f64,
    pub burned_size_hm: f64,
    pub frp_mw: f64,
    pub intensity: i64,
    pub land_type: i64,
    pub administrative_area: i64,
}

impl HotspotRecord {
    /// Parse one record; `index` is only used to identify the record in errors.
    pub fn parse(line: &str, index: usize) -> Result<Self, RecordError> {
        let fields = line.split_whitespace().collect_vec();
        if fields.len() != N_FIELDS {
            return Err(RecordError::FieldCount {
                index,
                got: fields.len(),
                expected: N_FIELDS,
            });
        }

        Ok(Self {
            pixel_no: parse_field(fields[0], index, "Pixel_No", "integer")?,
            pixel_hot_spot_no: parse_field(fields[1], index, "Pixel_Hot_Spot_NO", "integer")?,
            reliability: parse_field(fields[2], index, "Reliability", "integer")?,
            latitude: parse_field(fields[3], index, "latitude", "float")?,
            longitude: parse_field(fields[4], index, "longitude", "float")?,
            pixel_size_km: parse_field(fields[5], index, "Pixel_Size(km)", "float")?,
            burned_size_hm: parse_field(fields[6], index, "Burned_Size(hm)", "float")?,
            frp_mw: parse_field(fields[7], index, "FRP(mw)", "float")?,
            intensity: parse_field(fields[8], index, "Intensity", "integer")?,
            land_type: parse_field(fields[9], index, "Land_Type", "integer")?,
            administrative_area: parse_field(fields[10], index, "Administrstive_area", "integer")?,
        })
    }
}

fn parse_field<T: FromStr>(
    value: &str,
    index: usize,
    field: &'static str,
    kind: &'static str,
) -> Result<T, RecordError> {
    value.parse().map_err(|_| RecordError::FieldValue {
        index,
        field,
        value: value.to_string(),
        kind,
    })
}

/// Parse the raw `FPT` entries of one file.
///
/// The header entries are dropped. Any malformed detection fails the whole
/// set. Indices in errors count from the first raw entry.
pub fn parse_records<S: AsRef<str>>(lines: &[S]) -> Result<Vec<HotspotRecord>, RecordError> {
    lines
        .iter()
        .enumerate()
        .skip(N_HEADER_RECORDS)
        .map(|(i, line)| HotspotRecord::parse(line.as_ref(), i))
        .collect()
}

/// One row of an hourly CSV file: a detection plus its Beijing time.
///
/// Field order here is the column order on disk. Equality and hashing
/// compare floats by bit pattern, so rows can go in a hash set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotRow {
    #[serde(rename = "Beijing_Time")]
    pub beijing_time: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "Pixel_No")]
    pub pixel_no: i64,
    #[serde(rename = "Pixel_Hot_Spot_NO")]
    pub pixel_hot_spot_no: i64,
    #[serde(rename = "Reliability")]
    pub reliability: i64,
    #[serde(rename = "Pixel_Size(km)")]
    pub pixel_size_km: f64,
    #[serde(rename = "Burned_Size(hm)")]
    pub burned_size_hm: f64,
    #[serde(rename = "FRP(mw)")]
    pub frp_mw: f64,
    #[serde(rename = "Intensity")]
    pub intensity: i64,
    #[serde(rename = "Land_Type")]
    pub land_type: i64,
    #[serde(rename = "Administrstive_area")]
    pub administrative_area: i64,
}

impl HotspotRow {
    pub fn new(beijing_time: String, record: &HotspotRecord) -> Self {
        Self {
            beijing_time,
            latitude: record.latitude,
            longitude: record.longitude,
            pixel_no: record.pixel_no,
            pixel_hot_spot_no: record.pixel_hot_spot_no,
            reliability: record.reliability,
            pixel_size_km: record.pixel_size_km,
            burned_size_hm: record.burned_size_hm,
            frp_mw: record.frp_mw,
            intensity: record.intensity,
            land_type: record.land_type,
            administrative_area: record.administrative_area,
        }
    }

    /// Stamp every record with the same Beijing time.
    pub fn from_records(beijing_time: &str, records: &[HotspotRecord]) -> Vec<Self> {
        records
            .iter()
            .map(|r| Self::new(beijing_time.to_string(), r))
            .collect()
    }

    fn float_bits(&self) -> [u64; 5] {
        [
            self.latitude.to_bits(),
            self.longitude.to_bits(),
            self.pixel_size_km.to_bits(),
            self.burned_size_hm.to_bits(),
            self.frp_mw.to_bits(),
        ]
    }

    fn int_fields(&self) -> [i64; 6] {
        [
            self.pixel_no,
            self.pixel_hot_spot_no,
            self.reliability,
            self.intensity,
            self.land_type,
            self.administrative_area,
        ]
    }
}

impl PartialEq for HotspotRow {
    fn eq(&self, other: &Self) -> bool {
        self.beijing_time == other.beijing_time
            && self.float_bits() == other.float_bits()
            && self.int_fields() == other.int_fields()
    }
}

impl Eq for HotspotRow {}

impl Hash for HotspotRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.beijing_time.hash(state);
        self.float_bits().hash(state);
        self.int_fields().hash(state);
    }
}

//! Observation times for FHS files.
//!
//! FHS file names carry the start of the observation as an underscore-separated
//! token, e.g. the `20230615120000` in
//! `FY4A-_AGRI--_N_DISK_1047E_L2-_FHS-_MULT_NOM_20230615120000_20230615121459_2000M_V0001.NC`.
//! That time is UTC; the output tables are keyed by Beijing time, which is a
//! fixed UTC+8 offset with no daylight saving.
use std::sync::OnceLock;

use chrono::{NaiveDateTime, TimeDelta};
use itertools::Itertools;

use crate::error::TimestampError;

/// Hours added to UTC to get Beijing time.
pub const BEIJING_OFFSET_HOURS: i64 = 8;

/// Position of the time token, counted from the end of the file name.
const TIME_TOKEN_FROM_END: usize = 4;

static TIME_TOKEN_REGEX: OnceLock<regex::Regex> = OnceLock::new();

/// Extract the UTC observation time from an FHS file name.
///
/// The file name is split on underscores and the 4th token from the end must be
/// exactly 14 digits, `YYYYMMDDHHmmss`. Anything after it (end time, resolution,
/// version and extension) is ignored.
pub fn utc_time_from_filename(name: &str) -> Result<NaiveDateTime, TimestampError> {
    let tokens = name.split('_').collect_vec();
    if tokens.len() < TIME_TOKEN_FROM_END {
        return Err(TimestampError::TooFewTokens {
            name: name.to_string(),
            ntok: tokens.len(),
            min: TIME_TOKEN_FROM_END,
        });
    }

    let token = tokens[tokens.len() - TIME_TOKEN_FROM_END];
    let re = TIME_TOKEN_REGEX.get_or_init(|| {
        regex::Regex::new(r"^(?<date>\d{8})(?<time>\d{6})$").expect("Could not compile time token regex")
    });
    let caps = re
        .captures(token)
        .ok_or_else(|| TimestampError::BadToken(token.to_string()))?;

    let dt_str = format!("{} {}", &caps["date"], &caps["time"]);
    NaiveDateTime::parse_from_str(&dt_str, "%Y%m%d %H%M%S").map_err(|e| {
        TimestampError::InvalidDateTime {
            token: token.to_string(),
            cause: e.to_string(),
        }
    })
}

/// A wall clock time in Beijing (UTC+8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BeijingTime(NaiveDateTime);

impl BeijingTime {
    /// Convert a naive UTC time to Beijing time.
    pub fn from_utc(utc: NaiveDateTime) -> Result<Self, TimestampError> {
        utc.checked_add_signed(TimeDelta::hours(BEIJING_OFFSET_HOURS))
            .map(Self)
            .ok_or(TimestampError::Overflow(utc))
    }

    /// Derive the Beijing observation time directly from an FHS file name.
    pub fn from_filename(name: &str) -> Result<Self, TimestampError> {
        let utc = utc_time_from_filename(name)?;
        Self::from_utc(utc)
    }

    /// The value written to the `Beijing_Time` column, `YYYY-MM-DD HH:mm:ss`.
    pub fn timestamp_string(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn year(&self) -> String {
        self.0.format("%Y").to_string()
    }

    pub fn year_month(&self) -> String {
        self.0.format("%Y%m").to_string()
    }

    pub fn date(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// `YYYYMMDDHH`, with the hour zero padded.
    pub fn date_hour(&self) -> String {
        self.0.format("%Y%m%d%H").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    const FY4A_NAME: &str =
        "FY4A-_AGRI--_N_DISK_1047E_L2-_FHS-_MULT_NOM_20230615120000_20230615121459_2000M_V0001.NC";

    #[test]
    fn test_utc_from_fy4a_name() {
        let t = utc_time_from_filename(FY4A_NAME).unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(t, expected);
    }

    #[test]
    fn test_beijing_formats() {
        let t = BeijingTime::from_filename(FY4A_NAME).unwrap();
        assert_eq!(t.timestamp_string(), "2023-06-15 20:00:00");
        assert_eq!(t.year(), "2023");
        assert_eq!(t.year_month(), "202306");
        assert_eq!(t.date(), "20230615");
        assert_eq!(t.date_hour(), "2023061520");
    }

    #[rstest]
    #[case("A_B_20230615200000_X_Y_Z.nc", "2023-06-16 04:00:00")]
    #[case("A_20231231180000_X_Y_Z.nc", "2024-01-01 02:00:00")]
    #[case("20240228230510_X_Y_Z", "2024-02-29 07:05:10")]
    #[case("A_20230101010101_X_Y_Z", "2023-01-01 09:01:01")]
    fn test_beijing_rollover(#[case] name: &str, #[case] expected: &str) {
        let t = BeijingTime::from_filename(name).unwrap();
        assert_eq!(t.timestamp_string(), expected);
    }

    #[test]
    fn test_hour_zero_padded() {
        let t = BeijingTime::from_filename("A_20230615003000_X_Y_Z.nc").unwrap();
        assert_eq!(t.date_hour(), "2023061508");
    }

    #[rstest]
    #[case("no_time.nc")]
    #[case("A_2023061512000_X_Y_Z.nc")]
    #[case("A_2023061512000a_X_Y_Z.nc")]
    #[case("A_20230615120000_X_Y.nc")]
    #[case("A_20231315120000_X_Y_Z.nc")]
    #[case("A_20230615250000_X_Y_Z.nc")]
    fn test_bad_names(#[case] name: &str) {
        assert!(utc_time_from_filename(name).is_err(), "{name} should not parse");
    }

    #[test]
    fn test_too_few_tokens_error() {
        let err = utc_time_from_filename("a_b_c").unwrap_err();
        assert!(matches!(err, TimestampError::TooFewTokens { ntok: 3, min: 4, .. }));
    }
}

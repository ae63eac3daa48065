use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ApiError;
use crate::production::normalize_process;

/// Query string shared by the chart endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// Production date, `YYYY-MM-DD`
    pub tanggal: Option<String>,
    /// Process name filter for the process view
    pub proses: Option<String>,
    /// Machine (mold) code for the hourly detail
    pub no_mc: Option<String>,
}

impl ChartQuery {
    pub fn from_extractor(query: Result<Query<ChartQuery>, QueryRejection>) -> Result<Self, ApiError> {
        query
            .map(|Query(q)| q)
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
    }

    pub fn required_date(&self) -> Result<NaiveDate, ApiError> {
        match non_blank(&self.tanggal) {
            Some(raw) => parse_date(raw),
            None => Err(ApiError::field("tanggal", "This parameter is required (YYYY-MM-DD)")),
        }
    }

    pub fn date_or(&self, default: NaiveDate) -> Result<NaiveDate, ApiError> {
        non_blank(&self.tanggal).map_or(Ok(default), parse_date)
    }

    /// Process filter, normalized the way department names are grouped
    pub fn process(&self) -> Option<String> {
        non_blank(&self.proses).map(normalize_process)
    }

    pub fn required_machine(&self) -> Result<String, ApiError> {
        non_blank(&self.no_mc)
            .map(str::to_string)
            .ok_or_else(|| ApiError::field("no_mc", "This parameter is required"))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::field("tanggal", format!("'{}' is not a YYYY-MM-DD date", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(tanggal: Option<&str>) -> ChartQuery {
        ChartQuery { tanggal: tanggal.map(str::to_string), ..ChartQuery::default() }
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            query(Some("2026-02-09")).required_date().unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
        );
        assert!(query(Some("09-02-2026")).required_date().is_err());
        assert!(query(Some("2026-02-30")).required_date().is_err());
        assert!(query(None).required_date().is_err());
        assert!(query(Some("  ")).required_date().is_err());
    }

    #[test]
    fn default_date_applies_only_when_absent() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(query(None).date_or(today).unwrap(), today);
        assert!(query(Some("bad")).date_or(today).is_err());
    }

    #[test]
    fn blank_filters_are_ignored() {
        let q = ChartQuery { proses: Some(" ".into()), no_mc: Some("".into()), ..ChartQuery::default() };
        assert!(q.process().is_none());
        assert!(q.required_machine().is_err());
    }

    #[test]
    fn process_is_trimmed_and_uppercased() {
        let q = ChartQuery { proses: Some(" pressing ".into()), ..ChartQuery::default() };
        assert_eq!(q.process().as_deref(), Some("PRESSING"));
    }
}

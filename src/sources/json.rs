//! JSON-file backed tour record source

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::sources::TourRecordSource;
use crate::types::{Result, StatError, TourRecord, TourTypeFilter, YearRange};

/// Source reading a JSON array of tour records from one file.
///
/// Filtering happens here, mirroring what the persistence layer would push
/// into its query: person, tour type and calendar year of the start date.
pub struct JsonTourSource {
    path: PathBuf,
}

impl JsonTourSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TourRecordSource for JsonTourSource {
    fn fetch(
        &self,
        person_id: Option<i64>,
        filter: &TourTypeFilter,
        range: YearRange,
    ) -> Result<Vec<TourRecord>> {
        let content = fs::read_to_string(&self.path).map_err(StatError::Io)?;
        let records: Vec<TourRecord> =
            serde_json::from_str(&content).map_err(|e| StatError::Parse(e.to_string()))?;

        Ok(records
            .into_iter()
            .filter(|t| person_id.map_or(true, |p| t.person_id == p))
            .filter(|t| filter.matches(t.type_id))
            .filter(|t| range.contains(t.start.year()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = r#"[
        {
            "id": 1, "person_id": 1, "type_id": 1,
            "start": "2023-03-10T08:00:00+01:00",
            "title": "Spring ride",
            "metrics": { "distance": 42000.0, "elevation_gain": 380.0 }
        },
        {
            "id": 2, "person_id": 1, "type_id": 2,
            "start": "2023-07-01T09:30:00+02:00",
            "metrics": { "distance": 12000.0 }
        },
        {
            "id": 3, "person_id": 2, "type_id": 1,
            "start": "2022-11-20T10:00:00+01:00",
            "metrics": { "distance": 8000.0 }
        }
    ]"#;

    fn fixture_source() -> (JsonTourSource, NamedTempFile) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        (JsonTourSource::new(file.path()), file)
    }

    #[test]
    fn test_fetch_filters_by_year_range() {
        let (source, _file) = fixture_source();
        let tours = source
            .fetch(None, &TourTypeFilter::All, YearRange::new(2023, 1))
            .unwrap();
        let ids: Vec<i64> = tours.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_fetch_filters_by_person_and_type() {
        let (source, _file) = fixture_source();

        let tours = source
            .fetch(
                Some(1),
                &TourTypeFilter::Types(vec![2]),
                YearRange::new(2023, 1),
            )
            .unwrap();
        assert_eq!(tours.len(), 1);
        assert_eq!(tours[0].id, 2);

        let tours = source
            .fetch(Some(2), &TourTypeFilter::All, YearRange::new(2022, 2))
            .unwrap();
        assert_eq!(tours.len(), 1);
        assert_eq!(tours[0].id, 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = JsonTourSource::new("/nonexistent/tours.json");
        let err = source
            .fetch(None, &TourTypeFilter::All, YearRange::new(2023, 1))
            .unwrap_err();
        assert!(matches!(err, StatError::Io(_)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json {{{").unwrap();
        let source = JsonTourSource::new(file.path());

        let err = source
            .fetch(None, &TourTypeFilter::All, YearRange::new(2023, 1))
            .unwrap_err();
        assert!(matches!(err, StatError::Parse(_)));
    }
}

//! Location resolution for a submitted report.
//!
//! A report may carry a photo, explicit coordinates, or both. GPS data in
//! the photo wins; the explicit fields are the fallback.

use civic_map_exif::extract_gps_from_image;
use civic_map_ward_models::{Coordinate, CoordinateSource, WardInfo};
use thiserror::Error;

use crate::{InvalidCoordinateError, WardLocator};

/// A report location resolved to a ward.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLocation {
    /// The point used for the lookup.
    pub coordinate: Coordinate,
    /// Where the point came from.
    pub source: CoordinateSource,
    /// The ward containing the point.
    pub ward: WardInfo,
}

/// Why a report location could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ReportLocationError {
    /// No GPS data in the photo and no usable explicit coordinates.
    #[error("Invalid or missing location information")]
    MissingLocation,

    /// A coordinate was found but is out of range.
    #[error("Invalid location: {0}")]
    InvalidCoordinate(#[from] InvalidCoordinateError),

    /// The point is not inside any ward.
    #[error("Location outside supported area")]
    OutsideServiceArea,
}

impl WardLocator {
    /// Resolves the location of a report.
    ///
    /// Uses the photo's GPS position when present, otherwise `lat`/`lng`
    /// parsed as decimal text.
    ///
    /// # Errors
    ///
    /// Returns [`ReportLocationError`] if no coordinate is available, the
    /// coordinate is invalid, or it lies outside every ward.
    pub fn locate_report(
        &self,
        photo: Option<&[u8]>,
        lat: Option<&str>,
        lng: Option<&str>,
    ) -> Result<ReportLocation, ReportLocationError> {
        let (coordinate, source) = photo
            .and_then(extract_gps_from_image)
            .map(|c| (c, CoordinateSource::Exif))
            .or_else(|| parse_provided(lat, lng).map(|c| (c, CoordinateSource::Provided)))
            .ok_or(ReportLocationError::MissingLocation)?;

        let ward = self
            .locate_ward(coordinate.latitude, coordinate.longitude)?
            .ok_or(ReportLocationError::OutsideServiceArea)?;

        Ok(ReportLocation {
            coordinate,
            source,
            ward,
        })
    }
}

/// Parses explicit coordinate fields. Blank or non-numeric text is `None`.
fn parse_provided(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinate> {
    let parse = |field: Option<&str>| -> Option<f64> {
        field?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    };

    Some(Coordinate::new(parse(lat)?, parse(lng)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::locator;
    use civic_map_exif::test_utils::tiff_with_gps;
    use civic_map_ward_models::Axis;

    /// 0° 30' 0" N, 1° 30' 0" E: inside ward 2.
    fn photo_in_ward_two() -> Vec<u8> {
        tiff_with_gps([(0, 1), (30, 1), (0, 1)], b'N', [(1, 1), (30, 1), (0, 1)], b'E')
    }

    #[test]
    fn photo_gps_wins_over_fields() {
        let locator = locator(r#"["A", "B"]"#);
        let photo = photo_in_ward_two();

        let location = locator
            .locate_report(Some(photo.as_slice()), Some("0.5"), Some("0.5"))
            .unwrap();

        assert_eq!(location.source, CoordinateSource::Exif);
        assert_eq!(location.ward.ward_number, 2);
        assert!((location.coordinate.latitude - 0.5).abs() < 1e-9);
        assert!((location.coordinate.longitude - 1.5).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_fields_without_gps() {
        let locator = locator(r#"["A", "B"]"#);

        let location = locator
            .locate_report(Some(b"not an image".as_slice()), Some(" 0.5 "), Some("0.25"))
            .unwrap();
        assert_eq!(location.source, CoordinateSource::Provided);
        assert_eq!(location.ward.ward_number, 1);

        let location = locator.locate_report(None, Some("0.5"), Some("1.5")).unwrap();
        assert_eq!(location.ward.ward_name.as_deref(), Some("B"));
    }

    #[test]
    fn missing_location() {
        let locator = locator("[]");
        assert_eq!(
            locator.locate_report(None, None, None),
            Err(ReportLocationError::MissingLocation)
        );
        assert_eq!(
            locator.locate_report(None, Some("0.5"), Some("")),
            Err(ReportLocationError::MissingLocation)
        );
        assert_eq!(
            locator.locate_report(None, Some("north"), Some("0.5")),
            Err(ReportLocationError::MissingLocation)
        );
        assert_eq!(
            locator.locate_report(None, Some("NaN"), Some("0.5")),
            Err(ReportLocationError::MissingLocation)
        );
    }

    #[test]
    fn invalid_and_outside_locations() {
        let locator = locator("[]");
        assert_eq!(
            locator.locate_report(None, Some("95"), Some("0.5")),
            Err(ReportLocationError::InvalidCoordinate(
                InvalidCoordinateError::OutOfRange {
                    axis: Axis::Latitude,
                    value: 95.0
                }
            ))
        );
        assert_eq!(
            locator.locate_report(None, Some("0.5"), Some("5")),
            Err(ReportLocationError::OutsideServiceArea)
        );
    }
}

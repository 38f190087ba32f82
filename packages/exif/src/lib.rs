#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! EXIF GPS extraction for report photos.
//!
//! Reads the GPS IFD from an in-memory image (any container `kamadak-exif`
//! understands: JPEG, TIFF, HEIF, PNG, WebP) and converts the latitude and
//! longitude tags into a signed decimal [`Coordinate`].
//!
//! A photo without usable GPS data is an expected outcome, not an error:
//! [`extract_gps_from_image`] returns `None` and the caller falls back to
//! explicitly supplied coordinates.

mod dms;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::io::Cursor;

use civic_map_ward_models::{Axis, Coordinate};
use exif::{Exif, In, Rational, SRational, Tag, Value};

pub use dms::{GpsTag, Hemisphere, dms_to_decimal, parse_dms_text};

/// Extracts the GPS position from an image's EXIF metadata.
///
/// Returns `None` if the bytes are not a supported image, carry no EXIF
/// data, or the GPS tags are absent, malformed, or out of range.
#[must_use]
pub fn extract_gps_from_image(bytes: &[u8]) -> Option<Coordinate> {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(e) => {
            log::debug!("No readable EXIF metadata: {e}");
            return None;
        }
    };

    let latitude = gps_tag(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let longitude = gps_tag(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;

    let coordinate = coordinate_from_tags(&latitude, &longitude);
    if coordinate.is_none() {
        log::debug!("Unusable GPS tags: latitude={latitude:?} longitude={longitude:?}");
    }
    coordinate
}

/// Converts a latitude/longitude tag pair into a [`Coordinate`].
///
/// Returns `None` if either value cannot be converted, a hemisphere
/// reference belongs to the wrong axis, or a value is out of range.
#[must_use]
pub fn coordinate_from_tags(latitude: &GpsTag<'_>, longitude: &GpsTag<'_>) -> Option<Coordinate> {
    Some(Coordinate::new(
        latitude.to_axis_value(Axis::Latitude)?,
        longitude.to_axis_value(Axis::Longitude)?,
    ))
}

/// Reads one GPS value and its hemisphere reference from the primary IFD.
fn gps_tag(exif: &Exif, value_tag: Tag, ref_tag: Tag) -> Option<GpsTag<'_>> {
    let value = &exif.get_field(value_tag, In::PRIMARY)?.value;
    let hemisphere = exif
        .get_field(ref_tag, In::PRIMARY)
        .and_then(|field| first_ascii(&field.value))
        .and_then(Hemisphere::from_reference);

    tag_from_value(value, hemisphere)
}

/// Maps an EXIF value onto one of the [`GpsTag`] shapes.
///
/// DMS shapes require a hemisphere. A lone number with no reference is
/// taken to be already signed.
fn tag_from_value(value: &Value, hemisphere: Option<Hemisphere>) -> Option<GpsTag<'_>> {
    let numbers: Vec<f64> = match value {
        Value::Rational(parts) => parts.iter().map(Rational::to_f64).collect(),
        Value::SRational(parts) => parts.iter().map(SRational::to_f64).collect(),
        Value::Double(parts) => parts.clone(),
        Value::Float(parts) => parts.iter().copied().map(f64::from).collect(),
        Value::Ascii(_) => {
            return Some(GpsTag::DmsString(first_ascii(value)?, hemisphere?));
        }
        _ => return None,
    };

    match (numbers.as_slice(), hemisphere) {
        ([degrees, minutes, seconds], Some(h)) => {
            Some(GpsTag::DmsTriple([*degrees, *minutes, *seconds], h))
        }
        ([degrees, minutes], Some(h)) => Some(GpsTag::DmsTriple([*degrees, *minutes, 0.0], h)),
        ([degrees], Some(h)) => Some(GpsTag::DmsTriple([*degrees, 0.0, 0.0], h)),
        ([decimal], None) => Some(GpsTag::DecimalDegrees(*decimal)),
        _ => None,
    }
}

/// First string of an ASCII value.
fn first_ascii(value: &Value) -> Option<&str> {
    match value {
        Value::Ascii(lines) => std::str::from_utf8(lines.first()?).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Dms, tiff_with_gps, tiff_without_gps};

    const TOLERANCE: f64 = 1e-4;

    const CHENNAI_LAT: Dms = [(13, 1), (4, 1), (292, 10)];
    const CHENNAI_LNG: Dms = [(80, 1), (13, 1), (17, 1)];

    #[test]
    fn extracts_north_east_coordinates() {
        let image = tiff_with_gps(CHENNAI_LAT, b'N', CHENNAI_LNG, b'E');
        let coordinate = extract_gps_from_image(&image).unwrap();

        assert!((coordinate.latitude - 13.0748).abs() < TOLERANCE);
        assert!((coordinate.longitude - 80.2214).abs() < TOLERANCE);
    }

    #[test]
    fn south_and_west_references_negate() {
        let image = tiff_with_gps(CHENNAI_LAT, b'S', CHENNAI_LNG, b'W');
        let coordinate = extract_gps_from_image(&image).unwrap();

        assert!((coordinate.latitude + 13.0748).abs() < TOLERANCE);
        assert!((coordinate.longitude + 80.2214).abs() < TOLERANCE);
    }

    #[test]
    fn mismatched_reference_is_none() {
        let image = tiff_with_gps(CHENNAI_LAT, b'E', CHENNAI_LNG, b'E');
        assert!(extract_gps_from_image(&image).is_none());
    }

    #[test]
    fn zero_denominator_is_none() {
        let image = tiff_with_gps([(13, 0), (4, 1), (0, 1)], b'N', CHENNAI_LNG, b'E');
        assert!(extract_gps_from_image(&image).is_none());
    }

    #[test]
    fn image_without_gps_is_none() {
        assert!(extract_gps_from_image(&tiff_without_gps()).is_none());
    }

    #[test]
    fn garbage_bytes_are_none() {
        assert!(extract_gps_from_image(b"definitely not an image").is_none());
        assert!(extract_gps_from_image(&[]).is_none());
        assert!(extract_gps_from_image(&[0xFF, 0xD8, 0xFF, 0xD9]).is_none());
    }

    #[test]
    fn maps_exif_values_to_tag_shapes() {
        let triple = Value::Rational(vec![
            Rational { num: 13, denom: 1 },
            Rational { num: 4, denom: 1 },
            Rational { num: 292, denom: 10 },
        ]);
        assert_eq!(
            tag_from_value(&triple, Some(Hemisphere::North)),
            Some(GpsTag::DmsTriple([13.0, 4.0, 29.2], Hemisphere::North))
        );
        assert_eq!(tag_from_value(&triple, None), None);

        let single = Value::Double(vec![-33.8568]);
        assert_eq!(
            tag_from_value(&single, None),
            Some(GpsTag::DecimalDegrees(-33.8568))
        );
        assert_eq!(
            tag_from_value(&single, Some(Hemisphere::South)),
            Some(GpsTag::DmsTriple([-33.8568, 0.0, 0.0], Hemisphere::South))
        );

        let text = Value::Ascii(vec![b"13 deg 4' 29.2\"".to_vec()]);
        assert_eq!(
            tag_from_value(&text, Some(Hemisphere::North)),
            Some(GpsTag::DmsString("13 deg 4' 29.2\"", Hemisphere::North))
        );

        assert_eq!(tag_from_value(&Value::Byte(vec![1]), None), None);
    }

    #[test]
    fn coordinate_from_tag_pairs() {
        let coordinate = coordinate_from_tags(
            &GpsTag::DmsString("13 4 29.2", Hemisphere::North),
            &GpsTag::DecimalDegrees(80.2214),
        )
        .unwrap();
        assert!((coordinate.latitude - 13.0748).abs() < TOLERANCE);
        assert!((coordinate.longitude - 80.2214).abs() < TOLERANCE);

        assert!(
            coordinate_from_tags(
                &GpsTag::DecimalDegrees(80.2214),
                &GpsTag::DecimalDegrees(13.0748),
            )
            .is_some(),
            "decimal pairs carry no axis information to reject"
        );
        assert!(
            coordinate_from_tags(
                &GpsTag::DecimalDegrees(120.0),
                &GpsTag::DecimalDegrees(13.0),
            )
            .is_none()
        );
    }
}

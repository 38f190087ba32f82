//! Degrees/minutes/seconds conversion.
//!
//! GPS tags show up in three shapes depending on the writer: a signed
//! decimal, a `[degrees, minutes, seconds]` triple with a hemisphere
//! reference, or free text like `13 deg 4' 29.20"`. [`GpsTag`] models the
//! three shapes; [`GpsTag::to_decimal`] converts each one.

use std::sync::LazyLock;

use civic_map_ward_models::Axis;
use regex::Regex;

static DMS_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)[^0-9]+([0-9]+)[^0-9]+([0-9]+(?:\.[0-9]+)?)")
        .unwrap_or_else(|_| unreachable!())
});

/// GPS hemisphere reference (`GPSLatitudeRef` / `GPSLongitudeRef`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    /// `N`
    North,
    /// `S`
    South,
    /// `E`
    East,
    /// `W`
    West,
}

impl Hemisphere {
    /// Parses a reference: a single letter (`N`) or the full word
    /// (`North`), case-insensitive, ignoring surrounding whitespace and NUL
    /// padding.
    #[must_use]
    pub fn from_reference(reference: &str) -> Option<Self> {
        let reference = reference.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        [
            (Self::North, "N", "north"),
            (Self::South, "S", "south"),
            (Self::East, "E", "east"),
            (Self::West, "W", "west"),
        ]
        .into_iter()
        .find(|(_, letter, word)| {
            reference.eq_ignore_ascii_case(letter) || reference.eq_ignore_ascii_case(word)
        })
        .map(|(hemisphere, _, _)| hemisphere)
    }

    /// `-1.0` for south and west, `1.0` otherwise.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::South | Self::West => -1.0,
            Self::North | Self::East => 1.0,
        }
    }

    /// The axis this reference applies to.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Latitude,
            Self::East | Self::West => Axis::Longitude,
        }
    }
}

/// A raw GPS coordinate value in one of the supported shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GpsTag<'a> {
    /// Already a signed decimal.
    DecimalDegrees(f64),
    /// `[degrees, minutes, seconds]` plus hemisphere.
    DmsTriple([f64; 3], Hemisphere),
    /// Free text holding degrees, minutes and seconds, plus hemisphere.
    DmsString(&'a str, Hemisphere),
}

impl GpsTag<'_> {
    /// Hemisphere reference, if this shape carries one.
    #[must_use]
    pub const fn hemisphere(&self) -> Option<Hemisphere> {
        match self {
            Self::DecimalDegrees(_) => None,
            Self::DmsTriple(_, hemisphere) | Self::DmsString(_, hemisphere) => Some(*hemisphere),
        }
    }

    /// Converts to signed decimal degrees.
    ///
    /// Returns `None` for unparsable text or negative/non-finite
    /// components.
    #[must_use]
    pub fn to_decimal(&self) -> Option<f64> {
        let decimal = match self {
            Self::DecimalDegrees(value) => *value,
            Self::DmsTriple(dms, hemisphere) => {
                if !dms.iter().all(|c| c.is_finite() && *c >= 0.0) {
                    return None;
                }
                dms_to_decimal(*dms, *hemisphere)
            }
            Self::DmsString(text, hemisphere) => dms_to_decimal(parse_dms_text(text)?, *hemisphere),
        };

        decimal.is_finite().then_some(decimal)
    }

    /// Converts to decimal degrees and checks the result against `axis`.
    ///
    /// Returns `None` if the hemisphere belongs to the other axis or the
    /// value is out of range.
    #[must_use]
    pub fn to_axis_value(&self, axis: Axis) -> Option<f64> {
        if self.hemisphere().is_some_and(|h| h.axis() != axis) {
            return None;
        }
        self.to_decimal().filter(|value| value.abs() <= axis.limit())
    }
}

/// `degrees + minutes / 60 + seconds / 3600`, negated for south and west.
#[must_use]
pub fn dms_to_decimal(dms: [f64; 3], hemisphere: Hemisphere) -> f64 {
    let [degrees, minutes, seconds] = dms;
    hemisphere.sign() * (degrees + minutes / 60.0 + seconds / 3600.0)
}

/// Pulls degrees, minutes and seconds out of a DMS string such as
/// `13 deg 4' 29.20"`.
#[must_use]
pub fn parse_dms_text(text: &str) -> Option<[f64; 3]> {
    let captures = DMS_TEXT.captures(text)?;
    let part = |i: usize| -> Option<f64> { captures.get(i)?.as_str().parse::<f64>().ok() };
    Some([part(1)?, part(2)?, part(3)?])
}

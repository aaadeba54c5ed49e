/// Parsing of Tesseract TSV (`image_to_data`) output into text fragments
///
/// Each detector row is classified explicitly as either a usable detection
/// or a row to skip. Skipped rows (the TSV header, page/block/line summary
/// rows without text, anything malformed) are dropped without error.
use crate::fragment::{BoundingBox, TextFragment};

/// Number of whitespace-separated fields in a word-level detection row
pub const DETECTOR_FIELD_COUNT: usize = 12;

const FIELD_LEVEL: usize = 0;
const FIELD_LEFT: usize = 6;
const FIELD_TOP: usize = 7;
const FIELD_WIDTH: usize = 8;
const FIELD_HEIGHT: usize = 9;
const FIELD_TEXT: usize = 11;

/// A detector row that passed every shape check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorRow {
    pub bounds: BoundingBox,
    pub text: String,
}

/// Why a row was not turned into a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Row did not have exactly `DETECTOR_FIELD_COUNT` fields
    FieldCount(usize),
    /// First field is not an unsigned decimal level marker
    LevelMarker,
    /// One of the box fields is not a non-negative integer
    Geometry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowParse {
    Valid(DetectorRow),
    Skip(SkipReason),
}

/// Level marker must be a run of ASCII digits (no sign, no decimal point)
fn is_level_marker(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn parse_coordinate(field: &str) -> Option<u32> {
    field.parse::<u32>().ok()
}

/// Classify a single detector row
pub fn parse_row(line: &str) -> RowParse {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() != DETECTOR_FIELD_COUNT {
        return RowParse::Skip(SkipReason::FieldCount(fields.len()));
    }

    if !is_level_marker(fields[FIELD_LEVEL]) {
        return RowParse::Skip(SkipReason::LevelMarker);
    }

    let geometry = (
        parse_coordinate(fields[FIELD_LEFT]),
        parse_coordinate(fields[FIELD_TOP]),
        parse_coordinate(fields[FIELD_WIDTH]),
        parse_coordinate(fields[FIELD_HEIGHT]),
    );
    let bounds = match geometry {
        (Some(x), Some(y), Some(width), Some(height)) => BoundingBox::new(x, y, width, height),
        _ => return RowParse::Skip(SkipReason::Geometry),
    };

    // Whitespace splitting already guarantees a non-empty text field; a row
    // without text has 11 fields and is rejected above
    RowParse::Valid(DetectorRow {
        bounds,
        text: fields[FIELD_TEXT].to_string(),
    })
}

/// Lazily turn raw detector output into fragments, in emission order
pub fn fragments_from_rows(output: &str) -> impl Iterator<Item = TextFragment> + '_ {
    output.lines().filter_map(|line| match parse_row(line) {
        RowParse::Valid(row) => TextFragment::new(row.bounds, row.text).ok(),
        RowParse::Skip(reason) => {
            tracing::trace!("[ocr-extract] skipped row ({:?}): {:?}", reason, line);
            None
        }
    })
}

use crate::error::ScrutinySheetError;
use crate::spreadsheet::reference::index_to_reference;
use chrono::NaiveDate;
use chrono::TimeDelta;
use std::fmt::Display;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Text, with shared strings already resolved
    String,
    /// Error values such as `#N/A`
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Literal text, escapes and bracketed sections (colors, conditions) are ignored.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    /// Returns true for every number-backed type, date and time formats included.
    pub(crate) fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::NumberDateTime1900
                | Self::NumberDate1900
                | Self::NumberTime1900
                | Self::NumberDateTime1904
                | Self::NumberDate1904
                | Self::NumberTime1904
        )
    }
}

/// Represents a single cell in a spreadsheet with position, type, and value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the sheet
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Returns the text of a text cell; numbers, booleans, dates and errors are not text.
    pub(crate) fn as_text(&self) -> Option<&str> {
        match self.kind {
            CellType::String => Some(self.value.as_str()),
            _ => None,
        }
    }

    /// Returns true if the cell holds an error value.
    pub(crate) fn is_error(&self) -> bool {
        self.kind == CellType::Error
    }

    /// Converts a number-backed cell to a finite double-precision value.
    pub(crate) fn to_double(&self) -> Result<f64, String> {
        if !self.kind.is_numeric() {
            return Err(format!("'{}' is not a number", self));
        }
        match self.value.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(format!("parse '{}' to double failed", self.value)),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formatted = match self.kind {
            CellType::Boolean => Some(if self.value == "1" { "true" } else { "false" }.to_owned()),
            CellType::NumberDateTime1900 => to_datetime_string(&self.value, false).ok(),
            CellType::NumberDateTime1904 => to_datetime_string(&self.value, true).ok(),
            CellType::NumberDate1900 => to_date_string(&self.value, false).ok(),
            CellType::NumberDate1904 => to_date_string(&self.value, true).ok(),
            CellType::NumberTime1900 | CellType::NumberTime1904 => to_time_string(&self.value).ok(),
            CellType::IsoDateTime => Some(self.value.replace('T', " ")),
            _ => None,
        };
        // Fall back to the stored value when a date serial is malformed
        write!(f, "{}", formatted.as_deref().unwrap_or(&self.value))
    }
}

/// Largest serial Excel accepts as a date (9999-12-31).
const MAX_DATE_SERIAL: f64 = 2_958_465.0;

/// Converts Excel numeric date to ISO date string.
/// Handles Lotus 1-2-3 leap year bug for 1900 epoch.
fn to_date_string(value: &str, is_1904: bool) -> Result<String, ScrutinySheetError> {
    let serial = value.parse::<f64>()?;
    if !(0.0..=MAX_DATE_SERIAL).contains(&serial) {
        Err(ScrutinySheetError::WithContextError(format!("date serial '{}' out of range", value)))?;
    }
    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).ok_or_else(|| ScrutinySheetError::WithContextError("invalid epoch".to_owned()))?;
    let date = TimeDelta::try_days(days + offset)
        .and_then(|duration| epoch.checked_add_signed(duration))
        .ok_or_else(|| ScrutinySheetError::WithContextError(format!("date serial '{}' out of range", value)))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Converts Excel numeric time (fraction of a day) to ISO time string.
fn to_time_string(value: &str) -> Result<String, ScrutinySheetError> {
    let factor = value.parse::<f64>()?.fract();
    let mut rest = (factor * 86_400_000f64).round() as i64;
    let milliseconds = rest % 1_000; rest /= 1_000;
    let seconds = rest % 60; rest /= 60;
    let minutes = rest % 60; rest /= 60;
    let hours = rest;
    let timestamp = if milliseconds > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    };
    Ok(timestamp)
}

/// Converts Excel numeric datetime to ISO datetime string.
fn to_datetime_string(value: &str, is_1904: bool) -> Result<String, ScrutinySheetError> {
    let date = to_date_string(value, is_1904)?;
    let time = to_time_string(value)?;
    Ok(format!("{date} {time}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell { row: 1, col: 3, kind, value: value.to_owned() }
    }

    #[test]
    fn custom_number_formats() {
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd", false), CellType::NumberDate1900);
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd hh:mm", true), CellType::NumberDateTime1904);
        assert_eq!(CellType::parse_custom_number_format("hh:mm:ss", false), CellType::NumberTime1900);
        assert_eq!(CellType::parse_custom_number_format("0.00%", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("[Red]0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("0.0\" days\"", false), CellType::Number);
    }

    #[test]
    fn builtin_number_formats() {
        assert_eq!(CellType::parse_builtin_number_format_id("14", false), Some(CellType::NumberDate1900));
        assert_eq!(CellType::parse_builtin_number_format_id("22", true), Some(CellType::NumberDateTime1904));
        assert_eq!(CellType::parse_builtin_number_format_id("0", false), None);
        assert_eq!(CellType::parse_builtin_number_format_id("10", false), None);
    }

    #[test]
    fn text_only_for_strings() {
        assert_eq!(cell(CellType::String, "Science").as_text(), Some("Science"));
        assert_eq!(cell(CellType::Number, "12").as_text(), None);
        assert_eq!(cell(CellType::Error, "#N/A").as_text(), None);
    }

    #[test]
    fn doubles() {
        assert_eq!(cell(CellType::Number, "85.5").to_double(), Ok(85.5));
        assert_eq!(cell(CellType::NumberDate1900, "45000").to_double(), Ok(45000.0));
        assert!(cell(CellType::String, "85.5").to_double().is_err());
        assert!(cell(CellType::Number, "NaN").to_double().is_err());
        assert!(cell(CellType::Boolean, "1").to_double().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(cell(CellType::Number, "30").to_string(), "30");
        assert_eq!(cell(CellType::Boolean, "0").to_string(), "false");
        assert_eq!(cell(CellType::NumberDate1900, "45000").to_string(), "2023-03-15");
        assert_eq!(cell(CellType::NumberDate1904, "0").to_string(), "1904-01-01");
        assert_eq!(cell(CellType::NumberTime1900, "0.5").to_string(), "12:00:00");
        assert_eq!(cell(CellType::NumberDateTime1900, "45000.25").to_string(), "2023-03-15 06:00:00");
        assert_eq!(cell(CellType::IsoDateTime, "2024-01-02T03:04:05").to_string(), "2024-01-02 03:04:05");
        assert_eq!(cell(CellType::NumberDate1900, "garbage").to_string(), "garbage");
        assert_eq!(cell(CellType::String, "SC").reference(), "D2");
    }

    #[test]
    fn display_out_of_range_serials() {
        assert_eq!(cell(CellType::NumberDate1900, "1e20").to_string(), "1e20");
        assert_eq!(cell(CellType::NumberDateTime1904, "1e20").to_string(), "1e20");
        assert_eq!(cell(CellType::NumberDate1900, "-3").to_string(), "-3");
        assert_eq!(cell(CellType::NumberDate1900, "2958466").to_string(), "2958466");
        assert_eq!(cell(CellType::NumberDate1900, "2958465").to_string(), "9999-12-31");
        assert!(to_date_string("1e20", false).is_err());
    }
}

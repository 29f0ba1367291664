//! Julian Day Number to Gregorian calendar conversion.

use std::fmt;

const MS_PER_HOUR: u32 = 3_600_000;
const MS_PER_MINUTE: u32 = 60_000;
const MS_PER_SECOND: u32 = 1_000;

/// A calendar date and wall-clock time decoded from a DateTime field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    /// `(jdn + 1) % 7`.
    pub day_of_week: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DateTime {
    /// Convert a Julian Day Number and milliseconds since midnight.
    ///
    /// Fliegel and Van Flandern's integer algorithm for the proleptic
    /// Gregorian calendar.
    pub fn from_julian(jdn: u32, millis: u32) -> Self {
        let j = jdn as i64;
        let f = j + 1401 + (4 * j + 274_277) / 146_097 * 3 / 4 - 38;
        let e = 4 * f + 3;
        let g = e % 1461 / 4;
        let h = 5 * g + 2;

        let day = (h % 153 / 5 + 1) as u32;
        let month = ((h / 153 + 2) % 12 + 1) as u32;
        let year = e / 1461 - 4716 + (12 + 2 - month as i64) / 12;

        let mut ms = millis;
        let hour = ms / MS_PER_HOUR;
        ms %= MS_PER_HOUR;
        let minute = ms / MS_PER_MINUTE;
        ms %= MS_PER_MINUTE;
        let second = ms / MS_PER_SECOND;

        Self {
            year,
            month,
            day,
            day_of_week: ((j + 1) % 7) as u32,
            hour,
            minute,
            second,
        }
    }

    /// Decode the 8-byte wire form: little-endian JDN then milliseconds.
    pub fn from_le_bytes(raw: [u8; 8]) -> Self {
        let jdn = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let millis = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]);
        Self::from_julian(jdn, millis)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{:02}/{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

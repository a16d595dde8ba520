use std::collections::HashMap;
use std::convert::TryFrom;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use super::rfc5322::Rfc5322Parser;
use super::results::{ParsingError, ParsingResult};

static DAYS_OF_WEEK: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

static MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

// Lazily build TZ_DATA when we need it.
lazy_static! {
    static ref TZ_DATA: HashMap<&'static str, i32> = {
        let mut map = HashMap::new();
        map.insert("Z", 0); // Zulu
        map.insert("UT", 0);
        map.insert("UTC", 0);
        map.insert("GMT", 0);
        map.insert("PST", -28800); // UTC-8
        map.insert("PDT", -25200); // UTC-7
        map.insert("MST", -25200); // UTC-7
        map.insert("MDT", -21600); // UTC-6
        map.insert("CST", -21600); // UTC-6
        map.insert("CDT", -18000); // UTC-5
        map.insert("EST", -18000); // UTC-5
        map.insert("EDT", -14400); // UTC-4
        map
    };
}

/// Timestamp used when a message carries no usable date: the Unix epoch.
pub fn epoch() -> DateTime<FixedOffset> {
    DateTime::<Utc>::default().into()
}

/// Best-effort date parsing for `Date:` header values.
///
/// Tries, in order, chrono's RFC 2822 parser, the lenient RFC 822 parser
/// below (two digit years, named zones, missing seconds) and RFC 3339.
/// Never panics; returns `None` when nothing fits.
pub fn parse_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(s)
        .ok()
        .or_else(|| Rfc822DateParser::new(s).consume_datetime().ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok())
}

/// Parser for RFC822 style dates, as defined by Section 5.
///
/// Note that this also supports the additions as specified in
/// RFC5322 Section 3.3 while still being backward compatible.
pub struct Rfc822DateParser<'s> {
    parser: Rfc5322Parser<'s>,
}

impl<'s> Rfc822DateParser<'s> {
    pub fn new(s: &'s str) -> Rfc822DateParser<'s> {
        Rfc822DateParser {
            parser: Rfc5322Parser::new(s),
        }
    }

    #[inline]
    fn consume_u32(&mut self) -> Option<u32> {
        self.parser.consume_word()?.parse().ok()
    }

    fn consume_time(&mut self) -> ParsingResult<(u32, u32, u32)> {
        let hour = self
            .consume_u32()
            .ok_or_else(|| ParsingError::new("Failed to parse time: Expected hour, a number."))?;

        if !self.parser.consume_if(':') {
            return Err(ParsingError::new("Failed to parse time: Expected ':'."));
        }

        let minute = self
            .consume_u32()
            .ok_or_else(|| ParsingError::new("Failed to parse time: Expected minute."))?;

        // Seconds are optional, only try to parse if we see the next seperator.
        let second = if self.parser.consume_if(':') {
            self.consume_u32().unwrap_or(0)
        } else {
            0
        };

        Ok((hour, minute, second))
    }

    fn consume_timezone_offset(&mut self) -> ParsingResult<i32> {
        let sign = match self.parser.peek() {
            Some('+') => 1,
            Some('-') => -1,
            _ => 0,
        };
        if sign != 0 {
            self.parser.consume_char();
        }

        let zone = self
            .parser
            .consume_word()
            .ok_or_else(|| ParsingError::new("Expected timezone offset."))?;

        if sign != 0 {
            // Numeric offsets are exactly four digits, "hhmm".
            if zone.len() != 4 || !zone.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParsingError::new(format!("Invalid timezone offset: {}", zone)));
            }
            let offset_hours: i32 = zone[..2].parse().map_err(|_| ParsingError::new("Invalid offset hours."))?;
            let offset_mins: i32 = zone[2..].parse().map_err(|_| ParsingError::new("Invalid offset minutes."))?;
            return Ok(sign * (offset_hours * 3600 + offset_mins * 60));
        }

        // Isn't an offset, so try to use the strings->TZ hash.
        TZ_DATA
            .get(&zone.to_ascii_uppercase()[..])
            .cloned()
            .ok_or_else(|| ParsingError::new(format!("Invalid timezone: {}", zone)))
    }

    /// Consume a DateTime from the input.
    ///
    /// If successful, returns a DateTime with a fixed offset based on the
    /// timezone parsed.
    pub fn consume_datetime(&mut self) -> ParsingResult<DateTime<FixedOffset>> {
        // Handle the optional day ","
        self.parser.push_position();
        let day_of_week = self.parser.consume_word().map(|d| d.to_ascii_lowercase());
        match day_of_week {
            Some(ref dow) if DAYS_OF_WEEK.contains(&&dow[..]) => {
                self.parser.drop_position();
                // Lose the ","
                self.parser.consume_while(|c| c == ',' || c.is_whitespace());
            }
            // What we read doesn't look like a day, so go back to the start.
            _ => self.parser.pop_position(),
        }

        let day_of_month = self
            .consume_u32()
            .ok_or_else(|| ParsingError::new("Expected day of month, a number."))?;
        self.parser.consume_linear_whitespace();

        let month = match self.parser.consume_word() {
            Some(s) => {
                let lower_month = s.to_ascii_lowercase();
                // Add one because months are 1 indexed, array is 0 indexed.
                MONTHS
                    .iter()
                    .position(|&m| m == lower_month)
                    .map(|i| (i + 1) as u32)
                    .ok_or_else(|| ParsingError::new(format!("Invalid month: {}", lower_month)))?
            }
            None => return Err(ParsingError::new("Expected month.")),
        };
        self.parser.consume_linear_whitespace();

        let year = match self.consume_u32() {
            // See RFC5322 4.3 for justification of obsolete year format handling.
            // 2 digit year between 0 and 49 is assumed to be in the 2000s
            Some(i @ 0..=49) => i + 2000,
            // 2 digit year greater than 50 and 3 digit years are added to 1900
            Some(i @ 50..=999) => i + 1900,
            Some(i) => i,
            None => return Err(ParsingError::new("Expected year.")),
        };
        self.parser.consume_linear_whitespace();

        let (hour, minute, second) = self.consume_time()?;
        self.parser.consume_linear_whitespace();

        let tz_offset = self.consume_timezone_offset()?;

        FixedOffset::east_opt(tz_offset)
            .and_then(|tz| {
                let year = i32::try_from(year).ok()?;
                tz.with_ymd_and_hms(year, month, day_of_month, hour, minute, second)
                    .single()
            })
            .ok_or_else(|| ParsingError::new("Date is out of range."))
    }
}

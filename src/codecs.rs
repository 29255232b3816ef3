use std::io;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};
use regex::Regex;

use crate::schema::{Codec, SchemaError, SchemaResult};

static OFFSET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+-]\d{2}:\d{2}").unwrap()
});

static ZONED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<weekday>[A-Za-z]{3})\s+",
        r"(?P<datetime>[A-Za-z]{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+",
        r"(?P<zone>\S+)\s+",
        r"(?P<year>\d{4})$",
    )).unwrap()
});

static NUMERIC_ZONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sign>[+-])(?P<hour>\d{2}):?(?P<minute>\d{2})$").unwrap()
});

fn undecodable(r: &str) -> SchemaError {
    SchemaError::violation(format!("'{}' is not a valid date construct.", r))
}

/// RFC 3339 date times.
///
/// Decoding tries, in order, fractional seconds with a numeric offset,
/// whole seconds with a numeric offset (both only when the string has a
/// `+HH:MM`/`-HH:MM` offset at all), then the same two with a literal `Z`.
/// Encoding always writes fractional seconds (at least two digits) and a
/// numeric offset, e.g. `2008-01-01T00:00:00.00-06:00`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rfc3339;

impl Codec<DateTime<FixedOffset>> for Rfc3339 {
    fn encode(&self, value: &DateTime<FixedOffset>, w: &mut dyn io::Write) -> SchemaResult<()> {
        write!(w, "{}", value.format("%Y-%m-%dT%H:%M:%S"))?;
        let millis = format!("{:03}", (value.nanosecond() / 1_000_000).min(999));
        write!(w, ".{:0<2}", millis.trim_end_matches('0'))?;
        write!(w, "{}", value.format("%:z"))?;
        Ok(())
    }

    fn decode(&self, r: &str) -> SchemaResult<DateTime<FixedOffset>> {
        let r = r.trim();
        if OFFSET_PATTERN.is_match(r) {
            for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%:z"] {
                if let Ok(dt) = DateTime::parse_from_str(r, format) {
                    return Ok(dt);
                }
            }
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(r, format) {
                return Ok(Utc.from_utc_datetime(&naive).into());
            }
        }
        Err(undecodable(r))
    }
}

/// Date strings in the form `Tue Oct 20 02:48:09 GMT+10:00 2009`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZonedDate;

impl Codec<DateTime<FixedOffset>> for ZonedDate {
    fn encode(&self, value: &DateTime<FixedOffset>, w: &mut dyn io::Write) -> SchemaResult<()> {
        write!(w, "{}", value.format("%a %b %d %H:%M:%S GMT%:z %Y"))?;
        Ok(())
    }

    fn decode(&self, r: &str) -> SchemaResult<DateTime<FixedOffset>> {
        let r = r.trim();
        let caps = ZONED_PATTERN.captures(r).ok_or_else(|| undecodable(r))?;
        let offset = zone_offset(&caps["zone"]).ok_or_else(|| undecodable(r))?;
        let local = format!("{} {} {}", &caps["weekday"], &caps["datetime"], &caps["year"]);
        let naive = NaiveDateTime::parse_from_str(&local, "%a %b %d %H:%M:%S %Y")
            .map_err(|_| undecodable(r))?;
        offset.from_local_datetime(&naive).single().ok_or_else(|| undecodable(r))
    }
}

/// Offset named by a time zone designator.
pub fn zone_offset(zone: &str) -> Option<FixedOffset> {
    let hours = match zone {
        "GMT" | "UTC" | "UT" | "Z" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => {
            let numeric = zone.strip_prefix("GMT")
                .or_else(|| zone.strip_prefix("UTC"))
                .unwrap_or(zone);
            let caps = NUMERIC_ZONE_PATTERN.captures(numeric)?;
            let hour: i32 = caps["hour"].parse().ok()?;
            let minute: i32 = caps["minute"].parse().ok()?;
            let seconds = (hour * 60 + minute) * 60;
            let seconds = if &caps["sign"] == "-" { -seconds } else { seconds };
            return FixedOffset::east_opt(seconds);
        }
    };
    FixedOffset::east_opt(hours * 3600)
}

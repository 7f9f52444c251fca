// Line codec for stored entries
//
// Format: [<timestamp>]-[<escaped location>]-[<severity>]:<escaped message>\n

use crate::error::{LogkeepError, Result};
use crate::store::entry::LogEntry;
use crate::store::level::Level;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Timestamp format written inside the line header, without the zone suffix
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Date format used in log file names
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

const FIELD_DELIMITER: &str = "]-[";

/// Format a timestamp the way it appears in a line header
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    format!("{}Z", at.format(LINE_TIMESTAMP_FORMAT))
}

/// Parse a line header timestamp. Accepts a `Z` suffix or an hour offset
/// such as `+05` / `-03`.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let malformed = || LogkeepError::MalformedLine(format!("bad timestamp '{}'", raw));

    let (stamp, offset_secs) = if let Some(stamp) = raw.strip_suffix('Z') {
        (stamp, 0)
    } else if raw.len() > 3 && raw.is_char_boundary(raw.len() - 3) {
        let (stamp, zone) = raw.split_at(raw.len() - 3);
        let hours: i32 = zone.parse().map_err(|_| malformed())?;
        if !zone.starts_with(['+', '-']) {
            return Err(malformed());
        }
        (stamp, hours * 3600)
    } else {
        return Err(malformed());
    };

    let naive =
        NaiveDateTime::parse_from_str(stamp, LINE_TIMESTAMP_FORMAT).map_err(|_| malformed())?;
    let offset = FixedOffset::east_opt(offset_secs).ok_or_else(malformed)?;
    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(malformed)?;

    Ok(local.with_timezone(&Utc))
}

/// Encode an entry as one newline-terminated line
///
/// The entry's level is not part of the line; it is implied by the
/// directory the line is stored under.
pub fn encode_line(entry: &LogEntry, created_at: &DateTime<Utc>) -> String {
    format!(
        "[{}{}{}{}{}]:{}\n",
        format_timestamp(created_at),
        FIELD_DELIMITER,
        escape(&entry.location),
        FIELD_DELIMITER,
        entry.severity,
        escape(&entry.message),
    )
}

/// Decode one line (with or without its trailing newline)
pub fn decode_line(line: &str, level: Level) -> Result<LogEntry> {
    let line = line.trim_end_matches(['\n', '\r']);

    let separator = line
        .find(':')
        .ok_or_else(|| LogkeepError::MalformedLine("missing ':' separator".to_string()))?;
    let (header, message) = (&line[..separator], &line[separator + 1..]);

    let inner = header
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .ok_or_else(|| LogkeepError::MalformedLine("header is not bracketed".to_string()))?;

    let fields: Vec<&str> = inner.split(FIELD_DELIMITER).collect();
    let [timestamp, location, severity] = fields.as_slice() else {
        return Err(LogkeepError::MalformedLine(format!(
            "expected 3 header fields, found {}",
            fields.len()
        )));
    };

    let created_at = parse_timestamp(timestamp)?;
    let severity = severity
        .parse::<u8>()
        .map_err(|_| LogkeepError::MalformedLine(format!("bad severity '{}'", severity)))?;

    Ok(LogEntry {
        created_at: Some(created_at),
        level,
        severity,
        message: unescape(message)?,
        location: unescape(location)?,
    })
}

/// Percent-escape text using form-encoding rules
///
/// ASCII alphanumerics and `-_.~` pass through, space becomes `+`, any
/// other byte becomes `%XX`.
pub fn escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            b' ' => output.push('+'),
            _ => {
                output.push('%');
                output.push_str(&format!("{byte:02X}"));
            }
        }
    }
    output
}

/// Reverse [`escape`]
pub fn unescape(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                output.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| {
                        LogkeepError::MalformedLine(format!("bad escape at byte {}", i))
                    })?;
                output.push(hex);
                i += 3;
            }
            other => {
                output.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8(output)
        .map_err(|_| LogkeepError::MalformedLine("escaped text is not UTF-8".to_string()))
}

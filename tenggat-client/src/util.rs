use anyhow::bail;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::{collections::HashSet, hash::Hash};

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

pub trait Compact {
    fn compact(self) -> Self;
}

impl<T: Eq + Hash> Compact for Vec<T> {
    fn compact(self) -> Self {
        self.into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect::<Vec<_>>()
    }
}

/// Accepts RFC 3339, or a wall-clock time in `offset` written the way a
/// datetime-local input does.
pub fn parse_deadline(input: &str, offset: FixedOffset) -> anyhow::Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(deadline) = DateTime::parse_from_rfc3339(input) {
        return Ok(deadline.with_timezone(&Utc));
    }

    for format in LOCAL_FORMATS {
        let Ok(naive) = NaiveDateTime::parse_from_str(input, format) else {
            continue;
        };

        if let Some(deadline) = offset.from_local_datetime(&naive).single() {
            return Ok(deadline.with_timezone(&Utc));
        }
    }

    bail!("Invalid deadline {input:?}, expected YYYY-MM-DD HH:MM or RFC 3339")
}

pub fn format_deadline(deadline: DateTime<Utc>, offset: FixedOffset) -> String {
    deadline
        .with_timezone(&offset)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

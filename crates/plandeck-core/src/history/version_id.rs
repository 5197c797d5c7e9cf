//! Timestamp-derived, order-preserving version identifiers.

use std::{fmt, str::FromStr};

use jiff::{tz::Offset, Timestamp};

/// Length of the timestamp part, e.g. `2026-10-19T14-30-00.123456789Z`.
const BASE_LEN: usize = 30;

/// Highest tie-break sequence; the suffix is always four digits.
pub const MAX_SEQ: u16 = 9_999;

/// Identifier of one snapshot.
///
/// Rendered as a nanosecond UTC timestamp with `:` replaced by `-` so it is a
/// safe file name, plus a `-NNNN` suffix when several snapshots share a
/// timestamp. Ordering the strings lexically orders them chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionId {
    timestamp: Timestamp,
    seq: u16,
}

impl VersionId {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp, seq: 0 }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn seq(&self) -> u16 {
        self.seq
    }

    /// The id to use for a snapshot taken at `now`, given the newest existing
    /// id. Never returns an id that sorts at or before `latest`.
    ///
    /// Returns `None` once the sequence for one timestamp reaches [`MAX_SEQ`].
    pub fn next_after(latest: Option<VersionId>, now: Timestamp) -> Option<VersionId> {
        match latest {
            Some(latest) if now <= latest.timestamp => {
                let seq = latest.seq.checked_add(1).filter(|seq| *seq <= MAX_SEQ)?;
                Some(VersionId {
                    timestamp: latest.timestamp,
                    seq,
                })
            }
            _ => Some(VersionId::new(now)),
        }
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = Offset::UTC.to_datetime(self.timestamp);
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}-{:02}-{:02}.{:09}Z",
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
            dt.subsec_nanosecond()
        )?;
        if self.seq > 0 {
            write!(f, "-{:04}", self.seq)?;
        }
        Ok(())
    }
}

impl FromStr for VersionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid version id: {s}");
        if !s.is_ascii() || s.len() < BASE_LEN {
            return Err(invalid());
        }

        let (base, suffix) = s.split_at(BASE_LEN);
        let seq = match suffix {
            "" => 0,
            _ => {
                let digits = suffix.strip_prefix('-').ok_or_else(invalid)?;
                if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                digits.parse::<u16>().map_err(|_| invalid())?
            }
        };

        // Only the time half has its colons replaced.
        let (date, time) = base.split_at(10);
        let iso = format!("{date}{}", time.replace('-', ":"));
        let timestamp = iso.parse::<Timestamp>().map_err(|_| invalid())?;

        let id = VersionId { timestamp, seq };
        // Reject spellings that would not round-trip, such as `-0000`.
        if id.to_string() != s {
            return Err(invalid());
        }
        Ok(id)
    }
}

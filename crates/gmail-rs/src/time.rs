use chrono::{DateTime, Utc};

/// Converts an epoch timestamp string, counted in `1 / scale` seconds, to a UTC datetime.
/// Gmail's `internalDate` is in milliseconds, so `scale` is usually 1000.
pub fn unix_millis_to_datetime(value: &str, scale: i64) -> crate::Result<DateTime<Utc>> {
    let invalid = || crate::Error::InvalidTimestamp {
        value: value.to_owned(),
        scale,
    };

    if scale <= 0 {
        return Err(invalid());
    }

    let raw: i64 = value.trim().parse().map_err(|_| invalid())?;

    let secs = raw.div_euclid(scale);
    let frac = raw.rem_euclid(scale) as i128;
    let nanos = (frac * 1_000_000_000 / scale as i128) as u32;

    DateTime::from_timestamp(secs, nanos).ok_or_else(invalid)
}

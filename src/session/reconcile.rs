use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::common::{ChatError, ChatMessage};

const OFFSET_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp. Input without an offset is taken as UTC,
/// missing seconds as zero.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ChatError> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let zulu = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .map(|rest| format!("{rest}+00:00"));
    let with_offset = zulu.as_deref().unwrap_or(value);
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(with_offset, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| ChatError::Parse {
                value: value.to_string(),
                reason: "date out of range".to_string(),
            }),
        Err(err) => Err(ChatError::Parse {
            value: value.to_string(),
            reason: err.to_string(),
        }),
    }
}

/// Merge the outbound log with a fresh inbox snapshot into one conversation.
pub fn reconcile(outbound: &[ChatMessage], inbox: &[ChatMessage]) -> Vec<ChatMessage> {
    reconcile_at(outbound, inbox, Utc::now())
}

/// `reconcile` with an explicit fallback instant for unparseable timestamps.
///
/// The snapshot goes first, then the outbound log; entries whose id was
/// already seen are dropped. The sort is stable, so equal keys keep that
/// concatenation order.
pub fn reconcile_at(
    outbound: &[ChatMessage],
    inbox: &[ChatMessage],
    fallback: DateTime<Utc>,
) -> Vec<ChatMessage> {
    let mut seen = HashSet::new();
    let mut keyed: Vec<(DateTime<Utc>, ChatMessage)> = inbox
        .iter()
        .chain(outbound.iter())
        .filter(|message| seen.insert(message.id.as_str()))
        .map(|message| {
            let key = parse_timestamp(&message.timestamp).unwrap_or_else(|err| {
                log::debug!("Message {} sorts as now: {err}", message.id);
                fallback
            });
            (key, message.clone())
        })
        .collect();

    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, message)| message).collect()
}

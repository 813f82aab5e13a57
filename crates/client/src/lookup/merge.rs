//! Merge policy for one fresh lookup.
//!
//! Every field has exactly one producing provider, so merging is a matter of
//! picking that provider's value or the field's sentinel.

use crate::providers::Validation;
use chrono::{DateTime, Utc};
use phonecheck_core::PhoneRecord;
use phonecheck_core::cache::{NO_SPAM_DATA, NOT_AVAILABLE, UNKNOWN_NAME};

/// Build the record for a validated number.
///
/// `name` and `spam_score` are `None` when their provider degraded.
pub fn merge(
    number: &str, validation: Validation, name: Option<String>, spam_score: Option<String>, now: DateTime<Utc>,
) -> PhoneRecord {
    let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    PhoneRecord {
        number: number.to_string(),
        display_number: validation.international_format.unwrap_or_else(|| number.to_string()),
        name: name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        country: or_na(validation.country_name),
        carrier: or_na(validation.carrier),
        line_type: or_na(validation.line_type),
        spam_score: spam_score.unwrap_or_else(|| NO_SPAM_DATA.to_string()),
        active: validation.valid,
        last_checked: now,
    }
}

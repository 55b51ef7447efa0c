//! Deterministic client identities derived from a Telegram user id.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};

const FIXED_UUID_PREFIX: &str = "11111111-1111-1111-1111-";

/// Client uuid carrying the Telegram id in its last group.
///
/// Telegram user ids are positive, so the id is unsigned and zero padded to
/// 12 digits. With `fixed` the first four groups are
/// constant, otherwise the first two encode the current UTC date and time.
///
/// ```
/// use xui_handler::shared::utils::identity::telegram_uuid;
/// assert_eq!(telegram_uuid(12345, true), "11111111-1111-1111-1111-000000012345");
/// ```
pub fn telegram_uuid(telegram_id: u64, fixed: bool) -> String {
    if fixed {
        return format!("{}{:012}", FIXED_UUID_PREFIX, telegram_id);
    }
    telegram_uuid_at(telegram_id, Utc::now())
}

pub(crate) fn telegram_uuid_at(telegram_id: u64, now: DateTime<Utc>) -> String {
    format!(
        "{}-1111-1111-{:012}",
        now.format("%Y%m%d-%H%M"),
        telegram_id
    )
}

/// `TG{telegram_id}IB{inbound_id}`, unique per client and inbound.
pub fn email_from_tgid_inbound(telegram_id: u64, inbound_id: i64) -> String {
    format!("TG{}IB{}", telegram_id, inbound_id)
}

/// Standard base64 of the decimal Telegram id.
pub fn subscription_from_tgid(telegram_id: u64) -> String {
    STANDARD.encode(telegram_id.to_string())
}

/// Random v4 uuid for clients not tied to a Telegram user.
pub fn random_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn random_email(length: usize) -> String {
    random_alphanumeric(length)
}

pub fn random_subscription(length: usize) -> String {
    random_alphanumeric(length)
}

fn random_alphanumeric(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Days left until `expiry_time` (unix seconds). Zero means the client never
/// expires and yields infinity; past timestamps give negative values.
pub fn days_until_expiry(expiry_time: i64) -> f64 {
    days_until_expiry_at(expiry_time, Utc::now())
}

pub(crate) fn days_until_expiry_at(expiry_time: i64, now: DateTime<Utc>) -> f64 {
    if expiry_time == 0 {
        return f64::INFINITY;
    }
    let now_secs = now.timestamp_millis() as f64 / 1000.0;
    (expiry_time as f64 - now_secs) / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_uuid_pads_to_twelve_digits() {
        assert_eq!(
            telegram_uuid(12345, true),
            "11111111-1111-1111-1111-000000012345"
        );
        assert_eq!(
            telegram_uuid(123456789012, true),
            "11111111-1111-1111-1111-123456789012"
        );
    }

    #[test]
    fn small_ids_stay_valid_uuids() {
        let id = telegram_uuid(5, true);
        assert_eq!(id, "11111111-1111-1111-1111-000000000005");
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn timed_uuid_uses_date_and_minute() {
        let now = Utc.with_ymd_and_hms(2026, 2, 22, 9, 5, 59).unwrap();
        assert_eq!(
            telegram_uuid_at(12345, now),
            "20260222-0905-1111-1111-000000012345"
        );
    }

    #[test]
    fn telegram_uuid_is_a_valid_uuid() {
        let id = telegram_uuid(999888777, true);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn random_uuid_is_v4() {
        let id = uuid::Uuid::parse_str(&random_uuid()).unwrap();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn email_format() {
        assert_eq!(email_from_tgid_inbound(12345, 3), "TG12345IB3");
    }

    #[test]
    fn subscription_is_base64_of_decimal_id() {
        assert_eq!(subscription_from_tgid(12345), "MTIzNDU=");
    }

    #[test]
    fn random_identifiers_are_alphanumeric() {
        let email = random_email(8);
        let sub = random_subscription(16);
        assert_eq!(email.len(), 8);
        assert_eq!(sub.len(), 16);
        assert!(email.chars().chain(sub.chars()).all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn expiry_zero_is_infinite() {
        assert!(days_until_expiry(0).is_infinite());
    }

    #[test]
    fn expiry_one_day_ahead() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let tomorrow = now.timestamp() + 86_400;
        assert!((days_until_expiry_at(tomorrow, now) - 1.0).abs() < 1e-9);
        assert!(days_until_expiry_at(now.timestamp() - 43_200, now) < 0.0);
    }
}

use crate::cache::token::CachedCredential;

/// Classification of a cached credential against a TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Fresh,
    Expired,
    Absent,
}

impl Validity {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Validity::Fresh)
    }
}

/// A record is fresh while `now - issued_at < ttl_seconds`; reaching the TTL
/// exactly already counts as expired.
pub fn evaluate(record: Option<&CachedCredential>, ttl_seconds: u64, now: i64) -> Validity {
    let Some(record) = record else {
        return Validity::Absent;
    };
    let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
    if record.age(now) >= ttl {
        Validity::Expired
    } else {
        Validity::Fresh
    }
}

pub fn is_valid(record: Option<&CachedCredential>, ttl_seconds: u64, now: i64) -> bool {
    evaluate(record, ttl_seconds, now).is_fresh()
}

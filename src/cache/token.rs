/// A bearer token together with the moment it was issued.
///
/// Persisted as a two-line record: the issue time in unix seconds, then the
/// token itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCredential {
    pub issued_at: i64, // UNIX TIMESTAMP
    pub token: String,
}

impl CachedCredential {
    pub fn new(issued_at: i64, token: String) -> Self {
        Self { issued_at, token }
    }

    /// Seconds elapsed since issue. Negative when the record comes from the future.
    pub fn age(&self, now: i64) -> i64 {
        now.saturating_sub(self.issued_at)
    }

    pub fn to_record(&self) -> String {
        format!("{}\n{}\n", self.issued_at, self.token)
    }

    /// Parse a stored record. Anything that is not a complete, well-formed
    /// record yields `None`.
    pub fn from_record(content: &str) -> Option<Self> {
        let mut lines = content.split('\n');

        let issued_at = lines
            .next()?
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|ts| i64::try_from(ts).ok())?;

        let line = lines.next()?;
        let token = line.strip_suffix('\r').unwrap_or(line);
        if token.trim().is_empty() {
            return None;
        }

        Some(Self::new(issued_at, token.to_owned()))
    }
}

//! Expiration policies for cache entries

use std::time::Duration;

/// Window used by the cache-aside `get_or_insert_with` path
pub const DEFAULT_CACHE_ASIDE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How long an entry stays readable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Expires a fixed duration after it was written
    Absolute(Duration),
    /// Expires a fixed duration after it was last written or read
    Sliding(Duration),
}

impl Expiration {
    /// Returns the configured window regardless of kind
    pub fn window(&self) -> Duration {
        match self {
            Expiration::Absolute(d) | Expiration::Sliding(d) => *d,
        }
    }

    pub fn is_sliding(&self) -> bool {
        matches!(self, Expiration::Sliding(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window() {
        assert_eq!(
            Expiration::Absolute(Duration::from_secs(30)).window(),
            Duration::from_secs(30)
        );
        assert_eq!(
            Expiration::Sliding(Duration::from_secs(300)).window(),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_is_sliding() {
        assert!(Expiration::Sliding(Duration::from_secs(1)).is_sliding());
        assert!(!Expiration::Absolute(Duration::from_secs(1)).is_sliding());
    }
}

//! Expiry Policy Module
//!
//! Decides whether an entry is too old to serve, based on its file
//! modification time. Expiry is only ever evaluated when a reader asks for a
//! key with a max age; there is no background sweep.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};

// == Freshness ==
/// Outcome of an age check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Entry may be served
    Fresh,
    /// Entry is older than the reader's max age
    Expired {
        /// How old the entry was when checked
        age: Duration,
    },
}

impl Freshness {
    /// Returns true if the entry must be evicted instead of served.
    pub fn is_expired(&self) -> bool {
        matches!(self, Freshness::Expired { .. })
    }
}

/// Returns true if `max_age` asks for an age check at all.
///
/// None and zero both mean "never expire on this read".
pub fn expiry_enabled(max_age: Option<Duration>) -> bool {
    matches!(max_age, Some(d) if !d.is_zero())
}

// == Check Age ==
/// Compares `now - modified` against `max_age`.
///
/// Boundary condition: an entry whose age equals `max_age` exactly is still
/// fresh; it expires only once the age is strictly greater. A modification
/// time in the future (clock skew) counts as fresh.
pub fn check_age(
    modified: DateTime<Utc>,
    now: DateTime<Utc>,
    max_age: Option<Duration>,
) -> Freshness {
    let Some(max_age) = max_age.filter(|d| !d.is_zero()) else {
        return Freshness::Fresh;
    };
    let Ok(limit) = chrono::Duration::from_std(max_age) else {
        return Freshness::Fresh;
    };

    let age = now.signed_duration_since(modified);
    if age > limit {
        Freshness::Expired {
            age: age.to_std().unwrap_or(max_age),
        }
    } else {
        Freshness::Fresh
    }
}

// == File Freshness ==
/// Checks the age of the file at `path` against `max_age`.
///
/// Skips the metadata lookup entirely when expiry is disabled.
pub async fn file_freshness(path: &Path, max_age: Option<Duration>) -> std::io::Result<Freshness> {
    if !expiry_enabled(max_age) {
        return Ok(Freshness::Fresh);
    }
    let modified = tokio::fs::metadata(path).await?.modified()?;
    Ok(check_age(DateTime::<Utc>::from(modified), Utc::now(), max_age))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn secs(n: u64) -> Option<Duration> {
        Some(Duration::from_secs(n))
    }

    #[test]
    fn test_no_max_age_is_always_fresh() {
        let now = Utc::now();
        let ancient = now - chrono::Duration::days(3650);
        assert_eq!(check_age(ancient, now, None), Freshness::Fresh);
        assert_eq!(check_age(ancient, now, Some(Duration::ZERO)), Freshness::Fresh);
    }

    #[test]
    fn test_young_entry_is_fresh() {
        let now = Utc::now();
        let modified = now - chrono::Duration::seconds(5);
        assert_eq!(check_age(modified, now, secs(60)), Freshness::Fresh);
    }

    #[test]
    fn test_old_entry_is_expired() {
        let now = Utc::now();
        let modified = now - chrono::Duration::seconds(120);
        let freshness = check_age(modified, now, secs(60));
        assert_eq!(
            freshness,
            Freshness::Expired {
                age: Duration::from_secs(120)
            }
        );
        assert!(freshness.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Utc::now();
        let modified = now - chrono::Duration::seconds(60);

        // Age equal to max age is still fresh
        assert_eq!(check_age(modified, now, secs(60)), Freshness::Fresh);

        // One millisecond past the limit expires
        let later = now + chrono::Duration::milliseconds(1);
        assert!(check_age(modified, later, secs(60)).is_expired());
    }

    #[test]
    fn test_future_modification_is_fresh() {
        let now = Utc::now();
        let modified = now + chrono::Duration::seconds(30);
        assert_eq!(check_age(modified, now, secs(1)), Freshness::Fresh);
    }

    #[test]
    fn test_expiry_enabled() {
        assert!(!expiry_enabled(None));
        assert!(!expiry_enabled(Some(Duration::ZERO)));
        assert!(expiry_enabled(Some(Duration::from_millis(1))));
    }

    #[tokio::test]
    async fn test_file_freshness_uses_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let file = std::fs::File::create(&path).unwrap();

        assert_eq!(file_freshness(&path, secs(60)).await.unwrap(), Freshness::Fresh);

        file.set_modified(SystemTime::now() - Duration::from_secs(600))
            .unwrap();
        assert!(file_freshness(&path, secs(60)).await.unwrap().is_expired());
        assert_eq!(file_freshness(&path, None).await.unwrap(), Freshness::Fresh);
    }

    #[tokio::test]
    async fn test_file_freshness_missing_file_errors_only_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert!(file_freshness(&path, secs(60)).await.is_err());
        assert_eq!(file_freshness(&path, None).await.unwrap(), Freshness::Fresh);
    }
}

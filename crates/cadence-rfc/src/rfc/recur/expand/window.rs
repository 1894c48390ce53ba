use chrono::{DateTime, TimeZone, Utc};

/// ## Summary
/// A caller-supplied inclusive `[start, end]` range restricting which
/// occurrences are returned. It never moves the rule's anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Creates a window from two instants in any timezone.
    #[must_use]
    pub fn new<A: TimeZone, B: TimeZone>(start: &DateTime<A>, end: &DateTime<B>) -> Self {
        Self {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        }
    }

    /// A window whose end precedes its start contains nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Returns true if the instant lies within the window (both ends inclusive).
    #[must_use]
    pub fn contains<Z: TimeZone>(&self, instant: &DateTime<Z>) -> bool {
        let instant = instant.with_timezone(&Utc);
        self.start <= instant && instant <= self.end
    }
}

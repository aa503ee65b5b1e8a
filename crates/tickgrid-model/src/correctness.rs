use serde::{Deserialize, Serialize};
use std::fmt;

/// Data-quality level attached to every grid value.
///
/// Levels form a strict total order from best to worst:
/// `Good < Usable < Suspect < Error`. Merging quality signals always
/// keeps the worst level (see [`Correctness::merge`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Correctness {
    /// Fully trustworthy, current data.
    Good,
    /// Degraded but still displayable and sortable (e.g. a delayed feed).
    Usable,
    /// Possibly stale; shown with a suspect marker.
    Suspect,
    /// Known bad; shown with an error marker.
    Error,
}

impl Correctness {
    /// Worst-wins combination of two quality levels.
    ///
    /// Associative and commutative; `Good` is the identity and `Error`
    /// dominates everything.
    pub fn merge(a: Correctness, b: Correctness) -> Correctness {
        a.max(b)
    }

    /// Worst-wins combination of three quality levels.
    pub fn merge3(a: Correctness, b: Correctness, c: Correctness) -> Correctness {
        a.max(b).max(c)
    }

    /// Whether data at this level may be displayed and sorted normally.
    /// `Suspect` and `Error` are not usable.
    pub fn is_usable(self) -> bool {
        self < Correctness::Suspect
    }

    pub fn is_good(self) -> bool {
        self == Correctness::Good
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Correctness::Good => "Good",
            Correctness::Usable => "Usable",
            Correctness::Suspect => "Suspect",
            Correctness::Error => "Error",
        }
    }
}

impl fmt::Display for Correctness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The concrete reason a record's data is degraded.
///
/// Every reason maps to exactly one [`Correctness`] level via
/// [`Badness::correctness`]. The mapping is a closed, exhaustive match:
/// adding a reason without assigning its level is a compile error, so an
/// unmapped reason cannot exist at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badness {
    /// Nothing wrong; the `Good` placeholder.
    NotBad,
    /// Subscription inactive; last-known values retained.
    Inactive,
    /// Data from a delayed feed.
    Delayed,
    /// Initial connection in progress.
    Connecting,
    /// Connection dropped; automatic reconnect in progress.
    Reconnecting,
    /// Connection down with no reconnect pending.
    ConnectionOffline,
    /// Waiting for the feed to start publishing.
    FeedWaiting,
    /// Feed is publishing but flagged unreliable.
    FeedSuspect,
    /// Feed reported a fault.
    FeedError,
    /// Feed is offline.
    FeedOffline,
    /// No feed exists for the requested market.
    FeedNotAvailable,
    /// Subscription registered, first data not yet arrived.
    SubscribeWaiting,
    /// Subscription alive with a server-side warning.
    SubscribeWarning,
    /// Subscription rejected or faulted.
    SubscribeError,
    /// Publisher raised a warning for this topic.
    PublisherWarning,
    /// Publisher stopped cleanly; no further updates.
    PublisherStopped,
    /// Publisher went offline mid-session.
    PublisherOffline,
    /// A server request exceeded its deadline.
    RequestTimeout,
    /// A server request was refused.
    RequestRejected,
    /// Waiting for the symbol to resolve against the reference data.
    SymbolMatchWaiting,
    /// Symbol does not exist in the reference data.
    SymbolNotFound,
    /// Order list snapshot not yet delivered.
    OrdersWaiting,
    /// Holdings snapshot not yet delivered.
    HoldingsWaiting,
    /// Balance snapshot not yet delivered.
    BalancesWaiting,
    /// Caller lacks entitlements for this data.
    AccessDenied,
    /// Invariant violation inside the data layer itself.
    Internal,
}

impl Badness {
    /// The quality level this reason degrades a record to.
    ///
    /// Fixed for the process lifetime.
    pub const fn correctness(self) -> Correctness {
        match self {
            Badness::NotBad => Correctness::Good,

            Badness::Inactive | Badness::Delayed => Correctness::Usable,

            Badness::Connecting
            | Badness::Reconnecting
            | Badness::FeedWaiting
            | Badness::FeedSuspect
            | Badness::SubscribeWaiting
            | Badness::SubscribeWarning
            | Badness::PublisherWarning
            | Badness::RequestTimeout
            | Badness::SymbolMatchWaiting
            | Badness::OrdersWaiting
            | Badness::HoldingsWaiting
            | Badness::BalancesWaiting => Correctness::Suspect,

            Badness::ConnectionOffline
            | Badness::FeedError
            | Badness::FeedOffline
            | Badness::FeedNotAvailable
            | Badness::SubscribeError
            | Badness::PublisherStopped
            | Badness::PublisherOffline
            | Badness::RequestRejected
            | Badness::SymbolNotFound
            | Badness::AccessDenied
            | Badness::Internal => Correctness::Error,
        }
    }

    /// Short human-readable description, used in tooltips and logs.
    pub const fn reason_text(self) -> &'static str {
        match self {
            Badness::NotBad => "ok",
            Badness::Inactive => "inactive",
            Badness::Delayed => "delayed feed",
            Badness::Connecting => "connecting",
            Badness::Reconnecting => "reconnecting",
            Badness::ConnectionOffline => "connection offline",
            Badness::FeedWaiting => "waiting for feed",
            Badness::FeedSuspect => "feed suspect",
            Badness::FeedError => "feed error",
            Badness::FeedOffline => "feed offline",
            Badness::FeedNotAvailable => "feed not available",
            Badness::SubscribeWaiting => "waiting for subscription data",
            Badness::SubscribeWarning => "subscription warning",
            Badness::SubscribeError => "subscription error",
            Badness::PublisherWarning => "publisher warning",
            Badness::PublisherStopped => "publisher stopped",
            Badness::PublisherOffline => "publisher offline",
            Badness::RequestTimeout => "request timed out",
            Badness::RequestRejected => "request rejected",
            Badness::SymbolMatchWaiting => "matching symbol",
            Badness::SymbolNotFound => "symbol not found",
            Badness::OrdersWaiting => "waiting for orders",
            Badness::HoldingsWaiting => "waiting for holdings",
            Badness::BalancesWaiting => "waiting for balances",
            Badness::AccessDenied => "access denied",
            Badness::Internal => "internal error",
        }
    }

    pub fn is_usable(self) -> bool {
        self.correctness().is_usable()
    }

    pub fn is_good(self) -> bool {
        self.correctness().is_good()
    }
}

impl fmt::Display for Badness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_BADNESS: [Badness; 26] = [
        Badness::NotBad,
        Badness::Inactive,
        Badness::Delayed,
        Badness::Connecting,
        Badness::Reconnecting,
        Badness::ConnectionOffline,
        Badness::FeedWaiting,
        Badness::FeedSuspect,
        Badness::FeedError,
        Badness::FeedOffline,
        Badness::FeedNotAvailable,
        Badness::SubscribeWaiting,
        Badness::SubscribeWarning,
        Badness::SubscribeError,
        Badness::PublisherWarning,
        Badness::PublisherStopped,
        Badness::PublisherOffline,
        Badness::RequestTimeout,
        Badness::RequestRejected,
        Badness::SymbolMatchWaiting,
        Badness::SymbolNotFound,
        Badness::OrdersWaiting,
        Badness::HoldingsWaiting,
        Badness::BalancesWaiting,
        Badness::AccessDenied,
        Badness::Internal,
    ];

    #[test]
    fn test_level_order_is_good_to_error() {
        assert!(Correctness::Good < Correctness::Usable);
        assert!(Correctness::Usable < Correctness::Suspect);
        assert!(Correctness::Suspect < Correctness::Error);
    }

    #[test]
    fn test_merge_keeps_the_worst_level() {
        assert_eq!(
            Correctness::merge(Correctness::Good, Correctness::Suspect),
            Correctness::Suspect
        );
        assert_eq!(
            Correctness::merge(Correctness::Error, Correctness::Usable),
            Correctness::Error
        );
        assert_eq!(
            Correctness::merge3(Correctness::Usable, Correctness::Good, Correctness::Suspect),
            Correctness::Suspect
        );
    }

    #[test]
    fn test_merge_identity_and_commutativity() {
        let levels = [
            Correctness::Good,
            Correctness::Usable,
            Correctness::Suspect,
            Correctness::Error,
        ];
        for &a in &levels {
            assert_eq!(Correctness::merge(Correctness::Good, a), a);
            for &b in &levels {
                assert_eq!(Correctness::merge(a, b), Correctness::merge(b, a));
            }
        }
    }

    #[test]
    fn test_usability_boundary_sits_below_suspect() {
        assert!(Correctness::Good.is_usable());
        assert!(Correctness::Usable.is_usable());
        assert!(!Correctness::Suspect.is_usable());
        assert!(!Correctness::Error.is_usable());
        assert!(Correctness::Good.is_good());
        assert!(!Correctness::Usable.is_good());
    }

    #[test]
    fn test_only_not_bad_maps_to_good() {
        for reason in ALL_BADNESS {
            let level = reason.correctness();
            if reason == Badness::NotBad {
                assert_eq!(level, Correctness::Good);
            } else {
                assert_ne!(level, Correctness::Good, "{reason:?} must degrade the level");
            }
        }
    }

    #[test]
    fn test_every_reason_has_text() {
        for reason in ALL_BADNESS {
            assert!(!reason.reason_text().is_empty());
        }
    }
}

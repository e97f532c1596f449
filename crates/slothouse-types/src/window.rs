//! Time/window policy for auctions.
//!
//! Every time-gated decision in the engine is a pure function of an
//! [`AuctionWindow`] and the current instant:
//!
//! **PENDING → BIDDING → ENDED → FINALIZED** (or **CANCELED** from PENDING)
//!
//! The anti-snipe extension is the only place where the engine mutates a
//! deadline, and it only ever moves `end` later.

use std::{fmt, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuctionError, Result};

/// Lifecycle phase of an auction at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Created, before `start`. Deposits and whitelist edits are open.
    Pending,
    /// `start <= now < end`. Bids are accepted.
    Bidding,
    /// `now >= end`, not yet finalized.
    Ended,
    /// Winners fixed.
    Finalized,
    /// Canceled before start. Terminal.
    Canceled,
}

impl AuctionPhase {
    /// Evaluate the phase from the window and lifecycle flags.
    #[must_use]
    pub fn at(window: &AuctionWindow, now: DateTime<Utc>, canceled: bool, finalized: bool) -> Self {
        if canceled {
            Self::Canceled
        } else if finalized {
            Self::Finalized
        } else if now < window.start {
            Self::Pending
        } else if now < window.end {
            Self::Bidding
        } else {
            Self::Ended
        }
    }
}

impl fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Bidding => write!(f, "BIDDING"),
            Self::Ended => write!(f, "ENDED"),
            Self::Finalized => write!(f, "FINALIZED"),
            Self::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// How the deadline moves when a bid lands in the snipe zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtensionPolicy {
    /// `end += extension`.
    #[default]
    FromCurrentEnd,
    /// `end = max(end, now + extension)`.
    FromBidTime,
}

/// When item deposits close, fixed per auction at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepositPolicy {
    /// Deposits accepted only while `now < start`.
    #[default]
    BeforeStart,
    /// Legacy: deposits accepted while `now < end`.
    BeforeEnd,
}

impl DepositPolicy {
    #[must_use]
    pub fn accepts(self, window: &AuctionWindow, now: DateTime<Utc>) -> bool {
        match self {
            Self::BeforeStart => now < window.start,
            Self::BeforeEnd => now < window.end,
        }
    }
}

/// Start, end, and anti-snipe extension of an auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Length of the snipe zone, and of each extension.
    pub extension: Duration,
}

impl AuctionWindow {
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, extension: Duration) -> Self {
        Self {
            start,
            end,
            extension,
        }
    }

    /// Validate a window for a new auction created at `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if self.start < now {
            return Err(AuctionError::InvalidWindow {
                reason: format!("start {} is in the past (now {now})", self.start),
            });
        }
        if self.end <= self.start {
            return Err(AuctionError::InvalidWindow {
                reason: format!("end {} must be after start {}", self.end, self.start),
            });
        }
        if self.extension.is_zero() {
            return Err(AuctionError::InvalidWindow {
                reason: "extension window must be positive".into(),
            });
        }
        self.extension_delta()?;
        Ok(())
    }

    /// Extension as a signed chrono delta.
    pub fn extension_delta(&self) -> Result<TimeDelta> {
        TimeDelta::from_std(self.extension).map_err(|_| AuctionError::InvalidWindow {
            reason: format!("extension {:?} is out of range", self.extension),
        })
    }

    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start
    }

    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.end
    }

    /// Whether a bid at `now` falls in `[end - extension, ...)`.
    pub fn in_snipe_zone(&self, now: DateTime<Utc>) -> Result<bool> {
        let zone_start = self
            .end
            .checked_sub_signed(self.extension_delta()?)
            .ok_or(AuctionError::ArithmeticOverflow)?;
        Ok(now >= zone_start)
    }

    /// New deadline for a bid at `now`, or `None` when the bid is outside
    /// the snipe zone. The returned value is never earlier than `end`.
    pub fn extended_end(
        &self,
        now: DateTime<Utc>,
        policy: ExtensionPolicy,
    ) -> Result<Option<DateTime<Utc>>> {
        if !self.in_snipe_zone(now)? {
            return Ok(None);
        }
        let delta = self.extension_delta()?;
        let candidate = match policy {
            ExtensionPolicy::FromCurrentEnd => self.end.checked_add_signed(delta),
            ExtensionPolicy::FromBidTime => now.checked_add_signed(delta),
        }
        .ok_or(AuctionError::ArithmeticOverflow)?;
        Ok(Some(candidate.max(self.end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_800_000_000 + secs, 0).unwrap()
    }

    fn window() -> AuctionWindow {
        AuctionWindow::new(ts(100), ts(1_000), Duration::from_secs(60))
    }

    #[test]
    fn validate_accepts_well_formed_window() {
        assert!(window().validate(ts(0)).is_ok());
        assert!(window().validate(ts(100)).is_ok());
    }

    #[test]
    fn validate_rejects_past_start() {
        let err = window().validate(ts(101)).unwrap_err();
        assert!(matches!(err, AuctionError::InvalidWindow { .. }));
    }

    #[test]
    fn validate_rejects_end_not_after_start() {
        let w = AuctionWindow::new(ts(100), ts(100), Duration::from_secs(60));
        assert!(matches!(
            w.validate(ts(0)).unwrap_err(),
            AuctionError::InvalidWindow { .. }
        ));
    }

    #[test]
    fn validate_rejects_zero_extension() {
        let w = AuctionWindow::new(ts(100), ts(1_000), Duration::ZERO);
        assert!(matches!(
            w.validate(ts(0)).unwrap_err(),
            AuctionError::InvalidWindow { .. }
        ));
    }

    #[test]
    fn phase_progression() {
        let w = window();
        assert_eq!(AuctionPhase::at(&w, ts(0), false, false), AuctionPhase::Pending);
        assert_eq!(AuctionPhase::at(&w, ts(100), false, false), AuctionPhase::Bidding);
        assert_eq!(AuctionPhase::at(&w, ts(999), false, false), AuctionPhase::Bidding);
        assert_eq!(AuctionPhase::at(&w, ts(1_000), false, false), AuctionPhase::Ended);
        assert_eq!(AuctionPhase::at(&w, ts(2_000), false, true), AuctionPhase::Finalized);
        assert_eq!(AuctionPhase::at(&w, ts(0), true, false), AuctionPhase::Canceled);
    }

    #[test]
    fn phase_display() {
        assert_eq!(AuctionPhase::Bidding.to_string(), "BIDDING");
        assert_eq!(AuctionPhase::Canceled.to_string(), "CANCELED");
    }

    #[test]
    fn snipe_zone_boundary() {
        let w = window();
        assert!(!w.in_snipe_zone(ts(939)).unwrap());
        assert!(w.in_snipe_zone(ts(940)).unwrap());
        assert!(w.in_snipe_zone(ts(999)).unwrap());
    }

    #[test]
    fn early_bid_does_not_extend() {
        assert_eq!(
            window()
                .extended_end(ts(500), ExtensionPolicy::FromCurrentEnd)
                .unwrap(),
            None
        );
    }

    #[test]
    fn from_current_end_extends_by_exactly_extension() {
        let new_end = window()
            .extended_end(ts(941), ExtensionPolicy::FromCurrentEnd)
            .unwrap();
        assert_eq!(new_end, Some(ts(1_060)));
    }

    #[test]
    fn from_bid_time_extends_relative_to_now() {
        let new_end = window()
            .extended_end(ts(990), ExtensionPolicy::FromBidTime)
            .unwrap();
        assert_eq!(new_end, Some(ts(1_050)));
        // At the zone boundary the deadline stays where it is.
        let same = window()
            .extended_end(ts(940), ExtensionPolicy::FromBidTime)
            .unwrap();
        assert_eq!(same, Some(ts(1_000)));
    }

    #[test]
    fn deposit_policies() {
        let w = window();
        assert!(DepositPolicy::BeforeStart.accepts(&w, ts(99)));
        assert!(!DepositPolicy::BeforeStart.accepts(&w, ts(100)));
        assert!(DepositPolicy::BeforeEnd.accepts(&w, ts(500)));
        assert!(!DepositPolicy::BeforeEnd.accepts(&w, ts(1_000)));
    }

    #[test]
    fn window_serde_roundtrip() {
        let w = window();
        let json = serde_json::to_string(&w).unwrap();
        let back: AuctionWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}

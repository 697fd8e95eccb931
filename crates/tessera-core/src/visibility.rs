//! Effective visibility of a tile at a point in time.
//!
//! The same rules run in two places. At generation time only the manual
//! flag matters: it decides whether the tile is in the document at all.
//! In the browser the published runtime re-applies the schedule rules on
//! an interval, because a static page cannot be pushed updates.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tile::Tile;

/// Why a tile is not (fully) visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityReason {
    /// Shown to everyone.
    Visible,
    /// `visible == false`; never emitted.
    ManuallyHidden,
    /// Before `showFrom`.
    NotYet,
    /// After `showUntil`.
    Expired,
}

/// Result of [`effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityStatus {
    /// Excluded from the generated document.
    pub hidden_from_output: bool,
    /// Present in the document but hidden from viewers right now.
    pub hidden_from_viewer: bool,
    /// The rule that decided.
    pub reason: VisibilityReason,
}

impl VisibilityStatus {
    const VISIBLE: Self = Self {
        hidden_from_output: false,
        hidden_from_viewer: false,
        reason: VisibilityReason::Visible,
    };
}

/// Evaluate the visibility rules for `tile` at `now`, in priority order.
pub fn effective_status(tile: &Tile, now: DateTime<Utc>) -> VisibilityStatus {
    if tile.is_manually_hidden() {
        return VisibilityStatus {
            hidden_from_output: true,
            hidden_from_viewer: true,
            reason: VisibilityReason::ManuallyHidden,
        };
    }

    let Some(schedule) = tile.schedule() else {
        return VisibilityStatus::VISIBLE;
    };

    if schedule.show_from.is_some_and(|from| now < from) {
        return VisibilityStatus {
            hidden_from_output: false,
            hidden_from_viewer: true,
            reason: VisibilityReason::NotYet,
        };
    }

    if schedule.show_until.is_some_and(|until| now > until) {
        return VisibilityStatus {
            hidden_from_output: false,
            hidden_from_viewer: true,
            reason: VisibilityReason::Expired,
        };
    }

    VisibilityStatus::VISIBLE
}

/// Whether a tile belongs in the generated document.
///
/// Only the manual flag is consulted; schedule windows are resolved by the
/// client so the page reacts without being republished.
pub fn is_publishable(tile: &Tile) -> bool {
    !tile.is_manually_hidden()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{ColorScheme, TileData, TileSize, TileStyle, VisibilitySchedule};
    use chrono::{Duration, TimeZone};

    fn tile(visible: Option<bool>, schedule: Option<VisibilitySchedule>) -> Tile {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Tile {
            id: "tile_v".into(),
            tile_type: "text".into(),
            position: 0,
            size: TileSize::Medium,
            style: TileStyle::Card,
            color_scheme: ColorScheme::Default,
            data: TileData::new(),
            visible,
            visibility_schedule: schedule,
            created,
            updated: created,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn visible_without_schedule() {
        let status = effective_status(&tile(None, None), now());
        assert_eq!(status.reason, VisibilityReason::Visible);
        assert!(!status.hidden_from_output);
        assert!(!status.hidden_from_viewer);
    }

    #[test]
    fn manual_hide_wins_over_schedule() {
        let schedule = VisibilitySchedule {
            show_from: Some(now() - Duration::days(1)),
            show_until: Some(now() + Duration::days(1)),
        };
        let status = effective_status(&tile(Some(false), Some(schedule)), now());
        assert_eq!(status.reason, VisibilityReason::ManuallyHidden);
        assert!(status.hidden_from_output);
    }

    #[test]
    fn future_show_from_is_not_yet() {
        let schedule = VisibilitySchedule {
            show_from: Some(now() + Duration::hours(1)),
            show_until: None,
        };
        let status = effective_status(&tile(None, Some(schedule)), now());
        assert_eq!(status.reason, VisibilityReason::NotYet);
        assert!(!status.hidden_from_output);
        assert!(status.hidden_from_viewer);
    }

    #[test]
    fn past_show_until_is_expired() {
        let schedule = VisibilitySchedule {
            show_from: None,
            show_until: Some(now() - Duration::seconds(1)),
        };
        let status = effective_status(&tile(Some(true), Some(schedule)), now());
        assert_eq!(status.reason, VisibilityReason::Expired);
        assert!(!status.hidden_from_output);
        assert!(status.hidden_from_viewer);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let schedule = VisibilitySchedule {
            show_from: Some(now()),
            show_until: Some(now()),
        };
        let status = effective_status(&tile(None, Some(schedule)), now());
        assert_eq!(status.reason, VisibilityReason::Visible);
    }

    #[test]
    fn publishable_ignores_schedule() {
        let schedule = VisibilitySchedule {
            show_from: Some(now() + Duration::days(30)),
            show_until: None,
        };
        assert!(is_publishable(&tile(None, Some(schedule))));
        assert!(is_publishable(&tile(Some(true), None)));
        assert!(!is_publishable(&tile(Some(false), None)));
    }
}

use chrono::{DateTime, Utc};

use super::components::SaveSnapshot;
use super::needs::{
    CLEANLINESS_DECAY_INDOOR_PER_HOUR, CLEANLINESS_DECAY_OUTDOOR_PER_HOUR, HUNGER_DECAY_PER_HOUR,
};

/// Happiness lost per hour away, wherever the pet was left.
const HAPPINESS_DECAY_AWAY_PER_HOUR: f64 = 5.0;

/// What time-away catch-up did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileReport {
    pub hours_away: f64,
    /// Drop one poop somewhere once the renderer is ready.
    pub spawn_time_away_poop: bool,
    /// Poops were left on screen at exit, so cleanliness was zeroed.
    pub mess_left: bool,
}

impl ReconcileReport {
    fn nothing(hours_away: f64) -> Self {
        Self {
            hours_away,
            spawn_time_away_poop: false,
            mess_left: false,
        }
    }
}

/// Fast-forward needs decay over the gap between `snapshot.last_exit` and
/// `now`. A zero or negative gap (clock skew) leaves the snapshot untouched.
pub fn reconcile(
    snapshot: &mut SaveSnapshot,
    now: DateTime<Utc>,
    poop_threshold_hours: f64,
) -> ReconcileReport {
    let seconds = (now - snapshot.last_exit).num_milliseconds() as f64 / 1000.0;
    let hours_away = seconds / 3600.0;
    if hours_away <= 0.0 {
        log::info!("No time away to reconcile ({hours_away:.3}h)");
        return ReconcileReport::nothing(hours_away.max(0.0));
    }

    let cleanliness_rate = if snapshot.in_room {
        CLEANLINESS_DECAY_INDOOR_PER_HOUR
    } else {
        CLEANLINESS_DECAY_OUTDOOR_PER_HOUR
    };
    snapshot.needs.adjust(
        -HUNGER_DECAY_PER_HOUR * hours_away,
        -cleanliness_rate * hours_away,
        -HAPPINESS_DECAY_AWAY_PER_HOUR * hours_away,
    );

    let mess_left = !snapshot.poops.is_empty();
    if mess_left {
        snapshot.needs.cleanliness = 0.0;
    }

    let spawn_time_away_poop = hours_away >= poop_threshold_hours;
    log::info!(
        "Reconciled {:.2}h away: H:{:.1} C:{:.1} Hp:{:.1}{}{}",
        hours_away,
        snapshot.needs.hunger,
        snapshot.needs.cleanliness,
        snapshot.needs.happiness,
        if mess_left { " (mess left behind)" } else { "" },
        if spawn_time_away_poop { " (poop pending)" } else { "" },
    );

    ReconcileReport {
        hours_away,
        spawn_time_away_poop,
        mess_left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::components::ModeKind;
    use crate::sim::needs::Needs;
    use crate::sim::poop::Poop;
    use chrono::{Duration, TimeZone};
    use glam::Vec2;

    fn exit_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 8, 0, 0).unwrap()
    }

    fn snapshot(in_room: bool) -> SaveSnapshot {
        SaveSnapshot {
            position: Vec2::new(100.0, 100.0),
            mode: ModeKind::Idle,
            in_room,
            needs: Needs::default(),
            food_bowl_full: false,
            poops: Vec::new(),
            room_locked: false,
            last_exit: exit_time(),
        }
    }

    #[test]
    fn four_hours_outdoors() {
        let mut snap = snapshot(false);
        let report = reconcile(&mut snap, exit_time() + Duration::hours(4), 3.0);
        assert!((report.hours_away - 4.0).abs() < 1e-9);
        assert_eq!(snap.needs.hunger, 0.0);
        assert_eq!(snap.needs.cleanliness, 0.0);
        assert!((snap.needs.happiness - 80.0).abs() < 1e-9);
        assert!(report.spawn_time_away_poop);
        assert!(!report.mess_left);
    }

    #[test]
    fn indoor_cleanliness_barely_moves() {
        let mut snap = snapshot(true);
        let report = reconcile(&mut snap, exit_time() + Duration::hours(1), 3.0);
        assert!((snap.needs.hunger - 33.33).abs() < 1e-9);
        assert!((snap.needs.cleanliness - 99.667).abs() < 1e-9);
        assert!((snap.needs.happiness - 95.0).abs() < 1e-9);
        assert!(!report.spawn_time_away_poop);
    }

    #[test]
    fn negative_gap_is_noop() {
        let mut snap = snapshot(false);
        let before = snap.clone();
        let report = reconcile(&mut snap, exit_time() - Duration::minutes(5), 3.0);
        assert_eq!(snap, before);
        assert!(!report.spawn_time_away_poop);
        assert_eq!(report.hours_away, 0.0);
    }

    #[test]
    fn leftover_poop_zeroes_cleanliness() {
        let mut snap = snapshot(true);
        snap.poops.push(Poop {
            position: Vec2::new(10.0, 10.0),
            spawn_time: exit_time() - Duration::hours(1),
        });
        let report = reconcile(&mut snap, exit_time() + Duration::minutes(10), 3.0);
        assert!(report.mess_left);
        assert_eq!(snap.needs.cleanliness, 0.0);
    }

    #[test]
    fn debug_threshold_spawns_sooner() {
        let mut snap = snapshot(false);
        let report = reconcile(&mut snap, exit_time() + Duration::minutes(4), 180.0 / 3600.0);
        assert!(report.spawn_time_away_poop);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A one-off reminder the user scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReminder {
    pub message: String,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub has_been_displayed: bool,
}

/// Reminder bookkeeping carried in the save file. Showing them is up to
/// the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reminders {
    pub last_water_reminder: Option<DateTime<Utc>>,
    pub last_exercise_reminder: Option<DateTime<Utc>>,
    pub custom_reminders: Vec<CustomReminder>,
}

impl Reminders {
    pub fn schedule(&mut self, message: impl Into<String>, at: DateTime<Utc>) {
        self.custom_reminders.push(CustomReminder {
            message: message.into(),
            scheduled_time: at,
            has_been_displayed: false,
        });
    }

    /// Messages of reminders whose time has come, oldest first. Each one is
    /// marked displayed so it is returned only once.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut due: Vec<&mut CustomReminder> = self
            .custom_reminders
            .iter_mut()
            .filter(|r| !r.has_been_displayed && r.scheduled_time <= now)
            .collect();
        due.sort_by_key(|r| r.scheduled_time);
        due.into_iter()
            .map(|r| {
                r.has_been_displayed = true;
                log::info!("Reminder due: {}", r.message);
                r.message.clone()
            })
            .collect()
    }

    /// Drop reminders that have already been shown.
    pub fn prune_displayed(&mut self) -> usize {
        let before = self.custom_reminders.len();
        self.custom_reminders.retain(|r| !r.has_been_displayed);
        before - self.custom_reminders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn due_reminders_fire_once_in_order() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 15, 0, 0).unwrap();
        let mut reminders = Reminders::default();
        reminders.schedule("stretch", now - Duration::minutes(5));
        reminders.schedule("later", now + Duration::hours(1));
        reminders.schedule("water", now - Duration::minutes(30));

        assert_eq!(reminders.take_due(now), vec!["water", "stretch"]);
        assert!(reminders.take_due(now).is_empty());
        assert_eq!(reminders.take_due(now + Duration::hours(2)), vec!["later"]);
        assert_eq!(reminders.prune_displayed(), 3);
        assert!(reminders.custom_reminders.is_empty());
    }

    #[test]
    fn camel_case_keys() {
        let mut reminders = Reminders::default();
        reminders.schedule("hi", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let json = serde_json::to_string(&reminders).unwrap();
        assert!(json.contains("\"customReminders\""));
        assert!(json.contains("\"scheduledTime\""));
        assert!(json.contains("\"hasBeenDisplayed\":false"));
        assert!(json.contains("\"lastWaterReminder\":null"));
    }
}

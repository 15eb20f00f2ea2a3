//! Dashboard greeting copy, keyed off the local time of day.

use chrono::{DateTime, Datelike, Local, Timelike};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Greeting {
    pub text: &'static str,
    pub emoji: &'static str,
    pub period: DayPeriod,
}

pub fn greeting(now: DateTime<Local>) -> Greeting {
    match now.hour() {
        5..=11 => Greeting {
            text: "Good Morning",
            emoji: "🌅",
            period: DayPeriod::Morning,
        },
        12..=16 => Greeting {
            text: "Good Afternoon",
            emoji: "☀️",
            period: DayPeriod::Afternoon,
        },
        17..=20 => Greeting {
            text: "Good Evening",
            emoji: "🌆",
            period: DayPeriod::Evening,
        },
        _ => Greeting {
            text: "Good Night",
            emoji: "🌙",
            period: DayPeriod::Night,
        },
    }
}

/// Rotates by day of month so the message stays fixed for a whole day.
pub fn motivational_message(now: DateTime<Local>) -> &'static str {
    let messages: [&str; 3] = match greeting(now).period {
        DayPeriod::Morning => [
            "Let's make today productive! 💪",
            "A fresh start awaits you! ✨",
            "Ready to conquer your tasks? 🚀",
        ],
        DayPeriod::Afternoon => [
            "Keep up the great momentum! 🔥",
            "You're doing amazing! ⭐",
            "Stay focused, you got this! 💫",
        ],
        DayPeriod::Evening => [
            "Let's wrap up those tasks! 🎯",
            "Finish strong today! 💪",
            "Every task completed counts! ✅",
        ],
        DayPeriod::Night => [
            "Planning for tomorrow? 📝",
            "Rest well, achieve more! 🌟",
            "Great things await tomorrow! ✨",
        ],
    };
    messages[now.day() as usize % messages.len()]
}

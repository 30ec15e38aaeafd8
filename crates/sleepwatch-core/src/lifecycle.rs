//! Foreground/background lifecycle of the host application.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLifecycle {
    Active,
    Inactive,
    Background,
}

impl AppLifecycle {
    pub fn is_foreground(self) -> bool {
        self == AppLifecycle::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppLifecycle::Active => "active",
            AppLifecycle::Inactive => "inactive",
            AppLifecycle::Background => "background",
        }
    }
}

impl fmt::Display for AppLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppLifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AppLifecycle::Active),
            "inactive" => Ok(AppLifecycle::Inactive),
            "background" => Ok(AppLifecycle::Background),
            other => Err(format!("unknown lifecycle state: {other}")),
        }
    }
}

/// What a lifecycle change means to the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleTransition {
    /// Active -> Inactive | Background.
    Backgrounded,
    /// Inactive | Background -> Active.
    Foregrounded,
    /// Everything else, including repeats and Inactive <-> Background.
    Unchanged,
}

impl LifecycleTransition {
    pub fn between(previous: AppLifecycle, next: AppLifecycle) -> Self {
        use AppLifecycle::*;
        match (previous, next) {
            (Active, Inactive | Background) => LifecycleTransition::Backgrounded,
            (Inactive | Background, Active) => LifecycleTransition::Foregrounded,
            _ => LifecycleTransition::Unchanged,
        }
    }
}

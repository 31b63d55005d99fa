//! Scan outcome rewards.
//!
//! Maps a classification from the scan-result producer to the XP award,
//! the badges it unlocks and the companion line shown afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::RewardsConfig;
use crate::error::StoreError;

use super::state::User;

/// Well-known badge identifiers.
pub mod badges {
    pub const FIRST_SCAN: &str = "first-scan";
    pub const THREAT_SPOTTER: &str = "threat-spotter";

    pub fn streak(days: u32) -> String {
        format!("streak-{}", days)
    }

    pub fn level(level: u64) -> String {
        format!("level-{}", level)
    }
}

/// Classification produced by the QR decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanOutcome {
    Safe,
    Malicious,
}

impl ScanOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanOutcome::Safe => "safe",
            ScanOutcome::Malicious => "malicious",
        }
    }

    /// Companion line shown after the scan.
    pub fn companion_text(&self) -> &'static str {
        match self {
            ScanOutcome::Safe => {
                "Nice scan! That code looks safe. Still check the address before you open it."
            }
            ScanOutcome::Malicious => {
                "Watch out! That QR code points somewhere malicious. Never open links you don't trust."
            }
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanOutcome {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(ScanOutcome::Safe),
            "malicious" => Ok(ScanOutcome::Malicious),
            other => Err(StoreError::invalid_argument(format!(
                "unknown scan outcome '{}'",
                other
            ))),
        }
    }
}

impl RewardsConfig {
    /// XP granted for a scan with the given outcome.
    pub fn xp_for(&self, outcome: ScanOutcome) -> u32 {
        match outcome {
            ScanOutcome::Safe => self.safe_scan_xp,
            ScanOutcome::Malicious => self.threat_detected_xp,
        }
    }

    /// Every badge `user` qualifies for after a scan with `outcome`.
    ///
    /// Includes badges already held; awarding is idempotent.
    pub fn earned_badges(&self, user: &User, outcome: ScanOutcome) -> Vec<String> {
        let mut earned = vec![badges::FIRST_SCAN.to_string()];
        if outcome == ScanOutcome::Malicious {
            earned.push(badges::THREAT_SPOTTER.to_string());
        }
        earned.extend(
            self.streak_badges
                .iter()
                .filter(|&&days| user.streak() >= days)
                .map(|&days| badges::streak(days)),
        );
        earned.extend(
            self.level_badges
                .iter()
                .filter(|&&level| user.level() >= level)
                .map(|&level| badges::level(level)),
        );
        earned
    }
}

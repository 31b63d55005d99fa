use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub companion: CompanionConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// Report endpoint server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server (host:port).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Where submitted reports are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// JSON Lines file that receives one document per report.
    #[serde(default = "default_reports_path")]
    pub path: PathBuf,
}

/// XP awards and badge thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// XP for scanning a code classified as safe (default: 10).
    #[serde(default = "default_safe_scan_xp")]
    pub safe_scan_xp: u32,
    /// XP for correctly flagging a malicious code (default: 25).
    #[serde(default = "default_threat_detected_xp")]
    pub threat_detected_xp: u32,
    /// Streak lengths (days) that unlock a `streak-N` badge.
    #[serde(default = "default_streak_badges")]
    pub streak_badges: Vec<u32>,
    /// Levels that unlock a `level-N` badge.
    #[serde(default = "default_level_badges")]
    pub level_badges: Vec<u64>,
}

/// Companion message settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionConfig {
    /// Auto-dismiss delay for messages the store generates itself.
    #[serde(default = "default_message_duration_ms")]
    pub default_duration_ms: u64,
}

/// Navigation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Number of screen transitions kept for diagnostics (default: 50).
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_reports_path() -> PathBuf {
    let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data_dir.join("cyberqr").join("reports.jsonl")
}

fn default_safe_scan_xp() -> u32 {
    10
}

fn default_threat_detected_xp() -> u32 {
    25
}

fn default_streak_badges() -> Vec<u32> {
    vec![3, 7, 30]
}

fn default_level_badges() -> Vec<u64> {
    vec![5, 10]
}

fn default_message_duration_ms() -> u64 {
    4000
}

fn default_history_limit() -> usize {
    50
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            path: default_reports_path(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            safe_scan_xp: default_safe_scan_xp(),
            threat_detected_xp: default_threat_detected_xp(),
            streak_badges: default_streak_badges(),
            level_badges: default_level_badges(),
        }
    }
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_message_duration_ms(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

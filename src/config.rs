//! フロントエンドから受けとるセッション設定。
//! すべてのフィールドに既定値があり、欠けた項目は既定値で補完される。
use log::warn;
use serde::{Deserialize, Serialize};

use crate::roster::{DEFAULT_TEAM_NAMES, MAX_TEAMS};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// 初期チーム名。1〜4件。
    pub teams: Vec<String>,
    #[serde(flatten)]
    pub timings: Timings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            teams: DEFAULT_TEAM_NAMES.iter().map(|s| s.to_string()).collect(),
            timings: Timings::default(),
        }
    }
}

/// アニメーション側に渡す所要時間 (ミリ秒)。
/// 戦闘ロジック自身はこれらの時間を計測しない。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Timings {
    pub repair_delay_ms: u32,
    pub march_ms: u32,
    pub impact_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            repair_delay_ms: 1000,
            march_ms: 1500,
            impact_ms: 1200,
        }
    }
}

impl SessionConfig {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(s)?;
        config.validate();
        Ok(config)
    }

    /// 受けとった設定の妥当性を検証し、必要に応じて修正する。
    /// 修正可能な例外
    /// - チームが空 → 既定のチーム
    /// - チームが多すぎる → 先頭の4件
    ///
    /// 修正後も元の設定が有効だったかどうかを返す。
    pub fn validate(&mut self) -> bool {
        let mut valid = true;
        if self.teams.is_empty() {
            warn!("Config has no teams, using defaults");
            self.teams = Self::default().teams;
            valid = false;
        }
        if self.teams.len() > MAX_TEAMS {
            warn!(
                "Config has {} teams, keeping the first {}",
                self.teams.len(),
                MAX_TEAMS
            );
            self.teams.truncate(MAX_TEAMS);
            valid = false;
        }
        valid
    }
}

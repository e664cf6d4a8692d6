//! フロントエンドとゲームコア間のインターフェースを定義する。
//! このモジュールで定義される構造体は、シリアライズ/デシリアライズ可能でなければならない。
//! また、それらのメソッドは単なるゲッターに限定し、原則的にロジックを含めてはならない。
use serde::{Deserialize, Serialize};

pub use crate::battle::{
    Action, ActionOrder, AttackOrder, BattleState, CastleView, DamagedLevel, PhaseKind,
    RepairOrder, Resolution,
};
pub use crate::config::{SessionConfig, Timings};
pub use crate::roster::{HpChange, TeamColor, TeamId};

/// 描画用のチーム情報。
/// 選択状態のフラグは戦闘状態から導出される。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    pub id: TeamId,
    pub name: String,
    pub hp: u8,
    pub max_hp: u8,
    pub color: TeamColor,
    pub color_hex: String,
    pub damaged_level: DamagedLevel,
    pub castle: CastleView,
    pub is_attacker: bool,
    pub is_target: bool,
    /// 進軍アニメーションの標的になっている。
    pub is_under_attack: bool,
}

/// 画面全体の描画に必要な情報をまとめたもの。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub teams: Vec<TeamSnapshot>,
    pub battle: BattleState,
    pub can_add_team: bool,
    pub can_remove_team: bool,
}

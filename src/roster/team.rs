use serde::{Deserialize, Serialize};

use crate::battle::{CastleView, DamagedLevel};
use crate::roster::color::TeamColor;

/// 城の最大耐久値。
pub const MAX_HP: u8 = 8;

/// チームを識別する不透明なID。
/// ロスターが単調増加で発行し、セッション中に再利用されることはない。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TeamId(u32);

impl TeamId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// HP変化の前後を保持する。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HpChange {
    pub team_id: TeamId,
    pub before: u8,
    pub after: u8,
}

/// 城を持つ1チームを表す構造体。
/// HPは常に `0..=MAX_HP` に収まり、変更は `apply_delta` を通じてのみ行われる。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    id: TeamId,
    name: String,
    hp: u8,
    color: TeamColor,
}

impl Team {
    pub fn new(id: TeamId, name: String, color: TeamColor) -> Self {
        Self {
            id,
            name,
            hp: MAX_HP,
            color,
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn hp(&self) -> u8 {
        self.hp
    }
    pub fn color(&self) -> TeamColor {
        self.color
    }

    pub fn is_rubble(&self) -> bool {
        self.hp == 0
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// `delta` を加算し、`0..=MAX_HP` に丸める。
    pub fn apply_delta(&mut self, delta: i32) -> HpChange {
        let before = self.hp;
        let after = (i64::from(before) + i64::from(delta)).clamp(0, i64::from(MAX_HP));
        self.hp = after as u8;
        HpChange {
            team_id: self.id,
            before,
            after: self.hp,
        }
    }

    pub fn damaged_level(&self) -> DamagedLevel {
        DamagedLevel::from_hp(self.hp)
    }

    pub fn castle_view(&self) -> CastleView {
        CastleView::from_hp(self.hp)
    }
}

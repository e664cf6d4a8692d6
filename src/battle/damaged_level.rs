use serde::{Deserialize, Serialize};

use crate::roster::MAX_HP;

/// 城の損傷度を表す列挙型。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamagedLevel {
    NoDamage,
    Minor,
    Moderate,
    Heavy,
    Rubble,
}

impl DamagedLevel {
    pub fn from_hp(hp: u8) -> Self {
        match hp {
            0 => DamagedLevel::Rubble,
            1..=2 => DamagedLevel::Heavy,
            3..=4 => DamagedLevel::Moderate,
            h if h < MAX_HP => DamagedLevel::Minor,
            _ => DamagedLevel::NoDamage,
        }
    }
}

/// HPに応じて城のどの部分が残っているかを表す。
///
/// - 8, 7, 6, 5: 城壁の衛兵が 4 → 1 人
/// - 4: 衛兵全滅、天守は残る
/// - 3: 天守が崩れる
/// - 2: 右の塔が崩れる
/// - 1: 左の塔が崩れ、門だけが残る
/// - 0: 瓦礫
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CastleView {
    pub guards: u8,
    pub keep: bool,
    pub right_tower: bool,
    pub left_tower: bool,
    pub gate: bool,
    pub rubble: bool,
}

impl CastleView {
    /// 衛兵が立てる城壁の数。
    pub const GUARD_POSTS: u8 = 4;

    pub fn from_hp(hp: u8) -> Self {
        let hp = hp.min(MAX_HP);
        Self {
            guards: hp.saturating_sub(MAX_HP - Self::GUARD_POSTS),
            keep: hp >= 4,
            right_tower: hp >= 3,
            left_tower: hp >= 2,
            gate: hp >= 1,
            rubble: hp == 0,
        }
    }
}

use serde::{Deserialize, Serialize, Serializer};

use crate::roster::{TeamColor, TeamId};

/// ターン中に実行する行動。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    #[default]
    Idle,
    Attack,
    Repair,
}

impl Action {
    /// フロントエンドから受けとった文字列を解釈する。大文字小文字は区別しない。
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Some(Action::Idle),
            "ATTACK" => Some(Action::Attack),
            "REPAIR" => Some(Action::Repair),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::Idle => "IDLE",
            Action::Attack => "ATTACK",
            Action::Repair => "REPAIR",
        };
        write!(f, "{}", s)
    }
}

/// 行動開始時にアニメーション側へ渡す指示。
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionOrder {
    Attack(AttackOrder),
    Repair(RepairOrder),
}

impl ActionOrder {
    pub fn action(&self) -> Action {
        match self {
            ActionOrder::Attack(_) => Action::Attack,
            ActionOrder::Repair(_) => Action::Repair,
        }
    }
}

/// 進軍アニメーションの指示。
/// 行進 `march_ms` の後、門前で `impact_ms` 待ってから `attack_finished` を呼ぶこと。
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttackOrder {
    pub attacker_id: TeamId,
    pub target_id: TeamId,
    #[serde(serialize_with = "serialize_hex")]
    pub color: TeamColor,
    pub march_ms: u32,
    pub impact_ms: u32,
}

/// 修復タイマーの指示。`delay_ms` 後に `repair_elapsed` を呼ぶこと。
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepairOrder {
    pub team_id: TeamId,
    pub delay_ms: u32,
}

fn serialize_hex<S: Serializer>(color: &TeamColor, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(color.hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!(Action::parse("ATTACK"), Some(Action::Attack));
        assert_eq!(Action::parse(" repair "), Some(Action::Repair));
        assert_eq!(Action::parse("Idle"), Some(Action::Idle));
        assert_eq!(Action::parse("fireball"), None);
    }

    #[test]
    fn test_attack_order_json_shape() {
        let order = ActionOrder::Attack(AttackOrder {
            attacker_id: TeamId::new(1),
            target_id: TeamId::new(2),
            color: TeamColor::Red,
            march_ms: 1500,
            impact_ms: 1200,
        });
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["kind"], "ATTACK");
        assert_eq!(json["attackerId"], 1);
        assert_eq!(json["targetId"], 2);
        assert_eq!(json["color"], "#e74c3c");
        assert_eq!(json["marchMs"], 1500);
    }
}

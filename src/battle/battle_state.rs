use serde::{Deserialize, Serialize};

use crate::battle::Action;
use crate::roster::TeamId;

/// ターンの進行状態。
/// 各状態はその状態で有効なIDだけを持つため、
/// 「攻撃側なしの標的」や「攻撃側と同じ標的」は表現できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AttackerSelected {
        attacker: TeamId,
    },
    TargetSelected {
        attacker: TeamId,
        target: TeamId,
    },
    InFlight(InFlight),
}

/// 実行中の行動。解決シグナルが届くまで選択操作はすべて無視される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InFlight {
    Attack {
        attacker: TeamId,
        target: TeamId,
    },
    Repair {
        attacker: TeamId,
        target: Option<TeamId>,
    },
}

impl InFlight {
    pub fn action(&self) -> Action {
        match self {
            InFlight::Attack { .. } => Action::Attack,
            InFlight::Repair { .. } => Action::Repair,
        }
    }
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::AttackerSelected { .. } => PhaseKind::AttackerSelected,
            Phase::TargetSelected { .. } => PhaseKind::TargetSelected,
            Phase::InFlight(_) => PhaseKind::ActionInflight,
        }
    }

    pub fn attacker(&self) -> Option<TeamId> {
        match *self {
            Phase::Idle => None,
            Phase::AttackerSelected { attacker }
            | Phase::TargetSelected { attacker, .. }
            | Phase::InFlight(InFlight::Attack { attacker, .. })
            | Phase::InFlight(InFlight::Repair { attacker, .. }) => Some(attacker),
        }
    }

    pub fn target(&self) -> Option<TeamId> {
        match *self {
            Phase::Idle | Phase::AttackerSelected { .. } => None,
            Phase::TargetSelected { target, .. }
            | Phase::InFlight(InFlight::Attack { target, .. }) => Some(target),
            Phase::InFlight(InFlight::Repair { target, .. }) => target,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Phase::InFlight(in_flight) => in_flight.action(),
            _ => Action::Idle,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, Phase::InFlight(_))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseKind {
    Idle,
    AttackerSelected,
    TargetSelected,
    ActionInflight,
}

/// フロントエンドに渡す戦闘状態のスナップショット。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BattleState {
    pub attacker_id: Option<TeamId>,
    pub target_id: Option<TeamId>,
    pub action: Action,
    pub is_animating: bool,
    pub phase: PhaseKind,
}

impl From<&Phase> for BattleState {
    fn from(phase: &Phase) -> Self {
        Self {
            attacker_id: phase.attacker(),
            target_id: phase.target(),
            action: phase.action(),
            is_animating: phase.is_animating(),
            phase: phase.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_state_is_cleared() {
        let state = BattleState::from(&Phase::Idle);
        assert_eq!(state.attacker_id, None);
        assert_eq!(state.target_id, None);
        assert_eq!(state.action, Action::Idle);
        assert!(!state.is_animating);
    }

    #[test]
    fn test_in_flight_repair_keeps_target_for_display() {
        let phase = Phase::InFlight(InFlight::Repair {
            attacker: TeamId::new(1),
            target: Some(TeamId::new(2)),
        });
        let state = BattleState::from(&phase);
        assert_eq!(state.action, Action::Repair);
        assert!(state.is_animating);
        assert_eq!(state.target_id, Some(TeamId::new(2)));
        assert_eq!(state.phase, PhaseKind::ActionInflight);
    }

    #[test]
    fn test_snapshot_field_names() {
        let state = BattleState::from(&Phase::AttackerSelected {
            attacker: TeamId::new(3),
        });
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["attackerId"], 3);
        assert!(json["targetId"].is_null());
        assert_eq!(json["action"], "IDLE");
        assert_eq!(json["isAnimating"], false);
        assert_eq!(json["phase"], "ATTACKER_SELECTED");
    }
}

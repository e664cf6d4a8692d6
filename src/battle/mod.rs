mod action;
mod battle_state;
mod damaged_level;

pub use action::{Action, ActionOrder, AttackOrder, RepairOrder};
pub use battle_state::{BattleState, InFlight, Phase, PhaseKind};
pub use damaged_level::{CastleView, DamagedLevel};

use crate::config::Timings;
use crate::roster::{HpChange, Roster, TeamId};

use log::debug;
use serde::Serialize;

/// 行動の解決結果。
/// 対象が解決前に削除されていた場合、`change` は `None` になる。
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub action: Action,
    pub change: Option<HpChange>,
}

// ターンの進行を管理する構造体
#[derive(Debug, Clone)]
pub struct BattleController {
    phase: Phase,
    timings: Timings,
    logs: Vec<String>, // ターン中のイベントを貯めるバッファ
}

impl Default for BattleController {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}

impl BattleController {
    pub fn new(timings: Timings) -> Self {
        Self {
            phase: Phase::Idle,
            timings,
            logs: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn state(&self) -> BattleState {
        BattleState::from(&self.phase)
    }
    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }
    pub fn timings(&self) -> Timings {
        self.timings
    }

    // -- 選択 --

    /// チームへの選択ジェスチャを振り分ける。
    /// 攻撃側が未選択なら攻撃側に、選択済みなら別チームを標的にする。
    /// 攻撃側自身を再度選んでも何も起きない。
    pub fn select(&mut self, roster: &Roster, id: TeamId) -> bool {
        match self.phase.attacker() {
            None => self.select_attacker(roster, id),
            Some(attacker) if attacker == id => {
                debug!("Team {id} is already the attacker, ignored");
                false
            }
            Some(_) => self.select_target(roster, id),
        }
    }

    /// 攻撃側を選ぶ。選択済みの標的は解除される。
    pub fn select_attacker(&mut self, roster: &Roster, id: TeamId) -> bool {
        if self.is_animating() {
            debug!("select_attacker({id}) rejected: action in flight");
            return false;
        }
        if !roster.contains(id) {
            debug!("select_attacker({id}) rejected: no such team");
            return false;
        }
        self.phase = Phase::AttackerSelected { attacker: id };
        self.push_log(format!("Attacker: {}", Self::label(roster, id)));
        true
    }

    /// 標的を選ぶ。攻撃側が選択済みで、攻撃側と異なるチームでなければならない。
    pub fn select_target(&mut self, roster: &Roster, id: TeamId) -> bool {
        let attacker = match self.phase {
            Phase::AttackerSelected { attacker } | Phase::TargetSelected { attacker, .. } => {
                attacker
            }
            Phase::Idle => {
                debug!("select_target({id}) rejected: no attacker");
                return false;
            }
            Phase::InFlight(_) => {
                debug!("select_target({id}) rejected: action in flight");
                return false;
            }
        };
        if id == attacker {
            debug!("select_target({id}) rejected: same as attacker");
            return false;
        }
        if !roster.contains(id) {
            debug!("select_target({id}) rejected: no such team");
            return false;
        }
        self.phase = Phase::TargetSelected {
            attacker,
            target: id,
        };
        self.push_log(format!("Target: {}", Self::label(roster, id)));
        true
    }

    /// 行動を開始する。受理された場合はアニメーション側への指示を返す。
    /// `is_animating` はこの遷移の中で同期的に立つため、解決前の再要求はすべて拒否される。
    pub fn start_action(&mut self, roster: &Roster, action: Action) -> Option<ActionOrder> {
        if self.is_animating() {
            debug!("start_action({action}) rejected: action in flight");
            return None;
        }
        let (attacker, target) = match self.phase {
            Phase::AttackerSelected { attacker } => (attacker, None),
            Phase::TargetSelected { attacker, target } => (attacker, Some(target)),
            _ => {
                debug!("start_action({action}) rejected: no attacker");
                return None;
            }
        };
        let attacker_team = match roster.get(attacker) {
            Some(team) => team,
            None => {
                debug!("start_action({action}) rejected: attacker {attacker} is gone");
                return None;
            }
        };

        let order = match (action, target) {
            (Action::Repair, target) => {
                self.phase = Phase::InFlight(InFlight::Repair { attacker, target });
                ActionOrder::Repair(RepairOrder {
                    team_id: attacker,
                    delay_ms: self.timings.repair_delay_ms,
                })
            }
            (Action::Attack, Some(target)) => {
                self.phase = Phase::InFlight(InFlight::Attack { attacker, target });
                ActionOrder::Attack(AttackOrder {
                    attacker_id: attacker,
                    target_id: target,
                    color: attacker_team.color(),
                    march_ms: self.timings.march_ms,
                    impact_ms: self.timings.impact_ms,
                })
            }
            (Action::Attack, None) => {
                debug!("start_action(ATTACK) rejected: no target");
                return None;
            }
            (Action::Idle, _) => {
                debug!("start_action(IDLE) ignored");
                return None;
            }
        };
        self.push_log(format!("{action} started by {}", attacker_team.name()));
        Some(order)
    }

    // -- 解決 --

    /// 進軍アニメーション完了の通知。標的のHPを1減らしてIDLEに戻る。
    pub fn attack_finished(&mut self, roster: &mut Roster) -> Option<Resolution> {
        let target = match self.phase {
            Phase::InFlight(InFlight::Attack { target, .. }) => target,
            _ => {
                debug!("attack_finished ignored: no attack in flight");
                return None;
            }
        };
        Some(self.resolve(roster, Action::Attack, target, -1))
    }

    /// 修復タイマー経過の通知。攻撃側のHPを1回復してIDLEに戻る。
    pub fn repair_elapsed(&mut self, roster: &mut Roster) -> Option<Resolution> {
        let attacker = match self.phase {
            Phase::InFlight(InFlight::Repair { attacker, .. }) => attacker,
            _ => {
                debug!("repair_elapsed ignored: no repair in flight");
                return None;
            }
        };
        Some(self.resolve(roster, Action::Repair, attacker, 1))
    }

    fn resolve(&mut self, roster: &mut Roster, action: Action, id: TeamId, delta: i32) -> Resolution {
        let change = roster.apply_delta(id, delta);
        match change {
            Some(c) => self.push_log(format!(
                "{action} resolved on {} | hp {} -> {}",
                Self::label(roster, id),
                c.before,
                c.after
            )),
            None => self.push_log(format!("{action} resolved, but team {id} is gone")),
        }
        self.phase = Phase::Idle;
        self.flush_logs_debug();
        Resolution { action, change }
    }

    // -- 取消 --

    /// 選択を取り消してIDLEに戻る。行動の実行中は取り消せない。
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            Phase::InFlight(_) => {
                debug!("cancel rejected: action in flight");
                false
            }
            Phase::Idle => false,
            _ => {
                self.phase = Phase::Idle;
                self.push_log("Cancelled");
                self.flush_logs_debug();
                true
            }
        }
    }

    /// ロスターからチームが削除されたことを通知する。
    /// 選択中の参照は解除するが、実行中の行動はそのまま解決を待つ。
    pub fn on_team_removed(&mut self, id: TeamId) -> bool {
        let next = match self.phase {
            Phase::AttackerSelected { attacker } if attacker == id => Phase::Idle,
            Phase::TargetSelected { attacker, .. } if attacker == id => Phase::Idle,
            Phase::TargetSelected { attacker, target } if target == id => {
                Phase::AttackerSelected { attacker }
            }
            _ => return false,
        };
        self.phase = next;
        self.push_log(format!("Team {id} removed, selection cleared"));
        if self.phase == Phase::Idle {
            self.flush_logs_debug();
        }
        true
    }

    // -- ログ管理 --
    // バッファへイベント追加
    pub fn push_log<T: ToString>(&mut self, log: T) {
        self.logs.push(log.to_string());
    }

    // ログをまとめてdebug出力してバッファをクリア
    pub fn flush_logs_debug(&mut self) {
        if !self.logs.is_empty() {
            debug!("\n{}", self.logs.join("\n"));
            self.logs.clear();
        }
    }

    fn label(roster: &Roster, id: TeamId) -> String {
        roster
            .get(id)
            .map(|t| format!("{} {}", id, t.name()))
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::MAX_HP;

    fn setup() -> (Roster, BattleController, TeamId, TeamId, TeamId) {
        let roster = Roster::from_names(&["A".to_owned(), "B".to_owned(), "C".to_owned()]);
        let ids = roster.teams().iter().map(|t| t.id()).collect::<Vec<_>>();
        (roster, BattleController::default(), ids[0], ids[1], ids[2])
    }

    #[test]
    fn test_select_dispatch() {
        let (roster, mut ctl, a, b, c) = setup();
        assert!(ctl.select(&roster, a));
        assert_eq!(ctl.phase(), Phase::AttackerSelected { attacker: a });

        assert!(!ctl.select(&roster, a));
        assert_eq!(ctl.phase(), Phase::AttackerSelected { attacker: a });

        assert!(ctl.select(&roster, b));
        assert_eq!(ctl.phase(), Phase::TargetSelected { attacker: a, target: b });

        assert!(ctl.select(&roster, c));
        assert_eq!(ctl.phase(), Phase::TargetSelected { attacker: a, target: c });
    }

    #[test]
    fn test_select_unknown_team_is_noop() {
        let (roster, mut ctl, a, _, _) = setup();
        assert!(!ctl.select(&roster, TeamId::new(77)));
        assert_eq!(ctl.phase(), Phase::Idle);
        ctl.select(&roster, a);
        assert!(!ctl.select_target(&roster, TeamId::new(77)));
        assert_eq!(ctl.phase(), Phase::AttackerSelected { attacker: a });
    }

    #[test]
    fn test_select_target_requires_attacker() {
        let (roster, mut ctl, _, b, _) = setup();
        assert!(!ctl.select_target(&roster, b));
        assert_eq!(ctl.state().target_id, None);
    }

    #[test]
    fn test_select_attacker_resets_target() {
        let (roster, mut ctl, a, b, c) = setup();
        ctl.select(&roster, a);
        ctl.select(&roster, b);
        assert!(ctl.select_attacker(&roster, c));
        assert_eq!(ctl.phase(), Phase::AttackerSelected { attacker: c });
    }

    #[test]
    fn test_attack_requires_target() {
        let (roster, mut ctl, a, _, _) = setup();
        ctl.select(&roster, a);
        assert!(ctl.start_action(&roster, Action::Attack).is_none());
        assert!(!ctl.is_animating());
    }

    #[test]
    fn test_attack_resolves_on_finish_signal() {
        let (mut roster, mut ctl, a, b, _) = setup();
        ctl.select(&roster, a);
        ctl.select(&roster, b);
        let order = ctl.start_action(&roster, Action::Attack).unwrap();
        match order {
            ActionOrder::Attack(o) => {
                assert_eq!(o.attacker_id, a);
                assert_eq!(o.target_id, b);
                assert_eq!(o.color, roster.get(a).unwrap().color());
            }
            other => panic!("unexpected order {other:?}"),
        }
        assert!(ctl.is_animating());
        assert_eq!(ctl.state().action, Action::Attack);

        // 修復タイマーでは攻撃は解決しない
        assert!(ctl.repair_elapsed(&mut roster).is_none());
        assert!(ctl.is_animating());

        let resolution = ctl.attack_finished(&mut roster).unwrap();
        assert_eq!(resolution.change.unwrap().after, MAX_HP - 1);
        assert_eq!(roster.get(b).unwrap().hp(), MAX_HP - 1);
        assert_eq!(roster.get(a).unwrap().hp(), MAX_HP);
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn test_repair_with_target_selected() {
        let (mut roster, mut ctl, a, b, _) = setup();
        roster.apply_delta(a, -2);
        ctl.select(&roster, a);
        ctl.select(&roster, b);
        let order = ctl.start_action(&roster, Action::Repair).unwrap();
        assert_eq!(
            order,
            ActionOrder::Repair(RepairOrder {
                team_id: a,
                delay_ms: 1000
            })
        );
        assert!(ctl.attack_finished(&mut roster).is_none());
        ctl.repair_elapsed(&mut roster).unwrap();
        assert_eq!(roster.get(a).unwrap().hp(), MAX_HP - 1);
        assert_eq!(roster.get(b).unwrap().hp(), MAX_HP);
        assert_eq!(ctl.state(), BattleState::from(&Phase::Idle));
    }

    #[test]
    fn test_everything_locked_while_animating() {
        let (mut roster, mut ctl, a, b, c) = setup();
        ctl.select(&roster, a);
        ctl.select(&roster, b);
        ctl.start_action(&roster, Action::Attack).unwrap();
        let locked = ctl.phase();

        assert!(!ctl.select(&roster, c));
        assert!(!ctl.select_attacker(&roster, c));
        assert!(!ctl.select_target(&roster, c));
        assert!(ctl.start_action(&roster, Action::Attack).is_none());
        assert!(ctl.start_action(&roster, Action::Repair).is_none());
        assert!(!ctl.cancel());
        assert_eq!(ctl.phase(), locked);

        ctl.attack_finished(&mut roster).unwrap();
        assert!(ctl.attack_finished(&mut roster).is_none());
        assert_eq!(roster.get(b).unwrap().hp(), MAX_HP - 1);
    }

    #[test]
    fn test_start_idle_is_noop() {
        let (roster, mut ctl, a, _, _) = setup();
        ctl.select(&roster, a);
        assert!(ctl.start_action(&roster, Action::Idle).is_none());
        assert_eq!(ctl.phase(), Phase::AttackerSelected { attacker: a });
    }

    #[test]
    fn test_cancel_clears_selection() {
        let (roster, mut ctl, a, b, _) = setup();
        assert!(!ctl.cancel());
        ctl.select(&roster, a);
        ctl.select(&roster, b);
        assert!(ctl.cancel());
        let state = ctl.state();
        assert_eq!(state.attacker_id, None);
        assert_eq!(state.target_id, None);
        assert_eq!(state.action, Action::Idle);
    }

    #[test]
    fn test_removed_team_clears_references() {
        let (roster, mut ctl, a, b, _) = setup();
        ctl.select(&roster, a);
        ctl.select(&roster, b);
        assert!(ctl.on_team_removed(b));
        assert_eq!(ctl.phase(), Phase::AttackerSelected { attacker: a });
        assert!(ctl.on_team_removed(a));
        assert_eq!(ctl.phase(), Phase::Idle);
        assert!(!ctl.on_team_removed(a));
    }

    #[test]
    fn test_removed_target_during_attack_resolves_gracefully() {
        let (mut roster, mut ctl, a, b, _) = setup();
        ctl.select(&roster, a);
        ctl.select(&roster, b);
        ctl.start_action(&roster, Action::Attack).unwrap();
        roster.remove_team(b);
        assert!(!ctl.on_team_removed(b));
        assert!(ctl.is_animating());

        let resolution = ctl.attack_finished(&mut roster).unwrap();
        assert_eq!(resolution.change, None);
        assert_eq!(ctl.phase(), Phase::Idle);
    }
}

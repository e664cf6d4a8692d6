//! 1画面分のゲームセッション。
//! ロスターと戦闘コントローラを所有し、両者にまたがる操作はすべてここを経由する。
use log::{debug, info};

use crate::battle::{Action, ActionOrder, BattleController, BattleState, Resolution};
use crate::config::SessionConfig;
use crate::interface::{SessionView, TeamSnapshot};
use crate::roster::{Roster, Team, TeamId, MAX_HP};

#[derive(Debug, Clone)]
pub struct Session {
    roster: Roster,
    controller: BattleController,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(mut config: SessionConfig) -> Self {
        config.validate();
        let roster = Roster::from_names(&config.teams);
        info!("Session started with {}", roster);
        Self {
            roster,
            controller: BattleController::new(config.timings),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn controller(&self) -> &BattleController {
        &self.controller
    }

    // -- ロスター操作 --

    pub fn add_team(&mut self) -> Option<TeamId> {
        let id = self.roster.add_team()?;
        debug!("Team {id} added: {}", self.roster);
        Some(id)
    }

    /// チームを削除し、戦闘状態に残った参照を解除する。
    pub fn remove_team(&mut self, id: TeamId) -> bool {
        if !self.roster.remove_team(id) {
            return false;
        }
        self.controller.on_team_removed(id);
        debug!("Team {id} removed: {}", self.roster);
        true
    }

    pub fn rename_team(&mut self, id: TeamId, name: String) -> bool {
        self.roster.rename_team(id, name)
    }

    // -- 戦闘操作 --

    pub fn select(&mut self, id: TeamId) -> bool {
        self.controller.select(&self.roster, id)
    }
    pub fn select_attacker(&mut self, id: TeamId) -> bool {
        self.controller.select_attacker(&self.roster, id)
    }
    pub fn select_target(&mut self, id: TeamId) -> bool {
        self.controller.select_target(&self.roster, id)
    }
    pub fn start_action(&mut self, action: Action) -> Option<ActionOrder> {
        self.controller.start_action(&self.roster, action)
    }
    pub fn attack_finished(&mut self) -> Option<Resolution> {
        self.controller.attack_finished(&mut self.roster)
    }
    pub fn repair_elapsed(&mut self) -> Option<Resolution> {
        self.controller.repair_elapsed(&mut self.roster)
    }
    pub fn cancel(&mut self) -> bool {
        self.controller.cancel()
    }

    // -- スナップショット --

    pub fn battle_state(&self) -> BattleState {
        self.controller.state()
    }

    pub fn teams(&self) -> Vec<TeamSnapshot> {
        let state = self.battle_state();
        self.roster
            .teams()
            .iter()
            .map(|team| Self::snapshot(team, &state))
            .collect()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            teams: self.teams(),
            battle: self.battle_state(),
            can_add_team: !self.roster.is_full(),
            can_remove_team: self.roster.can_remove(),
        }
    }

    fn snapshot(team: &Team, state: &BattleState) -> TeamSnapshot {
        let is_target = state.target_id == Some(team.id());
        TeamSnapshot {
            id: team.id(),
            name: team.name().to_owned(),
            hp: team.hp(),
            max_hp: MAX_HP,
            color: team.color(),
            color_hex: team.color().hex().to_owned(),
            damaged_level: team.damaged_level(),
            castle: team.castle_view(),
            is_attacker: state.attacker_id == Some(team.id()),
            is_target,
            is_under_attack: is_target && state.is_animating && state.action == Action::Attack,
        }
    }
}

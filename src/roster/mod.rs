//! 対戦に参加するチームの一覧 (ロスター) を管理する。
//! チーム数は常に `1..=MAX_TEAMS` に保たれ、範囲外になる操作は何もせずに無視される。
use itertools::Itertools;
use log::{debug, warn};

mod color;
pub use color::TeamColor;

mod team;
pub use team::{HpChange, Team, TeamId, MAX_HP};

/// 同時に存在できるチーム数の上限。
pub const MAX_TEAMS: usize = 4;

/// 初期ロスターのチーム名。
pub const DEFAULT_TEAM_NAMES: [&str; MAX_TEAMS] =
    ["Team Red", "Team Blue", "Team Green", "Team Yellow"];

#[derive(Debug, Clone)]
pub struct Roster {
    teams: Vec<Team>,
    next_id: u32,
    // パレットの各色が一度でも発行されたか
    issued: [bool; MAX_TEAMS],
}

impl Default for Roster {
    fn default() -> Self {
        Self::from_names(&DEFAULT_TEAM_NAMES.map(String::from))
    }
}

impl Roster {
    /// 与えられた名前で初期ロスターを作成する。
    /// 修正可能な例外
    /// - 名前が `MAX_TEAMS` を超える → 超過分を捨てる
    /// - 名前が空 → 既定のロスターを使う
    pub fn from_names(names: &[String]) -> Self {
        if names.is_empty() {
            warn!("No initial teams given, using the default roster");
            return Self::default();
        }
        if names.len() > MAX_TEAMS {
            warn!(
                "Too many initial teams ({}), ignoring: {:?}",
                names.len(),
                &names[MAX_TEAMS..]
            );
        }

        let mut roster = Self {
            teams: Vec::with_capacity(MAX_TEAMS),
            next_id: 1,
            issued: [false; MAX_TEAMS],
        };
        for name in names.iter().take(MAX_TEAMS) {
            roster.push_team(name.clone());
        }
        roster
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }
    pub fn len(&self) -> usize {
        self.teams.len()
    }
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.teams.len() >= MAX_TEAMS
    }
    pub fn can_remove(&self) -> bool {
        self.teams.len() > 1
    }

    /// IDでチームを検索する。削除済みのIDは単に見つからない。
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id() == id)
    }
    pub fn contains(&self, id: TeamId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id() == id)
    }

    /// 新しいチームを末尾に追加する。上限に達している場合は何もしない。
    pub fn add_team(&mut self) -> Option<TeamId> {
        if self.is_full() {
            debug!("Roster is full, add_team ignored");
            return None;
        }
        let name = format!("Team {}", self.teams.len() + 1);
        Some(self.push_team(name))
    }

    /// チームを削除する。最後の1チームは削除できない。
    pub fn remove_team(&mut self, id: TeamId) -> bool {
        if !self.can_remove() {
            debug!("Cannot remove the last team {id}");
            return false;
        }
        let before = self.teams.len();
        self.teams.retain(|t| t.id() != id);
        let removed = self.teams.len() < before;
        if !removed {
            debug!("remove_team: {id} not found");
        }
        removed
    }

    pub fn rename_team(&mut self, id: TeamId, name: String) -> bool {
        match self.get_mut(id) {
            Some(team) => {
                team.rename(name);
                true
            }
            None => {
                debug!("rename_team: {id} not found");
                false
            }
        }
    }

    /// HPに `delta` を加算する。結果は `0..=MAX_HP` に丸められる。
    pub fn apply_delta(&mut self, id: TeamId, delta: i32) -> Option<HpChange> {
        let change = self.get_mut(id).map(|team| team.apply_delta(delta));
        if change.is_none() {
            debug!("apply_delta: {id} not found");
        }
        change
    }

    fn push_team(&mut self, name: String) -> TeamId {
        let id = TeamId::new(self.next_id);
        self.next_id += 1;
        let color = self.next_color();
        self.issued[color.index()] = true;
        self.teams.push(Team::new(id, name, color));
        id
    }

    // 未発行の色を優先し、使い切った後は生存チームが使っていない色を選ぶ
    fn next_color(&self) -> TeamColor {
        let in_use = |c: &TeamColor| self.teams.iter().any(|t| t.color() == *c);
        TeamColor::PALETTE
            .iter()
            .copied()
            .find(|c| !self.issued[c.index()])
            .or_else(|| TeamColor::PALETTE.iter().copied().find(|c| !in_use(c)))
            .unwrap_or(TeamColor::PALETTE[self.teams.len() % MAX_TEAMS])
    }
}

impl std::fmt::Display for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .teams
            .iter()
            .map(|t| format!("{} {} ({}) hp={}", t.id(), t.name(), t.color(), t.hp()))
            .join(", ");
        write!(f, "[{}]", s)
    }
}

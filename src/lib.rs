use log::{error, info, warn};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod battle;
pub mod config;
pub mod interface;
pub mod roster;
pub mod session;
mod utils;

pub use crate::battle::{Action, BattleController};
pub use crate::config::SessionConfig;
pub use crate::roster::{Roster, Team, TeamId, MAX_HP, MAX_TEAMS};
pub use crate::session::Session;

static INIT: std::sync::Once = std::sync::Once::new();

fn initialize() {
    INIT.call_once(|| {
        utils::set_panic_hook();
        wasm_logger::init(wasm_logger::Config::default()); // ロガー初期化
        info!("Logger initialized");
    });
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(v) => v,
        Err(err) => {
            error!("Failed to serialize value: {:?}", err);
            JsValue::NULL
        }
    }
}

/// フロントエンドから操作される1セッション分のゲーム。
/// 描画とアニメーションはすべてフロントエンド側の責務で、
/// こちらは状態遷移とHPの変化だけを扱う。
#[wasm_bindgen]
pub struct Game {
    session: Session,
}

#[wasm_bindgen]
impl Game {
    /// `config` は `SessionConfig` 相当のオブジェクト。`undefined` / `null` なら既定値。
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Game {
        initialize();

        let config = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            match serde_wasm_bindgen::from_value::<SessionConfig>(config) {
                Ok(c) => c,
                Err(err) => {
                    error!("Failed to parse session config: {:?}", err);
                    SessionConfig::default()
                }
            }
        };

        Game {
            session: Session::new(config),
        }
    }

    // -- ロスター --

    /// 追加したチームのIDを返す。上限に達していれば `undefined`。
    #[wasm_bindgen(js_name = addTeam)]
    pub fn add_team(&mut self) -> Option<u32> {
        self.session.add_team().map(|id| id.raw())
    }

    #[wasm_bindgen(js_name = removeTeam)]
    pub fn remove_team(&mut self, id: u32) -> bool {
        self.session.remove_team(TeamId::new(id))
    }

    #[wasm_bindgen(js_name = renameTeam)]
    pub fn rename_team(&mut self, id: u32, name: String) -> bool {
        self.session.rename_team(TeamId::new(id), name)
    }

    // -- 戦闘 --

    /// 城をクリックしたときのジェスチャ。攻撃側・標的の選択に振り分けられる。
    pub fn select(&mut self, id: u32) -> bool {
        self.session.select(TeamId::new(id))
    }

    #[wasm_bindgen(js_name = selectAttacker)]
    pub fn select_attacker(&mut self, id: u32) -> bool {
        self.session.select_attacker(TeamId::new(id))
    }

    #[wasm_bindgen(js_name = selectTarget)]
    pub fn select_target(&mut self, id: u32) -> bool {
        self.session.select_target(TeamId::new(id))
    }

    /// `"ATTACK"` / `"REPAIR"` を開始する。受理されればアニメーション指示、されなければ `null`。
    #[wasm_bindgen(js_name = startAction)]
    pub fn start_action(&mut self, action: &str) -> JsValue {
        let Some(action) = Action::parse(action) else {
            warn!("Unknown action: {:?}", action);
            return JsValue::NULL;
        };
        match self.session.start_action(action) {
            Some(order) => to_js(&order),
            None => JsValue::NULL,
        }
    }

    /// 進軍アニメーションの完了通知。解決結果か `null` を返す。
    #[wasm_bindgen(js_name = attackFinished)]
    pub fn attack_finished(&mut self) -> JsValue {
        match self.session.attack_finished() {
            Some(resolution) => to_js(&resolution),
            None => JsValue::NULL,
        }
    }

    /// 修復タイマーの経過通知。解決結果か `null` を返す。
    #[wasm_bindgen(js_name = repairElapsed)]
    pub fn repair_elapsed(&mut self) -> JsValue {
        match self.session.repair_elapsed() {
            Some(resolution) => to_js(&resolution),
            None => JsValue::NULL,
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.session.cancel()
    }

    // -- スナップショット --

    pub fn teams(&self) -> JsValue {
        to_js(&self.session.teams())
    }

    #[wasm_bindgen(js_name = battleState)]
    pub fn battle_state(&self) -> JsValue {
        to_js(&self.session.battle_state())
    }

    pub fn view(&self) -> JsValue {
        to_js(&self.session.view())
    }
}

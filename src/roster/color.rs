use serde::{Deserialize, Serialize};

/// チームカラーを表す列挙型。
/// パレットは4色固定で、チーム作成時にこの順番で割り当てられる。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TeamColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl TeamColor {
    /// 割り当て順に並んだパレット。
    pub const PALETTE: [TeamColor; 4] = [
        TeamColor::Red,
        TeamColor::Blue,
        TeamColor::Green,
        TeamColor::Yellow,
    ];

    /// 描画用のカラーコードを取得する。
    pub fn hex(&self) -> &'static str {
        match self {
            TeamColor::Red => "#e74c3c",
            TeamColor::Blue => "#3498db",
            TeamColor::Green => "#2ecc71",
            TeamColor::Yellow => "#f1c40f",
        }
    }

    /// パレット内の位置を取得する。
    pub fn index(&self) -> usize {
        match self {
            TeamColor::Red => 0,
            TeamColor::Blue => 1,
            TeamColor::Green => 2,
            TeamColor::Yellow => 3,
        }
    }
}

impl std::fmt::Display for TeamColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TeamColor::Red => "Red",
            TeamColor::Blue => "Blue",
            TeamColor::Green => "Green",
            TeamColor::Yellow => "Yellow",
        };
        write!(f, "{}", s)
    }
}

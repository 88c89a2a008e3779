use serde::{Deserialize, Serialize};

/// Player-visible value of a single cell.
///
/// `Mine` only ever appears after a mine has been hit, when the whole layout
/// is exposed.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum DotValue {
    Unexplored,
    Flag,
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Mine,
}

impl DotValue {
    /// Value of a revealed safe cell with `adjacent` neighbouring mines.
    pub fn from_adjacent(adjacent: u8) -> Option<Self> {
        Some(match adjacent {
            0 => Self::Zero,
            1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            4 => Self::Four,
            5 => Self::Five,
            6 => Self::Six,
            7 => Self::Seven,
            8 => Self::Eight,
            _ => return None,
        })
    }

    pub fn adjacent(self) -> Option<u8> {
        Some(match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Unexplored | Self::Flag | Self::Mine => return None,
        })
    }

    pub fn is_revealed(self) -> bool {
        self.adjacent().is_some()
    }
}

/// Snapshot of the board, indexed `dots[y][x]`.
pub type Dots = Vec<Vec<DotValue>>;

/// Outcome of a single reveal.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SweptValue {
    Safe,
    Bomb,
    Stay,
    Clear,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusValue {
    #[default]
    Init,
    Playing,
    Bomb,
    Clear,
}

impl StatusValue {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Bomb | Self::Clear)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Low,
    Middle,
    High,
}

/// Board size presets offered by the menu.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BoardSize {
    Small,
    Middle,
    Large,
}

impl BoardSize {
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Self::Small => (5, 5),
            Self::Middle => (10, 10),
            Self::Large => (20, 20),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

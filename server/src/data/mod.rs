#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub mine: bool,
    /// Only meaningful once mines are placed and `mine` is false.
    pub adjacent: u8,
    pub visibility: Visibility,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            mine: false,
            adjacent: 0,
            visibility: Visibility::Hidden,
        }
    }
}

/// How mines get chosen when the first reveal arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MineLayout {
    Random { mines: usize },
    /// Requested cell indices; any inside the safe zone are relocated.
    Fixed(Vec<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub width: usize,
    pub height: usize,
    pub layout: MineLayout,
    pub mines: usize,
    pub placed: bool,
    pub cells: Vec<Cell>,
}

use std::collections::BTreeSet;

use minesweeper_common::models::{Density, DotValue, Dots, Pos, StatusValue, SweptValue};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index::sample};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{Rules, SafeZone},
    data::{Cell, Field, MineLayout, Visibility},
    error::{EngineError, Result},
};

/// Picks `amount` distinct entries of `candidates`, or all of them if fewer exist.
fn sample_cells<R: Rng + ?Sized>(rng: &mut R, candidates: &[usize], amount: usize) -> Vec<usize> {
    let amount = amount.min(candidates.len());
    sample(rng, candidates.len(), amount)
        .into_iter()
        .map(|i| candidates[i])
        .collect()
}

impl From<&Cell> for DotValue {
    fn from(value: &Cell) -> Self {
        match value.visibility {
            Visibility::Hidden => Self::Unexplored,
            Visibility::Flagged => Self::Flag,
            Visibility::Revealed if value.mine => Self::Mine,
            Visibility::Revealed => {
                DotValue::from_adjacent(value.adjacent).unwrap_or(Self::Unexplored)
            }
        }
    }
}

impl Field {
    fn new(width: usize, height: usize, layout: MineLayout) -> Self {
        let mines = match &layout {
            MineLayout::Random { mines } => *mines,
            MineLayout::Fixed(requested) => requested.len(),
        };
        Self {
            width,
            height,
            layout,
            mines,
            placed: false,
            cells: vec![Cell::default(); width * height],
        }
    }

    fn index_of(&self, pos: Pos) -> Result<usize> {
        if pos.x < self.width && pos.y < self.height {
            Ok(pos.x + pos.y * self.width)
        } else {
            Err(EngineError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Indices of the up to 8 cells surrounding `index`.
    fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + use<> {
        let (width, height) = (self.width as i64, self.height as i64);
        let (x, y) = ((index as i64) % width, (index as i64) / width);

        (-1..=1_i64)
            .flat_map(|dy| (-1..=1_i64).map(move |dx| (dx, dy)))
            .filter(|&delta| delta != (0, 0))
            .filter_map(move |(dx, dy)| {
                let (nx, ny) = (x + dx, y + dy);
                (0 <= nx && nx < width && 0 <= ny && ny < height)
                    .then(|| (nx + ny * width) as usize)
            })
    }

    fn place_mines<R: Rng + ?Sized>(&mut self, first: usize, zone: SafeZone, rng: &mut R) {
        let total = self.cells.len();
        let mut excluded = BTreeSet::from([first]);
        if zone == SafeZone::Neighborhood {
            excluded.extend(self.neighbors(first));
            if total - excluded.len() < self.mines {
                warn!(
                    "Cannot keep the neighbourhood of cell {} clear of {} mines, protecting the cell only",
                    first, self.mines
                );
                excluded = BTreeSet::from([first]);
            }
        }

        let mines = match &self.layout {
            MineLayout::Random { mines } => {
                let candidates: Vec<usize> =
                    (0..total).filter(|i| !excluded.contains(i)).collect();
                sample_cells(rng, &candidates, *mines)
            }
            MineLayout::Fixed(requested) => {
                let mut kept: Vec<usize> = requested
                    .iter()
                    .copied()
                    .filter(|i| !excluded.contains(i))
                    .collect();
                let relocating = requested.len() - kept.len();
                if relocating > 0 {
                    debug!("Relocating {} mines out of the safe zone", relocating);
                    let candidates: Vec<usize> = (0..total)
                        .filter(|i| !excluded.contains(i) && !requested.contains(i))
                        .collect();
                    kept.extend(sample_cells(rng, &candidates, relocating));
                }
                kept
            }
        };

        for &index in &mines {
            self.cells[index].mine = true;
        }
        for index in 0..total {
            let adjacent = self.neighbors(index).filter(|&n| self.cells[n].mine).count();
            self.cells[index].adjacent = adjacent as u8;
        }

        if mines.len() != self.mines {
            warn!(
                "Placed {} mines, requested {}",
                mines.len(),
                self.mines
            );
        }
        self.mines = mines.len();
        self.placed = true;
    }

    /// Reveals `start` and expands across zero cells. Returns how many cells opened.
    fn flood_reveal(&mut self, start: usize) -> usize {
        let mut pending = vec![start];
        let mut revealed = 0;

        while let Some(index) = pending.pop() {
            let cell = &mut self.cells[index];
            if cell.visibility != Visibility::Hidden || cell.mine {
                continue;
            }
            cell.visibility = Visibility::Revealed;
            revealed += 1;

            if cell.adjacent == 0 {
                pending.extend(
                    self.neighbors(index)
                        .filter(|&n| self.cells[n].visibility == Visibility::Hidden),
                );
            }
        }

        revealed
    }

    fn reveal_mines(&mut self) -> usize {
        let mut count = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.mine) {
            cell.visibility = Visibility::Revealed;
            count += 1;
        }
        count
    }

    fn is_cleared(&self) -> bool {
        let safe = self.cells.iter().filter(|cell| !cell.mine);
        let revealed = safe
            .clone()
            .filter(|cell| cell.visibility == Visibility::Revealed)
            .count();
        revealed == safe.count()
    }

    fn flags(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.visibility == Visibility::Flagged)
            .count()
    }

    fn show(&self) -> Dots {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(DotValue::from).collect())
            .collect()
    }
}

/// A single minesweeper game: grid, deferred mine layout and status.
pub struct Engine {
    rules: Rules,
    field: Option<Field>,
    status: StatusValue,
    rng: StdRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Engine {
    pub fn new(rules: Rules) -> Self {
        Self::with_rng(rules, StdRng::from_os_rng())
    }

    /// Engine whose mine placement is reproducible.
    pub fn with_seed(rules: Rules, seed: u64) -> Self {
        Self::with_rng(rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rules: Rules, rng: StdRng) -> Self {
        Self {
            rules,
            field: None,
            status: StatusValue::Init,
            rng,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn status(&self) -> StatusValue {
        self.status
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.field.as_ref().map(|field| (field.width, field.height))
    }

    pub fn mine_count(&self) -> Option<usize> {
        self.field.as_ref().map(|field| field.mines)
    }

    pub fn flags_placed(&self) -> usize {
        self.field.as_ref().map_or(0, Field::flags)
    }

    /// Mines minus flags; negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        self.mine_count().unwrap_or(0) as isize - self.flags_placed() as isize
    }

    pub fn dots(&self) -> Result<Dots> {
        self.field
            .as_ref()
            .map(Field::show)
            .ok_or(EngineError::InvalidState)
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if self.rules.accepts(width, height) {
            Ok(())
        } else {
            warn!("Rejected board size {}x{}", width, height);
            Err(EngineError::InvalidDimension {
                width,
                height,
                min: self.rules.min_size,
                max: self.rules.max_size,
            })
        }
    }

    fn install(&mut self, field: Field) -> Dots {
        let dots = field.show();
        self.field = Some(field);
        self.status = StatusValue::Init;
        dots
    }

    /// Starts a new board. Mines are placed on the first reveal.
    #[instrument(level = "trace", skip(self))]
    pub fn configure(&mut self, width: usize, height: usize, density: Density) -> Result<Dots> {
        self.validate_dimensions(width, height)?;
        let mines = self.rules.mine_count(width, height, density);
        info!(
            "Configuring {}x{} board with {} mines ({:?})",
            width, height, mines, density
        );
        Ok(self.install(Field::new(width, height, MineLayout::Random { mines })))
    }

    /// Starts a new board with a requested mine layout. Requested mines that
    /// land in the first reveal's safe zone are moved elsewhere.
    #[instrument(level = "trace", skip(self, mines))]
    pub fn configure_with_mines(&mut self, width: usize, height: usize, mines: &[Pos]) -> Result<Dots> {
        self.validate_dimensions(width, height)?;
        let probe = Field::new(width, height, MineLayout::Random { mines: 0 });
        let requested: BTreeSet<usize> = mines
            .iter()
            .map(|&pos| probe.index_of(pos))
            .collect::<Result<_>>()?;
        let requested: Vec<usize> = requested
            .into_iter()
            .take((width * height).saturating_sub(1))
            .collect();
        info!(
            "Configuring {}x{} board with {} requested mines",
            width,
            height,
            requested.len()
        );
        Ok(self.install(Field::new(width, height, MineLayout::Fixed(requested))))
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.field.is_none() {
            warn!("Move rejected, no board configured");
            return Err(EngineError::InvalidState);
        }
        if self.status.is_terminal() {
            debug!("Move rejected, game already ended as {:?}", self.status);
            return Err(EngineError::GameOver);
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn sweep(&mut self, pos: Pos) -> Result<(SweptValue, Dots)> {
        self.ensure_mutable()?;
        let field = self.field.as_mut().ok_or(EngineError::InvalidState)?;
        let index = field.index_of(pos)?;

        if field.cells[index].visibility != Visibility::Hidden {
            debug!("Cell ({}, {}) already open or flagged", pos.x, pos.y);
            return Ok((SweptValue::Stay, field.show()));
        }

        if !field.placed {
            field.place_mines(index, self.rules.safe_zone, &mut self.rng);
            self.status = StatusValue::Playing;
            debug!("Placed {} mines after first reveal", field.mines);
        }

        if field.cells[index].mine {
            let exposed = field.reveal_mines();
            self.status = StatusValue::Bomb;
            info!(
                "Mine hit at ({}, {}), exposing {} mines",
                pos.x, pos.y, exposed
            );
            return Ok((SweptValue::Bomb, field.show()));
        }

        let opened = field.flood_reveal(index);
        if field.is_cleared() {
            self.status = StatusValue::Clear;
            info!("Board cleared");
            Ok((SweptValue::Clear, field.show()))
        } else {
            debug!("Revealed {} cells, game continues", opened);
            Ok((SweptValue::Safe, field.show()))
        }
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn flag(&mut self, pos: Pos) -> Result<Dots> {
        self.ensure_mutable()?;
        let field = self.field.as_mut().ok_or(EngineError::InvalidState)?;
        let index = field.index_of(pos)?;

        let cell = &mut field.cells[index];
        match cell.visibility {
            Visibility::Hidden => {
                cell.visibility = Visibility::Flagged;
                debug!("Cell ({}, {}) flagged", pos.x, pos.y);
            }
            Visibility::Flagged => {
                cell.visibility = Visibility::Hidden;
                debug!("Cell ({}, {}) unflagged", pos.x, pos.y);
            }
            Visibility::Revealed => {
                debug!("Ignoring flag on revealed cell ({}, {})", pos.x, pos.y);
            }
        }

        Ok(field.show())
    }

    /// Drops the board. Calling it again is harmless.
    pub fn reset(&mut self) {
        if self.field.take().is_some() {
            info!("Board discarded");
        }
        self.status = StatusValue::Init;
    }
}

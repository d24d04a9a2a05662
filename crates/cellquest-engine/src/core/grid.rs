use std::fmt::Write as _;

use super::{
    cell::{CARRYING_CAPACITY, Cell, MAX_TERRAIN},
    faction::{Faction, FactionMap},
};

/// Side length of the grid used by default episodes.
pub const DEFAULT_SIDE: usize = 60;

/// A square grid of cells with toroidal adjacency on both axes.
///
/// Cells are stored row-major: the cell at `(row, col)` lives at index `row * side + col`.
///
/// # Example
///
/// ```
/// use cellquest_engine::Grid;
///
/// let grid = Grid::new(4);
/// let [north, south, east, west] = grid.neighbors(0);
/// assert_eq!((north, south, east, west), (12, 4, 1, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a `side`×`side` grid of [`Cell::SEED`] cells.
    #[must_use]
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![Cell::SEED; side * side],
        }
    }

    /// Builds a grid from a cell sequence, padding with [`Cell::MALFORMED`] or dropping
    /// surplus cells so exactly `side * side` cells remain.
    #[must_use]
    pub fn from_cells(side: usize, mut cells: Vec<Cell>) -> Self {
        cells.resize(side * side, Cell::MALFORMED);
        Self { side, cells }
    }

    /// Decodes a comma-separated sequence of cell records.
    #[must_use]
    pub fn parse_records(side: usize, records: &str) -> Self {
        let cells = records.split(',').map(Cell::parse_record).collect();
        Self::from_cells(side, cells)
    }

    /// Encodes the grid as comma-separated cell records in row-major order.
    #[must_use]
    pub fn to_records(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 32);
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write!(&mut out, "{}", cell.record(i, self.side)).unwrap();
        }
        out
    }

    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    #[must_use]
    pub const fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.side + col
    }

    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> &Cell {
        self.cell(self.index_of(row, col))
    }

    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        let index = self.index_of(row, col);
        self.cell_mut(index)
    }

    /// Forces every cell's population into `[1, CARRYING_CAPACITY]` and terrain into
    /// `[1, MAX_TERRAIN]`, including unowned cells the round never touches.
    pub fn clamp_cells(&mut self) {
        for cell in &mut self.cells {
            cell.population = cell.population.clamp(1, CARRYING_CAPACITY);
            cell.terrain = cell.terrain.clamp(1, MAX_TERRAIN);
        }
    }

    /// Returns the four toroidal neighbors of `index` as `[north, south, east, west]`.
    ///
    /// North of the first row is the last row, south of the last row is the first row,
    /// and east/west wrap within the same row.
    #[must_use]
    pub fn neighbors(&self, index: usize) -> [usize; 4] {
        let len = self.cells.len();
        let side = self.side;
        let col = index % side;
        let north = (index + len - side) % len;
        let south = (index + side) % len;
        let east = if col == side - 1 { index + 1 - side } else { index + 1 };
        let west = if col == 0 { index + side - 1 } else { index - 1 };
        [north, south, east, west]
    }

    /// Whether any neighbor of `index` has a different owner.
    #[must_use]
    pub fn is_border(&self, index: usize) -> bool {
        let owner = self.cells[index].owner;
        self.neighbors(index)
            .into_iter()
            .any(|n| self.cells[n].owner != owner)
    }

    /// Live-cell count per faction.
    #[must_use]
    pub fn faction_counts(&self) -> FactionMap<u64> {
        let mut counts = FactionMap::default();
        for faction in self.cells.iter().filter_map(|c| c.owner) {
            counts[faction] += 1;
        }
        counts
    }

    /// Number of cells without an owner.
    #[must_use]
    pub fn unowned_count(&self) -> u64 {
        self.cells.iter().filter(|c| !c.is_owned()).count() as u64
    }

    /// Row-major index of the first cell owned by `faction`.
    #[must_use]
    pub fn find_owned(&self, faction: Faction) -> Option<usize> {
        self.cells.iter().position(|c| c.owner == Some(faction))
    }
}

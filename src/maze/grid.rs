//! Maze grid
//!
//! Layouts are ASCII rows: `#` wall, `.` dot, `o` power pellet, space or `_`
//! empty. Rows outside the grid are solid; columns outside it are open so an
//! actor can leave through a tunnel row and wrap around.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 28x30 maze with four power pellets
pub const CLASSIC_LAYOUT: [&str; 30] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// 20x15 maze, dots only, open bottom row
pub const COMPACT_LAYOUT: [&str; 15] = [
    "####################",
    "#........##........#",
    "#.##.###.##.###.##.#",
    "#..................#",
    "#.##.#.######.#.##.#",
    "#....#...##...#....#",
    "####.### ## ###.####",
    "####.#        #.####",
    "    .  ##  ##  .    ",
    "####.#        #.####",
    "####.# ###### #.####",
    "#........##........#",
    "#.##.###.##.###.##.#",
    "#..#............#..#",
    "##.#.#.######.#.#.##",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Dot,
    Pellet,
    Empty,
}

impl Cell {
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Dot),
            'o' => Some(Cell::Pellet),
            ' ' | '_' => Some(Cell::Empty),
            _ => None,
        }
    }

    pub fn is_wall(&self) -> bool {
        *self == Cell::Wall
    }
}

/// Fixed-size cell grid, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Maze {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Maze, ConfigError> {
        let Some(first) = rows.first() else {
            return Err(ConfigError::Layout("layout has no rows".to_string()));
        };
        let cols = first.as_ref().chars().count();
        if cols == 0 {
            return Err(ConfigError::Layout("layout rows are empty".to_string()));
        }

        let mut cells = Vec::with_capacity(cols * rows.len());
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != cols {
                return Err(ConfigError::Layout(format!(
                    "row {r} has {len} cells, expected {cols}"
                )));
            }
            for (c, ch) in row.chars().enumerate() {
                let cell = Cell::from_char(ch).ok_or_else(|| {
                    ConfigError::Layout(format!("unknown cell '{ch}' at row {r}, column {c}"))
                })?;
                cells.push(cell);
            }
        }

        Ok(Maze {
            cols,
            rows: rows.len(),
            cells,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    /// Cell at a grid coordinate, `None` outside the grid
    pub fn cell(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|i| self.cells[i])
    }

    pub fn set(&mut self, col: i32, row: i32, cell: Cell) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = cell;
        }
    }

    /// Grid coordinate containing a pixel position
    pub fn cell_coord(point: Vec2, cell_size: f32) -> (i32, i32) {
        (
            (point.x / cell_size).floor() as i32,
            (point.y / cell_size).floor() as i32,
        )
    }

    /// Whether an actor may occupy the cell containing `point`
    pub fn is_passable(&self, point: Vec2, cell_size: f32) -> bool {
        let (col, row) = Self::cell_coord(point, cell_size);
        if row < 0 || row as usize >= self.rows {
            return false;
        }
        // Off the sides is tunnel space
        self.cell(col, row).is_none_or(|cell| !cell.is_wall())
    }

    /// Dots and pellets left
    pub fn remaining_food(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Dot | Cell::Pellet))
            .count()
    }

    /// Width in pixels
    pub fn width_px(&self, cell_size: f32) -> f32 {
        self.cols as f32 * cell_size
    }
}

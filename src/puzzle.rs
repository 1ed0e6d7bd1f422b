use rand::{seq::SliceRandom, Rng};
use std::cell::OnceCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::BoardError;

/// Largest supported board; tiles are stored as bytes.
pub const MAX_DIMENSION: usize = 15;

/// Direction a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Left, Move::Down, Move::Right];

    /// Offset (row, column) the blank travels when a tile slides this way.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Index of the tile that would slide into `blank`, if it is on the board.
    fn source(&self, blank: usize, dimension: usize) -> Option<usize> {
        let (dx, dy) = self.as_offset();

        let new_x = (blank / dimension) as isize + dx;
        let new_y = (blank % dimension) as isize + dy;

        let size = dimension as isize;
        if new_x >= 0 && new_x < size && new_y >= 0 && new_y < size {
            Some(new_x as usize * dimension + new_y as usize)
        } else {
            None
        }
    }

    /// The slide that turns `from` into `to`, if they are exactly one slide apart.
    pub fn between(from: &Board, to: &Board) -> Option<Move> {
        if from.dimension != to.dimension {
            return None;
        }
        Move::ALL.into_iter().find(|mv| {
            mv.source(from.blank, from.dimension) == Some(to.blank)
                && *to.tiles == *from.swapped(to.blank)
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

// Tiles north, south, west and east of the blank, in that order.
const NEIGHBOR_ORDER: [Move; 4] = [Move::Down, Move::Up, Move::Right, Move::Left];

/// An immutable N×N configuration, stored row-major with 0 as the blank.
///
/// Boards produced by [`Board::neighbors`] keep a weak link to the board they were
/// derived from. The link speeds up [`Board::manhattan`] and stops a neighbour from
/// undoing the previous slide; it never keeps the parent alive.
#[derive(Clone)]
pub struct Board {
    tiles: Box<[u8]>,
    dimension: usize,
    blank: usize,
    parent: Option<Weak<Board>>,
    hamming: OnceCell<usize>,
    manhattan: OnceCell<usize>,
}

impl Board {
    /// Builds a board from `dimension` rows of `dimension` tiles each.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, BoardError> {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(BoardError::Empty);
        }

        let mut flattened = Vec::with_capacity(dimension * dimension);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dimension {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: dimension,
                    found: values.len(),
                });
            }
            flattened.extend_from_slice(values);
        }

        Self::validated(dimension, &flattened)
    }

    /// Builds a board from a row-major sequence of N² tiles.
    pub fn from_tiles(tiles: &[u32]) -> Result<Self, BoardError> {
        if tiles.is_empty() {
            return Err(BoardError::Empty);
        }
        let dimension = (tiles.len() as f64).sqrt().round() as usize;
        if dimension * dimension != tiles.len() {
            return Err(BoardError::NotSquare { len: tiles.len() });
        }

        Self::validated(dimension, tiles)
    }

    /// The solved board: 1..N² in order with the blank last.
    pub fn goal(dimension: usize) -> Result<Self, BoardError> {
        check_dimension(dimension)?;
        let count = dimension * dimension;
        let tiles = (0..count).map(|i| correct_tile(i, count)).collect();

        Ok(Self::with_tiles(tiles, dimension, count - 1, None))
    }

    /// A uniformly random arrangement. Half of these cannot be solved.
    pub fn shuffled<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Self, BoardError> {
        check_dimension(dimension)?;
        let mut flattened: Vec<u8> = (0..dimension * dimension).map(|t| t as u8).collect();
        flattened.shuffle(rng);

        let blank = flattened.iter().position(|&t| t == 0).unwrap_or_default();
        Ok(Self::with_tiles(flattened.into(), dimension, blank, None))
    }

    /// A random walk of `steps` slides away from the goal, so always solvable.
    pub fn scrambled<R: Rng + ?Sized>(
        dimension: usize,
        steps: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Self::goal(dimension)?;
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let options: Vec<Move> = Move::ALL
                .into_iter()
                .filter(|mv| Some(mv.opposite()) != last)
                .filter(|mv| mv.source(board.blank, dimension).is_some())
                .collect();
            let Some(&mv) = options.choose(rng) else {
                break;
            };
            if let Some(next) = board.slide(mv) {
                board = next;
                last = Some(mv);
            }
        }

        Ok(board)
    }

    fn validated(dimension: usize, tiles: &[u32]) -> Result<Self, BoardError> {
        check_dimension(dimension)?;

        let count = dimension * dimension;
        let mut seen = vec![false; count];
        let mut blank = 0;
        for (index, &value) in tiles.iter().enumerate() {
            let slot = value as usize;
            if slot >= count {
                return Err(BoardError::TileOutOfRange {
                    index,
                    value,
                    limit: count,
                });
            }
            if seen[slot] {
                return Err(BoardError::DuplicateTile { value });
            }
            seen[slot] = true;
            if value == 0 {
                blank = index;
            }
        }

        let tiles = tiles.iter().map(|&t| t as u8).collect();
        Ok(Self::with_tiles(tiles, dimension, blank, None))
    }

    fn with_tiles(
        tiles: Box<[u8]>,
        dimension: usize,
        blank: usize,
        parent: Option<Weak<Board>>,
    ) -> Self {
        Self {
            tiles,
            dimension,
            blank,
            parent,
            hamming: OnceCell::new(),
            manhattan: OnceCell::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn blank_index(&self) -> usize {
        self.blank
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.tiles[row * self.dimension..(row + 1) * self.dimension]
    }

    /// Number of tiles, blank excluded, away from their goal position.
    pub fn hamming(&self) -> usize {
        *self.hamming.get_or_init(|| {
            let count = self.tiles.len();
            self.tiles
                .iter()
                .enumerate()
                .filter(|&(i, &t)| t != 0 && t != correct_tile(i, count))
                .count()
        })
    }

    /// Sum of row and column distances from each tile to its goal position.
    ///
    /// A board derived from a live parent reuses the parent's sum and only
    /// re-measures the one tile that slid.
    pub fn manhattan(&self) -> usize {
        *self.manhattan.get_or_init(|| {
            match self.parent.as_ref().and_then(Weak::upgrade) {
                Some(parent) => self.manhattan_from(&parent),
                None => self.manhattan_scan(),
            }
        })
    }

    fn manhattan_scan(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != 0)
            .map(|(i, &t)| self.distance(i, t as usize - 1))
            .sum()
    }

    fn manhattan_from(&self, parent: &Board) -> usize {
        // The tile now sits where the parent's blank was.
        let moved_to = parent.blank;
        let moved_from = self.blank;
        let goal = self.tiles[moved_to] as usize - 1;

        parent.manhattan() - self.distance(moved_from, goal) + self.distance(moved_to, goal)
    }

    fn distance(&self, from: usize, to: usize) -> usize {
        let n = self.dimension;
        (from / n).abs_diff(to / n) + (from % n).abs_diff(to % n)
    }

    pub fn is_goal(&self) -> bool {
        self.hamming() == 0
    }

    /// Swaps the first two tiles of the row after the blank's (the row before
    /// it when the blank is on the last row). Exactly one of a board and its
    /// twin can be solved.
    pub fn twin(&self) -> Board {
        let n = self.dimension;
        let blank_row = self.blank / n;
        let row = if blank_row + 1 < n {
            blank_row + 1
        } else {
            blank_row - 1
        };

        let mut tiles = self.tiles.clone();
        tiles.swap(row * n, row * n + 1);
        Self::with_tiles(tiles, n, self.blank, None)
    }

    pub fn equals_state(&self, other: &Board) -> Result<bool, BoardError> {
        if self.dimension != other.dimension {
            return Err(BoardError::DimensionMismatch {
                left: self.dimension,
                right: other.dimension,
            });
        }
        Ok(self.tiles == other.tiles)
    }

    /// Boards one slide away, skipping the one this board came from.
    pub fn neighbors(self: &Rc<Self>) -> Neighbors<'_> {
        Neighbors {
            board: self,
            parent: self.parent.as_ref().and_then(Weak::upgrade),
            remaining: NEIGHBOR_ORDER.into_iter(),
        }
    }

    /// The board after sliding a tile in direction `mv`, if there is such a tile.
    pub fn slide(&self, mv: Move) -> Option<Board> {
        let source = mv.source(self.blank, self.dimension)?;
        Some(Self::with_tiles(
            self.swapped(source),
            self.dimension,
            source,
            None,
        ))
    }

    fn swapped(&self, source: usize) -> Box<[u8]> {
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, source);
        tiles
    }

    /// Inversion-parity test. The solver never calls this; it races the twin instead.
    pub fn is_solvable_by_parity(&self) -> bool {
        let inversions = count_inversions(&self.tiles);
        let empty_row = self.blank / self.dimension;

        if self.dimension % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + empty_row) % 2 == 1
        }
    }
}

fn check_dimension(dimension: usize) -> Result<(), BoardError> {
    if dimension < 2 {
        return Err(BoardError::DimensionTooSmall { dimension });
    }
    if dimension > MAX_DIMENSION {
        return Err(BoardError::DimensionTooLarge {
            dimension,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

fn correct_tile(index: usize, count: usize) -> u8 {
    if index == count - 1 {
        0
    } else {
        (index + 1) as u8
    }
}

fn count_inversions(flattened: &[u8]) -> usize {
    flattened
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            flattened[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.equals_state(other), Ok(true))
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("dimension", &self.dimension)
            .field("tiles", &self.tiles)
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.dimension)?;
        for row in self.tiles.chunks(self.dimension) {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Lazy iterator over the boards one slide away from a board.
pub struct Neighbors<'a> {
    board: &'a Rc<Board>,
    parent: Option<Rc<Board>>,
    remaining: std::array::IntoIter<Move, 4>,
}

impl Iterator for Neighbors<'_> {
    type Item = Rc<Board>;

    fn next(&mut self) -> Option<Self::Item> {
        for mv in self.remaining.by_ref() {
            let board = self.board;
            let Some(source) = mv.source(board.blank, board.dimension) else {
                continue;
            };

            let candidate = Board::with_tiles(
                board.swapped(source),
                board.dimension,
                source,
                Some(Rc::downgrade(board)),
            );
            if self.parent.as_deref() == Some(&candidate) {
                continue;
            }
            return Some(Rc::new(candidate));
        }
        None
    }
}

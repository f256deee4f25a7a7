#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for Cake Eater.
//!
//! The [`Board`] owns the grid dimensions and the occupant collection, and
//! is the sole mutator of occupant positions. Spatial queries resolve
//! against the stored occupants; positions outside the grid resolve to a
//! synthetic off-map sentinel that is constructed on demand and never
//! stored. Movement follows a two-phase protocol: [`Board::plan_move`]
//! records a pending target without validation, and [`Board::commit`]
//! applies every queued move against the pre-commit snapshot in one pass.

use std::collections::HashMap;

use cake_eater_core::{OccupantType, Plan, Position};
use thiserror::Error;

/// Unique identifier assigned to a stored occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupantId(u32);

impl OccupantId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Mutable state carried by a robot occupant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Robot {
    name: String,
    score: u32,
    num_moves: u32,
    plan: Option<Plan>,
}

impl Robot {
    /// Creates a freshly joined robot with zero score and no pending plan.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            num_moves: 0,
            plan: None,
        }
    }

    /// Name the robot registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of cakes consumed so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Number of committed moves and successful eats.
    #[must_use]
    pub const fn num_moves(&self) -> u32 {
        self.num_moves
    }

    /// The robot's pending plan, if any.
    #[must_use]
    pub const fn plan(&self) -> Option<Plan> {
        self.plan
    }

    /// Records a new pending plan, overwriting any prior one.
    pub fn set_plan(&mut self, plan: Plan) {
        self.plan = Some(plan);
    }

    /// Clears the pending plan, returning what was recorded.
    pub fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    /// Credits a consumed cake.
    pub fn award_cake(&mut self) {
        self.score += 1;
    }

    /// Counts a committed move or successful eat.
    pub fn record_move(&mut self) {
        self.num_moves += 1;
    }
}

/// The kind of an occupant stored on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OccupantKind {
    /// Impassable wall segment.
    Wall,
    /// A consumable cake.
    Cake,
    /// A player-controlled robot.
    Robot(Robot),
}

impl OccupantKind {
    /// Type tag exposed on the wire for this kind.
    #[must_use]
    pub const fn occupant_type(&self) -> OccupantType {
        match self {
            Self::Wall => OccupantType::Wall,
            Self::Cake => OccupantType::Cake,
            Self::Robot(_) => OccupantType::Robot,
        }
    }
}

/// An entity stored on the board at a specific position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occupant {
    id: OccupantId,
    position: Position,
    kind: OccupantKind,
}

impl Occupant {
    /// Identifier assigned by the board at insertion time.
    #[must_use]
    pub const fn id(&self) -> OccupantId {
        self.id
    }

    /// Current position of the occupant.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Kind of the occupant.
    #[must_use]
    pub const fn kind(&self) -> &OccupantKind {
        &self.kind
    }

    /// Type tag of the occupant.
    #[must_use]
    pub const fn occupant_type(&self) -> OccupantType {
        self.kind.occupant_type()
    }

    /// Robot state, when this occupant is a robot.
    #[must_use]
    pub const fn robot(&self) -> Option<&Robot> {
        match &self.kind {
            OccupantKind::Robot(robot) => Some(robot),
            _ => None,
        }
    }
}

/// Result of a spatial query: either a stored occupant or the synthetic
/// off-map sentinel for out-of-bounds positions.
#[derive(Clone, Copy, Debug)]
pub enum OccupantView<'a> {
    /// The queried position lies outside the board.
    OffMap,
    /// A stored occupant found exactly at the queried position.
    Resident(&'a Occupant),
}

impl<'a> OccupantView<'a> {
    /// Type tag of the viewed occupant.
    #[must_use]
    pub const fn occupant_type(&self) -> OccupantType {
        match self {
            Self::OffMap => OccupantType::OffMap,
            Self::Resident(occupant) => occupant.occupant_type(),
        }
    }

    /// Whether the viewed occupant permits traversal of its cell.
    #[must_use]
    pub const fn traversable(&self) -> bool {
        self.occupant_type().traversable()
    }

    /// Robot state, when the viewed occupant is a robot.
    #[must_use]
    pub const fn robot(&self) -> Option<&'a Robot> {
        match self {
            Self::OffMap => None,
            Self::Resident(occupant) => occupant.robot(),
        }
    }
}

/// Occupant kinds that an ASCII legend entry may place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendTile {
    /// Place a wall at the symbol's coordinates.
    Wall,
    /// Place a cake at the symbol's coordinates.
    Cake,
}

/// Maps layout symbols to the occupant they place; `None` leaves the cell
/// empty.
pub type Legend = HashMap<char, Option<LegendTile>>;

/// Error raised when an ASCII layout contains an unknown symbol.
///
/// Layout parsing is fatal on the first unknown symbol; there is no
/// partial-board recovery.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("symbol {symbol:?} at ({x}, {y}) not in legend {known:?}")]
pub struct AsciiError {
    /// The unrecognized symbol.
    pub symbol: char,
    /// Zero-based column of the symbol.
    pub x: i32,
    /// Zero-based row of the symbol.
    pub y: i32,
    /// Symbols the legend does recognize.
    pub known: Vec<char>,
}

/// Rectangular grid owning an unordered collection of positioned occupants.
#[derive(Clone, Debug)]
pub struct Board {
    width: u32,
    height: u32,
    occupants: Vec<Occupant>,
    pending_moves: Vec<(OccupantId, Position)>,
    next_id: u32,
}

impl Board {
    /// Creates an empty board with the provided dimensions. Dimensions are
    /// fixed for the lifetime of the board.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            occupants: Vec::new(),
            pending_moves: Vec::new(),
            next_id: 0,
        }
    }

    /// Parses an ASCII layout into a board using the provided legend.
    ///
    /// The first line fixes the board width; each subsequent line is one
    /// row. Symbols map through the legend to an occupant or an empty cell;
    /// an unknown symbol aborts construction.
    pub fn from_ascii(ascii: &str, legend: &Legend) -> Result<Self, AsciiError> {
        let rows: Vec<&str> = ascii.lines().collect();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let height = rows.len();
        let mut board = Self::new(width as u32, height as u32);

        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                let Some(entry) = legend.get(&symbol) else {
                    let mut known: Vec<char> = legend.keys().copied().collect();
                    known.sort_unstable();
                    return Err(AsciiError {
                        symbol,
                        x: x as i32,
                        y: y as i32,
                        known,
                    });
                };
                let position = Position::new(x as i32, y as i32);
                match entry {
                    Some(LegendTile::Wall) => {
                        let _ = board.add(position, OccupantKind::Wall);
                    }
                    Some(LegendTile::Cake) => {
                        let _ = board.add(position, OccupantKind::Cake);
                    }
                    None => {}
                }
            }
        }

        Ok(board)
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the position lies within the board bounds.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x() >= 0
            && position.y() >= 0
            && (position.x() as u32) < self.width
            && (position.y() as u32) < self.height
    }

    /// Adds an occupant at the provided position, returning its identifier.
    pub fn add(&mut self, position: Position, kind: OccupantKind) -> OccupantId {
        let id = OccupantId(self.next_id);
        self.next_id += 1;
        self.occupants.push(Occupant { id, position, kind });
        id
    }

    /// Removes the occupant with the provided identifier. Removing a
    /// non-member is a no-op.
    pub fn remove(&mut self, id: OccupantId) {
        self.occupants.retain(|occupant| occupant.id != id);
        self.pending_moves.retain(|(pending, _)| *pending != id);
    }

    /// Returns every occupant exactly at the provided position.
    ///
    /// Out-of-bounds positions yield exactly one synthetic off-map view and
    /// nothing else; on-board queries never yield the sentinel.
    #[must_use]
    pub fn at(&self, position: Position) -> Vec<OccupantView<'_>> {
        if !self.contains(position) {
            return vec![OccupantView::OffMap];
        }
        self.occupants
            .iter()
            .filter(|occupant| occupant.position == position)
            .map(OccupantView::Resident)
            .collect()
    }

    /// Returns the occupants at an offset from the provided origin.
    #[must_use]
    pub fn at_relative(&self, origin: Position, dx: i32, dy: i32) -> Vec<OccupantView<'_>> {
        self.at(origin.offset(dx, dy))
    }

    /// Whether every occupant at the position permits traversal. Vacuously
    /// true for empty on-board cells.
    #[must_use]
    pub fn traversable(&self, position: Position) -> bool {
        self.at(position).iter().all(OccupantView::traversable)
    }

    /// Enumerates every on-board position holding zero occupants.
    #[must_use]
    pub fn find_empties(&self) -> Vec<Position> {
        let mut empties = Vec::new();
        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                let position = Position::new(x, y);
                if !self.occupants.iter().any(|o| o.position == position) {
                    empties.push(position);
                }
            }
        }
        empties
    }

    /// Looks up a stored occupant by identifier.
    #[must_use]
    pub fn occupant(&self, id: OccupantId) -> Option<&Occupant> {
        self.occupants.iter().find(|occupant| occupant.id == id)
    }

    /// Current position of the identified occupant.
    #[must_use]
    pub fn position_of(&self, id: OccupantId) -> Option<Position> {
        self.occupant(id).map(Occupant::position)
    }

    /// Mutable access to a robot occupant's state. The board remains the
    /// sole mutator of positions; callers mutate plans and scores only.
    pub fn robot_mut(&mut self, id: OccupantId) -> Option<&mut Robot> {
        self.occupants
            .iter_mut()
            .find(|occupant| occupant.id == id)
            .and_then(|occupant| match &mut occupant.kind {
                OccupantKind::Robot(robot) => Some(robot),
                _ => None,
            })
    }

    /// Iterates over every stored occupant.
    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> {
        self.occupants.iter()
    }

    /// Number of cake occupants still stored on the board.
    #[must_use]
    pub fn cake_count(&self) -> usize {
        self.occupants
            .iter()
            .filter(|occupant| occupant.occupant_type() == OccupantType::Cake)
            .count()
    }

    /// Records a pending move target for the occupant without moving it.
    ///
    /// Overwrites any previously queued target for the same occupant; the
    /// last plan recorded before the next commit wins. Legality is not
    /// checked here — callers validate against the pre-tick state.
    pub fn plan_move(&mut self, id: OccupantId, target: Position) {
        if let Some(entry) = self
            .pending_moves
            .iter_mut()
            .find(|(pending, _)| *pending == id)
        {
            entry.1 = target;
        } else {
            self.pending_moves.push((id, target));
        }
    }

    /// Atomically applies every queued move against the pre-commit
    /// snapshot, then clears the queue.
    ///
    /// Moves are applied independently of each other: two occupants queued
    /// into the same cell both land there. Occupants without a queued move
    /// are unaffected.
    pub fn commit(&mut self) {
        let pending = std::mem::take(&mut self.pending_moves);
        for (id, target) in pending {
            if let Some(occupant) = self.occupants.iter_mut().find(|o| o.id == id) {
                occupant.position = target;
            }
        }
    }
}

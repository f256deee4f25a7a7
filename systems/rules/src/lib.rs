#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cake Eater game rules.
//!
//! [`CakeEater`] owns the board and interprets player intents: joining,
//! planning moves, eating cake, and the per-tick resolution that validates
//! every pending plan against the pre-tick board before committing all
//! accepted moves in a single pass. It is the sole mutator of robot plans,
//! scores, and move counters; the board remains the sole mutator of
//! positions.

use cake_eater_core::{
    CellContent, Direction, GridCell, JoinReceipt, LeaderboardEntry, LookReport, OccupantType,
    Plan, Position,
};
use cake_eater_world::{Board, OccupantId, OccupantKind, OccupantView, Robot};
use thiserror::Error;

const JOIN_SAMPLING_SEED: u64 = 0x9e37_79b9_7f4a_7c15;
const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Reasons a join request is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum JoinError {
    /// A robot already holds the requested name.
    #[error("a robot with that name is already registered")]
    AlreadyRegistered,
    /// No empty on-board cell satisfies the coordinate constraints.
    #[error("no empty cell satisfies the join constraints")]
    NoSpace,
}

/// Lookup failure for operations addressing a robot by name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no robot named {name:?}")]
pub struct UnknownRobot {
    /// The name that failed to resolve.
    pub name: String,
}

#[derive(Clone, Debug)]
struct RobotEntry {
    name: String,
    id: OccupantId,
}

/// The Cake Eater game: a board plus the named-robot registry and the
/// intent-resolution rules.
#[derive(Clone, Debug)]
pub struct CakeEater {
    board: Board,
    robots: Vec<RobotEntry>,
    rng_state: u64,
}

impl CakeEater {
    /// Creates a game over the provided board.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self::with_seed(board, JOIN_SAMPLING_SEED)
    }

    /// Creates a game with an explicit seed for empty-cell sampling.
    #[must_use]
    pub const fn with_seed(board: Board, rng_seed: u64) -> Self {
        Self {
            board,
            robots: Vec::new(),
            rng_state: rng_seed,
        }
    }

    /// Read-only access to the owned board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Registers a new robot, placing it on an empty cell.
    ///
    /// `x` fixes the column, `y` fixes the row, both fix an exact cell, and
    /// neither picks uniformly among all empty cells. Fails when the name is
    /// taken or no empty cell satisfies the constraints.
    pub fn join(
        &mut self,
        name: &str,
        x: Option<i32>,
        y: Option<i32>,
    ) -> Result<JoinReceipt, JoinError> {
        if self.robots.iter().any(|entry| entry.name == name) {
            return Err(JoinError::AlreadyRegistered);
        }

        let candidates: Vec<Position> = self
            .board
            .find_empties()
            .into_iter()
            .filter(|cell| x.map_or(true, |x| cell.x() == x))
            .filter(|cell| y.map_or(true, |y| cell.y() == y))
            .collect();
        if candidates.is_empty() {
            return Err(JoinError::NoSpace);
        }
        let position = candidates[self.sample_index(candidates.len())];

        let id = self
            .board
            .add(position, OccupantKind::Robot(Robot::new(name)));
        self.robots.push(RobotEntry {
            name: name.to_owned(),
            id,
        });

        Ok(JoinReceipt {
            name: name.to_owned(),
            x: position.x(),
            y: position.y(),
            score: 0,
        })
    }

    /// Plans a single step north for the named robot.
    pub fn move_north(&mut self, name: &str) -> Result<(), UnknownRobot> {
        self.plan_step(name, Direction::North)
    }

    /// Plans a single step east for the named robot.
    pub fn move_east(&mut self, name: &str) -> Result<(), UnknownRobot> {
        self.plan_step(name, Direction::East)
    }

    /// Plans a single step south for the named robot.
    pub fn move_south(&mut self, name: &str) -> Result<(), UnknownRobot> {
        self.plan_step(name, Direction::South)
    }

    /// Plans a single step west for the named robot.
    pub fn move_west(&mut self, name: &str) -> Result<(), UnknownRobot> {
        self.plan_step(name, Direction::West)
    }

    /// Plans an eat intent for the named robot.
    pub fn eat_cake(&mut self, name: &str) -> Result<(), UnknownRobot> {
        let id = self.lookup(name)?;
        if let Some(robot) = self.board.robot_mut(id) {
            robot.set_plan(Plan::Eat);
        }
        Ok(())
    }

    /// Resolves every pending plan and commits all accepted moves at once.
    ///
    /// Eats resolve immediately: a cake underneath the robot is removed and
    /// credited; an eat with no cake present clears the plan without
    /// touching the score or the move counter. Move targets are validated
    /// for traversability against the pre-tick board; accepted moves are
    /// queued and applied together by a single commit, so every robot
    /// advances using the same consistent view of the world.
    pub fn tick(&mut self) {
        let ids: Vec<OccupantId> = self.robots.iter().map(|entry| entry.id).collect();
        for id in ids {
            let Some(plan) = self.board.robot_mut(id).and_then(Robot::take_plan) else {
                continue;
            };
            match plan {
                Plan::Eat => self.resolve_eat(id),
                Plan::Move(target) => {
                    if self.board.traversable(target) {
                        self.board.plan_move(id, target);
                        if let Some(robot) = self.board.robot_mut(id) {
                            robot.record_move();
                        }
                    }
                }
            }
        }
        self.board.commit();
    }

    /// Reports the named robot and its 3x3 neighborhood.
    ///
    /// The grid runs row-major from the north-west neighbor to the
    /// south-east neighbor and includes the robot's own cell; off-board
    /// neighbors report the off-map sentinel.
    pub fn look(&self, name: &str) -> Result<LookReport, UnknownRobot> {
        let id = self.lookup(name)?;
        let (robot, position) = self.robot_state(id);

        let mut grid = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell = position.offset(dx, dy);
                let contents = self
                    .board
                    .at(cell)
                    .iter()
                    .map(|view| CellContent {
                        occupant_type: view.occupant_type(),
                        name: view.robot().map(|robot| robot.name().to_owned()),
                    })
                    .collect();
                grid.push(GridCell {
                    x: cell.x(),
                    y: cell.y(),
                    contents,
                });
            }
        }

        Ok(LookReport {
            name: robot.name().to_owned(),
            score: robot.score(),
            x: position.x(),
            y: position.y(),
            plan: robot.plan(),
            grid,
        })
    }

    /// Leaderboard sorted by score descending; ties keep registration
    /// order.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .robots
            .iter()
            .map(|entry| {
                let (robot, _) = self.robot_state(entry.id);
                LeaderboardEntry {
                    name: robot.name().to_owned(),
                    score: robot.score(),
                }
            })
            .collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.score));
        entries
    }

    /// Whether the game is over: no cake remains on the board.
    #[must_use]
    pub fn over(&self) -> bool {
        self.board.cake_count() == 0
    }

    /// Number of cakes still on the board.
    #[must_use]
    pub fn cake_remaining(&self) -> usize {
        self.board.cake_count()
    }

    /// Number of committed moves and successful eats for the named robot.
    pub fn num_moves(&self, name: &str) -> Result<u32, UnknownRobot> {
        let id = self.lookup(name)?;
        Ok(self.robot_state(id).0.num_moves())
    }

    /// Current position of the named robot.
    pub fn coords(&self, name: &str) -> Result<Position, UnknownRobot> {
        let id = self.lookup(name)?;
        Ok(self.robot_state(id).1)
    }

    fn plan_step(&mut self, name: &str, direction: Direction) -> Result<(), UnknownRobot> {
        let id = self.lookup(name)?;
        let (_, position) = self.robot_state(id);
        let target = position.step(direction);
        if let Some(robot) = self.board.robot_mut(id) {
            robot.set_plan(Plan::Move(target));
        }
        Ok(())
    }

    fn resolve_eat(&mut self, id: OccupantId) {
        let Some(position) = self.board.position_of(id) else {
            return;
        };
        let cake = self.board.at(position).iter().find_map(|view| match view {
            OccupantView::Resident(occupant)
                if occupant.occupant_type() == OccupantType::Cake =>
            {
                Some(occupant.id())
            }
            _ => None,
        });
        let Some(cake) = cake else {
            return;
        };
        self.board.remove(cake);
        if let Some(robot) = self.board.robot_mut(id) {
            robot.award_cake();
            robot.record_move();
        }
    }

    fn lookup(&self, name: &str) -> Result<OccupantId, UnknownRobot> {
        self.robots
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.id)
            .ok_or_else(|| UnknownRobot {
                name: name.to_owned(),
            })
    }

    /// Registered robots hold board-backed state for their whole lifetime;
    /// a dangling registry entry is a programming error.
    fn robot_state(&self, id: OccupantId) -> (&Robot, Position) {
        let occupant = self
            .board
            .occupant(id)
            .unwrap_or_else(|| panic!("registered robot {} missing from board", id.get()));
        let robot = occupant
            .robot()
            .unwrap_or_else(|| panic!("occupant {} is not a robot", id.get()));
        (robot, occupant.position())
    }

    fn sample_index(&mut self, bound: usize) -> usize {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        (self.rng_state % bound as u64) as usize
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cake Eater workspace.
//!
//! This crate defines the vocabulary that connects the board, the game
//! rules, and the boundary adapters: positions and directions, the request
//! actions a robot may submit, the pending [`Plan`] recorded between ticks,
//! and the serialized snapshot types consumed by read-only presenters. The
//! snapshot types are the wire contract; their JSON shapes are pinned by
//! tests in this crate.

use std::{fmt, str::FromStr};

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

/// Canonical banner emitted when the game server boots.
pub const WELCOME_BANNER: &str = "Welcome to Cake Eater.";

/// Location of a single board cell expressed as zero-indexed coordinates.
///
/// Coordinates are signed: positions outside the board are legal query
/// inputs (they resolve to the synthetic off-map occupant), so neighborhood
/// arithmetic near the origin never underflows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position from zero-indexed coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position offset by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the adjacent position one cell away in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.deltas();
        self.offset(dx, dy)
    }
}

/// Cardinal movement directions available to robots.
///
/// North is toward decreasing row indices, matching the row-major ASCII
/// layout where the first line is row zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Column and row deltas of a single step in this direction.
    #[must_use]
    pub const fn deltas(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Request actions a robot may submit through the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Consume the cake underneath the robot, if any.
    EatCake,
    /// Plan a single step north.
    MoveNorth,
    /// Plan a single step east.
    MoveEast,
    /// Plan a single step south.
    MoveSouth,
    /// Plan a single step west.
    MoveWest,
}

impl Action {
    /// Every action accepted by the boundary, in the order advertised to
    /// clients.
    pub const ALL: [Action; 5] = [
        Action::EatCake,
        Action::MoveNorth,
        Action::MoveEast,
        Action::MoveSouth,
        Action::MoveWest,
    ];

    /// Canonical wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EatCake => "eat_cake",
            Self::MoveNorth => "move_north",
            Self::MoveEast => "move_east",
            Self::MoveSouth => "move_south",
            Self::MoveWest => "move_west",
        }
    }

    /// Direction of travel for movement actions; `None` for `eat_cake`.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::EatCake => None,
            Self::MoveNorth => Some(Direction::North),
            Self::MoveEast => Some(Direction::East),
            Self::MoveSouth => Some(Direction::South),
            Self::MoveWest => Some(Direction::West),
        }
    }
}

/// Error produced when an action string is not one of the five actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownAction {
    raw: String,
}

impl UnknownAction {
    /// The rejected action string as the client sent it.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action {:?}", self.raw)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction { raw: s.to_owned() })
    }
}

/// A robot's recorded but not-yet-applied intent for the next tick.
///
/// Serializes as a `{x, y}` object for move targets and as the literal
/// string `"eat"` for the eat intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plan {
    /// Move to the given adjacent position at the next commit.
    Move(Position),
    /// Consume the cake underneath the robot at the next tick.
    Eat,
}

impl Serialize for Plan {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Move(target) => {
                let mut state = serializer.serialize_struct("Plan", 2)?;
                state.serialize_field("x", &target.x())?;
                state.serialize_field("y", &target.y())?;
                state.end()
            }
            Self::Eat => serializer.serialize_str("eat"),
        }
    }
}

/// Lifecycle phase of a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Pre-game window during which joins are expected.
    Registration,
    /// The registration window has closed and ticks affect the outcome.
    InProgress,
}

/// Type tag carried by every occupant, including the synthetic off-map
/// sentinel returned by out-of-bounds queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupantType {
    /// Impassable wall segment.
    Wall,
    /// A player-controlled robot.
    Robot,
    /// A consumable cake.
    Cake,
    /// Sentinel for positions outside the board; never stored.
    OffMap,
}

impl OccupantType {
    /// Whether an occupant of this type may share its cell with a moving
    /// robot. Fixed per kind: walls and off-map cells are never traversable.
    #[must_use]
    pub const fn traversable(self) -> bool {
        match self {
            Self::Wall | Self::OffMap => false,
            Self::Robot | Self::Cake => true,
        }
    }
}

/// Serialized form of a single positioned occupant.
///
/// Robot-only fields are omitted entirely for other occupant types; `plan`
/// is present (possibly `null`) for every robot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileSnapshot {
    /// Type tag of the occupant.
    #[serde(rename = "type")]
    pub occupant_type: OccupantType,
    /// Zero-based column of the occupant.
    pub x: i32,
    /// Zero-based row of the occupant.
    pub y: i32,
    /// Whether the occupant permits traversal of its cell.
    pub traversable: bool,
    /// Robot name, robots only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Robot score, robots only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Committed move count, robots only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_moves: Option<u32>,
    /// Pending plan, robots only; `null` when the robot has no plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Option<Plan>>,
}

/// Serialized form of the whole board, consumed by renderer collaborators.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardSnapshot {
    /// Number of rows on the board.
    pub height: u32,
    /// Number of columns on the board.
    pub width: u32,
    /// Every stored occupant; empty cells are not listed.
    pub tiles: Vec<TileSnapshot>,
}

/// One row of the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// Robot name.
    pub name: String,
    /// Cakes consumed so far.
    pub score: u32,
}

/// One registered user of the running app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserEntry {
    /// The user's team name.
    pub username: String,
}

/// Serialized form of the whole app state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Current lifecycle phase.
    pub status: GameStatus,
    /// Serialized board.
    pub board: BoardSnapshot,
    /// Number of cakes still on the board.
    pub cake_remaining: usize,
    /// Leaderboard sorted by score descending.
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Registered users in roster order.
    pub users: Vec<UserEntry>,
}

/// Contents of one cell within a robot's 3x3 neighborhood view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellContent {
    /// Type tag of the occupant present in the cell.
    #[serde(rename = "type")]
    pub occupant_type: OccupantType,
    /// Occupant name, reported for robots only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One cell of a robot's 3x3 neighborhood, identified by its coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridCell {
    /// Zero-based column of the cell; may lie outside the board.
    pub x: i32,
    /// Zero-based row of the cell; may lie outside the board.
    pub y: i32,
    /// Occupants present in the cell.
    pub contents: Vec<CellContent>,
}

/// Read-only report describing a robot and its immediate surroundings.
///
/// The grid is row-major from the north-west corner to the south-east
/// corner and includes the robot's own cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LookReport {
    /// Robot name.
    pub name: String,
    /// Cakes consumed so far.
    pub score: u32,
    /// Zero-based column of the robot.
    pub x: i32,
    /// Zero-based row of the robot.
    pub y: i32,
    /// Pending plan, `null` when the robot has none.
    pub plan: Option<Plan>,
    /// The 3x3 neighborhood centered on the robot.
    pub grid: Vec<GridCell>,
}

/// Receipt returned to a successfully joined robot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JoinReceipt {
    /// Robot name as registered.
    pub name: String,
    /// Zero-based column of the placed robot.
    pub x: i32,
    /// Zero-based row of the placed robot.
    pub y: i32,
    /// Starting score, always zero.
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::{Action, Direction, GameStatus, OccupantType, Plan, Position, TileSnapshot};
    use serde_json::json;

    #[test]
    fn step_moves_one_cell_in_each_direction() {
        let origin = Position::new(3, 3);
        assert_eq!(origin.step(Direction::North), Position::new(3, 2));
        assert_eq!(origin.step(Direction::East), Position::new(4, 3));
        assert_eq!(origin.step(Direction::South), Position::new(3, 4));
        assert_eq!(origin.step(Direction::West), Position::new(2, 3));
    }

    #[test]
    fn positions_outside_the_board_are_representable() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::North), Position::new(0, -1));
        assert_eq!(corner.step(Direction::West), Position::new(-1, 0));
    }

    #[test]
    fn actions_parse_from_their_wire_names() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn unrecognized_action_is_rejected() {
        let error = "move_up".parse::<Action>().expect_err("must reject");
        assert_eq!(error.raw(), "move_up");
    }

    #[test]
    fn move_plan_serializes_as_coordinate_object() {
        let plan = Plan::Move(Position::new(4, 7));
        let value = serde_json::to_value(plan).expect("serialize");
        assert_eq!(value, json!({ "x": 4, "y": 7 }));
    }

    #[test]
    fn eat_plan_serializes_as_string() {
        let value = serde_json::to_value(Plan::Eat).expect("serialize");
        assert_eq!(value, json!("eat"));
    }

    #[test]
    fn status_serializes_in_snake_case() {
        assert_eq!(
            serde_json::to_value(GameStatus::Registration).expect("serialize"),
            json!("registration")
        );
        assert_eq!(
            serde_json::to_value(GameStatus::InProgress).expect("serialize"),
            json!("in_progress")
        );
    }

    #[test]
    fn traversability_is_fixed_per_kind() {
        assert!(!OccupantType::Wall.traversable());
        assert!(!OccupantType::OffMap.traversable());
        assert!(OccupantType::Robot.traversable());
        assert!(OccupantType::Cake.traversable());
    }

    #[test]
    fn wall_tile_omits_robot_fields() {
        let tile = TileSnapshot {
            occupant_type: OccupantType::Wall,
            x: 1,
            y: 2,
            traversable: false,
            name: None,
            score: None,
            num_moves: None,
            plan: None,
        };
        let value = serde_json::to_value(tile).expect("serialize");
        assert_eq!(
            value,
            json!({ "type": "wall", "x": 1, "y": 2, "traversable": false })
        );
    }

    #[test]
    fn robot_tile_reports_null_plan_when_unplanned() {
        let tile = TileSnapshot {
            occupant_type: OccupantType::Robot,
            x: 0,
            y: 0,
            traversable: true,
            name: Some("p1".to_owned()),
            score: Some(2),
            num_moves: Some(5),
            plan: Some(None),
        };
        let value = serde_json::to_value(tile).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "robot",
                "x": 0,
                "y": 0,
                "traversable": true,
                "name": "p1",
                "score": 2,
                "num_moves": 5,
                "plan": null
            })
        );
    }
}

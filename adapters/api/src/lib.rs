#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Boundary adapter for the Cake Eater game.
//!
//! Translates resolved requests into game calls and game state into wire
//! bodies. Authentication happens before this layer: every request arrives
//! with an [`Identity`] that is either anonymous or an authenticated team
//! name, and the core never sees credentials. Responses carry HTTP-shaped
//! status codes so any transport can map them directly.
//!
//! The adapter also owns the timer wiring: the `game_start` countdown that
//! closes the registration window and the recurring `game_tick` countdown
//! that drives the simulation until the game is over.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
    time::Duration,
};

use cake_eater_core::{
    Action, BoardSnapshot, GameSnapshot, GameStatus, LeaderboardEntry, LookReport, TileSnapshot,
    UserEntry,
};
use cake_eater_system_rules::CakeEater;
use cake_eater_system_scheduler::{Clock, TimeControl};
use cake_eater_world::Board;
use serde::Serialize;

/// Name of the countdown that closes the registration window.
pub const GAME_START: &str = "game_start";
/// Name of the recurring countdown that drives simulation ticks.
pub const GAME_TICK: &str = "game_tick";

const DEFAULT_WIDTH: u32 = 40;
const DEFAULT_HEIGHT: u32 = 30;
const DEFAULT_CAKE_COUNT: usize = 20;
const CAKE_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Default registration window before the game starts.
pub const DEFAULT_REGISTRATION_WINDOW: Duration = Duration::from_secs(5 * 60);
/// Default cadence of the recurring game tick.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for a freshly constructed app.
#[derive(Clone, Debug)]
pub struct Config {
    width: u32,
    height: u32,
    cake_count: usize,
    users: Vec<String>,
}

impl Config {
    /// Creates a configuration with explicit board dimensions and cake
    /// count.
    #[must_use]
    pub const fn new(width: u32, height: u32, cake_count: usize, users: Vec<String>) -> Self {
        Self {
            width,
            height,
            cake_count,
            users,
        }
    }

    /// Default board with the provided user roster.
    #[must_use]
    pub const fn with_users(users: Vec<String>) -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_CAKE_COUNT, users)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_users(Vec::new())
    }
}

/// Resolved authentication result attached to each robot request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    /// No valid credentials accompanied the request.
    Anonymous,
    /// Credentials resolved to the named team.
    Team(String),
}

/// A request after transport framing and authentication are stripped away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// `GET /game` — public game status.
    GameStatus,
    /// `GET /game/robots/:name` — a robot's view of the world.
    LookRobot {
        /// Robot addressed by the request path.
        name: String,
        /// Resolved identity of the caller.
        identity: Identity,
    },
    /// `PUT /game/robots/:name` — submit an action for the robot.
    ActRobot {
        /// Robot addressed by the request path.
        name: String,
        /// Resolved identity of the caller.
        identity: Identity,
        /// Raw action string from the request body.
        action: String,
    },
}

/// Body of a boundary response.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// Public game status.
    Game(GameStatusBody),
    /// A robot's view plus its available actions.
    Robot(RobotBody),
    /// Error description.
    Error(ErrorBody),
}

/// Public game status returned for `GET /game`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameStatusBody {
    /// Current lifecycle phase.
    pub status: GameStatus,
    /// Number of cakes still on the board.
    pub cake_remaining: usize,
    /// Leaderboard sorted by score descending.
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Robot view returned for robot requests.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RobotBody {
    /// The robot's look report.
    #[serde(flatten)]
    pub look: LookReport,
    /// Actions the robot may submit.
    pub actions: Vec<&'static str>,
}

/// Error body carried by non-2xx responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

/// A boundary response: an HTTP-shaped status code plus a typed body.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    /// HTTP-shaped status code.
    pub code: u16,
    /// Serialized body.
    pub body: ResponseBody,
}

impl Response {
    fn ok(body: ResponseBody) -> Self {
        Self { code: 200, body }
    }

    fn error(code: u16, message: String) -> Self {
        Self {
            code,
            body: ResponseBody::Error(ErrorBody { error: message }),
        }
    }

    /// Renders the body as a JSON string.
    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }
}

/// The running app: game, lifecycle status, and user roster behind one
/// mutual-exclusion domain.
///
/// All mutating operations and snapshot reads go through the same `App`
/// value; callers share it behind [`SharedApp`] so request handling and the
/// tick poller serialize against each other.
#[derive(Clone, Debug)]
pub struct App {
    game: CakeEater,
    status: GameStatus,
    users: Vec<String>,
}

/// Handle to an app shared between request handlers and the tick poller.
pub type SharedApp = Arc<Mutex<App>>;

impl App {
    /// Builds the app from configuration: an open board sprinkled with
    /// cake, with every configured user's robot pre-joined.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut board = Board::new(config.width, config.height);
        let mut rng_state = CAKE_SEED;
        for _ in 0..config.cake_count {
            let empties = board.find_empties();
            if empties.is_empty() {
                break;
            }
            rng_state = rng_state.wrapping_mul(RNG_MULTIPLIER).wrapping_add(RNG_INCREMENT);
            let index = (rng_state % empties.len() as u64) as usize;
            let _ = board.add(empties[index], cake_eater_world::OccupantKind::Cake);
        }
        Self::from_parts(CakeEater::new(board), config.users)
    }

    /// Builds the app around an existing game, pre-joining every user.
    ///
    /// Join failures (a full board) leave the remaining users without
    /// robots; their requests answer 404 until space frees up and they are
    /// re-joined out of band.
    #[must_use]
    pub fn from_parts(mut game: CakeEater, users: Vec<String>) -> Self {
        for user in &users {
            let _ = game.join(user, None, None);
        }
        Self {
            game,
            status: GameStatus::Registration,
            users,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Closes the registration window.
    pub fn start(&mut self) {
        self.status = GameStatus::InProgress;
    }

    /// Read-only access to the game.
    #[must_use]
    pub const fn game(&self) -> &CakeEater {
        &self.game
    }

    /// Mutable access to the game, for the tick driver.
    pub fn game_mut(&mut self) -> &mut CakeEater {
        &mut self.game
    }

    /// Translates one resolved request into a response.
    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::GameStatus => Response::ok(ResponseBody::Game(GameStatusBody {
                status: self.status,
                cake_remaining: self.game.cake_remaining(),
                leaderboard: self.game.leaderboard(),
            })),
            Request::LookRobot { name, identity } => match self.authorize(&name, &identity) {
                Some(denied) => denied,
                None => self.robot_response(&name),
            },
            Request::ActRobot {
                name,
                identity,
                action,
            } => {
                if let Some(denied) = self.authorize(&name, &identity) {
                    return denied;
                }
                let action = match Action::from_str(&action) {
                    Ok(action) => action,
                    Err(error) => return Response::error(400, error.to_string()),
                };
                let outcome = match action {
                    Action::EatCake => self.game.eat_cake(&name),
                    Action::MoveNorth => self.game.move_north(&name),
                    Action::MoveEast => self.game.move_east(&name),
                    Action::MoveSouth => self.game.move_south(&name),
                    Action::MoveWest => self.game.move_west(&name),
                };
                match outcome {
                    Ok(()) => self.robot_response(&name),
                    Err(error) => Response::error(404, error.to_string()),
                }
            }
        }
    }

    /// Serializes the whole app state for renderer collaborators.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            board: board_snapshot(self.game.board()),
            cake_remaining: self.game.cake_remaining(),
            leaderboard: self.game.leaderboard(),
            users: self
                .users
                .iter()
                .map(|username| UserEntry {
                    username: username.clone(),
                })
                .collect(),
        }
    }

    /// Returns the rejection response for a robot request, or `None` when
    /// the caller may proceed. Unknown robots answer 404 before any
    /// credential check.
    fn authorize(&self, name: &str, identity: &Identity) -> Option<Response> {
        if self.game.look(name).is_err() {
            let known: Vec<&str> = self.users.iter().map(String::as_str).collect();
            return Some(Response::error(
                404,
                format!("There is no robot named {name:?}, known names: {known:?}"),
            ));
        }
        match identity {
            Identity::Anonymous => Some(Response::error(
                401,
                "You need to provide your username and password".to_owned(),
            )),
            Identity::Team(team) if team != name => Some(Response::error(
                403,
                "Your credentials do not allow you to see the requested robot".to_owned(),
            )),
            Identity::Team(_) => None,
        }
    }

    fn robot_response(&self, name: &str) -> Response {
        match self.game.look(name) {
            Ok(look) => Response::ok(ResponseBody::Robot(RobotBody {
                look,
                actions: Action::ALL.iter().map(|action| action.as_str()).collect(),
            })),
            Err(error) => Response::error(404, error.to_string()),
        }
    }
}

/// Serializes a board into the wire snapshot consumed by renderers.
#[must_use]
pub fn board_snapshot(board: &Board) -> BoardSnapshot {
    let tiles = board
        .occupants()
        .map(|occupant| {
            let robot = occupant.robot();
            TileSnapshot {
                occupant_type: occupant.occupant_type(),
                x: occupant.position().x(),
                y: occupant.position().y(),
                traversable: occupant.occupant_type().traversable(),
                name: robot.map(|robot| robot.name().to_owned()),
                score: robot.map(cake_eater_world::Robot::score),
                num_moves: robot.map(cake_eater_world::Robot::num_moves),
                plan: robot.map(cake_eater_world::Robot::plan),
            }
        })
        .collect();
    BoardSnapshot {
        height: board.height(),
        width: board.width(),
        tiles,
    }
}

/// Arms the countdown that closes the registration window.
pub fn register_game_start<C: Clock>(
    timer: &mut TimeControl<C>,
    app: &SharedApp,
    window: Duration,
) {
    let app = Arc::clone(app);
    timer.register(
        GAME_START,
        window,
        Box::new(move |_| {
            if let Ok(mut app) = app.lock() {
                app.start();
            }
        }),
    );
}

/// Arms the recurring game tick.
///
/// Each firing advances the simulation while the game is in progress and
/// re-registers itself unless the game is over, so leaderboard-affecting
/// ticks stop once the last cake is gone.
pub fn schedule_tick<C: Clock>(timer: &mut TimeControl<C>, app: &SharedApp, interval: Duration) {
    let app = Arc::clone(app);
    timer.register(
        GAME_TICK,
        interval,
        Box::new(move |timer| {
            let keep_ticking = match app.lock() {
                Ok(mut app) => {
                    if app.status() == GameStatus::InProgress {
                        app.game_mut().tick();
                    }
                    !app.game().over()
                }
                Err(_) => false,
            };
            if keep_ticking {
                schedule_tick(timer, &app, interval);
            }
        }),
    );
}

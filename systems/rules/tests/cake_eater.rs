use cake_eater_core::{OccupantType, Plan, Position};
use cake_eater_system_rules::{CakeEater, JoinError};
use cake_eater_world::{Board, Legend, LegendTile};

fn game_for(ascii: &str) -> CakeEater {
    let mut legend = Legend::new();
    let _ = legend.insert(' ', None);
    let _ = legend.insert('#', Some(LegendTile::Wall));
    let _ = legend.insert('C', Some(LegendTile::Cake));
    CakeEater::new(Board::from_ascii(ascii, &legend).expect("layout must parse"))
}

#[test]
fn robots_join_at_requested_coordinates() {
    let mut game = game_for("#####\n#C  #\n# C #\n#   #\n#####");
    let receipt = game.join("Josh", Some(2), Some(1)).expect("join");
    assert_eq!(receipt.name, "Josh");
    assert_eq!(receipt.x, 2);
    assert_eq!(receipt.y, 1);
    assert_eq!(receipt.score, 0);
}

#[test]
fn multiple_robots_may_join() {
    let mut game = game_for("# \n C");
    assert!(game.join("p1", None, None).is_ok());
    assert!(game.join("p2", None, None).is_ok());
}

#[test]
fn duplicate_names_are_rejected() {
    let mut game = game_for("  \n  ");
    assert!(game.join("p1", Some(1), Some(0)).is_ok());
    assert_eq!(
        game.join("p1", Some(0), Some(0)),
        Err(JoinError::AlreadyRegistered)
    );
    assert!(game.join("p2", Some(0), Some(0)).is_ok());
}

#[test]
fn joins_stop_once_the_board_is_full() {
    let mut game = game_for("# \n C");
    assert!(game.join("p1", None, None).is_ok());
    assert!(game.join("p2", None, None).is_ok());
    assert_eq!(game.join("p3", None, None), Err(JoinError::NoSpace));
}

#[test]
fn robot_walks_a_square_around_the_board() {
    let mut game = game_for("  \n  ");
    let _ = game.join("p1", Some(0), Some(0)).expect("join");

    game.move_east("p1").expect("known robot");
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(1, 0));

    game.move_south("p1").expect("known robot");
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(1, 1));

    game.move_west("p1").expect("known robot");
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(0, 1));

    game.move_north("p1").expect("known robot");
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(0, 0));
}

#[test]
fn eating_every_cake_ends_the_game() {
    let mut game = game_for("C \n C");
    let _ = game.join("p1", Some(1), Some(0)).expect("join");

    game.move_west("p1").expect("known robot");
    game.tick();
    game.eat_cake("p1").expect("known robot");
    game.tick();
    assert_eq!(game.look("p1").expect("look").score, 1);
    assert_eq!(game.cake_remaining(), 1);
    assert!(!game.over());

    game.move_south("p1").expect("known robot");
    game.tick();
    game.move_east("p1").expect("known robot");
    game.tick();
    game.eat_cake("p1").expect("known robot");
    assert!(!game.over());
    game.tick();
    assert!(game.over());
    assert_eq!(game.cake_remaining(), 0);
}

#[test]
fn eating_without_cake_changes_nothing() {
    let mut game = game_for("  \n C");
    let _ = game.join("p1", Some(0), Some(0)).expect("join");
    game.eat_cake("p1").expect("known robot");
    game.tick();
    assert_eq!(game.look("p1").expect("look").score, 0);
    assert_eq!(game.num_moves("p1").expect("num_moves"), 0);
    assert_eq!(game.look("p1").expect("look").plan, None);
}

#[test]
fn moves_are_counted_only_when_committed() {
    let mut game = game_for("  \n C");
    let _ = game.join("p1", Some(1), Some(0)).expect("join");
    game.move_west("p1").expect("known robot");
    assert_eq!(game.num_moves("p1").expect("num_moves"), 0);
    game.tick();
    assert_eq!(game.num_moves("p1").expect("num_moves"), 1);
    game.tick();
    assert_eq!(game.num_moves("p1").expect("num_moves"), 1);
}

#[test]
fn walking_into_a_wall_is_free_and_goes_nowhere() {
    let mut game = game_for(" #");
    let _ = game.join("p1", Some(0), Some(0)).expect("join");
    game.move_east("p1").expect("known robot");
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(0, 0));
    assert_eq!(game.num_moves("p1").expect("num_moves"), 0);
}

#[test]
fn walking_off_the_board_is_rejected_at_tick_time() {
    let mut game = game_for(" ");
    let _ = game.join("p1", Some(0), Some(0)).expect("join");
    game.move_north("p1").expect("known robot");
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(0, 0));
    assert_eq!(game.num_moves("p1").expect("num_moves"), 0);
}

#[test]
fn later_intents_in_the_same_tick_override_earlier_ones() {
    let mut game = game_for("# \n C");
    let _ = game.join("p1", Some(1), Some(0)).expect("join");
    game.move_west("p1").expect("known robot");
    game.move_south("p1").expect("known robot");
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(1, 1));
    assert_eq!(game.num_moves("p1").expect("num_moves"), 1);
}

#[test]
fn eat_intent_replaces_a_pending_move() {
    let mut game = game_for("C  ");
    let _ = game.join("p1", Some(1), Some(0)).expect("join");
    game.move_west("p1").expect("known robot");
    game.tick();

    game.move_east("p1").expect("known robot");
    game.eat_cake("p1").expect("known robot");
    assert_eq!(game.look("p1").expect("look").plan, Some(Plan::Eat));
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(0, 0));
    assert_eq!(game.look("p1").expect("look").score, 1);
}

#[test]
fn two_robots_may_end_the_tick_in_the_same_cell() {
    let mut game = game_for("   ");
    let _ = game.join("p1", Some(0), Some(0)).expect("join");
    let _ = game.join("p2", Some(2), Some(0)).expect("join");
    game.move_east("p1").expect("known robot");
    game.move_west("p2").expect("known robot");
    game.tick();
    assert_eq!(game.coords("p1").expect("coords"), Position::new(1, 0));
    assert_eq!(game.coords("p2").expect("coords"), Position::new(1, 0));
}

#[test]
fn leaderboard_sorts_by_score_with_stable_ties() {
    let mut game = game_for("C C\n   \n  C");
    let _ = game.join("p1", Some(1), Some(0)).expect("join");
    let _ = game.join("p2", Some(1), Some(1)).expect("join");
    let _ = game.join("p3", Some(0), Some(1)).expect("join");

    game.move_west("p1").expect("known robot");
    game.move_south("p2").expect("known robot");
    game.tick();
    game.eat_cake("p1").expect("known robot");
    game.move_east("p2").expect("known robot");
    game.tick();
    game.move_east("p1").expect("known robot");
    game.eat_cake("p2").expect("known robot");
    game.tick();
    game.move_east("p1").expect("known robot");
    game.tick();
    game.eat_cake("p1").expect("known robot");
    game.tick();

    let board = game.leaderboard();
    let summary: Vec<(&str, u32)> = board
        .iter()
        .map(|entry| (entry.name.as_str(), entry.score))
        .collect();
    assert_eq!(summary, vec![("p1", 2), ("p2", 1), ("p3", 0)]);
}

#[test]
fn tied_scores_keep_registration_order() {
    let mut game = game_for("   ");
    let _ = game.join("zeta", Some(0), Some(0)).expect("join");
    let _ = game.join("alpha", Some(1), Some(0)).expect("join");
    let board = game.leaderboard();
    let names: Vec<&str> = board
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
}

#[test]
fn look_reports_the_full_neighborhood() {
    let mut game = game_for("#C\n  ");
    let _ = game.join("p1", Some(0), Some(1)).expect("join");
    let report = game.look("p1").expect("look");

    assert_eq!(report.name, "p1");
    assert_eq!((report.x, report.y), (0, 1));
    assert_eq!(report.grid.len(), 9);

    // Row-major from the north-west corner; (0, 1) sits on the west edge.
    assert_eq!((report.grid[0].x, report.grid[0].y), (-1, 0));
    assert_eq!(report.grid[0].contents[0].occupant_type, OccupantType::OffMap);

    let north = &report.grid[1];
    assert_eq!((north.x, north.y), (0, 0));
    assert_eq!(north.contents[0].occupant_type, OccupantType::Wall);

    let own_cell = &report.grid[4];
    assert_eq!((own_cell.x, own_cell.y), (0, 1));
    assert_eq!(own_cell.contents[0].occupant_type, OccupantType::Robot);
    assert_eq!(own_cell.contents[0].name.as_deref(), Some("p1"));

    let south_east = &report.grid[8];
    assert_eq!((south_east.x, south_east.y), (1, 2));
    assert_eq!(south_east.contents[0].occupant_type, OccupantType::OffMap);
}

#[test]
fn look_names_neighboring_robots() {
    let mut game = game_for("  ");
    let _ = game.join("p1", Some(0), Some(0)).expect("join");
    let _ = game.join("p2", Some(1), Some(0)).expect("join");
    let report = game.look("p1").expect("look");
    let east = &report.grid[5];
    assert_eq!((east.x, east.y), (1, 0));
    assert_eq!(east.contents[0].name.as_deref(), Some("p2"));
}

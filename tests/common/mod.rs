#![allow(dead_code)]

use battlelog::{
    config::Config,
    data::{DataTable, EntityKind, GameData, NamedEntity},
    log::LogLine,
    session::BattleLogSession,
};

/// Helper to build a small game database with a few names per table
pub fn sample_game_data() -> GameData {
    let mut data = GameData::new();
    data.actors = DataTable::from_records([
        NamedEntity::new(1, "Reid"),
        NamedEntity::new(2, "Priscilla"),
    ]);
    data.enemies = DataTable::from_records([
        NamedEntity::new(1, "Slime"),
        NamedEntity::new(2, "Bat"),
    ]);
    data.items = DataTable::from_records([NamedEntity::new(1, "Potion")]);
    data.skills = DataTable::from_records([NamedEntity::new(1, "Fire")]);
    data
}

/// Helper to create a session over the sample database
pub fn create_test_session(max_log_count: usize) -> BattleLogSession<GameData> {
    let config = Config {
        max_log_count,
        ..Config::default()
    };
    BattleLogSession::new(&config, sample_game_data())
}

/// Name source with only the given enemy names
pub fn enemy_names(names: &'static [&'static str]) -> impl Fn(EntityKind) -> Vec<String> {
    move |kind| match kind {
        EntityKind::Enemy => names.iter().map(|n| n.to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Helper to collect what the next refresh would draw
pub fn drain_frame<S: battlelog::data::NameSource>(session: &mut BattleLogSession<S>) -> Option<Vec<String>> {
    let mut frame = None;
    session.refresh(|lines: &[&LogLine]| {
        frame = Some(lines.iter().map(|l| l.to_string()).collect());
    });
    frame
}

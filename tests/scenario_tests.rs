// End-to-end behavior of the log buffer and the colorizer working together.

mod common;

use battlelog::{
    colorize::{CacheMode, ColorCategory, KeywordColorizer},
    config::{ColorValue, Config, CustomColorConfig, KeywordList},
    data::EntityKind,
    log::{LogBuffer, LogLine},
    session::{HostEvent, PluginCommand},
};
use common::{create_test_session, drain_frame, enemy_names};

fn slime_category(enabled: bool) -> Vec<ColorCategory> {
    let mut category = ColorCategory::custom("slime", vec!["Slime".to_string()], 26);
    category.enabled = enabled;
    vec![category]
}

#[test]
fn test_buffer_keeps_newest_lines() {
    let mut buffer = LogBuffer::new(3);
    for line in ["a", "b", "c", "d"] {
        buffer.append(LogLine::from(line));
    }

    let snapshot: Vec<&str> = buffer.snapshot().iter().map(|l| l.as_str()).collect();
    assert_eq!(snapshot, vec!["b", "c", "d"]);
}

#[test]
fn test_buffer_bound_holds_for_bursts() {
    for capacity in [0, 1, 2, 7] {
        let mut buffer = LogBuffer::new(capacity);
        for k in 0..(capacity + 5) {
            buffer.append(LogLine::new(format!("{}", k)));
            assert!(buffer.snapshot().len() <= capacity);
        }

        let expected: Vec<String> = (5..capacity + 5).map(|k| k.to_string()).collect();
        let snapshot: Vec<String> = buffer.snapshot().iter().map(|l| l.to_string()).collect();
        assert_eq!(snapshot, expected);

        buffer.clear();
        assert!(buffer.snapshot().is_empty());
    }
}

#[test]
fn test_enabled_category_colors_keyword() {
    let mut colorizer = KeywordColorizer::new(slime_category(true), 100, CacheMode::Fragment, enemy_names(&[]));
    assert_eq!(colorizer.colorize("A Slime attacks!"), r"A \c[26]Slime\c[0] attacks!");
}

#[test]
fn test_disabled_category_leaves_text() {
    let mut colorizer = KeywordColorizer::new(slime_category(false), 100, CacheMode::Fragment, enemy_names(&[]));
    assert_eq!(colorizer.colorize("A Slime attacks!"), "A Slime attacks!");
}

#[test]
fn test_cache_of_one_keeps_latest_pair() {
    let mut colorizer = KeywordColorizer::new(
        vec![
            ColorCategory::builtin(EntityKind::Enemy, 26, true),
            ColorCategory::custom("magic", vec!["Fire".to_string()], 4),
        ],
        1,
        CacheMode::Fragment,
        enemy_names(&["Slime"]),
    );

    colorizer.colorize("A Slime appears.");
    colorizer.colorize("Fire!");

    assert_eq!(colorizer.cache_len(), 1);
    assert_eq!(colorizer.cached_fragments(), vec![("Fire".to_string(), 4)]);
}

#[test]
fn test_invalidate_recomputes_same_result() {
    for mode in [CacheMode::Fragment, CacheMode::Line] {
        let mut colorizer = KeywordColorizer::new(
            vec![ColorCategory::builtin(EntityKind::Enemy, 26, true)],
            10,
            mode,
            enemy_names(&["Slime"]),
        );

        let before = colorizer.colorize("A Slime attacks!");
        colorizer.invalidate();
        let after = colorizer.colorize("A Slime attacks!");

        assert_eq!(before, after);
        assert_eq!(colorizer.cache_len(), 1);
    }
}

#[test]
fn test_double_colorize_is_accepted_quirk() {
    let mut colorizer = KeywordColorizer::new(
        vec![ColorCategory::builtin(EntityKind::Enemy, 26, true)],
        10,
        CacheMode::Fragment,
        enemy_names(&["Slime"]),
    );

    let once = colorizer.colorize("Slime");
    assert_eq!(colorizer.colorize(&once), r"\c[26]\c[26]Slime\c[0]\c[0]");
}

#[test]
fn test_cache_size_zero_still_colors() {
    let mut colorizer = KeywordColorizer::new(
        vec![ColorCategory::builtin(EntityKind::Enemy, 26, true)],
        0,
        CacheMode::Fragment,
        enemy_names(&["Slime"]),
    );

    assert_eq!(colorizer.colorize("Slime"), r"\c[26]Slime\c[0]");
    assert_eq!(colorizer.cache_len(), 0);
}

#[test]
fn test_session_battle_flow() {
    let mut session = create_test_session(3);

    session.add_text("Reid attacks!");
    session.add_text("Slime takes 12 damage.");
    session.add_text("Priscilla casts Fire!");
    session.add_text("Reid uses Potion!");

    assert_eq!(session.visible_rows(), 3);
    assert_eq!(
        drain_frame(&mut session),
        Some(vec![
            r"\c[26]Slime\c[0] takes 12 damage.".to_string(),
            r"\c[1]Priscilla\c[0] casts \c[4]Fire\c[0]!".to_string(),
            r"\c[1]Reid\c[0] uses \c[3]Potion\c[0]!".to_string(),
        ])
    );

    session.handle(HostEvent::BattleEnd { in_battle: true });
    assert_eq!(drain_frame(&mut session), Some(Vec::new()));
}

#[test]
fn test_session_cache_lifecycle() {
    let mut session = create_test_session(8);

    session.add_text("Bat bites Reid.");
    assert_eq!(session.colorizer().cache_len(), 2);

    session.handle(HostEvent::MapChanged { map_id: 2 });
    assert_eq!(session.colorizer().cache_len(), 0);

    session.add_text("Bat bites Reid.");
    session.handle(HostEvent::Command(PluginCommand::ClearCache));
    assert_eq!(session.colorizer().cache_len(), 0);

    // The log itself is untouched by cache clears
    assert_eq!(session.log().len(), 2);
}

#[test]
fn test_game_data_reload_changes_names() {
    let mut session = create_test_session(8);

    session.add_text("Goblin appears!");
    session
        .colorizer_mut()
        .source_mut()
        .enemies
        .entries
        .push(Some(battlelog::data::NamedEntity::new(3, "Goblin")));
    session.add_text("Goblin appears!");

    assert_eq!(
        drain_frame(&mut session),
        Some(vec![
            "Goblin appears!".to_string(),
            r"\c[26]Goblin\c[0] appears!".to_string(),
        ])
    );
}

#[test]
fn test_bad_user_category_does_not_stop_others() {
    let mut config = Config::default();
    config.colors.additional = vec![
        CustomColorConfig {
            name: None,
            color: ColorValue::Code(17),
            keywords: KeywordList::Encoded("not a list".into()),
        },
        CustomColorConfig {
            name: Some("status".into()),
            color: ColorValue::Text("10".into()),
            keywords: KeywordList::List(vec!["poisoned".into()]),
        },
    ];
    let mut session = battlelog::session::BattleLogSession::new(&config, common::sample_game_data());

    session.add_text("Slime is poisoned.");

    assert_eq!(session.colorizer().config_errors().len(), 1);
    assert_eq!(
        drain_frame(&mut session),
        Some(vec![r"\c[26]Slime\c[0] is \c[10]poisoned\c[0].".to_string()])
    );
}

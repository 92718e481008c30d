use std::io::Cursor;

use behavior_tree::{
    Action, BuildError, Condition, DebugLevel, ParseError, ParserConfig, StatementCollector, Status,
    Task, TreeParser, TreeReader,
};

#[derive(Debug, Default)]
struct Arena {
    enemy_distance: f32,
    damage: f64,
    patrol_legs: u32,
}

const GUARD_AI: &str = "\
# guard AI
selector
  ?enemy-near attack(power:2.5)   # fight when close
  repeat(times:2) ->patrol
";

fn guard_parser(config: ParserConfig) -> TreeParser<Arena> {
    let mut parser = TreeParser::with_config(config);
    parser
        .register("enemy-near", |attributes| {
            attributes.expect_only("enemy-near", &["range"])?;
            let range = attributes.float("range")?.unwrap_or(2.0) as f32;
            let task: Box<dyn Task<Arena>> = Box::new(Condition::new(
                "enemy-near",
                move |arena: &Arena| arena.enemy_distance <= range,
            ));
            Ok(task)
        })
        .register("attack", |attributes| {
            attributes.expect_only("attack", &["power"])?;
            let power = attributes
                .float("power")?
                .ok_or_else(|| BuildError::MissingAttribute {
                    task: "attack".into(),
                    attribute: "power".into(),
                })?;
            let task: Box<dyn Task<Arena>> =
                Box::new(Action::new("attack", move |arena: &mut Arena, _dt| {
                    arena.damage += power;
                    Status::Succeeded
                }));
            Ok(task)
        })
        .register("walk", |attributes| {
            attributes.expect_only("walk", &[])?;
            let task: Box<dyn Task<Arena>> =
                Box::new(Action::new("walk", |arena: &mut Arena, _dt| {
                    arena.patrol_legs += 1;
                    Status::Succeeded
                }));
            Ok(task)
        });
    parser
        .parse_subtree("patrol", "sequence\n  walk\n  wait(seconds:0.5)\n")
        .expect("patrol subtree should parse");
    parser
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_guard_ai_patrols_then_attacks() {
    let parser = guard_parser(ParserConfig::default());
    let mut tree = parser
        .parse(
            GUARD_AI,
            Arena {
                enemy_distance: 10.0,
                ..Arena::default()
            },
        )
        .expect("guard AI should parse");

    // Two patrol legs, each a walk plus a half-second wait.
    let statuses: Vec<_> = (0..4).map(|_| tree.step(0.5).unwrap()).collect();
    assert_eq!(
        statuses,
        [
            Status::Running,
            Status::Running,
            Status::Running,
            Status::Succeeded
        ]
    );
    assert_eq!(tree.blackboard().patrol_legs, 2);
    assert_eq!(tree.blackboard().damage, 0.0);

    tree.blackboard_mut().enemy_distance = 1.0;
    assert_eq!(tree.step(0.5), Ok(Status::Succeeded));
    assert_eq!(tree.blackboard().damage, 2.5);
}

#[test]
fn test_parse_reader_with_windows_line_endings() {
    let parser = guard_parser(ParserConfig::default());
    let source = Cursor::new(GUARD_AI.replace('\n', "\r\n").into_bytes());

    let mut tree = parser
        .parse_reader(
            source,
            Arena {
                enemy_distance: 0.5,
                ..Arena::default()
            },
        )
        .expect("CRLF source should parse");
    assert_eq!(tree.step(0.1), Ok(Status::Succeeded));
    assert_eq!(tree.blackboard().damage, 2.5);
}

#[test]
fn test_debug_output_under_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let config = ParserConfig::new()
        .with_reports_comments(true)
        .with_debug_level("HIGH".parse::<DebugLevel>().unwrap());
    let parser = guard_parser(config);
    assert_eq!(parser.config().debug_level, DebugLevel::High);

    let tree = parser.parse(GUARD_AI, Arena::default()).unwrap();
    // selector, enemy-near, attack, repeat, and the three patrol tasks
    assert_eq!(tree.task_count(), 7);
}

#[test]
fn test_each_reference_gets_its_own_instance() {
    let parser = guard_parser(ParserConfig::default());
    let mut tree = parser
        .parse("sequence\n  ->patrol\n  ->patrol\n", Arena::default())
        .unwrap();

    assert_eq!(tree.step(0.5), Ok(Status::Running));
    assert_eq!(tree.step(0.5), Ok(Status::Running));
    assert_eq!(tree.step(0.5), Ok(Status::Succeeded));
    assert_eq!(tree.blackboard().patrol_legs, 2);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_error_messages_name_the_line() {
    let parser = guard_parser(ParserConfig::default());

    let err = parser
        .parse_template("selector\n  ->ambush\n")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "error building behavior tree on line 2: unknown subtree 'ambush'"
    );
    assert_eq!(err.error_code(), "BUILD_UNKNOWN_SUBTREE");

    let err = parser.parse_template("selector\n  attack\n").unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert!(matches!(
        err,
        ParseError::Build {
            error: BuildError::MissingAttribute { .. },
            ..
        }
    ));

    let err = parser
        .parse_template("selector\n  enemy-near(range:\"far\")\n")
        .unwrap_err();
    assert_eq!(err.error_code(), "BUILD_INVALID_ATTRIBUTE");

    let err = parser
        .parse_template("selector\n  wait(seconds 1)\n")
        .unwrap_err();
    assert!(matches!(err, ParseError::Syntax { line: 2, .. }));
}

#[test]
fn test_failed_parse_leaves_library_untouched() {
    let mut parser = guard_parser(ParserConfig::default());
    assert!(parser.parse_subtree("broken", "sequence\n  ->missing").is_err());
    assert!(!parser.library().contains("broken"));
    assert!(parser.library().contains("patrol"));
}

// ============================================================================
// Reader only
// ============================================================================

#[test]
fn test_statement_collector_sees_raw_structure() {
    let mut collector = StatementCollector::new();
    TreeReader::with_comments(true)
        .parse(GUARD_AI, &mut collector)
        .unwrap();

    assert_eq!(collector.comments(), [" guard AI", " fight when close"]);
    let rendered: Vec<Vec<String>> = collector
        .lines()
        .iter()
        .map(|line| line.statements.iter().map(ToString::to_string).collect())
        .collect();
    assert_eq!(
        rendered,
        [
            vec!["selector"],
            vec!["?enemy-near", "attack(power:2.5)"],
            vec!["repeat(times:2)", "->patrol"],
        ]
    );
}

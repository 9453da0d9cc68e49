use super::*;

#[test]
fn parse_row_from_bare_array() {
    let row = parse_row(r#"[null, "A", "B"]"#, 1).unwrap();
    assert_eq!(row.min(), 1);
    assert_eq!(row.max(), 3);
    assert!(row.is_vacant(1));
    assert_eq!(row.get(3).map(String::as_str), Some("B"));
}

#[test]
fn parse_row_from_snapshot_ignores_min_flag() {
    let row = parse_row(r#"{"min": -1, "slots": ["A", null]}"#, 1).unwrap();
    assert_eq!(row.min(), -1);
    assert_eq!(row.max(), 0);
}

#[test]
fn parse_row_rejects_empty_array() {
    assert!(matches!(parse_row("[]", 1), Err(CliError::Row(SlotError::InvalidLength(0)))));
}

#[test]
fn parse_row_rejects_garbage() {
    assert!(matches!(parse_row("not json", 1), Err(CliError::InvalidJson(_))));
}

#[test]
fn insert_report_contains_shift_and_row() {
    let row = parse_row(r#"[null, "A", "B"]"#, 1).unwrap();
    let (report, ok) = run_insert(row, 3, "C".into(), Direction::Backward);

    assert!(ok);
    assert_eq!(report["shift"]["empty_slot"], 1);
    assert_eq!(report["row"]["slots"], json!(["A", "B", "C"]));
}

#[test]
fn insert_report_on_no_space() {
    let row = parse_row(r#"["X", "A", "B"]"#, 1).unwrap();
    let (report, ok) = run_insert(row, 3, "C".into(), Direction::Backward);

    assert!(!ok);
    assert_eq!(report["code"], "E_NO_SPACE");
    assert_eq!(report["row"]["slots"], json!(["X", "A", "B"]));
}

#[test]
fn scan_reports_nearest_gap() {
    let row = parse_row(r#"[null, null, "B"]"#, 1).unwrap();
    let report = run_scan(&row, 3, Direction::Backward);
    assert_eq!(report["empty_slot"], 2);
    assert_eq!(report["direction"], "backward");
}

#[test]
fn cli_parses_insert_command() {
    let cli = Cli::try_parse_from([
        "slotrow",
        "--row",
        "[null,\"A\"]",
        "insert",
        "--target",
        "2",
        "--card",
        "N",
        "--direction",
        "backward",
    ])
    .unwrap();

    assert_eq!(cli.source.row.as_deref(), Some("[null,\"A\"]"));
    match cli.command {
        Command::Insert { target, card, direction } => {
            assert_eq!(target, 2);
            assert_eq!(card, "N");
            assert_eq!(Direction::from(direction), Direction::Backward);
        }
        Command::Move { .. } | Command::Scan { .. } => panic!("expected insert"),
    }
}

#[test]
fn load_row_requires_a_source() {
    let source = RowSource { min: 1, row: None, row_file: None };
    assert!(matches!(load_row(&source), Err(CliError::MissingRow)));
}

#[test]
fn explicit_row_wins_over_row_file() {
    let cli = Cli::try_parse_from([
        "slotrow",
        "--row-file",
        "/nonexistent/row.json",
        "--row",
        "[null,\"A\"]",
        "scan",
        "--target",
        "2",
        "--direction",
        "backward",
    ])
    .unwrap();

    let row = load_row(&cli.source).unwrap();
    assert_eq!(row.get(2).map(String::as_str), Some("A"));
    assert!(row.is_vacant(1));
}

#[test]
fn cli_parses_move_command() {
    let cli = Cli::try_parse_from([
        "slotrow", "--row", "[]", "move", "--from", "-1", "--to", "3", "--direction", "forward",
    ])
    .unwrap();

    match cli.command {
        Command::Move { from, to, direction } => {
            assert_eq!((from, to), (-1, 3));
            assert_eq!(Direction::from(direction), Direction::Forward);
        }
        Command::Insert { .. } | Command::Scan { .. } => panic!("expected move"),
    }
}

#[test]
fn move_report_on_success_and_no_space() {
    let row = parse_row(r#"["M", "A", null]"#, 1).unwrap();
    let (report, ok) = run_move(row, 1, 2, Direction::Forward);
    assert!(ok);
    assert_eq!(report["row"]["slots"], json!([null, "M", "A"]));

    let row = parse_row(r#"["M", "A", "B"]"#, 1).unwrap();
    let (report, ok) = run_move(row, 1, 3, Direction::Backward);
    assert!(!ok);
    assert_eq!(report["code"], "E_NO_SPACE");
    assert_eq!(report["row"]["slots"], json!(["M", "A", "B"]));
}

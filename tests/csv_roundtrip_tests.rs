use trajviz::adapters::inbound::TrajectoryCsvImporter;
use trajviz::adapters::outbound::export_trajectories;
use trajviz::common::{ExportError, ImportError};
use trajviz::domains::trajectory::{build_trajectories, parse_answer, Coordinate, CoordinateOrder};

const ANSWER: &str = "position(0,(1,2),n,0) position(0,(1,3),n,1) action(train(0),move_forward,0) \
                      position(1,(24,4),w,0) action(train(1),wait,1) position(1,(24,3),w,2)";

#[test]
fn test_export_then_import_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answers").join("answer_1.csv");
    let original = build_trajectories(parse_answer(ANSWER));

    export_trajectories(&original, &path).unwrap();
    let imported = TrajectoryCsvImporter::default().import_path(&path).unwrap();

    assert_eq!(imported.without_actions(), original.without_actions());
    assert_eq!(imported, original);
}

#[test]
fn test_table_without_action_column_matches_up_to_actions() {
    let original = build_trajectories(parse_answer(ANSWER));
    let table = "agent;timestep;position\n\
                 0;0;(1, 2)\n\
                 0;1;(1, 3)\n\
                 1;0;(np.int64(24), np.int64(4))\n\
                 1;1;\n\
                 1;2;(24, 3)\n";

    let imported = TrajectoryCsvImporter::default()
        .import_reader(table.as_bytes())
        .unwrap();
    assert_eq!(imported, original.without_actions());
    assert_eq!(imported.get(1).unwrap().waypoints[1].position, None);
}

#[test]
fn test_extra_columns_and_col_row_order() {
    let table = "idx;agent;timestep;position;direction\n\
                 0;3;0;(np.int64(7), np.int64(2));1\n";
    let imported = TrajectoryCsvImporter::new(b';', CoordinateOrder::ColRow)
        .import_reader(table.as_bytes())
        .unwrap();
    assert_eq!(
        imported.get(3).unwrap().waypoints[0].position,
        Some(Coordinate::new(2, 7))
    );
}

#[test]
fn test_unparsable_position_is_reported_with_its_row() {
    let table = "agent;timestep;position\n0;0;(1, 2)\n0;1;somewhere\n";
    let err = TrajectoryCsvImporter::default()
        .import_reader(table.as_bytes())
        .unwrap_err();
    match err {
        ImportError::Position { row, text } => {
            assert_eq!(row, 2);
            assert_eq!(text, "somewhere");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_missing_file_is_an_open_error() {
    let err = TrajectoryCsvImporter::default()
        .import_path("/nonexistent/trajectories.csv")
        .unwrap_err();
    assert!(matches!(err, ImportError::Open { .. }));
}

#[test]
fn test_export_failure_is_an_export_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("answers");
    std::fs::write(&blocker, "not a directory").unwrap();
    let original = build_trajectories(parse_answer(ANSWER));

    let err = export_trajectories(&original, blocker.join("answer_1.csv")).unwrap_err();
    assert!(matches!(err, ExportError::CreateDir { path, .. } if path == blocker));

    let err = export_trajectories(&original, dir.path()).unwrap_err();
    assert!(matches!(err, ExportError::Write { .. }));
}

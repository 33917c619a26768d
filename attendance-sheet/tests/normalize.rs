use attendance_core::{AttendanceError, DashboardConfig};
use attendance_sheet::{
    find_status_column, grid_from_value, normalize_csv, normalize_grid, parse_csv,
    summarize_csv_bytes, summarize_grid_json_str,
};
use serde_json::json;

#[test]
fn csv_tokenizer_handles_quotes_and_blank_lines() {
    let grid = parse_csv(
        "\u{feff}Paciente;Status\r\n\"Silva; Ana\";\"Atendido\"\r\n   \n\nBruno;\"\"\nCarla;Falta;\n",
    );

    assert_eq!(
        grid,
        vec![
            vec!["Paciente", "Status"],
            vec!["Silva; Ana", "Atendido"],
            vec!["Bruno", ""],
            vec!["Carla", "Falta", ""],
        ]
    );
}

#[test]
fn csv_and_grid_inputs_produce_the_same_records() {
    let config = DashboardConfig::default();
    let from_csv = normalize_csv("Paciente;Status\nAna;Atendido\n", &config)
        .expect("Không chuẩn hóa được CSV");
    let from_grid = normalize_grid(
        &[vec!["Paciente", "Status"], vec!["Ana", "Atendido"]],
        &config,
    )
    .expect("Không chuẩn hóa được grid");

    assert_eq!(from_csv, from_grid);
    assert_eq!(from_csv.status_column, "Status");
    assert_eq!(from_csv.records.len(), 1);
    assert_eq!(from_csv.records[0].get("Paciente"), Some("Ana"));
}

#[test]
fn status_column_found_by_keyword() {
    let config = DashboardConfig::default();
    assert_eq!(
        find_status_column(&["Paciente", "Data", "SITUAÇÃO do agendamento"], &config),
        Some(2)
    );
    assert_eq!(find_status_column(&["Condicao", "Status"], &config), Some(0));
    assert_eq!(find_status_column(&["  state  "], &config), Some(0));
}

#[test]
fn positional_fallback_needs_more_than_ten_columns() {
    let config = DashboardConfig::default();
    let eleven: Vec<String> = (0..11).map(|i| format!("col{i}")).collect();
    let ten: Vec<String> = (0..10).map(|i| format!("col{i}")).collect();

    assert_eq!(find_status_column(&eleven, &config), Some(10));
    assert_eq!(find_status_column(&ten, &config), None);

    let without_fallback = DashboardConfig {
        status_fallback_index: None,
        ..DashboardConfig::default()
    };
    assert_eq!(find_status_column(&eleven, &without_fallback), None);

    let custom = DashboardConfig {
        status_keywords: vec!["Presença".to_string()],
        status_fallback_index: Some(1),
    };
    assert_eq!(find_status_column(&["Nome", "Presença"], &custom), Some(1));
    assert_eq!(find_status_column(&["Nome", "Status", "Obs"], &custom), Some(1));
}

#[test]
fn missing_status_column_is_reported() {
    let config = DashboardConfig::default();

    let with_rows = normalize_grid(&[vec!["A", "B", "C"], vec!["1", "2", "3"]], &config);
    assert_eq!(with_rows, Err(AttendanceError::MissingStatusColumn));

    let header_only = normalize_grid(&[vec!["A", "B", "C"]], &config);
    assert_eq!(header_only, Err(AttendanceError::MissingStatusColumn));
}

#[test]
fn empty_inputs_are_rejected() {
    let config = DashboardConfig::default();

    let no_rows: Vec<Vec<String>> = Vec::new();
    assert_eq!(
        normalize_grid(&no_rows, &config),
        Err(AttendanceError::EmptyInput)
    );
    assert_eq!(
        normalize_grid(&[vec!["Paciente", "Status"]], &config),
        Err(AttendanceError::EmptyInput)
    );
    assert_eq!(
        normalize_csv("\n  \n", &config),
        Err(AttendanceError::EmptyInput)
    );
    assert_eq!(
        normalize_csv("Paciente;Status\nAna;\nBruno;\"\"\n", &config),
        Err(AttendanceError::EmptyInput)
    );
}

#[test]
fn rows_are_padded_trimmed_and_filtered() {
    let grid = vec![
        vec!["Paciente", "Status", "Data"],
        vec!["  Ana ", "Atendido"],
        vec!["Bruno", "   "],
        vec!["Carla", "\"\""],
        vec!["Diego", "  Falta  ", "2024-01-01", "extra"],
    ];

    let sheet =
        normalize_grid(&grid, &DashboardConfig::default()).expect("Không chuẩn hóa được grid");

    assert_eq!(sheet.records.len(), 2);
    let ana = &sheet.records[0];
    assert_eq!(ana.get("Paciente"), Some("Ana"));
    assert_eq!(ana.get("Data"), Some(""));
    let diego = &sheet.records[1];
    assert_eq!(diego.get("Status"), Some("Falta"));
    assert_eq!(diego.len(), 3);
}

#[test]
fn typed_cells_are_stringified() {
    let value = json!([
        ["Paciente", "Status", "Sessões"],
        ["Ana", "Atendido", 3],
        ["Bruno", null, 2.5],
        null,
        ["Carla", true, 4.0]
    ]);

    let grid = grid_from_value(&value).expect("Không đọc được grid");

    assert_eq!(grid[1], vec!["Ana", "Atendido", "3"]);
    assert_eq!(grid[2], vec!["Bruno", "", "2.5"]);
    assert!(grid[3].is_empty());
    assert_eq!(grid[4], vec!["Carla", "true", "4"]);
}

#[test]
fn malformed_sources_are_reported() {
    let config = DashboardConfig::default();

    assert!(matches!(
        grid_from_value(&json!({"rows": []})),
        Err(AttendanceError::MalformedFile(_))
    ));
    assert!(matches!(
        grid_from_value(&json!([["Status"], "Atendido"])),
        Err(AttendanceError::MalformedFile(_))
    ));
    assert!(matches!(
        summarize_grid_json_str("not json", &config),
        Err(AttendanceError::MalformedFile(_))
    ));
    assert!(matches!(
        summarize_csv_bytes(&[0xff, 0xfe, 0x00], &config),
        Err(AttendanceError::MalformedFile(_))
    ));
}

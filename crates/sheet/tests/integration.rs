use tempfile::tempdir;
use tripdash_sheet::{CellValue, CsvOptions, Sheet, SheetError, XlsxReadOptions};

fn roster() -> Sheet {
    Sheet::from_table(
        "Clientes",
        &["Nome", "Profissão", "Celular", "Viagens"],
        vec![
            vec![
                "Ana".into(),
                "Aposentada".into(),
                CellValue::Float(11_987_654_321.0),
                "paris, Paris ,  rome".into(),
            ],
            vec!["Bob".into(), "Engenheiro".into(), "21 99999-0000".into(), CellValue::Null],
        ],
    )
    .unwrap()
}

fn text(column: &[CellValue]) -> Vec<String> {
    column.iter().map(CellValue::as_str).collect()
}

#[test]
fn test_roster_workbook_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clientes.xlsx");
    roster().save_as_xlsx(&path).unwrap();

    let options = XlsxReadOptions::default()
        .with_headers(true)
        .with_sheet(Some("Clientes".to_string()));
    let loaded = Sheet::from_xlsx_with_options(&path, &options).unwrap();

    assert_eq!(loaded.data_rows().count(), 2);
    assert_eq!(text(&loaded.column_by_name("Celular").unwrap()), vec!["11987654321", "21 99999-0000"]);
    let trips = loaded.column_by_name("Viagens").unwrap();
    assert_eq!(trips[0].as_str(), "paris, Paris ,  rome");
    assert!(trips[1].is_blank());
}

#[test]
fn test_export_table_keeps_order() {
    let sheet = Sheet::from_table(
        "dados",
        &["Cliente", "Quantidade de Destinos"],
        vec![
            vec!["Ana".into(), CellValue::Int(2)],
            vec!["Bob".into(), CellValue::Int(0)],
        ],
    )
    .unwrap();

    let back = Sheet::from_xlsx_bytes(
        &sheet.to_xlsx_bytes().unwrap(),
        &XlsxReadOptions::default().with_headers(true),
    )
    .unwrap();

    assert_eq!(back.name(), "dados");
    assert_eq!(back.column_names().unwrap(), vec!["Cliente", "Quantidade de Destinos"]);
    assert_eq!(text(&back.column_by_name("Cliente").unwrap()), vec!["Ana", "Bob"]);
    let counts: Vec<i64> = back
        .column_by_name("Quantidade de Destinos")
        .unwrap()
        .iter()
        .filter_map(CellValue::as_int)
        .collect();
    assert_eq!(counts, vec![2, 0]);
}

#[test]
fn test_missing_workbook() {
    let dir = tempdir().unwrap();
    let result = Sheet::from_xlsx_with_options(dir.path().join("missing.xlsx"), &XlsxReadOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_csv_roster() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clientes.csv");
    std::fs::write(
        &path,
        "Nome,Profissão,Celular,Viagens\nAna,Aposentada,011999,\"paris, rome\"\nBob,Engenheiro,,\n",
    )
    .unwrap();

    let sheet = Sheet::from_csv_with_options(&path, &CsvOptions::default().with_headers(true)).unwrap();

    assert_eq!(sheet.name(), "clientes");
    assert_eq!(text(&sheet.column_by_name("Celular").unwrap()), vec!["011999", ""]);
    assert_eq!(sheet.column_by_name("Viagens").unwrap()[1], CellValue::Null);
}

#[test]
fn test_csv_repeated_headers() {
    let sheet = Sheet::from_csv_reader(
        "Nome,Obs,Celular,Obs\nAna,vip,111,antiga\n".as_bytes(),
        &CsvOptions::default().with_headers(true),
    )
    .unwrap();
    assert_eq!(text(&sheet.column_by_name("Obs").unwrap()), vec!["vip"]);
    assert_eq!(text(&sheet.column_by_name("Celular").unwrap()), vec!["111"]);
}

#[test]
fn test_csv_missing_file() {
    let result = Sheet::from_csv_with_options("/definitely/not/here.csv", &CsvOptions::default());
    assert!(matches!(result, Err(SheetError::Io(_))));
}

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};

use rusty_quota::data::{
    CellValue, ColumnType, LoadOptions, MemoryFile, Table, load_file, load_path,
};

fn column_types(table: &Table) -> Vec<ColumnType> {
    table.columns().iter().map(|c| c.data.column_type()).collect()
}

/// Weekly quota sheet: text, whole numbers, decimals, flags and dates.
fn quota_workbook() -> Result<Vec<u8>, XlsxError> {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let stamp_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Cuotas")?;
    for (col, name) in ["ruta", "semana", "cuota", "activo", "inicio", "corte"]
        .into_iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, name)?;
    }

    let rows = [
        ("R-NORTE", 1, 1500.5, true, 15),
        ("R-SUR", 2, 980.0, false, 22),
        ("R-CENTRO", 3, 1200.25, true, 29),
    ];
    for (i, (route, week, quota, active, day)) in rows.into_iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, route)?;
        sheet.write_number(row, 1, week)?;
        sheet.write_number(row, 2, quota)?;
        sheet.write_boolean(row, 3, active)?;
        sheet.write_datetime_with_format(
            row,
            4,
            ExcelDateTime::from_ymd(2024, 1, day)?,
            &date_format,
        )?;
        sheet.write_datetime_with_format(
            row,
            5,
            ExcelDateTime::from_ymd(2024, 1, day)?.and_hms(18, 30, 0)?,
            &stamp_format,
        )?;
    }

    // A second sheet must never be read.
    workbook.add_worksheet().write_string(0, 0, "ignorada")?;
    workbook.save_to_buffer()
}

#[test]
fn xlsx_first_sheet_is_decoded_with_types_and_dates() {
    let bytes = quota_workbook().unwrap();
    let table = load_file(&mut MemoryFile::new("cuotas.xlsx", bytes)).unwrap();

    assert_eq!(
        table.column_names(),
        vec!["ruta", "semana", "cuota", "activo", "inicio", "corte"]
    );
    assert_eq!(table.num_rows(), 3);
    assert_eq!(table.num_columns(), 6);
    assert_eq!(
        column_types(&table),
        vec![
            ColumnType::Utf8,
            ColumnType::Int64,
            ColumnType::Float64,
            ColumnType::Boolean,
            ColumnType::Utf8,
            ColumnType::Utf8,
        ]
    );
    assert_eq!(table.cell(0, 0), Some(CellValue::String("R-NORTE".into())));
    assert_eq!(table.cell(1, 1), Some(CellValue::Integer(2)));
    assert_eq!(table.cell(1, 2), Some(CellValue::Float(980.0)));
    assert_eq!(table.cell(2, 3), Some(CellValue::Bool(true)));
    assert_eq!(table.cell(0, 4), Some(CellValue::String("2024-01-15".into())));
    assert_eq!(
        table.cell(2, 5),
        Some(CellValue::String("2024-01-29 18:30:00".into()))
    );
}

#[test]
fn xlsx_extension_is_case_insensitive() {
    let bytes = quota_workbook().unwrap();
    let upper = load_file(&mut MemoryFile::new("CUOTAS.XLSX", bytes.clone())).unwrap();
    let lower = load_file(&mut MemoryFile::new("cuotas.xlsx", bytes)).unwrap();
    assert_eq!(upper, lower);
}

#[test]
fn xls_fixture_is_decoded() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rutas.xls");
    let table = load_path(path, &LoadOptions::default()).unwrap();

    assert_eq!(table.column_names(), vec!["ruta", "semana", "cuota", "activo"]);
    assert_eq!(table.num_rows(), 3);
    assert_eq!(
        column_types(&table),
        vec![
            ColumnType::Utf8,
            ColumnType::Int64,
            ColumnType::Float64,
            ColumnType::Boolean,
        ]
    );
    assert_eq!(table.cell(0, 1), Some(CellValue::Integer(1)));
    assert_eq!(table.cell(1, 2), Some(CellValue::Float(980.0)));
    assert_eq!(table.cell(2, 3), Some(CellValue::Bool(true)));
}

#[test]
fn xls_bytes_under_an_xlsx_name_are_malformed() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rutas.xls");
    let bytes = std::fs::read(path).unwrap();
    let err = load_file(&mut MemoryFile::new("rutas.xlsx", bytes)).unwrap_err();
    assert!(matches!(
        err,
        rusty_quota::data::LoadError::MalformedContent { .. }
    ));
}

//! Smoke tests for the gispd binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with the user configuration directory pointed into `home`.
fn gispd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gispd").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .current_dir(home.path());
    cmd
}

fn write_document(path: &Path) {
    let cells: &[(u32, u32, &str)] = &[
        (0, 0, "  Платежный документ (счёт) за Март 2024 г."),
        (7, 6, "л/с 555"),
        (8, 0, "ул. Ленина, д. 1, кв. 7"),
        (9, 0, "Пл.:  30 кв.м."),
        (12, 0, "р/счет 40702810000000000001 в банке БИК 045004641"),
        (14, 0, "Услуга"),
        (15, 0, "охрана"),
        (15, 4, "100"),
        (15, 6, "100"),
        (15, 10, "100"),
        (16, 0, "Итого"),
        (16, 10, "100"),
        (17, 0, "Отчисления на капитальный ремонт"),
    ];

    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    for (row, col, text) in cells {
        sheet
            .get_cell_mut((col + 1, row + 1))
            .set_value_string(*text);
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

#[test]
fn config_path_reports_missing_file() {
    let home = TempDir::new().unwrap();
    gispd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn config_init_then_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("gispd.json");
    let config = config.to_str().unwrap();

    gispd(&home)
        .args(["config", "init", "--output", config])
        .assert()
        .success();

    gispd(&home)
        .args(["--config", config, "config", "get", "paths.output_file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PDTemplate.xlsx"));

    gispd(&home)
        .args(["--config", config, "config", "set", "output.skip_existing", "true"])
        .assert()
        .success();

    gispd(&home)
        .args(["--config", config, "config", "get", "output.skip_existing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));
}

#[test]
fn batch_on_empty_directory() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("In");
    std::fs::create_dir_all(&input).unwrap();

    gispd(&home)
        .args(["batch", "--input-dir", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No payment documents found"));
}

#[test]
fn process_missing_file_fails() {
    let home = TempDir::new().unwrap();
    gispd(&home)
        .args(["process", "missing.xls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_prints_json() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("doc.xlsx");
    write_document(&input);

    gispd(&home)
        .args(["process", input.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"document_number\": \"2403555\""))
        .stdout(predicate::str::contains("Оплата охранных услуг"));
}

#[test]
fn process_write_appends_to_workbook() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("doc.xlsx");
    write_document(&input);

    gispd(&home)
        .args(["process", input.to_str().unwrap(), "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document 2403555 appended"));

    assert!(home.path().join("PDTemplate.xlsx").exists());
}

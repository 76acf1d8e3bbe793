use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CASE: &str = "function mpc = case2
mpc.version = '2';
mpc.baseMVA = 100;
mpc.bus = [
\t1\t3\t0\t0\t0\t0\t1\t1\t0\t110\t1\t1.1\t0.9;
\t2\t1\t30\t10\t0\t-5\t1\t1\t0\t110\t1\t1.1\t0.9;
];
mpc.gen = [
\t1\t0\t0\t100\t-100\t1\t100\t1\t200\t0;
];
mpc.branch = [
\t1\t2\t0.01\t0.05\t0.02\t100\t100\t100\t0\t0\t1;
];
";

fn write_dataset(dataset: &Path) {
    fs::create_dir_all(dataset.join("matpower")).unwrap();
    fs::create_dir_all(dataset.join("shunts")).unwrap();
    fs::write(dataset.join("matpower/case2.m"), CASE).unwrap();
    fs::write(
        dataset.join("shunts/case2.csv"),
        "bus,Bs,Gs,vn_kv,max_step,status\n1,-5.0,0.0,110.0,1,True\n",
    )
    .unwrap();
}

fn gridconv() -> Command {
    Command::cargo_bin("gridconv").unwrap()
}

#[test]
fn gridconv_import_then_export() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("grids");
    write_dataset(&dataset);

    gridconv()
        .arg("import")
        .arg(&dataset)
        .assert()
        .success()
        .stdout(predicate::str::contains("import: 1 case(s) converted"));
    let imported = dir.path().join("grids_pandapower");
    assert!(imported.join("case2.json").is_file());

    gridconv()
        .args(["--log-level", "warn", "export"])
        .arg(&imported)
        .assert()
        .success()
        .stdout(predicate::str::contains("export: 1 case(s) converted"));
    let exported = dir.path().join("grids_pandapower_matpower");
    let case = fs::read_to_string(exported.join("matpower/case2.m")).unwrap();
    assert!(case.starts_with("function mpc = powergrid"));
    assert!(exported.join("shunts/case2.csv").is_file());
}

#[test]
fn gridconv_fails_with_exit_code_two() {
    let dir = tempdir().unwrap();
    gridconv()
        .arg("import")
        .arg(dir.path().join("missing"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("listing input directory"));
}

#[test]
fn gridconv_refuses_existing_output_root() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("grids");
    write_dataset(&dataset);
    fs::create_dir(dir.path().join("grids_pandapower")).unwrap();

    gridconv()
        .arg("import")
        .arg(&dataset)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("creating batch output root"));
}

#[test]
fn gridconv_rejects_unknown_log_level() {
    gridconv()
        .args(["--log-level", "loud", "import", "x"])
        .assert()
        .failure();
}

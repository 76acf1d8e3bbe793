//! End-to-end tests for the import and export pipelines.

use std::fs;
use std::path::{Path, PathBuf};

use gridconv_core::idx::{BR_STATUS, BS, BUS_TYPE, GEN_STATUS, PV, REF, VMAX, VMIN};
use gridconv_core::{GridError, GridModel, Shunt, TableKey};
use tempfile::{tempdir, TempDir};

use crate::exporters::{export_case, export_model_to_pandapower};
use crate::importers::{import_case, load_pandapower_model, parse_matpower_file};

const CASE3: &str = "function mpc = case3
mpc.version = '2';
mpc.baseMVA = 100;
mpc.bus = [
\t1\t3\t0\t0\t0\t0\t1\t1.02\t0\t110\t1\t1.05\t0.95;
\t2\t1\t50\t10\t0\t-20\t1\t1\t0\t110\t1\t1.05\t0.95;
\t3\t1\t20\t5\t0\t0\t1\t1\t0\t20\t1\t1.05\t0.95;
];
mpc.gen = [
\t1\t0\t0\t100\t-100\t1.02\t100\t1\t200\t0;
\t2\t40\t0\t50\t-50\t1\t100\t0\t80\t0;
];
mpc.branch = [
\t1\t2\t0.01\t0.05\t0.02\t100\t100\t100\t0\t0\t1;
\t2\t3\t0.005\t0.04\t0\t80\t80\t80\t1\t0\t0;
];
";

const SHUNTS3: &str = "bus,Bs,Gs,vn_kv,max_step,status\n1,-10.0,0.0,110.0,3,True\n";

/// Lay out `<root>/matpower/case3.m` and `<root>/shunts/case3.csv`.
fn dataset(names: Option<&str>) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("matpower")).unwrap();
    fs::create_dir_all(root.join("shunts")).unwrap();
    fs::write(root.join("matpower/case3.m"), CASE3).unwrap();
    fs::write(root.join("shunts/case3.csv"), SHUNTS3).unwrap();
    if let Some(names) = names {
        fs::create_dir_all(root.join("names")).unwrap();
        fs::write(root.join("names/case3.json"), names).unwrap();
    }
    let case = root.join("matpower/case3.m");
    (dir, case)
}

fn counts(model: &GridModel) -> Vec<usize> {
    TableKey::ALL.iter().map(|key| model.len(*key)).collect()
}

#[test]
fn import_builds_every_table() {
    let (_dir, case) = dataset(None);
    let model = import_case(&case).unwrap();

    assert_eq!(model.name, "case3");
    assert_eq!(model.bus.len(), 3);
    assert_eq!(model.ext_grid.len(), 1);
    assert_eq!(model.gen.len(), 1);
    assert_eq!(model.load.len(), 2);
    assert_eq!(model.line.len(), 1);
    assert_eq!(model.trafo.len(), 1);
    assert_eq!(model.shunt.len(), 1);

    assert!(!model.gen.rows()[0].in_service);
    assert!(!model.trafo.rows()[0].in_service);
    assert!(model.line.rows()[0].in_service);
    assert_eq!(
        model.names(TableKey::Bus),
        vec![Some("1".into()), Some("2".into()), Some("3".into())]
    );
}

#[test]
fn import_applies_voltage_bounds() {
    let (_dir, case) = dataset(None);
    let model = import_case(&case).unwrap();
    for bus in model.bus.rows() {
        assert_eq!(bus.max_vm_pu, 1.1);
        assert_eq!(bus.min_vm_pu, 0.9);
    }
}

#[test]
fn import_derives_shunt_step_from_sidecar() {
    let (_dir, case) = dataset(None);
    let model = import_case(&case).unwrap();

    let shunt = &model.shunt.rows()[0];
    assert_eq!(shunt.bus, Some(1));
    assert_eq!(shunt.q_mvar, 10.0);
    assert_eq!(shunt.step, 2.0);
    assert_eq!(shunt.max_step, 3);
    assert_eq!(shunt.name.as_deref(), Some("0"));
}

#[test]
fn import_applies_names_overlay() {
    let (_dir, case) = dataset(Some(
        r#"{"bus": ["North", "South", "East"], "trafo": ["T1"]}"#,
    ));
    let model = import_case(&case).unwrap();
    assert_eq!(model.bus.rows()[1].name.as_deref(), Some("South"));
    assert_eq!(model.trafo.rows()[0].name.as_deref(), Some("T1"));
}

#[test]
fn bad_names_overlay_keeps_defaults() {
    let (_dir, case) = dataset(Some(r#"{"bus": ["only-one"]}"#));
    let model = import_case(&case).unwrap();
    assert_eq!(model.bus.rows()[0].name.as_deref(), Some("1"));

    let (_dir, case) = dataset(Some("not json"));
    let model = import_case(&case).unwrap();
    assert_eq!(model.bus.rows()[2].name.as_deref(), Some("3"));
}

#[test]
fn missing_shunts_file_fails_import() {
    let (dir, case) = dataset(None);
    fs::remove_file(dir.path().join("shunts/case3.csv")).unwrap();
    let err = import_case(&case).unwrap_err();
    assert!(format!("{:#}", err).contains("shunts"));
}

#[test]
fn malformed_case_reports_parse_error() {
    let (_dir, case) = dataset(None);
    fs::write(&case, "mpc.baseMVA = 100;\nmpc.gen = [\n1 2 3;\n];\n").unwrap();
    let err = import_case(&case).unwrap_err();
    assert!(err
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<GridError>(), Some(GridError::Parse(_)))));
}

fn export_dir(model: &GridModel) -> TempDir {
    let out = tempdir().unwrap();
    export_case(model, out.path()).unwrap();
    out
}

#[test]
fn export_writes_case_and_sidecars() {
    let (_dir, case) = dataset(None);
    let model = import_case(&case).unwrap();
    let out = export_dir(&model);

    let text = fs::read_to_string(out.path().join("matpower/case3.m")).unwrap();
    assert!(text.starts_with("function mpc = powergrid\n"));
    assert!(out.path().join("names/case3.json").is_file());

    let shunts = fs::read_to_string(out.path().join("shunts/case3.csv")).unwrap();
    assert_eq!(shunts, "bus,Bs,Gs,vn_kv,max_step,status\n1,-10.0,0.0,110.0,3,True\n");
}

#[test]
fn export_keeps_out_of_service_rows() {
    let (_dir, case) = dataset(None);
    let model = import_case(&case).unwrap();
    let out = export_dir(&model);

    let exported = parse_matpower_file(&out.path().join("matpower/case3.m")).unwrap();
    // ext_grid first, then the out-of-service generator
    assert_eq!(exported.gen.column(GEN_STATUS), vec![1.0, 0.0]);
    // line first, then the out-of-service transformer
    assert_eq!(exported.branch.column(BR_STATUS), vec![1.0, 0.0]);
    assert_eq!(exported.bus.column(BUS_TYPE), vec![REF, PV, 1.0]);

    // the caller's model is untouched
    assert!(!model.gen.rows()[0].in_service);
}

#[test]
fn export_scales_shunt_by_step() {
    let (_dir, case) = dataset(None);
    let model = import_case(&case).unwrap();
    let out = export_dir(&model);

    let exported = parse_matpower_file(&out.path().join("matpower/case3.m")).unwrap();
    assert_eq!(exported.bus.column(BS), vec![0.0, -20.0, 0.0]);
    assert_eq!(exported.bus.column(VMAX), vec![1.1; 3]);
    assert_eq!(exported.bus.column(VMIN), vec![0.9; 3]);
}

#[test]
fn export_then_import_preserves_tables() {
    let (_dir, case) = dataset(Some(r#"{"bus": ["North", "South", "East"]}"#));
    let model = import_case(&case).unwrap();
    let out = export_dir(&model);

    let again = import_case(&out.path().join("matpower/case3.m")).unwrap();
    assert_eq!(counts(&again), counts(&model));
    assert_eq!(again.names(TableKey::Bus), model.names(TableKey::Bus));
    assert_eq!(again.gen.status_vector(), model.gen.status_vector());
    assert_eq!(again.trafo.status_vector(), model.trafo.status_vector());
    assert_eq!(again.shunt.rows()[0].step, 2.0);
    // unnamed generators come back with the placeholder name
    assert_eq!(again.gen.rows()[0].name.as_deref(), Some("None"));
}

#[test]
fn shunt_without_bus_survives_export_and_import() {
    let (dir, case) = dataset(None);
    let mut model = import_case(&case).unwrap();
    model.shunt.append(Shunt {
        bus: Some(99),
        in_service: false,
        ..Shunt::default()
    });
    let out = export_dir(&model);

    let shunts = fs::read_to_string(out.path().join("shunts/case3.csv")).unwrap();
    assert!(shunts.ends_with("\n,-0.0,0.0,0.0,1,False\n"));

    let again = import_case(&out.path().join("matpower/case3.m")).unwrap();
    assert_eq!(again.shunt.len(), 2);
    assert_eq!(again.shunt.rows()[0].step, 2.0);
    let orphan = &again.shunt.rows()[1];
    assert_eq!(orphan.bus, None);
    assert_eq!(orphan.step, 0.0);
    assert!(!orphan.in_service);

    let back = pandapower_roundtrip(&again, dir.path());
    assert_eq!(back.shunt.rows()[1].bus, None);
}

#[test]
fn export_overwrites_previous_output() {
    let (_dir, case) = dataset(None);
    let model = import_case(&case).unwrap();
    let out = export_dir(&model);
    let path = out.path().join("matpower/case3.m");
    let first = fs::read_to_string(&path).unwrap();

    export_case(&model, out.path()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn export_requires_model_name() {
    let out = tempdir().unwrap();
    let err = export_case(&GridModel::default(), out.path()).unwrap_err();
    assert!(err.to_string().contains("name"));
}

fn pandapower_roundtrip(model: &GridModel, dir: &Path) -> GridModel {
    let path = dir.join("case3.json");
    export_model_to_pandapower(model, &path).unwrap();
    load_pandapower_model(&path).unwrap()
}

#[test]
fn pandapower_json_roundtrip_keeps_labels_and_status() {
    let (dir, case) = dataset(None);
    let model = import_case(&case).unwrap();
    let back = pandapower_roundtrip(&model, dir.path());

    assert_eq!(back.name, "case3");
    assert_eq!(counts(&back), counts(&model));
    assert_eq!(back.bus.index(), model.bus.index());
    assert_eq!(back.load.rows()[1].bus, 2);
    assert_eq!(back.gen.status_vector(), vec![0.0]);
    assert_eq!(back.shunt.rows()[0].step, 2.0);
    assert_eq!(back.trafo.rows()[0].vn_lv_kv, 20.0);
}

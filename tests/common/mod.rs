//! Shared test helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Five jumbo rolls, three of them NOT OK
///
/// Range rows: CALIPER 250-300 (a later CALIPER row says 100-200 and must
/// lose), GLOSS_AT_75_TS 30-50, MOISTURE 5-8, COBB_TS 20-30. BULK only has
/// the built-in fallback.
pub const SAMPLE_CSV: &str = "\
Track,Jumbo_ID,KIT,Quality,Process_Parameters,Min,Max,Average,M_C,Grade,NOTES,CALIPER,GLOSS_AT_75_TS,MOISTURE,COBB_TS
1001,JB1001,K-1,OK,CALIPER,250,300,275,PM7,GC1,,260,40,6.5,25
1002,JB1002,K-2,NOT OK,GLOSS_AT_75_TS,30,50,40,PM7,GC1,,320,20,7.0,35
1003,JB1003,K-3,NOT OK,MOISTURE,5,8,6.5,PM8,GC2,\"trial, SBS-350\",240,45,9.5,28
1004,JB1004,K-4,ok,COBB_TS,20,30,25,PM8,GC2,,270,35,6.0,22
1005,JB1005,,NOT OK,CALIPER,100,200,150,PM7,GC1,,280,32,6.8,31
";

/// Helper to get a qid command isolated from the user's environment
///
/// The command runs inside `tmp` with the user config directory pointed
/// into it, so no real `.qid.yaml` or config file is picked up.
pub fn qid_in(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("qid"));
    cmd.current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("xdg"))
        .env_remove("QID_DATA")
        .env_remove("QID_LOG");
    cmd
}

/// Write `csv` into a fresh temp dir
pub fn write_dataset(csv: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("production.csv");
    std::fs::write(&path, csv).unwrap();
    (tmp, path)
}

/// Temp dir holding [`SAMPLE_CSV`] as `production.csv`
pub fn sample_dataset() -> (TempDir, PathBuf) {
    write_dataset(SAMPLE_CSV)
}

/// Load a CSV string as a dataset
pub fn load(csv: &str) -> qid::core::Dataset {
    qid::core::Dataset::from_reader(csv.as_bytes(), &[]).unwrap()
}

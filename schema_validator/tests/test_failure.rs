use std::{path::Path, process::Command};

fn validate(schema: &str) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_schema_validator"))
        .arg("--schema-path")
        .arg(Path::new(env!("CARGO_MANIFEST_DIR")).join(schema))
        .output()
        .unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_schema_file_not_present() {
    let not_present = "tests/data/no.such.schema.json";

    let (success, err_msg) = validate(not_present);
    assert!(!success);
    assert!(err_msg.contains("failed to read schema file") && err_msg.contains(not_present));
}

#[test]
fn test_schema_file_not_valid() {
    let not_valid = "tests/data/illegal.schema.json";

    let (success, err_msg) = validate(not_valid);
    assert!(!success);
    assert!(err_msg.contains("failed to parse schema file") && err_msg.contains(not_valid));
}

#[test]
fn test_recursive_schema() {
    let recursive = "tests/data/recursive.schema.json";

    let (success, err_msg) = validate(recursive);
    assert!(!success);
    assert!(err_msg.contains("invalid input record 'Node'"));
    assert!(err_msg.contains("recursive struct reference: Node -> Node"));
}

#[test]
fn test_unknown_output_record() {
    let unknown = "tests/data/unknown_output.schema.json";

    let (success, err_msg) = validate(unknown);
    assert!(!success);
    assert!(err_msg.contains("invalid output record 'Missing'"));
    assert!(err_msg.contains("struct `Missing` is not defined"));
}

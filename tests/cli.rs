use std::io::Write;
use std::process::{Command, Output, Stdio};

const ALICE: &str = r#"{"principal":"alice@EXAMPLE.COM","kvno":3,"keys":[{"kvno":3,"enctype":"aes256-cts-hmac-sha1-96","key":"AAECAw=="}],"flags":["client","forwardable"]}"#;

fn pghdb2json(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pghdb2json"))
        .env_remove("PGHDB2JSON_CONFIG")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start pghdb2json");

    if let Some(input) = stdin {
        child
            .stdin
            .take()
            .expect("stdin must be piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
    }
    child.wait_with_output().expect("Failed to wait for pghdb2json")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone())
        .expect("stdout is not utf-8")
        .trim_end()
        .to_string()
}

#[test]
fn cli_roundtrip() {
    let out = pghdb2json(&["json2hdb", ALICE], None);
    assert!(out.status.success());
    let blob = stdout(&out);

    let out = pghdb2json(&["hdb2json", &blob], None);
    assert!(out.status.success());
    let json = stdout(&out);
    assert!(json.starts_with(r#"{"principal":{"name_type":1,"realm":"EXAMPLE.COM","components":["alice"]},"kvno":3,"#));
    assert!(json.contains(r#""forwardable":true"#));
    assert!(json.contains(r#""valid_end":null"#));

    // The canonical JSON converts back to the same blob.
    let out = pghdb2json(&["json2hdb", &json], None);
    assert!(out.status.success());
    assert_eq!(stdout(&out), blob);
}

#[test]
fn cli_stdin() {
    let out = pghdb2json(&["json2hdb", "-"], Some(ALICE));
    assert!(out.status.success());
    let blob = stdout(&out);

    let out = pghdb2json(&["hdb2json", "-"], Some(&format!("{blob}\n")));
    assert!(out.status.success());
    assert!(stdout(&out).contains(r#""realm":"EXAMPLE.COM""#));
}

#[test]
fn cli_config() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "pretty = true\ndefault_realm = \"EXAMPLE.COM\"").expect("Failed to write config");
    let config = file.path().to_str().expect("temp path is not utf-8");

    let out = pghdb2json(
        &["--config", config, "json2hdb", r#"{"principal":"alice"}"#],
        None,
    );
    assert!(out.status.success());
    let blob = stdout(&out);

    let out = pghdb2json(&["--config", config, "hdb2json", &blob], None);
    assert!(out.status.success());
    assert!(stdout(&out).starts_with("{\n  \"principal\": {"));

    // Without the default realm the shorthand is rejected.
    let out = pghdb2json(&["json2hdb", r#"{"principal":"alice"}"#], None);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_errors() {
    let out = pghdb2json(&["hdb2json", "not base64!"], None);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());

    let out = pghdb2json(&["json2hdb", r#"{"kvno":1}"#], None);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing field: principal"));

    let out = pghdb2json(&["json2hdb", r#"{"principal":"a@B","flags":["wizard"]}"#], None);
    assert_eq!(out.status.code(), Some(1));

    let out = pghdb2json(&["frobnicate"], None);
    assert_eq!(out.status.code(), Some(2));

    let out = pghdb2json(&["--config", "/nonexistent/pghdb2json.toml", "hdb2json", "MAA="], None);
    assert_eq!(out.status.code(), Some(1));
}

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar(args: &[&str]) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_reportcardd");
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn reportcardd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn config_get_result_is_accepted_by_config_update() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&["--total-digits", "1"]);
    let got = request_ok(&mut stdin, &mut reader, "1", "config.get", json!({}));
    assert_eq!(got["config"]["totalDigits"], json!(1));

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "config.update",
        json!({ "patch": got["config"].clone() }),
    );
    assert_eq!(updated["config"], got["config"]);

    let adaptive = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "config.update",
        json!({ "patch": { "totalDigits": "adaptive" } }),
    );
    assert_eq!(adaptive["config"]["totalDigits"], json!("adaptive"));

    let bad = request(
        &mut stdin,
        &mut reader,
        "4",
        "config.update",
        json!({ "patch": { "totalDigits": { "mode": "fixed", "digits": 1 } } }),
    );
    assert_eq!(bad["error"]["code"], json!("bad_params"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn config_file_uses_the_same_digit_form() {
    let path = std::env::temp_dir().join(format!(
        "reportcardd-ipc-config-{}.json",
        uuid::Uuid::new_v4()
    ));
    std::fs::write(&path, r#"{ "totalDigits": "adaptive", "showEditIcons": true }"#)
        .expect("write config");
    let path_arg = path.to_string_lossy().to_string();

    let (mut child, mut stdin, mut reader) = spawn_sidecar(&["--config", &path_arg]);
    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["subjectCount"], json!(10));
    let got = request_ok(&mut stdin, &mut reader, "2", "config.get", json!({}));
    assert_eq!(got["config"]["totalDigits"], json!("adaptive"));
    assert_eq!(got["config"]["showEditIcons"], json!(true));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn null_is_rejected_for_text_fields_but_means_nan_for_numbers() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&[]);
    let before = request_ok(&mut stdin, &mut reader, "1", "card.get", json!({}));

    let res = request(
        &mut stdin,
        &mut reader,
        "2",
        "student.update",
        json!({ "field": "name", "value": null }),
    );
    assert_eq!(res["ok"], json!(false));
    assert_eq!(res["error"]["code"], json!("bad_params"));

    let res = request(
        &mut stdin,
        &mut reader,
        "3",
        "subject.update",
        json!({ "index": 0, "field": "name", "value": null }),
    );
    assert_eq!(res["error"]["code"], json!("bad_params"));

    let after = request_ok(&mut stdin, &mut reader, "4", "card.get", json!({}));
    assert_eq!(after["record"], before["record"]);

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "student.update",
        json!({ "field": "registrationNumber", "value": null }),
    );
    assert_eq!(res["record"]["registrationNumber"], json!(null));

    drop(stdin);
    let _ = child.wait();
}

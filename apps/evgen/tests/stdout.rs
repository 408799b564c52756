use std::process::Command;

#[test]
fn stdout_carries_only_event_lines() {
    let output = Command::new(env!("CARGO_BIN_EXE_evgen"))
        .env_clear()
        .env("EVGEN_COUNT", "3")
        .env("EVGEN_SINK", "stdout")
        .env("RUST_LOG", "info")
        .output()
        .expect("run evgen");
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{}", stdout);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).expect("json line");
        assert!(value["partitionKey"].is_string());
    }

    // 日志仍然输出，只是在 stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("objects have been successfully created"));
}

use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn maze_chase(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-chase"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch maze-chase binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn autopilot_session_prints_summary() {
    let output = maze_chase(&["--frames", "120", "--autopilot", "3", "--log-level", "warn"]);

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("frames: 120"), "{text}");
    assert!(text.contains("replans:"), "{text}");
}

#[test]
fn render_interval_controls_drawn_frames() {
    let output = maze_chase(&["--frames", "30", "--render-every", "10", "--log-level", "off"]);

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert_eq!(text.matches("frame ").count(), 3, "{text}");
    let legends: Vec<&str> = text
        .lines()
        .filter(|line| line.starts_with('b') && line.contains("  p"))
        .collect();
    assert_eq!(legends.len(), 3, "{text}");
    assert!(legends.iter().all(|line| line.contains("  c")), "{text}");
}

#[test]
fn color_flag_wraps_rows_in_ansi_escapes() {
    let output = maze_chase(&[
        "--frames",
        "4",
        "--render-every",
        "4",
        "--color",
        "--log-level",
        "off",
    ]);

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("\x1b[48;2;0;0;0m"), "{text}");
    assert_eq!(text.matches("\x1b[0m").count(), 13, "{text}");
}

#[test]
fn exported_layout_is_accepted_back() {
    let export = maze_chase(&["--export-layout"]);
    assert!(export.status.success(), "{export:?}");
    let layout = stdout(&export).trim().to_owned();
    assert!(layout.starts_with("maze:v1:15x13:"), "{layout}");

    let replay = maze_chase(&["--layout", &layout, "--frames", "5", "--log-level", "off"]);

    assert!(replay.status.success(), "{replay:?}");
    assert!(stdout(&replay).contains("frames: 5"));
}

#[test]
fn malformed_layout_fails() {
    let output = maze_chase(&["--layout", "maze:v2:1x1:AA", "--log-level", "off"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--layout"), "{stderr}");
}

#[test]
fn scripted_input_is_replayed() {
    let script = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("cli_headless_script.txt");
    fs::write(&script, "# turn around early\n2 left\n40 up\n").expect("script written");

    let output = maze_chase(&[
        "--frames",
        "60",
        "--script",
        script.to_str().expect("utf-8 path"),
        "--log-level",
        "off",
    ]);

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("frames: 60"));
}

#[test]
fn script_and_autopilot_conflict() {
    let output = maze_chase(&["--script", "input.txt", "--autopilot", "1"]);

    assert!(!output.status.success());
}

mod common;

use std::fs;

use common::Capture;
use linelog::{Error, HandlerKind, HandlerState, Settings};
use serial_test::serial;

fn file_settings(path: &std::path::Path) -> Settings {
    Settings {
        path: path.to_path_buf(),
        color: "none".into(),
        ..Default::default()
    }
}

const STDOUT_CHILD: &str = "LINELOG_TEST_STDOUT_CHILD";

#[test]
#[serial]
fn test_stdout_before_during_and_after() {
    if std::env::var_os(STDOUT_CHILD).is_none() {
        let output = common::rerun("test_stdout_before_during_and_after", STDOUT_CHILD, "1");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success(), "{stdout}");
        let lines: Vec<&str> = stdout.lines().collect();
        assert!(
            lines
                .iter()
                .any(|line| line.contains("L0 lifecycle.rs:") && line.ends_with("] info")),
            "{stdout}"
        );
        assert!(
            lines
                .iter()
                .any(|line| line.contains("L0 lifecycle.rs:") && line.ends_with("] after")),
            "{stdout}"
        );
        let counted: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|line| line.contains("count=42"))
            .collect();
        assert_eq!(counted.len(), 1, "{stdout}");
        assert!(counted[0].contains(&format!("L0 lifecycle.rs:{COUNT_LINE}] count=42")));
        assert!(counted[0].contains("WARNING"));
        assert!(!counted[0].contains('\x1b'));
        return;
    }

    // stdout is a pipe here, so the handler writes through its thread
    assert_eq!(linelog::state(), HandlerState::Default);
    linelog::info!("info");
    let settings = Settings {
        color: "none".into(),
        ..Default::default()
    };
    let guard = linelog::initialize("prog", &settings, false).unwrap();
    const COUNT_LINE: u32 = line!() + 1;
    linelog::warn!("count={}", 42);
    linelog::shutdown();
    drop(guard);
    linelog::info!("after");
}

#[test]
#[serial]
fn test_failed_initialize_changes_nothing() {
    if linelog::LINELOG_CONFIG.HANDLER.parse::<HandlerKind>().ok() != Some(HandlerKind::Threaded) {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    drop(linelog::initialize("prog", &file_settings(&path), false).unwrap());
    linelog::set_verbosity(0);
    assert!(!linelog::terminal_color());

    // the log directory cannot be created below a regular file
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let settings = Settings {
        path: blocker.join("app.log"),
        verbosity: Some(5),
        color: "always".into(),
        ..Default::default()
    };
    let result = linelog::initialize("prog", &settings, false);
    assert!(matches!(result, Err(Error::Io(_))));
    assert_eq!(linelog::verbosity(), 0);
    assert!(!linelog::terminal_color());
    assert_eq!(linelog::state(), HandlerState::Default);
}

#[test]
#[serial]
fn test_second_handler_is_rejected() {
    let capture = Capture::default();
    let guard = capture.install();
    assert!(matches!(
        linelog::install(Box::new(Capture::default())),
        Err(Error::HandlerAlreadyInstalled)
    ));
    assert!(matches!(
        linelog::initialize("prog", &Settings::default(), false),
        Err(Error::HandlerAlreadyInstalled)
    ));
    linelog::info!("still routed");
    assert_eq!(capture.messages().len(), 1);

    drop(guard);
    assert_eq!(linelog::state(), HandlerState::Default);
    linelog::info!("routed to the default handler");
    assert_eq!(capture.messages().len(), 1);
}

#[test]
#[serial]
fn test_end_to_end_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let guard = linelog::initialize("prog", &file_settings(&path), false).unwrap();
    assert_eq!(linelog::state(), HandlerState::Custom);
    linelog::warn!("count={}", 42);
    let line = line!() - 1;
    linelog::shutdown();
    drop(guard);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "{content}");
    assert!(lines[0].contains("count=42"));
    assert!(lines[0].contains(&format!("L0 lifecycle.rs:{line}] ")));
    assert!(lines[0].contains("WARNING"));
    assert!(!content.contains('\x1b'));
}

#[test]
#[serial]
fn test_shutdown_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let guard = linelog::initialize("prog", &file_settings(&path), false).unwrap();
    linelog::shutdown();
    linelog::shutdown();
    assert_eq!(linelog::state(), HandlerState::Default);
    linelog::info!("after shutdown");

    // a new handler survives the stale guard
    let capture = Capture::default();
    let second = capture.install();
    drop(guard);
    assert_eq!(linelog::state(), HandlerState::Custom);
    drop(second);
}

#[test]
#[serial]
fn test_unknown_color_is_rejected() {
    let settings = Settings {
        color: "sometimes".into(),
        ..Default::default()
    };
    let result = linelog::initialize("prog", &settings, false);
    assert!(matches!(result, Err(Error::UnknownColor(_))));
    assert_eq!(linelog::state(), HandlerState::Default);
}

#[test]
#[serial]
fn test_verbosity_from_settings() {
    if linelog::LINELOG_CONFIG.verbosity().is_some() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let settings = Settings {
        verbosity: Some(3),
        ..file_settings(&path)
    };
    let guard = linelog::initialize("prog", &settings, false).unwrap();
    assert_eq!(linelog::verbosity(), 3);
    assert!(linelog::enabled(3));
    assert!(!linelog::enabled(4));
    drop(guard);
    linelog::set_verbosity(0);
}

#[test]
#[serial]
fn test_rotate_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    for run in 0..2 {
        let _guard = linelog::initialize("prog", &file_settings(&path), false).unwrap();
        linelog::info!("run {run}");
    }
    let current = fs::read_to_string(&path).unwrap();
    let previous = fs::read_to_string(dir.path().join("app.1.log")).unwrap();
    assert!(current.contains("run 1"));
    assert!(!current.contains("run 0"));
    assert!(previous.contains("run 0"));
}

//! Integration tests for fieldwork-console

use fieldwork_console::*;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Output(Arc<Mutex<Vec<u8>>>);

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Output {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[derive(Serialize)]
struct Summary {
    title: String,
    rows: Vec<Row>,
}

#[derive(Serialize)]
struct Row {
    name: String,
    count: u32,
}

#[test]
fn test_getopt_style_arguments() {
    let console = Console::builder()
        .short_options("ab:c::")
        .long_options(["verbose", "file:", "level::"])
        .writer(Box::new(Output::default()))
        .parse_from(["import", "-a", "-b", "42", "-c", "--file=users.csv", "--level"])
        .unwrap();

    assert_eq!(console.get_arg("a"), Some(&ArgValue::Flag));
    assert_eq!(console.get_arg("b").and_then(|v| v.as_str()), Some("42"));
    assert_eq!(console.get_arg("c"), Some(&ArgValue::Flag));
    assert_eq!(console.get_arg("file").and_then(|v| v.as_str()), Some("users.csv"));
    assert_eq!(console.get_arg("level"), Some(&ArgValue::Flag));
    assert!(!console.is_arg_set("verbose"));
    assert!(!console.help_shown());
}

#[test]
fn test_unknown_option_is_rejected() {
    let result = Console::builder()
        .short_options("a")
        .writer(Box::new(Output::default()))
        .parse_from(["import", "--bogus"]);
    assert!(matches!(result, Err(ConsoleError::Usage(_))));
}

#[test]
fn test_invalid_spec_is_rejected() {
    let result = Console::builder()
        .long_options(["bad name"])
        .writer(Box::new(Output::default()))
        .parse_from(["import"]);
    assert!(matches!(result, Err(ConsoleError::InvalidSpec(_))));
}

#[test]
fn test_help_prints_readme() {
    let dir = TempDir::new().unwrap();
    let readme = dir.path().join("readme.txt");
    fs::write(&readme, "Usage: import [--file=path]").unwrap();

    let out = Output::default();
    let console = Console::builder()
        .readme(&readme)
        .writer(Box::new(out.clone()))
        .parse_from(["import", "--help"])
        .unwrap();

    assert!(console.help_shown());
    assert_eq!(out.text(), "Usage: import [--file=path]\n");
}

#[test]
fn test_generate_report() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("report.hbs");
    let location = dir.path().join("report.txt");
    fs::write(
        &template,
        "{{title}}\n{{#each rows}}{{name}}: {{count}}\n{{/each}}",
    )
    .unwrap();

    let console = Console::builder()
        .writer(Box::new(Output::default()))
        .parse_from(["report"])
        .unwrap();

    let summary = Summary {
        title: "Imported".to_string(),
        rows: vec![
            Row {
                name: "users".to_string(),
                count: 3,
            },
            Row {
                name: "orders".to_string(),
                count: 7,
            },
        ],
    };
    console.generate_report(&summary, &template, &location).unwrap();

    assert_eq!(
        fs::read_to_string(&location).unwrap(),
        "Imported\nusers: 3\norders: 7\n"
    );
}

#[test]
fn test_report_with_missing_template() {
    let dir = TempDir::new().unwrap();
    let console = Console::builder()
        .writer(Box::new(Output::default()))
        .parse_from(["report"])
        .unwrap();

    let result = console.generate_report(
        &serde_json::json!({}),
        dir.path().join("missing.hbs"),
        dir.path().join("out.txt"),
    );
    assert!(matches!(result, Err(ConsoleError::Io(_))));
}

#[test]
fn test_script_timer_runs_until_end() {
    let mut console = Console::builder()
        .writer(Box::new(Output::default()))
        .parse_from(["script"])
        .unwrap();

    assert!(console.timers()[SCRIPT_TIMER].duration().is_none());
    console.end(false).unwrap();
    assert!(console.timers()[SCRIPT_TIMER].duration().is_some());
}

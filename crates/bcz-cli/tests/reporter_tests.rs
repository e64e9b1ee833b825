use bcz::CompileOutput;
use bcz::common::{Diagnostic, Span};
use serde_json::Value;

use super::driver::{RunSummary, UnitFailure};
use super::reporter::{Reporter, render_json};

fn summary() -> RunSummary {
    let diagnostic = Diagnostic::error("main.bcz", Span::new(15, 20), "bad access", 307);
    RunSummary {
        outputs: vec![
            CompileOutput {
                file: "main.bcz".to_string(),
                source: Some("param p string\noutput o = x.y\n".to_string()),
                diagnostics: vec![diagnostic],
            },
            CompileOutput {
                file: "other.bcz".to_string(),
                source: None,
                diagnostics: vec![Diagnostic::warning(
                    "other.bcz",
                    Span::new(3, 4),
                    "unknown type",
                    81,
                )],
            },
        ],
        failures: vec![UnitFailure {
            path: "broken.json".into(),
            error: anyhow::anyhow!("invalid compilation unit JSON"),
        }],
    }
}

#[test]
fn text_report_uses_line_and_column_when_source_is_known() {
    let text = Reporter::new(false).render_text(&summary());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "main.bcz:2:1 - error BCP307: bad access");
    assert_eq!(lines[1], "other.bcz@3 - warning BCP081: unknown type");
    assert_eq!(lines[2], "broken.json: error: invalid compilation unit JSON");
}

#[test]
fn json_report_carries_payload_and_positions() {
    let json: Value = serde_json::from_str(&render_json(&summary()).expect("render"))
        .expect("valid json");
    let first = &json["diagnostics"][0];
    assert_eq!(first["file"], "main.bcz");
    assert_eq!(first["code"], 307);
    assert_eq!(first["messageText"], "bad access");
    assert_eq!(first["position"]["line"], 1);
    assert_eq!(first["position"]["character"], 0);
    assert!(json["diagnostics"][1].get("position").is_none());
    assert_eq!(json["failures"][0]["file"], "broken.json");
}

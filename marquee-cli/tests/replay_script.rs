use std::fs;
use std::time::Duration;

use marquee_cli::{ReplayOptions, Script, replay};
use marquee_config::InteractionConfig;
use serde_json::Value;
use tempfile::tempdir;

fn run(raw: &str, config: &InteractionConfig, until: Option<Duration>) -> Vec<Value> {
    let script: Script = toml::from_str(raw).expect("script");
    let mut out = Vec::new();
    let written =
        replay(&script, config, &ReplayOptions { until }, &mut out).unwrap();

    let lines: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), written);
    lines
}

fn for_target<'a>(lines: &'a [Value], target: &str) -> Vec<&'a Value> {
    lines.iter().filter(|line| line["target"] == target).collect()
}

#[test]
fn delayed_close_lands_after_the_configured_delay() {
    let raw = r#"
        [[events]]
        at_ms = 0
        menu = { action = "pointer_enter", id = "services" }

        [[events]]
        at_ms = 100
        menu = { action = "pointer_leave" }
    "#;
    let lines = run(raw, &InteractionConfig::default(), Some(Duration::from_secs(1)));
    let header = for_target(&lines, "header");

    // initial, opened, closed
    assert_eq!(header.len(), 3);
    assert_eq!(header[1]["at_ms"], 0);
    assert_eq!(header[1]["state"]["menu"]["open"], "services");
    assert_eq!(header[2]["at_ms"], 400);
    assert_eq!(header[2]["state"]["menu"]["open"], Value::Null);
}

#[test]
fn reentry_inside_the_delay_keeps_the_menu_open() {
    let raw = r#"
        [[events]]
        at_ms = 0
        menu = { action = "pointer_enter", id = "industries" }

        [[events]]
        at_ms = 50
        menu = { action = "pointer_leave" }

        [[events]]
        at_ms = 250
        menu = { action = "pointer_enter", id = "industries" }
    "#;
    let lines = run(raw, &InteractionConfig::default(), Some(Duration::from_secs(2)));
    let header = for_target(&lines, "header");

    assert_eq!(header.len(), 2);
    assert_eq!(header[1]["state"]["menu"]["open"], "industries");
}

#[test]
fn carousels_advance_until_the_requested_time() {
    let mut config = InteractionConfig::default();
    config.testimonials.autoplay = false;

    let lines = run("", &config, Some(Duration::from_millis(10_500)));
    let hero = for_target(&lines, "hero");

    let indices: Vec<_> = hero.iter().map(|line| line["state"]["index"].clone()).collect();
    assert_eq!(indices, [0, 1, 2]);
    assert_eq!(hero[2]["at_ms"], 10_000);
    assert_eq!(for_target(&lines, "testimonials").len(), 1);
}

#[test]
fn manual_navigation_restarts_the_interval() {
    let raw = r#"
        [[events]]
        at_ms = 3000
        testimonials = { action = "next" }
    "#;
    let mut config = InteractionConfig::default();
    config.hero.autoplay = false;

    let lines = run(raw, &config, Some(Duration::from_millis(8_000)));
    let at: Vec<_> = for_target(&lines, "testimonials")
        .iter()
        .map(|line| line["at_ms"].clone())
        .collect();

    assert_eq!(at, [0, 3000, 8000]);
}

#[test]
fn rejected_events_are_reported_inline() {
    let raw = r#"
        [[events]]
        at_ms = 0
        hero = { action = "go_to", index = 7 }

        [[events]]
        at_ms = 10
        notice = { action = "dispose" }

        [[events]]
        at_ms = 20
        notice = { action = "show", message = "Thank you!", tone = "success" }
    "#;
    let lines = run(raw, &InteractionConfig::default(), None);
    let errors: Vec<_> = lines
        .iter()
        .filter(|line| line.get("error").is_some())
        .collect();

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["target"], "hero");
    assert_eq!(errors[1]["target"], "notice");
    assert!(errors[1]["error"].as_str().unwrap().contains("after dispose"));
}

#[test]
fn toast_hides_itself() {
    let raw = r#"
        [[events]]
        at_ms = 1500
        notice = { action = "show", message = "Thank you! We'll be in touch within 24 hours.", tone = "success" }
    "#;
    let lines = run(raw, &InteractionConfig::default(), Some(Duration::from_secs(10)));
    let notice = for_target(&lines, "notice");

    assert_eq!(notice.len(), 3);
    assert_eq!(notice[1]["state"]["tone"], "success");
    assert_eq!(notice[2]["at_ms"], 6500);
    assert_eq!(notice[2]["state"], Value::Null);
}

#[test]
fn contact_form_sends_once_and_reports_the_outcome() {
    let raw = r#"
        [[events]]
        at_ms = 0
        contact = { action = "submit" }

        [[events]]
        at_ms = 500
        contact = { action = "submit" }
    "#;
    let lines = run(raw, &InteractionConfig::default(), Some(Duration::from_secs(7)));

    let contact = for_target(&lines, "contact");
    let states: Vec<_> = contact
        .iter()
        .filter(|line| line.get("state").is_some())
        .map(|line| (line["at_ms"].clone(), line["state"]["submitting"].clone()))
        .collect();
    assert_eq!(
        states,
        [
            (Value::from(0), Value::from(false)),
            (Value::from(0), Value::from(true)),
            (Value::from(1_500), Value::from(false)),
        ]
    );
    assert_eq!(contact[3]["state"]["sent"], 1);

    let rejected: Vec<_> = contact
        .iter()
        .filter(|line| line.get("error").is_some())
        .collect();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["at_ms"], 500);

    let notice = for_target(&lines, "notice");
    assert_eq!(notice.len(), 3);
    assert_eq!(notice[1]["at_ms"], 1_500);
    assert_eq!(
        notice[1]["state"]["message"],
        "Thank you! We'll be in touch within 24 hours."
    );
    assert_eq!(notice[2]["at_ms"], 6_500);
}

#[test]
fn failed_send_shows_the_error_toast() {
    let raw = r#"
        [[events]]
        at_ms = 0
        contact = { action = "submit" }

        [[events]]
        at_ms = 700
        contact = { action = "fail" }
    "#;
    let lines = run(raw, &InteractionConfig::default(), Some(Duration::from_secs(3)));

    let notice = for_target(&lines, "notice");
    assert_eq!(notice[1]["at_ms"], 700);
    assert_eq!(notice[1]["state"]["tone"], "error");

    let contact = for_target(&lines, "contact");
    let last = contact.last().unwrap();
    assert_eq!(last["state"]["submitting"], false);
    assert_eq!(last["state"]["sent"], 0);
}

#[test]
fn sections_reveal_once_when_scrolled_into_view() {
    let raw = r#"
        [[sections]]
        key = "testimonials"
        top = 1000.0
        height = 500.0

        [[events]]
        at_ms = 0
        reveal = { action = "viewport", top = 0.0, height = 800.0 }

        [[events]]
        at_ms = 100
        reveal = { action = "viewport", top = 600.0, height = 800.0 }

        [[events]]
        at_ms = 200
        reveal = { action = "viewport", top = 0.0, height = 800.0 }
    "#;
    let lines = run(raw, &InteractionConfig::default(), None);
    let reveal = for_target(&lines, "reveal");

    assert_eq!(reveal.len(), 1);
    assert_eq!(reveal[0]["at_ms"], 100);
    assert_eq!(reveal[0]["state"]["key"], "testimonials");
    assert_eq!(reveal[0]["state"]["revealed"], true);
}

#[test]
fn scripts_load_from_json_files() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("script.json");
    fs::write(
        &path,
        r#"{ "events": [ { "at_ms": 0, "header": { "action": "scroll", "offset_y": 11.0 } } ] }"#,
    )
    .unwrap();

    let script = Script::load(&path).unwrap();

    assert_eq!(script.events.len(), 1);
    assert_eq!(script.last_event_ms(), 0);
}

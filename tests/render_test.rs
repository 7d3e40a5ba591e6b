// tests/render_test.rs
use std::fs;

use tempfile::TempDir;

use tokei_release::render::render_dashboard;

const TEMPLATE: &str = "\
<html>
<body>
<h1>Tokei</h1>
<p id=\"today\">{{stats.today_immersion.total_hms}}</p>
<p id=\"avg\">{{stats.avg_immersion_hms}}</p>
<p id=\"cards\">{{format_k stats.new_cards}}</p>
<p id=\"chars\">{{format_chars stats.total_chars}}</p>
</body>
</html>
";

#[test]
fn test_render_dashboard_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let templates_dir = root.join("design/templates");
    fs::create_dir_all(&templates_dir).unwrap();
    fs::write(templates_dir.join("report.html.hbs"), TEMPLATE).unwrap();

    let stats_path = root.join("stats.json");
    fs::write(
        &stats_path,
        r#"{
  "today_immersion": { "total_seconds": 3661 },
  "avg_immersion_seconds": 1800,
  "avg_immersion_delta_seconds": -90,
  "new_cards": 1500,
  "total_chars": 1850000
}"#,
    )
    .unwrap();

    // Output path in a directory that does not exist yet
    let out_path = root.join("out/reports/dashboard.html");
    render_dashboard(&stats_path, &out_path, &templates_dir).unwrap();

    let html = fs::read_to_string(&out_path).unwrap();
    assert!(html.contains("1:01:01"));
    assert!(html.contains("0:30:00"));
    assert!(html.contains("1.5k"));
    assert!(html.contains("1.85M"));
}

#[test]
fn test_missing_stats_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let err = render_dashboard(
        &root.join("missing.json"),
        &root.join("out.html"),
        &root.join("templates"),
    )
    .unwrap_err();
    assert!(err.to_string().contains("stats JSON not found"));
    assert_eq!(err.exit_code(), 13);
}

#[test]
fn test_non_object_stats_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let stats_path = root.join("stats.json");
    fs::write(&stats_path, "[1, 2, 3]").unwrap();

    let err = render_dashboard(&stats_path, &root.join("out.html"), &root.join("templates"))
        .unwrap_err();
    assert!(err.to_string().contains("must be an object"));
    assert_eq!(err.exit_code(), 13);
}

#[test]
fn test_missing_template_is_an_output_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let stats_path = root.join("stats.json");
    fs::write(&stats_path, "{}").unwrap();

    let err = render_dashboard(&stats_path, &root.join("out.html"), &root.join("no-templates"))
        .unwrap_err();
    assert!(err.to_string().contains("Cannot load template"));
    assert_eq!(err.exit_code(), 13);
}

//! Dashboard HTML rendering.
//!
//! The report generator computes all statistics up front and hands this
//! module a single JSON object. Rendering only:
//! - loads that JSON,
//! - adds a few convenience fields (preformatted time strings),
//! - renders the HTML template with handlebars.

use std::fs;
use std::path::Path;

use handlebars::Handlebars;
use serde_json::{json, Value};

use crate::error::{ReleaseError, Result};

/// Format a second count as `[-]H:MM:SS`.
pub fn format_hms(total_seconds: i64) -> String {
    let sign = if total_seconds < 0 { "-" } else { "" };
    let s = total_seconds.abs();
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let sec = s % 60;
    format!("{}{}:{:02}:{:02}", sign, h, m, sec)
}

/// Format a count in thousands: `1.5k` for values >= 1000, plain otherwise.
pub fn format_k(value: i64) -> String {
    if value >= 1000 {
        format!("{:.1}k", value as f64 / 1000.0)
    } else {
        value.to_string()
    }
}

/// Format large character counts.
///
/// - >= 1,000,000: millions with up to 2 decimals, trimmed (1M, 1.8M, 1.85M)
/// - otherwise: k-format
pub fn format_chars(value: i64) -> String {
    if value >= 1_000_000 {
        let millions = value as f64 / 1_000_000.0;
        let text = format!("{:.2}", millions);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        format!("{}M", text)
    } else {
        format_k(value)
    }
}

/// Add the convenience fields expected by the template:
/// `today_immersion.total_hms`, `avg_immersion_hms` and
/// `avg_immersion_delta_hms`. Missing or non-numeric inputs count as zero.
pub fn enrich_stats(stats: &mut Value) {
    let mut today = match stats.get("today_immersion") {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        _ => json!({}),
    };
    let total_seconds = seconds_field(&today, "total_seconds");
    today["total_hms"] = Value::String(format_hms(total_seconds));
    stats["today_immersion"] = today;

    let avg_seconds = seconds_field(stats, "avg_immersion_seconds");
    stats["avg_immersion_hms"] = Value::String(format_hms(avg_seconds));

    let delta_seconds = seconds_field(stats, "avg_immersion_delta_seconds");
    stats["avg_immersion_delta_hms"] = Value::String(format_hms(delta_seconds));
}

fn seconds_field(value: &Value, key: &str) -> i64 {
    value
        .get(key)
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .round() as i64
}

/// Handlebars renderer for the dashboard report template.
pub struct DashboardRenderer {
    handlebars: Handlebars<'static>,
}

impl DashboardRenderer {
    /// Load the `report.html.hbs` template from `templates_dir` and
    /// register the formatting helpers used by the template.
    pub fn new(templates_dir: &Path) -> Result<Self> {
        let mut handlebars = Handlebars::new();

        handlebars.register_helper("format_hms", Box::new(format_hms_helper));
        handlebars.register_helper("format_k", Box::new(format_k_helper));
        handlebars.register_helper("format_chars", Box::new(format_chars_helper));

        let template_path = templates_dir.join("report.html.hbs");
        handlebars
            .register_template_file("report", &template_path)
            .map_err(|e| {
                ReleaseError::render(format!(
                    "Cannot load template '{}': {}",
                    template_path.display(),
                    e
                ))
            })?;

        Ok(DashboardRenderer { handlebars })
    }

    /// Render the report for an already-enriched stats object.
    pub fn render(&self, stats: &Value) -> Result<String> {
        self.handlebars
            .render("report", &json!({ "stats": stats }))
            .map_err(|e| ReleaseError::render(format!("Template render failed: {}", e)))
    }
}

/// Full rendering pipeline: load stats JSON, enrich, render, write HTML.
///
/// Creates the output file's parent directories as needed.
pub fn render_dashboard(stats_path: &Path, out_path: &Path, templates_dir: &Path) -> Result<()> {
    if !stats_path.is_file() {
        return Err(ReleaseError::render(format!(
            "stats JSON not found: {}",
            stats_path.display()
        )));
    }

    let text = fs::read_to_string(stats_path)?;
    let mut stats: Value = serde_json::from_str(&text)
        .map_err(|e| ReleaseError::render(format!("Failed to load stats JSON: {}", e)))?;

    if !stats.is_object() {
        return Err(ReleaseError::render("Stats JSON must be an object"));
    }

    enrich_stats(&mut stats);

    let renderer = DashboardRenderer::new(templates_dir)?;
    let html = renderer.render(&stats)?;

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_path, html)?;
    Ok(())
}

// Handlebars helpers

fn helper_value(h: &handlebars::Helper) -> Option<i64> {
    h.param(0).and_then(|v| v.value().as_f64()).map(|f| f.round() as i64)
}

fn format_hms_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let seconds = helper_value(h).unwrap_or(0);
    out.write(&format_hms(seconds))?;
    Ok(())
}

fn format_k_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    match helper_value(h) {
        Some(value) => out.write(&format_k(value))?,
        None => out.write("?")?,
    }
    Ok(())
}

fn format_chars_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    match helper_value(h) {
        Some(value) => out.write(&format_chars(value))?,
        None => out.write("?")?,
    }
    Ok(())
}

//! Visualization HTML validation and repair.
//!
//! Model-generated visualizations are rendered in a sandboxed frame by the
//! presentation layer, so every `completeHtml` must be a complete, readable
//! document. [`repair_html`] always returns one.

use crate::resource::LearningResource;
use regex::Regex;
use std::sync::LazyLock;

/// Returned when no HTML was generated at all.
pub const FALLBACK_INTERACTIVE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Visualization</title>
<style>
  body { font-family: system-ui, sans-serif; background-color: #f8fafc; color: #1e293b; margin: 0; padding: 24px; }
  .card { max-width: 480px; margin: 0 auto; padding: 24px; border-radius: 12px; background-color: #ffffff; box-shadow: 0 2px 8px rgba(15, 23, 42, 0.15); text-align: center; }
  button { padding: 10px 20px; border: none; border-radius: 8px; background-color: #2563eb; color: #ffffff; font-size: 16px; cursor: pointer; }
  #counter { font-size: 48px; margin: 16px 0; }
</style>
</head>
<body>
<div class="card">
  <h1>Interactive Visualization</h1>
  <p>The visualization for this step could not be generated. Use the control below to step through the idea.</p>
  <div id="counter">0</div>
  <button id="step">Next Step</button>
</div>
<script>
  var count = 0;
  document.getElementById('step').addEventListener('click', function () {
    count += 1;
    document.getElementById('counter').textContent = count;
  });
</script>
</body>
</html>"#;

/// Returned when the generated HTML has no recognizable structure or content.
pub const FALLBACK_CONTENT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Visualization</title>
<style>
  body { font-family: system-ui, sans-serif; background-color: #f8fafc; color: #1e293b; padding: 24px; }
</style>
</head>
<body>
<div>
  <h1>Visualization unavailable</h1>
  <p>This step did not include renderable content.</p>
</div>
</body>
</html>"#;

const DOCTYPE: &str = "<!DOCTYPE html>\n";
const VIEWPORT_META: &str =
    r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#;
const CHARSET_META: &str = r#"<meta charset="UTF-8">"#;
const LIGHT_BACKGROUND: &str = "#f8fafc";

static RE_BLACK_BACKGROUND: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(background(?:-color)?\s*:\s*)(?:black|#000000|#000)\b").ok()
});

/// Turns any candidate HTML into a renderable, self-contained document.
///
/// Repairs are presence-checked, so `repair_html(Some(&repair_html(x)))` equals
/// `repair_html(x)`.
pub fn repair_html(input: Option<&str>) -> String {
    let Some(html) = input.filter(|s| !s.trim().is_empty()) else {
        return FALLBACK_INTERACTIVE_HTML.to_string();
    };

    if !has_renderable_structure(html) {
        return FALLBACK_CONTENT_HTML.to_string();
    }

    let html = ensure_doctype(html.to_string());
    let html = ensure_head_tag(html, &["name=\"viewport\"", "name='viewport'", "name=viewport"], VIEWPORT_META);
    let html = ensure_head_tag(html, &["charset="], CHARSET_META);
    lighten_black_backgrounds(&html)
}

/// Repairs every visualization of a resource, top-level and nested.
pub fn repair_resource(resource: &mut LearningResource) {
    let nested = resource
        .subtopics
        .iter_mut()
        .flat_map(|subtopic| subtopic.visualization_html.iter_mut());

    for step in resource.visualization_html.iter_mut().chain(nested) {
        step.complete_html = repair_html(Some(&step.complete_html));
    }
}

/// An opening html, body or div tag, plus some actual content.
fn has_renderable_structure(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    let has_skeleton = ["<html", "<body", "<div"].iter().any(|t| has_open_tag(&lower, t));
    let has_content = ["<div", "<h1", "<p"].iter().any(|t| has_open_tag(&lower, t));
    has_skeleton && has_content
}

fn has_open_tag(lower: &str, name: &str) -> bool {
    open_tag_end(lower, name).is_some()
}

fn ensure_doctype(html: String) -> String {
    if html.to_ascii_lowercase().contains("<!doctype") {
        html
    } else {
        format!("{DOCTYPE}{html}")
    }
}

/// Inserts `tag` into the document head unless one of `markers` is already present.
fn ensure_head_tag(mut html: String, markers: &[&str], tag: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical to `html`.
    let lower = html.to_ascii_lowercase();
    if markers.iter().any(|m| lower.contains(m)) {
        return html;
    }

    if let Some(pos) = open_tag_end(&lower, "<head") {
        html.insert_str(pos, tag);
    } else if let Some(pos) = open_tag_end(&lower, "<html") {
        html.insert_str(pos, &format!("<head>{tag}</head>"));
    } else if let Some(pos) = open_tag_end(&lower, "<!doctype") {
        html.insert_str(pos, &format!("\n<head>{tag}</head>"));
    } else {
        html.insert_str(0, &format!("<head>{tag}</head>"));
    }
    html
}

/// Byte offset just past the `>` of the first `name` opening tag.
///
/// `<head` must not match `<header` (nor `<p` match `<path`), so the name has to
/// be followed by `>`, `/` or whitespace.
fn open_tag_end(lower: &str, name: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = lower[from..].find(name) {
        let after = from + found + name.len();
        match lower[after..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => {
                return lower[after..].find('>').map(|close| after + close + 1);
            }
            _ => from = after,
        }
    }
    None
}

fn lighten_black_backgrounds(html: &str) -> String {
    match RE_BLACK_BACKGROUND.as_ref() {
        Some(re) => re
            .replace_all(html, format!("${{1}}{LIGHT_BACKGROUND}").as_str())
            .into_owned(),
        None => html.to_string(),
    }
}

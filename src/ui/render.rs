//! Minimal server-side HTML rendering. Pages are small enough that `format!`
//! with escaped interpolation covers everything; no templating engine.

use html_escape::{encode_double_quoted_attribute, encode_text};

pub fn esc(value: &str) -> String {
    encode_text(value).into_owned()
}

pub fn attr(value: &str) -> String {
    encode_double_quoted_attribute(value).into_owned()
}

/// Escaped value of an optional field, empty when absent. Used both for
/// table cells and for form `value=` attributes.
pub fn opt(value: &Option<String>) -> String {
    value.as_deref().map(attr).unwrap_or_default()
}

pub fn page(title: &str, logged_in: bool, flash: Option<&str>, body: &str) -> String {
    let nav = if logged_in {
        r#"<a href="/dashboard">Dashboard</a> | <a href="/shows">Shows</a> | <a href="/actors">Actors</a> | <a href="/crew">Crew</a> | <a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/login">Log in</a> | <a href="/register">Register</a>"#
    };

    let flash_html = flash
        .map(|message| format!(r#"<p class="flash">{}</p>"#, esc(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Castlog</title>
<style>
body {{ font-family: sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }}
nav {{ margin-bottom: 1.5rem; }}
.flash {{ background: #fff3cd; border: 1px solid #ffe69c; padding: 0.5rem 1rem; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}
form.inline {{ display: inline; }}
label {{ display: block; margin-top: 0.6rem; }}
</style>
</head>
<body>
<nav>{nav}</nav>
{flash_html}
<h1>{heading}</h1>
{body}
</body>
</html>
"#,
        title = esc(title),
        heading = esc(title),
    )
}

pub fn error_page() -> String {
    page(
        "Something went wrong",
        false,
        None,
        "<p>An internal error occurred. Please try again.</p>",
    )
}

/// Inline delete button, posting to `action`.
pub fn delete_button(action: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="{}"><button type="submit">Delete</button></form>"#,
        attr(action)
    )
}

//! Server-rendered HTML documents.
//!
//! Each page is a plain function from data to a complete document; all
//! user-supplied text goes through [`escape_html`].

pub mod catalog;
pub mod trainers;

pub use catalog::*;
pub use trainers::*;

/// Wrap `body` in the shared document shell.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="sk">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <nav>
    <a href="/">Home</a>
    <a href="/pokedex">Pokédex</a>
    <a href="/api/trainers">Trainers</a>
    <a href="/api/profile">Profile</a>
  </nav>
  <main>
{body}
  </main>
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

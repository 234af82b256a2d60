//! Server-rendered HTML page: question form, generated SQL, result table.
//!
//! No client-side script; the form posts back to `/` and the whole page is
//! rendered again.

use crate::assistant::Answer;
use crate::types::{ResultSet, SqlGenError};
use std::fmt::Write;

/// What the page shows below the form.
#[derive(Debug, Default)]
pub enum PageView<'a> {
    /// Fresh page, nothing submitted yet
    #[default]
    Empty,
    /// Pipeline ran; rows or an execution error
    Answered(&'a Answer),
    /// Generator failed before any SQL existed
    Failed {
        question: &'a str,
        error: &'a SqlGenError,
    },
}

/// Escape text for HTML element content and quoted attribute values.
///
/// Braces are escaped too so user text can never form a template marker.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full page.
pub fn render_page(view: &PageView<'_>, db_name: &str) -> String {
    let question = match view {
        PageView::Empty => "",
        PageView::Answered(answer) => answer.question.as_str(),
        PageView::Failed { question, .. } => question,
    };

    let mut body = String::new();
    match view {
        PageView::Empty => {}
        PageView::Answered(answer) => render_answer(&mut body, answer),
        PageView::Failed { error, .. } => {
            let _ = write!(
                body,
                r#"<div class="alert error">An error occurred: {}</div>"#,
                escape_html(&error.to_string())
            );
        }
    }

    PAGE_TEMPLATE
        .replace("{{QUESTION}}", &escape_html(question))
        .replace("{{DB_NAME}}", &escape_html(db_name))
        .replace("{{BODY}}", &body)
}

fn render_answer(out: &mut String, answer: &Answer) {
    let _ = write!(
        out,
        r#"<h2>Generated SQL Query:</h2><pre class="code"><code class="language-sql">{}</code></pre>"#,
        escape_html(&answer.sql)
    );

    if let Some(error) = &answer.fetch.error {
        let _ = write!(
            out,
            r#"<div class="alert error">An error occurred: {}</div>"#,
            escape_html(&error.to_string())
        );
    }

    if answer.fetch.is_empty() {
        out.push_str(r#"<div class="alert warning">No results found or an error occurred.</div>"#);
    } else {
        out.push_str("<h2>Query Results:</h2>");
        render_table(out, &answer.fetch.result);
    }
}

fn render_table(out: &mut String, result: &ResultSet) {
    out.push_str("<table><thead><tr>");
    for column in &result.columns {
        let _ = write!(out, "<th>{}</th>", escape_html(column));
    }
    out.push_str("</tr></thead><tbody>");
    for row in &result.rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_html(&cell.to_string()));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>SQL Query Generator</title>
<style>
  :root { --bg: #0e1117; --surface: #161b22; --border: #30363d; --text: #c9d1d9; --accent: #58a6ff; --yellow: #d29922; --red: #f85149; }
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; background: var(--bg); color: var(--text); display: flex; min-height: 100vh; }
  .sidebar { width: 300px; background: var(--surface); border-right: 1px solid var(--border); padding: 24px; }
  .sidebar h2 { font-size: 18px; margin: 16px 0 8px; }
  .info { background: #0d2a4a; border-radius: 6px; padding: 12px; font-size: 13px; line-height: 1.5; }
  .info ol { margin: 8px 0 8px 18px; }
  .main { flex: 1; max-width: 1100px; padding: 32px 48px; }
  h1 { font-size: 30px; margin-bottom: 24px; }
  h2 { font-size: 20px; margin: 24px 0 12px; }
  label { display: block; font-size: 14px; margin-bottom: 6px; }
  input[type=text] { width: 100%; background: var(--surface); border: 1px solid var(--border); color: var(--text); padding: 10px 12px; border-radius: 6px; font-size: 15px; }
  .btn { margin-top: 12px; background: none; border: 1px solid var(--border); color: var(--text); padding: 8px 16px; border-radius: 6px; cursor: pointer; font-size: 14px; }
  .btn:hover { border-color: var(--accent); color: var(--accent); }
  pre.code { background: var(--surface); border: 1px solid var(--border); padding: 12px; border-radius: 6px; overflow-x: auto; font-size: 14px; }
  table { border-collapse: collapse; background: var(--surface); border: 1px solid var(--border); }
  th, td { text-align: left; padding: 6px 12px; border-bottom: 1px solid var(--border); font-size: 13px; }
  th { color: #8b949e; font-weight: 600; }
  .alert { margin-top: 16px; padding: 12px 16px; border-radius: 6px; font-size: 14px; }
  .alert.warning { background: #3b2e0a; color: var(--yellow); }
  .alert.error { background: #3d1214; color: var(--red); }
</style>
</head>
<body>
<div class="sidebar">
  <h2>About</h2>
  <div class="info">
    This app uses Google's Gemini Model to convert natural language questions into SQL queries.
    It then executes the queries on a local SQLite database named <code>{{DB_NAME}}</code>.
    <p><strong>Instructions:</strong></p>
    <ol>
      <li>Enter a question related to the <code>STUDENT</code> database.</li>
      <li>Click on "Generate SQL Query" to see the generated SQL query and its results.</li>
    </ol>
    <strong>Note:</strong> Ensure the <code>{{DB_NAME}}</code> SQLite database is available in the same directory.
  </div>
  <h2>Contact</h2>
  <div class="info">For any queries or support, contact us at: support@example.com</div>
</div>
<div class="main">
  <h1>Gemini App to Retrieve SQL Data</h1>
  <form method="post" action="/">
    <label for="question">Ask a question related to the SQL database:</label>
    <input type="text" id="question" name="question" value="{{QUESTION}}" autocomplete="off">
    <button class="btn" type="submit">Generate SQL Query</button>
  </form>
  {{BODY}}
</div>
</body>
</html>
"#;

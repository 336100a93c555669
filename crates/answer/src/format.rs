//! Conversion of the synthesizer's lightweight markup to render-ready
//! markup.
//!
//! Single forward pass over lines with two flags (inside an unordered
//! list, inside an ordered list). Whatever shape the input has, every
//! opened list tag is closed exactly once.

/// Convert lightweight markup to HTML-style markup.
///
/// - `**text**` becomes a strong-emphasis span anywhere it occurs
/// - bullet lines (`-`, `*`, `•`) open or continue an unordered list
/// - `N. ` lines open or continue an ordered list
/// - other non-blank lines become paragraphs, closing any open list
/// - blank lines close open lists and are dropped
pub fn to_markup(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_ul = false;
    let mut in_ol = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            close_lists(&mut out, &mut in_ul, &mut in_ol);
            continue;
        }

        if let Some(item) = bullet_item(trimmed) {
            if in_ol {
                out.push("</ol>".to_string());
                in_ol = false;
            }
            if !in_ul {
                out.push("<ul>".to_string());
                in_ul = true;
            }
            out.push(format!("<li>{}</li>", convert_bold(item)));
        } else if let Some(item) = ordered_item(trimmed) {
            if in_ul {
                out.push("</ul>".to_string());
                in_ul = false;
            }
            if !in_ol {
                out.push("<ol>".to_string());
                in_ol = true;
            }
            out.push(format!("<li>{}</li>", convert_bold(item)));
        } else {
            close_lists(&mut out, &mut in_ul, &mut in_ol);
            out.push(format!("<p>{}</p>", convert_bold(trimmed)));
        }
    }

    close_lists(&mut out, &mut in_ul, &mut in_ol);

    out.join("\n")
}

fn close_lists(out: &mut Vec<String>, in_ul: &mut bool, in_ol: &mut bool) {
    if *in_ul {
        out.push("</ul>".to_string());
        *in_ul = false;
    }
    if *in_ol {
        out.push("</ol>".to_string());
        *in_ol = false;
    }
}

/// Item text of a bullet line, if this is one.
fn bullet_item(line: &str) -> Option<&str> {
    for marker in ["• ", "- ", "* "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }
    None
}

/// Item text of an `N. ` line, if this is one.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|rest| rest.trim_start())
}

/// Convert `**bold**` spans to `<strong>` spans.
///
/// An unpaired trailing `**` is left as literal text.
fn convert_bold(text: &str) -> String {
    let parts: Vec<&str> = text.split("**").collect();
    if parts.len() < 3 {
        return text.to_string();
    }

    let mut out = String::new();
    let balanced_pairs = (parts.len() - 1) / 2;

    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            let delimiter_index = i; // delimiters seen before this part
            let opens_span = delimiter_index % 2 == 1;
            if opens_span && delimiter_index <= balanced_pairs * 2 - 1 {
                out.push_str("<strong>");
            } else if !opens_span && delimiter_index <= balanced_pairs * 2 {
                out.push_str("</strong>");
            } else {
                out.push_str("**");
            }
        }
        out.push_str(part);
    }

    out
}

//! Readme tab
//!
//! Renders the model's markdown readme to escaped HTML: headings,
//! paragraphs, lists, fenced code, and the usual inline spans. Anything
//! unrecognized passes through as escaped text.

use leptos::prelude::*;

use crate::types::Metadata;

#[component]
pub fn ReadmePage() -> impl IntoView {
    let metadata = expect_context::<RwSignal<Option<Metadata>>>();

    view! {
        <div class="p-6 max-w-3xl mx-auto">
            {move || match metadata.get() {
                Some(meta) => match meta.readme {
                    Some(readme) => view! {
                        <div
                            class="bg-white rounded-lg shadow p-6"
                            inner_html=render_markdown(&readme)
                        ></div>
                    }.into_any(),
                    None => view! {
                        <div class="text-gray-500">"This model has no readme."</div>
                    }.into_any(),
                },
                None => view! {
                    <div class="text-gray-500">"Loading model..."</div>
                }.into_any(),
            }}
        </div>
    }
}

// ============================================================================
// Markdown rendering
// ============================================================================

pub fn render_markdown(text: &str) -> String {
    let mut html = String::from("<div class=\"space-y-3\">");
    let mut in_code_block = false;
    let mut code_content = String::new();
    let mut list_tag: Option<&str> = None;
    let mut paragraph = String::new();

    for line in text.lines() {
        if line.starts_with("```") {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut list_tag);
            if in_code_block {
                html.push_str(&format!(
                    "<pre class=\"bg-gray-100 p-3 rounded-lg text-xs font-mono overflow-x-auto\"><code>{}</code></pre>",
                    html_escape(&code_content)
                ));
                code_content.clear();
            }
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            if !code_content.is_empty() {
                code_content.push('\n');
            }
            code_content.push_str(line);
            continue;
        }

        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut list_tag);
            continue;
        }

        if let Some(heading) = trimmed.strip_prefix('#') {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut list_tag);
            let level = 1 + heading.chars().take_while(|&c| c == '#').count();
            let content = heading.trim_start_matches('#').trim();
            let class = match level {
                1 => "text-2xl font-bold",
                2 => "text-xl font-bold",
                _ => "text-lg font-semibold",
            };
            html.push_str(&format!(
                "<h{} class=\"{}\">{}</h{}>",
                level.min(6),
                class,
                process_inline(content),
                level.min(6)
            ));
            continue;
        }

        if let Some(item) = list_item(trimmed) {
            flush_paragraph(&mut html, &mut paragraph);
            let tag = if trimmed.starts_with(['-', '*']) { "ul" } else { "ol" };
            match list_tag {
                Some(open) if open == tag => {}
                _ => {
                    close_list(&mut html, &mut list_tag);
                    let class = if tag == "ul" { "list-disc" } else { "list-decimal" };
                    html.push_str(&format!("<{} class=\"{} pl-6 space-y-1\">", tag, class));
                    list_tag = Some(tag);
                }
            }
            html.push_str(&format!("<li>{}</li>", process_inline(item)));
            continue;
        }

        close_list(&mut html, &mut list_tag);
        if !paragraph.is_empty() {
            paragraph.push(' ');
        }
        paragraph.push_str(trimmed);
    }

    // An unterminated code fence still renders its content.
    if in_code_block && !code_content.is_empty() {
        html.push_str(&format!(
            "<pre class=\"bg-gray-100 p-3 rounded-lg text-xs font-mono overflow-x-auto\"><code>{}</code></pre>",
            html_escape(&code_content)
        ));
    }
    flush_paragraph(&mut html, &mut paragraph);
    close_list(&mut html, &mut list_tag);
    html.push_str("</div>");
    html
}

fn flush_paragraph(html: &mut String, paragraph: &mut String) {
    if !paragraph.is_empty() {
        html.push_str(&format!(
            "<p class=\"text-sm text-gray-700 leading-relaxed\">{}</p>",
            process_inline(paragraph)
        ));
        paragraph.clear();
    }
}

fn close_list(html: &mut String, list_tag: &mut Option<&str>) {
    if let Some(tag) = list_tag.take() {
        html.push_str(&format!("</{}>", tag));
    }
}

/// The content of a `- `, `* `, or `1. ` list line, if it is one.
fn list_item(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(rest);
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Some(rest);
        }
    }
    None
}

/// Inline spans: code, bold, italic, images, links. Everything else is
/// escaped verbatim.
fn process_inline(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        // `code`
        if chars[i] == '`' {
            if let Some(end) = chars[i + 1..].iter().position(|&c| c == '`') {
                let code: String = chars[i + 1..i + 1 + end].iter().collect();
                out.push_str(&format!(
                    "<code class=\"px-1 py-0.5 text-[0.85em] font-mono bg-gray-100 rounded\">{}</code>",
                    html_escape(&code)
                ));
                i += end + 2;
                continue;
            }
        }

        // **bold**
        if chars[i] == '*' && chars.get(i + 1) == Some(&'*') {
            if let Some(end) = find_double(&chars[i + 2..], '*') {
                let bold: String = chars[i + 2..i + 2 + end].iter().collect();
                out.push_str(&format!("<strong>{}</strong>", html_escape(&bold)));
                i += end + 4;
                continue;
            }
        }

        // *italic*
        if chars[i] == '*' {
            if let Some(end) = chars[i + 1..].iter().position(|&c| c == '*') {
                if end > 0 {
                    let italic: String = chars[i + 1..i + 1 + end].iter().collect();
                    out.push_str(&format!("<em>{}</em>", html_escape(&italic)));
                    i += end + 2;
                    continue;
                }
            }
        }

        // ![alt](src)
        if chars[i] == '!' && chars.get(i + 1) == Some(&'[') {
            if let Some((alt, src, consumed)) = parse_bracketed(&chars[i + 1..]) {
                out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\" class=\"max-w-full rounded\"/>",
                    html_escape(&src),
                    html_escape(&alt)
                ));
                i += consumed + 1;
                continue;
            }
        }

        // [text](href)
        if chars[i] == '[' {
            if let Some((label, href, consumed)) = parse_bracketed(&chars[i..]) {
                out.push_str(&format!(
                    "<a href=\"{}\" class=\"text-blue-600 hover:underline\">{}</a>",
                    html_escape(&href),
                    html_escape(&label)
                ));
                i += consumed;
                continue;
            }
        }

        out.push_str(&escape_char(chars[i]));
        i += 1;
    }

    out
}

/// Parses `[label](target)` starting at the opening bracket; returns the
/// label, the target, and the number of characters consumed.
fn parse_bracketed(chars: &[char]) -> Option<(String, String, usize)> {
    if chars.first() != Some(&'[') {
        return None;
    }
    let close = chars.iter().position(|&c| c == ']')?;
    if chars.get(close + 1) != Some(&'(') {
        return None;
    }
    let paren = chars[close + 2..].iter().position(|&c| c == ')')?;
    let label: String = chars[1..close].iter().collect();
    let target: String = chars[close + 2..close + 2 + paren].iter().collect();
    Some((label, target, close + 2 + paren + 1))
}

fn find_double(chars: &[char], marker: char) -> Option<usize> {
    (0..chars.len().saturating_sub(1))
        .find(|&idx| chars[idx] == marker && chars[idx + 1] == marker)
}

fn html_escape(text: &str) -> String {
    text.chars().map(|c| escape_char(c)).collect()
}

fn escape_char(c: char) -> String {
    match c {
        '&' => "&amp;".to_string(),
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        '"' => "&quot;".to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let html = render_markdown("# Title\n\nSome text.");
        assert!(html.contains("<h1 class=\"text-2xl font-bold\">Title</h1>"));
        assert!(html.contains("Some text."));
    }

    #[test]
    fn test_paragraph_lines_join() {
        let html = render_markdown("line one\nline two");
        assert!(html.contains("line one line two"));
    }

    #[test]
    fn test_code_block_is_escaped() {
        let html = render_markdown("```\n<b>raw</b>\n```");
        assert!(html.contains("&lt;b&gt;raw&lt;/b&gt;"));
        assert!(!html.contains("<b>raw</b>"));
    }

    #[test]
    fn test_inline_spans() {
        let html = render_markdown("use `flag` with **force** and *care*");
        assert!(html.contains("<code"));
        assert!(html.contains("<strong>force</strong>"));
        assert!(html.contains("<em>care</em>"));
    }

    #[test]
    fn test_link_and_image() {
        let html = render_markdown("[docs](https://example.com) ![demo](/files/demo.png)");
        assert!(html.contains("<a href=\"https://example.com\""));
        assert!(html.contains("<img src=\"/files/demo.png\" alt=\"demo\""));
    }

    #[test]
    fn test_lists() {
        let html = render_markdown("- one\n- two\n\n1. first\n2. second");
        assert!(html.contains("<ul class=\"list-disc pl-6 space-y-1\"><li>one</li><li>two</li></ul>"));
        assert!(html.contains("<ol class=\"list-decimal pl-6 space-y-1\"><li>first</li><li>second</li></ol>"));
    }

    #[test]
    fn test_plain_text_is_escaped() {
        let html = render_markdown("a < b & c");
        assert!(html.contains("a &lt; b &amp; c"));
    }
}

//! Escaping and a small markdown subset for page text.

/// Escape text for use in HTML element content and attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render `#`/`##`/`###` headings and blank-line separated paragraphs.
///
/// Everything else is treated as plain paragraph text and escaped.
pub fn render_markdown(source: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
            continue;
        }

        if let Some((level, text)) = heading(trimmed) {
            flush_paragraph(&mut html, &mut paragraph);
            html.push_str(&format!("<h{level}>{}</h{level}>\n", escape(text)));
            continue;
        }

        paragraph.push(trimmed);
    }

    flush_paragraph(&mut html, &mut paragraph);
    html
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|text| (level, text.trim())))
}

fn flush_paragraph(html: &mut String, paragraph: &mut Vec<&str>) {
    if paragraph.is_empty() {
        return;
    }
    html.push_str(&format!("<p>{}</p>\n", escape(&paragraph.join(" "))));
    paragraph.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"<b>"AT&T's"</b>"#),
            "&lt;b&gt;&quot;AT&amp;T&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn renders_heading_and_paragraph() {
        let html = render_markdown(
            "\n# Simple Stock Price App\nShown are the stock closing price and volume of Netflix!\n",
        );
        assert_eq!(
            html,
            "<h1>Simple Stock Price App</h1>\n<p>Shown are the stock closing price and volume of Netflix!</p>\n"
        );
    }

    #[test]
    fn joins_wrapped_lines_and_splits_on_blank_lines() {
        let html = render_markdown("one\ntwo\n\n## Next\nthree");
        assert_eq!(html, "<p>one two</p>\n<h2>Next</h2>\n<p>three</p>\n");
    }

    #[test]
    fn hash_without_space_is_text() {
        assert_eq!(render_markdown("#hashtag"), "<p>#hashtag</p>\n");
    }
}

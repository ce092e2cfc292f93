//! @acp:module "Markdown to HTML"
//! @acp:summary "CommonMark + GFM tables to HTML, with anchor ids on headings"
//! @acp:domain export
//! @acp:layer service

use std::collections::HashMap;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// `Water & Storage` -> `water-storage`
fn heading_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

/// Give every heading without an explicit `{#id}` a unique slug id
fn with_heading_ids(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for i in 0..events.len() {
        let Event::Start(Tag::Heading { id: None, .. }) = &events[i] else {
            continue;
        };
        let text: String = events[i + 1..]
            .iter()
            .take_while(|e| !matches!(e, Event::End(TagEnd::Heading(_))))
            .filter_map(|e| match e {
                Event::Text(t) | Event::Code(t) => Some(&**t),
                _ => None,
            })
            .collect();

        let base = heading_slug(&text);
        let count = seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 { base } else { format!("{}_{}", base, count) };
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }
    events
}

/// Convert a markdown document to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let events = with_heading_ids(Parser::new_ext(markdown, options()).collect());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blocks() {
        let md = "# Water & Storage\n\n_By Dana_\n\nFirst line\nsecond line.\n\n- one\n- two\n\n1. step\n";
        let html = markdown_to_html(md);
        assert!(html.contains(r#"<h1 id="water-storage">Water &amp; Storage</h1>"#), "{html}");
        assert!(html.contains("<p><em>By Dana</em></p>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<ol>"));
        assert!(html.contains("<li>step</li>"));
    }

    #[test]
    fn test_table() {
        let md = "| name | price |\n| --- | --- |\n| Jug \\| 5L | 12.5 |\n\nAfter.";
        let html = markdown_to_html(md);
        assert!(html.contains("<table>"), "{html}");
        assert!(html.contains("<th>name</th>"));
        assert!(html.contains("<td>Jug | 5L</td>"));
        assert!(html.contains("<td>12.5</td>"));
        assert!(html.contains("<p>After.</p>"));
    }

    #[test]
    fn test_inline_markup() {
        let html = markdown_to_html("See **[CDC](https://www.cdc.gov/water)** and `a<b`.");
        assert!(html.contains(
            r#"<strong><a href="https://www.cdc.gov/water">CDC</a></strong> and <code>a&lt;b</code>"#
        ));
    }

    #[test]
    fn test_fenced_code_is_escaped() {
        let html = markdown_to_html("```\n# not a heading\n<b>\n```");
        assert!(html.contains("<pre><code># not a heading\n&lt;b&gt;\n</code></pre>"), "{html}");
        assert!(!html.contains("<h1"));
    }

    #[test]
    fn test_nested_lists_and_quotes() {
        let html = markdown_to_html("- outer\n  - inner\n\n> first\n> second\n");
        assert_eq!(html.matches("<ul>").count(), 2, "{html}");
        assert!(html.contains("<li>inner</li>"));
        assert_eq!(html.matches("<blockquote>").count(), 1);
        assert!(html.contains("second"));
    }

    #[test]
    fn test_reference_links_and_inline_html() {
        let md = "Read [the CDC page][cdc]. Keep it <kbd>cool</kbd>.\n\n[cdc]: https://www.cdc.gov/water\n";
        let html = markdown_to_html(md);
        assert!(html.contains(r#"<a href="https://www.cdc.gov/water">the CDC page</a>"#), "{html}");
        assert!(html.contains("<kbd>cool</kbd>"));
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let html = markdown_to_html("## FAQ\n\n## FAQ\n\n## Step-by-step `tips`\n");
        assert!(html.contains(r#"<h2 id="faq">"#), "{html}");
        assert!(html.contains(r#"<h2 id="faq_1">"#));
        assert!(html.contains(r#"<h2 id="step-by-step-tips">"#));
    }

    #[test]
    fn test_heading_slug() {
        assert_eq!(heading_slug("Water & Storage"), "water-storage");
        assert_eq!(heading_slug("  TL;DR  "), "tldr");
        assert_eq!(heading_slug("!!!"), "section");
    }
}

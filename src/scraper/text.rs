//! Turns statement markup into Markdown-flavoured plain text.

use crate::document::Block;
use scraper::ElementRef;

/// Renders the inline content of `element`: entities decoded, whitespace
/// collapsed, emphasis and code spans kept as Markdown markers.
pub fn inline_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_children(element, &mut out);
    finish(&out)
}

/// Contents of a `<pre>` block with surrounding blank lines removed.
pub fn preformatted_text(element: ElementRef<'_>) -> String {
    let raw = element.text().collect::<String>().replace("\r\n", "\n");
    let lines: Vec<&str> = raw.lines().map(str::trim_end).collect();
    lines.join("\n").trim_matches('\n').to_string()
}

/// Strips the Markdown markers [`inline_text`] adds.
pub fn plain(text: &str) -> String {
    text.replace("**", "").replace('`', "")
}

pub fn is_sample_label(text: &str) -> bool {
    let label = plain(text).trim().to_ascii_uppercase();
    let label = label.trim_end_matches(':').trim_end();
    label == "SAMPLE INPUT" || label == "SAMPLE OUTPUT"
}

fn push_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            push_text(out, text);
        } else if let Some(child) = ElementRef::wrap(child) {
            push_element(child, out);
        }
    }
}

fn push_element(element: ElementRef<'_>, out: &mut String) {
    match element.value().name() {
        "br" => {
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
        "strong" | "b" => push_wrapped(element, "**", out),
        "em" | "i" => push_wrapped(element, "*", out),
        "code" | "tt" => push_wrapped(element, "`", out),
        "sup" => {
            out.push('^');
            push_children(element, out);
        }
        "sub" => {
            out.push('_');
            push_children(element, out);
        }
        "script" | "style" | "img" => {}
        _ => push_children(element, out),
    }
}

fn push_wrapped(element: ElementRef<'_>, marker: &str, out: &mut String) {
    let mut inner = String::new();
    push_children(element, &mut inner);

    let trimmed = inner.trim();
    if trimmed.is_empty() {
        push_text(out, &inner);
        return;
    }
    if inner.starts_with(' ') {
        push_text(out, " ");
    }
    out.push_str(marker);
    out.push_str(trimmed);
    out.push_str(marker);
    if inner.ends_with(' ') {
        push_text(out, " ");
    }
}

fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.ends_with(' ') && !out.ends_with('\n') {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

fn finish(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Walks a statement container and splits it into blocks.
///
/// Sample `pre.in` / `pre.out` elements and their labels are skipped; they
/// are collected separately.
#[derive(Default)]
pub struct BlockCollector {
    blocks: Vec<Block>,
    pending: String,
}

impl BlockCollector {
    pub fn collect(mut self, container: ElementRef<'_>) -> Vec<Block> {
        self.walk(container);
        self.flush();
        self.blocks
    }

    fn walk(&mut self, container: ElementRef<'_>) {
        for child in container.children() {
            if let Some(text) = child.value().as_text() {
                push_text(&mut self.pending, text);
                continue;
            }
            let Some(element) = ElementRef::wrap(child) else {
                continue;
            };

            match element.value().name() {
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    self.flush();
                    let text = plain(&inline_text(element));
                    if !text.is_empty() && !is_sample_label(&text) {
                        self.blocks.push(Block::Heading(text));
                    }
                }
                "p" => {
                    self.flush();
                    self.push_paragraph(inline_text(element));
                }
                "ul" | "ol" => {
                    self.flush();
                    for item in element.children().filter_map(ElementRef::wrap) {
                        let text = inline_text(item);
                        if !text.is_empty() {
                            self.blocks.push(Block::ListItem(text));
                        }
                    }
                }
                "pre" => {
                    self.flush();
                    let is_sample = element
                        .value()
                        .classes()
                        .any(|class| class == "in" || class == "out");
                    if !is_sample {
                        let code = preformatted_text(element);
                        if !code.is_empty() {
                            self.blocks.push(Block::Code(code));
                        }
                    }
                }
                "div" | "span" | "section" | "center" | "blockquote" | "article" => {
                    self.flush();
                    self.walk(element);
                    self.flush();
                }
                "script" | "style" | "img" | "hr" => {}
                _ => push_element(element, &mut self.pending),
            }
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = finish(&std::mem::take(&mut self.pending));
        self.push_paragraph(text);
    }

    fn push_paragraph(&mut self, text: String) {
        if !text.is_empty() && !is_sample_label(&text) {
            self.blocks.push(Block::Paragraph(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, css: &str) -> ElementRef<'a> {
        html.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn decodes_entities_and_keeps_emphasis() {
        let html = Html::parse_fragment(
            "<p>Bessie&nbsp;has  <strong>N</strong> cows &amp; <em>M</em>\n  farms&lt;3</p>",
        );
        assert_eq!(
            inline_text(first(&html, "p")),
            "Bessie has **N** cows & *M* farms<3"
        );
    }

    #[test]
    fn exponents_and_indices_stay_readable() {
        let html = Html::parse_fragment("<p>N &le; 10<sup>9</sup> and a<sub>i</sub> &gt; 0</p>");
        assert_eq!(inline_text(first(&html, "p")), "N ≤ 10^9 and a_i > 0");
    }

    #[test]
    fn line_breaks_survive() {
        let html = Html::parse_fragment("<p>first line <br> second line</p>");
        assert_eq!(inline_text(first(&html, "p")), "first line\nsecond line");
    }

    #[test]
    fn preformatted_keeps_inner_layout() {
        let html = Html::parse_fragment("<pre class=\"in\">\n3 2\n1  2 3\n</pre>");
        assert_eq!(preformatted_text(first(&html, "pre")), "3 2\n1  2 3");
    }

    #[test]
    fn collector_skips_samples_and_labels() {
        let html = Html::parse_fragment(
            r#"<div id="s">Intro text <strong>here</strong>
            <h4>INPUT FORMAT</h4>
            <p>Two integers.</p>
            <ul><li>one</li><li>two</li></ul>
            <h5>SAMPLE INPUT:</h5><pre class="in">1 2</pre>
            <h5>SAMPLE OUTPUT:</h5><pre class="out">3</pre>
            <pre>a = b</pre>
            </div>"#,
        );
        let blocks = BlockCollector::default().collect(first(&html, "#s"));
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("Intro text **here**".to_string()),
                Block::Heading("INPUT FORMAT".to_string()),
                Block::Paragraph("Two integers.".to_string()),
                Block::ListItem("one".to_string()),
                Block::ListItem("two".to_string()),
                Block::Code("a = b".to_string()),
            ]
        );
    }

    #[test]
    fn sample_labels_in_any_case() {
        assert!(is_sample_label("**SAMPLE INPUT:**"));
        assert!(is_sample_label("Sample Output"));
        assert!(!is_sample_label("SCORING"));
    }
}

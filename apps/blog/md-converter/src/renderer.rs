//! Markdown to HTML rendering with GitHub Flavored Markdown extensions
//! (tables, strikethrough, autolinks, task lists).

use comrak::{Options, markdown_to_html};

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render markdown source to an HTML fragment. Pure: the same input always
    /// yields the same output.
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::default();
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        markdown_to_html(markdown, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold() {
        let html = MarkdownRenderer::new().render("**bold**");
        assert_eq!(html, "<p><strong>bold</strong></p>\n");
    }

    #[test]
    fn test_heading() {
        let html = MarkdownRenderer::new().render("# Hi");
        assert_eq!(html, "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_gfm_extensions() {
        let renderer = MarkdownRenderer::new();

        let html = renderer.render("~~gone~~");
        assert!(html.contains("<del>gone</del>"));

        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));

        let html = renderer.render("see https://dev.to for more");
        assert!(html.contains(r#"<a href="https://dev.to">"#));
    }

    #[test]
    fn test_raw_html_is_not_passed_through() {
        let html = MarkdownRenderer::new().render("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = MarkdownRenderer::new();
        let source = "# Title\n\n- one\n- two\n";
        assert_eq!(renderer.render(source), renderer.render(source));
    }
}

//! HTML construction
//!
//! Small element builder used by the page renderers. Text and attribute
//! values are escaped; `raw` exists for fragments that were already
//! rendered by this module.

use crate::classes::ClassSet;

/// Elements that never take a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(String),
}

/// An HTML element: tag, attributes in insertion order, children.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn class(self, classes: &ClassSet) -> Self {
        self.attr("class", &classes.render())
    }

    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Node::Element(element));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    /// Append pre-rendered markup verbatim.
    pub fn raw(mut self, markup: &str) -> Self {
        self.children.push(Node::Raw(markup.to_string()));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Element(e) => e.render_into(out),
                Node::Text(t) => out.push_str(&escape_text(t)),
                Node::Raw(r) => out.push_str(r),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Wrap a rendered body in the shared page shell.
pub fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, 'Helvetica Neue', Helvetica, Arial, sans-serif; margin: 0; background: #f5f5f7; color: #1d1d1f; line-height: 1.5; }}
.container {{ max-width: 960px; margin: 0 auto; padding: 2rem; }}
a {{ color: #007aff; }}
.download-link {{ display: inline-block; padding: 1rem 1.5rem; margin: 0.5rem; border-radius: 12px; background: #ffffff; box-shadow: 0 2px 8px rgba(0,0,0,0.08); text-decoration: none; color: inherit; }}
.download-link-featured {{ font-size: 1.25rem; }}
.asset-name {{ font-family: 'SF Mono', Menlo, Monaco, monospace; font-size: 0.8125rem; color: #86868b; }}
.col-half {{ display: inline-block; width: 45%; text-align: center; }}
.col-full {{ display: block; text-align: center; }}
.template-section {{ display: none; margin: 0.75rem 0; padding: 0.75rem 1rem; border-left: 3px solid #d2d2d7; background: #ffffff; }}
.template-section.visible-section {{ display: block; }}
.command-preview {{ font-family: 'SF Mono', Menlo, Monaco, monospace; background: #1d1d1f; color: #f5f5f7; padding: 1rem; border-radius: 8px; }}
.note {{ color: #86868b; font-size: 0.875rem; }}
</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>
"#,
        title = escape_text(title),
        body = body
    )
}

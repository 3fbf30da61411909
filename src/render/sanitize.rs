//! Allowlist HTML sanitizer for post bodies.
//!
//! Bodies keep common formatting, lists, tables, links and images. Scripting
//! elements are removed together with their content, unknown elements are
//! replaced by their children, and URLs are limited to safe schemes.

use std::collections::{HashMap, HashSet};

use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{ElementRef, Html, Node};

/// Dropped along with everything inside them.
const REMOVE_WITH_CONTENTS: &[&str] = &[
    "embed", "iframe", "math", "noembed", "noframes", "noscript", "object", "plaintext", "script",
    "style", "svg", "template", "xmp",
];

const VOID_ELEMENTS: &[&str] = &["br", "col", "hr", "img", "wbr"];

const RELAXED_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "b", "bdi", "bdo", "blockquote", "br", "caption",
    "cite", "code", "col", "colgroup", "data", "dd", "del", "details", "dfn", "div", "dl", "dt",
    "em", "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup",
    "hr", "i", "img", "ins", "kbd", "li", "main", "mark", "nav", "ol", "p", "pre", "q", "rp", "rt",
    "ruby", "s", "samp", "section", "small", "span", "strike", "strong", "sub", "summary", "sup",
    "table", "tbody", "td", "tfoot", "th", "thead", "time", "tr", "u", "ul", "var", "wbr",
];

const GLOBAL_ATTRIBUTES: &[&str] = &[
    "class", "dir", "hidden", "id", "lang", "tabindex", "title", "translate",
];

const ELEMENT_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "hreflang", "name"]),
    ("blockquote", &["cite"]),
    ("col", &["span", "width"]),
    ("colgroup", &["span", "width"]),
    ("data", &["value"]),
    ("del", &["cite", "datetime"]),
    ("img", &["align", "alt", "border", "height", "src", "width"]),
    ("ins", &["cite", "datetime"]),
    ("li", &["value"]),
    ("ol", &["reversed", "start", "type"]),
    ("q", &["cite"]),
    ("table", &["align", "border", "cellpadding", "cellspacing", "summary", "width"]),
    ("td", &["abbr", "align", "colspan", "headers", "rowspan", "valign", "width"]),
    ("th", &["abbr", "align", "colspan", "headers", "rowspan", "scope", "valign", "width"]),
    ("time", &["datetime"]),
    ("ul", &["type"]),
];

const LINK_PROTOCOLS: &[&str] = &["ftp", "http", "https", "mailto"];
const WEB_PROTOCOLS: &[&str] = &["http", "https"];

/// Attributes holding URLs, with the schemes they may use.
const URL_ATTRIBUTES: &[((&str, &str), &[&str])] = &[
    (("a", "href"), LINK_PROTOCOLS),
    (("blockquote", "cite"), WEB_PROTOCOLS),
    (("del", "cite"), WEB_PROTOCOLS),
    (("img", "src"), WEB_PROTOCOLS),
    (("ins", "cite"), WEB_PROTOCOLS),
    (("q", "cite"), WEB_PROTOCOLS),
];

pub struct Sanitizer {
    elements: HashSet<&'static str>,
    global_attributes: HashSet<&'static str>,
    attributes: HashMap<&'static str, HashSet<&'static str>>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::relaxed()
    }
}

impl Sanitizer {
    /// Formatting, structure, tables, links and images; no inline styles.
    pub fn relaxed() -> Self {
        Self {
            elements: RELAXED_ELEMENTS.iter().copied().collect(),
            global_attributes: GLOBAL_ATTRIBUTES.iter().copied().collect(),
            attributes: ELEMENT_ATTRIBUTES
                .iter()
                .map(|(element, attrs)| (*element, attrs.iter().copied().collect()))
                .collect(),
        }
    }

    /// Return a safe HTML fragment for `html`. Kept attributes are written
    /// in name order.
    pub fn clean(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let mut out = String::with_capacity(html.len());
        self.write_children(fragment.root_element(), &mut out);
        out
    }

    fn write_children(&self, parent: ElementRef<'_>, out: &mut String) {
        for child in parent.children() {
            match child.value() {
                Node::Text(text) => out.push_str(&encode_text(&**text)),
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        self.write_element(element, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn write_element(&self, element: ElementRef<'_>, out: &mut String) {
        let name = element.value().name();

        if REMOVE_WITH_CONTENTS.contains(&name) {
            return;
        }
        if !self.elements.contains(name) {
            self.write_children(element, out);
            return;
        }

        let mut attrs: Vec<(&str, &str)> = element
            .value()
            .attrs()
            .filter(|(attr, value)| self.allows_attribute(name, attr, value))
            .collect();
        attrs.sort_unstable_by_key(|(attr, _)| *attr);

        out.push('<');
        out.push_str(name);
        for (attr, value) in attrs {
            out.push(' ');
            out.push_str(attr);
            out.push_str("=\"");
            out.push_str(&encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&name) {
            return;
        }

        self.write_children(element, out);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    fn allows_attribute(&self, element: &str, attr: &str, value: &str) -> bool {
        let listed = self.global_attributes.contains(attr)
            || self
                .attributes
                .get(element)
                .is_some_and(|attrs| attrs.contains(attr));
        if !listed {
            return false;
        }

        match URL_ATTRIBUTES
            .iter()
            .find(|((e, a), _)| *e == element && *a == attr)
        {
            Some((_, protocols)) => url_allowed(value, protocols),
            None => true,
        }
    }
}

/// Relative URLs pass; absolute ones need a listed scheme.
fn url_allowed(value: &str, protocols: &[&str]) -> bool {
    let value = value.trim();
    match value.find(|c| matches!(c, ':' | '/' | '?' | '#')) {
        Some(pos) if value[pos..].starts_with(':') => {
            let scheme = value[..pos].to_ascii_lowercase();
            protocols.contains(&scheme.as_str())
        }
        _ => true,
    }
}

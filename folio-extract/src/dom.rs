//! Owned markup tree with a small, typed query surface.
//!
//! The HTML is parsed once with `scraper` and copied into owned
//! [`Element`] values. Only elements and text survive the copy; comments,
//! doctypes and processing instructions are dropped. The owned tree is
//! `Send`, so callers may hold it across `.await` points.

use scraper::{ElementRef, Html, Node as ParsedNode};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Tag + class + attribute predicate used by [`Element::find`] and
/// [`Element::find_all`].
///
/// ```
/// use folio_extract::dom::{Element, Query};
///
/// const MUTED: Query<'static> = Query::tag("span")
///     .with_classes(&["t-14", "t-normal"])
///     .without_classes(&["t-bold"]);
///
/// let root = Element::parse_fragment(r#"<span class="t-14 t-normal t-bold">a</span>
///     <span class="t-normal t-14">b</span>"#);
/// assert_eq!(root.find(&MUTED).map(|e| e.text()).as_deref(), Some("b"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Query<'q> {
    tag: &'q str,
    classes: &'q [&'q str],
    excluded: &'q [&'q str],
    attr: Option<(&'q str, &'q str)>,
}

impl<'q> Query<'q> {
    pub const fn tag(tag: &'q str) -> Self {
        Self {
            tag,
            classes: &[],
            excluded: &[],
            attr: None,
        }
    }

    /// Every listed class must be present, in any order.
    pub const fn with_classes(mut self, classes: &'q [&'q str]) -> Self {
        self.classes = classes;
        self
    }

    /// None of the listed classes may be present.
    pub const fn without_classes(mut self, classes: &'q [&'q str]) -> Self {
        self.excluded = classes;
        self
    }

    /// Attribute `name` must equal `value` exactly.
    pub const fn with_attr(mut self, name: &'q str, value: &'q str) -> Self {
        self.attr = Some((name, value));
        self
    }

    pub fn matches(&self, el: &Element) -> bool {
        if !el.name.eq_ignore_ascii_case(self.tag) {
            return false;
        }
        if !el.has_classes(self.classes) {
            return false;
        }
        if self.excluded.iter().any(|c| el.has_class(c)) {
            return false;
        }
        match self.attr {
            Some((name, value)) => el.attr(name) == Some(value),
            None => true,
        }
    }
}

impl Element {
    /// Parse an HTML fragment (e.g. the inner HTML of `<main>`).
    ///
    /// The returned element is the synthetic `html` root the parser wraps
    /// fragments in. Malformed markup is recovered, never rejected.
    pub fn parse_fragment(html: &str) -> Element {
        let parsed = Html::parse_fragment(html);
        copy_element(parsed.root_element())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn has_classes(&self, wanted: &[&str]) -> bool {
        wanted.iter().all(|w| self.has_class(w))
    }

    fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Descendant elements in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.child_elements().rev().collect(),
        }
    }

    /// First descendant matching `query`, in document order.
    pub fn find(&self, query: &Query<'_>) -> Option<&Element> {
        self.descendants().find(|el| query.matches(el))
    }

    /// All descendants matching `query`, in document order. Nested matches
    /// are included.
    pub fn find_all(&self, query: &Query<'_>) -> Vec<&Element> {
        self.descendants().filter(|el| query.matches(el)).collect()
    }

    /// Descendant text, each text node trimmed, empty ones dropped, joined
    /// without a separator.
    pub fn text(&self) -> String {
        let mut out = String::new();
        push_text(self, &mut out);
        out
    }
}

fn push_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(t) => out.push_str(t.trim()),
            Node::Element(e) => push_text(e, out),
        }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let el = self.stack.pop()?;
        self.stack.extend(el.child_elements().rev());
        Some(el)
    }
}

fn copy_element(el: ElementRef<'_>) -> Element {
    let children = el
        .children()
        .filter_map(|child| match child.value() {
            ParsedNode::Text(t) => Some(Node::Text((**t).to_owned())),
            ParsedNode::Element(_) => {
                ElementRef::wrap(child).map(|e| Node::Element(copy_element(e)))
            }
            _ => None,
        })
        .collect();

    Element {
        name: el.value().name().to_owned(),
        attrs: el
            .value()
            .attrs()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect(),
        children,
    }
}

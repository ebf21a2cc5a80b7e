//! Minimal SVG element tree used as the drawing surface.
//!
//! Primitives are appended to the innermost open group. Groups are opened
//! through [`SvgDocument::group`] or [`GroupGuard::group`] and attach
//! themselves to their parent when the guard is dropped, so every exit path
//! (including `?`) closes them.

use std::fmt::Write as _;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawError {
    #[error("attributes for <{element}> must come in name/value pairs, got {count} items")]
    UnpairedAttributes { element: String, count: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Child {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Child>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Builds an element from a flat `name, value, name, value, ...` list.
    /// An odd number of items is rejected before anything is built.
    pub fn with_attrs<S: AsRef<str>>(name: &str, attrs: &[S]) -> Result<Self, DrawError> {
        if attrs.len() % 2 != 0 {
            return Err(DrawError::UnpairedAttributes {
                element: name.to_string(),
                count: attrs.len(),
            });
        }
        let mut element = Self::new(name);
        for pair in attrs.chunks_exact(2) {
            element.set_attr(pair[0].as_ref(), pair[1].as_ref());
        }
        Ok(element)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(name, _)| name == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
        self
    }

    pub fn add_class(&mut self, class: &str) -> &mut Self {
        let merged = match self.attr("class") {
            Some(existing) if existing.split_whitespace().any(|c| c == class) => return self,
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", merged)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(Child::Element(child));
        match self.children.last_mut() {
            Some(Child::Element(element)) => element,
            _ => unreachable!("element was just pushed"),
        }
    }

    pub fn prepend(&mut self, child: Element) {
        self.children.insert(0, Child::Element(child));
    }

    pub fn push_text(&mut self, text: &str) {
        self.children.push(Child::Text(text.to_string()));
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(element) => Some(element),
            Child::Text(_) => None,
        })
    }

    /// Depth-first pre-order walk over this element and all descendants.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        let mut idx = 0;
        while idx < out.len() {
            let current = out[idx];
            let insert_at = idx + 1;
            let children: Vec<&Element> = current.elements().collect();
            out.splice(insert_at..insert_at, children);
            idx += 1;
        }
        out
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(element) => out.push_str(&element.text_content()),
            }
        }
        out
    }

    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", key, escape_xml(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Child::Element(element) => element.write_to(out),
                Child::Text(text) => out.push_str(&escape_xml(text)),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

fn circle(cx: f32, cy: f32, radius: f32) -> Element {
    let mut el = Element::new("circle");
    el.set_attr("cx", fmt_num(cx))
        .set_attr("cy", fmt_num(cy))
        .set_attr("r", fmt_num(radius));
    el
}

fn text(x: f32, y: f32, content: &str) -> Element {
    let mut el = Element::new("text");
    el.set_attr("x", fmt_num(x)).set_attr("y", fmt_num(y));
    el.push_text(content);
    el
}

pub fn title(content: &str) -> Element {
    let mut el = Element::new("title");
    el.push_text(content);
    el
}

/// Drawing operations shared by the document root and open groups.
pub trait Canvas {
    fn target(&mut self) -> &mut Element;

    fn circle(&mut self, cx: f32, cy: f32, radius: f32, tooltip: Option<&str>) -> &mut Element {
        let mut el = circle(cx, cy, radius);
        if let Some(tooltip) = tooltip {
            el.push(title(tooltip));
        }
        self.target().push(el)
    }

    fn text(&mut self, x: f32, y: f32, content: &str) -> &mut Element {
        self.target().push(text(x, y, content))
    }

    fn title(&mut self, content: &str) -> &mut Element {
        self.target().push(title(content))
    }

    fn add(&mut self, element: Element) -> &mut Element {
        self.target().push(element)
    }
}

pub struct SvgDocument {
    root: Element,
}

impl SvgDocument {
    pub fn new(width: f32, height: f32) -> Self {
        let mut root = Element::new("svg");
        root.set_attr("xmlns", SVG_NS)
            .set_attr("width", fmt_num(width))
            .set_attr("height", fmt_num(height));
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn group<S: AsRef<str>>(&mut self, attrs: &[S]) -> Result<GroupGuard<'_>, DrawError> {
        GroupGuard::open(&mut self.root, attrs)
    }

    /// Inserts an element as the first child of the root so it renders beneath
    /// everything drawn so far.
    pub fn prepend(&mut self, element: Element) {
        self.root.prepend(element);
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.root.write_to(&mut out);
        out
    }
}

impl Canvas for SvgDocument {
    fn target(&mut self) -> &mut Element {
        &mut self.root
    }
}

/// An open `<g>`; attaches to its parent when dropped.
pub struct GroupGuard<'a> {
    parent: &'a mut Element,
    group: Element,
}

impl<'a> GroupGuard<'a> {
    fn open<S: AsRef<str>>(parent: &'a mut Element, attrs: &[S]) -> Result<Self, DrawError> {
        let group = Element::with_attrs("g", attrs)?;
        Ok(Self { parent, group })
    }

    pub fn group<S: AsRef<str>>(&mut self, attrs: &[S]) -> Result<GroupGuard<'_>, DrawError> {
        GroupGuard::open(&mut self.group, attrs)
    }
}

impl Canvas for GroupGuard<'_> {
    fn target(&mut self) -> &mut Element {
        &mut self.group
    }
}

impl Drop for GroupGuard<'_> {
    fn drop(&mut self) {
        let group = std::mem::take(&mut self.group);
        self.parent.push(group);
    }
}

#[derive(Debug, Default)]
pub struct PathBuilder {
    d: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.command('M', x, y);
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.command('L', x, y);
        self
    }

    fn command(&mut self, cmd: char, x: f32, y: f32) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        let _ = write!(self.d, "{cmd} {} {}", fmt_num(x), fmt_num(y));
    }

    pub fn build(self) -> String {
        self.d
    }
}

pub fn points_to_path(points: &[(f32, f32)]) -> String {
    let mut builder = PathBuilder::new();
    for (idx, (x, y)) in points.iter().enumerate() {
        builder = if idx == 0 {
            builder.move_to(*x, *y)
        } else {
            builder.line_to(*x, *y)
        };
    }
    builder.build()
}

pub fn translate(x: f32, y: f32) -> String {
    format!("translate({},{})", fmt_num(x), fmt_num(y))
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut s = format!("{rounded:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

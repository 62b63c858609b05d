// src/core/html.rs
//! Tolerant, static HTML reader.
//!
//! [`Dom::parse`] walks the markup once and records every element in document
//! (pre-)order with its parent, children and byte ranges into the source. No
//! scripts run, no CSS is applied; it only needs to be good enough to answer
//! "which element contains which" on real-world, not-quite-valid pages.
//!
//! Recovery rules:
//! - void elements (`<br>`, `<img>`, …) and `<x/>` never take children
//! - `<script>`/`<style>` bodies are raw text and never parsed as markup
//! - a close tag closes the nearest open element with that name, implicitly
//!   closing anything opened inside it; unmatched close tags are ignored
//! - whatever is still open at EOF is closed at EOF

use std::ops::Range;

use super::sanitize::{normalize_entities, normalize_ws};

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];
// tags that start a new line of rendered text; everything else is inline
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "details",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    attrs: Vec<(String, String)>,
    outer: Range<usize>,
    inner: Range<usize>,
    // one past the last descendant's index
    subtree_end: usize,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|t| t.eq_ignore_ascii_case(class)))
            .unwrap_or(false)
    }

    /// `id="marker"` or `class="… marker …"`.
    pub fn is_marked(&self, marker: &str) -> bool {
        self.attr("id").is_some_and(|id| id.eq_ignore_ascii_case(marker)) || self.has_class(marker)
    }

    fn is_raw_text(&self) -> bool {
        RAW_TEXT_TAGS.contains(&self.tag.as_str())
    }
}

pub struct Dom<'a> {
    src: &'a str,
    els: Vec<Element>,
}

impl<'a> Dom<'a> {
    pub fn parse(src: &'a str) -> Self {
        let b = src.as_bytes();
        let n = b.len();
        let mut els: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut i = 0usize;

        while i < n {
            let lt = match b[i..].iter().position(|&c| c == b'<') {
                Some(off) => i + off,
                None => break,
            };

            if src[lt..].starts_with("<!--") {
                i = src[lt + 4..].find("-->").map(|e| lt + 4 + e + 3).unwrap_or(n);
                continue;
            }

            match b.get(lt + 1).copied() {
                // doctype, processing instructions, CDATA
                Some(b'!') | Some(b'?') => {
                    i = tag_end(b, lt);
                }
                Some(b'/') => {
                    let gt = tag_end(b, lt);
                    let name = tag_name(&src[lt + 2..gt]);
                    if let Some(pos) = stack.iter().rposition(|&e| els[e].tag == name) {
                        let matched = stack[pos];
                        let subtree_end = els.len();
                        for e in stack.drain(pos..) {
                            els[e].inner.end = lt;
                            els[e].outer.end = if e == matched { gt } else { lt };
                            els[e].subtree_end = subtree_end;
                        }
                    }
                    i = gt;
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    let gt = tag_end(b, lt);
                    // contents between '<' and '>' (or EOF)
                    let body_end = if b.get(gt - 1) == Some(&b'>') { gt - 1 } else { gt };
                    let body = &src[lt + 1..body_end];
                    let name = tag_name(body);
                    let attrs = parse_attrs(&body[name.len()..]);
                    let self_closing = body.trim_end().ends_with('/');

                    let idx = els.len();
                    let parent = stack.last().copied();
                    if let Some(p) = parent {
                        els[p].children.push(idx);
                    }
                    let mut el = Element {
                        tag: name,
                        parent,
                        children: Vec::new(),
                        attrs,
                        outer: lt..gt,
                        inner: gt..gt,
                        subtree_end: idx + 1,
                    };

                    i = gt;
                    if el.is_raw_text() {
                        let close = format!("</{}", el.tag);
                        let end = find_ci(src, &close, gt).unwrap_or(n);
                        el.inner = gt..end;
                        el.outer.end = if end < n { tag_end(b, end) } else { n };
                        i = el.outer.end;
                    } else if !self_closing && !VOID_TAGS.contains(&el.tag.as_str()) {
                        stack.push(idx);
                    }
                    els.push(el);
                }
                // stray '<' in text
                _ => i = lt + 1,
            }
        }

        let subtree_end = els.len();
        for e in stack {
            els[e].inner.end = n;
            els[e].outer.end = n;
            els[e].subtree_end = subtree_end;
        }

        Self { src, els }
    }

    pub fn len(&self) -> usize { self.els.len() }
    pub fn is_empty(&self) -> bool { self.els.is_empty() }

    pub fn get(&self, idx: usize) -> &Element { &self.els[idx] }

    /// Indices of every element below `idx`, in document order.
    pub fn descendants(&self, idx: usize) -> Range<usize> {
        idx + 1..self.els[idx].subtree_end
    }

    pub fn ancestors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.els[idx].parent, move |&p| self.els[p].parent)
    }

    /// All elements with tag `tag`, in document order.
    pub fn find_all<'d>(&'d self, tag: &'d str) -> impl Iterator<Item = usize> + 'd {
        self.find_in(0..self.els.len(), tag)
    }

    /// Elements with tag `tag` strictly inside `idx`, in document order.
    pub fn find_within<'d>(&'d self, idx: usize, tag: &'d str) -> impl Iterator<Item = usize> + 'd {
        self.find_in(self.descendants(idx), tag)
    }

    fn find_in<'d>(&'d self, range: Range<usize>, tag: &'d str) -> impl Iterator<Item = usize> + 'd {
        range.filter(move |&i| self.els[i].tag.eq_ignore_ascii_case(tag))
    }

    /// First element marked with `marker` as its id or one of its classes.
    pub fn find_marked(&self, marker: &str) -> Option<usize> {
        (0..self.els.len()).find(|&i| self.els[i].is_marked(marker))
    }

    /// Visible text of the element and everything below it, entities
    /// decoded and whitespace collapsed. Script/style bodies are skipped.
    pub fn text(&self, idx: usize) -> String {
        let el = &self.els[idx];
        if el.is_raw_text() {
            return String::new();
        }
        let mut out = String::new();
        let mut pos = el.inner.start;
        for d in self.descendants(idx) {
            let child = &self.els[d];
            if child.is_raw_text() && child.outer.start >= pos {
                push_visible(&mut out, &self.src[pos..child.outer.start]);
                pos = child.outer.end;
            }
        }
        if pos < el.inner.end {
            push_visible(&mut out, &self.src[pos..el.inner.end]);
        }
        normalize_ws(&normalize_entities(&out))
    }

    /// Text that sits directly in the element, not inside any child element.
    pub fn own_text(&self, idx: usize) -> String {
        let el = &self.els[idx];
        if el.is_raw_text() {
            return String::new();
        }
        let mut out = String::new();
        let mut pos = el.inner.start;
        for &c in &el.children {
            let child = &self.els[c];
            if child.outer.start > pos {
                push_visible(&mut out, &self.src[pos..child.outer.start]);
            }
            // the skipped child still separates the text around it
            out.push(' ');
            pos = pos.max(child.outer.end);
        }
        if pos < el.inner.end {
            push_visible(&mut out, &self.src[pos..el.inner.end]);
        }
        normalize_ws(&normalize_entities(&out))
    }
}

/// Copy text with markup removed. Block-level tags become a single space so
/// adjacent blocks (`<h3>Tomorrow</h3><h2>…`) don't fuse into one word;
/// inline tags vanish, so `139<sup>.9</sup>` reads `139.9`.
fn push_visible(out: &mut String, s: &str) {
    let mut rest = s;
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];
        let skip = if tail.starts_with("<!--") {
            tail.find("-->").map(|e| e + 3)
        } else if tail[1..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!') {
            let body = tail[1..].trim_start_matches('/');
            if BLOCK_TAGS.contains(&tag_name(body).as_str()) {
                out.push(' ');
            }
            Some(tag_end(tail.as_bytes(), 0))
        } else {
            // stray '<' in text
            out.push('<');
            Some(1)
        };
        rest = skip.map(|k| &tail[k..]).unwrap_or("");
    }
    out.push_str(rest);
}

/// Index just past the '>' closing the tag that opens at `lt`,
/// honouring quoted attribute values. EOF if unterminated.
fn tag_end(b: &[u8], lt: usize) -> usize {
    let mut in_s = false;
    let mut in_d = false;
    let mut i = lt + 1;
    while i < b.len() {
        match b[i] {
            b'\'' if !in_d => in_s = !in_s,
            b'"' if !in_s => in_d = !in_d,
            b'>' if !in_s && !in_d => return i + 1,
            _ => {}
        }
        i += 1;
    }
    b.len()
}

fn tag_name(body: &str) -> String {
    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(body.len());
    body[..end].to_ascii_lowercase()
}

fn parse_attrs(s: &str) -> Vec<(String, String)> {
    let b = s.as_bytes();
    let n = b.len();
    let mut out = Vec::new();
    let mut i = 0usize;

    loop {
        while i < n && (b[i].is_ascii_whitespace() || b[i] == b'/') { i += 1; }
        if i >= n { break; }

        let ns = i;
        while i < n && !b[i].is_ascii_whitespace() && b[i] != b'=' && b[i] != b'/' { i += 1; }
        if i == ns {
            // stray '='
            i += 1;
            continue;
        }
        let name = s[ns..i].to_ascii_lowercase();

        while i < n && b[i].is_ascii_whitespace() { i += 1; }
        let mut value = "";
        if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() { i += 1; }
            match b.get(i) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let vs = i + 1;
                    let ve = b[vs..].iter().position(|&c| c == q).map(|off| vs + off).unwrap_or(n);
                    value = &s[vs..ve];
                    i = (ve + 1).min(n);
                }
                _ => {
                    let vs = i;
                    while i < n && !b[i].is_ascii_whitespace() { i += 1; }
                    value = &s[vs..i];
                }
            }
        }
        out.push((name, normalize_entities(value)));
    }
    out
}

fn find_ci(hay: &str, needle: &str, from: usize) -> Option<usize> {
    let h = hay.as_bytes().get(from..)?;
    let n = needle.as_bytes();
    h.windows(n.len())
        .position(|w| w.eq_ignore_ascii_case(n))
        .map(|off| from + off)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nesting_and_document_order() {
        let dom = Dom::parse(r#"<div id="a"><h3>Tomorrow</h3><h2>139.9¢</h2></div><p>x</p>"#);
        assert_eq!(dom.len(), 4);
        assert_eq!(dom.get(0).tag, "div");
        assert_eq!(dom.get(0).children, vec![1, 2]);
        assert_eq!(dom.get(2).parent, Some(0));
        assert_eq!(dom.get(3).parent, None);
        assert_eq!(dom.descendants(0), 1..3);
        assert_eq!(dom.text(0), "Tomorrow 139.9¢");
    }

    #[test]
    fn attributes_quoted_unquoted_and_classes() {
        let dom = Dom::parse(r#"<DIV Class="card  Price-Card" data-x=1 id='main' hidden>t</DIV>"#);
        let el = dom.get(0);
        assert_eq!(el.tag, "div");
        assert!(el.has_class("price-card"));
        assert!(el.has_class("card"));
        assert!(!el.has_class("price"));
        assert_eq!(el.attr("data-x"), Some("1"));
        assert_eq!(el.attr("hidden"), Some(""));
        assert!(el.is_marked("main"));
        assert_eq!(dom.text(0), "t");
    }

    #[test]
    fn gt_inside_quoted_attribute_does_not_end_tag() {
        let dom = Dom::parse(r##"<a title="a > b" href="#">link</a>"##);
        assert_eq!(dom.get(0).attr("title"), Some("a > b"));
        assert_eq!(dom.text(0), "link");
    }

    #[test]
    fn void_and_self_closing_take_no_children() {
        let dom = Dom::parse("<p>a<br>b<img src=x /><span/>c</p>");
        let p = dom.get(0);
        assert_eq!(p.children.len(), 3);
        assert!(dom.descendants(1).is_empty());
        // <br> breaks the line, <img> and <span> are inline
        assert_eq!(dom.text(0), "a bc");
    }

    #[test]
    fn script_and_comment_bodies_are_not_markup() {
        let doc = r#"<div><script>var s = "<h2>1.0¢</h2>";</script><!-- <h2>2.0¢</h2> --><h2>3.0¢</h2></div>"#;
        let dom = Dom::parse(doc);
        let h2s: Vec<_> = dom.find_all("h2").map(|i| dom.text(i)).collect();
        assert_eq!(h2s, vec!["3.0¢"]);
        assert_eq!(dom.text(0), "3.0¢");
    }

    #[test]
    fn close_tag_closes_unclosed_children() {
        let dom = Dom::parse("<div><p>one<p>two</div><h2>x</h2>");
        let h2 = dom.find_all("h2").next().unwrap();
        assert_eq!(dom.get(h2).parent, None);
        assert_eq!(dom.descendants(0), 1..3);
    }

    #[test]
    fn unmatched_close_ignored_and_eof_closes() {
        let dom = Dom::parse("</span><section><h2>7.5</h2>");
        assert_eq!(dom.get(0).tag, "section");
        assert_eq!(dom.text(0), "7.5");
    }

    #[test]
    fn own_text_excludes_children() {
        let dom = Dom::parse("<div>Price for <b>tomorrow</b> is <h2>1.0¢</h2> ok</div>");
        assert_eq!(dom.own_text(0), "Price for is ok");
        assert_eq!(dom.own_text(1), "tomorrow");
    }

    #[test]
    fn ancestors_walk_to_root() {
        let dom = Dom::parse("<a><b><c></c></b></a>");
        assert_eq!(dom.ancestors(2).collect::<Vec<_>>(), vec![1, 0]);
        assert_eq!(dom.ancestors(0).count(), 0);
    }

    #[test]
    fn inline_tags_do_not_split_words() {
        let dom = Dom::parse("<div><h2>139<sup>.9</sup>&cent;</h2><p>Down <b>4</b><small>¢</small></p></div>");
        assert_eq!(dom.text(1), "139.9¢");
        assert_eq!(dom.text(0), "139.9¢ Down 4¢");
    }

    #[test]
    fn stray_lt_is_kept_as_text() {
        let dom = Dom::parse("<p>a < b</p>");
        assert_eq!(dom.text(0), "a < b");
    }

    #[test]
    fn entities_decoded_in_text() {
        let dom = Dom::parse("<h2>139.9&cent;</h2>");
        assert_eq!(dom.text(0), "139.9¢");
        let dom = Dom::parse("<p><b>a&amp;b</b></p>");
        assert_eq!(dom.text(0), "a&b");
    }
}

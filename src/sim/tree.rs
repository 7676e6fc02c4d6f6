use crate::host::Rect;
use crate::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
enum Content {
    Text(String),
    Html(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    content: Content,
    style: Vec<(String, String)>,
    rect: Rect,
    offset_width: Option<f64>,
    files: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Approximate glyph width used when an attached node has no explicit width.
pub const SIM_CHAR_WIDTH_PX: f64 = 8.0;

#[derive(Debug)]
pub(crate) struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
}

impl Tree {
    pub(crate) fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
        };
        tree.root = tree.create("html");
        tree.body = tree.create("body");
        tree.append(tree.root, tree.body);
        tree
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn body(&self) -> NodeId {
        self.body
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    pub(crate) fn create(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        id
    }

    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    pub(crate) fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != node);
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.node_mut(node).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    pub(crate) fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub(crate) fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    pub(crate) fn tag(&self, node: NodeId) -> &str {
        &self.node(node).tag
    }

    pub(crate) fn is_attached(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == self.root {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Ancestors of `node`, nearest first, excluding `node` itself.
    pub(crate) fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.parent(node);
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent(n);
        }
        out
    }

    /// Descendants in document order, excluding `scope`.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.node(n).children.iter().rev().copied());
        }
        out
    }

    pub(crate) fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let data = self.node(node);
        selector.matches(&data.tag, |name| {
            data.attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        })
    }

    pub(crate) fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.matches(n, selector))
            .collect()
    }

    pub(crate) fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let attrs = &mut self.node_mut(node).attrs;
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub(crate) fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.node_mut(node).attrs.retain(|(k, _)| k != name);
    }

    pub(crate) fn classes(&self, node: NodeId) -> Vec<String> {
        self.attribute(node, "class")
            .map(|list| list.split_ascii_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn set_classes(&mut self, node: NodeId, classes: &[String]) {
        self.set_attribute(node, "class", &classes.join(" "));
    }

    pub(crate) fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    pub(crate) fn add_class(&mut self, node: NodeId, class: &str) {
        let mut classes = self.classes(node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_classes(node, &classes);
        }
    }

    pub(crate) fn remove_class(&mut self, node: NodeId, class: &str) {
        let mut classes = self.classes(node);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.set_classes(node, &classes);
        }
    }

    pub(crate) fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        self.node_mut(node).content = Content::Text(text.to_string());
    }

    pub(crate) fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.clear_children(node);
        self.node_mut(node).content = Content::Html(html.to_string());
    }

    pub(crate) fn text_content(&self, node: NodeId) -> String {
        let mut out = match &self.node(node).content {
            Content::Text(t) => t.clone(),
            Content::Html(h) => strip_tags(h),
        };
        for &child in &self.node(node).children {
            out.push_str(&self.text_content(child));
        }
        out
    }

    pub(crate) fn inner_html(&self, node: NodeId) -> String {
        let mut out = match &self.node(node).content {
            Content::Text(t) => escape_html(t),
            Content::Html(h) => h.clone(),
        };
        for &child in &self.node(node).children {
            out.push_str(&self.outer_html(child));
        }
        out
    }

    fn outer_html(&self, node: NodeId) -> String {
        let data = self.node(node);
        let mut out = format!("<{}", data.tag);
        for (k, v) in &data.attrs {
            out.push_str(&format!(" {k}=\"{}\"", escape_html(v)));
        }
        out.push('>');
        out.push_str(&self.inner_html(node));
        out.push_str(&format!("</{}>", data.tag));
        out
    }

    pub(crate) fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let style = &mut self.node_mut(node).style;
        match style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => style.push((property.to_string(), value.to_string())),
        }
    }

    pub(crate) fn rect(&self, node: NodeId) -> Rect {
        self.node(node).rect
    }

    pub(crate) fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.node_mut(node).rect = rect;
    }

    pub(crate) fn set_offset_width(&mut self, node: NodeId, width: f64) {
        self.node_mut(node).offset_width = Some(width);
    }

    /// Detached nodes have no layout and measure as zero, as in a browser.
    pub(crate) fn offset_width(&self, node: NodeId) -> f64 {
        if !self.is_attached(node) {
            return 0.0;
        }
        match self.node(node).offset_width {
            Some(w) => w,
            None => self.text_content(node).chars().count() as f64 * SIM_CHAR_WIDTH_PX,
        }
    }

    pub(crate) fn files(&self, node: NodeId) -> &[String] {
        &self.node(node).files
    }

    pub(crate) fn set_files(&mut self, node: NodeId, files: Vec<String>) {
        self.node_mut(node).files = files;
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

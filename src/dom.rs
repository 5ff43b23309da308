//! In-memory element tree and the single root container views mount into.
//!
//! Elements are addressed by [`NodePath`], a list of indices over *element*
//! children (text nodes are skipped), matching how a browser's `children`
//! collection counts.
use std::fmt;

use crate::view::ViewName;

/// Click behavior attached to an element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Listener {
    /// Activate a view when the element is clicked.
    ShowView(ViewName),
    /// Delegated handler on the review sidebar list.
    ReviewNavigation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
    listeners: Vec<Listener>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    pub fn set_id(&mut self, id: &str) {
        self.set_attr("id", id);
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|existing| existing == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = self.classes().collect();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attr("class", &joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let joined = self
            .classes()
            .filter(|existing| *existing != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr("class", &joined);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push_child(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn push_text(&mut self, text: &str) {
        self.children.push(Node::Text(text.to_string()));
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn element_child(&self, index: usize) -> Option<&Element> {
        self.element_children().nth(index)
    }

    pub fn element_child_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(|node| match node {
                Node::Element(element) => Some(element),
                Node::Text(_) => None,
            })
            .nth(index)
    }

    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(chunk) => text.push_str(chunk),
                Node::Element(element) => text.push_str(&element.text_content()),
            }
        }
        text
    }

    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            current = current.element_child(index)?;
        }
        Some(current)
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &index in path {
            current = current.element_child_mut(index)?;
        }
        Some(current)
    }

    /// Relative path to the first element (self included, pre-order) with `id`.
    pub fn path_to_id(&self, id: &str) -> Option<Vec<usize>> {
        self.find_path(&|element: &Element| element.id() == Some(id))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        let path = self.path_to_id(id)?;
        self.at_path(&path)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        let path = self.path_to_id(id)?;
        self.at_path_mut(&path)
    }

    /// Relative paths of every descendant (self excluded) carrying `attr`.
    pub fn paths_with_attr(&self, attr: &str) -> Vec<Vec<usize>> {
        let mut found = Vec::new();
        collect_paths(self, attr, &mut Vec::new(), &mut found);
        found
    }

    fn find_path(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<Vec<usize>> {
        if predicate(self) {
            return Some(Vec::new());
        }
        for (index, child) in self.element_children().enumerate() {
            if let Some(mut rest) = child.find_path(predicate) {
                rest.insert(0, index);
                return Some(rest);
            }
        }
        None
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }
}

fn collect_paths(
    element: &Element,
    attr: &str,
    prefix: &mut Vec<usize>,
    found: &mut Vec<Vec<usize>>,
) {
    for (index, child) in element.element_children().enumerate() {
        prefix.push(index);
        if child.has_attr(attr) {
            found.push(prefix.clone());
        }
        collect_paths(child, attr, prefix, found);
        prefix.pop();
    }
}

/// Location of an element inside a [`Container`]: the first index selects a
/// mounted root, the rest walk element children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True when `self` is `other` or lies beneath it.
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|index| index.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

/// The single addressable root node every component mounts into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    id: String,
    children: Vec<Element>,
}

impl Container {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// First element with `id` in container order.
    pub fn path_of_id(&self, id: &str) -> Option<NodePath> {
        self.children.iter().enumerate().find_map(|(index, root)| {
            root.path_to_id(id).map(|rest| {
                let mut indices = vec![index];
                indices.extend(rest);
                NodePath(indices)
            })
        })
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        let path = self.path_of_id(id)?;
        self.get(&path)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        let path = self.path_of_id(id)?;
        self.get_mut(&path)
    }

    pub fn get(&self, path: &NodePath) -> Option<&Element> {
        let (first, rest) = path.0.split_first()?;
        self.children.get(*first)?.at_path(rest)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        let (first, rest) = path.0.split_first()?;
        self.children.get_mut(*first)?.at_path_mut(rest)
    }

    pub fn append(&mut self, element: Element) -> NodePath {
        self.children.push(element);
        NodePath::root(self.children.len() - 1)
    }

    /// Swap the element at `path` for `element`, returning the old one.
    pub fn replace(&mut self, path: &NodePath, element: Element) -> Option<Element> {
        let slot = self.get_mut(path)?;
        Some(std::mem::replace(slot, element))
    }

    /// Markup of the container and everything mounted in it.
    pub fn render(&self) -> String {
        let mut root = Element::new("div");
        root.set_id(&self.id);
        for child in &self.children {
            root.push_child(Node::Element(child.clone()));
        }
        crate::markup::render(&root)
    }

    /// `path` followed by each of its ancestors, innermost first.
    pub fn ancestry(&self, path: &NodePath) -> Vec<NodePath> {
        let mut chain = Vec::new();
        let mut current = Some(path.clone());
        while let Some(step) = current {
            current = step.parent();
            chain.push(step);
        }
        chain
    }
}

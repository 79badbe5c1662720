//! # Element Model
//!
//! Immutable description of the desired UI structure. A render pass produces a
//! fresh [`Element`] tree; the reconciler compares it against the live instance
//! tree and discards it once diffed.
//!
//! Elements are compared by variant and tag name only. There is deliberately no
//! `PartialEq` on [`Element`]: two renders producing identical structure are still
//! two distinct values.
//!
//! ## Key Types
//!
//! - [`Element`] - Root, Text or Fragment node
//! - [`Tag`] - What [`element`] builds: a tag name, a fragment, or a component
//! - [`ElementKind`] - Variant discriminant used for replace decisions

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::props::Props;
use crate::ui_node::{normalize, UiNode};

/// Marker string that [`Tag::from`] maps to [`Tag::Fragment`]
pub const FRAGMENT: &str = "fragment";

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").expect("Invalid tag name regex"));

// ============================================================================
// Element
// ============================================================================

/// One node of desired UI structure
#[derive(Debug, Clone)]
pub enum Element {
    Root(RootElement),
    Text(TextElement),
    Fragment(FragmentElement),
}

/// Variant discriminant of an [`Element`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Root,
    Text,
    Fragment,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Root => write!(f, "root"),
            ElementKind::Text => write!(f, "text"),
            ElementKind::Fragment => write!(f, "fragment"),
        }
    }
}

impl Element {
    /// A text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Element::Text(TextElement {
            value: value.into(),
        })
    }

    /// A fragment grouping already-built children.
    pub fn fragment(children: Vec<UiNode>) -> Self {
        Element::Fragment(FragmentElement {
            children: normalize(children),
        })
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Root(_) => ElementKind::Root,
            Element::Text(_) => ElementKind::Text,
            Element::Fragment(_) => ElementKind::Fragment,
        }
    }

    /// Normalized children; empty for text leaves.
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Root(root) => &root.children,
            Element::Fragment(fragment) => &fragment.children,
            Element::Text(_) => &[],
        }
    }

    /// Whether an instance built from `self` can be patched in place to `other`.
    ///
    /// Variants must match, and two roots must also share a tag name.
    pub fn same_type(&self, other: &Element) -> bool {
        match (self, other) {
            (Element::Root(a), Element::Root(b)) => a.tag_name == b.tag_name,
            (a, b) => a.kind() == b.kind(),
        }
    }
}

/// Tagged container with properties and children
#[derive(Debug, Clone)]
pub struct RootElement {
    tag_name: String,
    props: Option<Props>,
    children: Vec<Element>,
}

impl RootElement {
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Properties, `None` when the element was built without any.
    pub fn props(&self) -> Option<&Props> {
        self.props.as_ref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

/// Text leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    pub value: String,
}

/// Ordered group without an own presentation node
#[derive(Debug, Clone)]
pub struct FragmentElement {
    children: Vec<Element>,
}

impl FragmentElement {
    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

// ============================================================================
// Tag & factory
// ============================================================================

/// Function component: receives the props (empty when none were given) and the
/// normalized children, returns the element it stands for.
pub type Component = fn(Props, Vec<Element>) -> Element;

/// What [`element`] should build
#[derive(Clone)]
pub enum Tag {
    Name(String),
    Fragment,
    Component(Component),
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Name(name) => write!(f, "Tag::Name({:?})", name),
            Tag::Fragment => write!(f, "Tag::Fragment"),
            Tag::Component(_) => write!(f, "Tag::Component"),
        }
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        if value == FRAGMENT {
            Tag::Fragment
        } else {
            Tag::Name(value.to_string())
        }
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        if value == FRAGMENT {
            Tag::Fragment
        } else {
            Tag::Name(value)
        }
    }
}

impl From<Component> for Tag {
    fn from(value: Component) -> Self {
        Tag::Component(value)
    }
}

/// Build an element from a tag, optional props and children.
///
/// Children are normalized before they are stored. Tag names must start with
/// an ASCII letter and contain only ASCII alphanumerics and `-`; anything else
/// is a programming error in the caller's render logic and fails with
/// [`Error::InvalidTag`].
///
/// ```
/// use uirs_core::{children, element, props};
/// let button = element("button", Some(props! { "class" => "primary" }), children!["Count: ", 3]).unwrap();
/// assert_eq!(button.children().len(), 2);
/// ```
pub fn element(tag: impl Into<Tag>, props: Option<Props>, children: Vec<UiNode>) -> Result<Element> {
    match tag.into() {
        Tag::Fragment => Ok(Element::fragment(children)),
        Tag::Name(tag_name) => {
            if !TAG_NAME.is_match(&tag_name) {
                return Err(Error::invalid_tag(tag_name));
            }
            Ok(Element::Root(RootElement {
                tag_name,
                props,
                children: normalize(children),
            }))
        }
        Tag::Component(component) => Ok(component(props.unwrap_or_default(), normalize(children))),
    }
}

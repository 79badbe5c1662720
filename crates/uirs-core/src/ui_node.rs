//! Render-function return values and their normalization into elements

use crate::element::Element;
use crate::props::number_to_string;

/// Heterogeneous value a render function may produce as a child.
///
/// Normalization turns any sequence of these into a flat list of [`Element`]s.
#[derive(Debug, Clone)]
pub enum UiNode {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
    Element(Element),
    List(Vec<UiNode>),
}

/// Flatten render output into elements.
///
/// Nested lists are spliced in place depth-first, `Null` and booleans are
/// dropped, elements pass through untouched and remaining primitives become
/// text leaves. Numeric zero is kept.
pub fn normalize(nodes: impl IntoIterator<Item = UiNode>) -> Vec<Element> {
    let mut out = Vec::new();
    normalize_into(nodes, &mut out);
    out
}

fn normalize_into(nodes: impl IntoIterator<Item = UiNode>, out: &mut Vec<Element>) {
    for node in nodes {
        match node {
            UiNode::Null | UiNode::Bool(_) => {}
            UiNode::List(list) => normalize_into(list, out),
            UiNode::Element(elem) => out.push(elem),
            UiNode::Text(s) => out.push(Element::text(s)),
            UiNode::Number(n) => out.push(Element::text(number_to_string(n))),
        }
    }
}

impl From<Element> for UiNode {
    fn from(value: Element) -> Self {
        UiNode::Element(value)
    }
}

impl From<&str> for UiNode {
    fn from(value: &str) -> Self {
        UiNode::Text(value.to_string())
    }
}

impl From<String> for UiNode {
    fn from(value: String) -> Self {
        UiNode::Text(value)
    }
}

impl From<&String> for UiNode {
    fn from(value: &String) -> Self {
        UiNode::Text(value.clone())
    }
}

impl From<bool> for UiNode {
    fn from(value: bool) -> Self {
        UiNode::Bool(value)
    }
}

impl From<()> for UiNode {
    fn from(_: ()) -> Self {
        UiNode::Null
    }
}

impl<T: Into<UiNode>> From<Option<T>> for UiNode {
    fn from(value: Option<T>) -> Self {
        value.map_or(UiNode::Null, Into::into)
    }
}

impl<T: Into<UiNode>> From<Vec<T>> for UiNode {
    fn from(value: Vec<T>) -> Self {
        UiNode::List(value.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_number_node {
    ($($t:ty),*) => {
        $(
            impl From<$t> for UiNode {
                fn from(value: $t) -> Self {
                    UiNode::Number(value as f64)
                }
            }
        )*
    };
}

impl_number_node!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Collect heterogeneous children into a `Vec<UiNode>`.
#[macro_export]
macro_rules! children {
    () => { ::std::vec::Vec::<$crate::UiNode>::new() };
    ($($child:expr),+ $(,)?) => {
        vec![$($crate::UiNode::from($child)),+]
    };
}

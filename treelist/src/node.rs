use crate::host::RenderContent;
use crate::observer::Subscription;
use crate::{ElementId, Intersection, Span};

/// Arena identity of a tree node.
///
/// Assigned monotonically and never reused within a list, so a visibility
/// signal for a departed node can never land on a recycled slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeId(pub(crate) u64);

/// The rendering decision currently applied to a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum NodeBody {
    Placeholder { extent: f64 },
    Item { index: usize, expected_extent: f64 },
    Split { top: NodeId, bottom: NodeId },
}

impl NodeBody {
    pub(crate) fn render(&self) -> RenderContent {
        match *self {
            Self::Placeholder { extent } => RenderContent::Placeholder { extent },
            Self::Item {
                index,
                expected_extent,
            } => RenderContent::Item {
                index,
                expected_extent,
            },
            Self::Split { .. } => RenderContent::Branch,
        }
    }
}

/// Ephemeral tree node. Lives only in the list's arena, never persisted.
///
/// `body` is `None` only between arena insertion and the node's first
/// decision, which happens within the same mount call. The subscription is
/// cancelled exactly once, by dropping the guard when the node is torn down.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) span: Span,
    pub(crate) element: ElementId,
    pub(crate) in_view: bool,
    pub(crate) intersection: Option<Intersection>,
    pub(crate) body: Option<NodeBody>,
    pub(crate) subscription: Option<Subscription>,
}

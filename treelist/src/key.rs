#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type SpanExtentMap = HashMap<crate::Span, f64>;
#[cfg(not(feature = "std"))]
pub(crate) type SpanExtentMap = BTreeMap<crate::Span, f64>;

#[cfg(feature = "std")]
pub(crate) type CallbackMap = HashMap<crate::ElementId, crate::observer::VisibilityCallback>;
#[cfg(not(feature = "std"))]
pub(crate) type CallbackMap = BTreeMap<crate::ElementId, crate::observer::VisibilityCallback>;

#[cfg(feature = "std")]
pub(crate) type NodeMap<V> = HashMap<crate::node::NodeId, V>;
#[cfg(not(feature = "std"))]
pub(crate) type NodeMap<V> = BTreeMap<crate::node::NodeId, V>;

use crate::model::Layout;

/// Published on the event bus after every successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCommitted {
    pub layout: Layout,
}

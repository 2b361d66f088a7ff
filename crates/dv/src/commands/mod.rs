//! CLI command implementations.

pub(crate) mod highlight;
pub(crate) mod nav;
pub(crate) mod render;

pub(crate) use highlight::HighlightArgs;
pub(crate) use nav::NavArgs;
pub(crate) use render::RenderArgs;

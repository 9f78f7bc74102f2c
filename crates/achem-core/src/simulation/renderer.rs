//! Renderer collaborator

use crate::world::GridSnapshot;

/// Read-only consumer notified once at the end of every tick
pub trait Renderer {
    fn redraw(&mut self, snapshot: &GridSnapshot);
}

/// Renderer that ignores every redraw
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn redraw(&mut self, _snapshot: &GridSnapshot) {}
}


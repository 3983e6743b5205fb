//! Proximity-triggered loading
//!
//! Items register their vertical extent; each poll with the current viewport
//! returns the items that are within the viewport or within `margin` pixels
//! below it. A returned item is deregistered, so it fires at most once.
//! This is the same contract as an intersection observer with a bottom root
//! margin that unobserves on first intersection.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone)]
pub struct ProximityObserver<K> {
    margin: f64,
    pending: Vec<(K, Span)>,
}

impl<K: PartialEq> ProximityObserver<K> {
    pub fn new(margin: f64) -> Self {
        Self {
            margin,
            pending: Vec::new(),
        }
    }

    /// Register an item; re-registering a key replaces its span
    pub fn observe(&mut self, key: K, span: Span) {
        self.unobserve(&key);
        self.pending.push((key, span));
    }

    pub fn unobserve(&mut self, key: &K) {
        self.pending.retain(|(k, _)| k != key);
    }

    /// Items that came near the viewport, in registration order
    pub fn poll(&mut self, viewport: Viewport) -> Vec<K> {
        let reach = viewport.bottom() + self.margin;
        let (near, far): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(_, span)| span.top <= reach && span.bottom >= viewport.top);
        self.pending = far;
        near.into_iter().map(|(k, _)| k).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

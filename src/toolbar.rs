//! Filter bar visibility
//!
//! The filter bar sits docked under the header. Once the page scrolls past
//! it, it hides and a floating button appears; the button brings it back as
//! a floating panel at the current scroll position. Scrolling back to the
//! header re-docks it, and scrolling away from a floating panel by more than
//! the buffer zone hides it again.
//!
//! A visible floating panel leaves only by the buffer zone or by reaching the
//! header; crossing header plus controls does not hide it, and a docked bar
//! ignores the buffer zone.
//!
//! Feeding the same scroll position twice never changes state a second time.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarState {
    Docked,
    FloatingHidden,
    FloatingVisible,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub position: f64,
    pub header_height: f64,
    pub controls_height: f64,
}

#[derive(Debug, Clone)]
pub struct FilterBar {
    state: BarState,
    shown_at: f64,
    buffer_zone: f64,
}

impl FilterBar {
    pub fn new(buffer_zone: f64) -> Self {
        Self {
            state: BarState::Docked,
            shown_at: 0.0,
            buffer_zone,
        }
    }

    pub fn state(&self) -> BarState {
        self.state
    }

    /// Scroll position where the floating panel was last opened
    pub fn shown_at(&self) -> f64 {
        self.shown_at
    }

    /// Returns the new state when the scroll caused a transition
    pub fn on_scroll(&mut self, m: ScrollMetrics) -> Option<BarState> {
        let next = match self.state {
            BarState::Docked if m.position > m.header_height + m.controls_height => {
                BarState::FloatingHidden
            }
            BarState::FloatingHidden | BarState::FloatingVisible
                if m.position <= m.header_height =>
            {
                BarState::Docked
            }
            BarState::FloatingVisible if (m.position - self.shown_at).abs() > self.buffer_zone => {
                BarState::FloatingHidden
            }
            _ => return None,
        };
        self.state = next;
        Some(next)
    }

    /// The floating filter button
    pub fn toggle(&mut self, position: f64) -> BarState {
        self.state = match self.state {
            BarState::FloatingHidden => {
                self.shown_at = position;
                BarState::FloatingVisible
            }
            BarState::Docked | BarState::FloatingVisible => BarState::FloatingHidden,
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(position: f64) -> ScrollMetrics {
        ScrollMetrics {
            position,
            header_height: 100.0,
            controls_height: 150.0,
        }
    }

    #[test]
    fn test_docked_until_past_controls() {
        let mut bar = FilterBar::new(200.0);
        assert_eq!(bar.on_scroll(at(250.0)), None);
        assert_eq!(bar.on_scroll(at(251.0)), Some(BarState::FloatingHidden));
    }

    #[test]
    fn test_same_position_is_idempotent() {
        let mut bar = FilterBar::new(200.0);
        assert_eq!(bar.on_scroll(at(600.0)), Some(BarState::FloatingHidden));
        assert_eq!(bar.on_scroll(at(600.0)), None);
        assert_eq!(bar.on_scroll(at(600.0)), None);
        assert_eq!(bar.state(), BarState::FloatingHidden);
    }

    #[test]
    fn test_redocks_at_header() {
        let mut bar = FilterBar::new(200.0);
        bar.on_scroll(at(600.0));
        // Between header and header+controls nothing changes
        assert_eq!(bar.on_scroll(at(180.0)), None);
        assert_eq!(bar.on_scroll(at(100.0)), Some(BarState::Docked));
    }

    #[test]
    fn test_toggle_shows_floating_panel() {
        let mut bar = FilterBar::new(200.0);
        bar.on_scroll(at(1000.0));
        assert_eq!(bar.toggle(1000.0), BarState::FloatingVisible);
        assert_eq!(bar.shown_at(), 1000.0);

        // Small scrolls keep it open, repeated or not
        assert_eq!(bar.on_scroll(at(1150.0)), None);
        assert_eq!(bar.on_scroll(at(1150.0)), None);

        assert_eq!(bar.on_scroll(at(1201.0)), Some(BarState::FloatingHidden));
    }

    #[test]
    fn test_floating_panel_redocks_at_header() {
        let mut bar = FilterBar::new(2000.0);
        bar.on_scroll(at(1000.0));
        bar.toggle(1000.0);
        assert_eq!(bar.on_scroll(at(50.0)), Some(BarState::Docked));
    }

    #[test]
    fn test_visible_panel_ignores_controls_line_and_docked_ignores_buffer() {
        let mut bar = FilterBar::new(200.0);
        bar.on_scroll(at(400.0));
        bar.toggle(400.0);
        // Past header+controls but inside the buffer zone
        assert_eq!(bar.on_scroll(at(260.0)), None);
        assert_eq!(bar.state(), BarState::FloatingVisible);

        let mut docked = FilterBar::new(10.0);
        assert_eq!(docked.on_scroll(at(240.0)), None);
        assert_eq!(docked.state(), BarState::Docked);
    }

    #[test]
    fn test_toggle_hides_visible_bar() {
        let mut bar = FilterBar::new(200.0);
        assert_eq!(bar.toggle(0.0), BarState::FloatingHidden);
        assert_eq!(bar.toggle(500.0), BarState::FloatingVisible);
        assert_eq!(bar.toggle(500.0), BarState::FloatingHidden);
    }
}

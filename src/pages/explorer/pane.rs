use crate::core::config::PaneConfig;

/// Width and collapse state of the directory pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneLayout {
    width: u32,
    collapsed: bool,
    min_width: u32,
    collapsed_width: u32,
}

impl PaneLayout {
    pub fn new(config: &PaneConfig) -> Self {
        Self {
            width: config.default_width.max(config.min_width),
            collapsed: false,
            min_width: config.min_width,
            collapsed_width: config.collapsed_width,
        }
    }

    /// Drag of the resize handle by `delta` pixels from `start_width`.
    pub fn resize(&mut self, start_width: u32, delta: i64) -> u32 {
        let target = i64::from(start_width) + delta;
        self.width = target.clamp(i64::from(self.min_width), i64::from(u32::MAX)) as u32;
        self.width
    }

    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn effective_width(&self) -> u32 {
        if self.collapsed {
            self.collapsed_width
        } else {
            self.width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_clamps_to_min_width() {
        let mut pane = PaneLayout::new(&PaneConfig::default());
        assert_eq!(pane.width(), 440);
        assert_eq!(pane.resize(440, 60), 500);
        assert_eq!(pane.resize(440, -400), 200);
    }

    #[test]
    fn collapsed_uses_collapsed_width() {
        let mut pane = PaneLayout::new(&PaneConfig::default());
        assert!(pane.toggle_collapsed());
        assert_eq!(pane.effective_width(), 50);
        assert!(!pane.toggle_collapsed());
        assert_eq!(pane.effective_width(), 440);
    }
}

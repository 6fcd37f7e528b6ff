/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Generate,
    Scan,
}

/// Which tab is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabState {
    active: Tab,
}

impl TabState {
    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select() {
        let mut tabs = TabState::default();
        assert!(tabs.is_active(Tab::Generate));
        tabs.select(Tab::Scan);
        assert_eq!(tabs.active(), Tab::Scan);
        assert!(!tabs.is_active(Tab::Generate));
    }
}

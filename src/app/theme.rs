use std::fmt;

/// Colour themes, in cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Blue,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Blue];

    /// The theme after this one; wraps from the last back to the first
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Blue,
            Theme::Blue => Theme::Light,
        }
    }

    /// Document class to apply; light is the unclassed default
    pub fn class(self) -> Option<&'static str> {
        match self {
            Theme::Light => None,
            Theme::Dark => Some("dark"),
            Theme::Blue => Some("blue"),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Holds the active theme. Owned by the app and passed where needed.
#[derive(Debug, Clone, Default)]
pub struct ThemeStore {
    current: Theme,
}

impl ThemeStore {
    pub fn new(theme: Theme) -> Self {
        Self { current: theme }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Advance to the next theme and return it
    pub fn cycle(&mut self) -> Theme {
        self.current = self.current.next();
        log::debug!("theme -> {}", self.current);
        self.current
    }
}

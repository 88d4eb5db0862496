//! Which screen is showing, and which input path the builder is on.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Landing,
    Builder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubMode {
    #[default]
    Upload,
    Basic,
}

/// The two calls to action on the landing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    UploadResume,
    StartFromScratch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewController {
    screen: Screen,
    sub_mode: SubMode,
}

impl ViewController {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn sub_mode(&self) -> SubMode {
        self.sub_mode
    }

    /// Leaves the landing screen. The entry taken picks the initial sub-mode.
    pub fn start(&mut self, entry: Entry) {
        self.screen = Screen::Builder;
        self.sub_mode = match entry {
            Entry::UploadResume => SubMode::Upload,
            Entry::StartFromScratch => SubMode::Basic,
        };
    }

    /// Switches input path. Only touches the view; nothing collected on
    /// either path is cleared.
    pub fn select(&mut self, sub_mode: SubMode) {
        self.sub_mode = sub_mode;
    }
}

//! Page navigation bounded to the rendered document

/// Current page and total page count of the displayed document.
///
/// The page count is unknown until the document has been parsed; until then
/// both directions are disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNavigator {
    current: u32,
    num_pages: Option<u32>,
}

impl Default for PageNavigator {
    fn default() -> Self {
        Self {
            current: 1,
            num_pages: None,
        }
    }
}

impl PageNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page (1-indexed)
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn num_pages(&self) -> Option<u32> {
        self.num_pages
    }

    /// Record the page count of a freshly parsed document, pulling the
    /// current page back into range
    pub fn set_num_pages(&mut self, num_pages: u32) {
        let num_pages = num_pages.max(1);
        self.num_pages = Some(num_pages);
        self.current = self.current.clamp(1, num_pages);
    }

    /// Forget the document, e.g. when the template changes
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn can_go_previous(&self) -> bool {
        self.num_pages.is_some() && self.current > 1
    }

    pub fn can_go_next(&self) -> bool {
        matches!(self.num_pages, Some(n) if self.current < n)
    }

    /// Move back one page; returns whether the page changed
    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Move forward one page; returns whether the page changed
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Jump to `page` if it lies within `[1, num_pages]`
    pub fn go_to(&mut self, page: u32) -> bool {
        match self.num_pages {
            Some(n) if (1..=n).contains(&page) => {
                self.current = page;
                true
            }
            _ => false,
        }
    }
}

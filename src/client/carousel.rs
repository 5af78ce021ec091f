/// Selection state of the home page preview carousel.
///
/// The selected slide decides which record's photo and details are previewed.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel<T> {
    slides: Vec<T>,
    selected: usize,
}

impl<T> Default for Carousel<T> {
    fn default() -> Self {
        Self {
            slides: Vec::new(),
            selected: 0,
        }
    }
}

impl<T> Carousel<T> {
    pub fn new(slides: Vec<T>) -> Self {
        Self {
            slides,
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> Option<&T> {
        self.slides.get(self.selected)
    }

    /// Advances one slide, wrapping from the last to the first.
    pub fn next(&mut self) -> Option<&T> {
        if !self.is_empty() {
            self.selected = (self.selected + 1) % self.len();
        }
        self.current()
    }

    /// Steps back one slide, wrapping from the first to the last.
    pub fn prev(&mut self) -> Option<&T> {
        if !self.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.len() - 1);
        }
        self.current()
    }

    /// Jumps to `index`, clamped to the last slide.
    pub fn select(&mut self, index: usize) -> Option<&T> {
        self.selected = index.min(self.len().saturating_sub(1));
        self.current()
    }

    /// Swaps in a refetched list, keeping the selection where it still fits.
    pub fn replace(&mut self, slides: Vec<T>) {
        self.slides = slides;
        let selected = self.selected;
        self.select(selected);
    }
}

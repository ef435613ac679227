//! Button state providers.
//!
//! The host supplies an ordered list of providers; index `i` in the bank
//! becomes `buttons[i]` in every published message.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Something that can report whether a button is held down.
pub trait ButtonSource {
    fn is_down(&self) -> bool;
}

impl ButtonSource for Cell<bool> {
    fn is_down(&self) -> bool {
        self.get()
    }
}

impl<T: ButtonSource + ?Sized> ButtonSource for Rc<T> {
    fn is_down(&self) -> bool {
        (**self).is_down()
    }
}

/// Ordered collection of button providers.
#[derive(Default)]
pub struct ButtonBank {
    sources: Vec<Box<dyn ButtonSource>>,
}

impl fmt::Debug for ButtonBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonBank")
            .field("states", &self.states())
            .finish()
    }
}

impl ButtonBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `count` buttons backed by shared cells.
    ///
    /// The returned handles are kept by whoever receives button presses.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_joy::publisher::buttons::ButtonBank;
    ///
    /// let (bank, handles) = ButtonBank::with_cells(3);
    /// handles[1].set(true);
    /// assert_eq!(bank.states(), vec![false, true, false]);
    /// ```
    #[must_use]
    pub fn with_cells(count: usize) -> (Self, Vec<Rc<Cell<bool>>>) {
        let handles: Vec<Rc<Cell<bool>>> = (0..count).map(|_| Rc::new(Cell::new(false))).collect();

        let mut bank = Self::new();
        for handle in &handles {
            bank.push(Rc::clone(handle));
        }

        (bank, handles)
    }

    /// Appends a provider; it becomes the next button index.
    pub fn push<S: ButtonSource + 'static>(&mut self, source: S) {
        self.sources.push(Box::new(source));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Snapshot of every provider, in order.
    #[must_use]
    pub fn states(&self) -> Vec<bool> {
        self.sources.iter().map(|source| source.is_down()).collect()
    }
}

//! One page of a list call

use std::iter::FusedIterator;
use std::vec;

/// Result of a list call: the items of one page and the token to fetch the
/// next one.
#[derive(Debug)]
pub struct Page<T> {
    /// Cursor for the next page, `None` once the listing is exhausted
    pub next_page_token: Option<String>,
    pub items: PageItems<T>,
}

impl<T> Page<T> {
    /// Build a page; an empty token is treated as "no more pages"
    pub fn new(next_page_token: Option<String>, items: Vec<T>) -> Self {
        Self {
            next_page_token: next_page_token.filter(|t| !t.is_empty()),
            items: PageItems {
                inner: items.into_iter(),
            },
        }
    }

    pub fn empty() -> Self {
        Self::new(None, Vec::new())
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_token.is_some()
    }

    /// Items not yet consumed from this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.len() == 0
    }

    pub fn into_parts(self) -> (Option<String>, PageItems<T>) {
        (self.next_page_token, self.items)
    }

    /// Convert the items, keeping the token
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page::new(self.next_page_token, self.items.map(f).collect())
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = PageItems<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items
    }
}

/// Single-pass iterator over the items of one page.
///
/// Not `Clone`: once consumed the items are gone. Reaching the end means the
/// end of this page, not of the listing.
#[derive(Debug)]
pub struct PageItems<T> {
    inner: vec::IntoIter<T>,
}

impl<T> Iterator for PageItems<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for PageItems<T> {}

impl<T> FusedIterator for PageItems<T> {}

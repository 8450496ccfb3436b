use anyhow::{anyhow, bail, Result};

use crate::page_range::{PageIndex, PageNumber};

/// Which neighbor an adjacent swap moves a page toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// The output arrangement of a document's pages.
///
/// Position in the sequence is position in the exported document, so
/// unlike `Selection` the order itself is the data. Always a permutation
/// of the source pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrder {
    order: Vec<PageIndex>,
}

impl PageOrder {
    pub fn identity(total_pages: u32) -> PageOrder {
        PageOrder {
            order: (0..total_pages).map(PageIndex::new).collect(),
        }
    }

    /// Parse an explicit output order like "3,1,2".
    ///
    /// An output order has to account for every page exactly once, so
    /// unlike selection input this is strict: bad numbers, repeats, and
    /// missing pages are hard errors.
    pub fn parse(spec: &str, total_pages: u32) -> Result<PageOrder> {
        let mut order = Vec::new();
        let mut used = vec![false; total_pages as usize];

        for raw in spec.split(',') {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }
            let number: u32 = token
                .parse()
                .map_err(|_| anyhow!("Invalid page number: {}", token))?;
            let index = match PageNumber::new(number).and_then(|n| n.index(total_pages)) {
                Some(index) => index,
                None => bail!("Page {} is out of range (1-{})", number, total_pages),
            };
            if used[index.as_usize()] {
                bail!("Page {} appears more than once", number);
            }
            used[index.as_usize()] = true;
            order.push(index);
        }

        if order.len() != total_pages as usize {
            bail!(
                "Order lists {} of {} pages; every page must appear exactly once",
                order.len(),
                total_pages
            );
        }

        Ok(PageOrder { order })
    }

    /// Swap the page at `position` with its neighbor.
    ///
    /// Out-of-bounds targets leave the order untouched; returns whether a
    /// swap happened.
    pub fn swap(&mut self, position: usize, direction: Direction) -> bool {
        if position >= self.order.len() {
            return false;
        }
        let target = match direction {
            Direction::Left => position.checked_sub(1),
            Direction::Right => position
                .checked_add(1)
                .filter(|&target| target < self.order.len()),
        };
        match target {
            Some(target) => {
                self.order.swap(position, target);
                true
            }
            None => false,
        }
    }

    /// Move one page to a new position as a series of adjacent swaps; the
    /// pages in between shift by one.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from >= self.order.len() || to >= self.order.len() {
            return false;
        }
        let mut at = from;
        while at < to {
            self.swap(at, Direction::Right);
            at += 1;
        }
        while at > to {
            self.swap(at, Direction::Left);
            at -= 1;
        }
        true
    }

    pub fn reverse(&mut self) {
        self.order.reverse();
    }

    #[allow(dead_code)]
    pub fn reset(&mut self, total_pages: u32) {
        *self = PageOrder::identity(total_pages);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_indices(&self) -> &[PageIndex] {
        &self.order
    }
}

use std::fmt;

/// Zero-based position of a page in a loaded document.
///
/// Users always read and write one-based numbers; internal code always
/// indexes from zero. Crossing between the two goes through `PageNumber`,
/// so the off-by-one can't sneak in via bare arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageIndex(u32);

impl PageIndex {
    pub(crate) fn new(index: u32) -> Self {
        PageIndex(index)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// The one-based number shown to users.
    pub fn number(self) -> PageNumber {
        PageNumber(self.0 + 1)
    }
}

/// One-based page number, as written by users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(u32);

impl PageNumber {
    pub fn new(number: u32) -> Option<Self> {
        if number >= 1 {
            Some(PageNumber(number))
        } else {
            None
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based index, if the number refers to a page of the document.
    pub fn index(self, total_pages: u32) -> Option<PageIndex> {
        if self.0 >= 1 && self.0 <= total_pages {
            Some(PageIndex(self.0 - 1))
        } else {
            None
        }
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A token (or part of one) the parser dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub token: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Not a page number or a `start-end` pair of page numbers.
    Malformed,
    /// Range whose start is greater than its end.
    Inverted,
    /// No overlap with the document at all.
    OutOfRange,
    /// Partly outside the document; the in-range pages were kept.
    Clipped,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::Malformed => "not a page number or range",
            RejectReason::Inverted => "range start is greater than its end",
            RejectReason::OutOfRange => "no such page",
            RejectReason::Clipped => "partly outside the document",
        };
        f.write_str(text)
    }
}

/// An ascending, deduplicated set of pages to keep or remove.
///
/// Every way of choosing pages (typed range strings, per-page toggles)
/// lands in this one representation, so the input paths can't drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pages: Vec<PageIndex>,
}

impl Selection {
    /// Parse a range expression like "1-3, 7, 9-12".
    ///
    /// This runs on live, half-typed input, so it never fails: malformed
    /// and inverted tokens are dropped whole, pages outside the document
    /// are dropped silently, and duplicates collapse. The result is always
    /// ascending. Use `parse_report` to also learn what was dropped.
    pub fn parse(input: &str, total_pages: u32) -> Selection {
        Selection::parse_report(input, total_pages).0
    }

    /// `parse`, plus a record of every token that was dropped or clipped.
    pub fn parse_report(input: &str, total_pages: u32) -> (Selection, Vec<Rejection>) {
        let mut seen = vec![false; total_pages as usize];
        let mut rejected = Vec::new();

        for raw in input.split(',') {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }

            let bounds = match token.split_once('-') {
                Some((start, end)) => match (parse_number(start), parse_number(end)) {
                    (Some(start), Some(end)) if start > end => Err(RejectReason::Inverted),
                    (Some(start), Some(end)) => Ok((start, end)),
                    _ => Err(RejectReason::Malformed),
                },
                None => match parse_number(token) {
                    Some(page) => Ok((page, page)),
                    None => Err(RejectReason::Malformed),
                },
            };

            let (start, end) = match bounds {
                Ok(bounds) => bounds,
                Err(reason) => {
                    rejected.push(Rejection {
                        token: token.to_string(),
                        reason,
                    });
                    continue;
                }
            };

            // Clamp to the document before expanding; a range like
            // "1-999999" must not iterate past the last page.
            let first = start.max(1);
            let last = end.min(u64::from(total_pages));
            if first > last {
                rejected.push(Rejection {
                    token: token.to_string(),
                    reason: RejectReason::OutOfRange,
                });
                continue;
            }
            if start < first || end > last {
                rejected.push(Rejection {
                    token: token.to_string(),
                    reason: RejectReason::Clipped,
                });
            }
            for page in first..=last {
                seen[(page - 1) as usize] = true;
            }
        }

        let pages = seen
            .iter()
            .enumerate()
            .filter(|(_, &marked)| marked)
            .map(|(index, _)| PageIndex(index as u32))
            .collect();

        (Selection { pages }, rejected)
    }

    /// Every page of a document with `total_pages` pages.
    pub fn all(total_pages: u32) -> Selection {
        Selection {
            pages: (0..total_pages).map(PageIndex).collect(),
        }
    }

    pub fn from_indices<I: IntoIterator<Item = PageIndex>>(indices: I) -> Selection {
        let mut pages: Vec<PageIndex> = indices.into_iter().collect();
        pages.sort_unstable();
        pages.dedup();
        Selection { pages }
    }

    /// Every page of the document that is not in this selection.
    ///
    /// Turns a "pages to remove" selection into the keep-list the copy
    /// primitive wants. Callers must refuse an empty result rather than
    /// write a zero-page document.
    pub fn complement(&self, total_pages: u32) -> Selection {
        Selection::from_indices(
            (0..total_pages)
                .map(PageIndex)
                .filter(|page| !self.contains(*page)),
        )
    }

    /// Insert the page if absent, drop it if present.
    pub fn toggle(&mut self, page: PageIndex) {
        match self.pages.binary_search(&page) {
            Ok(at) => {
                self.pages.remove(at);
            }
            Err(at) => self.pages.insert(at, page),
        }
    }

    pub fn contains(&self, page: PageIndex) -> bool {
        self.pages.binary_search(&page).is_ok()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn indices(&self) -> &[PageIndex] {
        &self.pages
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = PageIndex> + '_ {
        self.pages.iter().copied()
    }

    /// Canonical compact form: consecutive pages collapse into ranges,
    /// so `{0,1,2,6}` renders as "1-3, 7". Parsing the result gives back
    /// exactly this selection.
    pub fn format(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut run = 0;
        while run < self.pages.len() {
            let mut end = run;
            while end + 1 < self.pages.len() && self.pages[end + 1].0 == self.pages[end].0 + 1 {
                end += 1;
            }
            if run == end {
                parts.push(self.pages[run].number().to_string());
            } else {
                parts.push(format!(
                    "{}-{}",
                    self.pages[run].number(),
                    self.pages[end].number()
                ));
            }
            run = end + 1;
        }
        parts.join(", ")
    }
}

fn parse_number(s: &str) -> Option<u64> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(selection: &Selection) -> Vec<u32> {
        selection.iter().map(|page| page.number().get()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(Selection::parse("", 10).is_empty());
        assert!(Selection::parse("", 0).is_empty());
        assert!(Selection::parse("  ,  , ", 10).is_empty());
    }

    #[test]
    fn test_single_page() {
        assert_eq!(numbers(&Selection::parse("5", 10)), vec![5]);
    }

    #[test]
    fn test_full_range_is_identity() {
        assert_eq!(numbers(&Selection::parse("1-5", 5)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_tokens_sort_ascending() {
        assert_eq!(numbers(&Selection::parse("9, 2, 5-6", 10)), vec![2, 5, 6, 9]);
    }

    #[test]
    fn test_overlapping_ranges_deduplicate() {
        assert_eq!(numbers(&Selection::parse("1-3, 2-5", 5)), vec![1, 2, 3, 4, 5]);
        assert_eq!(numbers(&Selection::parse("4, 4, 4", 5)), vec![4]);
    }

    #[test]
    fn test_out_of_range_dropped_without_error() {
        let (selection, rejected) = Selection::parse_report("2, 9999", 5);
        assert_eq!(numbers(&selection), vec![2]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].token, "9999");
        assert_eq!(rejected[0].reason, RejectReason::OutOfRange);
    }

    #[test]
    fn test_range_clipped_to_document() {
        let (selection, rejected) = Selection::parse_report("3-9999", 5);
        assert_eq!(numbers(&selection), vec![3, 4, 5]);
        assert_eq!(rejected[0].reason, RejectReason::Clipped);
    }

    #[test]
    fn test_inverted_range_dropped() {
        let (selection, rejected) = Selection::parse_report("5-2", 10);
        assert!(selection.is_empty());
        assert_eq!(rejected[0].reason, RejectReason::Inverted);
    }

    #[test]
    fn test_malformed_tokens_dropped() {
        for input in ["abc", "1-x", "-3", "3-", "-", "1-2-3"] {
            let (selection, rejected) = Selection::parse_report(input, 10);
            assert!(selection.is_empty(), "input {:?}", input);
            assert_eq!(rejected[0].reason, RejectReason::Malformed, "input {:?}", input);
        }
    }

    #[test]
    fn test_page_zero_is_out_of_range() {
        let (selection, rejected) = Selection::parse_report("0", 10);
        assert!(selection.is_empty());
        assert_eq!(rejected[0].reason, RejectReason::OutOfRange);
    }

    #[test]
    fn test_whitespace_insignificant() {
        assert_eq!(
            Selection::parse(" 1 - 3 ,  7 ", 10),
            Selection::parse("1-3,7", 10)
        );
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(Selection::parse("1,2,3,7,9,10", 10).format(), "1-3, 7, 9-10");
        assert_eq!(Selection::parse("4", 10).format(), "4");
        assert_eq!(Selection::default().format(), "");
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let total = 8;
        for mask in 0u32..(1 << total) {
            let selection = Selection::from_indices(
                (0..total)
                    .filter(|bit| mask & (1 << bit) != 0)
                    .map(PageIndex::new),
            );
            let (parsed, rejected) = Selection::parse_report(&selection.format(), total);
            assert!(rejected.is_empty(), "mask {:#010b}", mask);
            assert_eq!(parsed, selection, "mask {:#010b}", mask);
        }
    }

    #[test]
    fn test_complement() {
        let keep = Selection::parse("2, 4", 5).complement(5);
        assert_eq!(numbers(&keep), vec![1, 3, 5]);
    }

    #[test]
    fn test_complement_is_an_involution() {
        let total = 6;
        for mask in 0u32..(1 << total) {
            let selection = Selection::from_indices(
                (0..total)
                    .filter(|bit| mask & (1 << bit) != 0)
                    .map(PageIndex::new),
            );
            assert_eq!(selection.complement(total).complement(total), selection);
        }
    }

    #[test]
    fn test_complement_of_everything_is_empty() {
        assert!(Selection::parse("1-5", 5).complement(5).is_empty());
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut selection = Selection::parse("1-3, 7", 10);
        let original = selection.clone();
        let page = PageIndex::new(4);
        selection.toggle(page);
        assert!(selection.contains(page));
        selection.toggle(page);
        assert_eq!(selection, original);
    }

    #[test]
    fn test_toggle_converges_with_textual_input() {
        let mut clicked = Selection::default();
        for index in [4, 1, 2] {
            clicked.toggle(PageIndex::new(index));
        }
        assert_eq!(clicked, Selection::parse("2-3, 5", 10));
    }

    #[test]
    fn test_page_number_bounds() {
        assert!(PageNumber::new(0).is_none());
        let five = PageNumber::new(5).unwrap();
        assert_eq!(five.index(10), Some(PageIndex::new(4)));
        assert_eq!(five.index(4), None);
    }
}

//! Filename handling shared by every scan step.
//!
//! Project folders and media files are ordered the way a person reads them:
//! `2.png` before `10.png`, `shot-9` before `shot-10`. Plain string sorting
//! gets this wrong (`1, 10, 2`), so everything in the manifest goes through
//! [`natural_cmp`].
//!
//! ## Ordering rules
//!
//! Both names are split into alternating runs of ASCII digits and everything
//! else:
//! - digit runs compare by numeric value, of any length (`007` == `7` here)
//! - other runs compare case-insensitively
//! - remaining ties go to fewer leading zeros, then to a plain byte compare,
//!   so two distinct names never compare equal

use std::cmp::Ordering;

/// Compare two names with numeric-aware ordering.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);
    let mut zeros_tiebreak = Ordering::Equal;

    loop {
        match (left.next(), right.next()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => {
                let (xs, ys) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
                let ord = xs.len().cmp(&ys.len()).then_with(|| xs.cmp(ys));
                if ord != Ordering::Equal {
                    return ord;
                }
                if zeros_tiebreak == Ordering::Equal {
                    zeros_tiebreak = x.len().cmp(&y.len());
                }
            }
            (Some(x), Some(y)) => {
                let ord = cmp_caseless(x.text(), y.text());
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }

    zeros_tiebreak.then_with(|| a.cmp(b))
}

fn cmp_caseless(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[derive(Debug, Clone, Copy)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl<'a> Chunk<'a> {
    fn text(self) -> &'a str {
        match self {
            Chunk::Digits(s) | Chunk::Text(s) => s,
        }
    }
}

/// Iterator over alternating digit / non-digit runs of a string.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(if digits {
            Chunk::Digits(head)
        } else {
            Chunk::Text(head)
        })
    }
}

/// Split a file name into its logical id (stem) and lowercase extension.
///
/// - `"01.PNG"` → `("01", "png")`
/// - `"hero.final.webp"` → `("hero.final", "webp")`
/// - `"README"` → `None` (no extension)
/// - `".DS_Store"` → `None` (dotfile, no stem)
pub fn split_file_name(name: &str) -> Option<(&str, String)> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some((stem, ext.to_ascii_lowercase()))
}

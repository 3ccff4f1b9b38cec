// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/source.rs - Raw page text sources for FIDS page definitions.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `source` Module
 *
 * Page definitions are stored as raw text keyed by a numeric page number.
 * [PageSource] abstracts where that text comes from; [load_page] fetches and
 * decodes a page, reducing every failure to [DecodeOutcome::NoData].
 *
 * ## Usage Example
 *
 * ```no_run
 * use fidspage::source::{load_page, DirectoryPageSource};
 *
 * let source = DirectoryPageSource::new("/var/lib/fids/pages");
 * match load_page(&source, "105") {
 *     Ok(page) => println!("{}", page.to_json().unwrap()),
 *     Err(outcome) => eprintln!("{}", outcome),
 * }
 * ```
 */

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::io::ErrorKind;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::{DecodeOutcome, PageError};
use crate::page::{Page, PageDecoder};

/// Supplies the raw text of a page definition.
pub trait PageSource {
    /// Fetches the raw text for `page_number`.
    ///
    /// Returns [PageError::NotFound] if the page does not exist or is empty.
    fn fetch_raw_page(&self, page_number: &str) -> Result<String, PageError>;
}

/// Reads page definitions from `<root>/<page_number>.txt`.
#[derive(Debug, Clone)]
pub struct DirectoryPageSource {
    root: PathBuf,
}

impl DirectoryPageSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn page_path(&self, page_number: &str) -> PathBuf {
        self.root.join(format!("{}.txt", page_number))
    }
}

impl PageSource for DirectoryPageSource {
    fn fetch_raw_page(&self, page_number: &str) -> Result<String, PageError> {
        check_page_number(page_number)?;

        let path = self.page_path(page_number);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PageError::NotFound(page_number.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        let text = match String::from_utf8(buffer) {
            Ok(text) => text,
            Err(e) => {
                log::debug!(
                    "page {} is not valid UTF-8 after byte {}, replacing invalid sequences",
                    page_number,
                    e.utf8_error().valid_up_to()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        non_empty(page_number, text)
    }
}

impl PageSource for HashMap<String, String> {
    fn fetch_raw_page(&self, page_number: &str) -> Result<String, PageError> {
        check_page_number(page_number)?;

        match self.get(page_number) {
            Some(text) => non_empty(page_number, text.clone()),
            None => Err(PageError::NotFound(page_number.to_string())),
        }
    }
}

/// Fetches and decodes a page with the standard decoder.
pub fn load_page<S: PageSource + ?Sized>(
    source: &S,
    page_number: &str,
) -> Result<Page, DecodeOutcome> {
    load_page_with(source, page_number, &PageDecoder::default())
}

/// Fetches and decodes a page with a custom decoder.
pub fn load_page_with<S: PageSource + ?Sized>(
    source: &S,
    page_number: &str,
    decoder: &PageDecoder<'_>,
) -> Result<Page, DecodeOutcome> {
    let raw = source.fetch_raw_page(page_number)?;
    Ok(decoder.decode(&raw)?)
}

// Page numbers key a numeric column; they must never leave the page root.
fn check_page_number(page_number: &str) -> Result<(), PageError> {
    if page_number.is_empty() || !page_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PageError::NotFound(page_number.to_string()));
    }
    Ok(())
}

fn non_empty(page_number: &str, text: String) -> Result<String, PageError> {
    if text.is_empty() {
        return Err(PageError::NotFound(page_number.to_string()));
    }
    Ok(text)
}

// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Decoder library for FIDS display page definitions.
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
 * # `fidspage` Crate
 *
 * A library for decoding the text-based page definitions of flight
 * information display systems (FIDS) into a structured, render-ready page.
 *
 * A page definition is a newline-delimited blob:
 *
 * ```text
 * 800,600                                          <- resolution
 * PBRC=0;TFON="Arial"0,14,                         <- page settings
 * 0,0,800,50(BORW=0;TFIT=CC)T"Вылет\rDepartures";  <- static elements
 * ...
 * M,11,45,0,105,136,149(BORW=0)F;                  <- multiline template
 * 139,108,200,149(PBRC=1)F;
 * ```
 *
 * The crate is organized as a pipeline:
 *
 * 1. [source]: Fetches raw page text by page number.
 * 2. [segmenter]: Splits the text into header, static and multiline sections.
 * 3. [element]: Validates and decodes individual element lines.
 * 4. [settings]: Expands attribute strings through the [tables].
 * 5. [page]: Assembles the final [page::Page].
 *
 * ## Usage Example
 *
 * ```
 * use fidspage::decode_page;
 *
 * let raw = "800,600\nPBRC=0\n0,0,800,50(TFIT=CL)T\"Рейс\rFlight\";";
 *
 * let page = decode_page(raw).unwrap();
 * let title = &page.static_elements[0];
 * assert_eq!(title.settings.variable["OSHL"], "1");
 * assert_eq!(
 *     title.body.as_ref().unwrap().content.as_deref(),
 *     Some("Рейс\nFlight")
 * );
 * ```
 */

pub mod element;
pub mod error;
pub mod page;
pub mod segmenter;
pub mod settings;
pub mod source;
pub mod tables;

use crate::error::DecodeOutcome;
use crate::page::{Page, PageDecoder};

/// Decodes raw page text with the standard tables.
///
/// Any failure is reported as [DecodeOutcome::NoData]; lines that are not
/// element definitions are dropped without error.
pub fn decode_page(raw: &str) -> Result<Page, DecodeOutcome> {
    Ok(PageDecoder::default().decode(raw)?)
}

// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/element.rs - Element line decoder for FIDS page definitions.
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
 * # `element` Module
 *
 * Each element of a page is one line: a bounding box, an optional
 * parenthesized settings group and an optional typed body.
 *
 * ```text
 * 10,60,790,100(TFON="Arial"0,22,B;TFRC=255)T"Авиакомпания\rAirline";
 * ^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^
 * geometry      settings                     body
 * ```
 *
 * ## Usage Example
 *
 * ```
 * use fidspage::element::{is_element, PageElement};
 * use fidspage::settings::DEFAULT_MAX_EXPANSION_PASSES;
 * use fidspage::tables::TranslationTables;
 *
 * let line = "0,0,800,50(BORW=0)U";
 * assert!(is_element(line));
 *
 * let element = PageElement::decode(
 *     line,
 *     TranslationTables::standard(),
 *     DEFAULT_MAX_EXPANSION_PASSES,
 * )
 * .unwrap();
 * assert_eq!(element.resolution.right, Some(800));
 * assert_eq!(element.body.unwrap().kind, 'U');
 * ```
 */

use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::settings::ElementSettings;
use crate::tables::TranslationTables;

/// Bounding box of an element in page pixels.
///
/// A field that is not a valid integer is `None` (`null` once serialized).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementGeometry {
    pub left: Option<i64>,
    pub top: Option<i64>,
    pub right: Option<i64>,
    pub bottom: Option<i64>,
}

impl ElementGeometry {
    /// Parses the comma-separated `left,top,right,bottom` token.
    pub fn from_token(token: &str) -> Self {
        let mut fields = token.split(',').map(parse_leading_int);
        let mut next = || fields.next().flatten();
        let geometry = Self {
            left: next(),
            top: next(),
            right: next(),
            bottom: next(),
        };
        if !geometry.is_complete() {
            log::debug!("malformed element geometry {:?}", token);
        }
        geometry
    }

    /// Whether all four edges are valid integers.
    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.top.is_some() && self.right.is_some() && self.bottom.is_some()
    }
}

/// Typed body of an element, such as a text label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBody {
    /// Body type tag, e.g. `T` for literal text.
    #[serde(rename = "type")]
    pub kind: char,
    /// Literal content, with embedded carriage returns turned into line
    /// breaks.
    pub content: Option<String>,
}

impl ElementBody {
    /// Decodes the text following the settings group. Returns `None` when the
    /// token is empty or starts with `;`.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.strip_suffix('\r').unwrap_or(token);
        let mut chars = token.chars();
        let kind = chars.next().filter(|&c| c != ';')?;

        let rest = chars.as_str();
        let rest = rest.strip_suffix(';').unwrap_or(rest);
        let content = if rest.is_empty() {
            None
        } else {
            let unquoted = rest.strip_prefix('"').unwrap_or(rest);
            let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
            Some(unquoted.replace('\r', "\n"))
        };

        Some(Self { kind, content })
    }
}

/// A decoded page element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
    /// The element's bounding box.
    pub resolution: ElementGeometry,
    pub settings: ElementSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ElementBody>,
}

impl PageElement {
    /// Decodes one element line.
    ///
    /// # Arguments
    ///
    /// * `line` - A line that passed [is_element].
    /// * `tables` - Translation tables for the settings group.
    /// * `max_passes` - The settings expansion pass ceiling.
    ///
    /// # Returns
    ///
    /// A `Result` containing the decoded element or an error from the
    /// settings decoder.
    pub fn decode(
        line: &str,
        tables: &TranslationTables,
        max_passes: usize,
    ) -> Result<Self, PageError> {
        let tokens = ElementTokens::scan(line);

        Ok(Self {
            resolution: ElementGeometry::from_token(tokens.geometry),
            settings: ElementSettings::decode(tokens.settings, tables, max_passes)?,
            body: tokens.body.and_then(ElementBody::from_token),
        })
    }
}

/// The three raw parts of an element line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTokens<'a> {
    pub geometry: &'a str,
    pub settings: &'a str,
    pub body: Option<&'a str>,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Geometry,
    Settings { open: usize },
    Body { start: usize },
}

impl<'a> ElementTokens<'a> {
    /// Splits a line into geometry, settings and body.
    ///
    /// The geometry ends at the first letter or `(`. A `(` opens the settings
    /// group, which ends at the next `)` (groups do not nest). The body is
    /// whatever follows. An unterminated group runs to the end of the line.
    pub fn scan(line: &'a str) -> Self {
        let mut state = ScanState::Geometry;
        let mut geometry_end = line.len();
        let mut settings = "";

        for (i, c) in line.char_indices() {
            state = match state {
                ScanState::Geometry if c == '(' => {
                    geometry_end = i;
                    ScanState::Settings { open: i }
                }
                ScanState::Geometry if c.is_alphabetic() => {
                    geometry_end = i;
                    ScanState::Body { start: i }
                }
                ScanState::Settings { open } if c == ')' => {
                    settings = &line[open + 1..i];
                    ScanState::Body { start: i + 1 }
                }
                other => other,
            };
            if let ScanState::Body { .. } = state {
                break;
            }
        }

        let body = match state {
            ScanState::Geometry => None,
            ScanState::Settings { open } => {
                settings = &line[open + 1..];
                None
            }
            ScanState::Body { start } => Some(&line[start..]).filter(|b| !b.is_empty()),
        };

        Self {
            geometry: &line[..geometry_end],
            settings,
            body,
        }
    }
}

/// Checks whether a line defines an element: its first four comma-separated
/// tokens must all start with an integer.
pub fn is_element(line: &str) -> bool {
    let tokens: Vec<&str> = line.split(',').take(4).collect();
    tokens.len() == 4 && tokens.iter().all(|t| leading_int(t).is_some())
}

/// Parses the integer at the start of `token`, ignoring leading whitespace and
/// anything after the digits. Values outside `i64` are `None`.
pub fn parse_leading_int(token: &str) -> Option<i64> {
    leading_int(token)?.parse().ok()
}

/// The signed digit run at the start of `token`, of any length.
fn leading_int(token: &str) -> Option<&str> {
    let token = token.trim_start();
    let sign_len = match token.as_bytes().first() {
        Some(b'-') | Some(b'+') => 1,
        _ => 0,
    };
    let digits = token[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    Some(&token[..sign_len + digits])
}

// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/segmenter.rs - Page segmenter for FIDS page definitions.
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
 * # `segmenter` Module
 *
 * Splits raw page text into its sections:
 *
 * 1. The resolution line (`800,600`).
 * 2. The page settings line (`KEY=VALUE;...`).
 * 3. Static element lines.
 * 4. An optional multiline template block, introduced by a sentinel line
 *    `M,<numOfElements>,<margin>,<element>` whose remainder is itself the
 *    first element of the block.
 */

use serde::{Deserialize, Serialize};

use crate::element::parse_leading_int;
use crate::error::PageError;

/// Default first character of the multiline sentinel line.
pub const DEFAULT_SENTINEL: char = 'M';

/// Parameters of the repeated-row template block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultilineSettings {
    /// How many times the template row repeats.
    #[serde(rename = "numOfElements")]
    pub num_of_elements: Option<i64>,
    /// Vertical distance between repeated rows.
    pub margin: Option<i64>,
}

/// Raw page text split into sections. Element lines are not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedPage<'a> {
    pub resolution_line: &'a str,
    pub page_settings_line: &'a str,
    pub static_lines: Vec<&'a str>,
    pub multiline_lines: Vec<&'a str>,
    pub multiline_settings: Option<MultilineSettings>,
}

impl<'a> SegmentedPage<'a> {
    /// Splits raw page text.
    ///
    /// Every line starting with `sentinel` is replaced by the element that
    /// follows its settings fields. If there are several, the last one starts
    /// the multiline block and supplies the settings; the earlier ones stay in
    /// the static block as ordinary elements.
    ///
    /// # Arguments
    ///
    /// * `raw` - The raw page text.
    /// * `sentinel` - First character of the multiline sentinel line.
    ///
    /// # Returns
    ///
    /// A `Result` containing the sections, or an error if the text is empty
    /// or has no page settings line.
    pub fn split(raw: &'a str, sentinel: char) -> Result<Self, PageError> {
        if raw.trim().is_empty() {
            return Err(PageError::Empty);
        }

        let lines: Vec<&str> = raw.split('\n').collect();
        let resolution_line = trim_cr(lines[0]);
        let page_settings_line = lines
            .get(1)
            .copied()
            .map(trim_cr)
            .ok_or(PageError::MissingPageSettings)?;
        let elements = &lines[2..];

        // Every sentinel line is reduced to its element; the last one starts
        // the multiline block.
        let mut element_lines = elements.to_vec();
        let mut last_sentinel = None;
        let mut sentinel_count = 0;
        for (position, line) in element_lines.iter_mut().enumerate() {
            if line.starts_with(sentinel) {
                let (settings, first_element) = split_sentinel(*line);
                *line = first_element;
                last_sentinel = Some((position, settings));
                sentinel_count += 1;
            }
        }
        if sentinel_count > 1 {
            log::warn!(
                "found {} multiline sentinel lines, using the last one",
                sentinel_count
            );
        }

        let (static_lines, multiline_lines, multiline_settings) = match last_sentinel {
            Some((position, settings)) => {
                let multiline_lines = element_lines.split_off(position);
                (element_lines, multiline_lines, Some(settings))
            }
            None => (element_lines, Vec::new(), None),
        };

        log::debug!(
            "segmented page: {} static lines, {} multiline lines, sentinel at {:?}",
            static_lines.len(),
            multiline_lines.len(),
            last_sentinel.map(|(position, _)| position + 2)
        );

        Ok(Self {
            resolution_line,
            page_settings_line,
            static_lines,
            multiline_lines,
            multiline_settings,
        })
    }
}

/// Takes the 2nd and 3rd comma fields as settings; everything after the 3rd
/// field is the first multiline element.
fn split_sentinel(line: &str) -> (MultilineSettings, &str) {
    let mut fields = line.splitn(4, ',').skip(1);
    let num_of_elements = fields.next().and_then(parse_leading_int);
    let margin = fields.next().and_then(parse_leading_int);
    let first_element = fields.next().unwrap_or("");

    if num_of_elements.is_none() || margin.is_none() {
        log::debug!("malformed multiline settings in {:?}", line);
    }

    (
        MultilineSettings {
            num_of_elements,
            margin,
        },
        first_element,
    )
}

fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/page.rs - Page assembler for FIDS page definitions.
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
 * # `page` Module
 *
 * Assembles a [Page] from raw page text: the [crate::segmenter] splits the
 * text into sections, invalid element lines are dropped, and every remaining
 * line goes through the [crate::element] decoder.
 *
 * ## Usage Example
 *
 * ```
 * use fidspage::page::PageDecoder;
 *
 * let raw = "800,600\nPBRC=0\n0,0,800,50(BORW=0)T\"Departures\";\nM,11,45,0,105,136,149(BORW=0)F;";
 *
 * let page = PageDecoder::default().decode(raw).unwrap();
 * assert_eq!(page.resolution.x, Some(800));
 * assert_eq!(page.static_elements.len(), 1);
 * assert_eq!(page.multiline_elements.len(), 1);
 * assert_eq!(page.multiline_settings.unwrap().margin, Some(45));
 * ```
 */

use serde::{Deserialize, Serialize};

use crate::element::{PageElement, is_element, parse_leading_int};
use crate::error::PageError;
use crate::segmenter::{DEFAULT_SENTINEL, MultilineSettings, SegmentedPage};
use crate::settings::{DEFAULT_MAX_EXPANSION_PASSES, ElementSettings};
use crate::tables::TranslationTables;

/// Display extents of a page in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResolution {
    pub x: Option<i64>,
    pub y: Option<i64>,
}

impl PageResolution {
    /// Parses the `x,y` resolution line.
    pub fn from_line(line: &str) -> Self {
        let mut fields = line.split(',').map(parse_leading_int);
        let x = fields.next().flatten();
        let y = fields.next().flatten();
        if x.is_none() || y.is_none() {
            log::debug!("malformed page resolution {:?}", line);
        }
        Self { x, y }
    }
}

/// A decoded FIDS page, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub resolution: PageResolution,
    /// Settings applying to the whole page.
    pub page_settings: ElementSettings,
    /// Elements drawn once.
    pub static_elements: Vec<PageElement>,
    /// Template row elements, repeated per [MultilineSettings].
    pub multiline_elements: Vec<PageElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiline_settings: Option<MultilineSettings>,
}

impl Page {
    /// Decodes raw page text with the standard tables and default options.
    pub fn from_raw(raw: &str) -> Result<Self, PageError> {
        PageDecoder::default().decode(raw)
    }

    /// Serializes the page into the JSON shape consumed by renderers.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decodes pages with a given set of translation tables and options.
#[derive(Debug, Clone, Copy)]
pub struct PageDecoder<'t> {
    tables: &'t TranslationTables,
    max_expansion_passes: usize,
    sentinel: char,
}

impl Default for PageDecoder<'static> {
    fn default() -> Self {
        Self::new(TranslationTables::standard())
    }
}

impl<'t> PageDecoder<'t> {
    pub fn new(tables: &'t TranslationTables) -> Self {
        Self {
            tables,
            max_expansion_passes: DEFAULT_MAX_EXPANSION_PASSES,
            sentinel: DEFAULT_SENTINEL,
        }
    }

    /// Sets the number of expansion passes after which the translation tables
    /// are reported as cyclic.
    pub fn with_max_expansion_passes(mut self, passes: usize) -> Self {
        self.max_expansion_passes = passes;
        self
    }

    /// Sets the first character of the multiline sentinel line.
    pub fn with_sentinel(mut self, sentinel: char) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Decodes raw page text into a [Page].
    ///
    /// Lines that are not element definitions are silently dropped.
    ///
    /// # Arguments
    ///
    /// * `raw` - The raw page text.
    ///
    /// # Returns
    ///
    /// A `Result` containing the decoded page or an error.
    pub fn decode(&self, raw: &str) -> Result<Page, PageError> {
        let segmented = SegmentedPage::split(raw, self.sentinel)?;

        let page = Page {
            resolution: PageResolution::from_line(segmented.resolution_line),
            page_settings: self.decode_settings(segmented.page_settings_line)?,
            static_elements: self.decode_elements(&segmented.static_lines)?,
            multiline_elements: self.decode_elements(&segmented.multiline_lines)?,
            multiline_settings: segmented.multiline_settings,
        };

        log::debug!(
            "decoded page {:?}: {} static elements, {} multiline elements",
            page.resolution,
            page.static_elements.len(),
            page.multiline_elements.len()
        );

        Ok(page)
    }

    /// Decodes a single element line. The line should pass
    /// [crate::element::is_element].
    pub fn decode_element(&self, line: &str) -> Result<PageElement, PageError> {
        PageElement::decode(line, self.tables, self.max_expansion_passes)
    }

    pub fn decode_settings(&self, settings: &str) -> Result<ElementSettings, PageError> {
        ElementSettings::decode(settings, self.tables, self.max_expansion_passes)
    }

    fn decode_elements(&self, lines: &[&str]) -> Result<Vec<PageElement>, PageError> {
        lines
            .iter()
            .copied()
            .filter(|line| is_element(line))
            .map(|line| self.decode_element(line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::tables::{CompositeEntry, Divider};

    #[test]
    fn resolution_line_is_parsed() {
        assert_eq!(
            PageResolution::from_line("1920,1080"),
            PageResolution {
                x: Some(1920),
                y: Some(1080),
            }
        );
        assert_eq!(
            PageResolution::from_line("wide,1080"),
            PageResolution {
                x: None,
                y: Some(1080),
            }
        );
        assert_eq!(PageResolution::from_line("800").y, None);
    }

    #[test]
    fn invalid_lines_are_dropped() {
        let raw = "800,600\nPBRC=0\n\n0,0,800,50(BORW=0)U\nstray text\n8,5,73(BORW=0)\n10,10,20,20";
        let page = Page::from_raw(raw).unwrap();
        assert_eq!(page.static_elements.len(), 2);
        assert_eq!(page.static_elements[0].resolution.bottom, Some(50));
        assert_eq!(page.static_elements[1].resolution.left, Some(10));
        assert!(page.multiline_elements.is_empty());
        assert_eq!(page.multiline_settings, None);
    }

    #[test]
    fn page_settings_are_expanded() {
        let page = Page::from_raw("800,600\nPBRC=0;TFON=\"Arial\"0,14,I\n").unwrap();
        assert_eq!(page.page_settings.variable["PBRC"], "0");
        assert_eq!(page.page_settings.variable["TFSZ"], "14");
        assert_eq!(page.page_settings.variable["TFTS"], "1");
    }

    #[test]
    fn sentinel_remainder_is_first_multiline_element() {
        let raw = "800,600\n\n0,0,1,1\nM,11,45,0,105,136,149(BORW=0)F;\n139,108,200,149(PBRC=1)";
        let page = Page::from_raw(raw).unwrap();
        assert_eq!(page.multiline_elements.len(), 2);
        let first = &page.multiline_elements[0];
        assert_eq!(first.resolution.left, Some(0));
        assert_eq!(first.resolution.top, Some(105));
        assert_eq!(first.body.as_ref().unwrap().kind, 'F');
    }

    #[test]
    fn earlier_template_rows_stay_static() {
        let raw = "800,600\n\nM,2,10,0,0,1,1\n1,1,2,2\nM,3,20,5,5,6,6\n7,7,8,8";
        let page = Page::from_raw(raw).unwrap();
        let lefts = |elements: &[PageElement]| -> Vec<Option<i64>> {
            elements.iter().map(|e| e.resolution.left).collect()
        };
        assert_eq!(lefts(&page.static_elements), vec![Some(0), Some(1)]);
        assert_eq!(lefts(&page.multiline_elements), vec![Some(5), Some(7)]);
        assert_eq!(
            page.multiline_settings,
            Some(MultilineSettings {
                num_of_elements: Some(3),
                margin: Some(20),
            })
        );
    }

    #[test]
    fn empty_page_fails() {
        assert!(matches!(Page::from_raw(""), Err(PageError::Empty)));
    }

    #[test]
    fn cyclic_tables_fail_the_whole_page() {
        let composites = HashMap::from([(
            "SELF".to_string(),
            CompositeEntry {
                sub_codes: vec!["SELF".to_string()],
                divider: Divider::Default,
            },
        )]);
        let tables = TranslationTables::new(composites, HashMap::new());
        let decoder = PageDecoder::new(&tables).with_max_expansion_passes(4);
        assert!(matches!(
            decoder.decode("800,600\n\n0,0,1,1(SELF=1)"),
            Err(PageError::ExpansionLimit { passes: 4 })
        ));
    }

    #[test]
    fn page_serializes_with_contract_field_names() {
        let raw = "800,600\nPBRC=0\n0,0,1,1\nM,2,30,0,0,5,5";
        let json = serde_json::to_value(Page::from_raw(raw).unwrap()).unwrap();
        assert_eq!(json["resolution"]["x"], 800);
        assert_eq!(json["pageSettings"]["variable"]["PBRC"], "0");
        assert_eq!(json["staticElements"].as_array().unwrap().len(), 1);
        assert_eq!(json["multilineElements"].as_array().unwrap().len(), 1);
        assert_eq!(json["multilineSettings"]["numOfElements"], 2);
        assert_eq!(json["multilineSettings"]["margin"], 30);
    }

    #[test]
    fn absent_multiline_settings_are_omitted() {
        let page = Page::from_raw("800,600\n\n0,0,1,1").unwrap();
        let json: serde_json::Value = serde_json::from_str(&page.to_json().unwrap()).unwrap();
        assert!(json.get("multilineSettings").is_none());
    }

    #[test]
    fn malformed_resolution_serializes_as_null() {
        let page = Page::from_raw("auto,600\n\n").unwrap();
        let json = serde_json::to_value(&page).unwrap();
        assert!(json["resolution"]["x"].is_null());
        assert_eq!(json["resolution"]["y"], 600);
    }

    #[test]
    fn json_round_trips_into_equal_page() {
        let raw = "800,600\nTFIT=CC\n0,0,800,50(TFON=\"Arial\"0,22,B)T\"Flight\rРейс\";";
        let page = Page::from_raw(raw).unwrap();
        let decoded: Page = serde_json::from_str(&page.to_json().unwrap()).unwrap();
        assert_eq!(decoded, page);
    }
}

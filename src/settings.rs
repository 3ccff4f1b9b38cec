// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/settings.rs - Settings decoder for FIDS page attribute strings.
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
 * # `settings` Module
 *
 * Decodes attribute strings of the form `KEY1=VAL1;KEY2=VAL2;...` into
 * [ElementSettings], expanding composite attribute codes through the
 * [TranslationTables] until only canonical attributes remain.
 *
 * ## Usage Example
 *
 * ```
 * use fidspage::settings::ElementSettings;
 *
 * let settings: ElementSettings = "TFON=\"Arial\"0,22,B;BORW=0".parse().unwrap();
 * assert_eq!(settings.variable["FONT"], "Arial");
 * assert_eq!(settings.variable["TFBD"], "1");
 * assert!(!settings.variable.contains_key("TFON"));
 * ```
 */

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::tables::{PrimitiveValue, TranslationTables};

/// Upper bound on expanding passes before the tables are considered cyclic.
pub const DEFAULT_MAX_EXPANSION_PASSES: usize = 8;

/// Decoded attributes of a page or element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSettings {
    /// Flags without a value, in discovery order.
    pub fixed: Vec<String>,
    /// Canonical attribute code to value, in insertion order.
    pub variable: IndexMap<String, String>,
}

impl ElementSettings {
    /// Decodes a settings string with the given tables.
    ///
    /// # Arguments
    ///
    /// * `settings` - The raw `KEY=VALUE;...` string. May be empty.
    /// * `tables` - The translation tables to expand composite codes with.
    /// * `max_passes` - The expansion pass ceiling.
    ///
    /// # Returns
    ///
    /// A `Result` containing the fully expanded settings, or
    /// [PageError::ExpansionLimit] if the tables never reach a fixed point.
    pub fn decode(
        settings: &str,
        tables: &TranslationTables,
        max_passes: usize,
    ) -> Result<Self, PageError> {
        let tokenized = Self::tokenize(settings)?;
        log::trace!("settings before expansion: {:?}", tokenized);
        let expanded = tokenized.expand(tables, max_passes)?;
        log::trace!("settings after expansion: {:?}", expanded);
        Ok(expanded)
    }

    /// Splits a settings string into raw `key => value` pairs without any
    /// translation. A later duplicate key overwrites the earlier value.
    pub fn tokenize(settings: &str) -> Result<Self, PageError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .terminator(csv::Terminator::Any(b';'))
            .quoting(false)
            .flexible(true)
            .has_headers(false)
            .from_reader(settings.as_bytes());

        let mut variable = IndexMap::new();
        for result in reader.records() {
            let record = result?;
            for token in record.iter().filter(|t| !t.is_empty()) {
                let (key, value) = token.split_once('=').unwrap_or((token, ""));
                variable.insert(key.to_string(), value.to_string());
            }
        }

        Ok(Self {
            fixed: Vec::new(),
            variable,
        })
    }

    /// Repeats expansion passes until a pass expands no composite code.
    ///
    /// Up to `max_passes` passes may expand; one more pass confirms the fixed
    /// point. Expanding already-expanded settings returns them unchanged.
    pub fn expand(
        self,
        tables: &TranslationTables,
        max_passes: usize,
    ) -> Result<Self, PageError> {
        let mut settings = self;
        for pass in 0..=max_passes {
            let (next, expanded) = settings.expand_once(tables);
            settings = next;
            if !expanded {
                return Ok(settings);
            }
            log::trace!("expansion pass {}: {:?}", pass + 1, settings);
        }
        Err(PageError::ExpansionLimit { passes: max_passes })
    }

    fn expand_once(self, tables: &TranslationTables) -> (Self, bool) {
        let Self {
            mut fixed,
            variable,
        } = self;
        let mut next = IndexMap::new();
        let mut expanded = false;

        for (key, value) in variable {
            if let Some(entry) = tables.composite(&key) {
                expanded = true;
                let sub_values = entry.divider.split(&value);
                for (sub_code, sub_value) in entry.sub_codes.iter().zip(sub_values) {
                    match tables.primitive(sub_code) {
                        Some(primitive) => {
                            apply(primitive.resolve(sub_value), &mut fixed, &mut next)
                        }
                        None => {
                            next.insert(sub_code.clone(), sub_value.to_string());
                        }
                    }
                }
            } else if let Some(primitive) = tables.primitive(&key) {
                apply(primitive.resolve(&value), &mut fixed, &mut next);
            } else {
                next.insert(key, value);
            }
        }

        (
            Self {
                fixed,
                variable: next,
            },
            expanded,
        )
    }
}

impl FromStr for ElementSettings {
    type Err = PageError;

    /// Decodes with the standard tables and the default pass ceiling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s, TranslationTables::standard(), DEFAULT_MAX_EXPANSION_PASSES)
    }
}

fn apply(
    translations: Vec<&PrimitiveValue>,
    fixed: &mut Vec<String>,
    variable: &mut IndexMap<String, String>,
) {
    for translation in translations {
        match translation {
            PrimitiveValue::Plain(flag) => fixed.push(flag.clone()),
            PrimitiveValue::Named { name, value } => {
                variable.insert(name.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::tables::{CompositeEntry, Divider, PrimitiveEntry};

    fn decode(s: &str) -> ElementSettings {
        s.parse().unwrap()
    }

    fn keys(settings: &ElementSettings) -> Vec<&str> {
        settings.variable.keys().map(String::as_str).collect()
    }

    #[test]
    fn empty_string_yields_empty_settings() {
        assert_eq!(decode(""), ElementSettings::default());
    }

    #[test]
    fn canonical_attributes_pass_through_in_order() {
        let settings = decode("PBRC=16777215;BORW=0;TFRC=255");
        assert!(settings.fixed.is_empty());
        assert_eq!(keys(&settings), vec!["PBRC", "BORW", "TFRC"]);
        assert_eq!(settings.variable["TFRC"], "255");
    }

    #[test]
    fn later_duplicate_key_wins() {
        let settings = decode("BORW=0;PBRC=1;BORW=3");
        assert_eq!(keys(&settings), vec!["BORW", "PBRC"]);
        assert_eq!(settings.variable["BORW"], "3");
    }

    #[test]
    fn token_without_equals_sign_has_empty_value() {
        let settings = decode("HIDE;BORW=1;");
        assert_eq!(settings.variable["HIDE"], "");
        assert_eq!(settings.variable["BORW"], "1");
    }

    #[test]
    fn only_semicolons_separate_tokens() {
        let settings = decode("NAME=a\rb;BORW=1;NOTE=x\ny\r\n");
        assert_eq!(keys(&settings), vec!["NAME", "BORW", "NOTE"]);
        assert_eq!(settings.variable["NAME"], "a\rb");
        assert_eq!(settings.variable["NOTE"], "x\ny\r\n");
    }

    #[test]
    fn value_keeps_everything_after_first_equals_sign() {
        let settings = decode("EXPR=a=b");
        assert_eq!(settings.variable["EXPR"], "a=b");
    }

    #[test]
    fn font_composite_expands_into_canonical_attributes() {
        let settings = decode("TFON=\"Arial\"0,22,B");
        assert_eq!(keys(&settings), vec!["FONT", "TFCS", "TFSZ", "TFBD"]);
        assert_eq!(settings.variable["FONT"], "Arial");
        assert_eq!(settings.variable["TFCS"], "0");
        assert_eq!(settings.variable["TFSZ"], "22");
        assert_eq!(settings.variable["TFBD"], "1");
        assert!(!settings.variable.contains_key("TFON"));
        assert!(!settings.variable.contains_key("TFST"));
    }

    #[test]
    fn font_style_expands_every_character() {
        let settings = decode("TFON=\"Tahoma\"204,12,BIU");
        assert_eq!(settings.variable["TFBD"], "1");
        assert_eq!(settings.variable["TFTS"], "1");
        assert_eq!(settings.variable["TFUL"], "1");
    }

    #[test]
    fn missing_sub_values_are_left_unassigned() {
        let settings = decode("TFON=\"Arial\"");
        assert_eq!(keys(&settings), vec!["FONT"]);
    }

    #[test]
    fn text_fit_expands_per_character() {
        let settings = decode("TFIT=CL");
        assert_eq!(keys(&settings), vec!["OSVC", "OSHL"]);
        assert!(!settings.variable.contains_key("OFSV"));
        assert!(!settings.variable.contains_key("OFSH"));
    }

    #[test]
    fn unknown_lookup_value_is_dropped() {
        let settings = decode("TFIT=XR");
        assert_eq!(keys(&settings), vec!["OSHR"]);
    }

    #[test]
    fn direct_primitive_key_is_translated() {
        let settings = decode("TFST=UB");
        assert_eq!(keys(&settings), vec!["TFUL", "TFBD"]);
    }

    #[test]
    fn expansion_is_idempotent() {
        let settings = decode("TFON=\"Arial\"0,22,BI;TFIT=BR;PBRC=0");
        let again = settings
            .clone()
            .expand(TranslationTables::standard(), DEFAULT_MAX_EXPANSION_PASSES)
            .unwrap();
        assert_eq!(again, settings);
    }

    fn nested_tables() -> TranslationTables {
        let composites = HashMap::from([
            (
                "OUTR".to_string(),
                CompositeEntry {
                    sub_codes: vec!["INNR".to_string(), "WDTH".to_string()],
                    divider: Divider::Literal("/".to_string()),
                },
            ),
            (
                "INNR".to_string(),
                CompositeEntry {
                    sub_codes: vec!["MODE".to_string(), "COLR".to_string()],
                    divider: Divider::Literal(String::new()),
                },
            ),
        ]);
        let primitives = HashMap::from([(
            "MODE".to_string(),
            PrimitiveEntry::Lookup(HashMap::from([
                ("S".to_string(), PrimitiveValue::Plain("SOLD".to_string())),
                ("D".to_string(), PrimitiveValue::Plain("DASH".to_string())),
            ])),
        )]);
        TranslationTables::new(composites, primitives)
    }

    #[test]
    fn composite_expanding_into_composite_reaches_fixed_point() {
        let settings =
            ElementSettings::decode("OUTR=D7/3;KEEP=x", &nested_tables(), 8).unwrap();
        assert_eq!(settings.fixed, vec!["DASH"]);
        assert_eq!(settings.variable["COLR"], "7");
        assert_eq!(settings.variable["WDTH"], "3");
        assert_eq!(settings.variable["KEEP"], "x");
        assert!(!settings.variable.contains_key("OUTR"));
        assert!(!settings.variable.contains_key("INNR"));
    }

    #[test]
    fn plain_flags_keep_discovery_order() {
        let settings =
            ElementSettings::decode("OUTR=S1/2;MODE=D", &nested_tables(), 8).unwrap();
        assert_eq!(settings.fixed, vec!["DASH", "SOLD"]);
    }

    #[test]
    fn pass_ceiling_is_enforced() {
        assert!(matches!(
            ElementSettings::decode("OUTR=D7/3", &nested_tables(), 1),
            Err(PageError::ExpansionLimit { passes: 1 })
        ));
    }

    #[test]
    fn ceiling_equal_to_expansion_depth_still_settles() {
        let settings = ElementSettings::decode("OUTR=D7/3", &nested_tables(), 2).unwrap();
        assert_eq!(settings.fixed, vec!["DASH"]);
        assert_eq!(settings.variable["COLR"], "7");
    }

    #[test]
    fn cyclic_tables_fail_instead_of_looping() {
        let composites = HashMap::from([
            (
                "LOOP".to_string(),
                CompositeEntry {
                    sub_codes: vec!["POOL".to_string()],
                    divider: Divider::Default,
                },
            ),
            (
                "POOL".to_string(),
                CompositeEntry {
                    sub_codes: vec!["LOOP".to_string()],
                    divider: Divider::Default,
                },
            ),
        ]);
        let tables = TranslationTables::new(composites, HashMap::new());
        assert!(matches!(
            ElementSettings::decode("LOOP=1", &tables, DEFAULT_MAX_EXPANSION_PASSES),
            Err(PageError::ExpansionLimit { .. })
        ));
    }
}

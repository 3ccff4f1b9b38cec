// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/tables.rs - Attribute translation tables for FIDS page settings.
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
 * # `tables` Module
 *
 * Page settings use short attribute codes. Some codes are composites that pack
 * several sub-attributes into one value; others are primitives whose values
 * must be looked up to obtain the canonical attribute. This module holds both
 * tables and the standard instance shared by every decode call.
 *
 * The tables must not contain cycles (a composite that eventually expands back
 * into itself). The settings decoder bounds the number of expansion passes and
 * reports [crate::error::PageError::ExpansionLimit] when that happens.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// How the value of a composite attribute is split into sub-values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divider {
    /// Split on `,` or `"`.
    Default,
    /// Split on a literal string. The empty string splits into characters.
    Literal(String),
}

impl Divider {
    /// Splits `value` into its positional sub-values, discarding empty
    /// fragments.
    pub fn split<'a>(&self, value: &'a str) -> Vec<&'a str> {
        match self {
            Divider::Default => value
                .split([',', '"'])
                .filter(|s| !s.is_empty())
                .collect(),
            Divider::Literal(divider) if divider.is_empty() => value
                .char_indices()
                .map(|(i, c)| &value[i..i + c.len_utf8()])
                .collect(),
            Divider::Literal(divider) => value
                .split(divider.as_str())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// A composite attribute: the ordered sub-codes its value packs together.
#[derive(Debug, Clone)]
pub struct CompositeEntry {
    /// Sub-codes, aligned by position with the split value.
    pub sub_codes: Vec<String>,
    /// The divider separating sub-values.
    pub divider: Divider,
}

/// The result of looking up a primitive value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveValue {
    /// A flag without a value. Goes to [crate::settings::ElementSettings::fixed].
    Plain(String),
    /// A canonical attribute with a value. Goes to
    /// [crate::settings::ElementSettings::variable].
    Named { name: String, value: String },
}

/// Translation of a primitive attribute's value.
#[derive(Debug, Clone)]
pub enum PrimitiveEntry {
    /// The whole value is the lookup key.
    Lookup(HashMap<String, PrimitiveValue>),
    /// Every character of the value is a separate lookup key.
    Multiline(HashMap<char, PrimitiveValue>),
}

impl PrimitiveEntry {
    /// Returns the translations matched by `value`, in order. Unknown values
    /// and characters match nothing.
    pub fn resolve(&self, value: &str) -> Vec<&PrimitiveValue> {
        match self {
            PrimitiveEntry::Lookup(map) => map.get(value).into_iter().collect(),
            PrimitiveEntry::Multiline(map) => value.chars().filter_map(|c| map.get(&c)).collect(),
        }
    }
}

/// The composite and primitive translation tables.
#[derive(Debug, Clone, Default)]
pub struct TranslationTables {
    composites: HashMap<String, CompositeEntry>,
    primitives: HashMap<String, PrimitiveEntry>,
}

static STANDARD_TABLES: Lazy<TranslationTables> = Lazy::new(TranslationTables::build_standard);

impl TranslationTables {
    pub fn new(
        composites: HashMap<String, CompositeEntry>,
        primitives: HashMap<String, PrimitiveEntry>,
    ) -> Self {
        Self {
            composites,
            primitives,
        }
    }

    /// The tables used by FIDS page definitions.
    pub fn standard() -> &'static TranslationTables {
        &STANDARD_TABLES
    }

    pub fn composite(&self, code: &str) -> Option<&CompositeEntry> {
        self.composites.get(code)
    }

    pub fn primitive(&self, code: &str) -> Option<&PrimitiveEntry> {
        self.primitives.get(code)
    }

    fn build_standard() -> Self {
        let mut composites = HashMap::new();

        // Font: family, character set, size, style
        composites.insert(
            "TFON".to_string(),
            composite(&["FONT", "TFCS", "TFSZ", "TFST"], Divider::Default),
        );
        // Text fit: vertical then horizontal alignment, one character each
        composites.insert(
            "TFIT".to_string(),
            composite(&["OFSV", "OFSH"], Divider::Literal(String::new())),
        );

        let mut primitives = HashMap::new();

        primitives.insert(
            "TFST".to_string(),
            PrimitiveEntry::Multiline(HashMap::from([
                ('B', flag("TFBD")),
                ('I', flag("TFTS")),
                ('U', flag("TFUL")),
            ])),
        );
        primitives.insert(
            "OFSV".to_string(),
            PrimitiveEntry::Lookup(HashMap::from([
                ("T".to_string(), flag("OSVT")),
                ("C".to_string(), flag("OSVC")),
                ("B".to_string(), flag("OSVB")),
            ])),
        );
        primitives.insert(
            "OFSH".to_string(),
            PrimitiveEntry::Lookup(HashMap::from([
                ("L".to_string(), flag("OSHL")),
                ("C".to_string(), flag("OSHC")),
                ("R".to_string(), flag("OSHR")),
            ])),
        );

        Self {
            composites,
            primitives,
        }
    }
}

fn composite(sub_codes: &[&str], divider: Divider) -> CompositeEntry {
    CompositeEntry {
        sub_codes: sub_codes.iter().map(|s| s.to_string()).collect(),
        divider,
    }
}

fn flag(name: &str) -> PrimitiveValue {
    PrimitiveValue::Named {
        name: name.to_string(),
        value: "1".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_divider_splits_on_commas_and_quotes() {
        assert_eq!(
            Divider::Default.split("\"Arial\"0,22,B"),
            vec!["Arial", "0", "22", "B"]
        );
    }

    #[test]
    fn empty_divider_splits_characters() {
        assert_eq!(
            Divider::Literal(String::new()).split("CL"),
            vec!["C", "L"]
        );
        assert!(Divider::Literal(String::new()).split("").is_empty());
    }

    #[test]
    fn literal_divider_drops_empty_fragments() {
        assert_eq!(
            Divider::Literal("/".to_string()).split("/a//b/"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn multiline_entry_ignores_unknown_characters() {
        let tables = TranslationTables::standard();
        let style = tables.primitive("TFST").unwrap();
        let resolved = style.resolve("BXU");
        assert_eq!(resolved, vec![&flag("TFBD"), &flag("TFUL")]);
    }

    #[test]
    fn lookup_entry_matches_whole_value() {
        let tables = TranslationTables::standard();
        let vertical = tables.primitive("OFSV").unwrap();
        assert_eq!(vertical.resolve("C"), vec![&flag("OSVC")]);
        assert!(vertical.resolve("CC").is_empty());
    }

    #[test]
    fn standard_tables_have_no_composite_sub_code_cycles() {
        let tables = TranslationTables::standard();
        for (code, entry) in &tables.composites {
            assert!(!entry.sub_codes.contains(code), "{} expands into itself", code);
        }
    }
}

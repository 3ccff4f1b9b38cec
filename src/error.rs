// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for FIDS page decoding.
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
 * # `error` Module
 *
 * Failures inside the decoding pipeline are reported as [PageError]. At the
 * outer boundary ([crate::decode_page], [crate::source::load_page]) every
 * failure collapses into the single [DecodeOutcome::NoData] outcome.
 */

use thiserror::Error;

/// Errors raised while fetching or decoding a page definition.
#[derive(Error, Debug)]
pub enum PageError {
    /// No raw text is available for the requested page.
    #[error("page {0:?} not found")]
    NotFound(String),

    /// The raw page text contains nothing to decode.
    #[error("page text is empty")]
    Empty,

    /// The raw page text ends before the page settings line.
    #[error("page text has no page settings line")]
    MissingPageSettings,

    /// The translation tables did not settle within the pass ceiling.
    #[error("attribute expansion did not settle after {passes} passes")]
    ExpansionLimit { passes: usize },

    #[error("settings tokenizer error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The only non-success outcome visible at the decoding boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    #[error("no data")]
    NoData,
}

impl From<PageError> for DecodeOutcome {
    fn from(error: PageError) -> Self {
        log::warn!("page decode failed: {}", error);
        DecodeOutcome::NoData
    }
}

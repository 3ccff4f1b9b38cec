// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  decode.rs - FIDS page decoding demo.
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

use std::fs;

use clap::Parser;

use fidspage::page::PageDecoder;
use fidspage::settings::DEFAULT_MAX_EXPANSION_PASSES;
use fidspage::source::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The page definition file to read.
    #[arg(required_unless_present = "dir")]
    file: Option<String>,

    /// Directory holding `<page>.txt` page definitions.
    #[arg(long, requires = "page", conflicts_with = "file")]
    dir: Option<String>,

    /// Page number to load from `--dir`.
    #[arg(long)]
    page: Option<String>,

    /// Maximum number of attribute expansion passes.
    #[arg(long, default_value_t = DEFAULT_MAX_EXPANSION_PASSES)]
    max_passes: usize,

    /// Print single-line JSON.
    #[arg(long)]
    compact: bool,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let decoder = PageDecoder::default().with_max_expansion_passes(args.max_passes);

    let page = match (&args.file, &args.dir, &args.page) {
        (_, Some(dir), Some(page_number)) => {
            let source = DirectoryPageSource::new(dir);
            match load_page_with(&source, page_number, &decoder) {
                Ok(page) => page,
                Err(error) => {
                    eprintln!("Error loading page {:?} from {:?}: {}", page_number, dir, error);
                    return;
                }
            }
        }
        (Some(file), _, _) => {
            let raw = match fs::read_to_string(file) {
                Ok(raw) => raw,
                Err(error) => {
                    eprintln!("Error opening file {:?}: {:?}", file, error);
                    return;
                }
            };
            match decoder.decode(&raw) {
                Ok(page) => page,
                Err(error) => {
                    eprintln!("Error decoding file {:?}: {}", file, error);
                    return;
                }
            }
        }
        _ => {
            eprintln!("Either a file or --dir with --page is required");
            return;
        }
    };

    let json = if args.compact {
        serde_json::to_string(&page)
    } else {
        serde_json::to_string_pretty(&page)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(error) => eprintln!("Error serializing page: {:?}", error),
    }
}

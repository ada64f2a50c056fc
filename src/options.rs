//! Configuration options for hcommander.
//!
//! `CommanderOptions` configures the matching engine and, with the `cli` feature, doubles as
//! the command line parser of the `hcommander` binary.

use std::path::PathBuf;

use derive_builder::Builder;

use crate::PaletteEngine;
use crate::fuzzy_matcher::palette::{DEFAULT_MAX_CHOICE_LEN, DEFAULT_MAX_PATTERN_LEN};
use crate::item::{RankBuilder, RankCriteria};

/// Resolves `\t`, `\xNN` and friends in a delimiter argument
pub fn unescape_delimiter(s: &str) -> Result<char, String> {
    let unescaped = match s {
        r"\t" => '\t',
        r"\0" => '\0',
        r"\\" => '\\',
        _ if s.starts_with(r"\x") && s.len() == 4 => u8::from_str_radix(&s[2..], 16)
            .map(char::from)
            .map_err(|e| format!("Invalid hex delimiter {s}: {e}"))?,
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(format!("Delimiter must be a single character, got {s:?}")),
            }
        }
    };
    Ok(unescaped)
}

/// hcommander - command palette matcher
///
/// Reads candidates from stdin, one per line, name variants separated by the delimiter
/// (display label first), or from an action catalog, and prints those matching the query
/// best first.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "hcommander", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct CommanderOptions {
    //  --- Search ---
    /// Query to match candidates against
    ///
    /// Without it every candidate is printed, in input order.
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Search"))]
    pub filter: Option<String>,

    /// Comma-separated list of sort criteria
    ///
    /// * **score**: Score of the best variant
    /// * **begin**: Position of the first matched character
    /// * **length**: Length of the matched variant
    /// * **priority**: Changed parameters first
    /// * **index**: Input order
    ///
    ///     - Each criterion could be negated, e.g. (-index)
    ///     - The score always takes part; it goes first unless listed
    #[cfg_attr(
        feature = "cli",
        arg(
            short,
            long,
            default_value = "score",
            value_enum,
            value_delimiter = ',',
            help_heading = "Search",
            allow_hyphen_values = true,
            verbatim_doc_comment
        )
    )]
    pub tiebreak: Vec<RankCriteria>,

    /// Longest query, in characters, that can match anything
    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_MAX_PATTERN_LEN, help_heading = "Search"))]
    pub max_query_len: usize,

    /// Longest name variant, in characters, that can be matched
    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_MAX_CHOICE_LEN, help_heading = "Search"))]
    pub max_variant_len: usize,

    //  --- Input ---
    /// Delimiter between the name variants of an input line
    ///
    /// Escape sequences like \t and \x00 are supported.
    #[cfg_attr(
        feature = "cli",
        arg(short, long, default_value = r"\t", value_parser = unescape_delimiter, help_heading = "Input")
    )]
    pub delimiter: char,

    /// Read candidates from an action catalog (CSV) instead of stdin
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Input"))]
    pub actions: Option<PathBuf>,

    /// Comma-separated type names of the selected nodes, first selected first
    ///
    /// Decides which catalog actions are offered.
    #[cfg_attr(feature = "cli", arg(short, long, value_delimiter = ',', help_heading = "Input"))]
    pub selector: Vec<String>,

    //  --- Output ---
    /// Wrap matched characters in brackets
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Output"))]
    pub highlight: bool,

    /// Print the score before each result
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Output"))]
    pub print_score: bool,

    /// Print one RON record per result
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Output"))]
    pub ron: bool,
}

impl Default for CommanderOptions {
    fn default() -> Self {
        Self {
            filter: None,
            tiebreak: vec![RankCriteria::Score],
            max_query_len: DEFAULT_MAX_PATTERN_LEN,
            max_variant_len: DEFAULT_MAX_CHOICE_LEN,
            delimiter: '\t',
            actions: None,
            selector: Vec::new(),
            highlight: false,
            print_score: false,
            ron: false,
        }
    }
}

impl CommanderOptionsBuilder {
    /// Builds the CommanderOptions from the builder
    pub fn build(&mut self) -> Result<CommanderOptions, CommanderOptionsBuilderError> {
        self.final_build().map(|opts| opts.build())
    }
}

impl CommanderOptions {
    /// Finalizes the options
    pub fn build(mut self) -> Self {
        if self.filter.as_deref() == Some("") {
            self.filter = None;
        }
        self
    }

    /// The query, empty if none was given
    pub fn query(&self) -> &str {
        self.filter.as_deref().unwrap_or_default()
    }

    /// Rank builder for the configured tiebreak
    pub fn rank_builder(&self) -> RankBuilder {
        RankBuilder::new(self.tiebreak.clone())
    }

    /// Matching engine for the configured query and limits
    pub fn engine(&self) -> PaletteEngine {
        PaletteEngine::builder()
            .query(self.query())
            .max_query_len(self.max_query_len)
            .max_variant_len(self.max_variant_len)
            .build()
    }
}

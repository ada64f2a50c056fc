#[macro_use]
extern crate log;

use std::env;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use hcommander::highlight::wrap_matches;
use hcommander::prelude::*;
use serde::Serialize;

//------------------------------------------------------------------------------
fn main() {
    env_logger::builder().format_timestamp_nanos().init();

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            let broken_pipe = err
                .chain()
                .filter_map(|e| e.downcast_ref::<std::io::Error>())
                .any(|e| e.kind() == std::io::ErrorKind::BrokenPipe);
            if broken_pipe {
                std::process::exit(0)
            }
            eprintln!("hcommander: {err:?}");
            std::process::exit(2)
        }
    }
}

fn parse_args() -> CommanderOptions {
    let mut args = Vec::new();

    args.push(env::args().next().unwrap_or_else(|| String::from("hcommander")));
    args.extend(
        env::var("HCOMMANDER_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    for arg in env::args().skip(1) {
        args.push(arg);
    }

    CommanderOptions::parse_from(args)
}

fn real_main() -> Result<i32> {
    color_eyre::install()?;
    let opts = parse_args().build();
    debug!("options: {opts:?}");

    //------------------------------------------------------------------------------
    // read candidates from the catalog or from stdin
    let items = match &opts.actions {
        Some(path) => read_catalog(path, &opts.selector)?,
        None => read_lines(std::io::stdin().lock(), opts.delimiter)?,
    };
    let index = CandidateIndex::build(items);

    //------------------------------------------------------------------------------
    // filter & rank
    let engine = opts.engine();
    let ranked = engine.run(&index, &opts.rank_builder());

    //------------------------------------------------------------------------------
    // output
    let mut stdout = BufWriter::new(std::io::stdout().lock());
    for matched in ranked.iter() {
        write_result(&mut stdout, &opts, matched)?;
    }
    stdout.flush()?;

    Ok(if ranked.is_empty() { 1 } else { 0 })
}

fn read_catalog(path: &Path, selector: &[String]) -> Result<Vec<Arc<dyn PaletteItem>>> {
    let catalog = ActionCatalog::load(path).wrap_err_with(|| format!("loading actions from {}", path.display()))?;
    let selected: Vec<&str> = selector.iter().map(String::as_str).collect();
    Ok(catalog
        .find(&selected)
        .into_iter()
        .map(|action| Arc::new(Candidate::from(action.clone())) as Arc<dyn PaletteItem>)
        .collect())
}

/// One candidate per non-empty line, variants separated by `delimiter`
fn read_lines(source: impl BufRead, delimiter: char) -> Result<Vec<Arc<dyn PaletteItem>>> {
    let mut items: Vec<Arc<dyn PaletteItem>> = Vec::new();
    for line in source.lines() {
        let line = line.wrap_err("reading candidates")?;
        let variants: Vec<&str> = line.split(delimiter).filter(|v| !v.is_empty()).collect();
        let Some(id) = variants.first() else {
            continue;
        };
        items.push(Arc::new(Candidate::text(*id, variants.iter().copied())));
    }
    debug!("read {} candidates", items.len());
    Ok(items)
}

#[derive(Serialize)]
struct Record<'a> {
    id: &'a str,
    label: &'a str,
    which_match: usize,
    variant: &'a str,
    score: i64,
    alignment: &'a Alignment,
}

fn write_result(out: &mut impl Write, opts: &CommanderOptions, matched: &MatchedItem) -> Result<()> {
    let id = matched.item.id();
    let variants = matched.item.variants();
    let label = variants.first().map(|v| &**v).unwrap_or_default();
    let variant = variants.get(matched.which_match).map(|v| &**v).unwrap_or_default();

    if opts.ron {
        let record = Record {
            id: &id,
            label,
            which_match: matched.which_match,
            variant,
            score: matched.score,
            alignment: &matched.alignment,
        };
        writeln!(out, "{}", ron::to_string(&record)?)?;
        return Ok(());
    }

    if opts.print_score {
        write!(out, "{}\t", matched.score)?;
    }
    let shown = |text: &str| {
        if opts.highlight {
            wrap_matches(text, &matched.matched_indices())
        } else {
            text.to_string()
        }
    };
    if matched.which_match == 0 {
        writeln!(out, "{}", shown(label))?;
    } else {
        writeln!(out, "{} ({})", label, shown(variant))?;
    }
    Ok(())
}

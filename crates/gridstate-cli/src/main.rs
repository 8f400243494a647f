// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod script;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use gridstate_app::{PageId, RecordId};
use gridstate_controller::{ManualClock, PageController};
use gridstate_db::{SqliteCollection, Store};
use gridstate_testkit::{Fixture, demo_fixtures};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::Level;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `gridstate --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let mut log = config.log_config()?;
    if options.verbose {
        log = log.at_least(Level::DEBUG);
    }
    logging::init_logging(&log)?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or GRIDSTATE_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo {
        let seeded = seed_fixtures(&store, &demo_fixtures(), None)?;
        tracing::info!(records = seeded, "seeded demo data");
    }
    let debounce = config.debounce()?;
    if options.check_only {
        return Ok(());
    }

    let page_name = options
        .page
        .as_deref()
        .ok_or_else(|| anyhow!("--page is required; pages: {}", page_names()))?;
    let page = PageId::parse(page_name)
        .ok_or_else(|| anyhow!("unknown page {page_name:?}; pages: {}", page_names()))?;

    let store = Rc::new(store);
    let page_object = match options.scope {
        Some(id) => Some(
            store
                .get_record(id)?
                .ok_or_else(|| anyhow!("scope record {id} does not exist or was deleted"))?,
        ),
        None => None,
    };
    let backing = SqliteCollection::for_page(Rc::clone(&store), page, options.scope)?;

    let clock = ManualClock::new();
    let mut controller = PageController::mount_with_clock(
        page,
        Rc::new(backing),
        store,
        page_object,
        clock.clone(),
    )
    .with_debounce(debounce);

    if let Some(path) = &options.script {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read script {}", path.display()))?;
        let steps = script::parse_script(&raw)
            .with_context(|| format!("parse script {}", path.display()))?;
        let events = script::replay(&mut controller, &clock, steps);
        tracing::debug!(events, "script replayed");
    }
    // End of input counts as quiet time for a still-pending trailing action.
    controller.flush();

    let snapshot = serde_json::to_string_pretty(&controller.snapshot())
        .context("encode view snapshot")?;
    println!("{snapshot}");
    Ok(())
}

/// Insert a fixture forest, parents before children. Returns the number of
/// records written.
fn seed_fixtures(store: &Store, fixtures: &[Fixture], parent: Option<RecordId>) -> Result<usize> {
    let mut inserted = 0;
    for fixture in fixtures {
        let id = store
            .insert_record(fixture.kind, parent, &fixture.record)
            .with_context(|| format!("seed {} {}", fixture.kind, fixture.record.id))?;
        inserted += 1 + seed_fixtures(store, &fixture.children, Some(id))?;
    }
    Ok(inserted)
}

fn page_names() -> String {
    PageId::ALL
        .iter()
        .map(|page| page.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    page: Option<String>,
    scope: Option<RecordId>,
    script: Option<PathBuf>,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    verbose: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        page: None,
        scope: None,
        script: None,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        verbose: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--page" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--page requires a page name"))?;
                options.page = Some(value.as_ref().to_owned());
            }
            "--scope" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--scope requires a record id"))?;
                let raw = value.as_ref();
                let id: i64 = raw
                    .parse()
                    .with_context(|| format!("--scope expects a numeric record id, got {raw:?}"))?;
                if id <= 0 {
                    bail!("--scope expects a positive record id, got {id}");
                }
                options.scope = Some(RecordId::new(id));
            }
            "--script" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--script requires a file path"))?;
                options.script = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--verbose" | "-v" => {
                options.verbose = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("gridstate");
    println!("  --page <name>            Mount a page (for example customerInvoice)");
    println!("  --scope <id>             Record whose contents the page lists");
    println!("  --script <path>          Replay a JSON-lines action script");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Use seeded demo data (in-memory)");
    println!("  --check                  Validate config + DB, then exit");
    println!("  --verbose                Log at debug level or higher");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args, seed_fixtures};
    use anyhow::Result;
    use gridstate_app::{BackingCollection, PageId, RecordId, RecordStore};
    use gridstate_db::{SqliteCollection, Store};
    use gridstate_testkit::{Fixture, demo_fixtures};
    use std::path::PathBuf;
    use std::rc::Rc;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/gridstate-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                page: None,
                scope: None,
                script: None,
                print_config_path: false,
                print_db_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                verbose: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_page_scope_and_script() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--page",
                "stocktakeEditor",
                "--scope",
                "401",
                "--script",
                "count.jsonl",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.page.as_deref(), Some("stocktakeEditor"));
        assert_eq!(options.scope, Some(RecordId::new(401)));
        assert_eq!(options.script, Some(PathBuf::from("count.jsonl")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_bad_scope_ids() {
        for raw in ["abc", "0", "-4"] {
            let error = parse_cli_args(vec!["--scope", raw], default_options_path())
                .expect_err("bad scope should fail");
            assert!(error.to_string().contains("--scope expects"), "{raw}");
        }
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        for flag in ["--config", "--page", "--scope", "--script"] {
            let error = parse_cli_args(vec![flag], default_options_path())
                .expect_err("missing value should fail");
            assert!(error.to_string().contains("requires"), "{flag}");
        }
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--demo", "--print-path", "--check", "-v", "-h"],
            default_options_path(),
        )?;
        assert!(options.demo);
        assert!(options.print_db_path);
        assert!(options.check_only);
        assert!(options.verbose);
        assert!(options.show_help);
        assert!(!options.print_config_path);
        assert!(!options.print_example);
        Ok(())
    }

    #[test]
    fn demo_fixtures_seed_every_record_under_its_parent() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let fixtures = demo_fixtures();
        let seeded = seed_fixtures(&store, &fixtures, None)?;
        assert_eq!(seeded, fixtures.iter().map(Fixture::size).sum::<usize>());
        assert!(store.reasons_enabled());
        let indicators = store.indicators(RecordId::new(341));
        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0].rows.len(), 2);

        let store = Rc::new(store);
        let lines = SqliteCollection::for_page(
            Rc::clone(&store),
            PageId::StocktakeEditor,
            Some(RecordId::new(401)),
        )?;
        assert_eq!(lines.len(), 5);
        let batches = SqliteCollection::for_page(
            store,
            PageId::StocktakeBatchEditModal,
            Some(RecordId::new(411)),
        )?;
        assert_eq!(batches.len(), 2);
        Ok(())
    }
}

mod catalog;
mod config;
mod executor;
mod list;
mod model;
mod search;
mod sources;

use crate::catalog::AppCatalog;
use crate::config::{Config, load_config};
use crate::list::AppsList;
use crate::model::{AdapterItem, AppRecord};
use crate::search::AppSearcher;
use crate::sources::desktop::DesktopSource;
use crate::sources::history::{self, History};
use crate::sources::Source;
use anyhow::Result;
use calloop::EventLoop;
use clap::Parser;
use log::{debug, warn};
use std::thread;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search query; prints the recents row when omitted
    query: Option<String>,

    /// Apps per row, overriding the configured width
    #[arg(short, long)]
    columns: Option<usize>,

    /// Launch the top entry instead of printing the list
    #[arg(short, long)]
    launch: bool,
}

struct Drawer {
    config: Config,
    catalog: AppCatalog,
    history: History,
    list: AppsList,
    searcher: AppSearcher,
    query: Option<String>,
    launch: bool,
    should_exit: bool,
}

impl Drawer {
    /// Entry point for scanned records arriving off the worker thread:
    /// publish the catalog, rebuild, run the query if one was given, then
    /// render or launch.
    fn on_catalog_scanned(&mut self, records: Vec<AppRecord>) {
        let rules = self.config.rules.compile();
        let records: Vec<AppRecord> = records
            .into_iter()
            .filter(|record| rules.allows(record))
            .collect();
        self.catalog.set_records(records);
        self.list.on_apps_updated(&self.catalog, &mut self.history);

        if let Some(query) = self.query.clone() {
            let outcome = self.searcher.search(&query, &self.catalog);
            self.list
                .set_search_results(Some(outcome.apps), &self.catalog, &mut self.history);
            self.list
                .set_suggestions(Some(outcome.suggestions), &self.catalog, &mut self.history);
        }

        if self.launch {
            match self.list.filtered_apps().first() {
                Some(record) => {
                    if let Err(err) = executor::launch(record, &self.config, &mut self.history) {
                        warn!("launch failed: {:#}", err);
                    }
                }
                None => println!("nothing to launch"),
            }
        } else {
            print_items(self.list.items(), self.list.row_count());
        }
        self.should_exit = true;
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config()?;
    let columns = args.columns.unwrap_or(config.general.columns);
    let extra: Vec<AppRecord> = config.extra.iter().map(|entry| entry.to_record()).collect();

    let mut drawer = Drawer {
        config,
        catalog: AppCatalog::new(),
        history: history::load(),
        list: AppsList::new(columns),
        searcher: AppSearcher::new(),
        query: args.query.filter(|q| !q.is_empty()),
        launch: args.launch,
        should_exit: false,
    };
    drawer.list.set_change_listener(Box::new(|items, rows| {
        debug!("list updated: {} items across {} rows", items.len(), rows);
    }));

    // Scan on a worker thread, deliver into the event loop like any other
    // collaborator update.
    let mut event_loop: EventLoop<Drawer> = EventLoop::try_new()?;
    let (tx_records, rx_records) = calloop::channel::channel::<Vec<AppRecord>>();
    thread::spawn(move || {
        let mut records = extra;
        match DesktopSource.scan() {
            Ok(mut scanned) => records.append(&mut scanned),
            Err(err) => warn!("desktop scan failed: {:#}", err),
        }
        let _ = tx_records.send(records);
    });

    event_loop
        .handle()
        .insert_source(rx_records, move |event, _, drawer: &mut Drawer| {
            if let calloop::channel::Event::Msg(records) = event {
                drawer.on_catalog_scanned(records);
            }
        })
        .unwrap();

    loop {
        if drawer.should_exit {
            break;
        }
        event_loop.dispatch(None, &mut drawer)?;
    }

    if drawer.history.is_dirty() {
        if let Err(err) = history::save(&drawer.history) {
            warn!("failed to save history: {:#}", err);
        }
    }

    Ok(())
}

/// Minimal text rendering of the item sequence: app rows as produced by the
/// packing pass, divider-class items and suggestions one line each.
fn print_items(items: &[AdapterItem], row_count: usize) {
    let mut line: Vec<&str> = Vec::new();
    let mut current_row = None;
    for item in items {
        match item {
            AdapterItem::App { record, row, .. } => {
                if current_row != Some(*row) {
                    flush_row(&mut line);
                    current_row = Some(*row);
                }
                line.push(&record.name);
            }
            AdapterItem::SectionDivider { .. } => {
                flush_row(&mut line);
                println!("{}", "-".repeat(24));
            }
            AdapterItem::EmptySearch { .. } => {
                flush_row(&mut line);
                println!("no matching apps");
            }
            AdapterItem::MarketSearch { .. } => {
                flush_row(&mut line);
                println!("search for more apps...");
            }
            AdapterItem::Suggestion { query, .. } => {
                flush_row(&mut line);
                println!("did you mean: {}", query);
            }
        }
    }
    flush_row(&mut line);
    debug!("rendered {} rows", row_count);
}

fn flush_row(line: &mut Vec<&str>) {
    if !line.is_empty() {
        println!("  {}", line.join("  "));
        line.clear();
    }
}

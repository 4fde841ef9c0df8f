//! Run the stacking container demo headlessly and print the final layout.

use std::{io, path::PathBuf, thread, time::Duration};

use anyhow::{Result, anyhow};
use clap::Parser;
use stackscroll::{Host, dump, error};
use stackscroll_demo::{
    config::DemoConfig,
    screen::{DemoScreen, PAGE},
    web::load_page,
};
use tracing::Level;

/// CLI flags for the container demo.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// TOML file with demo and container settings.
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override viewport width.
    #[clap(long)]
    width: Option<f32>,

    /// Override viewport height.
    #[clap(long)]
    height: Option<f32>,

    /// Rows to insert into the top table.
    #[clap(long, default_value_t = 2)]
    top_inserts: usize,

    /// Rows to insert into the bottom table.
    #[clap(long, default_value_t = 1)]
    bottom_inserts: usize,

    /// Rows to delete from the bottom table.
    #[clap(long, default_value_t = 3)]
    bottom_deletes: usize,

    /// Print the full view tree, not just the entry table.
    #[clap(long)]
    tree: bool,

    /// Increase log verbosity.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Run the container demo.
fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut cfg = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }

    let mut host = Host::new(cfg.container.clone())?;
    let screen = DemoScreen::build(&mut host, &cfg)?;
    let tx = host.sender();
    let chunk_delay = Duration::from_millis(cfg.chunk_delay_ms);
    let settle = cfg.container.settle_delay();

    let page = load_page(
        tx.clone(),
        screen.web,
        PAGE.iter().map(|p| p.to_string()).collect(),
        chunk_delay,
    );
    let [mut top, mut bottom] = screen.controllers(&tx, cfg.initial_rows);
    let edits = thread::spawn(move || -> error::Result<()> {
        for _ in 0..args.top_inserts {
            thread::sleep(chunk_delay);
            top.insert()?;
        }
        for _ in 0..args.bottom_inserts {
            thread::sleep(chunk_delay);
            bottom.insert()?;
        }
        for _ in 0..args.bottom_deletes {
            thread::sleep(chunk_delay);
            bottom.delete(0)?;
        }
        Ok(())
    });
    let director = thread::spawn(move || -> error::Result<()> {
        for handle in [page, edits] {
            handle
                .join()
                .map_err(|_| error::Error::Internal("producer panicked".into()))??;
        }
        // Let the last changes settle before stopping.
        thread::sleep(settle * 2);
        tx.shutdown()
    });

    host.run()?;
    director
        .join()
        .map_err(|_| anyhow!("director thread panicked"))??;
    host.run_until_idle(settle * 10)?;

    if args.tree {
        println!("{}", dump::dump(host.core(), host.container().root())?);
    }
    println!("{}", dump::layout_table(host.core(), host.container()));
    Ok(())
}

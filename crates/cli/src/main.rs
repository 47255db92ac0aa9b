//! `optistock-count`: run one physical inventory count over the sample catalog.
//!
//! Counts are read from stdin, one `<item id>=<quantity>` per line (blank
//! lines and `#` comments are skipped). At end of input the session is
//! validated and the resulting notice is printed. `--json` prints the full
//! report instead.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;

use optistock_core::ItemId;
use optistock_infra::{
    seed_sample_catalog, CountConfig, CountReport, InMemoryStockCatalog, InventoryCountService,
    StockCatalog,
};
use optistock_inventory::{format_signed, CountSession, StockLevel};

#[derive(Debug, Parser)]
#[command(name = "optistock-count", about = "Run a physical inventory count over the sample catalog")]
#[command(version)]
struct Args {
    /// Print the full count report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_entry(line: &str) -> anyhow::Result<Option<(ItemId, &str)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (id, quantity) = line
        .split_once('=')
        .with_context(|| format!("expected <item id>=<quantity>, got {line:?}"))?;
    let id: ItemId = id.parse()?;
    Ok(Some((id, quantity.trim())))
}

fn print_lines(out: &mut impl Write, session: &CountSession) -> io::Result<()> {
    for line in session.lines() {
        writeln!(
            out,
            "{:>3}  {:<32} {:<10} système {:>4}  compté {:>4}  {}",
            line.id(),
            line.name(),
            line.reference(),
            line.system_stock(),
            line.counted_stock(),
            line.status(),
        )?;
    }
    writeln!(out, "Écart total: {}", format_signed(session.aggregate_variance()))
}

fn print_report(out: &mut impl Write, report: &CountReport) -> io::Result<()> {
    writeln!(out, "{}", report.notice)?;
    for diff in report.differences() {
        writeln!(
            out,
            "  {} {}: {} -> {} ({})",
            diff.reference,
            diff.name,
            diff.system_stock,
            diff.counted_stock,
            format_signed(diff.variance)
        )?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    optistock_observability::init();
    let args = Args::parse();

    let config = CountConfig::from_env();
    let catalog = InMemoryStockCatalog::new();
    seed_sample_catalog(&catalog)?;
    let service = InventoryCountService::new(catalog, config);

    let mut session = service.start_session()?;

    let stdin = io::stdin();
    for (n, line) in stdin.lock().lines().enumerate() {
        let line = line.context("reading counts from stdin")?;
        let Some((id, quantity)) = parse_entry(&line).with_context(|| format!("line {}", n + 1))? else {
            continue;
        };
        if !service.record_count(&mut session, id, quantity)? {
            tracing::warn!(%id, "no such item in the count; entry skipped");
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !args.json {
        print_lines(&mut out, &session)?;
    }

    let report = service.commit(&mut session)?;

    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        print_report(&mut out, &report)?;
        for item in service.catalog().list()? {
            let level = StockLevel::of(&item);
            if level.needs_restock() {
                writeln!(out, "  réassort: {} ({})", item.name, level.label())?;
            }
        }
    }

    if !report.outcome.is_committed() {
        std::process::exit(2);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        assert!(!Args::try_parse_from(["optistock-count"]).unwrap().json);
        assert!(Args::try_parse_from(["optistock-count", "--json"]).unwrap().json);
        assert!(Args::try_parse_from(["optistock-count", "--csv"]).is_err());
    }

    #[test]
    fn parses_count_entries() {
        assert_eq!(parse_entry("  # comment").unwrap(), None);
        assert_eq!(parse_entry("").unwrap(), None);
        assert_eq!(parse_entry("2 = 5").unwrap(), Some((ItemId::new(2), "5")));
        assert!(parse_entry("2:5").is_err());
        assert!(parse_entry("RB3025=5").is_err());
    }
}

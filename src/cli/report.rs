use anyhow::Result;
use clap::Parser;

use crate::{
    storage::RecordStore,
    tracker::{
        browser::{DateRange, RecordBrowser},
        entities::YearMonth,
        Tracker,
    },
};

use super::{
    dates::{parse_day, DateStyle},
    output::{render_page, render_stats},
};

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(long, short, help = "Month in YYYY-MM form. Defaults to the current month")]
    month: Option<YearMonth>,
}

#[derive(Debug, Parser)]
pub struct RecordsCommand {
    #[arg(long = "from", short = 'f', help = "Earliest day to include")]
    start_date: Option<String>,
    #[arg(long = "to", short = 't', help = "Latest day to include")]
    end_date: Option<String>,
    #[arg(long, short, default_value_t = 1, help = "Page to show, 10 records per page")]
    page: usize,
}

pub fn process_report_command<S: RecordStore>(
    ReportCommand { month }: ReportCommand,
    tracker: &Tracker<S>,
) -> Result<()> {
    let month = month.unwrap_or_else(|| YearMonth::of(tracker.today()));
    print!("{}", render_stats(&tracker.monthly_stats(month)));
    Ok(())
}

pub fn process_records_command<S: RecordStore>(
    RecordsCommand {
        start_date,
        end_date,
        page,
    }: RecordsCommand,
    tracker: &Tracker<S>,
    date_style: DateStyle,
) -> Result<()> {
    let start = start_date
        .map(|v| parse_day(&v, date_style))
        .transpose()?;
    let end = end_date.map(|v| parse_day(&v, date_style)).transpose()?;

    let mut browser = RecordBrowser::new();
    browser.apply_filter(DateRange::new(start, end));
    browser.go_to(page, tracker.meals());

    if !browser.range().is_unbounded() {
        println!("Filter: {}\n", browser.range());
    }
    print!("{}", render_page(&browser.view(tracker.meals())));
    Ok(())
}

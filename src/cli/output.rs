//! Plain text rendering of tracker data for the terminal.

use std::fmt::Write;

use ansi_term::{Colour, Style};
use chrono::NaiveDate;

use crate::{
    tracker::{
        browser::{PageMarker, PageView},
        entities::{MealRecord, MealSlot, PaymentRecord},
        report::MonthlyStats,
    },
    utils::time::long_date,
};

const BAR_WIDTH: usize = 30;

pub fn format_money(value: f64) -> String {
    format!("₹{value:.2}")
}

fn meal_mark(eaten: bool) -> String {
    if eaten {
        Colour::Green.paint("✔").to_string()
    } else {
        Colour::Red.paint("✘").to_string()
    }
}

pub fn render_day(date: NaiveDate, record: &MealRecord) -> String {
    let mut out = format!("{}\n", long_date(date));
    for slot in MealSlot::ALL {
        let _ = writeln!(out, "  {} {slot}", meal_mark(record.get(slot)));
    }
    out
}

/// One line per day, used by the record browser.
fn render_record_line(date: NaiveDate, record: &MealRecord) -> String {
    let slots = MealSlot::ALL
        .iter()
        .map(|slot| format!("{} {}", meal_mark(record.get(*slot)), slot))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{date}  {slots}  ({}/3)", record.meal_count())
}

pub fn render_markers(markers: &[PageMarker], current: usize) -> String {
    markers
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(page) if *page == current => {
                Style::new().bold().paint(format!("[{page}]")).to_string()
            }
            PageMarker::Page(page) => page.to_string(),
            PageMarker::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_page(view: &PageView) -> String {
    let Some((first, last)) = view.bounds() else {
        return "No records found\n".to_string();
    };
    let mut out = String::new();
    for (date, record) in &view.entries {
        let _ = writeln!(out, "{}", render_record_line(*date, record));
    }
    if view.total_pages > 1 {
        let _ = writeln!(
            out,
            "\nShowing {first} to {last} of {} records",
            view.total
        );
        let _ = writeln!(out, "{}", render_markers(&view.markers(), view.page));
    }
    out
}

pub fn render_payment(date: NaiveDate, payment: &PaymentRecord) -> String {
    let mut line = format!("{}\t{}", date.format("%b %-d, %Y"), format_money(*payment.amount));
    if let Some(note) = &payment.note {
        line.push('\t');
        line.push_str(note);
    }
    line
}

pub fn render_stats(stats: &MonthlyStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Report for {}", stats.month);
    let _ = writeln!(out, "  Days recorded      {}", stats.total_days);
    let _ = writeln!(out, "  Total meals        {}", stats.total_meals);
    let _ = writeln!(out, "  Total paid         {}", format_money(stats.total_payments));
    let _ = writeln!(out, "  Payments           {}", stats.payment_count);
    let _ = writeln!(out, "  Cost per meal      {}", format_money(stats.cost_per_meal));
    let _ = writeln!(out, "  Meals per day      {:.1}", stats.avg_meals_per_day);
    let _ = writeln!(out, "  Avg daily cost     {}", format_money(stats.avg_daily_cost));
    let _ = writeln!(out, "  Most common meal   {}", stats.most_common_meal);
    let _ = writeln!(out, "\nMeal breakdown");
    for share in stats.breakdown() {
        let filled = (*share.share / 100. * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {:<10}{:>4}  {}{} {:>4}",
            share.slot.title(),
            share.count,
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH - filled),
            share.share.to_string()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::tracker::{
        browser::{PageMarker, RecordBrowser},
        entities::{Amount, MealRecord, MealRecords, PaymentRecord, PaymentRecords},
        report::monthly_stats,
    };

    use super::{format_money, render_markers, render_page, render_payment, render_stats};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(37.5), "₹37.50");
        assert_eq!(format_money(0.), "₹0.00");
    }

    #[test]
    fn test_render_payment() {
        let payment = PaymentRecord::new(
            Amount::new_opt(100.).unwrap(),
            Some("week 1".into()),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        );
        assert_eq!(render_payment(date(1), &payment), "Jun 1, 2024\t₹100.00\tweek 1");
    }

    #[test]
    fn test_render_markers() {
        let markers = [
            PageMarker::Page(1),
            PageMarker::Ellipsis,
            PageMarker::Page(3),
        ];
        let rendered = render_markers(&markers, 1);
        assert!(rendered.contains("[1]"));
        assert!(rendered.ends_with("… 3"));
    }

    #[test]
    fn test_render_page() {
        let records = (1..=12)
            .map(|d| (date(d), MealRecord::default()))
            .collect::<MealRecords>();
        let mut browser = RecordBrowser::new();
        browser.go_to(2, &records);

        let rendered = render_page(&browser.view(&records));
        assert!(rendered.starts_with("2024-06-02"));
        assert!(rendered.contains("Showing 11 to 12 of 12 records"));
        assert_eq!(
            render_page(&RecordBrowser::new().view(&MealRecords::new())),
            "No records found\n"
        );
    }

    #[test]
    fn test_render_stats() {
        let meals = MealRecords::from([(
            date(1),
            MealRecord {
                breakfast: true,
                lunch: true,
                dinner: false,
            },
        )]);
        let payments = PaymentRecords::from([(
            date(1),
            PaymentRecord::new(
                Amount::new_opt(90.).unwrap(),
                None,
                Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            ),
        )]);
        let rendered = render_stats(&monthly_stats(&meals, &payments, "2024-06".parse().unwrap()));

        assert!(rendered.starts_with("Report for 2024-06"));
        assert!(rendered.contains("Cost per meal      ₹45.00"));
        assert!(rendered.contains("Most common meal   Breakfast"));
    }
}

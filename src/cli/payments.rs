use anyhow::Result;
use clap::Parser;

use crate::{storage::RecordStore, tracker::Tracker, utils::time::long_date};

use super::{
    confirm::confirm,
    dates::{parse_day, parse_past_day, DateStyle},
    output::{format_money, render_payment},
};

#[derive(Debug, Parser)]
pub struct PayCommand {
    #[arg(allow_hyphen_values = true, help = "Amount paid. Has to be greater than zero")]
    amount: String,
    #[arg(long, short, help = "Day of the payment. Defaults to today, can't be in the future")]
    date: Option<String>,
    #[arg(long, short, help = "Free text note, e.g. \"Monthly mess bill\"")]
    note: Option<String>,
}

#[derive(Debug, Parser)]
pub struct DeletePaymentCommand {
    #[arg(help = "Day of the payment to remove")]
    date: String,
    #[arg(long, short, help = "Skip the confirmation prompt")]
    yes: bool,
}

pub async fn process_pay_command<S: RecordStore>(
    PayCommand { amount, date, note }: PayCommand,
    tracker: &mut Tracker<S>,
    date_style: DateStyle,
) -> Result<()> {
    let date = parse_past_day(date.as_deref(), date_style, tracker.today())?;
    let payment = tracker.add_payment(date, &amount, note).await?;
    println!("Payment of {} added!", format_money(*payment.amount));
    Ok(())
}

pub fn process_payments_command<S: RecordStore>(tracker: &Tracker<S>) -> Result<()> {
    if tracker.payments().is_empty() {
        println!("No payments recorded yet");
        return Ok(());
    }
    for (date, payment) in tracker.payments_newest_first() {
        println!("{}", render_payment(*date, payment));
    }
    println!("\nTotal paid: {}", format_money(tracker.total_paid()));
    Ok(())
}

pub async fn process_delete_payment_command<S: RecordStore>(
    DeletePaymentCommand { date, yes }: DeletePaymentCommand,
    tracker: &mut Tracker<S>,
    date_style: DateStyle,
) -> Result<()> {
    let date = parse_day(&date, date_style)?;
    let Some(payment) = tracker.payments().get(&date) else {
        println!("No payment on {}", long_date(date));
        return Ok(());
    };
    let prompt = format!(
        "Are you sure you want to delete the payment of {} made on {}? This action cannot be undone.",
        format_money(*payment.amount),
        long_date(date)
    );
    if !yes && !confirm(&prompt)? {
        println!("Cancelled");
        return Ok(());
    }
    tracker.delete_payment(date).await?;
    println!("Payment deleted successfully!");
    Ok(())
}

use anyhow::Result;
use clap::Parser;

use crate::{
    storage::RecordStore,
    tracker::{entities::MealSlot, Tracker},
    utils::time::long_date,
};

use super::{
    confirm::confirm,
    dates::{parse_day, parse_past_day, DateStyle},
    output::render_day,
};

#[derive(Debug, Parser)]
pub struct ShowCommand {
    #[arg(long, short, help = "Day to show. Defaults to today")]
    date: Option<String>,
}

#[derive(Debug, Parser)]
pub struct ToggleCommand {
    #[arg(value_enum, help = "Meal to mark or unmark")]
    slot: MealSlot,
    #[arg(long, short, help = "Day of the meal. Defaults to today, can't be in the future")]
    date: Option<String>,
}

#[derive(Debug, Parser)]
pub struct DeleteDayCommand {
    #[arg(help = "Day whose meal record is removed")]
    date: String,
    #[arg(long, short, help = "Skip the confirmation prompt")]
    yes: bool,
}

pub fn process_show_command<S: RecordStore>(
    ShowCommand { date }: ShowCommand,
    tracker: &Tracker<S>,
    date_style: DateStyle,
) -> Result<()> {
    let date = parse_past_day(date.as_deref(), date_style, tracker.today())?;
    print!("{}", render_day(date, &tracker.meal_for(date)));
    Ok(())
}

pub async fn process_toggle_command<S: RecordStore>(
    ToggleCommand { slot, date }: ToggleCommand,
    tracker: &mut Tracker<S>,
    date_style: DateStyle,
) -> Result<()> {
    let date = parse_past_day(date.as_deref(), date_style, tracker.today())?;
    if tracker.toggle_meal(date, slot).await? {
        println!("{slot} marked as consumed!");
    } else {
        println!("{slot} unmarked");
    }
    Ok(())
}

pub async fn process_delete_day_command<S: RecordStore>(
    DeleteDayCommand { date, yes }: DeleteDayCommand,
    tracker: &mut Tracker<S>,
    date_style: DateStyle,
) -> Result<()> {
    let date = parse_day(&date, date_style)?;
    let day = long_date(date);
    if !tracker.meals().contains_key(&date) {
        println!("No meal record for {day}");
        return Ok(());
    }
    let prompt = format!(
        "Are you sure you want to delete all meal records for {day}? This action cannot be undone."
    );
    if !yes && !confirm(&prompt)? {
        println!("Cancelled");
        return Ok(());
    }
    tracker.delete_meal(date).await?;
    println!("Record for {day} deleted successfully!");
    Ok(())
}

//! The tracker owns meal and payment records for the whole session.
//!
//! Records are loaded once through a [RecordStore]. Every change is made on a copy of the mapping,
//! written to the store and only then kept, so a failed write leaves memory as it was.

pub mod browser;
pub mod entities;
pub mod error;
pub mod exchange;
pub mod report;

use chrono::NaiveDate;
use entities::{
    Amount, MealRecord, MealRecords, MealSlot, PaymentRecord, PaymentRecords, YearMonth,
};
use error::TrackerError;
use exchange::ParsedImport;
use report::MonthlyStats;
use tracing::{debug, info, instrument, warn};

use crate::{storage::RecordStore, utils::clock::Clock};

/// Counts reported back after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub meals: usize,
    pub payments: usize,
}

pub struct Tracker<S: RecordStore> {
    store: S,
    clock: Box<dyn Clock>,
    meals: MealRecords,
    payments: PaymentRecords,
}

impl<S: RecordStore> Tracker<S> {
    /// Reads both slots. Slots that were never written start empty.
    pub async fn load(store: S, clock: Box<dyn Clock>) -> Result<Self, TrackerError> {
        let meals = store.load_meals().await?;
        let payments = store.load_payments().await?;
        info!(
            "Loaded {} meal records and {} payments",
            meals.len(),
            payments.len()
        );
        Ok(Self {
            store,
            clock,
            meals,
            payments,
        })
    }

    pub fn meals(&self) -> &MealRecords {
        &self.meals
    }

    pub fn payments(&self) -> &PaymentRecords {
        &self.payments
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Record for a day, or the all-false record if nothing was eaten.
    pub fn meal_for(&self, date: NaiveDate) -> MealRecord {
        self.meals.get(&date).copied().unwrap_or_default()
    }

    /// Flips one slot of a day and returns its new value. The day is created if missing.
    #[instrument(skip(self))]
    pub async fn toggle_meal(
        &mut self,
        date: NaiveDate,
        slot: MealSlot,
    ) -> Result<bool, TrackerError> {
        let mut meals = self.meals.clone();
        let value = meals.entry(date).or_default().toggle(slot);
        self.commit_meals(meals).await?;
        info!("{slot} on {date} is now {value}");
        Ok(value)
    }

    /// Removes all meals of a day. Returns `false` if there was nothing to remove.
    #[instrument(skip(self))]
    pub async fn delete_meal(&mut self, date: NaiveDate) -> Result<bool, TrackerError> {
        let mut meals = self.meals.clone();
        if meals.remove(&date).is_none() {
            debug!("No meal record for {date}");
            return Ok(false);
        }
        self.commit_meals(meals).await?;
        Ok(true)
    }

    /// Adds the payment for a day, replacing a previous one. `amount` has to be a number above
    /// zero, otherwise nothing changes.
    #[instrument(skip(self))]
    pub async fn add_payment(
        &mut self,
        date: NaiveDate,
        amount: &str,
        note: Option<String>,
    ) -> Result<&PaymentRecord, TrackerError> {
        let amount = amount.parse::<Amount>()?;
        let payment = PaymentRecord::new(amount, note, self.clock.time());
        let mut payments = self.payments.clone();
        if let Some(previous) = payments.insert(date, payment) {
            debug!("Replacing payment {previous:?}");
        }
        self.commit_payments(payments).await?;
        info!("Added payment of {amount} on {date}");
        Ok(&self.payments[&date])
    }

    #[instrument(skip(self))]
    pub async fn delete_payment(&mut self, date: NaiveDate) -> Result<bool, TrackerError> {
        let mut payments = self.payments.clone();
        if payments.remove(&date).is_none() {
            debug!("No payment for {date}");
            return Ok(false);
        }
        self.commit_payments(payments).await?;
        Ok(true)
    }

    /// Payment history, latest first.
    pub fn payments_newest_first(&self) -> impl Iterator<Item = (&NaiveDate, &PaymentRecord)> {
        self.payments.iter().rev()
    }

    pub fn total_paid(&self) -> f64 {
        report::total_paid(&self.payments)
    }

    pub fn monthly_stats(&self, month: YearMonth) -> MonthlyStats {
        report::monthly_stats(&self.meals, &self.payments, month)
    }

    pub fn export_csv(&self) -> String {
        exchange::export_csv(&self.meals, &self.payments)
    }

    /// Parses the whole text first and only then merges it. A malformed file leaves every record
    /// untouched.
    #[instrument(skip_all)]
    pub async fn import_csv(&mut self, text: &str) -> Result<ImportSummary, TrackerError> {
        let ParsedImport { meals, payments } = exchange::parse_csv(text, self.clock.time())?;
        let summary = ImportSummary {
            meals: meals.len(),
            payments: payments.len(),
        };

        let mut merged_meals = self.meals.clone();
        merged_meals.extend(meals);
        let mut merged_payments = self.payments.clone();
        merged_payments.extend(payments);

        self.store.save_meals(&merged_meals).await?;
        if let Err(e) = self.store.save_payments(&merged_payments).await {
            // Put the meal slot back so both slots keep describing the same data.
            if let Err(restore) = self.store.save_meals(&self.meals).await {
                warn!("Failed to restore meal records after a failed import: {restore}");
            }
            return Err(e.into());
        }
        self.meals = merged_meals;
        self.payments = merged_payments;

        info!(
            "Imported {} meal records and {} payments",
            summary.meals, summary.payments
        );
        Ok(summary)
    }

    async fn commit_meals(&mut self, meals: MealRecords) -> Result<(), TrackerError> {
        self.store.save_meals(&meals).await?;
        self.meals = meals;
        Ok(())
    }

    async fn commit_payments(&mut self, payments: PaymentRecords) -> Result<(), TrackerError> {
        self.store.save_payments(&payments).await?;
        self.payments = payments;
        Ok(())
    }
}

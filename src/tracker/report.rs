use crate::utils::{
    percentage::{count_percentage, Percentage},
    time::round_to,
};

use super::entities::{MealRecords, MealSlot, PaymentRecords, YearMonth};

/// Statistics for a single month. Averages are already rounded the way they are displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    pub month: YearMonth,
    /// Days that have a meal record, regardless of how many meals were eaten.
    pub total_days: u32,
    pub breakfast: u32,
    pub lunch: u32,
    pub dinner: u32,
    pub total_meals: u32,
    pub avg_meals_per_day: f64,
    pub total_payments: f64,
    pub payment_count: u32,
    pub cost_per_meal: f64,
    pub most_common_meal: MealSlot,
    pub avg_daily_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotShare {
    pub slot: MealSlot,
    pub count: u32,
    /// Relative to the most eaten slot of the month.
    pub share: Percentage,
}

impl MonthlyStats {
    pub fn count(&self, slot: MealSlot) -> u32 {
        match slot {
            MealSlot::Breakfast => self.breakfast,
            MealSlot::Lunch => self.lunch,
            MealSlot::Dinner => self.dinner,
        }
    }

    /// Per slot bars of the meal breakdown.
    pub fn breakdown(&self) -> Vec<SlotShare> {
        let max = self.breakfast.max(self.lunch).max(self.dinner);
        MealSlot::ALL
            .into_iter()
            .map(|slot| SlotShare {
                slot,
                count: self.count(slot),
                share: count_percentage(self.count(slot), max),
            })
            .collect()
    }
}

pub fn monthly_stats(
    meals: &MealRecords,
    payments: &PaymentRecords,
    month: YearMonth,
) -> MonthlyStats {
    let mut total_days = 0;
    let (mut breakfast, mut lunch, mut dinner) = (0, 0, 0);
    for (_, record) in meals.iter().filter(|(date, _)| month.contains(date)) {
        total_days += 1;
        breakfast += record.breakfast as u32;
        lunch += record.lunch as u32;
        dinner += record.dinner as u32;
    }

    let (total_payments, payment_count) = payments
        .iter()
        .filter(|(date, _)| month.contains(date))
        .fold((0., 0), |(sum, count), (_, payment)| {
            (sum + *payment.amount, count + 1)
        });

    let total_meals = breakfast + lunch + dinner;

    MonthlyStats {
        month,
        total_days,
        breakfast,
        lunch,
        dinner,
        total_meals,
        avg_meals_per_day: ratio(total_meals as f64, total_days, 1),
        total_payments,
        payment_count,
        cost_per_meal: ratio(total_payments, total_meals, 2),
        most_common_meal: most_common(breakfast, lunch, dinner),
        avg_daily_cost: ratio(total_payments, total_days, 2),
    }
}

fn ratio(value: f64, whole: u32, decimals: i32) -> f64 {
    if whole == 0 {
        0.
    } else {
        round_to(value / whole as f64, decimals)
    }
}

/// Ties go to the earlier meal of the day.
fn most_common(breakfast: u32, lunch: u32, dinner: u32) -> MealSlot {
    if breakfast >= lunch && breakfast >= dinner {
        MealSlot::Breakfast
    } else if lunch >= dinner {
        MealSlot::Lunch
    } else {
        MealSlot::Dinner
    }
}

/// Everything ever paid, independent of month.
pub fn total_paid(payments: &PaymentRecords) -> f64 {
    payments.values().map(|payment| *payment.amount).sum()
}

use std::{future::Future, ops::Deref, path::PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::{
    fs::operations::{overwrite_locked, read_locked},
    tracker::entities::{MealRecords, PaymentRecords},
};

use super::StoreError;

pub const MEAL_SLOT: &str = "mess-records";
pub const PAYMENT_SLOT: &str = "mess-payments";

/// Interface for abstracting storage of records. Each mapping lives in its own slot and is always
/// written as a whole.
pub trait RecordStore {
    /// Loads meal records. A slot that was never written is an empty mapping.
    fn load_meals(&self) -> impl Future<Output = Result<MealRecords, StoreError>>;

    fn load_payments(&self) -> impl Future<Output = Result<PaymentRecords, StoreError>>;

    fn save_meals(&self, meals: &MealRecords) -> impl Future<Output = Result<(), StoreError>>;

    fn save_payments(
        &self,
        payments: &PaymentRecords,
    ) -> impl Future<Output = Result<(), StoreError>>;
}

impl<T: Deref> RecordStore for T
where
    T::Target: RecordStore,
{
    fn load_meals(&self) -> impl Future<Output = Result<MealRecords, StoreError>> {
        self.deref().load_meals()
    }

    fn load_payments(&self) -> impl Future<Output = Result<PaymentRecords, StoreError>> {
        self.deref().load_payments()
    }

    fn save_meals(&self, meals: &MealRecords) -> impl Future<Output = Result<(), StoreError>> {
        self.deref().save_meals(meals)
    }

    fn save_payments(
        &self,
        payments: &PaymentRecords,
    ) -> impl Future<Output = Result<(), StoreError>> {
        self.deref().save_payments(payments)
    }
}

/// The main realization of [RecordStore]. Slots are `<slot>.json` files in a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    async fn read_slot<V: DeserializeOwned + Default>(
        &self,
        slot: &'static str,
    ) -> Result<V, StoreError> {
        let path = self.slot_path(slot);
        let contents = read_locked(&path)
            .await
            .map_err(|source| StoreError::Io { slot, source })?;
        match contents {
            Some(contents) if !contents.trim().is_empty() => {
                debug!("Loading slot {slot} from {path:?}");
                serde_json::from_str(&contents).map_err(|source| StoreError::Json { slot, source })
            }
            _ => Ok(V::default()),
        }
    }

    async fn write_slot<V: Serialize>(
        &self,
        slot: &'static str,
        value: &V,
    ) -> Result<(), StoreError> {
        let buffer =
            serde_json::to_vec(value).map_err(|source| StoreError::Json { slot, source })?;
        overwrite_locked(&self.slot_path(slot), &buffer)
            .await
            .map_err(|source| StoreError::Io { slot, source })?;
        info!("Stored slot {slot} ({} bytes)", buffer.len());
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    async fn load_meals(&self) -> Result<MealRecords, StoreError> {
        self.read_slot(MEAL_SLOT).await
    }

    async fn load_payments(&self) -> Result<PaymentRecords, StoreError> {
        self.read_slot(PAYMENT_SLOT).await
    }

    async fn save_meals(&self, meals: &MealRecords) -> Result<(), StoreError> {
        self.write_slot(MEAL_SLOT, meals).await
    }

    async fn save_payments(&self, payments: &PaymentRecords) -> Result<(), StoreError> {
        self.write_slot(PAYMENT_SLOT, payments).await
    }
}

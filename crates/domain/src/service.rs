use chrono::NaiveDate;
use log::{debug, error};

use crate::{
    Catalog, CatalogLoadError, CatalogRepository, CatalogService, CreateError, PlanService,
    ReadError, ScheduleEntry, ScheduleEntryID, ScheduleRepository, ScheduleService, Settings,
    SettingsRepository, SettingsService, StorageError, UpdateError, WorkoutPlan,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: CatalogRepository> CatalogService for Service<R> {
    async fn load_catalog(&self) -> Result<Catalog, CatalogLoadError> {
        let result = match self.repository.read_catalog().await {
            Ok(records) => Catalog::load(records),
            Err(err) => Err(err),
        };
        match result {
            Ok(ref catalog) => debug!("loaded catalog with {} exercises", catalog.len()),
            Err(CatalogLoadError::Unavailable(ReadError::Storage(StorageError::NoConnection))) => {
                debug!("failed to load catalog: no connection");
            }
            Err(ref err) => error!("failed to load catalog: {err}"),
        }
        result
    }
}

impl<R: ScheduleRepository> ScheduleService for Service<R> {
    async fn get_schedule(&self) -> Result<Vec<ScheduleEntry>, ReadError> {
        log_on_error!(
            self.repository.read_schedule(),
            ReadError,
            "get",
            "schedule"
        )
    }

    async fn schedule_workout(
        &self,
        date: NaiveDate,
        plan: &WorkoutPlan,
    ) -> Result<ScheduleEntry, CreateError> {
        log_on_error!(
            self.repository
                .append_schedule_entry(ScheduleEntry::planned(date, plan)),
            CreateError,
            "schedule",
            "workout"
        )
    }

    async fn complete_workout(&self, id: ScheduleEntryID) -> Result<ScheduleEntry, UpdateError> {
        log_on_error!(
            self.repository.complete_schedule_entry(id),
            UpdateError,
            "complete",
            "workout"
        )
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    async fn get_settings(&self) -> Result<Settings, ReadError> {
        log_on_error!(
            self.repository.read_settings(),
            ReadError,
            "get",
            "settings"
        )
    }

    async fn set_settings(&self, settings: Settings) -> Result<Settings, UpdateError> {
        if let Err(err) = settings.validate() {
            error!("failed to set settings: {err}");
            return Err(UpdateError::Other(Box::new(err)));
        }
        log_on_error!(
            self.repository.write_settings(settings),
            UpdateError,
            "set",
            "settings"
        )
    }
}

impl<R: ScheduleRepository + SettingsRepository> PlanService for Service<R> {}

use cabin_domain::Settings;
use tracing::warn;

use crate::{
    service::{DataService, Table},
    ServiceError,
};

/// Supplies booking policy constants from the settings singleton.
pub struct SettingsProvider;

impl SettingsProvider {
    /// Loads the policy record, rejecting one that cannot price a booking.
    pub fn load(service: &dyn DataService) -> Result<Settings, ServiceError> {
        let settings = service.settings()?;
        let issues = settings.issues();
        if let Some(issue) = issues.first() {
            warn!(%issue, count = issues.len(), "settings record rejected");
            return Err(ServiceError::InvalidRecord {
                table: Table::Settings,
                reason: issue.to_string(),
            });
        }
        Ok(settings)
    }
}

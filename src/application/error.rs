// Errors surfaced by the dashboard use cases
use crate::domain::time_axis::WindowError;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("window of {hours}h is outside 1..={max}h")]
    InvalidWindow { hours: u32, max: u32 },

    #[error("{0} samples per hour does not divide an hour into whole minutes")]
    InvalidDensity(u32),

    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("series for '{entity}' is unavailable")]
    SeriesUnavailable {
        entity: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<WindowError> for DashboardError {
    fn from(err: WindowError) -> Self {
        match err {
            WindowError::Hours { hours, max } => DashboardError::InvalidWindow { hours, max },
            WindowError::Density(samples) => DashboardError::InvalidDensity(samples),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_errors_keep_their_fields() {
        let err = DashboardError::from(WindowError::Hours { hours: 30, max: 24 });
        assert!(matches!(err, DashboardError::InvalidWindow { hours: 30, max: 24 }));
        assert_eq!(err.to_string(), "window of 30h is outside 1..=24h");

        let err = DashboardError::from(WindowError::Density(7));
        assert!(matches!(err, DashboardError::InvalidDensity(7)));
        assert_eq!(
            err.to_string(),
            "7 samples per hour does not divide an hour into whole minutes"
        );
    }
}

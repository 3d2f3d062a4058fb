use thiserror::Error;

/// Errors surfaced by panel lifecycle calls
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("no display metrics provider configured for this panel")]
    MissingMetricsProvider,

    #[error("panel is already enabled")]
    AlreadyEnabled,

    #[error("panel is not enabled")]
    NotEnabled,

    #[error("failed to build the panel's widget tree")]
    WidgetBuild(#[source] anyhow::Error),
}

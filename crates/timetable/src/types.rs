use crate::api::SchedulerClient;
use crate::config::ConsoleConfig;

/// Shared state handed to every endpoint.
pub struct ConsoleState {
    pub client: SchedulerClient,
    pub config: ConsoleConfig,
}

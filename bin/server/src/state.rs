//! Server application state

use crate::directory::{CommandSource, UserReadService};
use std::sync::Arc;
use uploader::BulkUploadCoordinator;

/// Collaborators shared by all handlers
pub struct AppState {
    pub uploads: BulkUploadCoordinator,
    pub commands: Arc<dyn CommandSource>,
    pub users: Arc<dyn UserReadService>,
}

impl AppState {
    pub fn new(
        uploads: BulkUploadCoordinator,
        commands: Arc<dyn CommandSource>,
        users: Arc<dyn UserReadService>,
    ) -> Self {
        Self {
            uploads,
            commands,
            users,
        }
    }
}

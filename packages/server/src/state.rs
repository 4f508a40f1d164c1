use std::sync::Arc;

use common::storage::FileStore;

use crate::config::AppConfig;
use crate::repository::BrandRepository;
use crate::views::Views;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub brands: Arc<dyn BrandRepository>,
    pub file_store: Arc<dyn FileStore>,
    pub views: Arc<Views>,
}

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use url::Url;

use crate::cart_controller::CartController;
use crate::clients::CartClient;
use crate::services::{FileStore, HttpInventory, InventoryService, NotificationSink, PersistenceStore};
use super::{Settings, SystemError};

/// The running cart: the controller task plus the client used to reach it.
///
/// Responsible for starting the controller, wiring its collaborators, and
/// handling shutdown.
pub struct CartSystem {
    pub cart_client: CartClient,
    handle: tokio::task::JoinHandle<()>,
}

impl CartSystem {
    pub fn new(
        mailbox_size: usize,
        storage_key: impl Into<String>,
        inventory: Arc<dyn InventoryService>,
        store: Arc<dyn PersistenceStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        info!("Starting cart system");
        let (controller, cart_client) = CartController::new(mailbox_size, storage_key, inventory, store, notifier);
        let handle = tokio::spawn(controller.run());
        Self { cart_client, handle }
    }

    /// Builds the system against the HTTP catalog and file store named in
    /// `settings`.
    pub fn from_settings(settings: &Settings, notifier: Arc<dyn NotificationSink>) -> Result<Self, SystemError> {
        let base_url = Url::parse(&settings.inventory_url)
            .map_err(|e| SystemError::Config(format!("invalid inventory_url {:?}: {}", settings.inventory_url, e)))?;
        let inventory = HttpInventory::new(base_url, Duration::from_secs(settings.request_timeout_secs))?;
        let store = FileStore::new(&settings.store_dir);

        Ok(Self::new(
            settings.mailbox_size,
            settings.storage_key.clone(),
            Arc::new(inventory),
            Arc::new(store),
            notifier,
        ))
    }

    /// Closes the mailbox and waits for the controller to drain it.
    ///
    /// Clones of the client handed out elsewhere keep the controller alive
    /// until they are dropped too.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down cart system...");
        drop(self.cart_client);

        if let Err(e) = self.handle.await {
            error!("Cart controller task failed: {:?}", e);
            return Err(SystemError::ActorTaskFailed(format!("{:?}", e)));
        }

        info!("Cart system shutdown complete.");
        Ok(())
    }
}

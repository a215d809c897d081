//! Vérification des credentials SimpleTV

use super::SimpleTvApi;
use crate::error::{Result, StvError};
use crate::models::Credentials;
use tracing::{info, warn};

impl SimpleTvApi {
    /// Vérifie des credentials auprès de l'API
    ///
    /// La requête n'est jamais mise en cache. Le corps de la réponse est
    /// ignoré : seul le statut compte.
    ///
    /// # Errors
    ///
    /// * `StvError::MissingCredentials` - Nom d'utilisateur ou mot de passe vide
    /// * `StvError::Unauthorized` / `StvError::ApiError` - Statut non-2xx
    /// * `StvError::Http` - Échec de transport
    pub async fn verify_credentials(&self, credentials: &Credentials) -> Result<()> {
        if !credentials.is_complete() {
            return Err(StvError::MissingCredentials);
        }

        info!("Checking SimpleTV credentials for {}", credentials.username());

        let url = self.endpoint(&["auth", "users", credentials.username()])?;
        let authorization = credentials.basic_authorization();

        match self.send(url, Some(&authorization)).await {
            Ok(_) => {
                info!("Authentication passed");
                Ok(())
            }
            Err(e) => {
                warn!("Authentication failed: {}", e);
                Err(e)
            }
        }
    }
}

//! Investment profile endpoints.

use mindful_ledger_core::forms::InvestmentProfileInput;
use mindful_ledger_core::models::InvestmentProfile;
use mindful_ledger_core::types::InvestmentProfileId;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_investment_profiles(&self) -> Result<Vec<InvestmentProfile>, ApiError> {
        self.get("/investment-profiles").await
    }

    /// # Errors
    ///
    /// Returns error if the profile is not found or the request fails.
    #[instrument(skip(self), fields(profile_id = %id))]
    pub async fn get_investment_profile(
        &self,
        id: InvestmentProfileId,
    ) -> Result<InvestmentProfile, ApiError> {
        self.get(&format!("/investment-profiles/{id}")).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_investment_profile(
        &self,
        input: &InvestmentProfileInput,
    ) -> Result<InvestmentProfile, ApiError> {
        self.post("/investment-profiles", input).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input), fields(profile_id = %id))]
    pub async fn update_investment_profile(
        &self,
        id: InvestmentProfileId,
        input: &InvestmentProfileInput,
    ) -> Result<InvestmentProfile, ApiError> {
        self.patch(&format!("/investment-profiles/{id}"), input)
            .await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(profile_id = %id))]
    pub async fn delete_investment_profile(&self, id: InvestmentProfileId) -> Result<(), ApiError> {
        self.delete(&format!("/investment-profiles/{id}")).await
    }
}

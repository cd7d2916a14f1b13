//! `annual-surveys` endpoints.

use gramdash_core::{AnnualSurvey, FinancialYear, SurveyAnalyticsTarget, SurveyFilters};

use crate::client::GramdashClient;
use crate::error::ApiError;
use crate::normalize::financial_years;
use crate::types::{FinancialYearWire, ListEnvelope};

impl GramdashClient {
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn list_surveys(&self, filters: &SurveyFilters) -> Result<Vec<AnnualSurvey>, ApiError> {
        let url = self.build_url("annual-surveys/", &filters.query_pairs())?;
        let rows: ListEnvelope<AnnualSurvey> = self.get_json(url, "annual surveys").await?;
        Ok(rows.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn get_survey(&self, survey_id: i64) -> Result<AnnualSurvey, ApiError> {
        let url = self.build_url(&format!("annual-surveys/{survey_id}"), &[])?;
        self.get_json(url, "annual survey").await
    }

    /// Active financial years, newest first. Rows missing an id or label
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn active_financial_years(&self) -> Result<Vec<FinancialYear>, ApiError> {
        let url = self.build_url("annual-surveys/fy/active", &[])?;
        let rows: ListEnvelope<FinancialYearWire> = self.get_json(url, "financial years").await?;
        let rows = rows.into_vec();
        let total = rows.len();
        let years = financial_years(rows);
        if years.len() < total {
            tracing::warn!(dropped = total - years.len(), "skipped incomplete financial year rows");
        }
        Ok(years)
    }

    /// Survey analytics for a state, district, block or GP.
    ///
    /// The analytics payload varies by level, so it is returned untyped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decode failure.
    pub async fn survey_analytics(
        &self,
        target: SurveyAnalyticsTarget,
        fy_id: Option<i64>,
    ) -> Result<serde_json::Value, ApiError> {
        let params: Vec<(&str, String)> = fy_id.map(|id| ("fy_id", id.to_string())).into_iter().collect();
        let url = self.build_url(&format!("annual-surveys/analytics/{}", target.path()), &params)?;
        self.get_json(url, "survey analytics").await
    }
}

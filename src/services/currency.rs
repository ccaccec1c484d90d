// SPDX-License-Identifier: MIT

//! Currency conversion backed by the exchangerate.host style
//! `/v4/latest/{base}` endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// Result of a single conversion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub original_amount: f64,
    pub converted_amount: f64,
    pub rate: f64,
    pub date: String,
}

#[derive(Deserialize)]
struct RatesReply {
    #[serde(default)]
    date: String,
    rates: HashMap<String, f64>,
}

#[derive(Clone)]
pub struct CurrencyService {
    http: reqwest::Client,
    base_url: String,
}

impl CurrencyService {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.currency_base_url.clone(),
        }
    }

    /// Convert an amount between two currencies at the latest rate.
    /// Codes are case-insensitive; amounts round to two decimals.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion, AppError> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();

        let reply = self.latest_rates(&from).await?;

        let rate = *reply.rates.get(&to).ok_or_else(|| {
            tracing::warn!(%from, %to, "Target currency missing from rate table");
            AppError::Upstream(format!("Currency {to} not supported"))
        })?;

        Ok(Conversion {
            converted_amount: round2(amount * rate),
            original_amount: amount,
            rate,
            date: reply.date,
            from,
            to,
        })
    }

    /// Currency codes the rate provider can convert between, sorted.
    pub async fn supported_currencies(&self) -> Result<Vec<String>, AppError> {
        let reply = self.latest_rates("USD").await?;

        let mut codes: Vec<String> = reply.rates.into_keys().collect();
        codes.sort_unstable();
        Ok(codes)
    }

    async fn latest_rates(&self, base: &str) -> Result<RatesReply, AppError> {
        let url = format!("{}/latest/{base}", self.base_url);
        let response = self.http.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Exchange rate request failed");
            AppError::Upstream("Failed to fetch exchange rates".to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "Exchange rate API returned an error");
            return Err(AppError::Upstream(
                "Failed to fetch exchange rates".to_string(),
            ));
        }

        response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Exchange rate reply was not valid JSON");
            AppError::Upstream("Failed to fetch exchange rates".to_string())
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

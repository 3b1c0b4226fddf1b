//! # Price Sheet Feed
//!
//! The catalog's prices come from a remotely published CSV sheet so the
//! store owner can reprice without shipping a new build. This module fetches
//! and parses it into the core's [`PriceFeed`] mapping; the core applies it
//! by kit role and never sees the transport or the format.
//!
//! ## Sheet Format
//! ```text
//! product_id,unit_price,complete_kit_price
//! kombucha,9500,19000
//! ginger-beer,,17000
//! ```
//!
//! Empty cells mean "leave that price alone". Rows that do not parse are
//! skipped, never fatal: a half-broken sheet patches what it can, a fully
//! broken one patches nothing, and in both cases the storefront keeps
//! rendering with the prices it already has.

use serde::Deserialize;
use tracing::debug;

use fermenta_core::{Money, PriceFeed, PriceUpdate};

use crate::error::FeedError;

/// Fetches the published price sheet over HTTP.
#[derive(Debug, Clone)]
pub struct PriceSheetClient {
    url: String,
    http: reqwest::Client,
}

impl PriceSheetClient {
    pub fn new(url: impl Into<String>) -> Self {
        PriceSheetClient {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Downloads and parses the sheet. Fails only on transport problems
    /// (network error or non-success status); body-level damage degrades
    /// inside [`parse_price_sheet`] instead.
    pub async fn fetch(&self) -> Result<PriceFeed, FeedError> {
        let response = self.http.get(&self.url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok(parse_price_sheet(&body))
    }
}

/// One CSV row. Price cells deserialize as optional so empty cells mean
/// "no change"; a cell that is not a number fails the row as a whole.
#[derive(Debug, Deserialize)]
struct SheetRow {
    product_id: String,
    unit_price: Option<i64>,
    complete_kit_price: Option<i64>,
}

/// Parses the sheet body into a price feed.
///
/// Infallible by design: unparsable rows, empty product ids, and
/// non-positive prices are dropped, and whatever survives becomes the feed.
pub fn parse_price_sheet(sheet: &str) -> PriceFeed {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(sheet.as_bytes());

    let mut feed = PriceFeed::new();
    for row in reader.deserialize::<SheetRow>() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                debug!(%err, "skipping malformed price sheet row");
                continue;
            }
        };
        if row.product_id.is_empty() {
            continue;
        }
        let unit_price = row.unit_price.filter(|p| *p > 0).map(Money::from_pesos);
        let complete_kit_price = row
            .complete_kit_price
            .filter(|p| *p > 0)
            .map(Money::from_pesos);
        if unit_price.is_none() && complete_kit_price.is_none() {
            continue;
        }
        feed.insert(
            row.product_id,
            PriceUpdate {
                unit_price,
                complete_kit_price,
            },
        );
    }
    feed
}

// =============================================================================
// Unit Tests
// =============================================================================

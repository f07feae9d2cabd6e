// src/services/analytics.rs

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::{
    common::error::AppError,
    models::{
        analytics::{LeaseMetrics, PortfolioAnalytics, SalesPipeline, TopAssetEntry},
        asset::Asset,
    },
};

const TOP_ASSETS: usize = 5;

fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

fn overflow() -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("Totais da carteira excedem o limite de Decimal"))
}

// Soma sem pânico: valores aceitos individualmente ainda podem estourar no total
fn add(total: &mut Decimal, value: Decimal) -> Result<(), AppError> {
    *total = total.checked_add(value).ok_or_else(overflow)?;
    Ok(())
}

/// Agrega a carteira em memória. Ativos excluídos logicamente são ignorados.
pub fn summarize(assets: &[Asset]) -> Result<PortfolioAnalytics, AppError> {
    let live: Vec<&Asset> = assets.iter().filter(|a| !a.is_deleted).collect();

    let mut valuation_by_type: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut count_by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut count_by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut sales = SalesPipeline::default();
    let mut leasing = LeaseMetrics::default();

    let mut total_valuation = Decimal::ZERO;
    let mut total_rental_income = Decimal::ZERO;
    let mut total_operating_cost = Decimal::ZERO;

    for asset in &live {
        let valuation = or_zero(asset.current_valuation);
        let rent = or_zero(asset.rental_income);

        add(&mut total_valuation, valuation)?;
        add(&mut total_rental_income, rent)?;
        add(&mut total_operating_cost, or_zero(asset.operating_cost))?;

        add(valuation_by_type.entry(asset.asset_type.clone()).or_default(), valuation)?;
        *count_by_type.entry(asset.asset_type.clone()).or_default() += 1;
        *count_by_status.entry(asset.status.clone()).or_default() += 1;

        match asset.listing_type.as_str() {
            "For Sale" | "Development" => {
                sales.listed += 1;
                match asset.status.as_str() {
                    "Sold" => {
                        sales.sold_count += 1;
                        add(&mut sales.sold_volume, valuation)?;
                    }
                    "Under Contract" => {
                        sales.under_contract_count += 1;
                        add(&mut sales.pipeline_volume, valuation)?;
                    }
                    "Available" => {
                        sales.available_count += 1;
                        add(&mut sales.inventory_volume, valuation)?;
                    }
                    _ => {}
                }
            }
            "For Lease" => {
                leasing.listed += 1;
                // Qualquer status diferente de "Available" conta como ocupado
                if asset.status != "Available" {
                    leasing.occupied += 1;
                    let yearly = rent.checked_mul(Decimal::from(12)).ok_or_else(overflow)?;
                    add(&mut leasing.annualized_rent, yearly)?;
                }
            }
            _ => {}
        }
    }

    if leasing.listed > 0 {
        leasing.occupancy_rate = (Decimal::from(leasing.occupied) * Decimal::ONE_HUNDRED
            / Decimal::from(leasing.listed))
        .round_dp(2);
    }

    let mut ranked = live.clone();
    ranked.sort_by(|a, b| or_zero(b.current_valuation).cmp(&or_zero(a.current_valuation)));
    let top_assets = ranked
        .into_iter()
        .take(TOP_ASSETS)
        .map(|a| TopAssetEntry {
            id: a.id,
            name: a.name.clone(),
            current_valuation: or_zero(a.current_valuation),
        })
        .collect();

    Ok(PortfolioAnalytics {
        total_assets: live.len(),
        total_valuation,
        total_rental_income,
        total_operating_cost,
        valuation_by_type,
        count_by_type,
        count_by_status,
        sales,
        leasing,
        top_assets,
    })
}

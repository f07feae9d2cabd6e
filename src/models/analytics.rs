// src/models/analytics.rs

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

// 1. Visão geral da carteira (cards do topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAnalytics {
    pub total_assets: usize,
    pub total_valuation: Decimal,      // Soma das avaliações atuais
    pub total_rental_income: Decimal,  // Renda mensal de aluguel
    pub total_operating_cost: Decimal,
    pub valuation_by_type: BTreeMap<String, Decimal>,
    pub count_by_type: BTreeMap<String, usize>,
    pub count_by_status: BTreeMap<String, usize>,
    pub sales: SalesPipeline,
    pub leasing: LeaseMetrics,
    pub top_assets: Vec<TopAssetEntry>,
}

// 2. Funil de vendas (listagens "For Sale" e "Development")
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesPipeline {
    pub listed: usize,
    pub sold_count: usize,
    pub sold_volume: Decimal,
    pub under_contract_count: usize,
    pub pipeline_volume: Decimal,
    pub available_count: usize,
    pub inventory_volume: Decimal,
}

// 3. Locação (listagens "For Lease")
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaseMetrics {
    pub listed: usize,
    pub occupied: usize,
    pub occupancy_rate: Decimal, // Percentual, 2 casas
    pub annualized_rent: Decimal,
}

// 4. Maiores ativos por avaliação
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopAssetEntry {
    pub id: Uuid,
    pub name: String,
    pub current_valuation: Decimal,
}

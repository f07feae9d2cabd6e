// src/services/chat.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        analytics::PortfolioAnalytics,
        asset::Asset,
        chat::{ChatContext, ChatMessage},
    },
    services::asset_service::AssetService,
};

pub const EMPTY_COMPLETION: &str = "I couldn't generate a response.";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;

// --- Formatação ---

/// Valor em Naira com separador de milhar, como "₦1,250,000.5".
pub fn naira(amount: Decimal) -> String {
    let rounded = amount.round_dp(2).normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}₦{grouped}.{f}"),
        None => format!("{sign}₦{grouped}"),
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn text_or_na(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or("N/A")
}

// --- Contexto do prompt ---

pub fn portfolio_context(summary: &PortfolioAnalytics) -> String {
    let types = summary
        .count_by_type
        .iter()
        .map(|(kind, count)| format!("{count} {kind}"))
        .collect::<Vec<_>>()
        .join(", ");
    let top = summary
        .top_assets
        .iter()
        .map(|a| format!("{} (Valuation: {})", a.name, naira(a.current_valuation)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "COMPANY: Jand Homes Properties (Nigeria)\n\
         PORTFOLIO SUMMARY:\n\
         - Total Assets: {}\n\
         - Total Valuation: {}\n\
         - Total Monthly Rental Income: {}\n\
         - Asset Types: {}\n\
         - Top Assets: {}\n\n\
         Currency is in Nigerian Naira (₦).",
        summary.total_assets,
        naira(summary.total_valuation),
        naira(summary.total_rental_income),
        types,
        top,
    )
}

pub fn asset_context(asset: &Asset) -> String {
    let location = [&asset.address, &asset.city, &asset.state, &asset.country]
        .into_iter()
        .map(text_or_na)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "COMPANY: Jand Homes Properties (Nigeria)\n\
         CURRENT ASSET DETAILS:\n\
         - Name: {}\n\
         - Type: {}\n\
         - Status: {}\n\
         - Location: {}\n\
         - Coordinates: Lat {}, Lng {}\n\
         - Current Valuation: {}\n\
         - Purchase Price: {}\n\
         - Monthly Rental Income: {}\n\
         - Operating Cost: {}\n\
         - Year Built: {}\n\
         - Building Size: {} sqm\n\
         - Units: {}, Floors: {}\n\
         - Description: {}\n\n\
         Currency is in Nigerian Naira (₦).",
        asset.name,
        asset.asset_type,
        asset.status,
        location,
        or_na(asset.latitude),
        or_na(asset.longitude),
        asset.current_valuation.map(naira).unwrap_or_else(|| "N/A".into()),
        asset.purchase_price.map(naira).unwrap_or_else(|| "N/A".into()),
        naira(asset.rental_income.unwrap_or_default()),
        naira(asset.operating_cost.unwrap_or_default()),
        or_na(asset.year_built),
        or_na(asset.building_size),
        asset.units.unwrap_or(1),
        asset.floors.unwrap_or(1),
        text_or_na(&asset.description),
    )
}

/// Prompt de sistema conforme a página de origem.
/// `data` é o contexto já montado (carteira ou ativo), quando houver.
pub fn system_prompt(page: PromptPage, data: Option<&str>) -> String {
    match (page, data) {
        (PromptPage::Dashboard, Some(data)) => format!(
            "You are the Jand Homes AI Assistant, a helpful assistant for Jand Homes Properties in Nigeria.\n\n\
             KNOWLEDGE BASE:\n{data}\n\n\
             INSTRUCTIONS:\n\
             - Greet users normally (e.g., \"Hello! How can I help you today?\").\n\
             - DO NOT include the portfolio summary in your response unless specifically asked about the portfolio, valuations, income, or asset lists.\n\
             - If a user asks a follow-up or meta-question, respond naturally and helpfully.\n\
             - Use \"₦\" for currency. Keep responses concise.\n\
             - Always be professional and stay focused on real estate and Jand Homes."
        ),
        (PromptPage::Asset(_), Some(data)) => format!(
            "You are the Jand Homes AI Assistant, currently assisting with a specific property.\n\n\
             PROPERTY DETAILS:\n{data}\n\n\
             INSTRUCTIONS:\n\
             - Greet users naturally.\n\
             - Only discuss the specific details of this property if asked.\n\
             - Keep responses conversational and concise.\n\
             - Use \"₦\" for currency."
        ),
        _ => "You are the Jand Homes AI Assistant for Jand Homes Properties.\n\n\
              INSTRUCTIONS:\n\
              - Be helpful, conversational, and professional.\n\
              - If unsure, ask for clarification.\n\
              - Only provide in-depth data if the user requests it.\n\
              - Use \"₦\" for currency."
            .to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPage {
    Dashboard,
    Asset(Uuid),
    General,
}

impl PromptPage {
    /// A página de ativo só vale com `assetId`.
    pub fn from_context(context: Option<&ChatContext>) -> Self {
        let Some(context) = context else {
            return PromptPage::General;
        };
        match (context.page.as_deref(), context.asset_id) {
            (Some("dashboard"), _) => PromptPage::Dashboard,
            (Some("asset"), Some(id)) => PromptPage::Asset(id),
            _ => PromptPage::General,
        }
    }
}

// --- Cliente da API de completions (compatível com OpenAI) ---

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone)]
pub struct ChatService {
    http: reqwest::Client,
    config: LlmConfig,
    assets: AssetService,
}

impl ChatService {
    pub fn new(http: reqwest::Client, config: LlmConfig, assets: AssetService) -> Self {
        Self { http, config, assets }
    }

    pub async fn reply(
        &self,
        messages: Vec<ChatMessage>,
        context: Option<&ChatContext>,
    ) -> Result<String, AppError> {
        // Sem chave, nem chega a consultar o banco
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(AppError::AssistantUnavailable)?;

        let page = PromptPage::from_context(context);
        let data = match page {
            PromptPage::Dashboard => Some(portfolio_context(&self.assets.analytics().await?)),
            PromptPage::Asset(id) => match self.assets.get(id, false).await {
                Ok(asset) => Some(asset_context(&asset)),
                Err(AppError::NotFound(_)) => Some("Asset not found.".to_string()),
                Err(e) => return Err(e),
            },
            PromptPage::General => None,
        };

        let mut conversation = vec![ChatMessage {
            role: "system".into(),
            content: system_prompt(page, data.as_deref()),
        }];
        // O cliente não pode injetar instruções de sistema
        conversation.extend(messages.into_iter().filter(|m| m.role != "system"));

        let request = CompletionRequest {
            model: &self.config.model,
            messages: conversation,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::AssistantFailed(e.to_string()))?;

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::AssistantFailed(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION.to_string());

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analytics::{fixtures::asset, summarize};

    #[test]
    fn naira_groups_thousands() {
        assert_eq!(naira(Decimal::from(0)), "₦0");
        assert_eq!(naira(Decimal::from(950)), "₦950");
        assert_eq!(naira(Decimal::from(1_250_000)), "₦1,250,000");
        assert_eq!(naira("1234.50".parse().unwrap()), "₦1,234.5");
        assert_eq!(naira(Decimal::from(-42_000)), "-₦42,000");
    }

    #[test]
    fn page_selection_needs_asset_id_for_asset_page() {
        let id = Uuid::new_v4();
        let ctx = |page: &str, asset_id| ChatContext {
            page: Some(page.into()),
            asset_id,
        };

        assert_eq!(PromptPage::from_context(None), PromptPage::General);
        assert_eq!(PromptPage::from_context(Some(&ctx("dashboard", None))), PromptPage::Dashboard);
        assert_eq!(PromptPage::from_context(Some(&ctx("asset", Some(id)))), PromptPage::Asset(id));
        assert_eq!(PromptPage::from_context(Some(&ctx("asset", None))), PromptPage::General);
        assert_eq!(PromptPage::from_context(Some(&ctx("settings", None))), PromptPage::General);
    }

    #[test]
    fn portfolio_context_lists_totals_and_top_assets() {
        let assets = [
            asset("Lekki Towers", "Commercial", "Available", "For Sale", 2_000_000),
            asset("Ikoyi Villa", "Residential", "Sold", "For Sale", 1_000_000),
        ];
        let text = portfolio_context(&summarize(&assets).unwrap());

        assert!(text.contains("- Total Assets: 2"));
        assert!(text.contains("- Total Valuation: ₦3,000,000"));
        assert!(text.contains("1 Commercial, 1 Residential"));
        assert!(text.contains("Lekki Towers (Valuation: ₦2,000,000), Ikoyi Villa"));
    }

    #[test]
    fn asset_context_fills_gaps() {
        let mut a = asset("Ikoyi Villa", "Residential", "Available", "For Lease", 5_000);
        a.city = Some("Lagos".into());
        let text = asset_context(&a);

        assert!(text.contains("- Name: Ikoyi Villa"));
        assert!(text.contains("- Location: N/A, Lagos, N/A, N/A"));
        assert!(text.contains("- Purchase Price: N/A"));
        assert!(text.contains("- Units: 1, Floors: 1"));
    }

    #[test]
    fn generic_prompt_when_no_data() {
        let prompt = system_prompt(PromptPage::General, None);
        assert!(prompt.starts_with("You are the Jand Homes AI Assistant for Jand Homes Properties."));
        assert!(!prompt.contains("KNOWLEDGE BASE"));

        let dashboard = system_prompt(PromptPage::Dashboard, Some("PORTFOLIO SUMMARY"));
        assert!(dashboard.contains("KNOWLEDGE BASE:\nPORTFOLIO SUMMARY"));
    }
}

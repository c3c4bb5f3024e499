/*
 * Responsibility
 * - Shops の request/response DTO
 * - 公開 ID は encode 済みの値を返す (内部 ID を漏らさない)
 * - organization は request から受け取らない (未知フィールドとして無視される)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::shop_repo::Page;

const NAME_MAX_CHARS: usize = 128;

// バイト数ではなく文字数で数える (日本語の店名など)
fn name_too_long(name: &str) -> bool {
    name.chars().count() > NAME_MAX_CHARS
}

fn is_currency_code(s: &str) -> bool {
    s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub currency: String,
}

impl CreateShopRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if name_too_long(&self.name) {
            return Err("name must be <= 128 chars");
        }
        if !is_currency_code(&self.currency) {
            return Err("currency must be a 3-letter ISO 4217 code");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub currency: Option<String>,
}

impl UpdateShopRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && (name.trim().is_empty() || name_too_long(name))
        {
            return Err("name must be 1..=128 chars");
        }
        if let Some(currency) = &self.currency
            && !is_currency_code(currency)
        {
            return Err("currency must be a 3-letter ISO 4217 code");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListShopsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListShopsQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    pub fn page(&self) -> Result<Page, &'static str> {
        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err("limit must be between 1 and 100");
        }
        if offset < 0 {
            return Err("offset must be >= 0");
        }

        Ok(Page { limit, offset })
    }
}

#[derive(Debug, Serialize)]
pub struct ShopResponse {
    pub id: String, // encoded
    pub organization_id: String,
    pub name: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

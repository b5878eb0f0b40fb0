//! Service-specific tests
//!
//! Each service has its own test file; shared record builders live in `common`.


// Common test utilities for services
#[cfg(test)]
pub mod common {
    use chrono::{NaiveDate, TimeZone, Utc};
    use shared::{
        BranchContext, Competitor, CompetitorGroup, OrganizationContext, PriceDataPatch,
    };

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).expect("valid test date")
    }

    pub fn branch() -> BranchContext {
        BranchContext {
            name: "Casa Verde Poblado".to_string(),
            address: Some("Calle 10 #35-20".to_string()),
            city: Some("Medellín".to_string()),
            country: Some("Colombia".to_string()),
            organization: OrganizationContext {
                name: "Casa Verde Hostels".to_string(),
                display_name: None,
                country: Some("Colombia".to_string()),
            },
        }
    }

    pub fn group(id: i64, branch_id: i64) -> CompetitorGroup {
        CompetitorGroup {
            id,
            branch_id,
            name: "Poblado hostels".to_string(),
            description: None,
            city: "Medellín".to_string(),
            country: Some("Colombia".to_string()),
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    pub fn competitor(id: i64, group_id: i64, name: &str, is_active: bool) -> Competitor {
        Competitor {
            id,
            group_id,
            name: name.to_string(),
            search_name: None,
            booking_com_url: Some(format!("https://www.booking.com/hotel/co/{id}.html")),
            hostelworld_url: None,
            other_urls: None,
            is_active,
            ota_listing_id: None,
            last_searched_at: None,
            last_price_found_at: None,
        }
    }

    pub fn price_patch(price: f64, currency: &str) -> PriceDataPatch {
        PriceDataPatch {
            price,
            currency: currency.to_string(),
            available: true,
            source: "ai_search".to_string(),
            scraped_at: Utc::now(),
        }
    }
}

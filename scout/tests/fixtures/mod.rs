//! Shared records and store setups for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use scout::services::InMemoryGateway;
use shared::{BranchContext, Competitor, CompetitorGroup, OrganizationContext};

pub const BRANCH_ID: i64 = 10;
pub const GROUP_ID: i64 = 1;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).expect("valid test date")
}

pub fn branch_in(city: Option<&str>) -> BranchContext {
    BranchContext {
        name: "Casa Verde Poblado".to_string(),
        address: Some("Calle 10 #35-20".to_string()),
        city: city.map(str::to_string),
        country: Some("Colombia".to_string()),
        organization: OrganizationContext {
            name: "Casa Verde Hostels".to_string(),
            display_name: Some("Casa Verde".to_string()),
            country: Some("Colombia".to_string()),
        },
    }
}

pub fn group() -> CompetitorGroup {
    CompetitorGroup {
        id: GROUP_ID,
        branch_id: BRANCH_ID,
        name: "Poblado hostels".to_string(),
        description: Some("Hostels within walking distance".to_string()),
        city: "Medellín".to_string(),
        country: Some("Colombia".to_string()),
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn competitor(id: i64, name: &str, is_active: bool) -> Competitor {
    Competitor {
        id,
        group_id: GROUP_ID,
        name: name.to_string(),
        search_name: Some(format!("{name} Medellín")),
        booking_com_url: Some(format!("https://www.booking.com/hotel/co/{id}.html")),
        hostelworld_url: Some(format!("https://www.hostelworld.com/hostels/p/{id}")),
        other_urls: None,
        is_active,
        ota_listing_id: None,
        last_searched_at: None,
        last_price_found_at: None,
    }
}

/// Store with one branch, its group, and the given competitors
pub async fn store_with(competitors: Vec<Competitor>) -> Arc<InMemoryGateway> {
    let gateway = Arc::new(InMemoryGateway::new());
    gateway.insert_branch(BRANCH_ID, branch_in(Some("Medellín"))).await;
    gateway.insert_group(group()).await;
    for competitor in competitors {
        gateway.insert_competitor(competitor).await;
    }
    gateway
}

pub fn price_json(price: f64) -> String {
    format!(r#"{{"price": {price}, "currency": "COP", "platform": "Booking.com", "available": true}}"#)
}

//! Prompt rendering for competitor discovery and per-cell price lookups

use chrono::NaiveDate;
use shared::{BranchContext, RoomType};

/// Country assumed when neither the branch nor its organization names one
const FALLBACK_COUNTRY: &str = "Colombia";

/// Example list shown to the model so it mirrors the expected shape
const DISCOVERY_EXAMPLE: &str = r#"[
  {
    "name": "Los Patios Hostel",
    "searchName": "Los Patios Medellín",
    "bookingComUrl": "https://www.booking.com/hotel/co/los-patios.html",
    "hostelworldUrl": "https://www.hostelworld.com/hosteldetails.php/Los-Patios/Medellin/12345",
    "reasoning": "Direct competitor in the same neighbourhood with a similar audience",
    "confidence": 0.95
  },
  {
    "name": "Selina Medellín",
    "searchName": "Selina Medellín Hostel",
    "bookingComUrl": "https://www.booking.com/hotel/co/selina-medellin.html",
    "reasoning": "Well-known hostel chain at a similar price level",
    "confidence": 0.85
  }
]"#;

const PRICE_EXAMPLE: &str = r#"{
  "price": 35000,
  "currency": "COP",
  "platform": "booking.com",
  "url": "https://...",
  "available": true,
  "roomName": "Private Room"
}"#;

const PRICE_NOT_FOUND_EXAMPLE: &str = r#"{
  "price": null,
  "error": "price not found"
}"#;

/// Renders the natural-language prompts sent to the model
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Prompt asking for the `max_competitors` closest competitors of a branch
    ///
    /// `city` is passed separately because the caller has already checked
    /// that the branch has one.
    pub fn discovery(
        &self,
        branch: &BranchContext,
        city: &str,
        room_type: RoomType,
        max_competitors: u32,
    ) -> String {
        let country = branch
            .country
            .as_deref()
            .or(branch.organization.country.as_deref())
            .unwrap_or(FALLBACK_COUNTRY);
        let address = branch.address.as_deref().unwrap_or("not provided");

        format!(
            "You are an expert on the hostel industry in {country} and know the important hostels in its cities.\n\
             \n\
             Task: identify the {max_competitors} most important direct competitors of a hostel.\n\
             \n\
             Hostel information:\n\
             - Organization: {organization}\n\
             - Branch: {branch_name}\n\
             - City: {city}\n\
             - Address: {address}\n\
             - Country: {country}\n\
             - Room type: {room_label}\n\
             \n\
             Identify the {max_competitors} most important direct competitors for this hostel in this city.\n\
             Take into account:\n\
             - Similar target audience\n\
             - Similar location (same city, similar neighbourhood)\n\
             - Similar amenities and price level\n\
             - Known hostel chains as well as independent hostels\n\
             \n\
             Respond ONLY with a JSON array in the following format:\n\
             {DISCOVERY_EXAMPLE}\n\
             \n\
             IMPORTANT:\n\
             - Respond ONLY with the JSON array, no additional explanations\n\
             - If no competitors can be found, respond with: []\n\
             - bookingComUrl and hostelworldUrl are optional and may be null\n\
             - confidence is a value between 0 and 1",
            organization = branch.organization_name(),
            branch_name = branch.name,
            room_label = room_type.label(),
        )
    }

    /// Prompt asking for one hostel's nightly price on one date
    pub fn price_lookup(&self, hostel_name: &str, city: &str, date: NaiveDate, room_type: RoomType) -> String {
        format!(
            "You are an expert on hostel prices in {FALLBACK_COUNTRY}.\n\
             \n\
             Task: find the current price for a hostel.\n\
             \n\
             Hostel name: {hostel_name}\n\
             City: {city}\n\
             Date: {date}\n\
             Room type: {room_label}\n\
             \n\
             Look up the price for this hostel on this date on Booking.com, Hostelworld or other OTA platforms.\n\
             \n\
             Respond ONLY with a JSON object in the following format:\n\
             {PRICE_EXAMPLE}\n\
             \n\
             If no price can be found, respond with:\n\
             {PRICE_NOT_FOUND_EXAMPLE}\n\
             \n\
             IMPORTANT:\n\
             - Respond ONLY with the JSON object, no additional explanations\n\
             - price is in COP (Colombian pesos)\n\
             - If no price is found, set price to null",
            date = date.format("%Y-%m-%d"),
            room_label = room_type.label(),
        )
    }
}

use std::collections::HashSet;

use derive_builder::Builder;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    api_interfaces::feed,
    constants::{CUISINE_LOOKUP_NAME, DEFAULT_FEED_URL, DETAIL_LINK_BASE_URL},
    error::GetError,
};

/// A restaurant week participant.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(setter(into))]
pub struct Restaurant {
    id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    /// Cuisine names joined with `", "`, in lookup table order.
    #[builder(default)]
    cuisine: String,
    #[builder(default)]
    description: String,
    #[builder(default)]
    website: String,
    detail_link: String,
}

impl Restaurant {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn cuisine(&self) -> &str {
        &self.cuisine
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn detail_link(&self) -> &str {
        &self.detail_link
    }
}

#[derive(Debug, PartialEq)]
pub struct Restaurants(Vec<Restaurant>);

impl Restaurants {
    /// Retrieve all restaurants. If the endpoint is not provided, the NYC Go
    /// restaurant week grid is used.
    pub async fn get_custom(client: &Client, endpoint: Option<&str>) -> Result<Self, GetError> {
        let url = endpoint.unwrap_or(DEFAULT_FEED_URL);
        debug!(url, "requesting restaurant week feed");
        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GetError::ResponseError(response.status()));
        }
        let response_body = response.text().await.map_err(GetError::ResponseBodyError)?;
        debug!(bytes = response_body.len(), "received restaurant week feed");
        let parsed_body: feed::Response = serde_json::from_str(response_body.as_str())?;
        let restaurants = Self::try_from(parsed_body)?;
        info!(count = restaurants.len(), "parsed restaurants");
        Ok(restaurants)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Restaurant> {
        self.0.iter()
    }
}

impl AsRef<[Restaurant]> for Restaurants {
    fn as_ref(&self) -> &[Restaurant] {
        &self.0
    }
}

impl TryFrom<feed::Response> for Restaurants {
    type Error = GetError;

    fn try_from(response: feed::Response) -> Result<Self, GetError> {
        let cuisines = response
            .lookup
            .and_then(|lookup| lookup.cuisine)
            .unwrap_or_default();
        let mut blocks = response.data.into_iter();
        let block = blocks.next().ok_or(GetError::EmptyFeed)?;
        if blocks.len() > 0 {
            debug!(ignored = blocks.len(), "feed has extra content blocks");
        }
        block
            .grid_items
            .into_iter()
            .map(|item| to_restaurant(item, &cuisines))
            .collect::<Result<Vec<_>, _>>()
            .map(Restaurants)
    }
}

fn to_restaurant(
    item: feed::GridItem,
    cuisines: &[feed::Category],
) -> Result<Restaurant, GetError> {
    let lookup_info = item.lookup_info.unwrap_or_default();
    let ids = cuisine_ids(&lookup_info);
    let cuisine = resolve_cuisine(&ids, cuisines);
    if cuisine.is_empty() && !ids.is_empty() {
        warn!(id = %item.id, "cuisine ids matched no lookup entries");
    }
    Ok(RestaurantBuilder::default()
        .detail_link(detail_link(&item.id))
        .id(item.id)
        .name(item.display_title)
        .latitude(item.latitude)
        .longitude(item.longitude)
        .cuisine(cuisine)
        .description(item.summary.unwrap_or_default())
        .website(item.website.unwrap_or_default())
        .build()?)
}

/// The public detail page of a restaurant: the base URL followed by the
/// percent-encoded id as a single path segment.
fn detail_link(id: &str) -> String {
    let mut link = String::from(DETAIL_LINK_BASE_URL);
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                link.push(char::from(byte))
            }
            _ => link.push_str(&format!("%{:02X}", byte)),
        }
    }
    link
}

/// Union of the ids of every cuisine lookup attached to an item.
fn cuisine_ids(lookup_info: &[feed::LookupInfo]) -> HashSet<&str> {
    lookup_info
        .iter()
        .filter(|info| info.lookup_name == CUISINE_LOOKUP_NAME)
        .filter_map(|info| info.ids.as_deref())
        .flat_map(|ids| ids.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect()
}

fn resolve_cuisine(ids: &HashSet<&str>, cuisines: &[feed::Category]) -> String {
    cuisines
        .iter()
        .filter(|category| ids.contains(category.id.as_str()))
        .map(|category| category.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

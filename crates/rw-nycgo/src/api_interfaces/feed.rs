use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

// Only the fields read by the projection are declared; everything else in the
// payload is ignored by serde.

/// Raw response from the grid blocks service.
#[derive(Deserialize)]
pub struct Response {
    pub data: Vec<Block>,
    #[serde(default, deserialize_with = "lenient")]
    pub lookup: Option<Lookup>,
}

/// A content block holding a page of grid items.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub grid_items: Vec<GridItem>,
}

/// Raw restaurant entry.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    pub id: String,
    pub display_title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub summary: Option<String>,
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub lookup_info: Option<Vec<LookupInfo>>,
}

/// Reference from a grid item into one of the lookup tables.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupInfo {
    pub lookup_name: String,
    pub ids: Option<String>,
}

/// Shared category tables. Borough, neighborhood, amenity, meal, delivery and
/// collection tables are present upstream but unused.
#[derive(Deserialize)]
pub struct Lookup {
    #[serde(default, deserialize_with = "lenient_list")]
    pub cuisine: Option<Vec<Category>>,
}

#[derive(Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Lookup data only enriches a restaurant, so a value of the wrong shape is
/// logged and read as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                warn!(error = %e, "ignoring malformed lookup data");
                Ok(None)
            }
        },
    }
}

/// Like [`lenient`], but for lists: malformed entries are skipped one by one.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            warn!(value = %other, "ignoring lookup list that is not an array");
            return Ok(None);
        }
    };
    let parsed = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(error = %e, entry = %entry, "skipping malformed lookup entry");
                None
            }
        })
        .collect();
    Ok(Some(parsed))
}

use std::io::Write;

use maud::{html, Markup, PreEscaped, DOCTYPE};
use reqwest::Url;
use serde::Serialize;

use crate::{
    constants::{MAPS_SDK_URL, MAP_CENTER, MAP_ZOOM, PAGE_TITLE, POLYFILL_URL},
    error::RenderError,
    Restaurant,
};

/// Map pin, PNG, base64 encoded.
const MARKER_ICON: &str = "iVBORw0KGgoAAAANSUhEUgAAABQAAAAgCAYAAAASYli2AAAAGXRFWHRTb2Z0d2FyZQBBZG9iZSBJbWFnZVJlYWR5ccllPAAAAyZpVFh0WE1MOmNvbS5hZG9iZS54bXAAAAAAADw/eHBhY2tldCBiZWdpbj0i77u/IiBpZD0iVzVNME1wQ2VoaUh6cmVTek5UY3prYzlkIj8+IDx4OnhtcG1ldGEgeG1sbnM6eD0iYWRvYmU6bnM6bWV0YS8iIHg6eG1wdGs9IkFkb2JlIFhNUCBDb3JlIDUuNi1jMDE0IDc5LjE1Njc5NywgMjAxNC8wOC8yMC0wOTo1MzowMiAgICAgICAgIj4gPHJkZjpSREYgeG1sbnM6cmRmPSJodHRwOi8vd3d3LnczLm9yZy8xOTk5LzAyLzIyLXJkZi1zeW50YXgtbnMjIj4gPHJkZjpEZXNjcmlwdGlvbiByZGY6YWJvdXQ9IiIgeG1sbnM6eG1wPSJodHRwOi8vbnMuYWRvYmUuY29tL3hhcC8xLjAvIiB4bWxuczp4bXBNTT0iaHR0cDovL25zLmFkb2JlLmNvbS94YXAvMS4wL21tLyIgeG1sbnM6c3RSZWY9Imh0dHA6Ly9ucy5hZG9iZS5jb20veGFwLzEuMC9zVHlwZS9SZXNvdXJjZVJlZiMiIHhtcDpDcmVhdG9yVG9vbD0iQWRvYmUgUGhvdG9zaG9wIENDIDIwMTQgKFdpbmRvd3MpIiB4bXBNTTpJbnN0YW5jZUlEPSJ4bXAuaWlkOkQxNjg4MUQzREIyQzExRTVCN0E2RkU3MTY5RTFGOTMzIiB4bXBNTTpEb2N1bWVudElEPSJ4bXAuZGlkOkQxNjg4MUQ0REIyQzExRTVCN0E2RkU3MTY5RTFGOTMzIj4gPHhtcE1NOkRlcml2ZWRGcm9tIHN0UmVmOmluc3RhbmNlSUQ9InhtcC5paWQ6RDE2ODgxRDFEQjJDMTFFNUI3QTZGRTcxNjlFMUY5MzMiIHN0UmVmOmRvY3VtZW50SUQ9InhtcC5kaWQ6RDE2ODgxRDJEQjJDMTFFNUI3QTZGRTcxNjlFMUY5MzMiLz4gPC9yZGY6RGVzY3JpcHRpb24+IDwvcmRmOlJERj4gPC94OnhtcG1ldGE+IDw/eHBhY2tldCBlbmQ9InIiPz6klcgWAAAC+UlEQVR42qyWz08TURDH5+2PtkpQ8aI3SYwgGjWCSlBRMJBwQA9qYg8m/ggYoxfjxX/ARE/oQSOIB2Piz2gaD0YPGEBpaymiIMgPLWAbUw+gxgot7e4+Z9YnEukPKvuSb/b1ze6nM/tmZh/jPtUFAKtRCVjYUFEBRdMhX5FhLedgLITGGEjI0pXgF/7epsI0WDDiCfQwbwkrycuFQiuA3yKwTJIYcLBoEEsyODCrgMSSuIVAYikZbuAtft7+zGsM0e+aMqmwaivbjTua0gklzY7Fzl7Wm68+NPrxp5kFDXeMN6cPSu8azsj1mBmOpO8xFfCp13iOsFc4Je/eCg3RGtlSbkwqg6uNt+FlANUnoENiPiBs2YXssEEIL59Q37E8zSpipQkK3RC27Dw8vlei+p78AzM36fd8UtiyA25aw+pfNCnL/12nNbJlDbTbIH/HRkbvyolaIeSkNbJl/Q7Nf5OgAC93KUyxlCNJ6ZNbmWcR5My7nsHigREkVEuB1GlBx+5vQYvA/FwqNbrrmqZ1e9SELpA68pn75Za2bsfYVMVEVdFoid2uKyAp/wXzvuPuLUe0SzKlXG//aHx0qiK8rzJULGuakqGrJYN5t9dp13EaImAcpfUPjEXHflSHazYEilUHejrPjOro4Z6d9doNipgki+/xFEF7+wLRj5HycG1JcLMq62omTxHmLj8xAxtGTSicc4Mx9lN0FnjgegmJeCm/fa7r1CIlvhgUm9m6/7ZxHfdONj0TsADqA8HIOTOxe7r9XJQXQQddT3zek9f2XIkl1CjSza/4TB1wAzzdCYI1z4KNz5w80EMCQihoOkhP5qLWo/YfdlZfjLVClLvxNh8G4wHecavIg7ajqHLUyjnlOxs4EhieDV1H0EMHKi/E2lmUtwP33tvmw7VjqF1JYclqudPXQeHTO6WuPHj/Uav//OPam13h0tdlzs5GEaa5AZHIpDbnjJPu/CO6zCpUgZiHBGw81WlNzpBm9FBMfEa/ooLpYDR+CTAAX0lK4qp7J98AAAAASUVORK5CYII=";

const STYLE: &str = r#"
#map {
    height: 100%;
}
html,
body {
    height: 100%;
    margin: 0;
    padding: 0;
}
"#;

// Shared by every placeMarker call; the info window is built from DOM nodes so
// feed text never passes through an HTML parser.
const MARKER_SCRIPT: &str = r#"
function placeMarker(restaurant) {
    const marker = new google.maps.Marker({
        title: restaurant.name,
        position: { lat: restaurant.latitude, lng: restaurant.longitude },
        map: map,
        icon: "data:image/png;base64," + MARKER_ICON,
    });
    marker.addListener("click", () => {
        infowindow.setContent(popupContent(restaurant));
        infowindow.open(map, marker);
    });
}

function link(href) {
    const anchor = document.createElement("a");
    anchor.href = href;
    anchor.target = "_blank";
    anchor.rel = "noopener noreferrer";
    anchor.textContent = href;
    return anchor;
}

function popupContent(restaurant) {
    const content = document.createElement("div");
    const heading = document.createElement("h3");
    heading.textContent = restaurant.cuisine
        ? restaurant.name + " (" + restaurant.cuisine + ")"
        : restaurant.name;
    const description = document.createElement("p");
    description.textContent = restaurant.description;
    content.append(heading, description);
    if (restaurant.website) {
        const website = document.createElement("p");
        website.append("Website: ", link(restaurant.website));
        content.append(website);
    }
    const details = document.createElement("p");
    details.append("Details: ", link(restaurant.detailLink));
    content.append(details);
    return content;
}
"#;

/// What the page script knows about a restaurant.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Marker<'a> {
    id: &'a str,
    name: &'a str,
    latitude: f64,
    longitude: f64,
    cuisine: &'a str,
    description: &'a str,
    website: String,
    detail_link: &'a str,
}

impl<'a> From<&'a Restaurant> for Marker<'a> {
    fn from(restaurant: &'a Restaurant) -> Self {
        Self {
            id: restaurant.id(),
            name: restaurant.name(),
            latitude: restaurant.latitude(),
            longitude: restaurant.longitude(),
            cuisine: restaurant.cuisine(),
            description: restaurant.description(),
            website: website_url(restaurant.website()),
            detail_link: restaurant.detail_link(),
        }
    }
}

/// Render the map page for the restaurants into `writer`.
pub fn render<W: Write>(
    writer: &mut W,
    api_key: &str,
    restaurants: &[Restaurant],
) -> Result<(), RenderError> {
    let page = to_html(api_key, restaurants)?;
    writer.write_all(page.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Render the map page for the restaurants as a string.
pub fn to_html(api_key: &str, restaurants: &[Restaurant]) -> Result<String, RenderError> {
    Ok(markup(api_key, restaurants)?.into_string())
}

fn markup(api_key: &str, restaurants: &[Restaurant]) -> Result<Markup, RenderError> {
    let sdk_url = sdk_url(api_key)?;
    let script = init_script(restaurants)?;
    Ok(html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (PAGE_TITLE) }
                script src=(POLYFILL_URL) {}
                script src=(sdk_url.as_str()) defer {}
                style type="text/css" { (PreEscaped(STYLE)) }
                script { (PreEscaped(script)) }
            }
            body {
                div #map {}
            }
        }
    })
}

fn sdk_url(api_key: &str) -> Result<Url, RenderError> {
    Url::parse_with_params(
        MAPS_SDK_URL,
        &[("key", api_key), ("callback", "initMap"), ("v", "weekly")],
    )
    .map_err(|e| RenderError::InvalidSdkUrl(e.to_string()))
}

fn init_script(restaurants: &[Restaurant]) -> Result<String, RenderError> {
    let placements = restaurants
        .iter()
        .map(|restaurant| {
            let marker = script_json(&Marker::from(restaurant))?;
            Ok(format!("    placeMarker({marker});\n"))
        })
        .collect::<Result<String, RenderError>>()?;
    // Markers are only placed from the calls above, so an empty page carries no
    // marker code at all.
    let marker_script = if restaurants.is_empty() {
        ""
    } else {
        MARKER_SCRIPT
    };
    let (lat, lng) = MAP_CENTER;
    Ok(format!(
        r#"
const MARKER_ICON = "{MARKER_ICON}";
let map;
let infowindow;

function initMap() {{
    map = new google.maps.Map(document.getElementById("map"), {{
        zoom: {MAP_ZOOM},
        center: {{ lat: {lat}, lng: {lng} }},
    }});
    infowindow = new google.maps.InfoWindow();
{placements}}}
{marker_script}"#
    ))
}

/// Serialize a value as a JavaScript literal that is safe inside a script element.
fn script_json<T: Serialize>(value: &T) -> Result<String, RenderError> {
    let json = serde_json::to_string(value)?;
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    Ok(escaped)
}

/// Schemes that run code or embed content when a link is followed.
const BLOCKED_SCHEMES: [&str; 4] = ["javascript", "data", "vbscript", "file"];

/// Prepare a feed website for use as a link. A link without a scheme is taken
/// to be https; a link whose scheme can run code is dropped.
fn website_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match Url::parse(raw) {
        Ok(url) if BLOCKED_SCHEMES.contains(&url.scheme()) => String::new(),
        // `www.example.com:8080` parses with `www.example.com` as its scheme
        Ok(url) if !url.scheme().contains('.') => raw.to_string(),
        _ => {
            let with_scheme = format!("https://{raw}");
            match Url::parse(&with_scheme) {
                Ok(_) => with_scheme,
                Err(_) => String::new(),
            }
        }
    }
}

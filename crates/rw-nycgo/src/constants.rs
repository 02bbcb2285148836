/// The default endpoint for the NYC Go restaurant week grid
pub const DEFAULT_FEED_URL: &str =
    "https://service.nycgo.com/nycgo/v2/body-grid-blocks?entryId=411&gridId=restaurant-week";

/// Base of the public detail page for a restaurant; the restaurant id is appended
pub const DETAIL_LINK_BASE_URL: &str = "https://www.nycgo.com/restaurant-week/browse/";

/// The lookup name used by grid items to reference cuisine categories
pub const CUISINE_LOOKUP_NAME: &str = "cuisine";

/// Google Maps JavaScript SDK, without query parameters
pub const MAPS_SDK_URL: &str = "https://maps.googleapis.com/maps/api/js";
pub const POLYFILL_URL: &str = "https://polyfill.io/v3/polyfill.min.js?features=default";

pub const PAGE_TITLE: &str = "NYC Restaurant Week";

/// Initial map center (latitude, longitude)
pub const MAP_CENTER: (f64, f64) = (40.7448362, -73.9584712);
pub const MAP_ZOOM: u8 = 13;

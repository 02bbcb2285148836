mod api_interfaces;
pub mod constants;
pub mod error;
pub mod generate;
pub mod outfile;
pub mod page;
pub mod restaurants;
pub mod util;

pub use restaurants::{Restaurant, Restaurants};

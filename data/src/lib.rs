pub mod chart;
pub mod config;
pub mod filter;
pub mod record;
pub mod selection;
pub mod util;

pub use chart::{PriceChart, Series};
pub use config::Config;
pub use config::theme::Theme;
pub use record::PricePoint;
pub use selection::{Company, Month, Selection};

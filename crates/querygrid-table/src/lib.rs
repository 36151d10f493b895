//! CSV-backed search engines and aggregator for querygrid.
//!
//! Every engine here filters one column of one CSV file and returns a
//! [`RowSet`]; the [`TableAggregator`] combines the row sets and
//! materializes the matching rows. Register the whole family with
//! [`register_defaults`] and pair it with the core index types:
//!
//! ```no_run
//! use querygrid_core::SpecBuilder;
//!
//! let mut builder = SpecBuilder::new();
//! querygrid_core::index::register_defaults(&mut builder)?;
//! querygrid_core::register_default_clients(&mut builder)?;
//! querygrid_table::register_defaults(&mut builder)?;
//! # Ok::<(), querygrid_core::QueryGridError>(())
//! ```

pub mod aggregator;
pub mod boolean;
pub mod date;
pub mod number;
pub mod table;
pub mod text;

pub use aggregator::TableAggregator;
pub use boolean::{BoolArguments, BoolSearchEngine};
pub use date::{DateArguments, DateRange, DateSearchEngine};
pub use number::{NumberArguments, NumberRange, NumberSearchEngine};
pub use table::{Row, RowSet, TableEngineConfig, TableRows};
pub use text::{MatchingStrategy, TextArguments, TextSearchEngine};

use querygrid_core::{Result, SpecBuilder};

/// Registration keys for the table family.
pub mod keys {
    pub const TEXT_SEARCH: &str = "text_search";
    pub const NUMBER_SEARCH: &str = "number_search";
    pub const BOOL_SEARCH: &str = "bool_search";
    pub const DATE_SEARCH: &str = "date_search";
    pub const TABLE_AGGREGATOR: &str = "table_aggregator";
}

/// Register every table search engine and the table aggregator under
/// their default keys.
pub fn register_defaults(builder: &mut SpecBuilder) -> Result<()> {
    builder.register_search_engine::<TextSearchEngine>(keys::TEXT_SEARCH)?;
    builder.register_search_engine::<NumberSearchEngine>(keys::NUMBER_SEARCH)?;
    builder.register_search_engine::<BoolSearchEngine>(keys::BOOL_SEARCH)?;
    builder.register_search_engine::<DateSearchEngine>(keys::DATE_SEARCH)?;
    builder.register_aggregator::<TableAggregator>(keys::TABLE_AGGREGATOR)?;
    Ok(())
}

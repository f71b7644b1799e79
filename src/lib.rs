pub mod collator;
pub mod config;
pub mod element;
pub mod iter;
pub mod key;
pub mod normalize;
pub mod rules;
pub mod table;

pub use collator::RuleBasedCollator;
pub use config::{CollatorConfig, Strength};
pub use element::{NULLORDER, primary_order, secondary_order, tertiary_order};
pub use iter::{CollationElementIterator, InvalidOffset};
pub use key::CollationKey;
pub use normalize::Decomposition;
pub use rules::{ParseError, RuleSet};
pub use table::CollationTable;

//! Date windows, day grouping, per body part counts and paging over a
//! trainee's journal. Nothing in here touches the database

mod filter;
pub use filter::*;

mod group;
pub use group::*;

mod page;
pub use page::*;

mod range;
pub use range::*;

mod tally;
pub use tally::*;

pub mod aggregator;
pub mod balance;
pub mod export;
pub mod ledger;
pub mod rounding;
pub mod settlement;
pub mod shopping_list;
pub mod split;
pub mod units;

pub use ledger::LedgerService;
pub use shopping_list::ShoppingListService;

//! `motoreserve-stock` — the stock ledger.
//!
//! Sole writer of per-vehicle stock quantities. Stock decreases only through
//! [`StockLedger::reserve_unit`] and every mutation happens under a
//! per-vehicle guard.

pub mod ledger;

pub use ledger::StockLedger;

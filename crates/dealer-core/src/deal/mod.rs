//! The deal profitability engine.
//!
//! Raw [`DealInput`] flows through acquisition, lots and expenses, then
//! financing (which needs the acquisition and expense totals), and is rolled
//! up into a [`DealSummary`] by [`build`].

pub mod acquisition;
pub mod expenses;
pub mod financing;
pub mod input;
pub mod lots;
pub mod summary;
pub mod vat;

pub use input::{AcquisitionInput, DealInput, Expense, FinancingInput, Lot, PurchaseInput};
pub use summary::{analyse_deal, build, DealSummary, ProfitabilityBand};
pub use vat::VatRegime;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::Expense;
use super::vat;
use crate::types::{floor_unit, percent_of, saturating_sum, Money, Percent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLine {
    pub id: u64,
    pub label: String,
    pub price_excl_tax: Money,
    pub vat_rate_percent: Percent,
    pub vat: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensesBreakdown {
    pub lines: Vec<ExpenseLine>,
    /// Input VAT carried by the expenses
    pub total_expense_vat: Money,
    /// Whole currency units, truncated
    pub total_expense_cost: Money,
}

/// Expense VAT. Price and rate are truncated to whole units first: expense
/// inputs are whole-currency and whole-percent only.
pub fn expense_vat(price_excl_tax: Money, vat_rate_percent: Percent) -> Money {
    vat::flat_vat(floor_unit(price_excl_tax), floor_unit(vat_rate_percent))
}

pub fn aggregate_expenses(expenses: &[Expense]) -> ExpensesBreakdown {
    let lines: Vec<ExpenseLine> = expenses.iter().map(expense_line).collect();

    let total_expense_vat = saturating_sum(lines.iter().map(|l| l.vat));
    let gross = saturating_sum(lines.iter().map(|l| l.total));

    ExpensesBreakdown {
        lines,
        total_expense_vat,
        total_expense_cost: floor_unit(gross),
    }
}

fn expense_line(expense: &Expense) -> ExpenseLine {
    let price_excl_tax = expense.price_excl_tax.value();
    let vat_rate_percent = expense.vat_rate_percent.value();
    let vat = expense_vat(price_excl_tax, vat_rate_percent);

    ExpenseLine {
        id: expense.id,
        label: expense.label.clone(),
        price_excl_tax,
        vat_rate_percent,
        vat,
        total: price_excl_tax.saturating_add(vat),
    }
}

impl ExpensesBreakdown {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Input VAT attributable to a lot holding `balance_percent` of the deal.
    pub fn vat_share(&self, balance_percent: Percent) -> Money {
        if self.total_expense_vat.is_zero() {
            return Decimal::ZERO;
        }
        percent_of(self.total_expense_vat, balance_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expense(id: u64, price: Decimal, rate: Decimal) -> Expense {
        Expense {
            id,
            label: format!("Dépense {id}"),
            price_excl_tax: price.into(),
            vat_rate_percent: rate.into(),
        }
    }

    #[test]
    fn test_single_expense() {
        let breakdown = aggregate_expenses(&[expense(1, dec!(5000), dec!(20))]);
        assert_eq!(breakdown.lines[0].vat, dec!(1000));
        assert_eq!(breakdown.lines[0].total, dec!(6000));
        assert_eq!(breakdown.total_expense_cost, dec!(6000));
        assert_eq!(breakdown.total_expense_vat, dec!(1000));
    }

    #[test]
    fn test_price_and_rate_truncated_before_vat() {
        // floor(1999.99) * floor(5.5) / 100 = 1999 * 5 / 100 = 99.95
        let breakdown = aggregate_expenses(&[expense(1, dec!(1999.99), dec!(5.5))]);
        let line = &breakdown.lines[0];
        assert_eq!(line.vat, dec!(99.95));
        // total keeps the untruncated price: 1999.99 + 99.95
        assert_eq!(line.total, dec!(2099.94));
        assert_eq!(breakdown.total_expense_cost, dec!(2099));
    }

    #[test]
    fn test_total_is_floor_of_sum() {
        let breakdown = aggregate_expenses(&[
            expense(1, dec!(1001), dec!(10)), // 1001 + 100.1
            expense(2, dec!(333), dec!(10)),  // 333 + 33.3
        ]);
        // 1101.1 + 366.3 = 1467.4
        assert_eq!(breakdown.total_expense_cost, dec!(1467));
        assert_eq!(breakdown.total_expense_vat, dec!(133.4));
    }

    #[test]
    fn test_no_expenses() {
        let breakdown = aggregate_expenses(&[]);
        assert!(breakdown.is_empty());
        assert_eq!(breakdown.total_expense_cost, Decimal::ZERO);
        assert_eq!(breakdown.vat_share(dec!(50)), Decimal::ZERO);
    }

    #[test]
    fn test_vat_share_by_balance() {
        let breakdown = aggregate_expenses(&[expense(1, dec!(5000), dec!(20))]);
        assert_eq!(breakdown.vat_share(dec!(25)), dec!(250));
        assert_eq!(breakdown.vat_share(dec!(100)), dec!(1000));
    }
}

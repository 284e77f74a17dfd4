use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use dealer_core::display::{format_currency, format_percent, format_price_per_m2, MISSING};

/// Summary, lot and expense fields holding euro amounts.
const MONEY_KEYS: [&str; 34] = [
    "purchaseTotal",
    "notaryFees",
    "acquisitionCostTotal",
    "applicationCost",
    "totalResale",
    "lotsTotalRevenue",
    "totalExpenseVat",
    "totalExpenseCost",
    "downPayment",
    "baseAmount",
    "borrowedAmount",
    "applicationFee",
    "loanInterest",
    "commitmentFees",
    "mortgageFees",
    "totalFinancing",
    "totalProjectCost",
    "turnOver",
    "margin",
    "fullVatTotal",
    "vatOnMarginTotal",
    "recoverableVatTotal",
    "totalVat",
    "marginNetVat",
    "resalePrice",
    "vatAmount",
    "totalWithVat",
    "lotMargin",
    "vatContribution",
    "priceExclTax",
    "vat",
    "total",
    "expenseVat",
    "grossResale",
];

/// Format output as tables using the tabled crate.
///
/// Scalar fields go into a `Field | Value` table; lots, expenses and other
/// arrays of objects get a table of their own, printed underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result_table(result, map),
            None => print_object(None, map),
        },
        Value::Array(arr) => print_array_table(None, arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(None, res_map),
        other => println!("{}", format_value("", other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(title: Option<&str>, map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&str, &Value)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Object(_) => nested.push((key.as_str(), val)),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                nested.push((key.as_str(), val))
            }
            _ => builder.push_record([key.as_str(), &format_value(key, val)]),
        }
    }

    if let Some(title) = title {
        println!("\n{}:", title);
    }
    println!("{}", Table::from(builder));

    for (key, val) in nested {
        match val {
            Value::Object(inner) => print_object(Some(key), inner),
            Value::Array(items) => print_array_table(Some(key), items),
            _ => {}
        }
    }
}

fn print_array_table(title: Option<&str>, arr: &[Value]) {
    if let Some(title) = title {
        println!("\n{}:", title);
    }
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_value("", item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(|v| format_value(h, v)).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

/// Render a cell. Decimal strings are shown as report figures when the key
/// says what they are.
fn format_value(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) => match Decimal::from_str(s) {
            Ok(d) if key.ends_with("Percent") => format_percent(Some(d), 2),
            Ok(d) if key == "pricePerM2" => format_price_per_m2(Some(d)),
            Ok(d) if MONEY_KEYS.contains(&key) => format_currency(Some(d), 0),
            _ => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => MISSING.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| format_value(key, v))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value_by_key() {
        assert_eq!(format_value("profitabilityPercent", &json!("24.330")), "24.33%");
        assert_eq!(format_value("pricePerM2", &json!("3750")), "3 750");
        assert_eq!(format_value("pricePerM2", &Value::Null), "-");
        assert_eq!(format_value("margin", &json!("-246917")), "-246 917 €");
        assert_eq!(format_value("loanDurationMonths", &json!("12")), "12");
        assert_eq!(format_value("name", &Value::Null), "-");
    }
}

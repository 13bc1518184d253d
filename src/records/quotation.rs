use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::analytics::ros::ros_percent;

/// The inquiry a quotation was raised from.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct InquirySnapshot {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

/// One priced leg of a quotation
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub qty: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub sell: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
}

impl LineItem {
    pub fn origin(&self) -> &str {
        self.origin.as_deref().unwrap_or("")
    }

    pub fn destination(&self) -> &str {
        self.destination.as_deref().unwrap_or("")
    }

    /// Quantity, 1 when absent. An explicit zero stays zero.
    pub fn qty(&self) -> f64 {
        self.qty.unwrap_or(1.0)
    }

    pub fn effective_sell(&self) -> f64 {
        self.sell.unwrap_or(0.0) - self.discount.unwrap_or(0.0)
    }

    pub fn effective_margin(&self) -> f64 {
        self.margin.unwrap_or(0.0) - self.discount.unwrap_or(0.0)
    }

    pub fn effective_cost(&self) -> f64 {
        self.effective_sell() - self.effective_margin()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub customer_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub inquiry_snapshot: Option<InquirySnapshot>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub lines: Vec<LineItem>,
}

/// Quantity-weighted totals across every line of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteTotals {
    pub qty: f64,
    pub sell: f64,
    pub cost: f64,
    pub margin: f64,
    pub ros: Option<f64>,
}

impl Quotation {
    /// `createdAt`, then `updatedAt`, then `date`.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.updated_at).or(self.date)
    }

    pub fn totals(&self) -> QuoteTotals {
        let mut totals = QuoteTotals {
            qty: 0.0,
            sell: 0.0,
            cost: 0.0,
            margin: 0.0,
            ros: None,
        };
        for line in &self.lines {
            let qty = line.qty();
            totals.qty += qty;
            totals.sell += line.effective_sell() * qty;
            totals.cost += line.effective_cost() * qty;
            totals.margin += line.effective_margin() * qty;
        }
        totals.ros = ros_percent(totals.sell, totals.margin);
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(qty: Option<f64>, sell: f64, discount: f64, margin: f64) -> LineItem {
        LineItem {
            origin: Some("Shanghai".into()),
            destination: Some("Rotterdam".into()),
            qty,
            sell: Some(sell),
            discount: Some(discount),
            margin: Some(margin),
        }
    }

    #[test]
    fn effective_values_subtract_discount() {
        let l = line(Some(2.0), 1000.0, 50.0, 200.0);
        assert_relative_eq!(l.effective_sell(), 950.0);
        assert_relative_eq!(l.effective_margin(), 150.0);
        assert_relative_eq!(l.effective_cost(), 800.0);
    }

    #[test]
    fn missing_numbers_use_defaults() {
        let l = LineItem::default();
        assert_relative_eq!(l.qty(), 1.0);
        assert_relative_eq!(l.effective_sell(), 0.0);
        assert_relative_eq!(l.effective_cost(), 0.0);
        assert_eq!(l.origin(), "");
    }

    #[test]
    fn totals_weight_by_quantity() {
        let q = Quotation {
            lines: vec![line(Some(2.0), 1000.0, 0.0, 100.0), line(None, 500.0, 0.0, 100.0)],
            ..Default::default()
        };
        let totals = q.totals();
        assert_relative_eq!(totals.qty, 3.0);
        assert_relative_eq!(totals.sell, 2500.0);
        assert_relative_eq!(totals.margin, 300.0);
        assert_relative_eq!(totals.cost, 2200.0);
        assert_relative_eq!(totals.ros.unwrap(), 12.0);
    }

    #[test]
    fn decodes_loose_json() {
        let q: Quotation = serde_json::from_str(
            r#"{
                "id": 42,
                "customer": "  ACME  ",
                "inquirySnapshot": "not an object",
                "createdAt": "garbage",
                "updatedAt": "2025-02-03",
                "lines": [
                    {"origin": "Shanghai", "qty": "3", "sell": "1200.5", "margin": null},
                    17,
                    {"sell": "NaN"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(q.id.as_deref(), Some("42"));
        assert!(q.inquiry_snapshot.is_none());
        assert!(q.created_at.is_none());
        assert_eq!(q.recorded_at(), crate::records::lenient::parse_timestamp("2025-02-03"));
        assert_eq!(q.lines.len(), 2);
        assert_relative_eq!(q.lines[0].qty(), 3.0);
        assert_relative_eq!(q.lines[0].effective_sell(), 1200.5);
        assert!(q.lines[1].sell.is_none());
    }

    #[test]
    fn non_array_lines_decode_as_empty() {
        let q: Quotation = serde_json::from_str(r#"{"lines": {"origin": "x"}}"#).unwrap();
        assert!(q.lines.is_empty());
    }
}

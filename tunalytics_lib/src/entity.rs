//! Entity rollups: folds records by owning wallet and computes each wallet's
//! share of the grand total.

use std::collections::HashMap;

use serde::Serialize;

use crate::metrics::percentage_of;
use crate::record::{Record, ValueField};
use crate::wallets::{palette_color, TrackedWallets};

/// Accumulated totals for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRollup {
    pub entity_id: String,
    /// Display label. `None` for entities not in the tracked set.
    pub label: Option<String>,
    pub color: String,
    pub sol_amount: f64,
    pub usdc_amount: f64,
    pub total: f64,
    pub count: usize,
    /// Share of the grand total in percent; 0 when the grand total is 0.
    pub percentage: f64,
}

impl EntityRollup {
    fn empty(entity_id: String, label: Option<String>, color: String) -> Self {
        Self {
            entity_id,
            label,
            color,
            sol_amount: 0.0,
            usdc_amount: 0.0,
            total: 0.0,
            count: 0,
            percentage: 0.0,
        }
    }

    /// The label, or the shortened address when there is none.
    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| short_address(&self.entity_id))
    }
}

/// Folds `records` by `entity_id`, descending by total.
///
/// Every wallet in `tracked` appears in the output, with zero totals if it
/// has no records. Entities outside the tracked set are appended as they are
/// first seen, unlabelled, with a palette color by slot. Ties on total are
/// ordered by entity id.
pub fn aggregate_by_entity(
    records: &[Record],
    tracked: &TrackedWallets,
    value: ValueField,
) -> Vec<EntityRollup> {
    let mut rollups: Vec<EntityRollup> = tracked
        .iter()
        .map(|w| EntityRollup::empty(w.address.clone(), Some(w.label.clone()), w.color.clone()))
        .collect();
    let mut index: HashMap<String, usize> = rollups
        .iter()
        .enumerate()
        .map(|(i, r)| (r.entity_id.clone(), i))
        .collect();

    for record in records {
        let slot = match index.get(&record.entity_id) {
            Some(&slot) => slot,
            None => {
                let slot = rollups.len();
                rollups.push(EntityRollup::empty(
                    record.entity_id.clone(),
                    None,
                    palette_color(slot).to_string(),
                ));
                index.insert(record.entity_id.clone(), slot);
                slot
            }
        };
        let entry = &mut rollups[slot];
        entry.sol_amount += record.sol_amount;
        entry.usdc_amount += record.usdc_amount;
        entry.total += record.value(value);
        entry.count += 1;
    }

    let grand_total: f64 = rollups.iter().map(|r| r.total).sum();
    for entry in &mut rollups {
        entry.percentage = percentage_of(entry.total, grand_total);
    }

    rollups.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    rollups
}

/// The first `n` rollups (already sorted by [`aggregate_by_entity`]).
pub fn top_entities(rollups: &[EntityRollup], n: usize) -> &[EntityRollup] {
    &rollups[..n.min(rollups.len())]
}

/// Shortens a wallet address to `ABCD...WXYZ`. Addresses shorter than ten
/// characters are returned unchanged.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < 10 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallets::{TrackedWallet, PALETTE};

    fn tracked(ids: &[&str]) -> TrackedWallets {
        TrackedWallets::new(
            ids.iter()
                .enumerate()
                .map(|(i, id)| TrackedWallet {
                    address: id.to_string(),
                    label: format!("Label {id}"),
                    color: PALETTE[i].to_string(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn seeded_entity_without_records_appears() {
        let records = vec![
            Record::new(0, "A").with_usd_value(50.0),
            Record::new(1, "A").with_usd_value(25.0),
        ];
        let out = aggregate_by_entity(&records, &tracked(&["A", "B"]), ValueField::UsdValue);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].entity_id, "A");
        assert_eq!(out[0].total, 75.0);
        assert_eq!(out[0].count, 2);
        assert_eq!(out[0].percentage, 100.0);
        let b = &out[1];
        assert_eq!(b.entity_id, "B");
        assert_eq!(b.total, 0.0);
        assert_eq!(b.percentage, 0.0);
        assert_eq!(b.label.as_deref(), Some("Label B"));
    }

    #[test]
    fn unknown_entities_are_unlabelled() {
        let records = vec![
            Record::new(0, "A").with_usd_value(10.0),
            Record::new(0, "stranger").with_usd_value(30.0),
        ];
        let out = aggregate_by_entity(&records, &tracked(&["A"]), ValueField::UsdValue);
        assert_eq!(out[0].entity_id, "stranger");
        assert_eq!(out[0].label, None);
        assert_eq!(out[0].color, PALETTE[1]);
        assert_eq!(out[0].percentage, 75.0);
        assert_eq!(out[1].percentage, 25.0);
    }

    #[test]
    fn zero_grand_total_gives_zero_percentages() {
        let records = vec![Record::new(0, "A"), Record::new(0, "B")];
        let out = aggregate_by_entity(&records, &TrackedWallets::empty(), ValueField::UsdValue);
        assert!(out.iter().all(|r| r.percentage == 0.0));
        assert!(out.iter().all(|r| r.percentage.is_finite()));
    }

    #[test]
    fn ties_ordered_by_entity_id() {
        let records = vec![
            Record::new(0, "zed").with_usd_value(5.0),
            Record::new(0, "amy").with_usd_value(5.0),
        ];
        let out = aggregate_by_entity(&records, &TrackedWallets::empty(), ValueField::UsdValue);
        assert_eq!(out[0].entity_id, "amy");
        assert_eq!(out[1].entity_id, "zed");
    }

    #[test]
    fn sums_configured_value() {
        let records = vec![Record::revenue(0, "A", 2.0, 10.0, 20.0)];
        let out = aggregate_by_entity(&records, &TrackedWallets::empty(), ValueField::SolAmount);
        assert_eq!(out[0].total, 2.0);
        assert_eq!(out[0].sol_amount, 2.0);
        assert_eq!(out[0].usdc_amount, 10.0);
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(aggregate_by_entity(&[], &TrackedWallets::empty(), ValueField::UsdValue).is_empty());
    }

    #[test]
    fn top_entities_clamps() {
        let records = vec![Record::new(0, "A").with_usd_value(1.0)];
        let out = aggregate_by_entity(&records, &tracked(&["A", "B", "C"]), ValueField::UsdValue);
        assert_eq!(top_entities(&out, 2).len(), 2);
        assert_eq!(top_entities(&out, 10).len(), 3);
        assert!(top_entities(&out, 0).is_empty());
    }

    #[test]
    fn short_address_format() {
        assert_eq!(
            short_address("feeMdgSZqGEbZdxWUBsZ9UXvmX4PmSvLxHoib6cKYEp"),
            "feeM...KYEp"
        );
        assert_eq!(short_address("short"), "short");
    }

    #[test]
    fn display_name_falls_back_to_short_address() {
        let records = vec![Record::new(0, "9j6dHYVg6jkWX2Ejp1i6M4HkzRqKtVdWfLNE9ZUhsUxM")];
        let out = aggregate_by_entity(&records, &TrackedWallets::empty(), ValueField::UsdValue);
        assert_eq!(out[0].display_name(), "9j6d...sUxM");
    }
}

use contracts::domain::a001_cart::{CartLineView, CartSummary, ProductId, SummaryPatch};
use contracts::domain::common::Money;
use std::collections::BTreeMap;

/// In-memory mirror of what the cart page shows.
///
/// Built once from the rendered page and kept in step with every applied
/// effect. Also hands out request sequence numbers so late responses can be
/// kept from overwriting newer aggregate values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    lines: BTreeMap<ProductId, CartLineView>,
    summary: CartSummary,
    issued_seq: u64,
    applied_seq: u64,
}

impl CartState {
    pub fn new(lines: impl IntoIterator<Item = CartLineView>, summary: CartSummary) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|line| (line.product_id.clone(), line))
                .collect(),
            summary,
            issued_seq: 0,
            applied_seq: 0,
        }
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLineView> {
        self.lines.get(product_id)
    }

    /// Track a line found after the page was bound. Known lines are kept.
    pub fn adopt_line(&mut self, line: CartLineView) -> bool {
        if self.lines.contains_key(&line.product_id) {
            return false;
        }
        self.lines.insert(line.product_id.clone(), line);
        true
    }

    pub fn summary(&self) -> &CartSummary {
        &self.summary
    }

    pub fn set_item_count(&mut self, count: u32) {
        self.summary.item_count = count;
    }

    pub fn patch_summary(&mut self, patch: &SummaryPatch) {
        self.summary.apply(patch);
    }

    /// Returns the line total after the update, if the line is known
    pub fn update_line(
        &mut self,
        product_id: &ProductId,
        quantity: Option<u32>,
        total: Option<Money>,
    ) -> Option<Money> {
        let line = self.lines.get_mut(product_id)?;
        match (quantity, total) {
            (Some(quantity), total) => line.apply_quantity(quantity, total),
            (None, Some(total)) => line.line_total = total,
            (None, None) => {}
        }
        Some(line.line_total)
    }

    pub fn remove_line(&mut self, product_id: &ProductId) -> Option<CartLineView> {
        self.lines.remove(product_id)
    }

    /// Sequence number for a request about to be sent
    pub fn issue_seq(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    /// Whether a response to request `seq` may still write aggregate values.
    /// Admitting it makes it the newest applied response.
    pub fn admit_aggregate(&mut self, seq: u64) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, quantity: u32, unit_minor: i64) -> CartLineView {
        CartLineView::new(ProductId::parse(id).unwrap(), quantity, Money::from_minor(unit_minor))
    }

    #[test]
    fn test_update_line_without_server_total_derives_it() {
        let id = ProductId::parse("a").unwrap();
        let mut state = CartState::new([line("a", 2, 999)], CartSummary::default());
        assert_eq!(state.update_line(&id, Some(3), None), Some(Money::from_minor(2997)));
        assert_eq!(state.line(&id).map(|l| l.quantity), Some(3));
    }

    #[test]
    fn test_update_unknown_line_is_none() {
        let mut state = CartState::default();
        let id = ProductId::parse("ghost").unwrap();
        assert_eq!(state.update_line(&id, Some(1), None), None);
    }

    #[test]
    fn test_stale_sequence_is_not_admitted() {
        let mut state = CartState::default();
        let first = state.issue_seq();
        let second = state.issue_seq();

        assert!(state.admit_aggregate(second));
        assert!(!state.admit_aggregate(first));
        let third = state.issue_seq();
        assert!(state.admit_aggregate(third));
    }

    #[test]
    fn test_adopt_line_keeps_known_lines() {
        let mut state = CartState::new([line("a", 2, 500)], CartSummary::default());
        assert!(!state.adopt_line(line("a", 9, 100)));
        assert_eq!(state.line(&ProductId::parse("a").unwrap()).unwrap().quantity, 2);

        assert!(state.adopt_line(line("b", 1, 250)));
        let adopted = state.line(&ProductId::parse("b").unwrap()).unwrap();
        assert_eq!(adopted.line_total, Money::from_minor(250));
    }
}

use feed::StockRecord;

use crate::record::PricePoint;
use crate::selection::Selection;

/// Normalizes `records` and keeps those matching `selection`, in input order.
///
/// Records whose date can't be parsed are dropped before matching.
pub fn filter_records(records: &[StockRecord], selection: Selection) -> Vec<PricePoint> {
    records
        .iter()
        .filter_map(PricePoint::from_record)
        .filter(|point| selection.matches(point))
        .collect()
}

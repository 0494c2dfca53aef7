pub mod axis;
pub mod curve;
pub mod scale;
pub mod scene;

use std::sync::Arc;

use enum_map::{Enum, EnumMap, enum_map};
use feed::StockRecord;
use iced_core::Color;

use crate::filter::filter_records;
use crate::record::PricePoint;
use crate::selection::Selection;
pub use scene::{MarkerId, Primitive, Scene, Tooltip};

pub const WIDTH: f32 = 700.0;
pub const HEIGHT: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

pub const MARGIN: Margin = Margin {
    top: 20.0,
    right: 100.0,
    bottom: 40.0,
    left: 40.0,
};

pub const INNER_WIDTH: f32 = WIDTH - MARGIN.left - MARGIN.right;
pub const INNER_HEIGHT: f32 = HEIGHT - MARGIN.top - MARGIN.bottom;

pub const MARKER_RADIUS: f32 = 4.0;

pub const OPEN_COLOR: Color = Color::from_rgb8(0xb2, 0xdf, 0x8a);
pub const CLOSE_COLOR: Color = Color::from_rgb8(0xe4, 0x1a, 0x1c);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Series {
    Open,
    Close,
}

impl Series {
    /// Order of the legend rows.
    pub const LEGEND: [Series; 2] = [Series::Open, Series::Close];
    /// Order in which lines and markers are laid down; later ones sit on top.
    pub const DRAW_ORDER: [Series; 2] = [Series::Close, Series::Open];

    pub fn value(self, point: &PricePoint) -> f64 {
        match self {
            Series::Open => point.open,
            Series::Close => point.close,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Series::Open => "Open",
            Series::Close => "Close",
        }
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn default_series_colors() -> EnumMap<Series, Color> {
    enum_map! {
        Series::Open => OPEN_COLOR,
        Series::Close => CLOSE_COLOR,
    }
}

/// Chart state driven by the record set and the selection.
///
/// The scene is rebuilt from scratch whenever either input changes; the
/// record set is compared by identity, the selection by value.
pub struct PriceChart {
    records: Arc<[StockRecord]>,
    selection: Selection,
    scene: Scene,
    revision: u64,
}

impl PriceChart {
    pub fn new(records: Arc<[StockRecord]>, selection: Selection) -> Self {
        let mut chart = Self {
            records,
            selection,
            scene: Scene::default(),
            revision: 0,
        };
        chart.rebuild();
        chart
    }

    /// Returns `true` when the inputs changed and the scene was rebuilt.
    pub fn sync(&mut self, records: &Arc<[StockRecord]>, selection: Selection) -> bool {
        if Arc::ptr_eq(&self.records, records) && self.selection == selection {
            return false;
        }

        self.records = Arc::clone(records);
        self.selection = selection;
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        let points = filter_records(&self.records, self.selection);

        if points.is_empty() {
            log::info!("No data for selected company and month.");
        } else {
            log::debug!(
                "Plotting {} points for {} in {}",
                points.len(),
                self.selection.company,
                self.selection.month
            );
        }

        self.scene = Scene::build(points);
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Bumped on every rebuild.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{Company, Month};

    fn records() -> Arc<[StockRecord]> {
        vec![
            StockRecord::new("Apple", "2023-11-01", "170.00", "173.97"),
            StockRecord::new("Apple", "2023-11-02", "175.52", "177.57"),
            StockRecord::new("Apple", "2023-11-03", "150.00", "152.50"),
            StockRecord::new("Microsoft", "2023-11-01", "339.79", "346.07"),
            StockRecord::new("Microsoft", "2023-11-02", "347.24", "348.32"),
        ]
        .into()
    }

    #[test]
    fn builds_on_mount() {
        let chart = PriceChart::new(records(), Selection::default());

        assert_eq!(chart.revision(), 1);
        assert_eq!(chart.scene().points().len(), 3);
    }

    #[test]
    fn unchanged_inputs_do_not_rebuild() {
        let records = records();
        let mut chart = PriceChart::new(Arc::clone(&records), Selection::default());

        assert!(!chart.sync(&records, Selection::default()));
        assert_eq!(chart.revision(), 1);
    }

    #[test]
    fn selection_change_replaces_the_scene() {
        let records = records();
        let mut chart = PriceChart::new(Arc::clone(&records), Selection::default());
        let apple = chart.scene().clone();

        let msft = Selection::new(Company::Microsoft, Month::November);
        assert!(chart.sync(&records, msft));
        assert_eq!(chart.revision(), 2);
        assert_eq!(chart.scene().points().len(), 2);
        assert_ne!(chart.scene(), &apple);

        assert!(chart.sync(&records, Selection::default()));
        assert_eq!(chart.scene(), &apple);
    }

    #[test]
    fn new_record_set_rebuilds_even_when_equal() {
        let mut chart = PriceChart::new(records(), Selection::default());

        assert!(chart.sync(&records(), Selection::default()));
        assert_eq!(chart.revision(), 2);
    }

    #[test]
    fn empty_selection_clears_everything() {
        let records = records();
        let mut chart = PriceChart::new(Arc::clone(&records), Selection::default());

        chart.sync(&records, Selection::new(Company::Google, Month::November));

        assert!(chart.scene().is_empty());
        assert!(chart.scene().primitives().is_empty());
    }
}

use std::path::Path;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{
    customer_clusters, payment_distribution, top_cities, CategoryCount, ClusterCounts,
};
use crate::data::filter::{apply_filter, selectable_payment_types, FilterSpec, PaymentFilter};
use crate::data::loader::load_file;
use crate::data::model::TransactionTable;
use crate::data::stats::{describe_payments, Summary};

// ---------------------------------------------------------------------------
// Derived view – everything one render pass draws
// ---------------------------------------------------------------------------

/// Aggregates of the currently filtered rows.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub row_count: usize,
    pub top_cities: Vec<CategoryCount>,
    pub payments: Vec<CategoryCount>,
    pub clusters: ClusterCounts,
    pub statistics: Vec<(&'static str, Summary)>,
}

impl DashboardView {
    pub fn compute(filtered: &TransactionTable, config: &DashboardConfig) -> Self {
        DashboardView {
            row_count: filtered.len(),
            top_cities: top_cities(filtered, config.top_city_limit),
            payments: payment_distribution(filtered),
            clusters: customer_clusters(filtered, &config.thresholds),
            statistics: describe_payments(filtered),
        }
    }

    /// The filter matched nothing.  Not an error; the UI shows a notice.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<TransactionTable>,

    /// Active filter.
    pub filter: FilterSpec,

    /// Payment types offered by the selector ("All" is implicit).
    pub payment_options: Vec<String>,

    /// Aggregates of the filtered rows (cached until the filter changes).
    pub view: DashboardView,

    /// Colours for payment-type slices, stable across filter changes.
    pub payment_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            filter: FilterSpec::covering(&TransactionTable::default()),
            payment_options: Vec::new(),
            view: DashboardView::default(),
            payment_colors: None,
            status_message: None,
        }
    }

    /// Load the configured data path.
    pub fn load_configured(&mut self) {
        let path = self.config.data_path.clone();
        self.load_path(&path);
    }

    /// Load `path`, replacing the current dataset on success.  On failure
    /// the previous dataset is dropped so no stale charts remain.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.dataset = None;
                self.view = DashboardView::default();
                self.payment_options.clear();
                self.payment_colors = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the filter to cover it.
    pub fn set_dataset(&mut self, dataset: TransactionTable) {
        self.filter = FilterSpec::covering(&dataset);
        self.payment_options = selectable_payment_types(&dataset);
        self.payment_colors = Some(ColorMap::new(&self.payment_options));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let filtered = apply_filter(ds, &self.filter);
        log::debug!(
            "Filter {} .. {} / {} kept {} of {} rows",
            self.filter.start,
            self.filter.end,
            self.filter.payment,
            filtered.len(),
            ds.len()
        );
        self.view = DashboardView::compute(&filtered, &self.config);
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        if self.filter.start != start || self.filter.end != end {
            self.filter.start = start;
            self.filter.end = end;
            self.refilter();
        }
    }

    pub fn set_payment(&mut self, payment: PaymentFilter) {
        if self.filter.payment != payment {
            self.filter.payment = payment;
            self.refilter();
        }
    }

    /// Back to the full date span and "All".
    pub fn reset_filter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filter = FilterSpec::covering(ds);
            self.refilter();
        }
    }
}

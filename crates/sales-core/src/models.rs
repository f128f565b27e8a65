use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A parsed integer value, or `None` when the source line was not numeric.
///
/// `None` poisons arithmetic: any sum or product that touches it is `None`.
pub type Figure = Option<i64>;

// ── Category ──────────────────────────────────────────────────────────────────

/// Product category a sale is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Basic cupcakes.
    Basic,
    /// Deluxe cupcakes.
    Deluxe,
    /// Remainder of the day's total not explained by the known categories.
    Other,
}

/// Static description of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Display label.
    pub label: &'static str,
    /// Price of one unit, `None` for the derived `Other` category.
    pub unit_price: Option<i64>,
}

const BASIC_INFO: CategoryInfo = CategoryInfo {
    label: "Basic",
    unit_price: Some(5),
};

const DELUXE_INFO: CategoryInfo = CategoryInfo {
    label: "Deluxe",
    unit_price: Some(6),
};

const OTHER_INFO: CategoryInfo = CategoryInfo {
    label: "Other",
    unit_price: None,
};

impl Category {
    /// Categories with a reported unit count and a fixed price.
    pub const KNOWN: [Category; 2] = [Category::Basic, Category::Deluxe];

    /// Every category, derived ones included.
    pub const ALL: [Category; 3] = [Category::Basic, Category::Deluxe, Category::Other];

    /// Look up the label and unit price for this category.
    pub fn info(self) -> &'static CategoryInfo {
        match self {
            Category::Basic => &BASIC_INFO,
            Category::Deluxe => &DELUXE_INFO,
            Category::Other => &OTHER_INFO,
        }
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn unit_price(self) -> Option<i64> {
        self.info().unit_price
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── SalesRecord ───────────────────────────────────────────────────────────────

/// One day of sales figures read from a point-of-sale export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Calendar day the figures belong to.
    pub date: NaiveDate,
    /// Total takings for the day, in whole currency units.
    pub total_sales: Figure,
    /// Basic cupcakes sold.
    pub basic_sold: Figure,
    /// Deluxe cupcakes sold.
    pub deluxe_sold: Figure,
}

impl SalesRecord {
    pub fn new(date: NaiveDate, total_sales: Figure, basic_sold: Figure, deluxe_sold: Figure) -> Self {
        Self {
            date,
            total_sales,
            basic_sold,
            deluxe_sold,
        }
    }

    /// Units sold in `category`. `Other` has no unit count.
    pub fn units_sold(&self, category: Category) -> Figure {
        match category {
            Category::Basic => self.basic_sold,
            Category::Deluxe => self.deluxe_sold,
            Category::Other => None,
        }
    }

    /// Revenue attributed to `category`.
    ///
    /// Known categories are `units * unit_price`. `Other` is whatever is left
    /// of the total once the known categories are taken out, and may be
    /// negative when the export is inconsistent.
    pub fn category_revenue(&self, category: Category) -> Figure {
        match category.unit_price() {
            Some(price) => self.units_sold(category)?.checked_mul(price),
            None => Category::KNOWN
                .iter()
                .try_fold(self.total_sales?, |remaining, &known| {
                    remaining.checked_sub(self.category_revenue(known)?)
                }),
        }
    }

    pub fn other_revenue(&self) -> Figure {
        self.category_revenue(Category::Other)
    }

    /// `true` when any reported field failed to parse.
    pub fn is_corrupted(&self) -> bool {
        self.total_sales.is_none() || self.basic_sold.is_none() || self.deluxe_sold.is_none()
    }
}

/// Sum `figures`, yielding `None` if any of them is `None`.
pub fn sum_figures<I>(figures: I) -> Figure
where
    I: IntoIterator<Item = Figure>,
{
    figures
        .into_iter()
        .try_fold(0i64, |acc, figure| acc.checked_add(figure?))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

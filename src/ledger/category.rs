use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether amounts filed under a category count as spending or income.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CategoryKind {
    #[default]
    Expense,
    Income,
}

impl CategoryKind {
    /// Forces the sign of `amount` to match the kind. Zero stays zero.
    pub fn normalize_amount(self, amount: f64) -> f64 {
        if amount == 0.0 {
            return 0.0;
        }
        match self {
            CategoryKind::Expense => -amount.abs(),
            CategoryKind::Income => amount.abs(),
        }
    }
}

/// Groups transactions for filtering and per-category budgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "Category::default_icon")]
    pub icon: String,
    #[serde(default = "Category::default_color")]
    pub color_hex: String,
    #[serde(default)]
    pub sort_index: i32,
    #[serde(default)]
    pub kind: CategoryKind,
}

/// Seed list used on first run: name, icon, colour, kind.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str, CategoryKind); 6] = [
    ("Dining", "fork.knife", "#F59E0B", CategoryKind::Expense),
    ("Transport", "car", "#3B82F6", CategoryKind::Expense),
    ("Bills", "bolt", "#EF4444", CategoryKind::Expense),
    ("Income", "banknote", "#22C55E", CategoryKind::Income),
    ("Entertainment", "gamecontroller", "#A855F7", CategoryKind::Expense),
    ("Shopping", "bag", "#E879F9", CategoryKind::Expense),
];

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: Self::default_icon(),
            color_hex: Self::default_color(),
            sort_index: 0,
            kind,
        }
    }

    pub fn with_style(mut self, icon: impl Into<String>, color_hex: impl Into<String>) -> Self {
        self.icon = icon.into();
        self.color_hex = color_hex.into();
        self
    }

    pub fn with_sort_index(mut self, sort_index: i32) -> Self {
        self.sort_index = sort_index;
        self
    }

    /// The default categories in canonical order.
    pub fn defaults() -> Vec<Category> {
        DEFAULT_CATEGORIES
            .iter()
            .enumerate()
            .map(|(idx, (name, icon, color, kind))| {
                Category::new(*name, *kind)
                    .with_style(*icon, *color)
                    .with_sort_index(idx as i32)
            })
            .collect()
    }

    pub fn default_icon() -> String {
        "tray".into()
    }

    pub fn default_color() -> String {
        "#4F46E5".into()
    }
}

/// Ordering used wherever categories are listed: sort index, then name.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.sort_index
            .cmp(&b.sort_index)
            .then_with(|| a.name.cmp(&b.name))
    });
}

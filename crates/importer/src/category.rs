use std::collections::HashMap;
use std::sync::LazyLock;

/// Spending category of a transaction. Only the N26 export carries
/// categories; the CSV sources always report the default.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    Miscellaneous,
    Atm,
    Business,
    FoodGroceries,
    Income,
    LeisureEntertainment,
    SavingsInvestments,
    Shopping,
    TransportCar,
    BarsRestaurants,
    TravelHolidays,
}

// Read-only, process-wide table. There is deliberately no write path.
static SOURCE_TAGS: LazyLock<HashMap<&'static str, Category>> = LazyLock::new(|| {
    HashMap::from([
        ("micro-v2-atm", Category::Atm),
        ("micro-v2-business", Category::Business),
        ("micro-v2-food-groceries", Category::FoodGroceries),
        ("micro-v2-income", Category::Income),
        ("micro-v2-leisure-entertainment", Category::LeisureEntertainment),
        ("micro-v2-miscellaneous", Category::Miscellaneous),
        ("micro-v2-savings-investments", Category::SavingsInvestments),
        ("micro-v2-shopping", Category::Shopping),
        ("micro-v2-transport-car", Category::TransportCar),
        ("micro-v2-bars-restaurants", Category::BarsRestaurants),
        ("micro-v2-travel-holidays", Category::TravelHolidays),
    ])
});

impl Category {
    /// Looks up a source category tag. Tags the table does not know map to
    /// `Miscellaneous`; new tags appearing in an export must never break an
    /// import.
    pub fn from_source_tag(tag: &str) -> Category {
        SOURCE_TAGS.get(tag).copied().unwrap_or_default()
    }
}

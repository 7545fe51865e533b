use serde::{Deserialize, Serialize};

/// The fixed set of transaction categories.
///
/// The ledger stores the category as text and does not enforce membership; this enum is the
/// source of the values offered at the input boundary. The display form (e.g. `Eating Out`) is
/// what gets written to the `category` column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Category {
    Salary,
    Rent,
    Broadband,
    Phone,
    Electricity,
    Water,
    Food,
    #[serde(rename = "Eating Out")]
    EatingOut,
    Car,
    Insurance,
    Medical,
    Laundry,
    Trip,
    General,
    Gym,
    Dividends,
    Remittance,
    Lotto,
    Electronics,
    School,
    Childcare,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// All categories, in the order they are presented to the user.
    pub const ALL: [Category; 21] = [
        Category::Salary,
        Category::Rent,
        Category::Broadband,
        Category::Phone,
        Category::Electricity,
        Category::Water,
        Category::Food,
        Category::EatingOut,
        Category::Car,
        Category::Insurance,
        Category::Medical,
        Category::Laundry,
        Category::Trip,
        Category::General,
        Category::Gym,
        Category::Dividends,
        Category::Remittance,
        Category::Lotto,
        Category::Electronics,
        Category::School,
        Category::Childcare,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_count() {
        assert_eq!(Category::ALL.len(), 21);
    }

    #[test]
    fn test_display_uses_spaced_name() {
        assert_eq!(Category::EatingOut.to_string(), "Eating Out");
        assert_eq!(Category::Food.to_string(), "Food");
    }

    #[test]
    fn test_from_str_round_trip() {
        for category in Category::ALL {
            let parsed = Category::from_str(&category.to_string()).unwrap();
            assert_eq!(category, parsed);
        }
    }
}

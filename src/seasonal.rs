/// Crops suggested for sowing in each month, January first.
static PLANTING: [[&str; 3]; 12] = [
    ["Lettuce", "Kale", "Radish"],
    ["Carrot", "Beetroot", "Parsley"],
    ["Broccoli", "Spinach", "Pea"],
    ["Garlic", "Onion", "Strawberry"],
    ["Cauliflower", "Cabbage", "Bean"],
    ["Corn", "Pumpkin", "Cucumber"],
    ["Potato", "Tomato", "Bell pepper"],
    ["Watermelon", "Melon", "Okra"],
    ["Eggplant", "Scarlet eggplant", "Green bean"],
    ["Rice", "Peanut", "Soybean"],
    ["Cassava", "Yam", "Sweet potato"],
    ["Sunflower", "Sesame", "Chia"],
];

/// Planting suggestions for `month` (1-12). Out-of-range months get a generic hint.
pub fn planting_suggestions(month: u32) -> &'static [&'static str] {
    match month {
        1..=12 => PLANTING[(month - 1) as usize].as_slice(),
        _ => &["Leafy greens"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_month_has_three_crops() {
        for month in 1..=12 {
            assert_eq!(planting_suggestions(month).len(), 3);
        }
        assert_eq!(planting_suggestions(2)[0], "Carrot");
        assert_eq!(planting_suggestions(0), &["Leafy greens"]);
    }
}

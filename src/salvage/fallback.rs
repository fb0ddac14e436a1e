use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Comparison;
use crate::parsers::format_quantity;

/// Grim physical goods with a rough unit cost in USD.
type Template = (&'static str, f64);

const SMALL_TICKET: &[Template] = &[
    ("disposable syringes", 0.50),
    ("hospital wristbands", 0.25),
    ("emergency ration bars", 2.00),
    ("rolls of surgical tape", 3.00),
    ("bags of saline solution", 6.00),
    ("tourniquets", 8.00),
    ("gas mask filters", 15.00),
    ("boxes of latex gloves", 9.00),
    ("body bag zippers", 1.50),
];

const MID_TICKET: &[Template] = &[
    ("pints of donated blood", 300.0),
    ("nights in a hospital bed", 2_500.0),
    ("bulletproof vests", 700.0),
    ("ambulance rides", 1_200.0),
    ("budget caskets", 2_000.0),
    ("military gas masks", 150.0),
    ("kidney dialysis sessions", 500.0),
    ("granite tombstones", 1_800.0),
    ("secondhand wheelchairs", 250.0),
    ("water purifiers for flood zones", 90.0),
];

const BIG_TICKET: &[Template] = &[
    ("kidney transplants", 400_000.0),
    ("armored SUVs", 250_000.0),
    ("family mausoleums", 150_000.0),
    ("fully stocked ambulances", 120_000.0),
    ("backyard bomb shelters", 60_000.0),
    ("morgue freezer units", 30_000.0),
    ("mobile field hospitals", 2_000_000.0),
    ("years of ICU care", 1_500_000.0),
    ("hearses", 90_000.0),
];

fn band(price: f64) -> &'static [Template] {
    if price < 100.0 {
        SMALL_TICKET
    } else if price < 100_000.0 {
        MID_TICKET
    } else {
        BIG_TICKET
    }
}

/// 6-8 comparisons computed locally from the price band.
///
/// Has no failure mode, which makes it the floor of the salvage chain.
pub fn dark_fallback_comparisons<R: Rng>(price: f64, rng: &mut R) -> Vec<Comparison> {
    let mut templates: Vec<&Template> = band(price).iter().collect();
    templates.shuffle(rng);

    let count = rng.gen_range(6..=8).min(templates.len());
    templates
        .into_iter()
        .take(count)
        .map(|(label, unit_cost)| {
            Comparison::from_text(format!("{} {}", format_quantity(price / unit_cost), label))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn picks_from_the_matching_band() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = dark_fallback_comparisons(20_000.0, &mut rng);

        assert!((6..=8).contains(&picked.len()));
        for comparison in &picked {
            let label = comparison.text.split_once(' ').map(|(_, l)| l).unwrap();
            assert!(MID_TICKET.iter().any(|(l, _)| *l == label));
        }
    }

    #[test]
    fn texts_start_with_a_quantity() {
        let mut rng = StdRng::seed_from_u64(2);
        for price in [0.3, 45.0, 9_999.0, 7_000_000.0] {
            for comparison in dark_fallback_comparisons(price, &mut rng) {
                assert!(comparison.text.chars().next().unwrap().is_ascii_digit());
            }
        }
    }
}

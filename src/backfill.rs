use rand::Rng;
use tracing::debug;

use crate::models::{Comparison, EstimateKind, ItemType, MIN_COMPARISONS};
use crate::storage::RecencySnapshot;

/// Ten stock comparisons sized to the price band.
pub fn price_backups(price: f64) -> Vec<Comparison> {
    let entries: Vec<(String, &str)> = if price < 5.0 {
        vec![
            (format!("{:.0} pieces of gum", price / 0.25), "🍬"),
            (format!("{:.1} newspaper pages", price / 0.50), "📰"),
            (format!("{:.1} dollar store items", price / 1.00), "🏪"),
            (format!("{:.1} public bathroom fees", price / 1.50), "🚽"),
            (format!("{:.1} vending machine snacks", price / 0.75), "🍫"),
            (format!("{:.0} minutes of public parking", price / 0.10), "🅿️"),
            (format!("{:.0} thoughts and prayers", price / 0.05), "🙏"),
            (format!("{:.1} cheap plastic toys", price / 1.00), "🧸"),
            (format!("{:.1} spam emails", price / 0.30), "📧"),
            (format!("{:.1} app store purchases", price / 0.99), "📱"),
        ]
    } else if price < 20.0 {
        vec![
            (format!("{:.1} fast food meals", price / 5.00), "🍔"),
            (format!("{:.1} fancy coffees", price / 4.50), "☕"),
            (format!("{:.1} cheap wine bottles", price / 7.50), "🍷"),
            (format!("{:.1} gallons of milk", price / 3.99), "🥛"),
            (format!("{:.1} movie tickets", price / 12.00), "🎬"),
            (format!("{:.1} basic t-shirts", price / 10.00), "👕"),
            (format!("{:.1} cheap phone chargers", price / 8.99), "🔌"),
            (format!("{:.1} large pizzas", price / 15.00), "🍕"),
            (format!("{:.1} monthly streaming subscriptions", price / 9.99), "📺"),
            (format!("{:.1} cheap paperbacks", price / 4.99), "📚"),
        ]
    } else if price < 100.0 {
        vec![
            (format!("{:.1} premium steaks", price / 35.00), "🥩"),
            (format!("{:.1} gas station fill-ups", price / 50.00), "⛽"),
            (format!("{:.1} fast food family meals", price / 25.00), "🍟"),
            (format!("{:.1} concert t-shirts", price / 45.00), "👕"),
            (format!("{:.1} cheap wireless earbuds", price / 75.00), "🎧"),
            (format!("{:.1} used vinyl records", price / 30.00), "💿"),
            (format!("{:.1} cheap sunglasses", price / 60.00), "🕶️"),
            (format!("{:.1} sketchy haircuts", price / 40.00), "💇"),
            (format!("{:.1} drug store makeup sets", price / 20.00), "💄"),
            (format!("{:.1} monthly gym memberships", price / 85.00), "🏋️"),
        ]
    } else if price < 1_000.0 {
        vec![
            (format!("{:.1} cheap shoes", price / 200.0), "👟"),
            (format!("{:.1} fancy dinners", price / 150.0), "🍽️"),
            (format!("{:.1} budget smartphones", price / 500.0), "📱"),
            (format!("{:.1} textbooks", price / 300.0), "📚"),
            (format!("{:.1} therapy sessions", price / 250.0), "🛋️"),
            (format!("{:.1} car repairs", price / 450.0), "🔧"),
            (format!("{:.1} concert tickets", price / 350.0), "🎵"),
            (format!("{:.1} cheap tattoos", price / 100.0), "🎨"),
            (format!("{:.1} vintage leather jackets", price / 600.0), "🧥"),
            (format!("{:.1} binge drinking weekends", price / 800.0), "🍻"),
        ]
    } else if price < 10_000.0 {
        vec![
            (format!("{:.1} monthly rent payments", price / 1_200.0), "🏠"),
            (format!("{:.1} budget vacations", price / 2_000.0), "🏖️"),
            (format!("{:.1} designer handbags", price / 1_500.0), "👜"),
            (format!("{:.1} used motorcycles", price / 5_000.0), "🏍️"),
            (format!("{:.1} gaming computers", price / 3_000.0), "🖥️"),
            (format!("{:.1} cheap used cars", price / 8_000.0), "🚗"),
            (format!("{:.1} professional camera setups", price / 4_000.0), "📷"),
            (format!("{:.1} months of child support", price / 1_800.0), "👶"),
            (format!("{:.1} emergency room visits", price / 6_000.0), "🏥"),
            (format!("{:.1} failed small business attempts", price / 7_000.0), "📉"),
        ]
    } else if price < 100_000.0 {
        vec![
            (format!("{:.1} used sedans", price / 20_000.0), "🚗"),
            (format!("{:.1} college semesters", price / 15_000.0), "🎓"),
            (format!("{:.1} budget weddings", price / 25_000.0), "💍"),
            (format!("{:.1} luxury kitchen renovations", price / 30_000.0), "🔪"),
            (format!("{:.1} budget divorce settlements", price / 50_000.0), "💔"),
            (format!("{:.1} tiny homes", price / 40_000.0), "🏡"),
            (format!("{:.1} years of streaming subscriptions", price / 12_000.0), "📺"),
            (format!("{:.1} high-end bathroom renovations", price / 35_000.0), "🚿"),
            (format!("{:.1} premium gaming setups", price / 10_000.0), "🎮"),
            (format!("{:.1} luxury watches", price / 45_000.0), "⌚"),
        ]
    } else {
        vec![
            (format!("{:.1} Porsche 911s", price / 120_000.0), "🏎️"),
            (format!("{:.2} average suburban homes", price / 500_000.0), "🏡"),
            (format!("{:.1} master's degrees", price / 250_000.0), "🎓"),
            (format!("{:.1} luxury SUVs", price / 200_000.0), "🚙"),
            (format!("{:.1} major medical procedures", price / 150_000.0), "🏥"),
            (format!("{:.2} typical retirement funds", price / 1_000_000.0), "👴"),
            (format!("{:.1} average divorce settlements", price / 350_000.0), "💔"),
            (format!("{:.2} small beach houses", price / 750_000.0), "🏖️"),
            (format!("{:.1} luxury boats", price / 180_000.0), "⛵"),
            (format!("{:.1} helicopter rides to skip traffic", price / 300_000.0), "🚁"),
        ]
    };

    into_comparisons(entries)
}

/// Ten stock comparisons for a person's net worth; fortunes of a hundred
/// million and up get the extravagant set.
pub fn net_worth_backups(net_worth: f64) -> Vec<Comparison> {
    let entries: Vec<(String, &str)> = if net_worth < 100_000_000.0 {
        vec![
            (format!("{:.1} luxury sports cars", net_worth / 500_000.0), "🏎️"),
            (format!("{:.1} high-end apartments", net_worth / 1_000_000.0), "🏢"),
            (format!("{:.1} luxury yachts", net_worth / 3_000_000.0), "⛵"),
            (format!("{:.0} average american salaries", net_worth / 10_000.0), "💰"),
            (format!("{:.1} political campaigns", net_worth / 2_000_000.0), "🗳️"),
            (format!("{:.0} epic shopping sprees", net_worth / 5_000.0), "🛍️"),
            (format!("{:.0} college educations", net_worth / 250_000.0), "🎓"),
            (format!("{:.1} private jets", net_worth / 5_000_000.0), "✈️"),
            (format!("{:.1} super yachts", net_worth / 15_000_000.0), "🚢"),
            (format!("{:.1} hospital wings", net_worth / 20_000_000.0), "🏥"),
        ]
    } else {
        vec![
            (format!("{:.1} private jets", net_worth / 5_000_000.0), "✈️"),
            (format!("{:.1} private islands", net_worth / 25_000_000.0), "🏝️"),
            (format!("{:.2} professional sports teams", net_worth / 100_000_000.0), "🏆"),
            (format!("{:.1} hospital wings", net_worth / 20_000_000.0), "🏥"),
            (format!("{:.1} celebrity mansions", net_worth / 50_000_000.0), "🏰"),
            (format!("{:.1} super yachts", net_worth / 15_000_000.0), "🚢"),
            (format!("{:.2} skyscrapers", net_worth / 1_000_000_000.0), "🌃"),
            (format!("{:.1} failed startups", net_worth / 30_000_000.0), "📉"),
            (format!("{:.0} average american salaries", net_worth / 10_000.0), "💰"),
            (format!("{:.0} college educations", net_worth / 250_000.0), "🎓"),
        ]
    };

    into_comparisons(entries)
}

fn into_comparisons(entries: Vec<(String, &str)>) -> Vec<Comparison> {
    entries
        .into_iter()
        .map(|(text, emoji)| Comparison::with_emoji(text, emoji))
        .collect()
}

/// Tops a short result up to the minimum size from the stock tables.
///
/// `used_types` holds every item type already claimed by this request,
/// including accepted comparisons that were trimmed from the display set.
/// Returns the item types of the backups that were added.
pub fn fill<R: Rng>(
    comparisons: &mut Vec<Comparison>,
    used_types: &[ItemType],
    price: f64,
    kind: EstimateKind,
    history: &RecencySnapshot,
    rng: &mut R,
) -> Vec<ItemType> {
    if comparisons.len() >= MIN_COMPARISONS {
        return Vec::new();
    }

    let mut pool = match kind {
        EstimateKind::NetWorth => net_worth_backups(price),
        EstimateKind::Item => price_backups(price),
    };
    let mut shown: Vec<ItemType> = comparisons.iter().map(Comparison::item_type).collect();
    let mut claimed: Vec<ItemType> = used_types.to_vec();
    let mut added = Vec::new();

    while comparisons.len() < MIN_COMPARISONS {
        let unused: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, backup)| {
                let backup_type = backup.item_type();
                !shown.iter().any(|t| t.overlaps(&backup_type))
                    && !claimed.contains(&backup_type)
                    && !history.has_seen_type(&backup_type)
            })
            .map(|(index, _)| index)
            .collect();

        if unused.is_empty() {
            debug!(count = comparisons.len(), "backup pool exhausted");
            break;
        }

        let pick = unused[rng.gen_range(0..unused.len())];
        let backup = pool.swap_remove(pick);
        let backup_type = backup.item_type();

        shown.push(backup_type.clone());
        claimed.push(backup_type.clone());
        added.push(backup_type);
        comparisons.push(backup);
    }

    added
}

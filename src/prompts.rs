//! Prompt text sent to the model.

use crate::models::EstimateKind;

pub const ETHICS_SYSTEM_PROMPT: &str = r#"You must determine if assigning a monetary value to the following concept is ethical or appropriate.
Respond with ONLY "YES" or "NO".

YES = It is ethical and appropriate to assign a price to this (like products, services, commodities)
NO = It is unethical or inappropriate to assign a price to this (like people, relationships, human rights)

Answer "NO" for:
- People (wife, husband, friend)
- Human relationships (marriage, friendship)
- Human attributes (love, health, happiness)
- Human rights (freedom, dignity)

Answer "YES" for:
- Products (phone, car)
- Services (cleaning, consulting)
- Commodities (gold, coffee)
- Properties (house, land)"#;

pub const ESTIMATE_SYSTEM_PROMPT: &str =
    "You are a factual price database. Return only numerical price estimates with no text.";

pub fn ethics_user_prompt(item: &str) -> String {
    format!("Can I ethically assign a monetary value to: {}?", item)
}

pub fn estimate_user_prompt(item: &str, country: Option<&str>, kind: EstimateKind) -> String {
    match kind {
        EstimateKind::NetWorth => format!(
            r#"Estimate the net worth in USD for the person: {item}.

Be very factual and accurate. Give only a number, no text. If you're not sure, estimate based on their profession or status.

Examples:
- Donald Trump: 2500000000
- Taylor Swift: 1200000000
- An average doctor: 1500000
- A typical teacher: 250000

Return only the number with no currency symbol, commas, or other text."#
        ),
        EstimateKind::Item => format!(
            r#"Estimate the realistic average price in USD for: {item}{location}.

Be very factual and accurate accounting for country-specific pricing. Give only a number, no text.

Examples with country variations:
- Porsche 911 in USA: 120000
- Porsche 911 in Singapore: 440000
- iPhone 15 Pro in USA: 999
- iPhone 15 Pro in Brazil: 1800
- Big Mac in USA: 5.15
- Big Mac in Switzerland: 13.00
- Coffee at Starbucks in USA: 4.75
- Coffee at Starbucks in UAE: 6.80
- Rent for 1-bedroom in NYC: 3500
- Rent for 1-bedroom in Bangkok: 650

Return only the number with no currency symbol, commas, or other text."#,
            location = location_suffix(country)
        ),
    }
}

pub fn comparison_system_prompt(item: &str, price: f64, country: Option<&str>) -> String {
    format!(
        r#"You are the backend for "Is It Worth It?", a financial reality check app built on TANGIBLE COMPARISONS WITH SHOCK VALUE.

CONTEXT:
- Item: "{item}"
- Price: ${price:.2}
- Country: {country}

CREATE 7-8 MIXED TANGIBLE COMPARISONS that start with a number and draw from two pools of physical things:

POOL A - EVERYDAY RETAIL GOODS:
- Fast food (Big Macs, Starbucks coffees)
- Common clothing (jeans, t-shirts, sneakers)
- Popular electronics (iPhones, game consoles)
- Basic groceries (gallons of milk, loaves of bread)
- Common services (haircuts, movie tickets, taxi rides)

POOL B - VISCERAL / DARK PHYSICAL ITEMS:
- Body-related goods (pints of donated blood, kidney dialysis sessions)
- Medical supplies (syringes, hospital beds, caskets)
- Protective gear (bulletproof vests, gas masks)
- Survival supplies (water purifiers, emergency rations)

BALANCE: roughly half from each pool, all of them physical things.

REFERENCE QUANTITIES FOR THIS PRICE:
{examples}

FORMAT RULES:
1. Keep each comparison under 60 CHARACTERS
2. START with a NUMBER
3. Describe ONLY PHYSICAL OBJECTS (not situations or concepts)
4. No brackets or parentheses
5. Exactly one emoji per comparison

YOUR RESPONSE MUST BE VALID JSON:
{{
  "price": {price},
  "comparisons": [
    {{"text": "44,000 Big Macs from McDonald's", "emoji": "🍔"}},
    {{"text": "8,800 pints of donated blood", "emoji": "🩸"}},
    {{"text": "5,500 PlayStation 5 consoles", "emoji": "🎮"}}
  ]
}}"#,
        country = country.unwrap_or("Global"),
        examples = price_reference_examples(price),
    )
}

pub fn comparison_user_prompt(item: &str, price: f64, country: Option<&str>) -> String {
    format!(
        "Generate blunt, unsettling but physical comparisons for {}{}. Price: ${:.2}. Tangible objects only, no crypto. VALID JSON ONLY!",
        item,
        location_suffix(country),
        price
    )
}

fn location_suffix(country: Option<&str>) -> String {
    country.map(|c| format!(" in {}", c)).unwrap_or_default()
}

/// Worked quantities for the price band so the model sees the arithmetic.
pub fn price_reference_examples(price: f64) -> String {
    let lines: Vec<String> = if price < 10.0 {
        vec![
            format!("{:.1} newspapers", price / 2.0),
            format!("{:.1} cheap pens", price / 1.5),
            format!("{:.1} loaves of bread", price / 3.5),
            format!("{:.0} gumballs from a machine", price / 0.25),
            format!("{:.1} bus fare tokens", price / 1.5),
        ]
    } else if price < 100.0 {
        vec![
            format!("{:.1} Big Macs", price / 5.15),
            format!("{:.1} movie tickets", price / 12.0),
            format!("{:.1} fancy coffees", price / 4.5),
            format!("{:.1} large pizzas", price / 15.0),
            format!("{:.1} cheap bottles of wine", price / 5.0),
        ]
    } else if price < 1_000.0 {
        vec![
            format!("{:.0} premium steaks", price / 35.0),
            format!("{:.1} cheap shoes", price / 50.0),
            format!("{:.1} concert tickets", price / 100.0),
            format!("{:.1} monthly grocery bills", price / 150.0),
            format!("{:.1} cheap hotel nights", price / 200.0),
        ]
    } else if price < 10_000.0 {
        vec![
            format!("{:.2} months of rent", price / 1_000.0),
            format!("{:.1} smartphone replacements", price / 800.0),
            format!("{:.1} weekend getaways", price / 1_200.0),
            format!("{:.2} cheap international flights", price / 2_000.0),
            format!("{:.2} used appliance sets", price / 3_000.0),
        ]
    } else if price < 100_000.0 {
        vec![
            format!("{:.2} cheap used cars", price / 20_000.0),
            format!("{:.2} college semesters", price / 15_000.0),
            format!("{:.2} wedding ceremonies", price / 25_000.0),
            format!("{:.2} years of average rent", price / 30_000.0),
        ]
    } else {
        vec![
            format!("{:.1} luxury SUVs", price / 50_000.0),
            format!("{:.2} small houses in rural areas", price / 100_000.0),
            format!("{:.2} years of average salary", price / 80_000.0),
            format!("{:.2} four-year college educations", price / 150_000.0),
            format!("{:.3} retirement funds", price / 400_000.0),
        ]
    };

    lines
        .iter()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_prompt_is_localized() {
        let prompt = estimate_user_prompt("a goldfish", Some("us"), EstimateKind::Item);
        assert!(prompt.contains("for: a goldfish in us."));

        let global = estimate_user_prompt("a goldfish", None, EstimateKind::Item);
        assert!(global.contains("for: a goldfish."));
    }

    #[test]
    fn net_worth_prompt_names_person() {
        let prompt = estimate_user_prompt("Taylor Swift", None, EstimateKind::NetWorth);
        assert!(prompt.contains("net worth in USD for the person: Taylor Swift"));
    }

    #[test]
    fn comparison_prompt_carries_context_and_json_shape() {
        let prompt = comparison_system_prompt("a goldfish", 12.0, Some("us"));
        assert!(prompt.contains("Item: \"a goldfish\""));
        assert!(prompt.contains("Price: $12.00"));
        assert!(prompt.contains("Country: us"));
        assert!(prompt.contains("\"price\": 12,"));
        assert!(prompt.contains("2.3 Big Macs"));
    }

    #[test]
    fn reference_examples_follow_price_band() {
        assert!(price_reference_examples(4.0).contains("16 gumballs"));
        assert!(price_reference_examples(250_000.0).contains("5.0 luxury SUVs"));
    }
}

//! Extraction instructions sent alongside the image.

const BASE_PROMPT: &str = "\
You are an expert inventory assistant. Analyze this image of a handwritten list.

Your goals:
1. Identify items and their quantities.
2. Interpret culinary shorthand, abbreviations, and slang.

Examples of shorthand interpretation:
- \"toms\" -> \"Tomatoes\"
- \"cukes\" -> \"Cucumbers\"
- \"avo\" -> \"Avocado\"
- \"oj\" -> \"Orange Juice\"
- \"shrooms\" -> \"Mushrooms\"
- \"1/2 gal milk\" -> name \"Milk\", quantity 1 (normalize units to item counts unless specified)
- \"doz eggs\" -> name \"Eggs\", quantity 12
";

const AMBIGUITY_RULES: &str = "
Ambiguity handling:
- If an item is ambiguous (e.g. \"cr\" could be \"Cream\" or \"Crackers\"), set \"confidence\" to \"low\".
- Give your best guess as \"name\".
- Give up to 3 other plausible readings in the \"alternatives\" array.

Output rules:
- Respond with a JSON array of objects with keys \"name\", \"quantity\", \"originalText\", \"confidence\", \"alternatives\".
- Always return \"originalText\" exactly as written in the image.
- Normalize \"name\" to Title Case.
- If no quantity is specified, assume 1.
";

/// Build the prompt. Known inventory names are passed as a decoding hint for
/// abbreviations.
pub fn build_prompt(known_names: &[String]) -> String {
    let mut prompt = String::from(BASE_PROMPT);

    let names: Vec<&str> = known_names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();

    if !names.is_empty() {
        prompt.push_str(&format!(
            "\nThe user manages an inventory with these known items: {}. \
             Use this list to decipher abbreviations (e.g. if 'chx' is written and \
             'Chicken Breast' is in inventory, map it to 'Chicken Breast').\n",
            names.join(", ")
        ));
    }

    prompt.push_str(AMBIGUITY_RULES);
    prompt
}

//! Prompt builder — renders a product record into a chat prompt pair.
//!
//! Pure and deterministic: the same product always yields byte-identical
//! prompt text. Missing product fields keep their label with an empty
//! value so the model can see what is unknown rather than guessing.

use crate::product::Product;

/// System and user instruction for one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
  pub system: String,
  pub user:   String,
}

/// Fixed assistant persona.
const SYSTEM: &str =
  "You are a helpful assistant for an e-commerce app. Be concise and neutral.";

/// Build the prompt pair for `product`.
pub fn build(product: &Product) -> PromptPair {
  let price = match product.price {
    Some(p) => p.to_string(),
    None => String::new(),
  };

  let product_data = format!(
    "Title: {}\nBrand: {}\nCategory: {}\nPrice: {}\nDescription: {}",
    product.title,
    product.brand.as_deref().unwrap_or(""),
    product.category.as_deref().unwrap_or(""),
    price,
    product.description.as_deref().unwrap_or(""),
  );

  let user = format!(
    "Based ONLY on this product data, create a structured JSON summary.\n\
     \n\
     Return JSON with EXACT keys:\n\
     {{\n\
       \"one_liner\": string,\n\
       \"pros\": string[],\n\
       \"cons\": string[],\n\
       \"best_for\": string[]\n\
     }}\n\
     \n\
     Rules:\n\
     - pros: 2 to 5 items\n\
     - cons: 1 to 4 items\n\
     - best_for: 1 to 3 items\n\
     - No marketing fluff, no fake specs, be cautious if info missing.\n\
     - Output ONLY valid JSON. No extra text.\n\
     \n\
     PRODUCT DATA:\n\
     {product_data}"
  );

  PromptPair { system: SYSTEM.to_string(), user }
}

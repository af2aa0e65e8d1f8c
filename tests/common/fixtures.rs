//! Provider payloads used by the integration tests

use serde_json::{Value, json};

/// Recipe page the search fixture links to
pub const VESUVIO_URL: &str = "http://www.seriouseats.com/recipes/2011/12/chicken-vesuvio-recipe.html";

/// Provider id of the search fixture
pub const VESUVIO_ID: &str = "b79327d05b8e5b838ad6cfd9576b30b6";

/// One search hit, shaped like the provider's response
pub fn vesuvio_hit() -> Value {
    json!({
        "recipe": {
            "uri": format!("http://www.edamam.com/ontologies/edamam.owl#recipe_{VESUVIO_ID}"),
            "label": "Chicken Vesuvio",
            "image": "https://edamam-product-images.s3.amazonaws.com/web-img/e42/e42f9119813e890af34c259785ae1cfb.jpg",
            "source": "Serious Eats",
            "url": VESUVIO_URL,
            "yield": 4.0,
            "dietLabels": ["Low-Carb"],
            "healthLabels": ["Mustard-Free", "Dairy-Free"],
            "ingredients": [
                { "text": "1/2 cup olive oil", "quantity": 0.5, "measure": "cup", "food": "olive oil", "weight": 108.0 },
                { "text": "5 cloves garlic", "quantity": 5.0, "measure": "clove", "food": "garlic", "weight": 15.0 },
                { "text": "1 big chicken", "quantity": 1.0, "food": "chicken", "weight": 1400.0 },
                { "text": "salt to taste", "quantity": 0.0, "food": "salt", "weight": 5.0 }
            ],
            "calories": 4228.04,
            "totalWeight": 2976.85,
            "totalTime": 60.0,
            "cuisineType": ["italian"],
            "mealType": ["lunch/dinner"],
            "dishType": ["main course"]
        }
    })
}

/// Search response envelope around `hits`
pub fn search_response(hits: Vec<Value>, count: u64, from: u64) -> Value {
    let to = from + hits.len() as u64;
    json!({
        "from": from,
        "to": to,
        "count": count,
        "hits": hits,
    })
}

/// Step-extraction response with one instruction group per slice
pub fn extract_response(groups: &[&[&str]]) -> Value {
    let groups: Vec<Value> = groups
        .iter()
        .map(|steps| {
            let steps: Vec<Value> = steps
                .iter()
                .enumerate()
                .map(|(i, step)| json!({ "number": i + 1, "step": step }))
                .collect();
            json!({ "name": "", "steps": steps })
        })
        .collect();
    json!({ "analyzedInstructions": groups })
}

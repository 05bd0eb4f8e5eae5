use crate::core::inventory::Inventory;
use crate::domain::model::Prompt;
use crate::utils::error::{Result, ScoutError};

/// Builds the closed-world instructions sent to the model.
///
/// The inventory is serialized once, when the builder is created; every prompt
/// afterwards embeds that same text.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    inventory_json: String,
}

impl PromptBuilder {
    pub fn new(inventory: &Inventory) -> Result<Self> {
        let inventory_json = serde_json::to_string_pretty(inventory.all()).map_err(|e| {
            ScoutError::InventoryError {
                message: format!("failed to serialize inventory: {}", e),
            }
        })?;
        Ok(Self { inventory_json })
    }

    /// `query` must already be trimmed and non-empty.
    pub fn build(&self, query: &str) -> Prompt {
        Prompt {
            system: self.system_prompt(),
            user: Self::user_prompt(query),
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            r#"You are a travel package recommendation assistant. You match a traveller's request against a fixed inventory and nothing else.

RULES:
1. Only recommend packages that appear in the INVENTORY below, referenced by their "id".
2. Never invent, rename or mention destinations or packages that are not in the INVENTORY.
3. Do not repeat an id. Each match needs a short reasoning addressed to the traveller.
4. If nothing fits well, return an empty "matches" array and use "message" to suggest how the traveller could refine the request.

INVENTORY (the only valid options):
{inventory}

MATCHING CRITERIA:
- Price: respect budgets such as "under $100", "cheap" or "luxury".
- Tags: match activities and interests (beach, hiking, history, adventure, ...).
- Location: match any region or country the traveller mentions.
- Vibe: match the mood they describe (chill, adventurous, cultural, romantic, ...).

RESPONSE FORMAT (a single JSON object, no other text):
{{
  "matches": [
    {{"id": 1, "reasoning": "Fits your beach plans and stays within budget"}}
  ],
  "message": "Optional note, required when matches is empty"
}}"#,
            inventory = self.inventory_json
        )
    }

    fn user_prompt(query: &str) -> String {
        format!(
            r#"Traveller request: "{query}"

Find the packages from the inventory that fit this request, considering price range, tags, location and overall vibe. Return only ids that exist in the inventory."#
        )
    }
}

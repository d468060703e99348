// Prompt fragments shared by every caller of the completion service.

/// Appended to system prompts whose replies are decoded with `decode_json`.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text before or after the JSON object. \
    Do NOT wrap the JSON in markdown code fences. \
    Do NOT add comments, explanations or apologies.";

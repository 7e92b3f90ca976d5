// Shared prompt fragments for structured-output calls.
// Feature-specific prompts live next to the code that sends them.

/// Instruction appended to every prompt that expects a JSON payload back.
pub const JSON_ARRAY_ONLY: &str = "Output a pure JSON array only. \
    Do NOT wrap it in markdown code fences. \
    Do NOT include explanations before or after the array.";

/// Temperature used for question generation: varied enough to avoid repeats
/// across batches, low enough to keep answers tight.
pub const GENERATION_TEMPERATURE: f32 = 0.8;

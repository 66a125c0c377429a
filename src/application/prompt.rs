//! Prompt assembly for the retrieval-augmented completion call.

/// Fixed Persian system instruction: answer only from the given sources,
/// admit insufficient information, never reveal internal reasoning.
pub const SYSTEM_INSTRUCTION: &str = "تو یک دستیار فارسی زبان هستی که فقط بر اساس منابع داده‌شده درباره قرآن پاسخ می‌دهد. اگر سوال نامرتبط بود یا پاسخ در اطلاعات موجود نبود، واضح بگو اطلاعات کافی نداری. مرحله فکر کردن داخلی را نمایش نده.";

/// Substituted for the context block when retrieval came back empty.
pub const NO_CONTEXT_FALLBACK: &str = "اطلاعات مرتبطی پیدا نشد.";

/// Assembles instruction, retrieved context and the user question into one
/// payload. Deterministic: identical inputs yield byte-identical output.
pub fn build_rag_prompt(query: &str, context: &str) -> String {
    let context = context.trim();
    let context = if context.is_empty() {
        NO_CONTEXT_FALLBACK
    } else {
        context
    };

    format!(
        "{SYSTEM_INSTRUCTION}\n\nاطلاعات:\n{context}\n\nسوال کاربر:\n{}\n",
        query.trim()
    )
}

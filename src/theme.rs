//! Status-to-color mappings.
//!
//! There are two independent tables: the alert card theme and the history
//! timeline dot color. They use different palettes and different status
//! vocabularies and must stay separate.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CardTheme {
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
    pub button_color: &'static str,
    pub button_text_color: &'static str,
    pub icon_color: &'static str,
}

pub const REFUSED_THEME: CardTheme = CardTheme {
    background_color: "#FFF5F5",
    border_color: "#FEE2E2",
    text_color: "#B91C1C",
    button_color: "#DC2626",
    button_text_color: "#fff",
    icon_color: "#EF4444",
};

pub const UNANSWERED_THEME: CardTheme = CardTheme {
    background_color: "#FFFBEB",
    border_color: "#FEF3C7",
    text_color: "#92400E",
    button_color: "#F59E0B",
    button_text_color: "#fff",
    icon_color: "#F97316",
};

pub const AWAITING_RESPONSE_THEME: CardTheme = CardTheme {
    background_color: "#EFF6FF",
    border_color: "#DBEAFE",
    text_color: "#1E40AF",
    button_color: "#3B82F6",
    button_text_color: "#fff",
    icon_color: "#2563EB",
};

/// Neutral gray for any status the card table does not know.
pub const FALLBACK_THEME: CardTheme = CardTheme {
    background_color: "#F5F5F5",
    border_color: "#E5E5E5",
    text_color: "#404040",
    button_color: "#737373",
    button_text_color: "#fff",
    icon_color: "#525252",
};

/// Card theme for an alert status. Case-sensitive, total over any input.
pub fn theme_for(status: &str) -> CardTheme {
    match status {
        "Recusado" => REFUSED_THEME,
        "Não Respondido" => UNANSWERED_THEME,
        "Aguardando Resposta" => AWAITING_RESPONSE_THEME,
        _ => FALLBACK_THEME,
    }
}

pub const FALLBACK_DOT_COLOR: &str = "#038a25";

/// Timeline dot color for a history status. Case-sensitive, total over any input.
pub fn color_for(status: &str) -> &'static str {
    match status {
        "Aprovado" => "#00b48b",
        "Aguardando Resposta" => "#f04324",
        "Aguardando Aprovação" => "#0e459c",
        "Não Respondido" => "#d63333",
        "Recusado" => "#f04324",
        "Não Avaliado" => "orange",
        _ => FALLBACK_DOT_COLOR,
    }
}

//! Color theme shared by every screen

use ratatui::style::Color;

use crate::task::Priority;

#[derive(Debug, Clone)]
pub struct Theme {
    // Chrome
    pub background: Color,
    pub border: Color,
    pub column_border: Color,
    pub selection: Color,
    pub drag_selection: Color,

    // Text
    pub title: Color,
    pub text: Color,
    pub dimmed: Color,
    pub hint: Color,

    // Card tags
    pub priority_low: Color,
    pub priority_medium: Color,
    pub priority_high: Color,
    pub pending: Color,
    pub overdue: Color,

    // Feedback
    pub error: Color,
    pub success: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate()
    }
}

impl Theme {
    pub fn slate() -> Self {
        Self {
            background: Color::Rgb(14, 17, 23),
            border: Color::Rgb(52, 63, 82),
            column_border: Color::Rgb(110, 168, 254),
            selection: Color::Rgb(33, 42, 58),
            drag_selection: Color::Rgb(58, 58, 74),

            title: Color::Rgb(110, 168, 254),
            text: Color::Rgb(201, 209, 217),
            dimmed: Color::Rgb(98, 110, 130),
            hint: Color::Rgb(139, 158, 182),

            priority_low: Color::Rgb(106, 130, 150),
            priority_medium: Color::Rgb(246, 185, 59),
            priority_high: Color::Rgb(248, 106, 92),
            pending: Color::Rgb(158, 170, 255),
            overdue: Color::Rgb(248, 106, 92),

            error: Color::Rgb(248, 106, 92),
            success: Color::Rgb(86, 211, 150),
            accent: Color::Rgb(110, 168, 254),
        }
    }

    /// Tag color for a priority level, shared by cards and form fields.
    pub fn priority(&self, priority: Priority) -> Color {
        match priority {
            Priority::Low => self.priority_low,
            Priority::Medium => self.priority_medium,
            Priority::High => self.priority_high,
        }
    }
}

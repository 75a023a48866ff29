/// ANSI color codes for the default report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub keyword: &'static str, // Bright cyan for keywords
    pub count: &'static str,   // Bright green for counts
    pub notice: &'static str,  // Bright yellow for partial-result notices
    pub reset: &'static str,   // Reset to default color
}

impl ColorScheme {
    pub fn new(use_colors: bool) -> Self {
        if use_colors {
            Self {
                keyword: "\x1b[96m",
                count: "\x1b[92m",
                notice: "\x1b[93m",
                reset: "\x1b[0m",
            }
        } else {
            // All empty strings for no-color mode
            Self {
                keyword: "",
                count: "",
                notice: "",
                reset: "",
            }
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub line_color: String,
    pub marker_fill: String,
    pub marker_stroke: String,
    pub choice_fill: String,
    pub end_fill: String,
    pub loop_stroke: String,
    pub answer_color: String,
    pub highlight_color: String,
}

impl Theme {
    /// Black markers with white ids on a white page, matching the plain
    /// browser rendering.
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            text_color: "#FFFFFF".to_string(),
            line_color: "#000000".to_string(),
            marker_fill: "#000000".to_string(),
            marker_stroke: "#000000".to_string(),
            choice_fill: "#1F3A93".to_string(),
            end_fill: "#555555".to_string(),
            loop_stroke: "#D91E18".to_string(),
            answer_color: "#1F3A93".to_string(),
            highlight_color: "#F7CA18".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            marker_fill: "#F8FAFF".to_string(),
            marker_stroke: "#C7D2E5".to_string(),
            choice_fill: "#E3ECFF".to_string(),
            end_fill: "#EEF2F8".to_string(),
            loop_stroke: "#E5484D".to_string(),
            answer_color: "#3E63DD".to_string(),
            highlight_color: "#FFE58F".to_string(),
        }
    }

    /// Marker fill for a stanza role.
    pub fn fill_for_role(&self, role: &str) -> &str {
        match role {
            "Choice" | "Question" => &self.choice_fill,
            "End" => &self.end_fill,
            _ => &self.marker_fill,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

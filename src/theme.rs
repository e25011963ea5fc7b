use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub title_font_size: f32,
    pub label_font_size: f32,
    pub background: String,
    pub white_key_fill: String,
    pub black_key_fill: String,
    pub key_stroke: String,
    pub key_stroke_width: f32,
    pub white_mark_fill: String,
    pub black_mark_fill: String,
    pub mark_stroke: String,
    pub label_color: String,
    pub title_color: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            title_font_size: 18.0,
            label_font_size: 11.0,
            background: "#FFFFFF".to_string(),
            white_key_fill: "#FFFFFF".to_string(),
            black_key_fill: "#000000".to_string(),
            key_stroke: "#000000".to_string(),
            key_stroke_width: 1.0,
            white_mark_fill: "#D62828".to_string(),
            black_mark_fill: "#F77F00".to_string(),
            mark_stroke: "#000000".to_string(),
            label_color: "#333333".to_string(),
            title_color: "#000000".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            title_font_size: 16.0,
            label_font_size: 10.0,
            background: "#FFFFFF".to_string(),
            white_key_fill: "#F8FAFF".to_string(),
            black_key_fill: "#1C2430".to_string(),
            key_stroke: "#7A8AA6".to_string(),
            key_stroke_width: 0.8,
            white_mark_fill: "#3B82F6".to_string(),
            black_mark_fill: "#93C5FD".to_string(),
            mark_stroke: "#1C2430".to_string(),
            label_color: "#1C2430".to_string(),
            title_color: "#1C2430".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "classic" | "default" | "base" => Some(Self::classic()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
